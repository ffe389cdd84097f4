//! # Reg8: a minimal 8-bit register machine
//! A reference register-machine interpreter: 256 bytes of memory, 8
//! general-purpose registers, and a fixed-width bytecode executed by a
//! classic fetch-decode-execute cycle. Designed to not rely on `std`, so it
//! can be embedded anywhere a finished program image can be handed to it.
//!
//! The source is also designed to be as readable as possible: the whole
//! instruction set fits in one match expression in [`machine`].
//!
//! Loading a program and running it to the halt instruction looks like this:
//! ```rust
//! # use reg8::machine::Machine;
//! let mut machine = Machine::new();
//! // LDI r0, 8; PRN r0; HLT
//! machine.load(&[0b10000010, 0, 8, 0b01000111, 0, 0b00000001]).unwrap();
//! machine.run(&mut ()).unwrap();
//! ```

#![no_std]

pub mod bus;
pub mod fault;
pub mod machine;
pub mod store;
