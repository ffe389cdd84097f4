//! # Execution engine
//! Owns the program counter, the compare flags and the running state, and
//! drives the fetch-decode-execute cycle over a [`Store`].
//!
//! Execution is done through the [`Execution`] abstraction. It is an
//! iterator yielding every instruction as it is executed, running until a
//! `HLT` instruction or the first fault. Using iterators eases up the
//! interaction: one can bound, trace or single-step a program without the
//! engine growing any of those features.
//! ```rust
//! # use reg8::machine::Machine;
//! # let mut machine = Machine::new();
//! # machine.load(&[0b00000001]).unwrap();
//! for executed in machine.execution(&mut ()) {
//!     println!("{}", executed.unwrap());
//! }
//! ```
//!
//! Decoding is total over the opcode byte: every value either maps to an
//! [`Opcode`] variant or stops execution with
//! [`Fault::UnknownOpcode`](crate::fault::Fault); nothing falls through
//! silently.

use core::cmp::Ordering;
use core::fmt::{self, Display};

use crate::bus::OutputBus;
use crate::fault::Fault;
use crate::store::{Store, STACK_POINTER};

/// The closed set of operations the machine knows how to execute.
///
/// Encodings carry their own shape: the top two bits of an opcode byte are
/// its operand count, so the instruction length never has to be tabled
/// separately.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Opcode {
    /// Stop execution and reset the program counter.
    Halt,
    /// `r[reg] = value`.
    LoadImmediate,
    /// Emit `r[reg]` on the output bus.
    PrintRegister,
    /// `r[a] = r[a] * r[b]`, wrapping at 8 bits.
    Multiply,
    /// Set the flags to the ordering of `r[a]` against `r[b]`.
    Compare,
    /// `pc = r[reg]`.
    Jump,
    /// `pc = r[reg]` if the equal flag is set.
    JumpIfEqual,
    /// `pc = r[reg]` if the equal flag is not set.
    JumpIfNotEqual,
    /// Grow the stack down by one and store `r[reg]` at its top.
    Push,
    /// Load the top of the stack into `r[reg]` and shrink it by one.
    Pop,
}

impl Opcode {
    /// Decodes an opcode byte, or `None` if it is not in the table.
    pub const fn decode(byte: u8) -> Option<Self> {
        Some(match byte {
            0b0000_0001 => Self::Halt,
            0b1000_0010 => Self::LoadImmediate,
            0b0100_0111 => Self::PrintRegister,
            0b1010_0010 => Self::Multiply,
            0b1010_0111 => Self::Compare,
            0b0101_0100 => Self::Jump,
            0b0101_0101 => Self::JumpIfEqual,
            0b0101_0110 => Self::JumpIfNotEqual,
            0b0100_0101 => Self::Push,
            0b0100_0110 => Self::Pop,
            _ => return None,
        })
    }

    /// The byte this opcode is encoded as.
    pub const fn code(self) -> u8 {
        match self {
            Self::Halt => 0b0000_0001,
            Self::LoadImmediate => 0b1000_0010,
            Self::PrintRegister => 0b0100_0111,
            Self::Multiply => 0b1010_0010,
            Self::Compare => 0b1010_0111,
            Self::Jump => 0b0101_0100,
            Self::JumpIfEqual => 0b0101_0101,
            Self::JumpIfNotEqual => 0b0101_0110,
            Self::Push => 0b0100_0101,
            Self::Pop => 0b0100_0110,
        }
    }

    /// Number of operand bytes following the opcode byte.
    pub const fn operand_count(self) -> usize {
        (self.code() >> 6) as usize
    }

    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Halt => "hlt",
            Self::LoadImmediate => "ldi",
            Self::PrintRegister => "prn",
            Self::Multiply => "mul",
            Self::Compare => "cmp",
            Self::Jump => "jmp",
            Self::JumpIfEqual => "jeq",
            Self::JumpIfNotEqual => "jne",
            Self::Push => "push",
            Self::Pop => "pop",
        }
    }
}

impl Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Whether the machine is currently inside a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Status {
    #[default]
    Halted,
    Running,
}

/// A complete machine instance: store, program counter, flags and running
/// state. Instances are independent, there is no process-wide machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Machine {
    store: Store,
    program_counter: usize,
    flags: Option<Ordering>,
    status: Status,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine {
    /// Returns a halted machine with zeroed memory and registers.
    pub const fn new() -> Self {
        Self {
            store: Store::new(),
            program_counter: 0,
            flags: None,
            status: Status::Halted,
        }
    }

    /// Copies a program image into memory starting at address 0.
    pub fn load(&mut self, image: &[u8]) -> Result<(), Fault> {
        self.store.load(image)
    }

    pub fn store(&self) -> &Store {
        &self.store
    }
    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }
    pub fn program_counter(&self) -> usize {
        self.program_counter
    }
    /// Result of the latest `CMP`: `Greater`, `Equal` or `Less` ordering of
    /// the first operand against the second, or `None` before any compare.
    /// At most one flag can be set at a time by construction.
    pub fn flags(&self) -> Option<Ordering> {
        self.flags
    }
    pub fn status(&self) -> Status {
        self.status
    }
    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }

    /// Starts a run, returning an [`Execution`] that can be iterated on to
    /// execute instructions until `HLT` or the first fault.
    pub fn execution<'a, B: OutputBus>(&'a mut self, bus: &'a mut B) -> Execution<'a, B> {
        self.status = Status::Running;
        log::debug!("program started at address {}", self.program_counter);
        Execution {
            machine: self,
            bus,
            faulted: false,
        }
    }

    /// Runs the loaded program until its `HLT` instruction, surfacing the
    /// first fault if one occurs.
    ///
    /// A clean halt resets the program counter to 0, so the instance can be
    /// reloaded and run again.
    pub fn run<B: OutputBus>(&mut self, bus: &mut B) -> Result<(), Fault> {
        for executed in self.execution(bus) {
            executed?;
        }
        log::debug!("program ended");
        Ok(())
    }

    /// Fetches, decodes and executes the instruction at the program
    /// counter, returning the opcode that ran.
    ///
    /// Handlers advance the program counter by their own instruction
    /// length; the branching ones assign it directly instead.
    fn step<B: OutputBus>(&mut self, bus: &mut B) -> Result<Opcode, Fault> {
        let address = self.program_counter;
        let byte = self.store.read(address)?;
        let opcode = Opcode::decode(byte).ok_or(Fault::UnknownOpcode {
            opcode: byte,
            address,
        })?;
        log::trace!("{address:02x} | {opcode}");

        match opcode {
            Opcode::Halt => {
                self.status = Status::Halted;
                self.program_counter = 0;
            }
            Opcode::LoadImmediate => {
                let register = self.operand(1)? as usize;
                let value = self.operand(2)?;
                self.store.set_register(register, value)?;
                self.advance(opcode);
            }
            Opcode::PrintRegister => {
                let register = self.operand(1)? as usize;
                bus.print(self.store.register(register)?);
                self.advance(opcode);
            }
            Opcode::Multiply => {
                let a = self.operand(1)? as usize;
                let b = self.operand(2)? as usize;
                let product = self.store.register(a)?.wrapping_mul(self.store.register(b)?);
                log::trace!("mul r{a} r{b} = {product}");
                self.store.set_register(a, product)?;
                self.advance(opcode);
            }
            Opcode::Compare => {
                let a = self.operand(1)? as usize;
                let b = self.operand(2)? as usize;
                self.flags = Some(self.store.register(a)?.cmp(&self.store.register(b)?));
                self.advance(opcode);
            }
            Opcode::Jump => {
                let register = self.operand(1)? as usize;
                self.program_counter = self.store.register(register)? as usize;
            }
            Opcode::JumpIfEqual => {
                let register = self.operand(1)? as usize;
                if self.flags == Some(Ordering::Equal) {
                    self.program_counter = self.store.register(register)? as usize;
                } else {
                    self.advance(opcode);
                }
            }
            Opcode::JumpIfNotEqual => {
                let register = self.operand(1)? as usize;
                if self.flags != Some(Ordering::Equal) {
                    self.program_counter = self.store.register(register)? as usize;
                } else {
                    self.advance(opcode);
                }
            }
            Opcode::Push => {
                let register = self.operand(1)? as usize;
                let value = self.store.register(register)?;
                // The stack grows down from the top of memory; the pointer
                // is ordinary register state and wraps at 8 bits.
                let top = self.store.register(STACK_POINTER)?.wrapping_sub(1);
                self.store.set_register(STACK_POINTER, top)?;
                self.store.write(top as usize, value)?;
                self.advance(opcode);
            }
            Opcode::Pop => {
                let register = self.operand(1)? as usize;
                let top = self.store.register(STACK_POINTER)?;
                let value = self.store.read(top as usize)?;
                self.store.set_register(register, value)?;
                self.store.set_register(STACK_POINTER, top.wrapping_add(1))?;
                self.advance(opcode);
            }
        }

        Ok(opcode)
    }

    /// Reads the operand byte `offset` cells past the program counter.
    fn operand(&self, offset: usize) -> Result<u8, Fault> {
        self.store.read(self.program_counter + offset)
    }

    /// Advances the program counter past an instruction and its operands.
    fn advance(&mut self, opcode: Opcode) {
        self.program_counter += 1 + opcode.operand_count();
    }
}

/// An in-progress run, implemented as an iterator that executes one
/// instruction per `next` call and yields the opcode that ran.
///
/// The iterator ends after the `HLT` instruction has been yielded, or after
/// yielding the first fault; it stays fused from then on.
pub struct Execution<'a, B> {
    machine: &'a mut Machine,
    bus: &'a mut B,
    faulted: bool,
}

impl<B: OutputBus> Iterator for Execution<'_, B> {
    type Item = Result<Opcode, Fault>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.faulted || !self.machine.is_running() {
            return None;
        }
        match self.machine.step(self.bus) {
            Ok(opcode) => Some(Ok(opcode)),
            Err(fault) => {
                self.faulted = true;
                log::debug!("execution stopped: {fault}");
                Some(Err(fault))
            }
        }
    }
}
