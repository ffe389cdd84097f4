//! # Memory & register store
//! The machine's addressable state: a flat array of 256 byte cells and a
//! file of 8 byte-wide registers, both zero-initialized. The last register
//! doubles as the stack pointer, but it is ordinary register state; `PUSH`
//! and `POP` mutate it through the same accessors as everything else.
//!
//! Every access is bounds-checked and returns a [`Fault`] on a bad address
//! or index. There is deliberately no infallible indexing path: a decoded
//! operand is untrusted until it has been through one of these accessors.

use crate::fault::Fault;

/// Number of addressable memory cells.
pub const MEMORY_SIZE: usize = 256;
/// Number of general-purpose registers.
pub const REGISTER_COUNT: usize = 8;
/// The register conventionally holding the stack pointer.
pub const STACK_POINTER: usize = 7;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Store {
    memory: [u8; MEMORY_SIZE],
    registers: [u8; REGISTER_COUNT],
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Returns a zeroed store.
    pub const fn new() -> Self {
        Self {
            memory: [0; MEMORY_SIZE],
            registers: [0; REGISTER_COUNT],
        }
    }

    /// Reads the memory cell at `address`.
    pub fn read(&self, address: usize) -> Result<u8, Fault> {
        self.memory
            .get(address)
            .copied()
            .ok_or(Fault::MemoryOutOfBounds { address })
    }

    /// Writes `value` to the memory cell at `address`.
    pub fn write(&mut self, address: usize, value: u8) -> Result<(), Fault> {
        *self
            .memory
            .get_mut(address)
            .ok_or(Fault::MemoryOutOfBounds { address })? = value;
        Ok(())
    }

    /// Reads the register at `index`.
    pub fn register(&self, index: usize) -> Result<u8, Fault> {
        self.registers
            .get(index)
            .copied()
            .ok_or(Fault::RegisterOutOfBounds { index })
    }

    /// Writes `value` to the register at `index`.
    pub fn set_register(&mut self, index: usize, value: u8) -> Result<(), Fault> {
        *self
            .registers
            .get_mut(index)
            .ok_or(Fault::RegisterOutOfBounds { index })? = value;
        Ok(())
    }

    /// Copies a program image into memory, starting at address 0.
    ///
    /// The rest of memory is left untouched, so the stack region at the top
    /// survives a reload.
    pub fn load(&mut self, image: &[u8]) -> Result<(), Fault> {
        if image.len() > MEMORY_SIZE {
            return Err(Fault::ImageTooLarge {
                length: image.len(),
            });
        }
        self.memory[..image.len()].copy_from_slice(image);
        Ok(())
    }
}
