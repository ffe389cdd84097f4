//! # Machine faults
//! Every failure the machine can hit is fatal: a corrupted instruction
//! stream has no meaningful recovery, so execution stops at the first fault
//! and the fault is surfaced to the caller with enough context to report
//! the failing address or index.

use core::fmt::{self, Display};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Fault {
    /// The byte fetched at `address` maps to no known operation.
    UnknownOpcode { opcode: u8, address: usize },
    /// Memory access outside `[0, 255]`.
    MemoryOutOfBounds { address: usize },
    /// Register access outside `[0, 7]`.
    RegisterOutOfBounds { index: usize },
    /// A program image longer than memory itself.
    ImageTooLarge { length: usize },
}

impl Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOpcode { opcode, address } => {
                write!(f, "unknown opcode {opcode:#010b} at address {address}")
            }
            Self::MemoryOutOfBounds { address } => {
                write!(f, "memory address {address} out of bounds")
            }
            Self::RegisterOutOfBounds { index } => {
                write!(f, "register index {index} out of bounds")
            }
            Self::ImageTooLarge { length } => {
                write!(f, "program image of {length} bytes does not fit in memory")
            }
        }
    }
}
