//! # Output bus
//! The machine interacts with the outside world through a single sink: the
//! `PRN` instruction hands a register's value to whatever implements
//! [`OutputBus`]. The core does not own the sink, it only calls into it, so
//! implementations are free to write to a terminal, a serial port or a
//! buffer under test.

pub trait OutputBus {
    /// Receives the value emitted by a `PRN` instruction.
    fn print(&mut self, value: u8);
}

/// A bus that discards everything, handy for programs run purely for their
/// register or memory effects.
impl OutputBus for () {
    fn print(&mut self, _value: u8) {}
}
