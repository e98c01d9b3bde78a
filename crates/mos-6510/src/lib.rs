//! Cycle-accurate 6510 CPU core.
//!
//! The CPU is a device on a signal board: it drives the address, data,
//! read/write and sync nets in lock-step with a two-phase clock and owns
//! nothing but its register file and staging buffers. Falling clock edges
//! publish staged values onto the nets; rising edges sample the data net
//! and run one micro-step of the current instruction.

mod cpu;
mod flags;
mod microcode;
mod registers;

pub use cpu::Mos6510;
pub use flags::Status;
pub use registers::Registers;
