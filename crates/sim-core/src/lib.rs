//! Core contracts for signal-level simulation.
//!
//! A system is a set of shared signal nets plus a collection of devices
//! wired to them. Every tick, each device evaluates exactly once in a
//! fixed order; there is no settling pass.

mod board;
mod device;
mod net;
mod observable;
mod ticks;

pub use board::{Board, NetId};
pub use device::Device;
pub use net::{MAX_WIDTH, Net, NetKind};
pub use observable::{Observable, Value};
pub use ticks::Ticks;
