//! Small glue devices.
//!
//! Each device here is a pure transform over one to three nets, evaluated
//! once per tick: word-wise gates, bit routing, the tri-state buffer, the
//! address mapper, the transparent latch and the one sequential part, a
//! shift register.

mod gates;
mod latch;
mod route;

pub use gates::{AddGate, AndGate, NandGate, NorGate, NotGate, OrGate, SubGate, XorGate};
pub use latch::{Latch, ShiftRegister};
pub use route::{AddressMap, BitFan, BitJoin, BitTap, Demux2, Mux2, TriState};
