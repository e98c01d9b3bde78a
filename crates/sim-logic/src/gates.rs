//! Word-wise logic gates.
//!
//! Gates operate on whole net words at once; a pair of 1-bit lines gives
//! classic single-gate behaviour, wider nets give a gate per bit lane. The
//! output net's own mask truncates the inverted forms.

use sim_core::{Board, Device, NetId};

macro_rules! two_input_gate {
    ($(#[$doc:meta])* $name:ident, |$a:ident, $b:ident| $expr:expr) => {
        $(#[$doc])*
        #[derive(Debug)]
        pub struct $name {
            a: NetId,
            b: NetId,
            out: NetId,
        }

        impl $name {
            #[must_use]
            pub fn new(a: NetId, b: NetId, out: NetId) -> Self {
                Self { a, b, out }
            }
        }

        impl Device for $name {
            fn evaluate(&mut self, board: &mut Board) {
                let $a = board.read(self.a);
                let $b = board.read(self.b);
                board.write(self.out, $expr);
            }
        }
    };
}

two_input_gate!(
    /// Bitwise AND of two nets.
    AndGate, |a, b| a & b
);

two_input_gate!(
    /// Bitwise OR of two nets.
    OrGate, |a, b| a | b
);

two_input_gate!(
    /// Bitwise XOR of two nets.
    XorGate, |a, b| a ^ b
);

two_input_gate!(
    /// Bitwise NOR; the output mask truncates the inversion.
    NorGate, |a, b| !(a | b)
);

two_input_gate!(
    /// Bitwise NAND; the output mask truncates the inversion.
    NandGate, |a, b| !(a & b)
);

two_input_gate!(
    /// Word adder; wraps within the output width.
    AddGate, |a, b| a.wrapping_add(b)
);

two_input_gate!(
    /// Word subtractor; wraps within the output width.
    SubGate, |a, b| a.wrapping_sub(b)
);

/// Logic-level inverter for a single line.
#[derive(Debug)]
pub struct NotGate {
    input: NetId,
    out: NetId,
}

impl NotGate {
    #[must_use]
    pub fn new(input: NetId, out: NetId) -> Self {
        Self { input, out }
    }
}

impl Device for NotGate {
    fn evaluate(&mut self, board: &mut Board) {
        let level = board.is_high(self.input);
        board.write_level(self.out, !level);
    }
}
