//! Signal routing: selection, isolation, fan-out and address decode.

use sim_core::{Board, Device, NetId};

/// Two-way multiplexer: drives the output from `a` while the select line is
/// low, from `b` while it is high.
#[derive(Debug)]
pub struct Mux2 {
    a: NetId,
    b: NetId,
    out: NetId,
    select: NetId,
}

impl Mux2 {
    #[must_use]
    pub fn new(a: NetId, b: NetId, out: NetId, select: NetId) -> Self {
        Self { a, b, out, select }
    }
}

impl Device for Mux2 {
    fn evaluate(&mut self, board: &mut Board) {
        let source = if board.is_high(self.select) {
            self.b
        } else {
            self.a
        };
        let value = board.read(source);
        board.write(self.out, value);
    }
}

/// Two-way demultiplexer: routes the input to `a` (select low) or `b`
/// (select high); the unselected output is driven to zero.
#[derive(Debug)]
pub struct Demux2 {
    input: NetId,
    a: NetId,
    b: NetId,
    select: NetId,
}

impl Demux2 {
    #[must_use]
    pub fn new(input: NetId, a: NetId, b: NetId, select: NetId) -> Self {
        Self {
            input,
            a,
            b,
            select,
        }
    }
}

impl Device for Demux2 {
    fn evaluate(&mut self, board: &mut Board) {
        let value = board.read(self.input);
        if board.is_high(self.select) {
            board.write(self.b, value);
            board.write(self.a, 0);
        } else {
            board.write(self.a, value);
            board.write(self.b, 0);
        }
    }
}

/// Tri-state buffer: passes input to output while the enable line is low,
/// floats (writes nothing) otherwise.
#[derive(Debug)]
pub struct TriState {
    input: NetId,
    out: NetId,
    enable: NetId,
}

impl TriState {
    #[must_use]
    pub fn new(input: NetId, out: NetId, enable: NetId) -> Self {
        Self { input, out, enable }
    }
}

impl Device for TriState {
    fn evaluate(&mut self, board: &mut Board) {
        if !board.is_high(self.enable) {
            let value = board.read(self.input);
            board.write(self.out, value);
        }
    }
}

/// Fans the low eight bits of a word out onto eight single-bit lines.
#[derive(Debug)]
pub struct BitFan {
    input: NetId,
    lines: [NetId; 8],
}

impl BitFan {
    #[must_use]
    pub fn new(input: NetId, lines: [NetId; 8]) -> Self {
        Self { input, lines }
    }
}

impl Device for BitFan {
    fn evaluate(&mut self, board: &mut Board) {
        let word = board.read(self.input);
        for (bit, line) in self.lines.iter().enumerate() {
            board.write(*line, (word >> bit) & 1);
        }
    }
}

/// Gathers eight single-bit lines into one byte-wide word; the inverse of
/// [`BitFan`].
#[derive(Debug)]
pub struct BitJoin {
    lines: [NetId; 8],
    out: NetId,
}

impl BitJoin {
    #[must_use]
    pub fn new(lines: [NetId; 8], out: NetId) -> Self {
        Self { lines, out }
    }
}

impl Device for BitJoin {
    fn evaluate(&mut self, board: &mut Board) {
        let mut word = 0u32;
        for (bit, line) in self.lines.iter().enumerate() {
            if board.is_high(*line) {
                word |= 1 << bit;
            }
        }
        board.write(self.out, word);
    }
}

/// Taps one bit of a word onto a single line.
#[derive(Debug)]
pub struct BitTap {
    input: NetId,
    out: NetId,
    bit: u32,
}

impl BitTap {
    #[must_use]
    pub fn new(input: NetId, out: NetId, bit: u32) -> Self {
        Self { input, out, bit }
    }
}

impl Device for BitTap {
    fn evaluate(&mut self, board: &mut Board) {
        let word = board.read(self.input);
        board.write(self.out, (word >> self.bit) & 1);
    }
}

/// Window decoder: while the input address lies inside `[low, high]` it
/// asserts the enable line (active low) and drives the rebased address
/// `input - low`; outside the window the enable line idles high and the
/// address passes through unchanged.
#[derive(Debug)]
pub struct AddressMap {
    input: NetId,
    out: NetId,
    low: u32,
    high: u32,
    enable: NetId,
}

impl AddressMap {
    #[must_use]
    pub fn new(input: NetId, out: NetId, low: u32, high: u32, enable: NetId) -> Self {
        Self {
            input,
            out,
            low,
            high,
            enable,
        }
    }
}

impl Device for AddressMap {
    fn evaluate(&mut self, board: &mut Board) {
        let addr = board.read(self.input);
        if addr >= self.low && addr <= self.high {
            board.write_level(self.enable, false);
            board.write(self.out, addr - self.low);
        } else {
            board.write_level(self.enable, true);
            board.write(self.out, addr);
        }
    }
}
