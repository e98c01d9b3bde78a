//! Registers: the transparent latch and the shift register.

use sim_core::{Board, Device, NetId};

/// Byte-wide latch register.
///
/// While the write-enable line is low the latch captures the input net.
/// With no output-enable line it drives its value every tick; with one, it
/// drives only while that line is low (tri-state output).
#[derive(Debug)]
pub struct Latch {
    input: NetId,
    out: NetId,
    write_enable: NetId,
    output_enable: Option<NetId>,
    value: u32,
}

impl Latch {
    #[must_use]
    pub fn new(input: NetId, out: NetId, write_enable: NetId) -> Self {
        Self {
            input,
            out,
            write_enable,
            output_enable: None,
            value: 0,
        }
    }

    /// Same latch with a tri-state output stage.
    #[must_use]
    pub fn with_output_enable(
        input: NetId,
        out: NetId,
        write_enable: NetId,
        output_enable: NetId,
    ) -> Self {
        Self {
            input,
            out,
            write_enable,
            output_enable: Some(output_enable),
            value: 0,
        }
    }

    /// The currently latched value.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.value
    }
}

impl Device for Latch {
    fn evaluate(&mut self, board: &mut Board) {
        if !board.is_high(self.write_enable) {
            self.value = board.read(self.input);
        }
        match self.output_enable {
            None => board.write(self.out, self.value),
            Some(oe) if !board.is_high(oe) => board.write(self.out, self.value),
            Some(_) => {}
        }
    }
}

/// Depth of the shift register delay line.
const SHIFT_STAGES: usize = 16;

/// Serial shift register.
///
/// On each rising edge of its clock line the stages shift up one place, the
/// input net is captured into stage 0 and the last stage is driven onto the
/// output. The clear line (active low) empties every stage asynchronously.
/// Edge detection is per-instance: the previous clock level lives on the
/// device, sampled at construction.
#[derive(Debug)]
pub struct ShiftRegister {
    input: NetId,
    out: NetId,
    clock: NetId,
    clear: NetId,
    stages: [u32; SHIFT_STAGES],
    last_clock: bool,
}

impl ShiftRegister {
    /// Wires the register and samples the initial clock level so the first
    /// evaluation doesn't see a phantom edge.
    #[must_use]
    pub fn new(board: &Board, input: NetId, out: NetId, clock: NetId, clear: NetId) -> Self {
        Self {
            input,
            out,
            clock,
            clear,
            stages: [0; SHIFT_STAGES],
            last_clock: board.is_high(clock),
        }
    }
}

impl Device for ShiftRegister {
    fn evaluate(&mut self, board: &mut Board) {
        let clock = board.is_high(self.clock);
        if clock && !self.last_clock {
            for i in (1..SHIFT_STAGES).rev() {
                self.stages[i] = self.stages[i - 1];
            }
            self.stages[0] = board.read(self.input);
            board.write(self.out, self.stages[SHIFT_STAGES - 1]);
        }
        self.last_clock = clock;

        if !board.is_high(self.clear) {
            self.stages = [0; SHIFT_STAGES];
            board.write(self.out, 0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::Board;

    #[test]
    fn latch_captures_while_enabled_and_holds_after() {
        let mut board = Board::new();
        let input = board.bus(8);
        let out = board.bus(8);
        let we = board.line();
        let mut latch = Latch::new(input, out, we);

        board.write(input, 0x3C);
        latch.evaluate(&mut board);
        assert_eq!(board.read(out), 0x3C);

        board.begin_tick();
        board.write(input, 0x99);
        board.write_level(we, true);
        latch.evaluate(&mut board);
        assert_eq!(latch.value(), 0x3C);
        assert_eq!(board.read(out), 0x3C);
    }

    #[test]
    fn latch_output_enable_gates_the_drive() {
        let mut board = Board::new();
        let input = board.bus(8);
        let out = board.bus(8);
        let we = board.line();
        let oe = board.line();
        let mut latch = Latch::with_output_enable(input, out, we, oe);

        board.write(input, 0x77);
        board.write_level(oe, true);
        latch.evaluate(&mut board);
        assert_eq!(board.read(out), 0);

        board.begin_tick();
        board.reset(oe);
        latch.evaluate(&mut board);
        assert_eq!(board.read(out), 0x77);
    }

    #[test]
    fn shift_register_delays_by_its_depth() {
        let mut board = Board::new();
        let input = board.line();
        let out = board.line();
        let clock = board.line();
        let clear = board.line();
        board.write_level(clear, true);
        board.write_level(input, true);
        let mut reg = ShiftRegister::new(&board, input, out, clock, clear);

        // Fifteen rising edges: the first captured bit hasn't reached the
        // output yet.
        for _ in 0..15 {
            board.write_level(clock, true);
            reg.evaluate(&mut board);
            board.write_level(clock, false);
            reg.evaluate(&mut board);
        }
        assert!(!board.is_high(out));

        board.write_level(clock, true);
        reg.evaluate(&mut board);
        assert!(board.is_high(out));
    }

    #[test]
    fn clear_empties_the_pipeline() {
        let mut board = Board::new();
        let input = board.line();
        let out = board.line();
        let clock = board.line();
        let clear = board.line();
        board.write_level(clear, true);
        board.write_level(input, true);
        let mut reg = ShiftRegister::new(&board, input, out, clock, clear);

        for _ in 0..SHIFT_STAGES {
            board.write_level(clock, true);
            reg.evaluate(&mut board);
            board.write_level(clock, false);
            reg.evaluate(&mut board);
        }
        assert!(board.is_high(out));

        board.write_level(clear, false);
        reg.evaluate(&mut board);
        assert!(!board.is_high(out));
    }
}
