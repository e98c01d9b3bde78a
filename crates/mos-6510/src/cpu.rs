//! The 6510 state machine.
//!
//! Two-phase clock discipline: on the falling edge of the clock net the
//! values staged by the previous rising edge (address, IO direction, sync,
//! and the data byte when a write is staged) are published onto the nets.
//! On the rising edge the data net is sampled into the internal buffer and
//! the current instruction's micro-step runs for the current cycle index.
//! A value staged during micro-step *k* is therefore not visible to other
//! devices until the next falling edge.
//!
//! Interrupt lines are examined on every evaluation, independent of clock
//! edges: NMI latches on a high-to-low transition, IRQ latches while the
//! line reads low with the interrupt-disable flag clear. At cycle 0 the
//! byte just fetched is decoded unless a pseudo-instruction preempts it,
//! in priority order reset > NMI > IRQ.

use sim_core::{Board, Device, NetId, Observable, Value};

use crate::Registers;
use crate::flags::{B, C, D, I, N, V, Z};

/// Pseudo-instruction selector for the NMI service sequence.
pub(crate) const OP_NMI: u16 = 256;
/// Pseudo-instruction selector for the reset sequence.
pub(crate) const OP_RESET: u16 = 257;
/// Pseudo-instruction selector for the IRQ service sequence.
pub(crate) const OP_IRQ: u16 = 258;

/// The MOS 6510 CPU as a board device.
#[derive(Debug)]
pub struct Mos6510 {
    /// Register file.
    pub regs: Registers,

    // Staging buffers, published on the next falling clock edge.
    pub(crate) ad_buf: u16,
    pub(crate) dt_buf: u8,
    pub(crate) io_write: bool,
    pub(crate) sync_fetch: bool,

    // Scratch bytes for address assembly within an instruction.
    pub(crate) buf: [u8; 2],

    /// Instruction selector: 0-255 for fetched opcodes plus the three
    /// pseudo-instructions.
    pub(crate) instr: u16,
    /// Micro-step index within the current instruction.
    pub(crate) cycle: u8,
    /// Set by a micro-step to end the instruction; clears `cycle` instead
    /// of advancing it.
    pub(crate) done: bool,

    // Interrupt latches and edge/level trackers.
    pub(crate) nmi_pending: bool,
    pub(crate) irq_pending: bool,
    pub(crate) reset_pending: bool,
    last_clk: bool,
    last_nmi: bool,

    // Wiring.
    addr: NetId,
    data: NetId,
    sync: NetId,
    rw: NetId,
    clk: NetId,
    irq: NetId,
    nmi: NetId,

    total_cycles: u64,
}

impl Mos6510 {
    /// Wire a CPU to its nets and sample the initial clock and NMI levels
    /// for edge detection. The CPU comes up with a reset request latched,
    /// so the first instruction boundary runs the reset sequence.
    #[must_use]
    pub fn new(
        board: &Board,
        addr: NetId,
        data: NetId,
        sync: NetId,
        rw: NetId,
        clk: NetId,
        irq: NetId,
        nmi: NetId,
    ) -> Self {
        Self {
            regs: Registers::new(),
            ad_buf: 0,
            dt_buf: 0,
            io_write: false,
            sync_fetch: false,
            buf: [0; 2],
            instr: 0,
            cycle: 0,
            done: false,
            nmi_pending: false,
            irq_pending: false,
            reset_pending: true,
            last_clk: board.is_high(clk),
            last_nmi: board.is_high(nmi),
            addr,
            data,
            sync,
            rw,
            clk,
            irq,
            nmi,
            total_cycles: 0,
        }
    }

    /// Latch a reset request. Takes effect at the next instruction-fetch
    /// boundary, mirroring synchronous hardware reset.
    pub fn request_reset(&mut self) {
        self.reset_pending = true;
    }

    /// The selector currently executing (an opcode or a pseudo-instruction
    /// code).
    #[must_use]
    pub fn instruction(&self) -> u16 {
        self.instr
    }

    /// Micro-step index within the current instruction.
    #[must_use]
    pub fn micro_cycle(&self) -> u8 {
        self.cycle
    }

    /// Falling edge: publish the staged bus state.
    fn publish(&mut self, board: &mut Board) {
        if self.cycle == 0 {
            self.ad_buf = self.regs.pc;
            self.io_write = false;
            self.sync_fetch = true;
        }
        if self.io_write {
            board.write(self.data, self.dt_buf.into());
        }
        board.write(self.addr, self.ad_buf.into());
        board.write_level(self.rw, !self.io_write);
        board.write_level(self.sync, !self.sync_fetch);
        // Write and fetch strobes last exactly one bus cycle.
        self.io_write = false;
        self.sync_fetch = false;
    }

    /// Rising edge: sample the data net, arbitrate at cycle 0, run one
    /// micro-step, advance or clear the cycle index.
    fn execute(&mut self, board: &mut Board) {
        self.dt_buf = board.read(self.data) as u8;
        if self.cycle == 0 {
            self.instr = self.dt_buf.into();
            if self.reset_pending {
                self.instr = OP_RESET;
            } else if self.nmi_pending {
                self.instr = OP_NMI;
            } else if self.irq_pending {
                self.instr = OP_IRQ;
            }
        }
        self.micro_step();
        self.total_cycles += 1;
        if self.done {
            self.done = false;
            self.cycle = 0;
        } else {
            self.cycle += 1;
        }
    }

    /// One cycle of the current instruction.
    fn micro_step(&mut self) {
        match self.instr {
            // Pseudo-instructions injected by interrupt arbitration.
            OP_NMI => self.pi_nmi(),
            OP_RESET => self.pi_reset(),
            OP_IRQ => self.pi_irq(),

            // BRK
            0x00 => self.op_brk(),
            // ORA (zp,X)
            0x01 => self.rd_izx(Self::alu_ora),
            // ORA zp
            0x05 => self.rd_zp(Self::alu_ora),
            // ASL zp
            0x06 => self.rmw_zp(Self::alu_asl),
            // PHP
            0x08 => self.push(|cpu| cpu.regs.p.0),
            // ORA #imm
            0x09 => self.rd_imm(Self::alu_ora),
            // ASL A
            0x0A => self.acc(Self::alu_asl),
            // ORA abs
            0x0D => self.rd_abs(Self::alu_ora),
            // ASL abs
            0x0E => self.rmw_abs(Self::alu_asl),

            // BPL rel
            0x10 => self.branch(!self.regs.p.is_set(N)),
            // ORA (zp),Y
            0x11 => self.rd_izy(Self::alu_ora),
            // ORA zp,X
            0x15 => self.rd_zpx(Self::alu_ora),
            // ASL zp,X
            0x16 => self.rmw_zpx(Self::alu_asl),
            // CLC
            0x18 => self.fl(C, false),
            // ORA abs,Y
            0x19 => self.rd_aby(Self::alu_ora),
            // ORA abs,X
            0x1D => self.rd_abx(Self::alu_ora),
            // ASL abs,X
            0x1E => self.rmw_abx(Self::alu_asl),

            // JSR abs
            0x20 => self.op_jsr(),
            // AND (zp,X)
            0x21 => self.rd_izx(Self::alu_and),
            // BIT zp
            0x24 => self.rd_zp(Self::alu_bit),
            // AND zp
            0x25 => self.rd_zp(Self::alu_and),
            // ROL zp
            0x26 => self.rmw_zp(Self::alu_rol),
            // PLP
            0x28 => self.pull(|cpu, v| cpu.regs.p.0 = v),
            // AND #imm
            0x29 => self.rd_imm(Self::alu_and),
            // ROL A
            0x2A => self.acc(Self::alu_rol),
            // BIT abs
            0x2C => self.rd_abs(Self::alu_bit),
            // AND abs
            0x2D => self.rd_abs(Self::alu_and),
            // ROL abs
            0x2E => self.rmw_abs(Self::alu_rol),

            // BMI rel
            0x30 => self.branch(self.regs.p.is_set(N)),
            // AND (zp),Y
            0x31 => self.rd_izy(Self::alu_and),
            // AND zp,X
            0x35 => self.rd_zpx(Self::alu_and),
            // ROL zp,X
            0x36 => self.rmw_zpx(Self::alu_rol),
            // SEC
            0x38 => self.fl(C, true),
            // AND abs,Y
            0x39 => self.rd_aby(Self::alu_and),
            // AND abs,X
            0x3D => self.rd_abx(Self::alu_and),
            // ROL abs,X
            0x3E => self.rmw_abx(Self::alu_rol),

            // RTI
            0x40 => self.op_rti(),
            // EOR (zp,X)
            0x41 => self.rd_izx(Self::alu_eor),
            // EOR zp
            0x45 => self.rd_zp(Self::alu_eor),
            // LSR zp
            0x46 => self.rmw_zp(Self::alu_lsr),
            // PHA
            0x48 => self.push(|cpu| cpu.regs.a),
            // EOR #imm
            0x49 => self.rd_imm(Self::alu_eor),
            // LSR A
            0x4A => self.acc(Self::alu_lsr),
            // JMP abs
            0x4C => self.op_jmp_abs(),
            // EOR abs
            0x4D => self.rd_abs(Self::alu_eor),
            // LSR abs
            0x4E => self.rmw_abs(Self::alu_lsr),

            // BVC rel
            0x50 => self.branch(!self.regs.p.is_set(V)),
            // EOR (zp),Y
            0x51 => self.rd_izy(Self::alu_eor),
            // EOR zp,X
            0x55 => self.rd_zpx(Self::alu_eor),
            // LSR zp,X
            0x56 => self.rmw_zpx(Self::alu_lsr),
            // CLI
            0x58 => self.fl(I, false),
            // EOR abs,Y
            0x59 => self.rd_aby(Self::alu_eor),
            // EOR abs,X
            0x5D => self.rd_abx(Self::alu_eor),
            // LSR abs,X
            0x5E => self.rmw_abx(Self::alu_lsr),

            // RTS
            0x60 => self.op_rts(),
            // ADC (zp,X)
            0x61 => self.rd_izx(Self::alu_adc),
            // ADC zp
            0x65 => self.rd_zp(Self::alu_adc),
            // ROR zp
            0x66 => self.rmw_zp(Self::alu_ror),
            // PLA
            0x68 => self.pull(|cpu, v| {
                cpu.regs.a = v;
                cpu.regs.p.update_nz(v);
            }),
            // ADC #imm
            0x69 => self.rd_imm(Self::alu_adc),
            // ROR A
            0x6A => self.acc(Self::alu_ror),
            // JMP (ind)
            0x6C => self.op_jmp_ind(),
            // ADC abs
            0x6D => self.rd_abs(Self::alu_adc),
            // ROR abs
            0x6E => self.rmw_abs(Self::alu_ror),

            // BVS rel
            0x70 => self.branch(self.regs.p.is_set(V)),
            // ADC (zp),Y
            0x71 => self.rd_izy(Self::alu_adc),
            // ADC zp,X
            0x75 => self.rd_zpx(Self::alu_adc),
            // ROR zp,X
            0x76 => self.rmw_zpx(Self::alu_ror),
            // SEI
            0x78 => self.fl(I, true),
            // ADC abs,Y
            0x79 => self.rd_aby(Self::alu_adc),
            // ADC abs,X
            0x7D => self.rd_abx(Self::alu_adc),
            // ROR abs,X
            0x7E => self.rmw_abx(Self::alu_ror),

            // STA (zp,X)
            0x81 => self.wr_izx(|cpu| cpu.regs.a),
            // STY zp
            0x84 => self.wr_zp(|cpu| cpu.regs.y),
            // STA zp
            0x85 => self.wr_zp(|cpu| cpu.regs.a),
            // STX zp
            0x86 => self.wr_zp(|cpu| cpu.regs.x),
            // DEY
            0x88 => self.imp(|cpu| {
                cpu.regs.y = cpu.regs.y.wrapping_sub(1);
                cpu.regs.p.update_nz(cpu.regs.y);
            }),
            // TXA
            0x8A => self.imp(|cpu| {
                cpu.regs.a = cpu.regs.x;
                cpu.regs.p.update_nz(cpu.regs.a);
            }),
            // STY abs
            0x8C => self.wr_abs(|cpu| cpu.regs.y),
            // STA abs
            0x8D => self.wr_abs(|cpu| cpu.regs.a),
            // STX abs
            0x8E => self.wr_abs(|cpu| cpu.regs.x),

            // BCC rel
            0x90 => self.branch(!self.regs.p.is_set(C)),
            // STA (zp),Y
            0x91 => self.wr_izy(|cpu| cpu.regs.a),
            // STY zp,X
            0x94 => self.wr_zpx(|cpu| cpu.regs.y),
            // STA zp,X
            0x95 => self.wr_zpx(|cpu| cpu.regs.a),
            // STX zp,Y
            0x96 => self.wr_zpy(|cpu| cpu.regs.x),
            // TYA
            0x98 => self.imp(|cpu| {
                cpu.regs.a = cpu.regs.y;
                cpu.regs.p.update_nz(cpu.regs.a);
            }),
            // STA abs,Y
            0x99 => self.wr_aby(|cpu| cpu.regs.a),
            // TXS (no flags)
            0x9A => self.imp(|cpu| cpu.regs.s = cpu.regs.x),
            // STA abs,X
            0x9D => self.wr_abx(|cpu| cpu.regs.a),

            // LDY #imm
            0xA0 => self.rd_imm(Self::alu_ldy),
            // LDA (zp,X)
            0xA1 => self.rd_izx(Self::alu_lda),
            // LDX #imm
            0xA2 => self.rd_imm(Self::alu_ldx),
            // LDY zp
            0xA4 => self.rd_zp(Self::alu_ldy),
            // LDA zp
            0xA5 => self.rd_zp(Self::alu_lda),
            // LDX zp
            0xA6 => self.rd_zp(Self::alu_ldx),
            // TAY
            0xA8 => self.imp(|cpu| {
                cpu.regs.y = cpu.regs.a;
                cpu.regs.p.update_nz(cpu.regs.y);
            }),
            // LDA #imm
            0xA9 => self.rd_imm(Self::alu_lda),
            // TAX
            0xAA => self.imp(|cpu| {
                cpu.regs.x = cpu.regs.a;
                cpu.regs.p.update_nz(cpu.regs.x);
            }),
            // LDY abs
            0xAC => self.rd_abs(Self::alu_ldy),
            // LDA abs
            0xAD => self.rd_abs(Self::alu_lda),
            // LDX abs
            0xAE => self.rd_abs(Self::alu_ldx),

            // BCS rel
            0xB0 => self.branch(self.regs.p.is_set(C)),
            // LDA (zp),Y
            0xB1 => self.rd_izy(Self::alu_lda),
            // LDY zp,X
            0xB4 => self.rd_zpx(Self::alu_ldy),
            // LDA zp,X
            0xB5 => self.rd_zpx(Self::alu_lda),
            // LDX zp,Y
            0xB6 => self.rd_zpy(Self::alu_ldx),
            // CLV
            0xB8 => self.fl(V, false),
            // LDA abs,Y
            0xB9 => self.rd_aby(Self::alu_lda),
            // TSX
            0xBA => self.imp(|cpu| {
                cpu.regs.x = cpu.regs.s;
                cpu.regs.p.update_nz(cpu.regs.x);
            }),
            // LDY abs,X
            0xBC => self.rd_abx(Self::alu_ldy),
            // LDA abs,X
            0xBD => self.rd_abx(Self::alu_lda),
            // LDX abs,Y
            0xBE => self.rd_aby(Self::alu_ldx),

            // CPY #imm
            0xC0 => self.rd_imm(Self::alu_cpy),
            // CMP (zp,X)
            0xC1 => self.rd_izx(Self::alu_cmp),
            // CPY zp
            0xC4 => self.rd_zp(Self::alu_cpy),
            // CMP zp
            0xC5 => self.rd_zp(Self::alu_cmp),
            // DEC zp
            0xC6 => self.rmw_zp(Self::alu_dec),
            // INY
            0xC8 => self.imp(|cpu| {
                cpu.regs.y = cpu.regs.y.wrapping_add(1);
                cpu.regs.p.update_nz(cpu.regs.y);
            }),
            // CMP #imm
            0xC9 => self.rd_imm(Self::alu_cmp),
            // DEX
            0xCA => self.imp(|cpu| {
                cpu.regs.x = cpu.regs.x.wrapping_sub(1);
                cpu.regs.p.update_nz(cpu.regs.x);
            }),
            // CPY abs
            0xCC => self.rd_abs(Self::alu_cpy),
            // CMP abs
            0xCD => self.rd_abs(Self::alu_cmp),
            // DEC abs
            0xCE => self.rmw_abs(Self::alu_dec),

            // BNE rel
            0xD0 => self.branch(!self.regs.p.is_set(Z)),
            // CMP (zp),Y
            0xD1 => self.rd_izy(Self::alu_cmp),
            // CMP zp,X
            0xD5 => self.rd_zpx(Self::alu_cmp),
            // DEC zp,X
            0xD6 => self.rmw_zpx(Self::alu_dec),
            // CLD
            0xD8 => self.fl(D, false),
            // CMP abs,Y
            0xD9 => self.rd_aby(Self::alu_cmp),
            // CMP abs,X
            0xDD => self.rd_abx(Self::alu_cmp),
            // DEC abs,X
            0xDE => self.rmw_abx(Self::alu_dec),

            // CPX #imm
            0xE0 => self.rd_imm(Self::alu_cpx),
            // SBC (zp,X)
            0xE1 => self.rd_izx(Self::alu_sbc),
            // CPX zp
            0xE4 => self.rd_zp(Self::alu_cpx),
            // SBC zp
            0xE5 => self.rd_zp(Self::alu_sbc),
            // INC zp
            0xE6 => self.rmw_zp(Self::alu_inc),
            // INX
            0xE8 => self.imp(|cpu| {
                cpu.regs.x = cpu.regs.x.wrapping_add(1);
                cpu.regs.p.update_nz(cpu.regs.x);
            }),
            // SBC #imm
            0xE9 => self.rd_imm(Self::alu_sbc),
            // CPX abs
            0xEC => self.rd_abs(Self::alu_cpx),
            // SBC abs
            0xED => self.rd_abs(Self::alu_sbc),
            // INC abs
            0xEE => self.rmw_abs(Self::alu_inc),

            // BEQ rel
            0xF0 => self.branch(self.regs.p.is_set(Z)),
            // SBC (zp),Y
            0xF1 => self.rd_izy(Self::alu_sbc),
            // SBC zp,X
            0xF5 => self.rd_zpx(Self::alu_sbc),
            // INC zp,X
            0xF6 => self.rmw_zpx(Self::alu_inc),
            // SED
            0xF8 => self.fl(D, true),
            // SBC abs,Y
            0xF9 => self.rd_aby(Self::alu_sbc),
            // SBC abs,X
            0xFD => self.rd_abx(Self::alu_sbc),
            // INC abs,X
            0xFE => self.rmw_abx(Self::alu_inc),

            // Every unmapped value, including NOP itself: consume the fetch
            // cycle and retire. Never fatal.
            _ => self.op_nop(),
        }
    }
}

impl Device for Mos6510 {
    fn evaluate(&mut self, board: &mut Board) {
        let nmi = board.is_high(self.nmi);
        if self.last_nmi && !nmi {
            self.nmi_pending = true;
        }
        if !board.is_high(self.irq) && !self.regs.p.is_set(I) {
            self.irq_pending = true;
        }

        let clk = board.is_high(self.clk);
        if clk != self.last_clk {
            if self.last_clk {
                self.publish(board);
            } else {
                self.execute(board);
            }
        }

        self.last_nmi = nmi;
        self.last_clk = clk;
    }
}

impl Observable for Mos6510 {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "pc" => Some(self.regs.pc.into()),
            "a" => Some(self.regs.a.into()),
            "x" => Some(self.regs.x.into()),
            "y" => Some(self.regs.y.into()),
            "s" | "sp" => Some(self.regs.s.into()),
            "p" | "status" => Some(self.regs.p.0.into()),
            "flags.c" => Some(self.regs.p.is_set(C).into()),
            "flags.z" => Some(self.regs.p.is_set(Z).into()),
            "flags.i" => Some(self.regs.p.is_set(I).into()),
            "flags.d" => Some(self.regs.p.is_set(D).into()),
            "flags.b" => Some(self.regs.p.is_set(B).into()),
            "flags.v" => Some(self.regs.p.is_set(V).into()),
            "flags.n" => Some(self.regs.p.is_set(N).into()),
            "instr" => Some(self.instr.into()),
            "step" => Some(self.cycle.into()),
            "addr" => Some(self.ad_buf.into()),
            "data" => Some(self.dt_buf.into()),
            "write" => Some(self.io_write.into()),
            "pending.nmi" => Some(self.nmi_pending.into()),
            "pending.irq" => Some(self.irq_pending.into()),
            "pending.reset" => Some(self.reset_pending.into()),
            "cycles" => Some(Value::U64(self.total_cycles)),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "pc",
            "a",
            "x",
            "y",
            "s",
            "p",
            "flags.c",
            "flags.z",
            "flags.i",
            "flags.d",
            "flags.b",
            "flags.v",
            "flags.n",
            "instr",
            "step",
            "addr",
            "data",
            "write",
            "pending.nmi",
            "pending.irq",
            "pending.reset",
            "cycles",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::U;
    use sim_core::{Board, Device, NetId};

    /// Flat 64K memory answering the CPU's published bus state.
    struct TestRam {
        store: Vec<u8>,
        addr: NetId,
        data: NetId,
        rw: NetId,
    }

    impl TestRam {
        fn new(addr: NetId, data: NetId, rw: NetId) -> Self {
            Self {
                store: vec![0; 0x1_0000],
                addr,
                data,
                rw,
            }
        }

        fn load(&mut self, base: u16, bytes: &[u8]) {
            for (i, &b) in bytes.iter().enumerate() {
                self.store[base as usize + i] = b;
            }
        }
    }

    impl Device for TestRam {
        fn evaluate(&mut self, board: &mut Board) {
            let addr = board.read(self.addr) as usize;
            if board.is_high(self.rw) {
                board.write(self.data, u32::from(self.store[addr]));
            } else {
                self.store[addr] = board.read(self.data) as u8;
            }
        }
    }

    /// CPU + RAM on a board, clock divided by one. Two board ticks make one
    /// CPU cycle (falling then rising edge).
    struct Rig {
        board: Board,
        cpu: Mos6510,
        ram: TestRam,
        nmi: NetId,
        irq: NetId,
        irq_low: bool,
    }

    impl Rig {
        fn new() -> Self {
            let mut board = Board::new();
            let addr = board.bus(16);
            let data = board.bus(8);
            let sync = board.line();
            let rw = board.line();
            let clk = board.clock(true, 1);
            let irq = board.open_collector();
            let nmi = board.line();
            board.write_level(nmi, true);
            let cpu = Mos6510::new(&board, addr, data, sync, rw, clk, irq, nmi);
            let ram = TestRam::new(addr, data, rw);
            let mut rig = Self {
                board,
                cpu,
                ram,
                nmi,
                irq,
                irq_low: false,
            };
            // Swallow the first, edge-free tick so every later pair of
            // ticks is one falling edge followed by one rising edge.
            rig.tick();
            rig
        }

        fn tick(&mut self) {
            self.board.begin_tick();
            if self.irq_low {
                self.board.write_level(self.irq, false);
            }
            self.cpu.evaluate(&mut self.board);
            self.ram.evaluate(&mut self.board);
            self.board.advance_clocks();
        }

        /// Run whole CPU cycles.
        fn step(&mut self, cycles: usize) {
            for _ in 0..cycles {
                self.tick();
                self.tick();
            }
        }

        /// Run the reset pseudo-instruction to completion.
        fn boot(&mut self) {
            self.step(3);
        }

        fn set_nmi(&mut self, level: bool) {
            self.board.write_level(self.nmi, level);
        }
    }

    #[test]
    fn reset_establishes_registers_and_vectors() {
        let mut rig = Rig::new();
        rig.ram.load(0xFFFC, &[0x00, 0x02]);
        rig.boot();

        assert_eq!(rig.cpu.regs.pc, 0x0200);
        assert_eq!(rig.cpu.regs.s, 0xFF);
        assert_eq!(rig.cpu.regs.p.0, 0x30);
        assert_eq!(rig.cpu.regs.a, 0);
        assert_eq!(rig.cpu.regs.x, 0);
        assert_eq!(rig.cpu.regs.y, 0);
        assert!(!rig.cpu.reset_pending);
    }

    #[test]
    fn lda_immediate() {
        let mut rig = Rig::new();
        rig.ram.load(0xFFFC, &[0x00, 0x02]);
        rig.ram.load(0x0200, &[0xA9, 0x42]);
        rig.boot();

        rig.step(2);
        assert_eq!(rig.cpu.regs.a, 0x42);
        assert_eq!(rig.cpu.regs.pc, 0x0202);
        assert!(!rig.cpu.regs.p.is_set(Z));
        assert!(!rig.cpu.regs.p.is_set(N));
    }

    #[test]
    fn adc_without_overflow() {
        let mut rig = Rig::new();
        rig.ram.load(0xFFFC, &[0x00, 0x02]);
        // LDA #$50 / ADC #$10
        rig.ram.load(0x0200, &[0xA9, 0x50, 0x69, 0x10]);
        rig.boot();

        rig.step(4);
        assert_eq!(rig.cpu.regs.a, 0x60);
        assert!(!rig.cpu.regs.p.is_set(C));
        assert!(!rig.cpu.regs.p.is_set(V));
        assert!(!rig.cpu.regs.p.is_set(N));
        assert!(!rig.cpu.regs.p.is_set(Z));
    }

    #[test]
    fn adc_same_sign_operands_overflow() {
        let mut rig = Rig::new();
        rig.ram.load(0xFFFC, &[0x00, 0x02]);
        // LDA #$50 / ADC #$50
        rig.ram.load(0x0200, &[0xA9, 0x50, 0x69, 0x50]);
        rig.boot();

        rig.step(4);
        assert_eq!(rig.cpu.regs.a, 0xA0);
        assert!(rig.cpu.regs.p.is_set(V));
        assert!(rig.cpu.regs.p.is_set(N));
        assert!(!rig.cpu.regs.p.is_set(C));
    }

    #[test]
    fn branch_not_taken_consumes_both_bytes() {
        let mut rig = Rig::new();
        rig.ram.load(0xFFFC, &[0x00, 0x02]);
        // LDA #$00 sets Z, so BNE falls through.
        rig.ram.load(0x0200, &[0xA9, 0x00, 0xD0, 0x05]);
        rig.boot();

        rig.step(4);
        assert_eq!(rig.cpu.regs.pc, 0x0204);
    }

    #[test]
    fn branch_taken_offsets_pc() {
        let mut rig = Rig::new();
        rig.ram.load(0xFFFC, &[0x00, 0x02]);
        // LDA #$01 clears Z, so BNE jumps forward five bytes.
        rig.ram.load(0x0200, &[0xA9, 0x01, 0xD0, 0x05]);
        rig.boot();

        rig.step(4);
        assert_eq!(rig.cpu.regs.pc, 0x0209);
    }

    #[test]
    fn backward_branch_wraps_through_the_operand() {
        let mut rig = Rig::new();
        rig.ram.load(0xFFFC, &[0x00, 0x02]);
        // BNE -2 with Z clear loops back onto the branch itself.
        rig.ram.load(0x0200, &[0xA9, 0x01, 0xD0, 0xFE]);
        rig.boot();

        rig.step(4);
        assert_eq!(rig.cpu.regs.pc, 0x0202);
    }

    #[test]
    fn sta_zero_page_writes_through_the_nets() {
        let mut rig = Rig::new();
        rig.ram.load(0xFFFC, &[0x00, 0x02]);
        rig.ram.load(0x0200, &[0xA9, 0x55, 0x85, 0x10]);
        rig.boot();

        rig.step(5);
        assert_eq!(rig.ram.store[0x0010], 0x55);
        assert_eq!(rig.cpu.regs.pc, 0x0204);
    }

    #[test]
    fn asl_zero_page_read_modify_write() {
        let mut rig = Rig::new();
        rig.ram.load(0xFFFC, &[0x00, 0x02]);
        rig.ram.load(0x0200, &[0x06, 0x20]);
        rig.ram.load(0x0020, &[0x41]);
        rig.boot();

        rig.step(5);
        assert_eq!(rig.ram.store[0x0020], 0x82);
        assert!(rig.cpu.regs.p.is_set(N));
        assert!(!rig.cpu.regs.p.is_set(C));
    }

    #[test]
    fn jsr_then_rts_returns_past_the_call() {
        let mut rig = Rig::new();
        rig.ram.load(0xFFFC, &[0x00, 0x02]);
        rig.ram.load(0x0200, &[0x20, 0x00, 0x03]);
        rig.ram.load(0x0300, &[0x60]);
        rig.boot();

        rig.step(6);
        assert_eq!(rig.cpu.regs.pc, 0x0300);
        assert_eq!(rig.cpu.regs.s, 0xFD);
        assert_eq!(rig.ram.store[0x01FF], 0x02);
        assert_eq!(rig.ram.store[0x01FE], 0x02);

        rig.step(5);
        assert_eq!(rig.cpu.regs.pc, 0x0203);
        assert_eq!(rig.cpu.regs.s, 0xFF);
    }

    #[test]
    fn stack_round_trip_with_pha_pla() {
        let mut rig = Rig::new();
        rig.ram.load(0xFFFC, &[0x00, 0x02]);
        // LDA #$7F / PHA / LDA #$00 / PLA
        rig.ram.load(0x0200, &[0xA9, 0x7F, 0x48, 0xA9, 0x00, 0x68]);
        rig.boot();

        rig.step(2 + 3 + 2 + 4);
        assert_eq!(rig.cpu.regs.a, 0x7F);
        assert_eq!(rig.cpu.regs.s, 0xFF);
        assert!(!rig.cpu.regs.p.is_set(Z));
    }

    #[test]
    fn unmapped_opcode_retires_as_a_two_cycle_nop() {
        let mut rig = Rig::new();
        rig.ram.load(0xFFFC, &[0x00, 0x02]);
        rig.ram.load(0x0200, &[0x02, 0xEA]);
        rig.boot();

        rig.step(2);
        assert_eq!(rig.cpu.regs.pc, 0x0201);
        rig.step(2);
        assert_eq!(rig.cpu.regs.pc, 0x0202);
    }

    #[test]
    fn irq_held_off_until_interrupt_disable_clears() {
        let mut rig = Rig::new();
        rig.ram.load(0xFFFC, &[0x00, 0x02]);
        rig.ram.load(0xFFFE, &[0x00, 0x03]);
        // SEI / NOP / CLI / NOP
        rig.ram.load(0x0200, &[0x78, 0xEA, 0x58, 0xEA]);
        rig.boot();

        rig.step(2); // SEI
        rig.irq_low = true;

        rig.step(2); // NOP executes untouched while I is set
        assert_eq!(rig.cpu.regs.pc, 0x0202);
        assert!(!rig.cpu.irq_pending);

        rig.step(2); // CLI; the level latches as soon as I clears
        assert!(rig.cpu.irq_pending);

        rig.step(7); // service sequence
        rig.irq_low = false;
        assert_eq!(rig.cpu.regs.pc, 0x0300);
        assert_eq!(rig.cpu.regs.s, 0xFC);
        // Return address is the preempted instruction at $0203.
        assert_eq!(rig.ram.store[0x01FF], 0x02);
        assert_eq!(rig.ram.store[0x01FE], 0x03);
        // Stacked status has B clear and I not yet forced.
        assert_eq!(rig.ram.store[0x01FD], U);
    }

    #[test]
    fn nmi_triggers_on_the_falling_edge_only() {
        let mut rig = Rig::new();
        rig.ram.load(0xFFFC, &[0x00, 0x02]);
        rig.ram.load(0xFFFA, &[0x00, 0x04]);
        rig.ram.load(0x0200, &[0xEA, 0xEA, 0xEA]);
        rig.ram.load(0x0400, &[0xEA]);
        rig.boot();

        rig.step(2); // first NOP
        rig.set_nmi(false);

        rig.step(7); // service sequence preempts the next fetch
        assert_eq!(rig.cpu.regs.pc, 0x0400);
        assert_eq!(rig.ram.store[0x01FF], 0x02);
        assert_eq!(rig.ram.store[0x01FE], 0x01);

        // The line is still low; without a new edge no second service runs.
        rig.step(2);
        assert_eq!(rig.cpu.regs.pc, 0x0401);
        assert!(!rig.cpu.nmi_pending);
    }

    #[test]
    fn reset_request_preempts_the_next_fetch() {
        let mut rig = Rig::new();
        rig.ram.load(0xFFFC, &[0x00, 0x02]);
        rig.ram.load(0x0200, &[0xA9, 0x42]);
        rig.boot();
        rig.step(2);
        assert_eq!(rig.cpu.regs.a, 0x42);

        rig.cpu.request_reset();
        rig.step(3);
        assert_eq!(rig.cpu.regs.a, 0);
        assert_eq!(rig.cpu.regs.pc, 0x0200);
        assert_eq!(rig.cpu.regs.s, 0xFF);
    }

    #[test]
    fn observable_paths_cover_the_register_file() {
        let mut rig = Rig::new();
        rig.ram.load(0xFFFC, &[0x00, 0x02]);
        rig.boot();

        assert_eq!(rig.cpu.query("pc"), Some(Value::U16(0x0200)));
        assert_eq!(rig.cpu.query("s"), Some(Value::U8(0xFF)));
        assert_eq!(rig.cpu.query("flags.i"), Some(Value::Bool(false)));
        assert_eq!(rig.cpu.query("pending.reset"), Some(Value::Bool(false)));
        assert_eq!(rig.cpu.query("nonsense"), None);
        for path in rig.cpu.query_paths() {
            assert!(rig.cpu.query(path).is_some(), "path {path} must resolve");
        }
    }
}
