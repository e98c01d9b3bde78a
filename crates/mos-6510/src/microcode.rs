//! Micro-step library: addressing-mode sequences, instruction families and
//! the interrupt pseudo-instructions.
//!
//! Every function here is a pure transition over the CPU's registers and
//! staging buffers, keyed on the micro-step cycle index. An address staged
//! in cycle *k* is published at the following falling clock edge, so the
//! byte it selects arrives in `dt_buf` at cycle *k+1*.
//!
//! Mode functions stage operand addresses and advance the program counter;
//! family helpers (`rd_*`, `wr_*`, `rmw_*`) compose a mode with an
//! operation callback at the mode's completion cycle.

use crate::Mos6510;
use crate::flags::{B, C, I, N, Status, V};

impl Mos6510 {
    // ------------------------------------------------------------------
    // Retire helpers
    // ------------------------------------------------------------------

    /// End the instruction without touching the program counter (jumps,
    /// branches and interrupt sequences set PC themselves).
    pub(crate) fn finish(&mut self) {
        self.done = true;
    }

    /// Step past the last operand byte and end the instruction.
    pub(crate) fn retire(&mut self) {
        self.regs.pc = self.regs.pc.wrapping_add(1);
        self.finish();
    }

    fn bump_pc(&mut self) {
        self.regs.pc = self.regs.pc.wrapping_add(1);
    }

    // ------------------------------------------------------------------
    // Addressing-mode sequences
    // ------------------------------------------------------------------

    /// Immediate: stage a read of the operand byte.
    fn mode_imm(&mut self) {
        if self.cycle == 0 {
            self.bump_pc();
            self.ad_buf = self.regs.pc;
        }
    }

    /// Zero page: operand byte is the effective address.
    fn mode_zp(&mut self) {
        match self.cycle {
            0 => {
                self.bump_pc();
                self.ad_buf = self.regs.pc;
            }
            1 => {
                self.buf[0] = self.dt_buf;
                self.ad_buf = self.dt_buf.into();
            }
            _ => {}
        }
    }

    /// Zero page indexed by X; the sum wraps within the page.
    fn mode_zpx(&mut self) {
        match self.cycle {
            0 => {
                self.bump_pc();
                self.ad_buf = self.regs.pc;
            }
            1 => {
                self.dt_buf = self.dt_buf.wrapping_add(self.regs.x);
                self.buf[0] = self.dt_buf;
                self.ad_buf = self.dt_buf.into();
            }
            _ => {}
        }
    }

    /// Zero page indexed by Y.
    fn mode_zpy(&mut self) {
        match self.cycle {
            0 => {
                self.bump_pc();
                self.ad_buf = self.regs.pc;
            }
            1 => {
                self.dt_buf = self.dt_buf.wrapping_add(self.regs.y);
                self.buf[0] = self.dt_buf;
                self.ad_buf = self.dt_buf.into();
            }
            _ => {}
        }
    }

    /// Absolute: two operand bytes, little endian.
    fn mode_abs(&mut self) {
        match self.cycle {
            0 => {
                self.bump_pc();
                self.ad_buf = self.regs.pc;
            }
            1 => {
                self.buf[0] = self.dt_buf;
                self.bump_pc();
                self.ad_buf = self.regs.pc;
            }
            2 => {
                self.buf[1] = self.dt_buf;
                self.ad_buf = u16::from_le_bytes([self.buf[0], self.buf[1]]);
            }
            _ => {}
        }
    }

    /// Absolute indexed by X. No page-cross penalty cycle.
    fn mode_abx(&mut self) {
        self.mode_abs_indexed(self.regs.x);
    }

    /// Absolute indexed by Y.
    fn mode_aby(&mut self) {
        self.mode_abs_indexed(self.regs.y);
    }

    fn mode_abs_indexed(&mut self, index: u8) {
        match self.cycle {
            0 => {
                self.bump_pc();
                self.ad_buf = self.regs.pc;
            }
            1 => {
                self.buf[0] = self.dt_buf;
                self.bump_pc();
                self.ad_buf = self.regs.pc;
            }
            2 => {
                let base = u16::from_le_bytes([self.buf[0], self.dt_buf]);
                self.ad_buf = base.wrapping_add(index.into());
                [self.buf[0], self.buf[1]] = self.ad_buf.to_le_bytes();
            }
            _ => {}
        }
    }

    /// Indexed indirect (zp,X): pointer byte plus X selects a zero-page
    /// word holding the effective address.
    fn mode_izx(&mut self) {
        match self.cycle {
            0 => {
                self.bump_pc();
                self.ad_buf = self.regs.pc;
            }
            1 => {
                self.buf[0] = self.dt_buf.wrapping_add(self.regs.x);
            }
            2 => {
                self.ad_buf = self.buf[0].into();
            }
            3 => {
                self.buf[0] = self.dt_buf;
                self.ad_buf = self.ad_buf.wrapping_add(1);
            }
            4 => {
                self.buf[1] = self.dt_buf;
                self.ad_buf = u16::from_le_bytes([self.buf[0], self.buf[1]]);
            }
            _ => {}
        }
    }

    /// Indirect indexed (zp),Y: zero-page word plus Y.
    fn mode_izy(&mut self) {
        match self.cycle {
            0 => {
                self.bump_pc();
                self.ad_buf = self.regs.pc;
            }
            1 => {
                self.ad_buf = self.dt_buf.into();
            }
            2 => {
                self.buf[0] = self.dt_buf;
                self.ad_buf = self.ad_buf.wrapping_add(1);
            }
            3 => {
                let base = u16::from_le_bytes([self.buf[0], self.dt_buf]);
                self.ad_buf = base.wrapping_add(self.regs.y.into());
                [self.buf[0], self.buf[1]] = self.ad_buf.to_le_bytes();
            }
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Instruction families
    // ------------------------------------------------------------------

    pub(crate) fn rd_imm(&mut self, op: fn(&mut Self)) {
        self.mode_imm();
        if self.cycle == 1 {
            op(self);
            self.retire();
        }
    }

    pub(crate) fn rd_zp(&mut self, op: fn(&mut Self)) {
        self.mode_zp();
        if self.cycle == 2 {
            op(self);
            self.retire();
        }
    }

    pub(crate) fn rd_zpx(&mut self, op: fn(&mut Self)) {
        self.mode_zpx();
        match self.cycle {
            2 => op(self),
            3 => self.retire(),
            _ => {}
        }
    }

    pub(crate) fn rd_zpy(&mut self, op: fn(&mut Self)) {
        self.mode_zpy();
        match self.cycle {
            2 => op(self),
            3 => self.retire(),
            _ => {}
        }
    }

    pub(crate) fn rd_abs(&mut self, op: fn(&mut Self)) {
        self.mode_abs();
        if self.cycle == 3 {
            op(self);
            self.retire();
        }
    }

    pub(crate) fn rd_abx(&mut self, op: fn(&mut Self)) {
        self.mode_abx();
        if self.cycle == 3 {
            op(self);
            self.retire();
        }
    }

    pub(crate) fn rd_aby(&mut self, op: fn(&mut Self)) {
        self.mode_aby();
        if self.cycle == 3 {
            op(self);
            self.retire();
        }
    }

    pub(crate) fn rd_izx(&mut self, op: fn(&mut Self)) {
        self.mode_izx();
        if self.cycle == 5 {
            op(self);
            self.retire();
        }
    }

    pub(crate) fn rd_izy(&mut self, op: fn(&mut Self)) {
        self.mode_izy();
        if self.cycle == 4 {
            op(self);
            self.retire();
        }
    }

    /// Stage a register byte for writing at the mode's address.
    fn store(&mut self, src: fn(&Self) -> u8) {
        self.dt_buf = src(self);
        self.io_write = true;
    }

    pub(crate) fn wr_zp(&mut self, src: fn(&Self) -> u8) {
        self.mode_zp();
        match self.cycle {
            1 => self.store(src),
            2 => self.retire(),
            _ => {}
        }
    }

    pub(crate) fn wr_zpx(&mut self, src: fn(&Self) -> u8) {
        self.mode_zpx();
        match self.cycle {
            1 => self.store(src),
            3 => self.retire(),
            _ => {}
        }
    }

    pub(crate) fn wr_zpy(&mut self, src: fn(&Self) -> u8) {
        self.mode_zpy();
        match self.cycle {
            1 => self.store(src),
            3 => self.retire(),
            _ => {}
        }
    }

    pub(crate) fn wr_abs(&mut self, src: fn(&Self) -> u8) {
        self.mode_abs();
        match self.cycle {
            2 => self.store(src),
            3 => self.retire(),
            _ => {}
        }
    }

    pub(crate) fn wr_abx(&mut self, src: fn(&Self) -> u8) {
        self.mode_abx();
        match self.cycle {
            2 => self.store(src),
            4 => self.retire(),
            _ => {}
        }
    }

    pub(crate) fn wr_aby(&mut self, src: fn(&Self) -> u8) {
        self.mode_aby();
        match self.cycle {
            2 => self.store(src),
            4 => self.retire(),
            _ => {}
        }
    }

    pub(crate) fn wr_izx(&mut self, src: fn(&Self) -> u8) {
        self.mode_izx();
        match self.cycle {
            4 => self.store(src),
            5 => self.retire(),
            _ => {}
        }
    }

    pub(crate) fn wr_izy(&mut self, src: fn(&Self) -> u8) {
        self.mode_izy();
        match self.cycle {
            3 => self.store(src),
            5 => self.retire(),
            _ => {}
        }
    }

    pub(crate) fn rmw_zp(&mut self, op: fn(&mut Self)) {
        self.mode_zp();
        match self.cycle {
            2 => op(self),
            4 => self.retire(),
            _ => {}
        }
    }

    pub(crate) fn rmw_zpx(&mut self, op: fn(&mut Self)) {
        self.mode_zpx();
        match self.cycle {
            2 => op(self),
            5 => self.retire(),
            _ => {}
        }
    }

    pub(crate) fn rmw_abs(&mut self, op: fn(&mut Self)) {
        self.mode_abs();
        match self.cycle {
            3 => op(self),
            5 => self.retire(),
            _ => {}
        }
    }

    pub(crate) fn rmw_abx(&mut self, op: fn(&mut Self)) {
        self.mode_abx();
        match self.cycle {
            3 => op(self),
            6 => self.retire(),
            _ => {}
        }
    }

    /// Accumulator variant of a read-modify-write operation: run it on A
    /// through the data buffer and cancel the staged memory write.
    pub(crate) fn acc(&mut self, op: fn(&mut Self)) {
        match self.cycle {
            0 => {
                self.dt_buf = self.regs.a;
                op(self);
                self.regs.a = self.dt_buf;
                self.io_write = false;
            }
            1 => self.retire(),
            _ => {}
        }
    }

    /// Single-cycle implied operation plus retire.
    pub(crate) fn imp(&mut self, op: fn(&mut Self)) {
        match self.cycle {
            0 => op(self),
            1 => self.retire(),
            _ => {}
        }
    }

    /// Set or clear one status flag.
    pub(crate) fn fl(&mut self, flag: u8, set: bool) {
        match self.cycle {
            0 => self.regs.p.set_if(flag, set),
            1 => self.retire(),
            _ => {}
        }
    }

    /// Conditional relative branch. Both operand bytes are consumed either
    /// way; a taken branch additionally offsets PC by the signed operand.
    pub(crate) fn branch(&mut self, taken: bool) {
        match self.cycle {
            0 => {
                self.bump_pc();
                self.ad_buf = self.regs.pc;
                self.bump_pc();
            }
            1 => {
                if taken {
                    let offset = i16::from(self.dt_buf as i8);
                    self.regs.pc = self.regs.pc.wrapping_add(offset as u16);
                }
                self.finish();
            }
            _ => {}
        }
    }

    /// Push one byte: stage the write at the stack address, then drop the
    /// stack pointer.
    pub(crate) fn push(&mut self, src: fn(&Self) -> u8) {
        match self.cycle {
            0 => {
                self.ad_buf = self.regs.stack_addr();
                self.dt_buf = src(self);
                self.io_write = true;
            }
            1 => self.regs.s = self.regs.s.wrapping_sub(1),
            2 => self.retire(),
            _ => {}
        }
    }

    /// Pull one byte: raise the stack pointer, stage the read, hand the
    /// sampled byte to the destination.
    pub(crate) fn pull(&mut self, dst: fn(&mut Self, u8)) {
        match self.cycle {
            0 => {
                self.regs.s = self.regs.s.wrapping_add(1);
                self.ad_buf = self.regs.stack_addr();
            }
            1 => dst(self, self.dt_buf),
            3 => self.retire(),
            _ => {}
        }
    }

    /// The unmapped-opcode placeholder (and NOP itself): consume the fetch
    /// cycle, retire on the next.
    pub(crate) fn op_nop(&mut self) {
        if self.cycle == 1 {
            self.retire();
        }
    }

    // ------------------------------------------------------------------
    // ALU operations over the data buffer
    // ------------------------------------------------------------------

    pub(crate) fn alu_lda(&mut self) {
        self.regs.a = self.dt_buf;
        self.regs.p.update_nz(self.regs.a);
    }

    pub(crate) fn alu_ldx(&mut self) {
        self.regs.x = self.dt_buf;
        self.regs.p.update_nz(self.regs.x);
    }

    pub(crate) fn alu_ldy(&mut self) {
        self.regs.y = self.dt_buf;
        self.regs.p.update_nz(self.regs.y);
    }

    pub(crate) fn alu_ora(&mut self) {
        self.regs.a |= self.dt_buf;
        self.regs.p.update_nz(self.regs.a);
    }

    pub(crate) fn alu_and(&mut self) {
        self.regs.a &= self.dt_buf;
        self.regs.p.update_nz(self.regs.a);
    }

    pub(crate) fn alu_eor(&mut self) {
        self.regs.a ^= self.dt_buf;
        self.regs.p.update_nz(self.regs.a);
    }

    /// Add with carry. Carry out on an unsigned sum of 0x100 or more;
    /// overflow when both operands share a sign the result does not.
    pub(crate) fn alu_adc(&mut self) {
        let a = self.regs.a;
        let m = self.dt_buf;
        let carry = u8::from(self.regs.p.is_set(C));
        let sum = u16::from(a) + u16::from(m) + u16::from(carry);
        let result = sum as u8;
        self.regs.p.update_nz(result);
        self.regs.p.set_if(C, sum >= 0x100);
        self.regs
            .p
            .set_if(V, !(a ^ m) & (a ^ result) & 0x80 != 0);
        self.regs.a = result;
    }

    /// Subtract with borrow. Carry means no unsigned underflow; overflow is
    /// the addition rule applied to the negated subtrahend.
    pub(crate) fn alu_sbc(&mut self) {
        let a = self.regs.a;
        let m = self.dt_buf;
        let borrow = u8::from(!self.regs.p.is_set(C));
        let result = a.wrapping_sub(m).wrapping_sub(borrow);
        self.regs.p.update_nz(result);
        self.regs
            .p
            .set_if(C, u16::from(a) >= u16::from(m) + u16::from(borrow));
        let neg_m = 0u8.wrapping_sub(m);
        self.regs
            .p
            .set_if(V, !(a ^ neg_m) & (a ^ result) & 0x80 != 0);
        self.regs.a = result;
    }

    fn compare(&mut self, reg: u8) {
        let m = self.dt_buf;
        self.regs.p.update_nz(reg.wrapping_sub(m));
        self.regs.p.set_if(C, reg >= m);
    }

    pub(crate) fn alu_cmp(&mut self) {
        self.compare(self.regs.a);
    }

    pub(crate) fn alu_cpx(&mut self) {
        self.compare(self.regs.x);
    }

    pub(crate) fn alu_cpy(&mut self) {
        self.compare(self.regs.y);
    }

    /// BIT: Z from A AND memory, N and V copied straight from the operand.
    pub(crate) fn alu_bit(&mut self) {
        let m = self.dt_buf;
        self.regs.p.update_nz(self.regs.a & m);
        self.regs.p.set_if(N, m & 0x80 != 0);
        self.regs.p.set_if(V, m & 0x40 != 0);
    }

    // Shift/rotate/step operations mutate the data buffer and stage the
    // write-back; the accumulator wrapper cancels the write.

    pub(crate) fn alu_asl(&mut self) {
        let v = self.dt_buf;
        self.regs.p.set_if(C, v & 0x80 != 0);
        self.dt_buf = v << 1;
        self.regs.p.update_nz(self.dt_buf);
        self.io_write = true;
    }

    pub(crate) fn alu_lsr(&mut self) {
        let v = self.dt_buf;
        self.regs.p.set_if(C, v & 0x01 != 0);
        self.dt_buf = v >> 1;
        self.regs.p.update_nz(self.dt_buf);
        self.io_write = true;
    }

    pub(crate) fn alu_rol(&mut self) {
        let v = self.dt_buf;
        let carry_in = u8::from(self.regs.p.is_set(C));
        self.regs.p.set_if(C, v & 0x80 != 0);
        self.dt_buf = (v << 1) | carry_in;
        self.regs.p.update_nz(self.dt_buf);
        self.io_write = true;
    }

    pub(crate) fn alu_ror(&mut self) {
        let v = self.dt_buf;
        let carry_in = if self.regs.p.is_set(C) { 0x80 } else { 0 };
        self.regs.p.set_if(C, v & 0x01 != 0);
        self.dt_buf = (v >> 1) | carry_in;
        self.regs.p.update_nz(self.dt_buf);
        self.io_write = true;
    }

    pub(crate) fn alu_inc(&mut self) {
        self.dt_buf = self.dt_buf.wrapping_add(1);
        self.regs.p.update_nz(self.dt_buf);
        self.io_write = true;
    }

    pub(crate) fn alu_dec(&mut self) {
        self.dt_buf = self.dt_buf.wrapping_sub(1);
        self.regs.p.update_nz(self.dt_buf);
        self.io_write = true;
    }

    // ------------------------------------------------------------------
    // Flow-control instructions
    // ------------------------------------------------------------------

    pub(crate) fn op_jmp_abs(&mut self) {
        match self.cycle {
            0 => {
                self.bump_pc();
                self.ad_buf = self.regs.pc;
            }
            1 => {
                self.buf[0] = self.dt_buf;
                self.ad_buf = self.ad_buf.wrapping_add(1);
            }
            2 => {
                self.regs.pc = u16::from_le_bytes([self.buf[0], self.dt_buf]);
                self.finish();
            }
            _ => {}
        }
    }

    pub(crate) fn op_jmp_ind(&mut self) {
        match self.cycle {
            0 => {
                self.bump_pc();
                self.ad_buf = self.regs.pc;
            }
            1 => {
                self.buf[0] = self.dt_buf;
                self.ad_buf = self.ad_buf.wrapping_add(1);
            }
            2 => {
                self.ad_buf = u16::from_le_bytes([self.buf[0], self.dt_buf]);
            }
            3 => {
                self.buf[0] = self.dt_buf;
                self.ad_buf = self.ad_buf.wrapping_add(1);
            }
            4 => {
                self.regs.pc = u16::from_le_bytes([self.buf[0], self.dt_buf]);
                self.finish();
            }
            _ => {}
        }
    }

    /// JSR pushes the address of its own third byte; RTS adds one, landing
    /// on the next instruction.
    pub(crate) fn op_jsr(&mut self) {
        match self.cycle {
            0 => {
                let ret = self.regs.pc.wrapping_add(2);
                self.ad_buf = self.regs.stack_addr();
                self.dt_buf = (ret >> 8) as u8;
                self.io_write = true;
                self.regs.s = self.regs.s.wrapping_sub(1);
            }
            1 => {
                let ret = self.regs.pc.wrapping_add(2);
                self.ad_buf = self.regs.stack_addr();
                self.dt_buf = ret as u8;
                self.io_write = true;
                self.regs.s = self.regs.s.wrapping_sub(1);
            }
            3 => {
                self.bump_pc();
                self.ad_buf = self.regs.pc;
            }
            4 => {
                self.buf[0] = self.dt_buf;
                self.ad_buf = self.ad_buf.wrapping_add(1);
            }
            5 => {
                self.regs.pc = u16::from_le_bytes([self.buf[0], self.dt_buf]);
                self.finish();
            }
            _ => {}
        }
    }

    pub(crate) fn op_rts(&mut self) {
        match self.cycle {
            0 => {
                self.regs.s = self.regs.s.wrapping_add(1);
                self.ad_buf = self.regs.stack_addr();
            }
            1 => {
                self.buf[0] = self.dt_buf;
                self.regs.s = self.regs.s.wrapping_add(1);
                self.ad_buf = self.regs.stack_addr();
            }
            2 => {
                self.regs.pc = u16::from_le_bytes([self.buf[0], self.dt_buf]);
            }
            4 => self.retire(),
            _ => {}
        }
    }

    pub(crate) fn op_rti(&mut self) {
        match self.cycle {
            0 => {
                self.regs.s = self.regs.s.wrapping_add(1);
                self.ad_buf = self.regs.stack_addr();
            }
            1 => {
                self.regs.p = Status(self.dt_buf);
                self.regs.s = self.regs.s.wrapping_add(1);
                self.ad_buf = self.regs.stack_addr();
            }
            2 => {
                self.buf[0] = self.dt_buf;
                self.regs.s = self.regs.s.wrapping_add(1);
                self.ad_buf = self.regs.stack_addr();
            }
            3 => {
                self.regs.pc = u16::from_le_bytes([self.buf[0], self.dt_buf]);
            }
            5 => self.finish(),
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Interrupt pseudo-instructions
    // ------------------------------------------------------------------

    /// Cycles 0-2 of every interrupt shape: push PC (high then low, offset
    /// past the padding byte for BRK) and the status byte.
    fn push_interrupt_frame(&mut self, pc_offset: u16) {
        let ret = self.regs.pc.wrapping_add(pc_offset);
        match self.cycle {
            0 => {
                self.ad_buf = self.regs.stack_addr();
                self.dt_buf = (ret >> 8) as u8;
                self.io_write = true;
                self.regs.s = self.regs.s.wrapping_sub(1);
            }
            1 => {
                self.ad_buf = self.regs.stack_addr();
                self.dt_buf = ret as u8;
                self.io_write = true;
                self.regs.s = self.regs.s.wrapping_sub(1);
            }
            2 => {
                self.ad_buf = self.regs.stack_addr();
                self.dt_buf = self.regs.p.0;
                self.io_write = true;
                self.regs.s = self.regs.s.wrapping_sub(1);
            }
            _ => {}
        }
    }

    /// Load the program counter from a vector pair, high byte first.
    fn fetch_vector(&mut self, high_addr: u16) {
        match self.cycle {
            4 => {
                self.ad_buf = high_addr;
            }
            5 => {
                self.regs.pc = u16::from(self.dt_buf) << 8;
                self.ad_buf = high_addr.wrapping_sub(1);
            }
            6 => {
                self.regs.pc = self.regs.pc.wrapping_add(self.dt_buf.into());
            }
            _ => {}
        }
    }

    /// Reset: establish the power-on register file, then load PC from the
    /// reset vector.
    pub(crate) fn pi_reset(&mut self) {
        match self.cycle {
            0 => {
                self.regs = crate::Registers::new();
                self.ad_buf = 0xFFFD;
            }
            1 => {
                self.regs.pc = u16::from(self.dt_buf) << 8;
                self.ad_buf = 0xFFFC;
            }
            2 => {
                self.regs.pc = self.regs.pc.wrapping_add(self.dt_buf.into());
                self.reset_pending = false;
                self.finish();
            }
            _ => {}
        }
    }

    /// NMI service: push the frame, mask interrupts for the duration of the
    /// sequence, vector through 0xFFFA/0xFFFB.
    pub(crate) fn pi_nmi(&mut self) {
        self.push_interrupt_frame(0);
        self.fetch_vector(0xFFFB);
        match self.cycle {
            3 => self.regs.p.set(I),
            6 => {
                self.regs.p.clear(I);
                self.nmi_pending = false;
                self.irq_pending = false;
                self.finish();
            }
            _ => {}
        }
    }

    /// IRQ service: as NMI but through 0xFFFE/0xFFFF, with the break bit
    /// cleared before the push so the stacked status records a line
    /// interrupt.
    pub(crate) fn pi_irq(&mut self) {
        if self.cycle == 0 {
            self.regs.p.clear(B);
        }
        self.push_interrupt_frame(0);
        self.fetch_vector(0xFFFF);
        match self.cycle {
            3 => self.regs.p.set(I),
            6 => {
                self.regs.p.clear(I);
                self.nmi_pending = false;
                self.irq_pending = false;
                self.finish();
            }
            _ => {}
        }
    }

    /// BRK: the IRQ shape with the break bit set and a PC+2 return address.
    pub(crate) fn op_brk(&mut self) {
        if self.cycle == 0 {
            self.regs.p.set(B);
        }
        self.push_interrupt_frame(2);
        self.fetch_vector(0xFFFF);
        match self.cycle {
            3 => self.regs.p.set(I),
            6 => self.finish(),
            _ => {}
        }
    }
}
