//! The kit65 single-board machine.
//!
//! Topology (one tick = counters cleared, one evaluation pass in the order
//! below, one clock advance):
//!
//! ```text
//!   cpu ──addr──▶ decode rom ──select byte──▶ enable fan-out
//!    │                                         │ (active-low lines)
//!    ├─data─▶ rom/ram/ports ◀──enables─────────┘
//!    ├─sync─▶ shift register ─▶ inverter ─▶ nmi
//!    └─────── gpio latch ─▶ led fan-out ─▶ led lines
//! ```

mod config;

pub use config::Kit65Config;

use mos_6510::Mos6510;
use sim_core::{Board, Device, NetId, Observable, Ticks, Value};
use sim_logic::{BitFan, BitTap, Latch, NotGate, ShiftRegister, TriState};
use sim_memory::{Memory, image};

/// Net handles an embedder may drive or observe.
#[derive(Debug, Clone, Copy)]
pub struct KitNets {
    pub addr: NetId,
    pub data: NetId,
    pub sync: NetId,
    pub rw: NetId,
    pub irq: NetId,
    pub nmi: NetId,
    /// Input byte presented behind port 0 (key matrix, switches, ...).
    pub port0_in: NetId,
    /// Latched output bytes.
    pub port1_out: NetId,
    pub port2_out: NetId,
    pub gpio_out: NetId,
    /// Single-bit LED lines fanned out from the GPIO latch.
    pub leds: [NetId; 8],
}

/// The assembled machine.
pub struct Kit65 {
    board: Board,
    cpu: Mos6510,
    decode_rom: Memory,
    enable_fan: BitFan,
    rom: Memory,
    ram: Memory,
    port1: Latch,
    port0: TriState,
    port2: Latch,
    gpio: Latch,
    clear_tap: BitTap,
    timer: ShiftRegister,
    inverter: NotGate,
    led_fan: BitFan,
    clk: NetId,
    /// Handles onto the public nets.
    pub nets: KitNets,
    ticks: Ticks,
}

impl Kit65 {
    /// Assemble the board from a configuration. Fails if an image does not
    /// fit its device.
    pub fn new(config: Kit65Config) -> Result<Self, String> {
        let mut board = Board::new();

        let addr = board.bus(16);
        let data = board.bus(8);
        let sync = board.line();
        let rw = board.line();
        let nmi = board.line();
        let clk = board.clock(true, config.clock_divide);
        let irq = board.open_collector();
        let null = board.open_collector();
        let vcc = board.vcc();
        let gnd = board.gnd();

        let rom_e = board.line();
        let ram_e = board.line();
        let gpio_e = board.line();
        let port0_e = board.line();
        let port1_e = board.line();
        let port2_e = board.line();

        let decode_data = board.bus(8);
        let gpio_data = board.bus(8);
        let port0_data = board.bus(8);
        let port1_data = board.bus(8);
        let port2_data = board.bus(8);
        let shift_data = board.line();
        let shift_clear = board.line();
        let leds: [NetId; 8] = core::array::from_fn(|_| board.line());

        // The NMI line idles high so the first assertion is a clean edge.
        board.write_level(nmi, true);

        let cpu = Mos6510::new(&board, addr, data, sync, rw, clk, irq, nmi);

        let mut decode_rom = Memory::rom(gnd, 16, addr, 8, decode_data);
        image::load(&mut decode_rom, 0, &config.decode).map_err(|e| e.to_string())?;

        // Select bits 0-5 enable the devices; 6 and 7 are spare and land on
        // a collector net where concurrent writes are legal.
        let enable_fan = BitFan::new(
            decode_data,
            [rom_e, ram_e, gpio_e, port0_e, port1_e, port2_e, null, null],
        );

        let mut rom = Memory::rom(rom_e, 14, addr, 8, data);
        image::load(&mut rom, 0, &config.rom).map_err(|e| e.to_string())?;

        let mut ram = Memory::ram(ram_e, 15, addr, 8, data, rw);
        if let Some((base, bytes)) = &config.ram_image {
            image::load(&mut ram, *base as usize, bytes).map_err(|e| e.to_string())?;
        }

        let gpio = Latch::new(data, gpio_data, gpio_e);
        let port0 = TriState::new(port0_data, data, port0_e);
        let port1 = Latch::new(data, port1_data, port1_e);
        let port2 = Latch::new(data, port2_data, port2_e);

        // Instruction-counting NMI timer: sync pulses clock ones through a
        // shift register; its delayed output, inverted, pulls the NMI line.
        // Port 1 bit 6 holds the register cleared until software sets it.
        let clear_tap = BitTap::new(port1_data, shift_clear, 6);
        let timer = ShiftRegister::new(&board, vcc, shift_data, sync, shift_clear);
        let inverter = NotGate::new(shift_data, nmi);

        let led_fan = BitFan::new(gpio_data, leds);

        let nets = KitNets {
            addr,
            data,
            sync,
            rw,
            irq,
            nmi,
            port0_in: port0_data,
            port1_out: port1_data,
            port2_out: port2_data,
            gpio_out: gpio_data,
            leds,
        };

        Ok(Self {
            board,
            cpu,
            decode_rom,
            enable_fan,
            rom,
            ram,
            port1,
            port0,
            port2,
            gpio,
            clear_tap,
            timer,
            inverter,
            led_fan,
            clk,
            nets,
            ticks: Ticks::ZERO,
        })
    }

    /// One scheduling tick.
    ///
    /// Evaluation order is fixed at assembly time and single-pass: the CPU
    /// first (it publishes address/data/sync on clock edges), then the
    /// decode ROM and enable fan-out it feeds, then the memories and port
    /// latches behind those enables, then the timer chain clocked by sync,
    /// and the LED fan-out last. Standard net values persist across ticks,
    /// which carries CPU-published levels through the non-edge tick that
    /// follows each clock edge.
    pub fn tick(&mut self) {
        self.board.begin_tick();

        self.cpu.evaluate(&mut self.board);
        self.decode_rom.evaluate(&mut self.board);
        self.enable_fan.evaluate(&mut self.board);
        self.rom.evaluate(&mut self.board);
        self.ram.evaluate(&mut self.board);
        self.port1.evaluate(&mut self.board);
        self.port0.evaluate(&mut self.board);
        self.port2.evaluate(&mut self.board);
        self.gpio.evaluate(&mut self.board);
        self.clear_tap.evaluate(&mut self.board);
        self.timer.evaluate(&mut self.board);
        self.inverter.evaluate(&mut self.board);
        self.led_fan.evaluate(&mut self.board);

        for id in self.board.conflicts() {
            log::warn!("bus conflict on net {id:?} at tick {}", self.ticks.get());
        }

        self.board.advance_clocks();
        self.ticks += Ticks::new(1);
    }

    /// Run for a number of ticks.
    pub fn run(&mut self, ticks: Ticks) {
        for _ in 0..ticks.get() {
            self.tick();
        }
    }

    /// Ticks executed so far.
    #[must_use]
    pub fn ticks(&self) -> Ticks {
        self.ticks
    }

    /// Latch a CPU reset request.
    pub fn request_reset(&mut self) {
        self.cpu.request_reset();
    }

    /// Current level of the divided CPU clock.
    #[must_use]
    pub fn clock_level(&self) -> bool {
        self.board.is_high(self.clk)
    }

    /// The CPU, for state queries.
    #[must_use]
    pub fn cpu(&self) -> &impl Observable {
        &self.cpu
    }

    /// System RAM, for inspection and dumps.
    #[must_use]
    pub fn ram(&self) -> &Memory {
        &self.ram
    }

    /// Current level of a net.
    #[must_use]
    pub fn read_net(&self, id: NetId) -> u32 {
        self.board.read(id)
    }

    /// Drive a net from outside the board (input providers).
    pub fn drive_net(&mut self, id: NetId, value: u32) {
        self.board.write(id, value);
    }

    /// The eight LED levels behind the GPIO latch.
    #[must_use]
    pub fn led_levels(&self) -> [bool; 8] {
        self.nets.leds.map(|led| self.board.is_high(led))
    }

    /// Convenience query against the CPU.
    #[must_use]
    pub fn query(&self, path: &str) -> Option<Value> {
        self.cpu.query(path)
    }
}
