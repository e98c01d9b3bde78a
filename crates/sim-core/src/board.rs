//! The board: an arena owning every net in the system.
//!
//! Devices never own or borrow nets. They store [`NetId`] handles and go
//! through the board on every access, which keeps the wiring graph a plain
//! index structure and gives one owner responsibility for per-tick
//! bookkeeping.

use crate::net::Net;

/// Stable handle to a net on a [`Board`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetId(usize);

/// Arena of nets. Created once at system assembly and then shared (by
/// `&mut`) with each device's evaluate call.
#[derive(Debug, Default)]
pub struct Board {
    nets: Vec<Net>,
}

impl Board {
    #[must_use]
    pub fn new() -> Self {
        Self { nets: Vec::new() }
    }

    /// Install a net and return its handle.
    pub fn add(&mut self, net: Net) -> NetId {
        let id = NetId(self.nets.len());
        self.nets.push(net);
        id
    }

    /// A standard multi-bit bus.
    pub fn bus(&mut self, width: u32) -> NetId {
        self.add(Net::bus(width))
    }

    /// A standard single-bit line.
    pub fn line(&mut self) -> NetId {
        self.add(Net::line())
    }

    /// A rail held high.
    pub fn vcc(&mut self) -> NetId {
        self.add(Net::vcc())
    }

    /// A rail held low.
    pub fn gnd(&mut self) -> NetId {
        self.add(Net::gnd())
    }

    /// A single-bit wired-AND line, idle high.
    pub fn open_collector(&mut self) -> NetId {
        self.add(Net::open_collector(1))
    }

    /// A divided clock line.
    pub fn clock(&mut self, initial: bool, period: u64) -> NetId {
        self.add(Net::clock(initial, period))
    }

    #[must_use]
    pub fn read(&self, id: NetId) -> u32 {
        self.nets[id.0].read()
    }

    #[must_use]
    pub fn is_high(&self, id: NetId) -> bool {
        self.nets[id.0].is_high()
    }

    pub fn write(&mut self, id: NetId, value: u32) {
        self.nets[id.0].write(value);
    }

    /// Drive a single-bit line with a logic level.
    pub fn write_level(&mut self, id: NetId, level: bool) {
        self.nets[id.0].write(u32::from(level));
    }

    /// Restore one net's idle level and clear its counter.
    pub fn reset(&mut self, id: NetId) {
        self.nets[id.0].reset();
    }

    /// Restore every net's idle level. Clocks are unaffected.
    pub fn reset_all(&mut self) {
        for net in &mut self.nets {
            net.reset();
        }
    }

    #[must_use]
    pub fn has_conflict(&self, id: NetId) -> bool {
        self.nets[id.0].has_conflict()
    }

    /// Handles of every net currently flagging a conflict.
    #[must_use]
    pub fn conflicts(&self) -> Vec<NetId> {
        self.nets
            .iter()
            .enumerate()
            .filter(|(_, net)| net.has_conflict())
            .map(|(i, _)| NetId(i))
            .collect()
    }

    /// Start-of-tick bookkeeping: clear write counters everywhere and float
    /// open-collector nets back high. Values on standard nets persist, so
    /// levels published on a clock edge stay visible through the following
    /// tick.
    pub fn begin_tick(&mut self) {
        for net in &mut self.nets {
            net.begin_tick();
        }
    }

    /// Advance every divided clock by one step. The only way a clock level
    /// ever changes.
    pub fn advance_clocks(&mut self) {
        for net in &mut self.nets {
            net.advance();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nets.is_empty()
    }
}
