//! Address/data-width-parameterised storage wired to an address net, a data
//! net and an active-low enable line.

use sim_core::{Board, Device, NetId};

/// Widest address a memory device accepts, in bits. Clamping here caps the
/// backing allocation at 16 MiB.
const MAX_ADDR_WIDTH: u32 = 24;

/// Widest data word, matching the byte-wide backing store.
const MAX_DATA_WIDTH: u32 = 8;

/// ROM/RAM device.
///
/// While the enable line is low the device participates on the bus: with a
/// read/write line present and low it stores the data net at the masked
/// address, otherwise it drives the data net with the stored byte. Without
/// a read/write line it is a ROM and only ever drives.
///
/// The backing store is zero-initialised at construction, so behaviour is
/// deterministic before any image is loaded. Addresses are masked to the
/// declared width, so out-of-range indexing cannot occur.
#[derive(Debug)]
pub struct Memory {
    enable: NetId,
    addr: NetId,
    data: NetId,
    read_write: Option<NetId>,
    store: Vec<u8>,
    addr_mask: u32,
    data_mask: u32,
}

impl Memory {
    fn with_lines(
        enable: NetId,
        addr_width: u32,
        addr: NetId,
        data_width: u32,
        data: NetId,
        read_write: Option<NetId>,
    ) -> Self {
        let addr_width = addr_width.clamp(1, MAX_ADDR_WIDTH);
        let data_width = data_width.clamp(1, MAX_DATA_WIDTH);
        let size = 1usize << addr_width;
        Self {
            enable,
            addr,
            data,
            read_write,
            store: vec![0; size],
            addr_mask: (1 << addr_width) - 1,
            data_mask: (1 << data_width) - 1,
        }
    }

    /// Read-only memory: no read/write line, drives the data net whenever
    /// enabled.
    #[must_use]
    pub fn rom(enable: NetId, addr_width: u32, addr: NetId, data_width: u32, data: NetId) -> Self {
        Self::with_lines(enable, addr_width, addr, data_width, data, None)
    }

    /// Read/write memory: the extra line selects store (low) or drive
    /// (high).
    #[must_use]
    pub fn ram(
        enable: NetId,
        addr_width: u32,
        addr: NetId,
        data_width: u32,
        data: NetId,
        read_write: NetId,
    ) -> Self {
        Self::with_lines(enable, addr_width, addr, data_width, data, Some(read_write))
    }

    /// Size of the backing store in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.store.len()
    }

    /// Direct read of the backing store, address masked to width.
    #[must_use]
    pub fn peek(&self, addr: u32) -> u8 {
        self.store[(addr & self.addr_mask) as usize]
    }

    /// Direct write into the backing store, address masked to width.
    pub fn poke(&mut self, addr: u32, value: u8) {
        self.store[(addr & self.addr_mask) as usize] = value;
    }

    /// The whole backing store.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.store
    }

    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.store
    }
}

impl Device for Memory {
    fn evaluate(&mut self, board: &mut Board) {
        if board.is_high(self.enable) {
            return;
        }
        let addr = (board.read(self.addr) & self.addr_mask) as usize;
        match self.read_write {
            Some(rw) if !board.is_high(rw) => {
                self.store[addr] = (board.read(self.data) & self.data_mask) as u8;
            }
            _ => {
                let value = u32::from(self.store[addr]) & self.data_mask;
                board.write(self.data, value);
            }
        }
    }
}
