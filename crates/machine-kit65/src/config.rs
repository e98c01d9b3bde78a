//! Machine configuration: ROM images and clocking.

/// Select bits in a decode-ROM entry. All active low.
pub const ROM_SELECT: u8 = 0x01;
pub const RAM_SELECT: u8 = 0x02;
pub const GPIO_SELECT: u8 = 0x04;
pub const PORT0_SELECT: u8 = 0x08;
pub const PORT1_SELECT: u8 = 0x10;
pub const PORT2_SELECT: u8 = 0x20;

/// Configuration for assembling a [`crate::Kit65`].
pub struct Kit65Config {
    /// Program ROM image, up to 16 KiB, mapped at $C000-$FFFF. The CPU
    /// vectors live in its top six bytes.
    pub rom: Vec<u8>,
    /// Decode ROM image: one select byte per CPU address. Defaults to
    /// [`Kit65Config::default_decode`].
    pub decode: Vec<u8>,
    /// Optional RAM preload: base address plus bytes.
    pub ram_image: Option<(u16, Vec<u8>)>,
    /// Master clock division; 1 toggles the CPU clock every tick.
    pub clock_divide: u64,
}

impl Kit65Config {
    /// A machine with the default memory map and the given program ROM.
    #[must_use]
    pub fn new(rom: Vec<u8>) -> Self {
        Self {
            rom,
            decode: Self::default_decode(),
            ram_image: None,
            clock_divide: 1,
        }
    }

    /// The default decode table:
    ///
    /// | range         | device  |
    /// |---------------|---------|
    /// | $0000-$7FFF   | RAM     |
    /// | $8000         | GPIO    |
    /// | $8001         | port 0  |
    /// | $8002         | port 1  |
    /// | $8003         | port 2  |
    /// | $C000-$FFFF   | ROM     |
    ///
    /// Every other address selects nothing.
    #[must_use]
    pub fn default_decode() -> Vec<u8> {
        let mut table = vec![0xFF; 0x1_0000];
        for (addr, entry) in table.iter_mut().enumerate() {
            if addr < 0x8000 {
                *entry &= !RAM_SELECT;
            }
            if addr >= 0xC000 {
                *entry &= !ROM_SELECT;
            }
            match addr {
                0x8000 => *entry &= !GPIO_SELECT,
                0x8001 => *entry &= !PORT0_SELECT,
                0x8002 => *entry &= !PORT1_SELECT,
                0x8003 => *entry &= !PORT2_SELECT,
                _ => {}
            }
        }
        table
    }
}
