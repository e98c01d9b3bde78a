//! Loading binary images into memory devices and dumping ranges back out.
//!
//! Loads are all-or-nothing: the source is read in full before a single
//! byte of the destination changes, so a missing or short image leaves the
//! device in its prior state.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use thiserror::Error;

use crate::Memory;

/// Why an image operation failed.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The destination window does not fit inside the device.
    #[error("image does not fit: {offset}+{len} exceeds memory size {size}")]
    DestinationRange {
        offset: usize,
        len: usize,
        size: usize,
    },
    /// The source could not be opened or read.
    #[error("image source error: {0}")]
    Source(#[from] io::Error),
    /// The source ended before the requested length.
    #[error("short image source: wanted {wanted} bytes, got {got}")]
    ShortSource { wanted: usize, got: usize },
}

/// Copy `bytes` into the device starting at `offset`.
///
/// Returns the number of bytes written. Fails without touching the device
/// if the window does not fit.
pub fn load(mem: &mut Memory, offset: usize, bytes: &[u8]) -> Result<usize, ImageError> {
    let size = mem.size();
    let end = offset.checked_add(bytes.len());
    match end {
        Some(end) if end <= size => {
            mem.bytes_mut()[offset..end].copy_from_slice(bytes);
            Ok(bytes.len())
        }
        _ => Err(ImageError::DestinationRange {
            offset,
            len: bytes.len(),
            size,
        }),
    }
}

/// Read `len` bytes from `path` starting at `src_offset` and copy them into
/// the device at `offset`.
///
/// The file is read completely before the device is modified; any failure
/// (missing file, seek error, short read, bad destination window) leaves
/// the backing store untouched.
pub fn load_file(
    mem: &mut Memory,
    offset: usize,
    path: &Path,
    src_offset: u64,
    len: usize,
) -> Result<usize, ImageError> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::Start(src_offset))?;

    let mut bytes = Vec::with_capacity(len);
    file.take(len as u64).read_to_end(&mut bytes)?;
    if bytes.len() < len {
        return Err(ImageError::ShortSource {
            wanted: len,
            got: bytes.len(),
        });
    }

    load(mem, offset, &bytes)
}

/// Serialise `count` bytes starting at address `start` to a byte sink.
///
/// Addresses are masked by the device, so a range crossing the top of the
/// store wraps the way the hardware would.
pub fn dump<W: Write>(mem: &Memory, start: u32, count: usize, sink: &mut W) -> io::Result<()> {
    for i in 0..count {
        let byte = mem.peek(start.wrapping_add(i as u32));
        sink.write_all(&[byte])?;
    }
    Ok(())
}
