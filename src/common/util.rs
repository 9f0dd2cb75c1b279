//! Byte-level readers shared by the tag decoders.
//!
//! Every reader takes the window it reads from plus an absolute offset, and
//! fails with [`Id3Error::OutOfBounds`] instead of panicking when the window is
//! too short. Multi-byte integers are big-endian.

use byteorder::{BigEndian, ByteOrder};
use memchr::memmem;

use crate::common::error::{Id3Error, Result};

// Low 7 bits of each byte of a big-endian syncsafe u32.
const SYNCSAFE_BYTE0: u32 = 0x0000_007F;
const SYNCSAFE_BYTE1: u32 = 0x0000_7F00;
const SYNCSAFE_BYTE2: u32 = 0x007F_0000;
const SYNCSAFE_BYTE3: u32 = 0x7F00_0000;

/// Borrow `length` bytes at `offset`, or report how far the read overshot.
#[inline]
pub fn window(data: &[u8], offset: usize, length: usize) -> Result<&[u8]> {
    offset
        .checked_add(length)
        .and_then(|end| data.get(offset..end))
        .ok_or(Id3Error::OutOfBounds {
            offset,
            length,
            available: data.len(),
        })
}

#[inline]
fn array<const N: usize>(data: &[u8], offset: usize) -> Result<[u8; N]> {
    let mut out = [0u8; N];
    out.copy_from_slice(window(data, offset, N)?);
    Ok(out)
}

/// Read a fixed-width text field.
///
/// The field ends at the first null byte inside the window. Each remaining
/// byte maps to the character with the same code point (Latin-1), so no
/// multi-byte sequences are ever decoded.
pub fn read_chars(data: &[u8], offset: usize, length: usize) -> Result<String> {
    let field = window(data, offset, length)?;
    let end = memchr::memchr(0, field).unwrap_or(field.len());
    Ok(field[..end].iter().map(|&b| b as char).collect())
}

pub fn get_u8(data: &[u8], offset: usize) -> Result<u8> {
    data.get(offset).copied().ok_or(Id3Error::OutOfBounds {
        offset,
        length: 1,
        available: data.len(),
    })
}

pub fn get_i8(data: &[u8], offset: usize) -> Result<i8> {
    get_u8(data, offset).map(|b| b as i8)
}

pub fn get_u16(data: &[u8], offset: usize) -> Result<u16> {
    window(data, offset, 2).map(BigEndian::read_u16)
}

pub fn get_i16(data: &[u8], offset: usize) -> Result<i16> {
    window(data, offset, 2).map(BigEndian::read_i16)
}

pub fn get_u32(data: &[u8], offset: usize) -> Result<u32> {
    window(data, offset, 4).map(BigEndian::read_u32)
}

pub fn get_i32(data: &[u8], offset: usize) -> Result<i32> {
    window(data, offset, 4).map(BigEndian::read_i32)
}

/// Join two integers as `"<int>.<frac>"` and parse the result.
///
/// The fraction is the decimal text of the second component, not a binary
/// fraction: `(1, 5)` gives `1.5` and `(1, 25)` gives `1.25`.
fn join_decimal(int: u16, frac: u16) -> Result<f64> {
    let mut int_buf = itoa::Buffer::new();
    let mut frac_buf = itoa::Buffer::new();
    let int = int_buf.format(int);
    let frac = frac_buf.format(frac);

    let mut text = String::with_capacity(int.len() + frac.len() + 1);
    text.push_str(int);
    text.push('.');
    text.push_str(frac);

    text.parse::<f64>()
        .map_err(|e| Id3Error::InvalidData(format!("fixed point {text}: {e}")))
}

/// Two adjacent bytes read as `<byte0>.<byte1>`.
pub fn get_fixed_point16(data: &[u8], offset: usize) -> Result<f64> {
    let [int, frac] = array::<2>(data, offset)?;
    join_decimal(u16::from(int), u16::from(frac))
}

/// Two adjacent big-endian u16 halves read as `<high>.<low>`.
pub fn get_fixed_point32(data: &[u8], offset: usize) -> Result<f64> {
    let int = get_u16(data, offset)?;
    let frac = get_u16(data, offset + 2)?;
    join_decimal(int, frac)
}

/// Unpack a 4 byte syncsafe integer into its 28-bit value.
///
/// The high bit of every byte is discarded without validation.
pub fn get_syncsafe_u32(data: &[u8], offset: usize) -> Result<u32> {
    let raw = get_u32(data, offset)?;
    Ok((raw & SYNCSAFE_BYTE0)
        | (raw & SYNCSAFE_BYTE1) >> 1
        | (raw & SYNCSAFE_BYTE2) >> 2
        | (raw & SYNCSAFE_BYTE3) >> 3)
}

/// Unpack a 5 byte (35-bit) syncsafe integer into a u32, as used by the
/// extended header CRC. Bits shifted above 32 are dropped.
pub fn get_syncsafe_u35(data: &[u8], offset: usize) -> Result<u32> {
    let [b0, b1, b2, b3, b4] = array::<5>(data, offset)?;

    let byte3 = ((b3 & 0x01) << 7) | b4;
    let byte2 = ((b2 & 0x03) << 6) | (b3 >> 1);
    let byte1 = ((b1 & 0x07) << 5) | (b2 >> 2);
    let byte0 = (b0 << 4) | (b1 >> 3);

    Ok(u32::from_be_bytes([byte0, byte1, byte2, byte3]))
}

/// Offset of the first exact occurrence of `needle` in `haystack`.
///
/// An empty needle matches at offset 0 of any non-empty haystack.
pub fn find_marker(haystack: &[u8], needle: impl AsRef<[u8]>) -> Option<usize> {
    let needle = needle.as_ref();
    if needle.is_empty() {
        return (!haystack.is_empty()).then_some(0);
    }
    memmem::find(haystack, needle)
}

/// Offsets of every occurrence of `needle` in `haystack`, overlapping
/// matches included.
pub fn find_markers(haystack: &[u8], needle: impl AsRef<[u8]>) -> Vec<usize> {
    let needle = needle.as_ref();
    if needle.is_empty() {
        return (0..haystack.len()).collect();
    }

    let finder = memmem::Finder::new(needle);
    let mut positions = Vec::new();
    let mut pos = 0;
    while let Some(found) = haystack.get(pos..).and_then(|rest| finder.find(rest)) {
        positions.push(pos + found);
        pos += found + 1;
    }
    positions
}
