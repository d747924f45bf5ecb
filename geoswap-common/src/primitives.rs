//! Big-endian primitive access
//!
//! Stateless readers and writers for the scalar and vector types found in
//! the console's memory images:
//! - u8/i8, u16/i16, u32/i32, u64/i64
//! - f32 (bit-exact, NaN payloads and signed zero survive)
//! - vec4 / mat3x4 / mat4x4 as runs of f32 at 4-byte strides
//!
//! Every function checks the whole window before touching the buffer, so a
//! failed call never yields or leaves a partial value.

use byteorder::{BigEndian, ByteOrder};

use crate::error::{CodecError, Result};

/// Upper bound for [`read_cstr`] scans when the caller has no better limit.
pub const DEFAULT_MAX_STRING_LEN: usize = 0x100;

/// Borrow `width` bytes at `offset`, or fail without reading anything.
#[inline]
fn window(buf: &[u8], offset: usize, width: usize) -> Result<&[u8]> {
    offset
        .checked_add(width)
        .filter(|&end| end <= buf.len())
        .map(|end| &buf[offset..end])
        .ok_or(CodecError::OutOfBounds {
            offset,
            width,
            len: buf.len(),
        })
}

#[inline]
fn window_mut(buf: &mut [u8], offset: usize, width: usize) -> Result<&mut [u8]> {
    let len = buf.len();
    match offset.checked_add(width) {
        Some(end) if end <= len => Ok(&mut buf[offset..end]),
        _ => Err(CodecError::OutOfBounds { offset, width, len }),
    }
}

// ============================================================================
// Scalar Reads
// ============================================================================

#[inline]
pub fn read_u8(buf: &[u8], offset: usize) -> Result<u8> {
    Ok(window(buf, offset, 1)?[0])
}

#[inline]
pub fn read_i8(buf: &[u8], offset: usize) -> Result<i8> {
    Ok(read_u8(buf, offset)? as i8)
}

#[inline]
pub fn read_u16(buf: &[u8], offset: usize) -> Result<u16> {
    Ok(BigEndian::read_u16(window(buf, offset, 2)?))
}

#[inline]
pub fn read_i16(buf: &[u8], offset: usize) -> Result<i16> {
    Ok(BigEndian::read_i16(window(buf, offset, 2)?))
}

#[inline]
pub fn read_u32(buf: &[u8], offset: usize) -> Result<u32> {
    Ok(BigEndian::read_u32(window(buf, offset, 4)?))
}

#[inline]
pub fn read_i32(buf: &[u8], offset: usize) -> Result<i32> {
    Ok(BigEndian::read_i32(window(buf, offset, 4)?))
}

#[inline]
pub fn read_u64(buf: &[u8], offset: usize) -> Result<u64> {
    Ok(BigEndian::read_u64(window(buf, offset, 8)?))
}

#[inline]
pub fn read_i64(buf: &[u8], offset: usize) -> Result<i64> {
    Ok(BigEndian::read_i64(window(buf, offset, 8)?))
}

/// Read an IEEE-754 float from its big-endian bit pattern.
#[inline]
pub fn read_f32(buf: &[u8], offset: usize) -> Result<f32> {
    Ok(f32::from_bits(read_u32(buf, offset)?))
}

// ============================================================================
// Scalar Writes
// ============================================================================

#[inline]
pub fn write_u8(buf: &mut [u8], offset: usize, value: u8) -> Result<()> {
    window_mut(buf, offset, 1)?[0] = value;
    Ok(())
}

#[inline]
pub fn write_i8(buf: &mut [u8], offset: usize, value: i8) -> Result<()> {
    write_u8(buf, offset, value as u8)
}

#[inline]
pub fn write_u16(buf: &mut [u8], offset: usize, value: u16) -> Result<()> {
    BigEndian::write_u16(window_mut(buf, offset, 2)?, value);
    Ok(())
}

#[inline]
pub fn write_i16(buf: &mut [u8], offset: usize, value: i16) -> Result<()> {
    BigEndian::write_i16(window_mut(buf, offset, 2)?, value);
    Ok(())
}

#[inline]
pub fn write_u32(buf: &mut [u8], offset: usize, value: u32) -> Result<()> {
    BigEndian::write_u32(window_mut(buf, offset, 4)?, value);
    Ok(())
}

#[inline]
pub fn write_i32(buf: &mut [u8], offset: usize, value: i32) -> Result<()> {
    BigEndian::write_i32(window_mut(buf, offset, 4)?, value);
    Ok(())
}

#[inline]
pub fn write_u64(buf: &mut [u8], offset: usize, value: u64) -> Result<()> {
    BigEndian::write_u64(window_mut(buf, offset, 8)?, value);
    Ok(())
}

#[inline]
pub fn write_i64(buf: &mut [u8], offset: usize, value: i64) -> Result<()> {
    BigEndian::write_i64(window_mut(buf, offset, 8)?, value);
    Ok(())
}

/// Write an IEEE-754 float as its big-endian bit pattern.
#[inline]
pub fn write_f32(buf: &mut [u8], offset: usize, value: f32) -> Result<()> {
    write_u32(buf, offset, value.to_bits())
}

// ============================================================================
// Vector Access
// ============================================================================

/// Read `N` consecutive floats at 4-byte strides.
pub fn read_f32_array<const N: usize>(buf: &[u8], offset: usize) -> Result<[f32; N]> {
    let bytes = window(buf, offset, N * 4)?;
    let mut out = [0.0f32; N];
    BigEndian::read_f32_into(bytes, &mut out);
    Ok(out)
}

/// Write `N` consecutive floats at 4-byte strides.
pub fn write_f32_array<const N: usize>(
    buf: &mut [u8],
    offset: usize,
    values: &[f32; N],
) -> Result<()> {
    let bytes = window_mut(buf, offset, N * 4)?;
    for (chunk, value) in bytes.chunks_exact_mut(4).zip(values) {
        BigEndian::write_u32(chunk, value.to_bits());
    }
    Ok(())
}

#[inline]
pub fn read_vec4(buf: &[u8], offset: usize) -> Result<[f32; 4]> {
    read_f32_array::<4>(buf, offset)
}

#[inline]
pub fn write_vec4(buf: &mut [u8], offset: usize, value: &[f32; 4]) -> Result<()> {
    write_f32_array(buf, offset, value)
}

/// Read a row-major 4x4 matrix (16 floats).
#[inline]
pub fn read_mat4x4(buf: &[u8], offset: usize) -> Result<[f32; 16]> {
    read_f32_array::<16>(buf, offset)
}

#[inline]
pub fn write_mat4x4(buf: &mut [u8], offset: usize, value: &[f32; 16]) -> Result<()> {
    write_f32_array(buf, offset, value)
}

/// Read a 3x4 matrix (12 floats).
#[inline]
pub fn read_mat3x4(buf: &[u8], offset: usize) -> Result<[f32; 12]> {
    read_f32_array::<12>(buf, offset)
}

#[inline]
pub fn write_mat3x4(buf: &mut [u8], offset: usize, value: &[f32; 12]) -> Result<()> {
    write_f32_array(buf, offset, value)
}

// ============================================================================
// Raw Bytes
// ============================================================================

/// Borrow `len` raw bytes at `offset`.
#[inline]
pub fn read_bytes(buf: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    window(buf, offset, len)
}

/// Copy `bytes` verbatim to `offset`.
#[inline]
pub fn write_bytes(buf: &mut [u8], offset: usize, bytes: &[u8]) -> Result<()> {
    window_mut(buf, offset, bytes.len())?.copy_from_slice(bytes);
    Ok(())
}

// ============================================================================
// Strings
// ============================================================================

/// Read a NUL-terminated string, scanning at most `max_len` bytes.
///
/// The scan also stops at the end of the buffer. Non-UTF-8 bytes are
/// replaced, since names in memory dumps are plain ASCII in practice.
pub fn read_cstr(buf: &[u8], offset: usize, max_len: usize) -> Result<String> {
    if offset > buf.len() {
        return Err(CodecError::OutOfBounds {
            offset,
            width: 1,
            len: buf.len(),
        });
    }
    let limit = max_len.min(buf.len() - offset);
    let scan = &buf[offset..offset + limit];
    match scan.iter().position(|&b| b == 0) {
        Some(end) => Ok(String::from_utf8_lossy(&scan[..end]).into_owned()),
        None => Err(CodecError::UnterminatedString { offset, max_len }),
    }
}
