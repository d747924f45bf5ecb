//! Offset alignment arithmetic
//!
//! The asset files place every sub-buffer on a 0x10 boundary, with a few
//! blocks (vertex arrays) starting on 0x80. These helpers compute the padded
//! positions; only [`pad_to_16`] touches a buffer.

/// 16-byte alignment used between most sub-buffers.
pub const ALIGN_16: usize = 0x10;
/// 32-byte alignment.
pub const ALIGN_32: usize = 0x20;
/// 128-byte alignment used before vertex arrays.
pub const ALIGN_128: usize = 0x80;
/// 256-byte alignment.
pub const ALIGN_256: usize = 0x100;

/// Smallest `n >= length` with `n % modulus == 0`.
///
/// # Panics
///
/// Panics if `modulus` is zero.
#[inline]
pub const fn align_up(length: usize, modulus: usize) -> usize {
    align_up_with(length, modulus, 0)
}

/// Smallest `n >= length` with `n % modulus == remainder`.
///
/// `remainder` is taken modulo `modulus`.
///
/// # Panics
///
/// Panics if `modulus` is zero.
#[inline]
pub const fn align_up_with(length: usize, modulus: usize, remainder: usize) -> usize {
    let remainder = remainder % modulus;
    let current = length % modulus;
    if current <= remainder {
        length + (remainder - current)
    } else {
        length + (modulus - current) + remainder
    }
}

/// Like [`align_up_with`], but `None` when the result does not fit in
/// `usize`.
///
/// # Panics
///
/// Panics if `modulus` is zero.
#[inline]
pub const fn checked_align_up_with(
    length: usize,
    modulus: usize,
    remainder: usize,
) -> Option<usize> {
    let remainder = remainder % modulus;
    let current = length % modulus;
    let pad = if current <= remainder {
        remainder - current
    } else {
        modulus - current + remainder
    };
    length.checked_add(pad)
}

/// Like [`align_up`], but `None` on overflow.
#[inline]
pub const fn checked_align_up(length: usize, modulus: usize) -> Option<usize> {
    checked_align_up_with(length, modulus, 0)
}

/// Number of zero bytes to insert after `length` to reach the next
/// position with `n % 0x80 == remainder`.
#[inline]
pub const fn padding_to_align_80(length: usize, remainder: usize) -> usize {
    align_up_with(length, ALIGN_128, remainder) - length
}

/// Append zero bytes until the buffer length is a multiple of 0x10.
pub fn pad_to_16(buffer: &mut Vec<u8>) {
    let target = align_up(buffer.len(), ALIGN_16);
    buffer.resize(target, 0);
}
