//! LEB128 variable-length integer encoding.
//!
//! This module implements the unsigned and signed LEB128 encodings used by
//! the WASM binary format, plus a fixed-width two-byte variant for fields
//! that must be patched after the fact. The raw bit manipulation lives in
//! small infallible encoders writing into a stack scratch array; the public
//! cursor API wraps them with explicit capacity checks so a short buffer
//! produces an error instead of an out-of-bounds write.

use thiserror::Error;

/// Longest possible LEB128 encoding of a 32-bit value.
///
/// 32 bits at 7 payload bits per byte need at most ceil(32 / 7) = 5 bytes.
pub const MAX_LEN_U32: usize = 5;

/// Width of a fixed-width short encoding, in bytes. Always exactly two.
pub const FIXED_ULEB16_LEN: usize = 2;

/// Largest value representable by the fixed-width short encoding.
///
/// The first byte always carries a continuation bit and the second never
/// does, which leaves 14 payload bits. Larger values would spill into a
/// third byte and break the constant-width patching contract.
pub const FIXED_ULEB16_MAX: u16 = 0x3FFF;

/// An encode operation could not complete.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// A write of `needed` bytes would exceed the `remaining` capacity of
    /// the destination buffer. The buffer is left untouched.
    #[error("write of {needed} bytes exceeds remaining buffer capacity of {remaining}")]
    BufferOverflow { needed: usize, remaining: usize },

    /// The value does not fit the fixed-width two-byte encoding.
    #[error("value {0} exceeds the fixed-width encoding maximum of 16383")]
    ValueOutOfRange(u32),
}

/// Encode `value` as unsigned LEB128 into `scratch`.
///
/// Returns the number of bytes written (1..=5). The output is always the
/// minimal-length encoding; zero encodes as a single zero byte.
pub(crate) fn uleb128_into(scratch: &mut [u8; MAX_LEN_U32], mut value: u32) -> usize {
    let mut len = 0;
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        scratch[len] = byte;
        len += 1;
        if value == 0 {
            return len;
        }
    }
}

/// Encode `value` as signed (two's complement) LEB128 into `scratch`.
///
/// Returns the number of bytes written (1..=5). Termination follows the
/// standard rule: stop once the remaining value is all sign bits (`0` or
/// `-1`) and the payload's bit 6 agrees with that sign, so boundary values
/// like 64 and -65 grow a byte while 63 and -64 do not.
pub(crate) fn sleb128_into(scratch: &mut [u8; MAX_LEN_U32], mut value: i32) -> usize {
    let mut len = 0;
    loop {
        let byte = (value & 0x7f) as u8;
        // Arithmetic shift: Rust defines `>>` on i32 to sign-extend.
        value >>= 7;
        let sign_bit = byte & 0x40 != 0;
        let done = (value == 0 && !sign_bit) || (value == -1 && sign_bit);
        scratch[len] = if done { byte } else { byte | 0x80 };
        len += 1;
        if done {
            return len;
        }
    }
}

/// Write `value` as unsigned LEB128 into `buf` at `pos`.
///
/// Returns the advanced cursor. Fails with [`EncodeError::BufferOverflow`]
/// if the encoding does not fit in the remaining capacity, leaving `buf`
/// untouched.
pub fn write_uleb128(buf: &mut [u8], pos: usize, value: u32) -> Result<usize, EncodeError> {
    let mut scratch = [0u8; MAX_LEN_U32];
    let len = uleb128_into(&mut scratch, value);
    let remaining = buf.len().saturating_sub(pos);
    if remaining < len {
        return Err(EncodeError::BufferOverflow { needed: len, remaining });
    }
    buf[pos..pos + len].copy_from_slice(&scratch[..len]);
    Ok(pos + len)
}

/// Write `value` as signed LEB128 into `buf` at `pos`.
///
/// Returns the advanced cursor. Fails with [`EncodeError::BufferOverflow`]
/// if the encoding does not fit in the remaining capacity, leaving `buf`
/// untouched.
pub fn write_sleb128(buf: &mut [u8], pos: usize, value: i32) -> Result<usize, EncodeError> {
    let mut scratch = [0u8; MAX_LEN_U32];
    let len = sleb128_into(&mut scratch, value);
    let remaining = buf.len().saturating_sub(pos);
    if remaining < len {
        return Err(EncodeError::BufferOverflow { needed: len, remaining });
    }
    buf[pos..pos + len].copy_from_slice(&scratch[..len]);
    Ok(pos + len)
}

/// Write `value` as a fixed-width two-byte LEB128 field into `buf` at `pos`.
///
/// The first byte holds the low 7 bits with the continuation bit forced on
/// even when the value would fit in one byte; the second holds bits 7..14
/// with the continuation bit off. Constant width is what allows the field to
/// be written as a placeholder and patched once the true value is known.
///
/// Fails with [`EncodeError::ValueOutOfRange`] for values above
/// [`FIXED_ULEB16_MAX`] and with [`EncodeError::BufferOverflow`] if fewer
/// than two bytes remain.
pub fn write_fixed_uleb16(buf: &mut [u8], pos: usize, value: u16) -> Result<(), EncodeError> {
    if value > FIXED_ULEB16_MAX {
        return Err(EncodeError::ValueOutOfRange(u32::from(value)));
    }
    let remaining = buf.len().saturating_sub(pos);
    if remaining < FIXED_ULEB16_LEN {
        return Err(EncodeError::BufferOverflow {
            needed: FIXED_ULEB16_LEN,
            remaining,
        });
    }
    buf[pos] = (value & 0x7f) as u8 | 0x80;
    buf[pos + 1] = (value >> 7) as u8;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uleb(value: u32) -> Vec<u8> {
        let mut buf = [0u8; MAX_LEN_U32];
        let end = write_uleb128(&mut buf, 0, value).unwrap();
        buf[..end].to_vec()
    }

    fn sleb(value: i32) -> Vec<u8> {
        let mut buf = [0u8; MAX_LEN_U32];
        let end = write_sleb128(&mut buf, 0, value).unwrap();
        buf[..end].to_vec()
    }

    /// Minimal unsigned LEB128 length: ceil(bits / 7), at least 1.
    fn min_uleb_len(value: u32) -> usize {
        let bits = 32 - value.leading_zeros() as usize;
        bits.div_ceil(7).max(1)
    }

    #[test]
    fn unsigned_exact_bytes() {
        assert_eq!(uleb(0), [0x00]);
        assert_eq!(uleb(1), [0x01]);
        assert_eq!(uleb(127), [0x7f]);
        assert_eq!(uleb(128), [0x80, 0x01]);
        assert_eq!(uleb(16383), [0xff, 0x7f]);
        assert_eq!(uleb(16384), [0x80, 0x80, 0x01]);
        assert_eq!(uleb(u32::MAX), [0xff, 0xff, 0xff, 0xff, 0x0f]);
    }

    #[test]
    fn unsigned_lengths_are_minimal() {
        for value in [0, 1, 127, 128, 16383, 16384, 2_097_151, 2_097_152, u32::MAX] {
            assert_eq!(uleb(value).len(), min_uleb_len(value), "value {value}");
        }
    }

    #[test]
    fn signed_exact_bytes() {
        assert_eq!(sleb(0), [0x00]);
        assert_eq!(sleb(1), [0x01]);
        assert_eq!(sleb(-1), [0x7f]);
        assert_eq!(sleb(63), [0x3f]);
        assert_eq!(sleb(64), [0xc0, 0x00]);
        assert_eq!(sleb(-64), [0x40]);
        assert_eq!(sleb(-65), [0xbf, 0x7f]);
        assert_eq!(sleb(i32::MAX), [0xff, 0xff, 0xff, 0xff, 0x07]);
        assert_eq!(sleb(i32::MIN), [0x80, 0x80, 0x80, 0x80, 0x78]);
    }

    #[test]
    fn signed_lengths_match_reference_table() {
        // (value, minimal signed LEB128 length)
        let table: &[(i32, usize)] = &[
            (0, 1),
            (1, 1),
            (-1, 1),
            (63, 1),
            (64, 2),
            (-64, 1),
            (-65, 2),
            (8191, 2),
            (8192, 3),
            (-8192, 2),
            (-8193, 3),
            (i32::MAX, 5),
            (i32::MIN, 5),
        ];
        for &(value, len) in table {
            assert_eq!(sleb(value).len(), len, "value {value}");
        }
    }

    #[test]
    fn window_boundary_does_not_grow_extra_byte() {
        // Bit 6 of the final payload byte doubles as the sign bit, so values
        // whose magnitude ends exactly at a 7-bit window must not re-encode.
        assert_eq!(sleb(-64).len(), 1);
        assert_eq!(sleb(63).len(), 1);
        assert_eq!(sleb(-8192).len(), 2);
        assert_eq!(sleb(8191).len(), 2);
    }

    #[test]
    fn unsigned_overflow_at_capacity_boundary() {
        let mut buf = [0u8; 2];
        // 16383 needs exactly 2 bytes: fits.
        assert_eq!(write_uleb128(&mut buf, 0, 16383), Ok(2));
        // 16384 needs 3: rejected, buffer untouched.
        let before = buf;
        assert_eq!(
            write_uleb128(&mut buf, 0, 16384),
            Err(EncodeError::BufferOverflow {
                needed: 3,
                remaining: 2
            })
        );
        assert_eq!(buf, before);
    }

    #[test]
    fn signed_overflow_reports_remaining_capacity() {
        let mut buf = [0u8; 4];
        assert_eq!(
            write_sleb128(&mut buf, 3, i32::MIN),
            Err(EncodeError::BufferOverflow {
                needed: 5,
                remaining: 1
            })
        );
    }

    #[test]
    fn cursor_past_end_is_overflow_not_panic() {
        let mut buf = [0u8; 2];
        assert_eq!(
            write_uleb128(&mut buf, 7, 0),
            Err(EncodeError::BufferOverflow {
                needed: 1,
                remaining: 0
            })
        );
    }

    #[test]
    fn cursor_advances_through_consecutive_writes() {
        let mut buf = [0u8; 8];
        let pos = write_uleb128(&mut buf, 0, 128).unwrap();
        let pos = write_sleb128(&mut buf, pos, -1).unwrap();
        let pos = write_uleb128(&mut buf, pos, 5).unwrap();
        assert_eq!(pos, 4);
        assert_eq!(&buf[..4], [0x80, 0x01, 0x7f, 0x05]);
    }

    #[test]
    fn fixed_width_is_always_two_bytes() {
        for value in [0u16, 1, 127, 128, 129, 8191, 16383] {
            let mut buf = [0u8; 2];
            write_fixed_uleb16(&mut buf, 0, value).unwrap();
            // First byte must carry the continuation bit even when the value
            // fits in 7 bits, second byte never does.
            assert_eq!(buf[0] & 0x80, 0x80, "value {value}");
            assert_eq!(buf[1] & 0x80, 0x00, "value {value}");
            let decoded = u16::from(buf[0] & 0x7f) | (u16::from(buf[1]) << 7);
            assert_eq!(decoded, value);
        }
    }

    #[test]
    fn fixed_width_forces_continuation_on_small_values() {
        let mut buf = [0u8; 2];
        write_fixed_uleb16(&mut buf, 0, 0).unwrap();
        assert_eq!(buf, [0x80, 0x00]);
        write_fixed_uleb16(&mut buf, 0, 127).unwrap();
        assert_eq!(buf, [0xff, 0x00]);
    }

    #[test]
    fn fixed_width_rejects_values_above_14_bits() {
        let mut buf = [0u8; 2];
        assert_eq!(
            write_fixed_uleb16(&mut buf, 0, 16384),
            Err(EncodeError::ValueOutOfRange(16384))
        );
        assert_eq!(
            write_fixed_uleb16(&mut buf, 0, u16::MAX),
            Err(EncodeError::ValueOutOfRange(65535))
        );
    }

    #[test]
    fn fixed_width_checks_capacity() {
        let mut buf = [0u8; 3];
        assert_eq!(
            write_fixed_uleb16(&mut buf, 2, 1),
            Err(EncodeError::BufferOverflow {
                needed: 2,
                remaining: 1
            })
        );
    }

    #[test]
    fn encoding_is_pure() {
        for _ in 0..3 {
            assert_eq!(uleb(0xdead_beef), uleb(0xdead_beef));
            assert_eq!(sleb(-123_456), sleb(-123_456));
        }
    }
}
