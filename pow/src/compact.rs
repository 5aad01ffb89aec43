//! Compact target encoding (`nBits`).
//!
//! The top byte is a base-256 exponent, the low 23 bits the mantissa and
//! bit 23 a sign flag. Negative and overflowing encodings are rejected.

use primitive_types::U256;

use crate::ValidationError;

/// Decode `bits` into a 256-bit target.
pub fn compact_to_u256(bits: u32) -> Result<U256, ValidationError> {
    let size = bits >> 24;
    let word = bits & 0x007f_ffff;

    let negative = word != 0 && bits & 0x0080_0000 != 0;
    let overflow = word != 0
        && (size > 34 || (word > 0xff && size > 33) || (word > 0xffff && size > 32));
    if negative || overflow {
        return Err(ValidationError::InvalidCompact(bits));
    }

    if size <= 3 {
        Ok(U256::from(word >> (8 * (3 - size))))
    } else {
        Ok(U256::from(word) << (8 * (size as usize - 3)))
    }
}

/// Encode a target, normalising the mantissa so the sign bit stays clear.
pub fn u256_to_compact(value: U256) -> u32 {
    let mut size = (value.bits() as u32 + 7) / 8;
    let mut compact = if size <= 3 {
        (value.low_u64() << (8 * (3 - size))) as u32
    } else {
        (value >> (8 * (size as usize - 3))).low_u64() as u32
    };
    if compact & 0x0080_0000 != 0 {
        compact >>= 8;
        size += 1;
    }
    compact | (size << 24)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dash_max_target() {
        let target = compact_to_u256(0x1e0f_ffff).unwrap();
        assert_eq!(target, U256::from(0x0f_ffffu64) << (8 * 27));
        assert_eq!(u256_to_compact(target), 0x1e0f_ffff);
    }

    #[test]
    fn small_sizes_shift_right() {
        assert_eq!(compact_to_u256(0x0112_3456).unwrap(), U256::from(0x12u64));
        assert_eq!(compact_to_u256(0x0212_3456).unwrap(), U256::from(0x1234u64));
        assert_eq!(compact_to_u256(0x0312_3456).unwrap(), U256::from(0x12_3456u64));
        assert_eq!(u256_to_compact(U256::from(0x12u64)), 0x0112_0000);
    }

    #[test]
    fn sign_bit_is_normalised() {
        // 0x80 would set the sign bit with size 1; it is re-encoded with size 2.
        assert_eq!(u256_to_compact(U256::from(0x80u64)), 0x0200_8000);
        assert_eq!(compact_to_u256(0x0200_8000).unwrap(), U256::from(0x80u64));
    }

    #[test]
    fn zero_roundtrip() {
        assert_eq!(compact_to_u256(0).unwrap(), U256::zero());
        assert_eq!(u256_to_compact(U256::zero()), 0);
    }

    #[test]
    fn negative_and_overflow_rejected() {
        assert_eq!(
            compact_to_u256(0x04923456),
            Err(ValidationError::InvalidCompact(0x04923456))
        );
        assert_eq!(
            compact_to_u256(0xff12_3456),
            Err(ValidationError::InvalidCompact(0xff12_3456))
        );
    }
}
