use dashkit_pow::compact::{compact_to_u256, u256_to_compact};
use primitive_types::U256;
use proptest::prelude::*;

proptest! {
    /// Encoding keeps the three most significant bytes, so decoding never
    /// yields more than the original and re-encoding is stable.
    #[test]
    fn encode_truncates_and_is_stable(limbs in proptest::array::uniform4(any::<u64>()), shift in 0usize..256) {
        let value = U256(limbs) >> shift;
        let bits = u256_to_compact(value);
        let decoded = compact_to_u256(bits).unwrap();
        prop_assert!(decoded <= value);
        prop_assert_eq!(u256_to_compact(decoded), bits);
    }

    #[test]
    fn decode_never_panics(bits in any::<u32>()) {
        let _ = compact_to_u256(bits);
    }
}
