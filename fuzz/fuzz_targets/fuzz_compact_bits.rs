#![no_main]

use libfuzzer_sys::fuzz_target;

use dashkit_pow::compact::{compact_to_u256, u256_to_compact};

fuzz_target!(|bits: u32| {
    if let Ok(target) = compact_to_u256(bits) {
        let normalized = u256_to_compact(target);
        assert_eq!(compact_to_u256(normalized).ok(), Some(target));
    }
});
