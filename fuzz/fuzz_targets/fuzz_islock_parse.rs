#![no_main]

use libfuzzer_sys::fuzz_target;

use dashkit_protocol::islock;

fuzz_target!(|data: &[u8]| {
    if let Ok(lock) = islock::parse(data) {
        assert_eq!(islock::parse(&islock::serialize(&lock)).ok(), Some(lock));
    }
});
