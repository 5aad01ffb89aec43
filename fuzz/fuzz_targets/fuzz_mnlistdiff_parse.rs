#![no_main]

use libfuzzer_sys::fuzz_target;

use dashkit_protocol::{mnlistdiff, PROTOCOL_VERSION};

fuzz_target!(|data: &[u8]| {
    let _ = mnlistdiff::parse_request(data);
    let _ = mnlistdiff::parse(data, PROTOCOL_VERSION);
    let _ = mnlistdiff::parse(data, 70_213);
});
