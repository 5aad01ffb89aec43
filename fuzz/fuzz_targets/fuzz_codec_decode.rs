#![no_main]

use libfuzzer_sys::fuzz_target;

use dashkit_messages::command;
use dashkit_protocol::codec::MessageCodec;
use dashkit_protocol::PROTOCOL_VERSION;

const COMMANDS: [&str; 5] = [
    command::GET_MN_LIST_DIFF,
    command::MN_LIST_DIFF,
    command::ISLOCK,
    command::TRANSACTION,
    command::TRANSACTION_LOCK_REQUEST,
];

// First byte picks the command, the rest is the payload.
fuzz_target!(|data: &[u8]| {
    let Some((selector, payload)) = data.split_first() else {
        return;
    };
    let Ok(codec) = MessageCodec::new(PROTOCOL_VERSION) else {
        return;
    };
    let command = COMMANDS[*selector as usize % COMMANDS.len()];
    if let Ok(message) = codec.decode(command, payload) {
        // Whatever decodes must re-encode and decode again.
        let encoded = codec.encode(&message);
        assert!(codec.decode(command, &encoded).is_ok());
    }
});
