//! `islock` message codec and request id derivation.

use dashkit_crypto::double_sha256;
use dashkit_messages::ISLockMessage;
use dashkit_transactions::Outpoint;
use dashkit_types::TxHash;
use dashkit_utils::{ByteReader, ByteWriter};

use crate::ProtocolError;

pub const ISLOCK_REQUEST_ID_PREFIX: &str = "islock";
pub const ISLOCK_SIGNATURE_SIZE: usize = 96;
const OUTPOINT_SIZE: usize = 36;

/// `SHA256d(VarString("islock") || VarInt(n) || outpoints)`.
pub fn request_id(inputs: &[Outpoint]) -> [u8; 32] {
    let mut w = ByteWriter::with_capacity(8 + inputs.len() * OUTPOINT_SIZE);
    w.write_var_string(ISLOCK_REQUEST_ID_PREFIX);
    write_outpoints(&mut w, inputs);
    double_sha256(w.as_slice())
}

fn write_outpoints(w: &mut ByteWriter, inputs: &[Outpoint]) {
    w.write_var_int(inputs.len() as u64);
    for outpoint in inputs {
        w.write_bytes(outpoint.hash.as_bytes())
            .write_u32_le(outpoint.index);
    }
}

pub fn parse(payload: &[u8]) -> Result<ISLockMessage, ProtocolError> {
    let mut reader = ByteReader::new(payload);
    let count = reader.read_count(OUTPOINT_SIZE)?;
    let mut inputs = Vec::with_capacity(count);
    for _ in 0..count {
        let hash = TxHash::new(reader.read_array()?);
        let index = reader.read_u32_le()?;
        inputs.push(Outpoint::new(hash, index));
    }
    let tx_hash = TxHash::new(reader.read_array()?);
    let signature = reader.read_bytes(ISLOCK_SIGNATURE_SIZE)?.to_vec();
    if !reader.is_empty() {
        return Err(ProtocolError::Malformed(format!(
            "{} trailing bytes after islock",
            reader.remaining()
        )));
    }

    Ok(ISLockMessage {
        request_id: request_id(&inputs),
        hash: double_sha256(payload),
        inputs,
        tx_hash,
        signature,
    })
}

pub fn serialize(lock: &ISLockMessage) -> Vec<u8> {
    let mut w = ByteWriter::with_capacity(8 + lock.inputs.len() * OUTPOINT_SIZE + 128);
    write_outpoints(&mut w, &lock.inputs);
    w.write_bytes(lock.tx_hash.as_bytes())
        .write_bytes(&lock.signature);
    w.into_bytes()
}

/// Assembles a lock from its wire fields, deriving `hash` and `request_id`.
pub fn new_lock(inputs: Vec<Outpoint>, tx_hash: TxHash, signature: Vec<u8>) -> ISLockMessage {
    let mut lock = ISLockMessage {
        request_id: request_id(&inputs),
        hash: [0u8; 32],
        inputs,
        tx_hash,
        signature,
    };
    lock.hash = double_sha256(&serialize(&lock));
    lock
}
