//! Consensus serialization.
//!
//! The 32-bit version field packs the 16-bit version (low half) and the
//! DIP-0002 special transaction type (high half). Special transactions with
//! `version >= 3` append a `CompactSize`-prefixed extra payload after
//! `lock_time`.

use dashkit_crypto::hash_transaction;
use dashkit_types::TxHash;
use dashkit_utils::{ByteReader, ByteWriter};

use crate::{FullTransaction, Input, Outpoint, Output, Transaction, TransactionError};

/// Outpoint (36) + empty script (1) + sequence (4).
const MIN_INPUT_SIZE: usize = 41;
/// Value (8) + empty script (1).
const MIN_OUTPUT_SIZE: usize = 9;

pub fn serialize(tx: &FullTransaction) -> Vec<u8> {
    let mut w = ByteWriter::with_capacity(256);
    w.write_u16_le(tx.header.version)
        .write_u16_le(tx.header.tx_type);

    w.write_var_int(tx.inputs.len() as u64);
    for input in &tx.inputs {
        w.write_bytes(input.previous_output.hash.as_bytes())
            .write_u32_le(input.previous_output.index)
            .write_var_bytes(&input.signature_script)
            .write_u32_le(input.sequence);
    }

    w.write_var_int(tx.outputs.len() as u64);
    for output in &tx.outputs {
        w.write_u64_le(output.value)
            .write_var_bytes(&output.locking_script);
    }

    w.write_u32_le(tx.header.lock_time);
    if tx.header.has_extra_payload() {
        w.write_var_bytes(&tx.header.extra_payload);
    }
    w.into_bytes()
}

/// Transaction id: double SHA-256 of the full serialization.
pub fn hash(tx: &FullTransaction) -> TxHash {
    hash_transaction(&serialize(tx))
}

/// Reads one transaction from `reader`, leaving trailing bytes unread.
pub fn deserialize(reader: &mut ByteReader<'_>) -> Result<FullTransaction, TransactionError> {
    let version = reader.read_u16_le()?;
    let tx_type = reader.read_u16_le()?;

    let input_count = reader.read_count(MIN_INPUT_SIZE)?;
    let mut inputs = Vec::with_capacity(input_count);
    for _ in 0..input_count {
        let hash = TxHash::new(reader.read_array()?);
        let index = reader.read_u32_le()?;
        let script = reader.read_var_bytes()?.to_vec();
        let sequence = reader.read_u32_le()?;
        inputs.push(Input::new(Outpoint::new(hash, index), script, sequence));
    }

    let output_count = reader.read_count(MIN_OUTPUT_SIZE)?;
    let mut outputs = Vec::with_capacity(output_count);
    for index in 0..output_count {
        let value = reader.read_i64_le()?;
        if value < 0 {
            return Err(TransactionError::NegativeValue(value));
        }
        let script = reader.read_var_bytes()?.to_vec();
        outputs.push(Output::new(value as u64, index as u32, script));
    }

    let lock_time = reader.read_u32_le()?;
    let mut header = Transaction::new(version, tx_type, lock_time);
    if header.has_extra_payload() {
        header.extra_payload = reader.read_var_bytes()?.to_vec();
    }
    Ok(FullTransaction::new(header, inputs, outputs))
}

/// Parses a buffer holding exactly one transaction.
pub fn from_bytes(bytes: &[u8]) -> Result<FullTransaction, TransactionError> {
    let mut reader = ByteReader::new(bytes);
    deserialize(&mut reader)
}
