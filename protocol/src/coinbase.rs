//! Coinbase special transaction payload (DIP-0004).
//!
//! `u16 version || u32 height || merkleRootMNList`
//! `[|| merkleRootQuorums]` from version 2,
//! `[|| CompactSize bestCLHeightDiff || 96-byte bestCLSignature || i64 creditPoolBalance]`
//! from version 3.

use dashkit_messages::CoinbaseTransaction;
use dashkit_transactions::{serialize, FullTransaction, TX_TYPE_COINBASE};
use dashkit_utils::{ByteReader, ByteWriter};

use crate::ProtocolError;

pub const CHAIN_LOCK_SIGNATURE_SIZE: usize = 96;

/// Decodes the payload carried by `transaction`.
pub fn from_transaction(transaction: FullTransaction) -> Result<CoinbaseTransaction, ProtocolError> {
    if transaction.header.tx_type != TX_TYPE_COINBASE || !transaction.header.has_extra_payload() {
        return Err(ProtocolError::Malformed(format!(
            "expected coinbase special transaction, got type {} version {}",
            transaction.header.tx_type, transaction.header.version
        )));
    }

    let mut reader = ByteReader::new(&transaction.header.extra_payload);
    let cb_version = reader.read_u16_le()?;
    let height = reader.read_u32_le()?;
    let merkle_root_mn_list = reader.read_array()?;

    let merkle_root_quorums = if cb_version >= 2 {
        Some(reader.read_array()?)
    } else {
        None
    };

    let (best_cl_height_diff, best_cl_signature, credit_pool_balance) = if cb_version >= 3 {
        let diff = reader.read_var_int()?;
        let diff = u32::try_from(diff).map_err(|_| {
            ProtocolError::Malformed(format!("chain lock height diff {diff} out of range"))
        })?;
        let signature = reader.read_bytes(CHAIN_LOCK_SIGNATURE_SIZE)?.to_vec();
        let balance = reader.read_i64_le()?;
        (Some(diff), Some(signature), Some(balance))
    } else {
        (None, None, None)
    };

    Ok(CoinbaseTransaction {
        transaction,
        cb_version,
        height,
        merkle_root_mn_list,
        merkle_root_quorums,
        best_cl_height_diff,
        best_cl_signature,
        credit_pool_balance,
    })
}

pub fn read(reader: &mut ByteReader<'_>) -> Result<CoinbaseTransaction, ProtocolError> {
    let transaction = serialize::deserialize(reader)?;
    from_transaction(transaction)
}

pub fn write(w: &mut ByteWriter, cb_tx: &CoinbaseTransaction) {
    w.write_bytes(&serialize::serialize(&cb_tx.transaction));
}

/// Encodes the payload fields; absent optionals are skipped by version.
pub fn encode_payload(cb_tx: &CoinbaseTransaction) -> Vec<u8> {
    let mut w = ByteWriter::with_capacity(180);
    w.write_u16_le(cb_tx.cb_version)
        .write_u32_le(cb_tx.height)
        .write_bytes(&cb_tx.merkle_root_mn_list);
    if cb_tx.cb_version >= 2 {
        w.write_bytes(&cb_tx.merkle_root_quorums.unwrap_or_default());
    }
    if cb_tx.cb_version >= 3 {
        let signature = cb_tx
            .best_cl_signature
            .clone()
            .unwrap_or_else(|| vec![0; CHAIN_LOCK_SIGNATURE_SIZE]);
        w.write_var_int(u64::from(cb_tx.best_cl_height_diff.unwrap_or_default()))
            .write_bytes(&signature)
            .write_i64_le(cb_tx.credit_pool_balance.unwrap_or_default());
    }
    w.into_bytes()
}

/// Writes the payload fields into the wrapped transaction and rehashes it.
pub fn commit_payload(cb_tx: &mut CoinbaseTransaction) {
    let mut header = cb_tx.transaction.header.clone();
    header.extra_payload = encode_payload(cb_tx);
    cb_tx.transaction = FullTransaction::new(
        header,
        cb_tx.transaction.inputs.clone(),
        cb_tx.transaction.outputs.clone(),
    );
}
