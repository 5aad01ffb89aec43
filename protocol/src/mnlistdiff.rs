//! `getmnlistd` / `mnlistdiff` codecs.

use dashkit_messages::{
    GetMasternodeListDiffMessage, MasternodeListDiffMessage, QuorumChainLockSignature,
};
use dashkit_types::{BlockHash, QuorumId, TxHash};
use dashkit_utils::{ByteReader, ByteWriter};

use crate::version::{
    BLS_SCHEME_PROTO_VERSION, MNLISTDIFF_CHAINLOCKS_PROTO_VERSION, MNLISTDIFF_VERSION_ORDER,
};
use crate::{coinbase, masternode, quorum, ProtocolError};

/// `nVersion` assumed for diffs from peers that do not send it.
pub const DEFAULT_DIFF_VERSION: u16 = 1;

pub fn serialize_request(request: &GetMasternodeListDiffMessage) -> Vec<u8> {
    let mut w = ByteWriter::with_capacity(64);
    w.write_bytes(request.base_block_hash.as_bytes())
        .write_bytes(request.block_hash.as_bytes());
    w.into_bytes()
}

pub fn parse_request(payload: &[u8]) -> Result<GetMasternodeListDiffMessage, ProtocolError> {
    let mut reader = ByteReader::new(payload);
    Ok(GetMasternodeListDiffMessage {
        base_block_hash: BlockHash::new(reader.read_array()?),
        block_hash: BlockHash::new(reader.read_array()?),
    })
}

fn read_hashes(reader: &mut ByteReader<'_>) -> Result<Vec<[u8; 32]>, ProtocolError> {
    let count = reader.read_count(32)?;
    (0..count)
        .map(|_| reader.read_array().map_err(ProtocolError::from))
        .collect()
}

pub fn parse(payload: &[u8], protocol_version: i32) -> Result<MasternodeListDiffMessage, ProtocolError> {
    let mut reader = ByteReader::new(payload);

    let mut n_version = DEFAULT_DIFF_VERSION;
    if protocol_version >= MNLISTDIFF_VERSION_ORDER {
        n_version = reader.read_u16_le()?;
    }
    let base_block_hash = BlockHash::new(reader.read_array()?);
    let block_hash = BlockHash::new(reader.read_array()?);

    let total_transactions = reader.read_u32_le()?;
    let merkle_hashes = read_hashes(&mut reader)?;
    let merkle_flags = reader.read_var_bytes()?.to_vec();
    let cb_tx = coinbase::read(&mut reader)?;

    if (BLS_SCHEME_PROTO_VERSION..MNLISTDIFF_VERSION_ORDER).contains(&protocol_version) {
        n_version = reader.read_u16_le()?;
    }

    let deleted_mns = read_hashes(&mut reader)?
        .into_iter()
        .map(TxHash::new)
        .collect();

    let count = reader.read_count(masternode::MIN_ENTRY_SIZE)?;
    let mut mn_list = Vec::with_capacity(count);
    for _ in 0..count {
        mn_list.push(masternode::read_entry(&mut reader, protocol_version)?);
    }

    let count = reader.read_count(33)?;
    let mut deleted_quorums = Vec::with_capacity(count);
    for _ in 0..count {
        let quorum_type = reader.read_u8()?;
        let quorum_hash = BlockHash::new(reader.read_array()?);
        deleted_quorums.push(QuorumId::new(quorum_type, quorum_hash));
    }

    let count = reader.read_count(quorum::MIN_COMMITMENT_SIZE)?;
    let mut quorum_list = Vec::with_capacity(count);
    for _ in 0..count {
        quorum_list.push(quorum::read_commitment(&mut reader)?);
    }

    let mut quorums_cl_sigs = Vec::new();
    if protocol_version >= MNLISTDIFF_CHAINLOCKS_PROTO_VERSION {
        let count = reader.read_count(coinbase::CHAIN_LOCK_SIGNATURE_SIZE + 1)?;
        for _ in 0..count {
            let signature = reader
                .read_bytes(coinbase::CHAIN_LOCK_SIGNATURE_SIZE)?
                .to_vec();
            let indexes = reader.read_count(2)?;
            let quorum_indexes = (0..indexes)
                .map(|_| reader.read_u16_le())
                .collect::<Result<Vec<u16>, _>>()?;
            quorums_cl_sigs.push(QuorumChainLockSignature {
                signature,
                quorum_indexes,
            });
        }
    }

    Ok(MasternodeListDiffMessage {
        n_version,
        base_block_hash,
        block_hash,
        total_transactions,
        merkle_hashes,
        merkle_flags,
        cb_tx,
        deleted_mns,
        mn_list,
        deleted_quorums,
        quorum_list,
        quorums_cl_sigs,
    })
}

pub fn serialize(diff: &MasternodeListDiffMessage, protocol_version: i32) -> Vec<u8> {
    let mut w = ByteWriter::with_capacity(1024);
    if protocol_version >= MNLISTDIFF_VERSION_ORDER {
        w.write_u16_le(diff.n_version);
    }
    w.write_bytes(diff.base_block_hash.as_bytes())
        .write_bytes(diff.block_hash.as_bytes())
        .write_u32_le(diff.total_transactions)
        .write_var_int(diff.merkle_hashes.len() as u64);
    for hash in &diff.merkle_hashes {
        w.write_bytes(hash);
    }
    w.write_var_bytes(&diff.merkle_flags);
    coinbase::write(&mut w, &diff.cb_tx);

    if (BLS_SCHEME_PROTO_VERSION..MNLISTDIFF_VERSION_ORDER).contains(&protocol_version) {
        w.write_u16_le(diff.n_version);
    }

    w.write_var_int(diff.deleted_mns.len() as u64);
    for hash in &diff.deleted_mns {
        w.write_bytes(hash.as_bytes());
    }
    w.write_var_int(diff.mn_list.len() as u64);
    for mn in &diff.mn_list {
        masternode::write_entry(&mut w, mn, protocol_version);
    }
    w.write_var_int(diff.deleted_quorums.len() as u64);
    for id in &diff.deleted_quorums {
        w.write_u8(id.quorum_type)
            .write_bytes(id.quorum_hash.as_bytes());
    }
    w.write_var_int(diff.quorum_list.len() as u64);
    for quorum in &diff.quorum_list {
        quorum::write_commitment(&mut w, quorum);
    }

    if protocol_version >= MNLISTDIFF_CHAINLOCKS_PROTO_VERSION {
        w.write_var_int(diff.quorums_cl_sigs.len() as u64);
        for sig in &diff.quorums_cl_sigs {
            w.write_bytes(&sig.signature)
                .write_var_int(sig.quorum_indexes.len() as u64);
            for index in &sig.quorum_indexes {
                w.write_u16_le(*index);
            }
        }
    }
    w.into_bytes()
}
