//! Diff fixtures whose coinbase commits to the lists they produce.

#![allow(dead_code)]

use dashkit_crypto::sha256_multi;
use dashkit_masternode_list::{masternode_list_merkle_root, quorum_list_merkle_root};
use dashkit_messages::{CoinbaseTransaction, MasternodeListDiffMessage};
use dashkit_protocol::coinbase::commit_payload;
use dashkit_protocol::quorum::new_commitment;
use dashkit_transactions::{script, FullTransaction, Input, Outpoint, Output, Transaction, TX_TYPE_COINBASE};
use dashkit_types::{Block, BlockHash, BlockHeader, Masternode, Quorum, QuorumId, TxHash};

pub fn block_hash(n: u8) -> BlockHash {
    BlockHash::new([n; 32])
}

pub fn masternode(n: u8, port: u16) -> Masternode {
    let pro_reg_tx_hash = TxHash::new([n; 32]);
    let confirmed_hash = BlockHash::new([n.wrapping_add(100); 32]);
    Masternode {
        n_version: 1,
        pro_reg_tx_hash,
        confirmed_hash,
        confirmed_hash_with_pro_reg_tx_hash: sha256_multi(&[
            pro_reg_tx_hash.as_bytes(),
            confirmed_hash.as_bytes(),
        ]),
        ip_address: [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xff, 0xff, 10, 0, 0, n],
        port,
        pub_key_operator: vec![n; 48],
        key_id_voting: [n; 20],
        is_valid: true,
        masternode_type: None,
        platform_http_port: None,
        platform_node_id: None,
    }
}

pub fn quorum(n: u8) -> Quorum {
    new_commitment(
        1,
        1,
        BlockHash::new([n; 32]),
        None,
        50,
        vec![n; 48],
        vec![n; 96],
        vec![n; 96],
    )
}

/// Coinbase committing to the given final lists (sorted by identity).
pub fn coinbase(cb_version: u16, masternodes: &[Masternode], quorums: &[Quorum]) -> CoinbaseTransaction {
    let mut sorted = masternodes.to_vec();
    sorted.sort_by_key(|m| m.pro_reg_tx_hash);
    let mut cb = CoinbaseTransaction {
        transaction: FullTransaction::new(
            Transaction::new(3, TX_TYPE_COINBASE, 0),
            vec![Input::new(Outpoint::new(TxHash::ZERO, u32::MAX), vec![0x03, 1, 2, 3], u32::MAX)],
            vec![Output::new(500_000_000, 0, script::p2pkh(&[8u8; 20]))],
        ),
        cb_version,
        height: 1_000,
        merkle_root_mn_list: masternode_list_merkle_root(&sorted),
        merkle_root_quorums: (cb_version >= 2).then(|| quorum_list_merkle_root(quorums)),
        best_cl_height_diff: None,
        best_cl_signature: None,
        credit_pool_balance: None,
    };
    commit_payload(&mut cb);
    cb
}

/// A stored header whose only transaction is `cb`.
pub fn block_with(hash: BlockHash, cb: &CoinbaseTransaction) -> Block {
    Block::new(
        BlockHeader {
            version: 1,
            previous_block_hash: BlockHash::ZERO,
            merkle_root: *cb.hash().as_bytes(),
            timestamp: 0,
            bits: 0,
            nonce: 0,
            header_hash: hash,
        },
        1_000,
    )
}

pub struct DiffBuilder {
    pub diff: MasternodeListDiffMessage,
}

impl DiffBuilder {
    pub fn new(base: BlockHash, block: BlockHash, cb: CoinbaseTransaction) -> Self {
        let cb_hash = *cb.hash().as_bytes();
        Self {
            diff: MasternodeListDiffMessage {
                n_version: 1,
                base_block_hash: base,
                block_hash: block,
                total_transactions: 1,
                merkle_hashes: vec![cb_hash],
                merkle_flags: vec![0x01],
                cb_tx: cb,
                deleted_mns: vec![],
                mn_list: vec![],
                deleted_quorums: vec![],
                quorum_list: vec![],
                quorums_cl_sigs: vec![],
            },
        }
    }

    pub fn add_masternodes(mut self, mns: Vec<Masternode>) -> Self {
        self.diff.mn_list = mns;
        self
    }

    pub fn delete_masternodes(mut self, ids: Vec<TxHash>) -> Self {
        self.diff.deleted_mns = ids;
        self
    }

    pub fn add_quorums(mut self, quorums: Vec<Quorum>) -> Self {
        self.diff.quorum_list = quorums;
        self
    }

    pub fn delete_quorums(mut self, ids: Vec<QuorumId>) -> Self {
        self.diff.deleted_quorums = ids;
        self
    }

    pub fn build(self) -> MasternodeListDiffMessage {
        self.diff
    }
}
