//! Merkle engine.
//!
//! [`merkle_root`] folds a full leaf list into a root the way Bitcoin does:
//! each level pairs adjacent hashes under double SHA-256 and an odd last
//! element is paired with itself.
//!
//! [`PartialMerkleTree`] reproduces the BIP37 `merkleblock` traversal: the
//! implied tree is walked depth-first, one flag bit per visited node. A clear
//! bit (or a leaf) consumes a supplied hash; a set bit on an inner node
//! descends into its children. Set bits on leaves mark matched transactions.

use crate::hash::double_sha256_multi;
use crate::MerkleError;

/// Transactions cannot be smaller than 60 bytes, bounding the leaf count.
const MIN_TRANSACTION_SIZE: u32 = 60;

fn hash_pair(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    double_sha256_multi(&[left, right])
}

/// Merkle root over `leaves` in order. An empty list yields the zero hash.
pub fn merkle_root(leaves: &[[u8; 32]]) -> [u8; 32] {
    if leaves.is_empty() {
        return [0u8; 32];
    }
    let mut level = leaves.to_vec();
    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| hash_pair(&pair[0], pair.get(1).unwrap_or(&pair[0])))
            .collect();
    }
    level[0]
}

/// Result of a partial merkle tree traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleBranch {
    /// The reconstructed root.
    pub root: [u8; 32],
    /// Leaf hashes flagged as matched, in tree order.
    pub matched_hashes: Vec<[u8; 32]>,
}

/// A compressed merkle proof: leaf count, hash list and flag bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialMerkleTree {
    pub total_transactions: u32,
    pub hashes: Vec<[u8; 32]>,
    pub flags: Vec<u8>,
}

struct Traversal<'a> {
    tree: &'a PartialMerkleTree,
    bits_used: usize,
    hashes_used: usize,
    matched: Vec<[u8; 32]>,
}

impl Traversal<'_> {
    fn next_bit(&mut self) -> Result<bool, MerkleError> {
        let byte = self
            .tree
            .flags
            .get(self.bits_used / 8)
            .ok_or(MerkleError::FlagsExhausted)?;
        let bit = byte & (1 << (self.bits_used % 8)) != 0;
        self.bits_used += 1;
        Ok(bit)
    }

    fn next_hash(&mut self) -> Result<[u8; 32], MerkleError> {
        let hash = *self
            .tree
            .hashes
            .get(self.hashes_used)
            .ok_or(MerkleError::HashesExhausted)?;
        self.hashes_used += 1;
        Ok(hash)
    }

    fn walk(&mut self, height: u32, pos: u32) -> Result<[u8; 32], MerkleError> {
        let parent_of_match = self.next_bit()?;
        if height == 0 || !parent_of_match {
            let hash = self.next_hash()?;
            if height == 0 && parent_of_match {
                self.matched.push(hash);
            }
            return Ok(hash);
        }

        let left = self.walk(height - 1, pos * 2)?;
        let right = if pos * 2 + 1 < self.tree.width(height - 1) {
            let right = self.walk(height - 1, pos * 2 + 1)?;
            // CVE-2012-2459: duplicated subtrees would let a forged tree
            // commit to the same root.
            if right == left {
                return Err(MerkleError::DuplicateHashes);
            }
            right
        } else {
            left
        };
        Ok(hash_pair(&left, &right))
    }
}

impl PartialMerkleTree {
    pub fn new(total_transactions: u32, hashes: Vec<[u8; 32]>, flags: Vec<u8>) -> Self {
        Self {
            total_transactions,
            hashes,
            flags,
        }
    }

    /// Number of nodes at `height` (leaves are height 0).
    fn width(&self, height: u32) -> u32 {
        let n = u64::from(self.total_transactions);
        ((n + (1u64 << height) - 1) >> height) as u32
    }

    fn tree_height(&self) -> u32 {
        let mut height = 0;
        while self.width(height) > 1 {
            height += 1;
        }
        height
    }

    /// Reconstruct the root and the matched leaves.
    ///
    /// `max_block_size` bounds the plausible transaction count.
    pub fn extract(&self, max_block_size: u32) -> Result<MerkleBranch, MerkleError> {
        if self.total_transactions == 0 {
            return Err(MerkleError::NoTransactions);
        }
        if self.total_transactions > max_block_size / MIN_TRANSACTION_SIZE {
            return Err(MerkleError::TooManyTransactions(self.total_transactions));
        }
        if self.hashes.len() > self.total_transactions as usize {
            return Err(MerkleError::TooManyHashes);
        }
        if self.flags.len() * 8 < self.hashes.len() {
            return Err(MerkleError::FlagsExhausted);
        }

        let mut traversal = Traversal {
            tree: self,
            bits_used: 0,
            hashes_used: 0,
            matched: Vec::new(),
        };
        let root = traversal.walk(self.tree_height(), 0)?;

        if (traversal.bits_used + 7) / 8 != self.flags.len() {
            return Err(MerkleError::UnconsumedFlags);
        }
        if traversal.hashes_used != self.hashes.len() {
            return Err(MerkleError::UnconsumedHashes);
        }
        Ok(MerkleBranch {
            root,
            matched_hashes: traversal.matched,
        })
    }

    /// Reconstruct and require the root to equal `expected_root`.
    pub fn verify(
        &self,
        expected_root: &[u8; 32],
        max_block_size: u32,
    ) -> Result<MerkleBranch, MerkleError> {
        let branch = self.extract(max_block_size)?;
        if &branch.root != expected_root {
            tracing::debug!("partial merkle root does not match header");
            return Err(MerkleError::MerkleMismatch);
        }
        Ok(branch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX_BLOCK: u32 = 2_000_000;

    fn leaf(n: u8) -> [u8; 32] {
        [n; 32]
    }

    #[test]
    fn single_leaf_root_is_leaf() {
        assert_eq!(merkle_root(&[leaf(7)]), leaf(7));
    }

    #[test]
    fn empty_root_is_zero() {
        assert_eq!(merkle_root(&[]), [0u8; 32]);
    }

    #[test]
    fn odd_leaf_pairs_with_itself() {
        let ab = hash_pair(&leaf(1), &leaf(2));
        let cc = hash_pair(&leaf(3), &leaf(3));
        assert_eq!(merkle_root(&[leaf(1), leaf(2), leaf(3)]), hash_pair(&ab, &cc));
    }

    #[test]
    fn single_transaction_block_branch() {
        // A block holding only its coinbase: one hash, flag bit set.
        let tree = PartialMerkleTree::new(1, vec![leaf(9)], vec![0x01]);
        let branch = tree.verify(&leaf(9), MAX_BLOCK).unwrap();
        assert_eq!(branch.matched_hashes, vec![leaf(9)]);
    }

    #[test]
    fn coinbase_match_in_three_transaction_block() {
        let leaves = [leaf(1), leaf(2), leaf(3)];
        let root = merkle_root(&leaves);
        let right = hash_pair(&leaf(3), &leaf(3));
        // Traversal: root(1) -> left inner(1) -> leaf0(1, matched) -> leaf1(0)
        // -> right inner(0, hash supplied). Bits: 1,1,1,0,0 = 0b00111.
        let tree = PartialMerkleTree::new(3, vec![leaf(1), leaf(2), right], vec![0b0000_0111]);
        let branch = tree.verify(&root, MAX_BLOCK).unwrap();
        assert_eq!(branch.root, root);
        assert_eq!(branch.matched_hashes, vec![leaf(1)]);
    }

    #[test]
    fn wrong_root_is_mismatch() {
        let tree = PartialMerkleTree::new(1, vec![leaf(9)], vec![0x01]);
        assert_eq!(
            tree.verify(&leaf(8), MAX_BLOCK),
            Err(MerkleError::MerkleMismatch)
        );
    }

    #[test]
    fn zero_transactions_rejected() {
        let tree = PartialMerkleTree::new(0, vec![], vec![]);
        assert_eq!(tree.extract(MAX_BLOCK), Err(MerkleError::NoTransactions));
    }

    #[test]
    fn missing_hashes_rejected() {
        let tree = PartialMerkleTree::new(3, vec![leaf(1)], vec![0b0000_0111]);
        assert_eq!(tree.extract(MAX_BLOCK), Err(MerkleError::HashesExhausted));
    }

    #[test]
    fn extra_hashes_rejected() {
        let tree = PartialMerkleTree::new(2, vec![leaf(1), leaf(2)], vec![0x00]);
        assert_eq!(tree.extract(MAX_BLOCK), Err(MerkleError::UnconsumedHashes));
    }

    #[test]
    fn extra_flag_bytes_rejected() {
        let tree = PartialMerkleTree::new(1, vec![leaf(9)], vec![0x01, 0x00]);
        assert_eq!(tree.extract(MAX_BLOCK), Err(MerkleError::UnconsumedFlags));
    }

    #[test]
    fn duplicated_siblings_rejected() {
        // Both leaves supplied and equal under a descended root.
        let tree = PartialMerkleTree::new(2, vec![leaf(4), leaf(4)], vec![0b0000_0011]);
        assert_eq!(tree.extract(MAX_BLOCK), Err(MerkleError::DuplicateHashes));
    }

    #[test]
    fn implausible_transaction_count_rejected() {
        let tree = PartialMerkleTree::new(u32::MAX, vec![leaf(1)], vec![0x01]);
        assert!(matches!(
            tree.extract(MAX_BLOCK),
            Err(MerkleError::TooManyTransactions(_))
        ));
    }
}
