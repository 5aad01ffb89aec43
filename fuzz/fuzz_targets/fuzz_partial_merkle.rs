#![no_main]

use libfuzzer_sys::fuzz_target;

use dashkit_crypto::PartialMerkleTree;

// Layout: 4-byte transaction count, 1-byte flag length, flags, then hashes.
fuzz_target!(|data: &[u8]| {
    if data.len() < 5 {
        return;
    }
    let total = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    let flag_len = data[4] as usize;
    let rest = &data[5..];
    if rest.len() < flag_len {
        return;
    }
    let (flags, hash_bytes) = rest.split_at(flag_len);
    let hashes = hash_bytes
        .chunks_exact(32)
        .map(|chunk| {
            let mut hash = [0u8; 32];
            hash.copy_from_slice(chunk);
            hash
        })
        .collect();

    let tree = PartialMerkleTree::new(total, hashes, flags.to_vec());
    if let Ok(branch) = tree.extract(2_000_000) {
        assert!(tree.verify(&branch.root, 2_000_000).is_ok());
    }
});
