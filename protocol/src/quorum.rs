//! Quorum final commitment codec.

use dashkit_crypto::double_sha256;
use dashkit_types::{BlockHash, Quorum};
use dashkit_utils::{ByteReader, ByteWriter};

use crate::ProtocolError;

pub const QUORUM_PUBLIC_KEY_SIZE: usize = 48;
pub const QUORUM_SIGNATURE_SIZE: usize = 96;

/// Smallest possible commitment, used to bound hostile list counts.
pub const MIN_COMMITMENT_SIZE: usize =
    2 + 1 + 32 + 1 + 1 + QUORUM_PUBLIC_KEY_SIZE + 32 + 2 * QUORUM_SIGNATURE_SIZE;

fn read_bitset(reader: &mut ByteReader<'_>) -> Result<(u64, Vec<u8>), ProtocolError> {
    let bits = reader.read_var_int()?;
    let len = bits.div_ceil(8);
    if len > reader.remaining() as u64 {
        return Err(ProtocolError::Malformed(format!(
            "bitset of {bits} bits exceeds message"
        )));
    }
    Ok((bits, reader.read_bytes(len as usize)?.to_vec()))
}

/// Reads one commitment; `data_hash` is the double SHA-256 of its raw bytes.
pub fn read_commitment(reader: &mut ByteReader<'_>) -> Result<Quorum, ProtocolError> {
    let start = reader.position();
    let version = reader.read_u16_le()?;
    let quorum_type = reader.read_u8()?;
    let quorum_hash = BlockHash::new(reader.read_array()?);
    let quorum_index = if Quorum::is_indexed_version(version) {
        Some(reader.read_u16_le()?)
    } else {
        None
    };
    let (signers_count, signers) = read_bitset(reader)?;
    let (valid_members_count, valid_members) = read_bitset(reader)?;
    let quorum_public_key = reader.read_bytes(QUORUM_PUBLIC_KEY_SIZE)?.to_vec();
    let quorum_vvec_hash = reader.read_array()?;
    let quorum_sig = reader.read_bytes(QUORUM_SIGNATURE_SIZE)?.to_vec();
    let members_sig = reader.read_bytes(QUORUM_SIGNATURE_SIZE)?.to_vec();
    let data_hash = double_sha256(reader.consumed_since(start));

    Ok(Quorum {
        version,
        quorum_type,
        quorum_hash,
        quorum_index,
        signers_count,
        signers,
        valid_members_count,
        valid_members,
        quorum_public_key,
        quorum_vvec_hash,
        quorum_sig,
        members_sig,
        data_hash,
    })
}

pub fn write_commitment(w: &mut ByteWriter, quorum: &Quorum) {
    w.write_u16_le(quorum.version)
        .write_u8(quorum.quorum_type)
        .write_bytes(quorum.quorum_hash.as_bytes());
    if Quorum::is_indexed_version(quorum.version) {
        w.write_u16_le(quorum.quorum_index.unwrap_or_default());
    }
    w.write_var_int(quorum.signers_count)
        .write_bytes(&quorum.signers)
        .write_var_int(quorum.valid_members_count)
        .write_bytes(&quorum.valid_members)
        .write_bytes(&quorum.quorum_public_key)
        .write_bytes(&quorum.quorum_vvec_hash)
        .write_bytes(&quorum.quorum_sig)
        .write_bytes(&quorum.members_sig);
}

/// Builds a commitment and computes its `data_hash` from the encoding.
#[allow(clippy::too_many_arguments)]
pub fn new_commitment(
    version: u16,
    quorum_type: u8,
    quorum_hash: BlockHash,
    quorum_index: Option<u16>,
    members: u64,
    quorum_public_key: Vec<u8>,
    quorum_sig: Vec<u8>,
    members_sig: Vec<u8>,
) -> Quorum {
    let bitset = vec![0xff; members.div_ceil(8) as usize];
    let mut quorum = Quorum {
        version,
        quorum_type,
        quorum_hash,
        quorum_index,
        signers_count: members,
        signers: bitset.clone(),
        valid_members_count: members,
        valid_members: bitset,
        quorum_public_key,
        quorum_vvec_hash: [0u8; 32],
        quorum_sig,
        members_sig,
        data_hash: [0u8; 32],
    };
    let mut w = ByteWriter::new();
    write_commitment(&mut w, &quorum);
    quorum.data_hash = double_sha256(w.as_slice());
    quorum
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(version: u16) -> Quorum {
        new_commitment(
            version,
            1,
            BlockHash::new([9; 32]),
            Quorum::is_indexed_version(version).then_some(3),
            50,
            vec![1; QUORUM_PUBLIC_KEY_SIZE],
            vec![2; QUORUM_SIGNATURE_SIZE],
            vec![3; QUORUM_SIGNATURE_SIZE],
        )
    }

    #[test]
    fn commitment_roundtrip_keeps_data_hash() {
        for version in [1u16, 2, 3, 4] {
            let quorum = sample(version);
            let mut w = ByteWriter::new();
            write_commitment(&mut w, &quorum);
            let bytes = w.into_bytes();
            let parsed = read_commitment(&mut ByteReader::new(&bytes)).unwrap();
            assert_eq!(parsed, quorum, "version {version}");
        }
    }

    #[test]
    fn bitset_is_rounded_up_to_bytes() {
        let quorum = sample(1);
        assert_eq!(quorum.signers.len(), 7);
    }

    #[test]
    fn oversized_bitset_is_rejected() {
        let mut w = ByteWriter::new();
        w.write_u16_le(1).write_u8(1).write_bytes(&[0; 32]).write_var_int(u64::from(u32::MAX));
        let bytes = w.into_bytes();
        assert!(matches!(
            read_commitment(&mut ByteReader::new(&bytes)),
            Err(ProtocolError::Malformed(_))
        ));
    }
}
