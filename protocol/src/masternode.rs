//! Simplified masternode list entry codec.

use dashkit_crypto::sha256_multi;
use dashkit_types::masternode::MASTERNODE_TYPE_HPMN;
use dashkit_types::{BlockHash, Masternode, TxHash};
use dashkit_utils::{ByteReader, ByteWriter};

use crate::version::SMNLE_VERSIONED_PROTO_VERSION;
use crate::ProtocolError;

/// Entry version whose entries carry a masternode type.
pub const BASIC_BLS_VERSION: u16 = 2;
/// Entry version assumed when the wire omits it.
pub const LEGACY_BLS_VERSION: u16 = 1;

pub const OPERATOR_KEY_SIZE: usize = 48;

/// Smallest possible entry, used to bound hostile list counts.
pub const MIN_ENTRY_SIZE: usize = 32 + 32 + 16 + 2 + OPERATOR_KEY_SIZE + 20 + 1;

pub fn read_entry(
    reader: &mut ByteReader<'_>,
    protocol_version: i32,
) -> Result<Masternode, ProtocolError> {
    let n_version = if protocol_version >= SMNLE_VERSIONED_PROTO_VERSION {
        reader.read_u16_le()?
    } else {
        LEGACY_BLS_VERSION
    };
    let pro_reg_tx_hash = TxHash::new(reader.read_array()?);
    let confirmed_hash = BlockHash::new(reader.read_array()?);
    let ip_address = reader.read_array::<16>()?;
    let port = reader.read_u16_be()?;
    let pub_key_operator = reader.read_bytes(OPERATOR_KEY_SIZE)?.to_vec();
    let key_id_voting = reader.read_array::<20>()?;
    let is_valid = reader.read_u8()? != 0;

    let mut masternode_type = None;
    let mut platform_http_port = None;
    let mut platform_node_id = None;
    if n_version >= BASIC_BLS_VERSION {
        let kind = reader.read_u16_le()?;
        if kind == MASTERNODE_TYPE_HPMN {
            platform_http_port = Some(reader.read_u16_le()?);
            platform_node_id = Some(reader.read_array::<20>()?);
        }
        masternode_type = Some(kind);
    }

    let confirmed_hash_with_pro_reg_tx_hash =
        sha256_multi(&[pro_reg_tx_hash.as_bytes(), confirmed_hash.as_bytes()]);

    Ok(Masternode {
        n_version,
        pro_reg_tx_hash,
        confirmed_hash,
        confirmed_hash_with_pro_reg_tx_hash,
        ip_address,
        port,
        pub_key_operator,
        key_id_voting,
        is_valid,
        masternode_type,
        platform_http_port,
        platform_node_id,
    })
}

/// Fields shared by the wire form and the hashing form (no `nVersion`).
fn write_body(w: &mut ByteWriter, mn: &Masternode) {
    w.write_bytes(mn.pro_reg_tx_hash.as_bytes())
        .write_bytes(mn.confirmed_hash.as_bytes())
        .write_bytes(&mn.ip_address)
        .write_u16_be(mn.port)
        .write_bytes(&mn.pub_key_operator)
        .write_bytes(&mn.key_id_voting)
        .write_u8(u8::from(mn.is_valid));
    if mn.n_version >= BASIC_BLS_VERSION {
        let kind = mn.masternode_type.unwrap_or_default();
        w.write_u16_le(kind);
        if kind == MASTERNODE_TYPE_HPMN {
            w.write_u16_le(mn.platform_http_port.unwrap_or_default())
                .write_bytes(&mn.platform_node_id.unwrap_or_default());
        }
    }
}

pub fn write_entry(w: &mut ByteWriter, mn: &Masternode, protocol_version: i32) {
    if protocol_version >= SMNLE_VERSIONED_PROTO_VERSION {
        w.write_u16_le(mn.n_version);
    }
    write_body(w, mn);
}

/// Serialization hashed into the masternode list merkle tree.
pub fn hashing_bytes(mn: &Masternode) -> Vec<u8> {
    let mut w = ByteWriter::with_capacity(MIN_ENTRY_SIZE + 24);
    write_body(&mut w, mn);
    w.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PROTOCOL_VERSION;

    fn hpmn() -> Masternode {
        let pro_reg_tx_hash = TxHash::new([1; 32]);
        let confirmed_hash = BlockHash::new([2; 32]);
        Masternode {
            n_version: BASIC_BLS_VERSION,
            pro_reg_tx_hash,
            confirmed_hash,
            confirmed_hash_with_pro_reg_tx_hash: sha256_multi(&[&[1; 32], &[2; 32]]),
            ip_address: [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xff, 0xff, 10, 0, 0, 1],
            port: 9999,
            pub_key_operator: vec![3; OPERATOR_KEY_SIZE],
            key_id_voting: [4; 20],
            is_valid: true,
            masternode_type: Some(MASTERNODE_TYPE_HPMN),
            platform_http_port: Some(443),
            platform_node_id: Some([5; 20]),
        }
    }

    #[test]
    fn versioned_entry_roundtrip() {
        let mn = hpmn();
        let mut w = ByteWriter::new();
        write_entry(&mut w, &mn, PROTOCOL_VERSION);
        let bytes = w.into_bytes();
        let parsed = read_entry(&mut ByteReader::new(&bytes), PROTOCOL_VERSION).unwrap();
        assert_eq!(parsed, mn);
    }

    #[test]
    fn legacy_entry_has_no_version_or_type() {
        let mut mn = hpmn();
        mn.n_version = LEGACY_BLS_VERSION;
        mn.masternode_type = None;
        mn.platform_http_port = None;
        mn.platform_node_id = None;
        let mut w = ByteWriter::new();
        write_entry(&mut w, &mn, 70214);
        assert_eq!(w.len(), MIN_ENTRY_SIZE);
        let bytes = w.into_bytes();
        let parsed = read_entry(&mut ByteReader::new(&bytes), 70214).unwrap();
        assert_eq!(parsed, mn);
    }

    #[test]
    fn hashing_form_omits_version() {
        let mn = hpmn();
        let mut w = ByteWriter::new();
        write_entry(&mut w, &mn, PROTOCOL_VERSION);
        assert_eq!(&w.as_slice()[2..], hashing_bytes(&mn).as_slice());
    }

    #[test]
    fn port_is_read_big_endian() {
        let mn = hpmn();
        let bytes = hashing_bytes(&mn);
        assert_eq!(&bytes[80..82], &[0x27, 0x0f]);
    }
}
