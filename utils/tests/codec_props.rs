use proptest::prelude::*;

use dashkit_utils::{ByteReader, ByteWriter};

proptest! {
    /// Arbitrary input never panics the var-int reader.
    #[test]
    fn var_int_reader_never_panics(data in prop::collection::vec(any::<u8>(), 0..16)) {
        let mut r = ByteReader::new(&data);
        let _ = r.read_var_int();
    }

    /// Var-bytes written then read yield the original payload.
    #[test]
    fn var_bytes_roundtrip(payload in prop::collection::vec(any::<u8>(), 0..600)) {
        let mut w = ByteWriter::new();
        w.write_var_bytes(&payload);
        let bytes = w.into_bytes();
        let mut r = ByteReader::new(&bytes);
        prop_assert_eq!(r.read_var_bytes().unwrap(), payload.as_slice());
        prop_assert!(r.is_empty());
    }
}
