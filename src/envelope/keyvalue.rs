//! mvcc KeyValue envelope
//!
//! Every value in etcd's `key` bucket is an `mvccpb.KeyValue` protobuf
//! message wrapping the logical key and the user payload:
//!
//! ```text
//! 1: key             (bytes)
//! 2: create_revision (int64)
//! 3: mod_revision    (int64)
//! 4: version         (int64)
//! 5: value           (bytes)
//! 6: lease           (int64)
//! ```
//!
//! Unknown fields are skipped; malformed framing is a per-record error.

use super::errors::EnvelopeResult;
use super::wire::{expect_wire_type, WireReader, WIRE_LEN, WIRE_VARINT};

/// Decoded mvcc key-value envelope
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValue {
    /// The logical key, e.g. `/registry/configmaps/default/foo`
    pub key: Vec<u8>,
    pub create_revision: i64,
    pub mod_revision: i64,
    pub version: i64,
    /// The stored payload
    pub value: Vec<u8>,
    pub lease: i64,
}

impl KeyValue {
    /// Decodes one KeyValue message from a bolt record value
    pub fn decode(buf: &[u8]) -> EnvelopeResult<Self> {
        let mut reader = WireReader::new(buf);
        let mut kv = KeyValue::default();

        while reader.has_remaining() {
            let offset = reader.pos();
            let (field, wire_type) = reader.read_tag()?;
            match field {
                1 => {
                    expect_wire_type(field, wire_type, WIRE_LEN, offset)?;
                    kv.key = reader.read_bytes()?.to_vec();
                }
                2 => {
                    expect_wire_type(field, wire_type, WIRE_VARINT, offset)?;
                    kv.create_revision = reader.read_varint()? as i64;
                }
                3 => {
                    expect_wire_type(field, wire_type, WIRE_VARINT, offset)?;
                    kv.mod_revision = reader.read_varint()? as i64;
                }
                4 => {
                    expect_wire_type(field, wire_type, WIRE_VARINT, offset)?;
                    kv.version = reader.read_varint()? as i64;
                }
                5 => {
                    expect_wire_type(field, wire_type, WIRE_LEN, offset)?;
                    kv.value = reader.read_bytes()?.to_vec();
                }
                6 => {
                    expect_wire_type(field, wire_type, WIRE_VARINT, offset)?;
                    kv.lease = reader.read_varint()? as i64;
                }
                _ => reader.skip(field, wire_type)?,
            }
        }
        Ok(kv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::errors::EnvelopeError;

    fn varint(mut value: u64, buf: &mut Vec<u8>) {
        loop {
            let mut byte = (value & 0x7F) as u8;
            value >>= 7;
            if value != 0 {
                byte |= 0x80;
            }
            buf.push(byte);
            if value == 0 {
                return;
            }
        }
    }

    fn bytes_field(field: u32, data: &[u8], buf: &mut Vec<u8>) {
        varint(u64::from(field) << 3 | 2, buf);
        varint(data.len() as u64, buf);
        buf.extend_from_slice(data);
    }

    fn varint_field(field: u32, value: i64, buf: &mut Vec<u8>) {
        varint(u64::from(field) << 3, buf);
        varint(value as u64, buf);
    }

    #[test]
    fn test_decode_full_message() {
        let mut buf = Vec::new();
        bytes_field(1, b"/registry/configmaps/default/foo", &mut buf);
        varint_field(2, 5, &mut buf);
        varint_field(3, 5, &mut buf);
        varint_field(4, 1, &mut buf);
        bytes_field(5, b"payload", &mut buf);
        varint_field(6, 0, &mut buf);

        let kv = KeyValue::decode(&buf).unwrap();
        assert_eq!(kv.key, b"/registry/configmaps/default/foo");
        assert_eq!(kv.create_revision, 5);
        assert_eq!(kv.mod_revision, 5);
        assert_eq!(kv.version, 1);
        assert_eq!(kv.value, b"payload");
        assert_eq!(kv.lease, 0);
    }

    #[test]
    fn test_unknown_fields_skipped() {
        let mut buf = Vec::new();
        bytes_field(1, b"/registry/x", &mut buf);
        bytes_field(9, b"future", &mut buf);
        varint_field(10, 42, &mut buf);
        bytes_field(5, b"v", &mut buf);

        let kv = KeyValue::decode(&buf).unwrap();
        assert_eq!(kv.key, b"/registry/x");
        assert_eq!(kv.value, b"v");
    }

    #[test]
    fn test_negative_int64_roundtrip() {
        // Negative int64s are sign-extended ten-byte varints on the wire.
        let mut buf = Vec::new();
        varint_field(6, -1, &mut buf);
        let kv = KeyValue::decode(&buf).unwrap();
        assert_eq!(kv.lease, -1);
    }

    #[test]
    fn test_truncated_value_rejected() {
        let mut buf = Vec::new();
        bytes_field(5, b"payload", &mut buf);
        buf.truncate(buf.len() - 3);
        assert!(matches!(
            KeyValue::decode(&buf),
            Err(EnvelopeError::Truncated(_))
        ));
    }

    #[test]
    fn test_wrong_wire_type_rejected() {
        // Field 1 (bytes) encoded as a varint.
        let mut buf = Vec::new();
        varint_field(1, 7, &mut buf);
        assert!(matches!(
            KeyValue::decode(&buf),
            Err(EnvelopeError::UnsupportedWireType { field: 1, .. })
        ));
    }

    #[test]
    fn test_empty_message_is_default() {
        assert_eq!(KeyValue::decode(b"").unwrap(), KeyValue::default());
    }
}
