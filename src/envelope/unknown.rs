//! Typed resource envelope and magic prefix
//!
//! Kubernetes prefixes every protobuf-framed object in etcd with a 4-byte
//! magic (`k8s` + NUL) followed by an apimachinery `runtime.Unknown`
//! message:
//!
//! ```text
//! 1: typeMeta        (message: 1 = apiVersion string, 2 = kind string)
//! 2: raw             (bytes, the serialized object)
//! 3: contentEncoding (string)
//! 4: contentType     (string)
//! ```
//!
//! The magic gates interpretation: store values without it are not resource
//! payloads and are filtered out, not errors.

use super::errors::{EnvelopeError, EnvelopeResult};
use super::wire::{expect_wire_type, WireReader, WIRE_LEN};

/// The 4-byte signature marking a typed resource payload: `k8s\0`
pub const RESOURCE_MAGIC: [u8; 4] = [0x6b, 0x38, 0x73, 0x00];

/// Returns true iff `value` begins with the resource magic.
/// Values shorter than the magic are simply not resources.
pub fn has_resource_magic(value: &[u8]) -> bool {
    value.len() >= RESOURCE_MAGIC.len() && value[..RESOURCE_MAGIC.len()] == RESOURCE_MAGIC
}

/// The type identity carried by the envelope
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeMeta {
    pub api_version: String,
    pub kind: String,
}

impl TypeMeta {
    fn decode(buf: &[u8]) -> EnvelopeResult<Self> {
        let mut reader = WireReader::new(buf);
        let mut meta = TypeMeta::default();

        while reader.has_remaining() {
            let offset = reader.pos();
            let (field, wire_type) = reader.read_tag()?;
            match field {
                1 => {
                    expect_wire_type(field, wire_type, WIRE_LEN, offset)?;
                    meta.api_version = decode_string(reader.read_bytes()?, "apiVersion")?;
                }
                2 => {
                    expect_wire_type(field, wire_type, WIRE_LEN, offset)?;
                    meta.kind = decode_string(reader.read_bytes()?, "kind")?;
                }
                _ => reader.skip(field, wire_type)?,
            }
        }
        Ok(meta)
    }
}

/// A typed-or-opaque resource payload with its type identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Unknown {
    pub type_meta: TypeMeta,
    /// The serialized object; opaque until a decoder matches the type meta
    pub raw: Vec<u8>,
    pub content_encoding: String,
    pub content_type: String,
}

impl Unknown {
    /// Decodes one Unknown message. The caller strips the magic prefix first.
    pub fn decode(buf: &[u8]) -> EnvelopeResult<Self> {
        let mut reader = WireReader::new(buf);
        let mut unknown = Unknown::default();

        while reader.has_remaining() {
            let offset = reader.pos();
            let (field, wire_type) = reader.read_tag()?;
            match field {
                1 => {
                    expect_wire_type(field, wire_type, WIRE_LEN, offset)?;
                    unknown.type_meta = TypeMeta::decode(reader.read_bytes()?)?;
                }
                2 => {
                    expect_wire_type(field, wire_type, WIRE_LEN, offset)?;
                    unknown.raw = reader.read_bytes()?.to_vec();
                }
                3 => {
                    expect_wire_type(field, wire_type, WIRE_LEN, offset)?;
                    unknown.content_encoding =
                        decode_string(reader.read_bytes()?, "contentEncoding")?;
                }
                4 => {
                    expect_wire_type(field, wire_type, WIRE_LEN, offset)?;
                    unknown.content_type = decode_string(reader.read_bytes()?, "contentType")?;
                }
                _ => reader.skip(field, wire_type)?,
            }
        }
        Ok(unknown)
    }
}

fn decode_string(bytes: &[u8], context: &'static str) -> EnvelopeResult<String> {
    String::from_utf8(bytes.to_vec()).map_err(|_| EnvelopeError::InvalidUtf8(context))
}
