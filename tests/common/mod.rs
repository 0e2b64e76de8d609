//! Shared test fixtures: a minimal bbolt file builder and protobuf encoders
//!
//! The builder writes just enough of the bolt format for the reader to walk:
//! two valid meta pages, a root bucket leaf holding one named bucket, and
//! the bucket's data pages. Checksums and encoders are implemented here
//! independently of the crate under test.

#![allow(dead_code)]

use std::path::Path;

pub const PAGE_SIZE: usize = 4096;

const PAGE_HEADER_SIZE: usize = 16;
const ELEMENT_SIZE: usize = 16;
const FLAG_BRANCH: u16 = 0x01;
const FLAG_LEAF: u16 = 0x02;
const FLAG_META: u16 = 0x04;
const BUCKET_LEAF_FLAG: u32 = 0x01;
const META_MAGIC: u32 = 0xED0C_DAED;

pub fn fnv1a64(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

fn page_header(pgid: u64, flags: u16, count: u16) -> Vec<u8> {
    let mut header = Vec::with_capacity(PAGE_HEADER_SIZE);
    header.extend_from_slice(&pgid.to_le_bytes());
    header.extend_from_slice(&flags.to_le_bytes());
    header.extend_from_slice(&count.to_le_bytes());
    header.extend_from_slice(&0u32.to_le_bytes());
    header
}

/// Leaf page bytes, unpadded: header, element array, then key/value data
fn leaf_page(pgid: u64, elements: &[(u32, Vec<u8>, Vec<u8>)]) -> Vec<u8> {
    let count = elements.len();
    let mut page = page_header(pgid, FLAG_LEAF, count as u16);
    let mut data = Vec::new();
    for (i, (flags, key, value)) in elements.iter().enumerate() {
        // pos is relative to the element's own start.
        let pos = (count - i) * ELEMENT_SIZE + data.len();
        page.extend_from_slice(&flags.to_le_bytes());
        page.extend_from_slice(&(pos as u32).to_le_bytes());
        page.extend_from_slice(&(key.len() as u32).to_le_bytes());
        page.extend_from_slice(&(value.len() as u32).to_le_bytes());
        data.extend_from_slice(key);
        data.extend_from_slice(value);
    }
    page.extend_from_slice(&data);
    page
}

/// Branch page bytes, unpadded
fn branch_page(pgid: u64, children: &[(Vec<u8>, u64)]) -> Vec<u8> {
    let count = children.len();
    let mut page = page_header(pgid, FLAG_BRANCH, count as u16);
    let mut data = Vec::new();
    for (i, (key, child)) in children.iter().enumerate() {
        let pos = (count - i) * ELEMENT_SIZE + data.len();
        page.extend_from_slice(&(pos as u32).to_le_bytes());
        page.extend_from_slice(&(key.len() as u32).to_le_bytes());
        page.extend_from_slice(&child.to_le_bytes());
        data.extend_from_slice(key);
    }
    page.extend_from_slice(&data);
    page
}

fn meta_page(pgid: u64, root_pgid: u64, high_water: u64, txid: u64) -> Vec<u8> {
    let mut meta = Vec::with_capacity(64);
    meta.extend_from_slice(&META_MAGIC.to_le_bytes());
    meta.extend_from_slice(&2u32.to_le_bytes());
    meta.extend_from_slice(&(PAGE_SIZE as u32).to_le_bytes());
    meta.extend_from_slice(&0u32.to_le_bytes());
    meta.extend_from_slice(&root_pgid.to_le_bytes());
    meta.extend_from_slice(&0u64.to_le_bytes()); // root bucket sequence
    meta.extend_from_slice(&0u64.to_le_bytes()); // freelist pgid (unused)
    meta.extend_from_slice(&high_water.to_le_bytes());
    meta.extend_from_slice(&txid.to_le_bytes());
    let checksum = fnv1a64(&meta);
    meta.extend_from_slice(&checksum.to_le_bytes());

    let mut page = page_header(pgid, FLAG_META, 0);
    page.extend_from_slice(&meta);
    page
}

fn bucket_value(root_pgid: u64, inline_page: Option<&[u8]>) -> Vec<u8> {
    let mut value = Vec::new();
    value.extend_from_slice(&root_pgid.to_le_bytes());
    value.extend_from_slice(&0u64.to_le_bytes());
    if let Some(page) = inline_page {
        value.extend_from_slice(page);
    }
    value
}

#[derive(Default)]
pub struct BoltBuilder {
    entries: Vec<(Vec<u8>, Vec<u8>)>,
    bucket_name: Vec<u8>,
    inline: bool,
    split: bool,
}

impl BoltBuilder {
    pub fn new() -> Self {
        Self {
            bucket_name: b"key".to_vec(),
            ..Self::default()
        }
    }

    pub fn bucket_name(mut self, name: &[u8]) -> Self {
        self.bucket_name = name.to_vec();
        self
    }

    pub fn entry(mut self, key: &[u8], value: &[u8]) -> Self {
        self.entries.push((key.to_vec(), value.to_vec()));
        self
    }

    /// Stores the bucket inline in the root bucket leaf
    pub fn inline_bucket(mut self) -> Self {
        self.inline = true;
        self
    }

    /// Splits the entries across two leaves under a branch page
    pub fn split_leaves(mut self) -> Self {
        self.split = true;
        self
    }

    pub fn build(mut self) -> Vec<u8> {
        self.entries.sort_by(|a, b| a.0.cmp(&b.0));
        let elements: Vec<(u32, Vec<u8>, Vec<u8>)> = self
            .entries
            .iter()
            .map(|(k, v)| (0u32, k.clone(), v.clone()))
            .collect();

        let mut pages: Vec<Vec<u8>> = Vec::new();
        if self.inline {
            let inline = leaf_page(0, &elements);
            let root = leaf_page(
                2,
                &[(
                    BUCKET_LEAF_FLAG,
                    self.bucket_name.clone(),
                    bucket_value(0, Some(&inline)),
                )],
            );
            pages.push(meta_page(0, 2, 3, 10));
            pages.push(meta_page(1, 2, 3, 11));
            pages.push(root);
        } else if self.split {
            let mid = elements.len() / 2;
            let (left, right) = elements.split_at(mid.max(1));
            let branch = branch_page(
                3,
                &[
                    (left.first().map(|e| e.1.clone()).unwrap_or_default(), 4),
                    (right.first().map(|e| e.1.clone()).unwrap_or_default(), 5),
                ],
            );
            let root = leaf_page(
                2,
                &[(
                    BUCKET_LEAF_FLAG,
                    self.bucket_name.clone(),
                    bucket_value(3, None),
                )],
            );
            pages.push(meta_page(0, 2, 6, 10));
            pages.push(meta_page(1, 2, 6, 11));
            pages.push(root);
            pages.push(branch);
            pages.push(leaf_page(4, left));
            pages.push(leaf_page(5, right));
        } else {
            let root = leaf_page(
                2,
                &[(
                    BUCKET_LEAF_FLAG,
                    self.bucket_name.clone(),
                    bucket_value(3, None),
                )],
            );
            pages.push(meta_page(0, 2, 4, 10));
            pages.push(meta_page(1, 2, 4, 11));
            pages.push(root);
            pages.push(leaf_page(3, &elements));
        }

        let mut image = Vec::with_capacity(pages.len() * PAGE_SIZE);
        for page in pages {
            assert!(
                page.len() <= PAGE_SIZE,
                "fixture page overflows a single page: {} bytes",
                page.len()
            );
            let mut padded = page;
            padded.resize(PAGE_SIZE, 0);
            image.extend_from_slice(&padded);
        }
        image
    }

    pub fn write_to(self, path: &Path) {
        std::fs::write(path, self.build()).expect("write fixture database");
    }
}

// ---- protobuf encoding helpers ----

pub fn varint(mut value: u64, buf: &mut Vec<u8>) {
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

pub fn bytes_field(field: u32, data: &[u8], buf: &mut Vec<u8>) {
    varint(u64::from(field) << 3 | 2, buf);
    varint(data.len() as u64, buf);
    buf.extend_from_slice(data);
}

pub fn varint_field(field: u32, value: i64, buf: &mut Vec<u8>) {
    varint(u64::from(field) << 3, buf);
    varint(value as u64, buf);
}

/// Encodes an mvccpb.KeyValue wrapping `value` under logical key `key`
pub fn encode_key_value(key: &[u8], value: &[u8], mod_revision: i64) -> Vec<u8> {
    let mut buf = Vec::new();
    bytes_field(1, key, &mut buf);
    varint_field(2, mod_revision, &mut buf);
    varint_field(3, mod_revision, &mut buf);
    varint_field(4, 1, &mut buf);
    bytes_field(5, value, &mut buf);
    buf
}

/// Encodes a runtime.Unknown envelope
pub fn encode_unknown(api_version: &str, kind: &str, raw: &[u8]) -> Vec<u8> {
    let mut type_meta = Vec::new();
    bytes_field(1, api_version.as_bytes(), &mut type_meta);
    bytes_field(2, kind.as_bytes(), &mut type_meta);

    let mut buf = Vec::new();
    bytes_field(1, &type_meta, &mut buf);
    bytes_field(2, raw, &mut buf);
    buf
}

/// A full typed-resource store value: magic prefix + Unknown envelope
pub fn resource_value(api_version: &str, kind: &str, raw: &[u8]) -> Vec<u8> {
    let mut value = vec![0x6b, 0x38, 0x73, 0x00];
    value.extend_from_slice(&encode_unknown(api_version, kind, raw));
    value
}

/// A 17-byte mvcc revision key: big-endian main, separator, big-endian sub
pub fn revision_key(main: i64, sub: i64) -> Vec<u8> {
    let mut key = Vec::with_capacity(17);
    key.extend_from_slice(&main.to_be_bytes());
    key.push(b'_');
    key.extend_from_slice(&sub.to_be_bytes());
    key
}
