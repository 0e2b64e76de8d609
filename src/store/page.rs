//! bbolt page layout
//!
//! Every page starts with a 16-byte header:
//!
//! ```text
//! +----------------+
//! | Page ID        | (u64 LE)
//! +----------------+
//! | Flags          | (u16 LE: 0x01 branch, 0x02 leaf, 0x04 meta, 0x10 freelist)
//! +----------------+
//! | Element Count  | (u16 LE)
//! +----------------+
//! | Overflow Count | (u32 LE: extra pages spanned beyond the first)
//! +----------------+
//! ```
//!
//! Leaf elements (16 bytes each, immediately after the header):
//! `flags u32 | pos u32 | ksize u32 | vsize u32`, where `pos` is the offset
//! from the element's own start to its key bytes, and the value follows the
//! key. Element flag 0x01 marks a nested bucket.
//!
//! Branch elements (16 bytes each): `pos u32 | ksize u32 | child pgid u64`.

use super::errors::{StoreError, StoreResult};

pub const PAGE_HEADER_SIZE: usize = 16;
pub const ELEMENT_SIZE: usize = 16;

pub const FLAG_BRANCH: u16 = 0x01;
pub const FLAG_LEAF: u16 = 0x02;

/// Leaf element flag marking a nested bucket value
pub const BUCKET_LEAF_FLAG: u32 = 0x01;

/// One decoded leaf element
#[derive(Debug, Clone, Copy)]
pub struct LeafElement<'a> {
    pub flags: u32,
    pub key: &'a [u8],
    pub value: &'a [u8],
}

/// A borrowed view over one page (including its overflow pages, if any)
#[derive(Debug, Clone, Copy)]
pub struct PageView<'a> {
    pgid: u64,
    bytes: &'a [u8],
}

impl<'a> PageView<'a> {
    /// Wraps raw page bytes. The slice must at least cover the header.
    pub fn new(pgid: u64, bytes: &'a [u8]) -> StoreResult<Self> {
        if bytes.len() < PAGE_HEADER_SIZE {
            return Err(StoreError::corrupt(pgid, "page shorter than header"));
        }
        Ok(Self { pgid, bytes })
    }

    pub fn pgid(&self) -> u64 {
        self.pgid
    }

    pub fn flags(&self) -> u16 {
        u16::from_le_bytes([self.bytes[8], self.bytes[9]])
    }

    pub fn count(&self) -> usize {
        u16::from_le_bytes([self.bytes[10], self.bytes[11]]) as usize
    }

    pub fn is_leaf(&self) -> bool {
        self.flags() & FLAG_LEAF != 0
    }

    pub fn is_branch(&self) -> bool {
        self.flags() & FLAG_BRANCH != 0
    }

    fn read_u32(&self, offset: usize) -> StoreResult<u32> {
        let end = offset
            .checked_add(4)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| StoreError::corrupt(self.pgid, "element offset out of bounds"))?;
        let mut buf = [0u8; 4];
        buf.copy_from_slice(&self.bytes[offset..end]);
        Ok(u32::from_le_bytes(buf))
    }

    fn read_u64(&self, offset: usize) -> StoreResult<u64> {
        let end = offset
            .checked_add(8)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| StoreError::corrupt(self.pgid, "element offset out of bounds"))?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&self.bytes[offset..end]);
        Ok(u64::from_le_bytes(buf))
    }

    fn slice(&self, offset: usize, len: usize) -> StoreResult<&'a [u8]> {
        let end = offset
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| StoreError::corrupt(self.pgid, "element data out of bounds"))?;
        Ok(&self.bytes[offset..end])
    }

    /// Decodes leaf element `index`
    pub fn leaf_element(&self, index: usize) -> StoreResult<LeafElement<'a>> {
        debug_assert!(self.is_leaf());
        if index >= self.count() {
            return Err(StoreError::corrupt(self.pgid, "leaf element index out of range"));
        }
        let base = PAGE_HEADER_SIZE + index * ELEMENT_SIZE;
        let flags = self.read_u32(base)?;
        let pos = self.read_u32(base + 4)? as usize;
        let ksize = self.read_u32(base + 8)? as usize;
        let vsize = self.read_u32(base + 12)? as usize;

        let key_offset = base
            .checked_add(pos)
            .ok_or_else(|| StoreError::corrupt(self.pgid, "leaf element position overflow"))?;
        let key = self.slice(key_offset, ksize)?;
        let value = self.slice(key_offset + ksize, vsize)?;
        Ok(LeafElement { flags, key, value })
    }

    /// Decodes branch element `index`, returning its child page id
    pub fn branch_child(&self, index: usize) -> StoreResult<u64> {
        debug_assert!(self.is_branch());
        if index >= self.count() {
            return Err(StoreError::corrupt(self.pgid, "branch element index out of range"));
        }
        let base = PAGE_HEADER_SIZE + index * ELEMENT_SIZE;
        self.read_u64(base + 8)
    }
}
