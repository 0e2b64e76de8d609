//! bbolt meta page parsing
//!
//! The first two pages of a bbolt file are meta pages. After the 16-byte
//! page header each carries:
//!
//! ```text
//! +-----------------+
//! | Magic           | (u32 LE = 0xED0CDAED)
//! +-----------------+
//! | Version         | (u32 LE = 2)
//! +-----------------+
//! | Page Size       | (u32 LE)
//! +-----------------+
//! | Flags           | (u32 LE)
//! +-----------------+
//! | Root Bucket     | (pgid u64 LE + sequence u64 LE)
//! +-----------------+
//! | Freelist pgid   | (u64 LE)
//! +-----------------+
//! | High-water pgid | (u64 LE)
//! +-----------------+
//! | Txid            | (u64 LE)
//! +-----------------+
//! | Checksum        | (u64 LE, FNV-1a 64 of the 56 bytes above)
//! +-----------------+
//! ```
//!
//! Both metas are validated and the valid one with the higher txid wins,
//! which is how bolt itself recovers from a torn meta write.

use super::errors::{StoreError, StoreResult};
use super::page::PAGE_HEADER_SIZE;

pub const META_MAGIC: u32 = 0xED0C_DAED;
pub const META_VERSION: u32 = 2;

/// Meta struct size, excluding the page header
const META_SIZE: usize = 64;
/// Bytes covered by the meta checksum
const META_CHECKSUM_RANGE: usize = 56;

/// Decoded meta page contents
#[derive(Debug, Clone, Copy)]
pub struct Meta {
    pub page_size: usize,
    pub root_pgid: u64,
    pub high_water: u64,
    pub txid: u64,
}

impl Meta {
    /// Parses and validates a meta struct at `offset` within the file
    pub fn parse(data: &[u8], offset: usize) -> StoreResult<Self> {
        let start = offset + PAGE_HEADER_SIZE;
        let end = start
            .checked_add(META_SIZE)
            .filter(|end| *end <= data.len())
            .ok_or_else(|| StoreError::InvalidDatabase("file too short for meta page".into()))?;
        let meta = &data[start..end];

        let magic = u32::from_le_bytes(meta[0..4].try_into().unwrap());
        if magic != META_MAGIC {
            return Err(StoreError::InvalidDatabase(format!(
                "bad meta magic {:#010x}",
                magic
            )));
        }
        let version = u32::from_le_bytes(meta[4..8].try_into().unwrap());
        if version != META_VERSION {
            return Err(StoreError::InvalidDatabase(format!(
                "unsupported format version {}",
                version
            )));
        }

        let stored_checksum = u64::from_le_bytes(meta[56..64].try_into().unwrap());
        let computed = fnv1a64(&meta[..META_CHECKSUM_RANGE]);
        if stored_checksum != computed {
            return Err(StoreError::InvalidDatabase(format!(
                "meta checksum mismatch: computed {:016x}, stored {:016x}",
                computed, stored_checksum
            )));
        }

        Ok(Self {
            page_size: u32::from_le_bytes(meta[8..12].try_into().unwrap()) as usize,
            root_pgid: u64::from_le_bytes(meta[16..24].try_into().unwrap()),
            high_water: u64::from_le_bytes(meta[40..48].try_into().unwrap()),
            txid: u64::from_le_bytes(meta[48..56].try_into().unwrap()),
        })
    }
}

/// FNV-1a 64-bit hash, the checksum bolt uses for meta pages
pub fn fnv1a64(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = OFFSET_BASIS;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}
