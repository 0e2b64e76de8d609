//! Read-only bbolt snapshot access
//!
//! The exporter consumes an etcd member's `db` file at a deliberately small
//! interface: open the file read-only, look up one named bucket, and iterate
//! its (key, value) pairs in key order. Nothing here writes, and nothing
//! here depends on bolt's freelist or transaction machinery; a consistent
//! snapshot on disk is all that is required.

mod errors;
mod meta;
mod page;

pub use errors::{StoreError, StoreResult};
pub use meta::{Meta, META_MAGIC, META_VERSION};
pub use page::{LeafElement, PageView, BUCKET_LEAF_FLAG};

use std::fs;
use std::path::Path;

/// Size of the bucket value header (root pgid + sequence)
const BUCKET_HEADER_SIZE: usize = 16;

/// Page sizes probed when the first meta page is unreadable. bolt writes
/// with the OS page size, so these cover every platform it supports.
const CANDIDATE_PAGE_SIZES: [usize; 7] = [1024, 2048, 4096, 8192, 16384, 32768, 65536];

/// A read-only, fully loaded bbolt database file
#[derive(Debug)]
pub struct Snapshot {
    data: Vec<u8>,
    page_size: usize,
    root_pgid: u64,
}

impl Snapshot {
    /// Opens a database file and validates its meta pages.
    ///
    /// Both metas are parsed; the valid one with the higher txid wins. A file
    /// where neither meta validates is rejected as not-a-database.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let data = fs::read(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(data)
    }

    /// Validates meta pages over an in-memory file image
    pub fn from_bytes(data: Vec<u8>) -> StoreResult<Self> {
        // Meta 0 carries the page size needed to locate meta 1. If meta 0 is
        // torn, probe the candidate sizes for a valid meta 1 instead.
        let (page_size, meta0) = match Meta::parse(&data, 0) {
            Ok(meta) => (meta.page_size, Some(meta)),
            Err(_) => {
                let probed = CANDIDATE_PAGE_SIZES
                    .iter()
                    .find(|size| Meta::parse(&data, **size).is_ok())
                    .copied()
                    .ok_or_else(|| {
                        StoreError::InvalidDatabase("no valid meta page found".into())
                    })?;
                (probed, None)
            }
        };
        let meta1 = Meta::parse(&data, page_size).ok();

        let meta = match (meta0, meta1) {
            (Some(a), Some(b)) => {
                if a.txid >= b.txid {
                    a
                } else {
                    b
                }
            }
            (Some(a), None) => a,
            (None, Some(b)) => b,
            (None, None) => {
                return Err(StoreError::InvalidDatabase("no valid meta page found".into()))
            }
        };

        Ok(Self {
            data,
            page_size: meta.page_size,
            root_pgid: meta.root_pgid,
        })
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns a view over page `pgid`, including its overflow pages
    fn page(&self, pgid: u64) -> StoreResult<PageView<'_>> {
        let offset = (pgid as usize)
            .checked_mul(self.page_size)
            .filter(|offset| offset + page::PAGE_HEADER_SIZE <= self.data.len())
            .ok_or_else(|| StoreError::corrupt(pgid, "page offset beyond end of file"))?;

        let overflow =
            u32::from_le_bytes(self.data[offset + 12..offset + 16].try_into().unwrap()) as usize;
        let len = (overflow + 1)
            .checked_mul(self.page_size)
            .filter(|len| offset + len <= self.data.len())
            .ok_or_else(|| StoreError::corrupt(pgid, "page overflow beyond end of file"))?;

        PageView::new(pgid, &self.data[offset..offset + len])
    }

    /// Looks up a named bucket in the root bucket
    pub fn bucket(&self, name: &[u8]) -> StoreResult<Bucket<'_>> {
        let mut entries = EntryIter::from_pgid(self, self.root_pgid)?;
        for entry in &mut entries {
            let element = entry?;
            if element.flags & BUCKET_LEAF_FLAG == 0 || element.key != name {
                continue;
            }
            if element.value.len() < BUCKET_HEADER_SIZE {
                return Err(StoreError::corrupt(
                    self.root_pgid,
                    "bucket value shorter than bucket header",
                ));
            }
            let root = u64::from_le_bytes(element.value[0..8].try_into().unwrap());
            let source = if root == 0 {
                // Small buckets are stored inline: a page image follows the
                // bucket header inside the element value.
                BucketSource::Inline(&element.value[BUCKET_HEADER_SIZE..])
            } else {
                BucketSource::Paged(root)
            };
            return Ok(Bucket {
                snapshot: self,
                source,
            });
        }
        Err(StoreError::BucketNotFound(
            String::from_utf8_lossy(name).into_owned(),
        ))
    }
}

#[derive(Debug)]
enum BucketSource<'a> {
    Paged(u64),
    Inline(&'a [u8]),
}

/// One named bucket within a snapshot
#[derive(Debug)]
pub struct Bucket<'a> {
    snapshot: &'a Snapshot,
    source: BucketSource<'a>,
}

impl<'a> Bucket<'a> {
    /// Iterates the bucket's plain (key, value) pairs in key order.
    /// Nested sub-buckets are not yielded.
    pub fn iter(&self) -> StoreResult<KvIter<'a>> {
        let entries = match self.source {
            BucketSource::Paged(pgid) => EntryIter::from_pgid(self.snapshot, pgid)?,
            BucketSource::Inline(bytes) => EntryIter::from_inline(self.snapshot, bytes)?,
        };
        Ok(KvIter { entries })
    }
}

struct Frame<'a> {
    page: PageView<'a>,
    index: usize,
}

/// Depth-first, in-order walk over every leaf element under one page
struct EntryIter<'a> {
    snapshot: &'a Snapshot,
    stack: Vec<Frame<'a>>,
    failed: bool,
}

impl<'a> EntryIter<'a> {
    fn from_pgid(snapshot: &'a Snapshot, pgid: u64) -> StoreResult<Self> {
        let page = snapshot.page(pgid)?;
        Ok(Self {
            snapshot,
            stack: vec![Frame { page, index: 0 }],
            failed: false,
        })
    }

    fn from_inline(snapshot: &'a Snapshot, bytes: &'a [u8]) -> StoreResult<Self> {
        let page = PageView::new(0, bytes)?;
        Ok(Self {
            snapshot,
            stack: vec![Frame { page, index: 0 }],
            failed: false,
        })
    }
}

impl<'a> Iterator for EntryIter<'a> {
    type Item = StoreResult<LeafElement<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let frame = self.stack.last_mut()?;
            if frame.index >= frame.page.count() {
                self.stack.pop();
                continue;
            }
            let index = frame.index;
            frame.index += 1;

            if frame.page.is_branch() {
                let descend = frame
                    .page
                    .branch_child(index)
                    .and_then(|child| self.snapshot.page(child));
                match descend {
                    Ok(page) => {
                        self.stack.push(Frame { page, index: 0 });
                        continue;
                    }
                    Err(e) => {
                        self.failed = true;
                        return Some(Err(e));
                    }
                }
            }

            match frame.page.leaf_element(index) {
                Ok(element) => return Some(Ok(element)),
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Iterator over a bucket's plain (key, value) pairs
pub struct KvIter<'a> {
    entries: EntryIter<'a>,
}

impl<'a> Iterator for KvIter<'a> {
    type Item = StoreResult<(&'a [u8], &'a [u8])>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.entries.next()? {
                Ok(element) if element.flags & BUCKET_LEAF_FLAG != 0 => continue,
                Ok(element) => return Some(Ok((element.key, element.value))),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
