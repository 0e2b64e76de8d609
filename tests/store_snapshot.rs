//! Snapshot reader tests against synthetic bbolt files

mod common;

use common::{BoltBuilder, PAGE_SIZE};
use k8s_export::store::{Snapshot, StoreError};
use tempfile::TempDir;

fn collect(snapshot: &Snapshot, bucket: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
    snapshot
        .bucket(bucket)
        .unwrap()
        .iter()
        .unwrap()
        .map(|entry| {
            let (k, v) = entry.unwrap();
            (k.to_vec(), v.to_vec())
        })
        .collect()
}

#[test]
fn test_iterates_entries_in_key_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("db");
    BoltBuilder::new()
        .entry(b"zeta", b"3")
        .entry(b"alpha", b"1")
        .entry(b"mu", b"2")
        .write_to(&path);

    let snapshot = Snapshot::open(&path).unwrap();
    let entries = collect(&snapshot, b"key");
    assert_eq!(
        entries,
        vec![
            (b"alpha".to_vec(), b"1".to_vec()),
            (b"mu".to_vec(), b"2".to_vec()),
            (b"zeta".to_vec(), b"3".to_vec()),
        ]
    );
}

#[test]
fn test_inline_bucket_iterates() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("db");
    BoltBuilder::new()
        .inline_bucket()
        .entry(b"b", b"2")
        .entry(b"a", b"1")
        .write_to(&path);

    let snapshot = Snapshot::open(&path).unwrap();
    let entries = collect(&snapshot, b"key");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].0, b"a");
    assert_eq!(entries[1].0, b"b");
}

#[test]
fn test_branch_pages_preserve_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("db");
    let mut builder = BoltBuilder::new().split_leaves();
    for i in 0..10u32 {
        let key = format!("key-{:02}", i);
        builder = builder.entry(key.as_bytes(), b"v");
    }
    builder.write_to(&path);

    let snapshot = Snapshot::open(&path).unwrap();
    let entries = collect(&snapshot, b"key");
    assert_eq!(entries.len(), 10);
    let keys: Vec<_> = entries.iter().map(|(k, _)| k.clone()).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn test_missing_bucket_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("db");
    BoltBuilder::new().entry(b"a", b"1").write_to(&path);

    let snapshot = Snapshot::open(&path).unwrap();
    let err = snapshot.bucket(b"lease").unwrap_err();
    assert!(matches!(err, StoreError::BucketNotFound(name) if name == "lease"));
}

#[test]
fn test_garbage_file_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("db");
    std::fs::write(&path, vec![0x42u8; 2 * PAGE_SIZE]).unwrap();

    let err = Snapshot::open(&path).unwrap_err();
    assert!(matches!(err, StoreError::InvalidDatabase(_)));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = Snapshot::open(&dir.path().join("absent")).unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
}

#[test]
fn test_torn_meta_falls_back_to_the_other() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("db");
    let mut image = BoltBuilder::new().entry(b"a", b"1").build();
    // Tear meta 1 (the higher-txid copy); meta 0 must still carry the open.
    for byte in &mut image[PAGE_SIZE + 16..PAGE_SIZE + 80] {
        *byte = 0xFF;
    }
    std::fs::write(&path, image).unwrap();

    let snapshot = Snapshot::open(&path).unwrap();
    assert_eq!(collect(&snapshot, b"key").len(), 1);
}

#[test]
fn test_truncated_file_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("db");
    let image = BoltBuilder::new().entry(b"a", b"1").build();
    // Cut the file off before the data leaf page.
    std::fs::write(&path, &image[..3 * PAGE_SIZE]).unwrap();

    let snapshot = Snapshot::open(&path).unwrap();
    // The bucket's root page now lies past the end of the file.
    let bucket = snapshot.bucket(b"key").unwrap();
    assert!(bucket.iter().is_err());
}
