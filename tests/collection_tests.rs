//! Tests for the Collection engine
//!
//! These tests verify:
//! - Round-trip get/put semantics
//! - Tombstone-based overwrites (old copies dead, exactly one live record)
//! - Tombstone isolation between keys
//! - Empty keys and values
//! - Corruption detection on truncated files
//! - Benign trailing partial headers for reads, fatal for writes
//! - Exclusive collection ownership

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use stashdb::collection::RECORDS_FILE;
use stashdb::record::{encode_record, RecordHeader, HEADER_SIZE};
use stashdb::{StashError, Store};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_store() -> (TempDir, Store) {
    let temp = TempDir::new().unwrap();
    let store = Store::open(temp.path()).unwrap();
    (temp, store)
}

fn records_path(store: &Store, name: &str) -> PathBuf {
    store.root_dir().join(name).join(RECORDS_FILE)
}

/// Walk the raw record stream: (live, key, value) per physical record
fn scan_raw_records(path: &Path) -> Vec<(bool, Vec<u8>, Vec<u8>)> {
    let bytes = std::fs::read(path).unwrap();
    let mut records = Vec::new();
    let mut offset = 0usize;

    while offset < bytes.len() {
        let header = RecordHeader::decode(&bytes[offset..], offset as u64).unwrap();
        let key_start = offset + HEADER_SIZE;
        let value_start = key_start + header.key_len() as usize;
        let end = offset + header.total_size() as usize;

        records.push((
            header.is_live(),
            bytes[key_start..value_start].to_vec(),
            bytes[value_start..end].to_vec(),
        ));
        offset = end;
    }

    records
}

// =============================================================================
// Basic Get/Put Semantics
// =============================================================================

#[test]
fn test_get_missing_key_returns_none() {
    let (_temp, store) = setup_store();
    let data = store.collection("data").unwrap();

    assert_eq!(data.get(b"never-written").unwrap(), None);
}

#[test]
fn test_put_then_get_round_trip() {
    let (_temp, store) = setup_store();
    let data = store.collection("data").unwrap();

    data.put(b"alpha", b"one").unwrap();

    assert_eq!(data.get(b"alpha").unwrap(), Some(b"one".to_vec()));
}

#[test]
fn test_repeated_gets_are_idempotent() {
    let (_temp, store) = setup_store();
    let data = store.collection("data").unwrap();

    data.put(b"alpha", b"one").unwrap();

    for _ in 0..5 {
        assert_eq!(data.get(b"alpha").unwrap(), Some(b"one".to_vec()));
    }
}

#[test]
fn test_empty_key_and_value_round_trip() {
    let (_temp, store) = setup_store();
    let data = store.collection("data").unwrap();

    data.put(b"", b"").unwrap();

    assert_eq!(data.get(b"").unwrap(), Some(Vec::new()));
}

#[test]
fn test_binary_keys_and_values() {
    let (_temp, store) = setup_store();
    let data = store.collection("data").unwrap();

    let key = [0x00, 0xFF, 0x01, 0xFE];
    let value: Vec<u8> = (0..=255).collect();
    data.put(&key, &value).unwrap();

    assert_eq!(data.get(&key).unwrap(), Some(value));
}

// =============================================================================
// Overwrite / Tombstone Semantics
// =============================================================================

#[test]
fn test_overwrite_returns_latest_value() {
    let (_temp, store) = setup_store();
    let data = store.collection("data").unwrap();

    data.put(b"alpha", b"one").unwrap();
    data.put(b"alpha", b"two").unwrap();

    assert_eq!(data.get(b"alpha").unwrap(), Some(b"two".to_vec()));
}

#[test]
fn test_overwrite_tombstones_old_record_in_place() {
    let (_temp, store) = setup_store();
    let data = store.collection("data").unwrap();

    data.put(b"alpha", b"one").unwrap();
    data.put(b"alpha", b"two").unwrap();

    let records = scan_raw_records(&records_path(&store, "data"));
    assert_eq!(records.len(), 2);
    // Old record is dead but its body is physically untouched
    assert_eq!(records[0], (false, b"alpha".to_vec(), b"one".to_vec()));
    assert_eq!(records[1], (true, b"alpha".to_vec(), b"two".to_vec()));
}

#[test]
fn test_tombstoning_does_not_affect_other_keys() {
    let (_temp, store) = setup_store();
    let data = store.collection("data").unwrap();

    data.put(b"alpha", b"one").unwrap();
    data.put(b"beta", b"two").unwrap();
    data.put(b"alpha", b"three").unwrap();

    assert_eq!(data.get(b"beta").unwrap(), Some(b"two".to_vec()));
    assert_eq!(data.get(b"alpha").unwrap(), Some(b"three".to_vec()));
}

#[test]
fn test_put_tombstones_every_stale_live_copy() {
    let (_temp, store) = setup_store();
    let path = {
        let data = store.collection("data").unwrap();
        data.put(b"alpha", b"one").unwrap();
        let path = records_path(&store, "data");
        data.close().unwrap();
        path
    };

    // Simulate a file that ended up with two live copies of the same key
    let stray = encode_record(b"alpha", b"stray").unwrap();
    let mut file = OpenOptions::new().append(true).open(&path).unwrap();
    file.write_all(&stray).unwrap();
    drop(file);

    let data = store.collection("data").unwrap();
    data.put(b"alpha", b"final").unwrap();

    let records = scan_raw_records(&path);
    assert_eq!(records.len(), 3);
    assert!(!records[0].0, "first copy must be tombstoned");
    assert!(!records[1].0, "second copy must be tombstoned");
    assert_eq!(records[2], (true, b"alpha".to_vec(), b"final".to_vec()));
}

// =============================================================================
// Corruption Detection
// =============================================================================

#[test]
fn test_truncated_value_is_reported_not_misread() {
    let (_temp, store) = setup_store();
    let path = {
        let data = store.collection("data").unwrap();
        data.put(b"alpha", b"a-long-enough-value").unwrap();
        let path = records_path(&store, "data");
        data.close().unwrap();
        path
    };

    // Cut off part of the declared value
    let len = std::fs::metadata(&path).unwrap().len();
    let file = OpenOptions::new().write(true).open(&path).unwrap();
    file.set_len(len - 4).unwrap();
    drop(file);

    let data = store.collection("data").unwrap();

    let err = data.get(b"alpha").unwrap_err();
    assert!(matches!(err, StashError::TruncatedRecord { .. }), "got {err:?}");

    let err = data.put(b"alpha", b"new").unwrap_err();
    assert!(matches!(err, StashError::TruncatedRecord { .. }), "got {err:?}");
}

#[test]
fn test_trailing_partial_header_is_benign_for_get() {
    let (_temp, store) = setup_store();
    let path = {
        let data = store.collection("data").unwrap();
        data.put(b"alpha", b"one").unwrap();
        let path = records_path(&store, "data");
        data.close().unwrap();
        path
    };

    // A torn final append: 3 header bytes, no body
    let mut file = OpenOptions::new().append(true).open(&path).unwrap();
    file.write_all(&[0x01, 0x00, 0x00]).unwrap();
    drop(file);

    let data = store.collection("data").unwrap();

    // Records before the torn tail stay readable; misses stay misses
    assert_eq!(data.get(b"alpha").unwrap(), Some(b"one".to_vec()));
    assert_eq!(data.get(b"missing").unwrap(), None);
}

#[test]
fn test_trailing_partial_header_is_fatal_for_put() {
    let (_temp, store) = setup_store();
    let path = {
        let data = store.collection("data").unwrap();
        data.put(b"alpha", b"one").unwrap();
        let path = records_path(&store, "data");
        data.close().unwrap();
        path
    };

    let len_before = {
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(&[0x01, 0x00]).unwrap();
        drop(file);
        std::fs::metadata(&path).unwrap().len()
    };

    let data = store.collection("data").unwrap();

    let err = data.put(b"beta", b"two").unwrap_err();
    assert!(matches!(err, StashError::TruncatedHeader { .. }), "got {err:?}");

    // The failed put must not have appended anything
    assert_eq!(std::fs::metadata(&path).unwrap().len(), len_before);
}

// =============================================================================
// Ownership and Lifecycle
// =============================================================================

#[test]
fn test_second_open_of_same_collection_is_refused() {
    let (_temp, store) = setup_store();
    let first = store.collection("data").unwrap();

    let err = store.collection("data").unwrap_err();
    assert!(matches!(err, StashError::CollectionLocked(_)), "got {err:?}");

    // Closing the first handle releases the lock
    first.close().unwrap();
    store.collection("data").unwrap();
}

#[test]
fn test_data_survives_close_and_reopen() {
    let temp = TempDir::new().unwrap();

    {
        let store = Store::open(temp.path()).unwrap();
        let data = store.collection("data").unwrap();
        data.put(b"alpha", b"one").unwrap();
        data.put(b"alpha", b"two").unwrap();
        data.close().unwrap();
    }

    let store = Store::open(temp.path()).unwrap();
    let data = store.collection("data").unwrap();
    assert_eq!(data.get(b"alpha").unwrap(), Some(b"two".to_vec()));
}
