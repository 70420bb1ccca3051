// src/store/file.rs
// =============================================================================
// The durable request store: one JSON file holding every request ever made.
//
// How it works:
// 1. At startup the whole file is read into memory (or we start empty)
// 2. Every append rewrites the whole file
// 3. Lookups are served from memory
//
// Concurrency:
// - The storage sits behind a RwLock
// - Id allocation, append and the file write happen under one write lock, so
//   two batches can never get the same id or overwrite each other's file
// - Lookups take the read lock and never see half an append
//
// Durability:
// - The file is written to a temporary sibling and renamed into place, so a
//   crash mid-write leaves the previous snapshot intact
// - If a write fails we log it and keep going: memory stays authoritative and
//   the next successful write catches the file up
// =============================================================================

use super::model::{IdsExhausted, SavedRequest, Storage};
use crate::checker::LinkStatus;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

// Everything that can go wrong reading or writing the storage file
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read storage file {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("storage file {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("storage file {} contains request id {id} more than once", .path.display())]
    DuplicateId { path: PathBuf, id: u64 },

    #[error("storage file {} has no request ids left to issue", .path.display())]
    IdsExhausted { path: PathBuf },

    #[error("failed to serialize storage: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to write storage file {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

// The shared, file-backed store
//
// Wrap it in an Arc to share it between request handlers
#[derive(Debug)]
pub struct RequestStore {
    path: PathBuf,
    state: RwLock<Storage>,
}

impl RequestStore {
    /// Loads the store from `path`.
    ///
    /// A missing file means a fresh start. A file that exists but can't be
    /// read or parsed is an error: the caller must not serve traffic on top of
    /// state it couldn't load.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let storage = match fs::read(&path) {
            Ok(bytes) => parse_storage(&path, &bytes)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no storage file found, starting empty");
                Storage::default()
            }
            Err(source) => return Err(StoreError::Read { path, source }),
        };

        info!(
            requests = storage.requests.len(),
            next_id = storage.next_id,
            "storage loaded"
        );

        Ok(Self {
            path,
            state: RwLock::new(storage),
        })
    }

    /// Where snapshots are written
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stores `links` as a new request and persists the whole storage.
    ///
    /// The request is kept in memory even when the file write fails. The only
    /// error is running out of ids, in which case nothing is stored.
    pub fn append_request(&self, links: Vec<LinkStatus>) -> Result<SavedRequest, StoreError> {
        let mut state = self.state.write();
        let saved = state.push(links).map_err(|IdsExhausted| StoreError::IdsExhausted {
            path: self.path.clone(),
        })?;

        if let Err(e) = write_snapshot(&self.path, &state) {
            error!(id = saved.id, error = %e, "failed to persist storage, keeping in-memory state");
        }

        Ok(saved)
    }

    /// Stored requests whose id is in `ids`, in the order they were created.
    ///
    /// Unknown ids are skipped.
    pub fn find_by_ids(&self, ids: &[u64]) -> Vec<SavedRequest> {
        let wanted: HashSet<u64> = ids.iter().copied().collect();
        self.state.read().select(&wanted)
    }

    /// Writes the current storage to disk, replacing the previous snapshot
    pub fn persist(&self) -> Result<(), StoreError> {
        // Write lock: two snapshot writers must not race on the temp file
        let state = self.state.write();
        write_snapshot(&self.path, &state)
    }

    /// A consistent copy of everything stored
    pub fn snapshot(&self) -> Storage {
        self.state.read().clone()
    }
}

// Parses and sanity-checks the bytes of a storage file
fn parse_storage(path: &Path, bytes: &[u8]) -> Result<Storage, StoreError> {
    let mut storage: Storage =
        serde_json::from_slice(bytes).map_err(|source| StoreError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;

    if let Some(id) = storage.duplicate_id() {
        return Err(StoreError::DuplicateId {
            path: path.to_path_buf(),
            id,
        });
    }

    let stale = storage.next_id;
    let repaired = storage
        .repair_next_id()
        .map_err(|IdsExhausted| StoreError::IdsExhausted {
            path: path.to_path_buf(),
        })?;
    if repaired {
        warn!(
            stored_next_id = stale,
            next_id = storage.next_id,
            "next_id was not above the stored ids, raised it"
        );
    }

    Ok(storage)
}

// Serializes `storage` and swaps it into place at `path`
fn write_snapshot(path: &Path, storage: &Storage) -> Result<(), StoreError> {
    let json = serde_json::to_vec_pretty(storage).map_err(StoreError::Serialize)?;

    let tmp = temp_path(path);
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    fs::write(&tmp, json).map_err(write_err)?;
    fs::rename(&tmp, path).map_err(write_err)?;
    Ok(())
}

// "data.json" -> "data.json.tmp", in the same directory so rename stays atomic
fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::Availability;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn links(urls: &[(&str, Availability)]) -> Vec<LinkStatus> {
        urls.iter()
            .map(|(url, status)| LinkStatus {
                url: url.to_string(),
                status: *status,
            })
            .collect()
    }

    fn store_in(dir: &TempDir) -> RequestStore {
        RequestStore::load(dir.path().join("data.json")).unwrap()
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.snapshot(), Storage::default());
        assert_eq!(store.snapshot().next_id, 1);
    }

    #[test]
    fn test_append_keeps_batch_order_and_length() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let batch = links(&[
            ("b.example", Availability::Unavailable),
            ("a.example", Availability::Available),
            ("b.example", Availability::Unavailable),
        ]);

        let saved = store.append_request(batch.clone()).unwrap();
        assert_eq!(saved.id, 1);
        assert_eq!(saved.links, batch);
        assert_eq!(store.find_by_ids(&[1]), vec![saved]);
    }

    #[test]
    fn test_every_append_is_persisted() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.append_request(links(&[("a.example", Availability::Available)])).unwrap();
        store.append_request(vec![]).unwrap();

        let reloaded = store_in(&dir);
        assert_eq!(reloaded.snapshot(), store.snapshot());
        assert_eq!(reloaded.snapshot().next_id, 3);
    }

    #[test]
    fn test_ids_continue_after_reload() {
        let dir = TempDir::new().unwrap();
        {
            let store = store_in(&dir);
            assert_eq!(store.append_request(vec![]).unwrap().id, 1);
            assert_eq!(store.append_request(vec![]).unwrap().id, 2);
        }

        let store = store_in(&dir);
        assert_eq!(store.append_request(vec![]).unwrap().id, 3);
    }

    #[test]
    fn test_file_layout_is_stable() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.append_request(links(&[
            ("a.example", Availability::Available),
            ("b.example", Availability::Unavailable),
        ])).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "requests": [{
                    "id": 1,
                    "links": [
                        {"url": "a.example", "status": "available"},
                        {"url": "b.example", "status": "not available"}
                    ]
                }],
                "next_id": 2
            })
        );
        assert!(!temp_path(store.path()).exists());
    }

    #[test]
    fn test_corrupt_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "{ not json").unwrap();

        let err = RequestStore::load(&path).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        fs::write(
            &path,
            r#"{"requests":[{"id":1,"links":[]},{"id":1,"links":[]}],"next_id":2}"#,
        )
        .unwrap();

        let err = RequestStore::load(&path).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId { id: 1, .. }));
    }

    #[test]
    fn test_stale_next_id_is_raised() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, r#"{"requests":[{"id":5,"links":[]}],"next_id":2}"#).unwrap();

        let store = RequestStore::load(&path).unwrap();
        assert_eq!(store.append_request(vec![]).unwrap().id, 6);
    }

    #[test]
    fn test_exhausted_ids_are_rejected_at_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");

        fs::write(&path, r#"{"requests":[],"next_id":18446744073709551615}"#).unwrap();
        let err = RequestStore::load(&path).unwrap_err();
        assert!(matches!(err, StoreError::IdsExhausted { .. }));

        fs::write(
            &path,
            r#"{"requests":[{"id":18446744073709551615,"links":[]}],"next_id":1}"#,
        )
        .unwrap();
        let err = RequestStore::load(&path).unwrap_err();
        assert!(matches!(err, StoreError::IdsExhausted { .. }));
    }

    #[test]
    fn test_last_id_is_never_reused() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, r#"{"requests":[],"next_id":18446744073709551614}"#).unwrap();

        let store = RequestStore::load(&path).unwrap();
        assert_eq!(store.append_request(vec![]).unwrap().id, u64::MAX - 1);
        assert!(matches!(
            store.append_request(vec![]),
            Err(StoreError::IdsExhausted { .. })
        ));
        assert!(matches!(
            store.append_request(vec![]),
            Err(StoreError::IdsExhausted { .. })
        ));

        let ids: Vec<u64> = store.snapshot().requests.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![u64::MAX - 1]);
    }

    #[test]
    fn test_find_by_ids_uses_storage_order_and_skips_unknown() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        for _ in 0..3 {
            store.append_request(vec![]).unwrap();
        }

        let ids: Vec<u64> = store
            .find_by_ids(&[3, 42, 1, 3])
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(store.find_by_ids(&[]).is_empty());
        assert!(store.find_by_ids(&[7, 8]).is_empty());
    }

    #[test]
    fn test_failed_persist_keeps_memory_state() {
        let dir = TempDir::new().unwrap();
        // The parent directory doesn't exist, so every write fails
        let store = RequestStore::load(dir.path().join("missing").join("data.json")).unwrap();

        let saved = store.append_request(links(&[("a.example", Availability::Available)])).unwrap();
        assert_eq!(saved.id, 1);
        assert_eq!(store.find_by_ids(&[1]), vec![saved]);
        assert_eq!(store.append_request(vec![]).unwrap().id, 2);
        assert!(matches!(store.persist(), Err(StoreError::Write { .. })));
    }

    #[test]
    fn test_concurrent_appends_get_unique_ids() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(store_in(&dir));

        std::thread::scope(|scope| {
            for _ in 0..8 {
                let store = Arc::clone(&store);
                scope.spawn(move || {
                    for _ in 0..10 {
                        store.append_request(vec![]).unwrap();
                    }
                });
            }
        });

        let snapshot = store.snapshot();
        let ids: Vec<u64> = snapshot.requests.iter().map(|r| r.id).collect();
        assert_eq!(ids, (1..=80).collect::<Vec<u64>>());
        assert_eq!(snapshot.next_id, 81);
        assert_eq!(store_in(&dir).snapshot(), snapshot);
    }
}
