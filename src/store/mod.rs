pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use chrono::{SecondsFormat, Utc};
use thiserror::Error;

use crate::models::{ScopeOneAggregate, Snapshot};

/// Well-known key the whole snapshot list lives under.
pub const SNAPSHOT_KEY: &str = "scopeOneSavedResults";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snapshot index {index} out of range ({len} saved)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("storage read failed: {0}")]
    ReadFailed(String),
    #[error("storage write failed: {0}")]
    WriteFailed(String),
}

/// Contract of the persistent medium the snapshot list is kept in.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Owns the persisted snapshot list. Every mutation reads the full list
/// and rewrites it as one serialized value; there are no partial updates.
pub struct SnapshotStore<S: KeyValueStore> {
    medium: S,
}

impl<S: KeyValueStore> SnapshotStore<S> {
    pub fn new(medium: S) -> Self {
        Self { medium }
    }

    pub fn into_medium(self) -> S {
        self.medium
    }

    /// All stored snapshots, oldest first. An absent key or an
    /// undecodable payload both read as an empty list; the latter is
    /// reported but never fatal.
    pub fn list(&self) -> Result<Vec<Snapshot>, StoreError> {
        let raw = match self.medium.get(SNAPSHOT_KEY)? {
            Some(raw) => raw,
            None => return Ok(Vec::new()),
        };

        match serde_json::from_str(&raw) {
            Ok(snapshots) => Ok(snapshots),
            Err(e) => {
                log::warn!("discarding undecodable snapshot list under {SNAPSHOT_KEY}: {e}");
                Ok(Vec::new())
            }
        }
    }

    /// Stamps the save time, appends, rewrites. A rejected write leaves
    /// the persisted list untouched.
    pub fn save(&mut self, aggregate: &ScopeOneAggregate, label: &str) -> Result<Snapshot, StoreError> {
        let mut snapshots = self.list()?;
        let snapshot = Snapshot {
            aggregate: aggregate.clone(),
            saved_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            label: label.to_string(),
        };
        snapshots.push(snapshot.clone());
        self.write_list(&snapshots)?;
        Ok(snapshot)
    }

    /// Removes the snapshot at `index` in save order; later snapshots
    /// shift down by one.
    pub fn remove(&mut self, index: usize) -> Result<(), StoreError> {
        let mut snapshots = self.list()?;
        if index >= snapshots.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: snapshots.len(),
            });
        }
        snapshots.remove(index);
        self.write_list(&snapshots)
    }

    /// The aggregate portion of the snapshot at `index`, with the label
    /// and timestamp stripped.
    pub fn load(&self, index: usize) -> Result<ScopeOneAggregate, StoreError> {
        let snapshots = self.list()?;
        let len = snapshots.len();
        let snapshot = snapshots
            .get(index)
            .ok_or(StoreError::IndexOutOfRange { index, len })?;

        // A snapshot is user data; report inconsistency but still hand
        // it back.
        if let Some(reason) = snapshot.aggregate.validation_error() {
            log::warn!("stored snapshot {index} fails aggregate validation: {reason}");
        }

        Ok(snapshot.aggregate.clone())
    }

    fn write_list(&mut self, snapshots: &[Snapshot]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(snapshots)
            .map_err(|e| StoreError::WriteFailed(format!("serialize snapshot list: {e}")))?;
        self.medium.set(SNAPSHOT_KEY, &raw)
    }
}
