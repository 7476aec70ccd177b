use crate::domain::model::FarmState;
use crate::domain::ports::{FarmStore, Storage};
use crate::utils::error::Result;
use async_trait::async_trait;

pub const SNAPSHOT_FILE: &str = "farm.json";

/// Persists the whole farm as one JSON document through a [`Storage`] backend.
///
/// A commit is a single file replacement, so it either lands completely or
/// the previous snapshot stays in place.
#[derive(Debug, Clone)]
pub struct SnapshotStore<S: Storage> {
    storage: S,
}

impl<S: Storage> SnapshotStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl<S: Storage> FarmStore for SnapshotStore<S> {
    async fn load(&self) -> Result<Option<FarmState>> {
        if !self.storage.exists(SNAPSHOT_FILE).await? {
            tracing::debug!("No snapshot at {}", SNAPSHOT_FILE);
            return Ok(None);
        }
        let data = self.storage.read_file(SNAPSHOT_FILE).await?;
        let state: FarmState = serde_json::from_slice(&data)?;
        Ok(Some(state))
    }

    async fn commit(&self, state: &FarmState) -> Result<()> {
        let json = serde_json::to_vec_pretty(state)?;
        tracing::debug!("Writing snapshot ({} bytes) to {}", json.len(), SNAPSHOT_FILE);
        self.storage.write_file(SNAPSHOT_FILE, &json).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::LocalStorage;
    use crate::domain::model::{Mob, MobId, Paddock, PaddockId};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_empty_directory_loads_none() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(LocalStorage::new(dir.path()));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_commit_then_load() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(LocalStorage::new(dir.path()));

        let mut state = FarmState::empty(NaiveDate::from_ymd_opt(2024, 10, 29).unwrap());
        state
            .paddocks
            .insert(PaddockId(3), Paddock::new(PaddockId(3), "Hill", 10.0, 1200.0));
        state.mobs.insert(
            MobId(1),
            Mob { id: MobId(1), name: "Ewes".into(), paddock_id: Some(PaddockId(3)) },
        );

        store.commit(&state).await.unwrap();
        let loaded = store.load().await.unwrap().unwrap();

        assert_eq!(loaded, state);
        assert!(dir.path().join(SNAPSHOT_FILE).exists());
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_serialization_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("farm.json"), b"not json").unwrap();
        let store = SnapshotStore::new(LocalStorage::new(dir.path()));

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, crate::utils::error::FarmError::SerializationError(_)));
    }

    #[tokio::test]
    async fn test_unreadable_data_dir_is_error_not_empty() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("data");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let store = SnapshotStore::new(LocalStorage::new(&blocker));

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, crate::utils::error::FarmError::IoError(_)));
    }
}
