use crate::domain::model::FarmState;
use crate::domain::ports::FarmStore;
use crate::utils::error::{FarmError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// In-process store. Clones share the same committed state.
#[derive(Clone, Default)]
pub struct MemoryStore {
    committed: Arc<Mutex<Option<FarmState>>>,
    fail_commits: Arc<AtomicBool>,
    commits: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: FarmState) -> Self {
        Self {
            committed: Arc::new(Mutex::new(Some(state))),
            ..Self::default()
        }
    }

    /// Makes every following commit fail until switched off again.
    pub fn set_fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    /// Number of successful commits so far.
    pub fn commit_count(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub async fn committed(&self) -> Option<FarmState> {
        self.committed.lock().await.clone()
    }
}

#[async_trait]
impl FarmStore for MemoryStore {
    async fn load(&self) -> Result<Option<FarmState>> {
        Ok(self.committed.lock().await.clone())
    }

    async fn commit(&self, state: &FarmState) -> Result<()> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(FarmError::PersistenceFailure {
                message: "memory store is refusing commits".to_string(),
            });
        }
        *self.committed.lock().await = Some(state.clone());
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
