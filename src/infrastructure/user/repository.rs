//! In-memory user record store implementation

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{UserRecord, UserRecordStore};
use crate::domain::DomainError;

/// In-memory implementation of UserRecordStore
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserStore {
    records: Arc<RwLock<Vec<UserRecord>>>,
}

impl InMemoryUserStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with initial records
    pub fn with_records(records: Vec<UserRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }
}

#[async_trait]
impl UserRecordStore for InMemoryUserStore {
    async fn load(&self) -> Result<Vec<UserRecord>, DomainError> {
        Ok(self.records.read().await.clone())
    }

    async fn save(&self, records: &[UserRecord]) -> Result<(), DomainError> {
        *self.records.write().await = records.to_vec();
        Ok(())
    }
}
