//! User record store trait

use async_trait::async_trait;

use super::entity::UserRecord;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Persistence for the whole users collection
///
/// The collection is read and written as a unit, mirroring a single JSON
/// document. Callers own the read-modify-write cycle.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRecordStore: Send + Sync {
    /// Load every record, in stored order
    async fn load(&self) -> Result<Vec<UserRecord>, DomainError>;

    /// Replace the stored collection
    async fn save(&self, records: &[UserRecord]) -> Result<(), DomainError>;
}
