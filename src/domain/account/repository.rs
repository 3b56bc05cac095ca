//! Account repository trait

use async_trait::async_trait;

use super::entity::{Account, NewAccount};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Repository trait for account storage
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// List every account, oldest first
    async fn list(&self) -> Result<Vec<Account>, DomainError>;

    /// Get an account by id
    async fn get(&self, id: i64) -> Result<Option<Account>, DomainError>;

    /// Get an account by email (for login)
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError>;

    /// Insert an account; a taken email is a conflict
    async fn create(&self, account: NewAccount) -> Result<Account, DomainError>;

    /// Persist changes to an existing account
    async fn update(&self, account: &Account) -> Result<Account, DomainError>;

    /// Delete an account, returning whether it existed
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;

    /// Delete every account, returning how many were removed
    async fn delete_all(&self) -> Result<u64, DomainError>;
}
