//! In-memory account repository implementation

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{Account, AccountRepository, DomainError, NewAccount};

#[derive(Debug, Default)]
struct Accounts {
    next_id: i64,
    by_id: BTreeMap<i64, Account>,
}

/// In-memory implementation of AccountRepository
///
/// Used when no database is configured. Ids are assigned sequentially from 1.
#[derive(Debug, Default, Clone)]
pub struct InMemoryAccountRepository {
    inner: Arc<RwLock<Accounts>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn list(&self) -> Result<Vec<Account>, DomainError> {
        Ok(self.inner.read().await.by_id.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Account>, DomainError> {
        Ok(self.inner.read().await.by_id.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner.by_id.values().find(|a| a.email() == email).cloned())
    }

    async fn create(&self, account: NewAccount) -> Result<Account, DomainError> {
        let mut inner = self.inner.write().await;

        if inner.by_id.values().any(|a| a.email() == account.email) {
            return Err(DomainError::conflict(format!(
                "Email '{}' is already registered",
                account.email
            )));
        }

        inner.next_id += 1;
        let account = account.into_account(inner.next_id);
        inner.by_id.insert(account.id(), account.clone());

        Ok(account)
    }

    async fn update(&self, account: &Account) -> Result<Account, DomainError> {
        let mut inner = self.inner.write().await;

        if !inner.by_id.contains_key(&account.id()) {
            return Err(DomainError::not_found(format!(
                "Account {} not found",
                account.id()
            )));
        }

        let email_taken = inner
            .by_id
            .values()
            .any(|a| a.email() == account.email() && a.id() != account.id());

        if email_taken {
            return Err(DomainError::conflict(format!(
                "Email '{}' is already registered",
                account.email()
            )));
        }

        inner.by_id.insert(account.id(), account.clone());
        Ok(account.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        Ok(self.inner.write().await.by_id.remove(&id).is_some())
    }

    async fn delete_all(&self) -> Result<u64, DomainError> {
        let mut inner = self.inner.write().await;
        let removed = inner.by_id.len() as u64;
        inner.by_id.clear();
        Ok(removed)
    }
}
