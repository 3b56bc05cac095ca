//! Account service for registration and login

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{Account, AccountRepository, AccountRole, DomainError, NewAccount};
use crate::infrastructure::auth::JwtGenerator;

use super::password::PasswordHasher;

/// Request for registering a new account
#[derive(Debug, Clone)]
pub struct RegisterAccountRequest {
    pub name: Option<String>,
    pub email: String,
    pub password: String,
}

/// Account service for authentication and management
pub struct AccountService {
    repository: Arc<dyn AccountRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn JwtGenerator>,
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService")
            .field("hasher", &self.hasher)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

impl AccountService {
    pub fn new(
        repository: Arc<dyn AccountRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn JwtGenerator>,
    ) -> Self {
        Self {
            repository,
            hasher,
            tokens,
        }
    }

    /// List every account
    pub async fn list(&self) -> Result<Vec<Account>, DomainError> {
        self.repository.list().await
    }

    /// Hash the password and store a new account with the default role
    pub async fn register(&self, request: RegisterAccountRequest) -> Result<Account, DomainError> {
        self.create_with_role(request, AccountRole::User).await
    }

    /// Hash the password and store a new account with an explicit role
    pub async fn create_with_role(
        &self,
        request: RegisterAccountRequest,
        role: AccountRole,
    ) -> Result<Account, DomainError> {
        let password_hash = self.hasher.hash(&request.password)?;

        let account = self
            .repository
            .create(NewAccount {
                name: request.name,
                email: request.email,
                password_hash,
                role,
            })
            .await?;

        info!(id = account.id(), role = %account.role(), "Account registered");
        Ok(account)
    }

    /// Check credentials and issue a session token
    ///
    /// Returns `Ok(None)` for an unknown email or a wrong password, without
    /// saying which.
    pub async fn login(&self, email: &str, password: &str) -> Result<Option<String>, DomainError> {
        let Some(account) = self.repository.find_by_email(email).await? else {
            warn!("Login attempt for unknown email");
            return Ok(None);
        };

        if !self.hasher.verify(password, account.password_hash()) {
            warn!(id = account.id(), "Login attempt with wrong password");
            return Ok(None);
        }

        let token = self.tokens.generate(&account)?;
        info!(id = account.id(), "Account logged in");

        Ok(Some(token))
    }

    /// Change name and role of an existing account
    pub async fn update_profile(
        &self,
        id: i64,
        name: impl Into<String>,
        role: AccountRole,
    ) -> Result<Account, DomainError> {
        let mut account = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Account {} not found", id)))?;

        account.set_name(name);
        account.set_role(role);

        self.repository.update(&account).await
    }

    /// Delete one account
    pub async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        self.repository.delete(id).await
    }

    /// Delete every account
    pub async fn delete_all(&self) -> Result<u64, DomainError> {
        self.repository.delete_all().await
    }
}
