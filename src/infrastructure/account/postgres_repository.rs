//! PostgreSQL account repository implementation

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::{Account, AccountRepository, AccountRole, DomainError, NewAccount};

const ACCOUNT_COLUMNS: &str =
    "id, name, email, password_hash, role, created_at, updated_at";

/// PostgreSQL implementation of AccountRepository
#[derive(Debug, Clone)]
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn list(&self) -> Result<Vec<Account>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM accounts ORDER BY id",
            ACCOUNT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list accounts: {}", e)))?;

        rows.iter().map(row_to_account).collect()
    }

    async fn get(&self, id: i64) -> Result<Option<Account>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM accounts WHERE id = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get account: {}", e)))?;

        row.as_ref().map(row_to_account).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM accounts WHERE email = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get account by email: {}", e)))?;

        row.as_ref().map(row_to_account).transpose()
    }

    async fn create(&self, account: NewAccount) -> Result<Account, DomainError> {
        let now = Utc::now();

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO accounts (name, email, password_hash, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING {}
            "#,
            ACCOUNT_COLUMNS
        ))
        .bind(&account.name)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.role.as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::conflict(format!("Email '{}' is already registered", account.email))
            } else {
                DomainError::storage(format!("Failed to create account: {}", e))
            }
        })?;

        row_to_account(&row)
    }

    async fn update(&self, account: &Account) -> Result<Account, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE accounts
            SET name = $2, email = $3, password_hash = $4, role = $5, updated_at = $6
            WHERE id = $1
            RETURNING {}
            "#,
            ACCOUNT_COLUMNS
        ))
        .bind(account.id())
        .bind(account.name())
        .bind(account.email())
        .bind(account.password_hash())
        .bind(account.role().as_str())
        .bind(account.updated_at())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::conflict(format!("Email '{}' is already registered", account.email()))
            } else {
                DomainError::storage(format!("Failed to update account: {}", e))
            }
        })?
        .ok_or_else(|| DomainError::not_found(format!("Account {} not found", account.id())))?;

        row_to_account(&row)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete account: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all(&self) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM accounts")
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete accounts: {}", e)))?;

        Ok(result.rows_affected())
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

fn row_to_account(row: &PgRow) -> Result<Account, DomainError> {
    let decode_err = |e: sqlx::Error| DomainError::storage(format!("Failed to decode account: {}", e));

    let role: String = row.try_get("role").map_err(decode_err)?;

    Ok(Account::from_parts(
        row.try_get("id").map_err(decode_err)?,
        row.try_get("name").map_err(decode_err)?,
        row.try_get::<String, _>("email").map_err(decode_err)?,
        row.try_get::<String, _>("password_hash").map_err(decode_err)?,
        role.parse::<AccountRole>()?,
        row.try_get("created_at").map_err(decode_err)?,
        row.try_get("updated_at").map_err(decode_err)?,
    ))
}
