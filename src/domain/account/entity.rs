//! Account entity and related types

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Role granted to an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountRole {
    #[default]
    User,
    Admin,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Self::User),
            "ADMIN" => Ok(Self::Admin),
            other => Err(DomainError::validation(format!(
                "Unknown account role '{}'",
                other
            ))),
        }
    }
}

/// Database-backed user able to log in
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    id: i64,
    name: Option<String>,
    email: String,
    /// Argon2 hash, never serialized
    #[serde(skip_serializing)]
    password_hash: String,
    role: AccountRole,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Account {
    /// Rebuild an account from stored fields
    pub fn from_parts(
        id: i64,
        name: Option<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: AccountRole,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            email: email.into(),
            password_hash: password_hash.into(),
            role,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn role(&self) -> AccountRole {
        self.role
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
        self.touch();
    }

    pub fn set_role(&mut self, role: AccountRole) {
        self.role = role;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Fields needed to insert an account; the store assigns the id
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub role: AccountRole,
}

impl NewAccount {
    /// Materialize with a store-assigned id
    pub fn into_account(self, id: i64) -> Account {
        let now = Utc::now();
        Account::from_parts(
            id,
            self.name,
            self.email,
            self.password_hash,
            self.role,
            now,
            now,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_account() -> NewAccount {
        NewAccount {
            name: Some("Alice Johnson".to_string()),
            email: "alice@example.com".to_string(),
            password_hash: "hashed_password".to_string(),
            role: AccountRole::Admin,
        }
    }

    #[test]
    fn test_role_round_trip_strings() {
        assert_eq!("USER".parse::<AccountRole>().unwrap(), AccountRole::User);
        assert_eq!("ADMIN".parse::<AccountRole>().unwrap(), AccountRole::Admin);
        assert!("admin".parse::<AccountRole>().is_err());
        assert_eq!(AccountRole::Admin.to_string(), "ADMIN");
    }

    #[test]
    fn test_into_account() {
        let account = new_account().into_account(3);

        assert_eq!(account.id(), 3);
        assert_eq!(account.name(), Some("Alice Johnson"));
        assert_eq!(account.role(), AccountRole::Admin);
        assert_eq!(account.created_at(), account.updated_at());
    }

    #[test]
    fn test_serialization_excludes_password() {
        let account = new_account().into_account(1);
        let json = serde_json::to_string(&account).unwrap();

        assert!(!json.contains("hashed_password"));
        assert!(!json.contains("passwordHash"));
        assert!(json.contains("\"role\":\"ADMIN\""));
    }

    #[test]
    fn test_mutators_touch_updated_at() {
        let mut account = new_account().into_account(1);
        let original = account.updated_at();

        std::thread::sleep(std::time::Duration::from_millis(10));

        account.set_name("Robert Smith");
        account.set_role(AccountRole::User);

        assert_eq!(account.name(), Some("Robert Smith"));
        assert_eq!(account.role(), AccountRole::User);
        assert!(account.updated_at() > original);
    }
}
