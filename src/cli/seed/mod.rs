//! Seed command - resets the account table to a sample set

use tracing::info;

use crate::domain::{Account, AccountRole, DomainError};
use crate::infrastructure::account::{AccountService, RegisterAccountRequest};

struct SampleAccount {
    name: &'static str,
    email: &'static str,
    password: &'static str,
    role: AccountRole,
}

const SAMPLE_ACCOUNTS: [SampleAccount; 3] = [
    SampleAccount {
        name: "Alice Johnson",
        email: "alice@example.com",
        password: "alice123",
        role: AccountRole::Admin,
    },
    SampleAccount {
        name: "Bob Smith",
        email: "bob@example.com",
        password: "bob123",
        role: AccountRole::User,
    },
    SampleAccount {
        name: "Charlie Lee",
        email: "charlie@example.com",
        password: "charlie123",
        role: AccountRole::User,
    },
];

/// Run the seed against the configured database
pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap();

    if config.database.url.is_none() {
        anyhow::bail!("No database configured: set database.url or DATABASE_URL");
    }

    let accounts = crate::create_account_service(&config, crate::create_jwt_service(&config)).await?;

    let remaining = seed_accounts(&accounts).await?;
    info!(remaining = remaining.len(), "Seed complete");

    Ok(())
}

/// Delete every account, create the samples, promote Bob and remove Charlie.
///
/// Returns the accounts left at the end.
pub async fn seed_accounts(accounts: &AccountService) -> Result<Vec<Account>, DomainError> {
    let deleted = accounts.delete_all().await?;
    info!(deleted, "All accounts deleted");

    for sample in &SAMPLE_ACCOUNTS {
        let account = accounts
            .create_with_role(
                RegisterAccountRequest {
                    name: Some(sample.name.to_string()),
                    email: sample.email.to_string(),
                    password: sample.password.to_string(),
                },
                sample.role,
            )
            .await?;
        info!(id = account.id(), email = %account.email(), role = %account.role(), "Sample account created");
    }

    let all = accounts.list().await?;
    info!(count = all.len(), accounts = ?emails(&all), "All accounts");

    let bob = find_by_email(&all, "bob@example.com")?;
    let updated = accounts
        .update_profile(bob.id(), "Robert Smith", AccountRole::Admin)
        .await?;
    info!(id = updated.id(), name = ?updated.name(), role = %updated.role(), "Updated account");

    let charlie = find_by_email(&all, "charlie@example.com")?;
    accounts.delete(charlie.id()).await?;
    info!(id = charlie.id(), email = %charlie.email(), "Deleted account");

    let remaining = accounts.list().await?;
    info!(count = remaining.len(), accounts = ?emails(&remaining), "Remaining accounts");

    Ok(remaining)
}

fn find_by_email<'a>(accounts: &'a [Account], email: &str) -> Result<&'a Account, DomainError> {
    accounts
        .iter()
        .find(|a| a.email() == email)
        .ok_or_else(|| DomainError::not_found(format!("Seeded account {} is missing", email)))
}

fn emails(accounts: &[Account]) -> Vec<&str> {
    accounts.iter().map(Account::email).collect()
}
