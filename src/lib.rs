//! Users API
//!
//! An HTTP service over two stores:
//! - user records kept in a JSON file, validated field by field
//! - database accounts with hashed passwords and session tokens

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use crate::config::AuthConfig;
use domain::AccountRepository;
use infrastructure::{
    account::{AccountService, Argon2Hasher, InMemoryAccountRepository, PostgresAccountRepository},
    auth::{JwtConfig, JwtGenerator, JwtService},
    storage::{connect_pool, run_storage_migrations, PostgresConfig},
    user::{JsonFileUserStore, UserRecordService},
};
use rand::Rng;
use tracing::{info, warn};

/// Create the application state with all services initialized
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let user_store = Arc::new(JsonFileUserStore::new(&config.storage.users_file));
    info!(path = %config.storage.users_file, "Using JSON file user store");

    let jwt_service = create_jwt_service(config);

    let accounts = create_account_service(config, jwt_service.clone()).await?;

    Ok(AppState::new(
        Arc::new(UserRecordService::new(user_store)),
        Arc::new(accounts),
        jwt_service,
        config.server.port,
    ))
}

/// Token service signed with the configured secret, or a random one
pub fn create_jwt_service(config: &AppConfig) -> Arc<dyn JwtGenerator> {
    Arc::new(JwtService::new(JwtConfig::new(
        resolve_jwt_secret(&config.auth),
        config.auth.token_expiration_hours,
    )))
}

fn resolve_jwt_secret(auth: &AuthConfig) -> String {
    auth.jwt_secret.clone().unwrap_or_else(|| {
        warn!(
            "No JWT secret configured (auth.jwt_secret or JWT_SECRET). Generating random secret. \
             Tokens will NOT survive restarts."
        );
        generate_random_secret()
    })
}

fn generate_random_secret() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Account service over Postgres when a database URL is configured, in memory otherwise
pub async fn create_account_service(
    config: &AppConfig,
    jwt_service: Arc<dyn JwtGenerator>,
) -> anyhow::Result<AccountService> {
    let repository = create_account_repository(config).await?;

    Ok(AccountService::new(
        repository,
        Arc::new(Argon2Hasher::new()),
        jwt_service,
    ))
}

async fn create_account_repository(
    config: &AppConfig,
) -> anyhow::Result<Arc<dyn AccountRepository>> {
    let Some(url) = config.database.url.as_deref() else {
        warn!("No database configured, accounts are kept in memory");
        return Ok(Arc::new(InMemoryAccountRepository::new()));
    };

    let pool = connect_pool(
        &PostgresConfig::new(url).with_max_connections(config.database.max_connections),
    )
    .await?;

    run_storage_migrations(&pool).await?;
    info!("Database migrations applied");

    Ok(Arc::new(PostgresAccountRepository::new(pool)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_secret_is_used() {
        let auth = AuthConfig {
            jwt_secret: Some("configured".to_string()),
            ..AuthConfig::default()
        };

        assert_eq!(resolve_jwt_secret(&auth), "configured");
    }

    #[test]
    fn test_default_config_gets_random_secret() {
        let auth = AuthConfig::default();

        let first = resolve_jwt_secret(&auth);
        let second = resolve_jwt_secret(&auth);

        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(first, second);
    }

    #[test]
    fn test_tokens_do_not_verify_across_random_secrets() {
        let config = AppConfig::default();
        let account = domain::NewAccount {
            name: None,
            email: "alice@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: domain::AccountRole::User,
        }
        .into_account(1);

        let token = create_jwt_service(&config).generate(&account).unwrap();

        assert!(create_jwt_service(&config).validate(&token).is_err());
    }
}
