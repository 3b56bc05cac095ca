//! Session token generation and validation

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::{Account, AccountRole, DomainError};

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Account id
    pub id: i64,
    pub role: AccountRole,
    /// Issued at (Unix epoch seconds)
    pub iat: i64,
    /// Expiration (Unix epoch seconds)
    pub exp: i64,
}

impl TokenClaims {
    pub fn new(account: &Account, expiration_hours: u64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours as i64);

        Self {
            id: account.id(),
            role: account.role(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }
}

/// Signing configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: u64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, expiration_hours: u64) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours,
        }
    }
}

/// Trait for session token operations
pub trait JwtGenerator: Send + Sync + Debug {
    /// Issue a token for an account
    fn generate(&self, account: &Account) -> Result<String, DomainError>;

    /// Verify signature and expiry, returning the claims
    fn validate(&self, token: &str) -> Result<TokenClaims, DomainError>;

    fn expiration_hours(&self) -> u64;
}

/// HS256 token service keyed by a shared secret
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("expiration_hours", &self.config.expiration_hours)
            .field("secret", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }
}

impl JwtGenerator for JwtService {
    fn generate(&self, account: &Account) -> Result<String, DomainError> {
        let claims = TokenClaims::new(account, self.config.expiration_hours);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to sign token: {}", e)))
    }

    fn validate(&self, token: &str) -> Result<TokenClaims, DomainError> {
        decode::<TokenClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| DomainError::authentication(format!("Invalid token: {}", e)))
    }

    fn expiration_hours(&self) -> u64 {
        self.config.expiration_hours
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewAccount;

    fn account(role: AccountRole) -> Account {
        NewAccount {
            name: Some("Alice Johnson".to_string()),
            email: "alice@example.com".to_string(),
            password_hash: "hash".to_string(),
            role,
        }
        .into_account(42)
    }

    #[test]
    fn test_generate_and_validate() {
        let service = JwtService::new(JwtConfig::new("test-secret", 4));

        let token = service.generate(&account(AccountRole::Admin)).unwrap();
        let claims = service.validate(&token).unwrap();

        assert_eq!(claims.id, 42);
        assert_eq!(claims.role, AccountRole::Admin);
        assert_eq!(claims.exp - claims.iat, 4 * 3600);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = JwtService::new(JwtConfig::new("secret-a", 4));
        let verifier = JwtService::new(JwtConfig::new("secret-b", 4));

        let token = issuer.generate(&account(AccountRole::User)).unwrap();

        assert!(matches!(
            verifier.validate(&token),
            Err(DomainError::Authentication { .. })
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = JwtService::new(JwtConfig::new("test-secret", 4));
        let claims = TokenClaims {
            id: 1,
            role: AccountRole::User,
            iat: Utc::now().timestamp() - 7200,
            exp: Utc::now().timestamp() - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(service.validate(&token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let service = JwtService::new(JwtConfig::new("test-secret", 4));
        assert!(service.validate("not.a.token").is_err());
    }

    #[test]
    fn test_debug_hides_secret() {
        let service = JwtService::new(JwtConfig::new("super-secret", 1));
        assert!(!format!("{:?}", service).contains("super-secret"));
    }
}
