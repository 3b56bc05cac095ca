use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// File-backed user records and static assets
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub users_file: String,
    pub public_dir: String,
}

/// Relational store for accounts; in-memory when `url` is unset
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
}

/// Session token signing; a random secret is generated when none is set
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    pub token_expiration_hours: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            users_file: "users.json".to_string(),
            public_dir: "src/public".to_string(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 5,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_expiration_hours: 4,
        }
    }
}

impl AppConfig {
    /// Layer `config/default`, `config/local` and `APP__*` variables, then
    /// fill gaps from the conventional `DATABASE_URL` and `JWT_SECRET`.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: Self = config.try_deserialize()?;
        app_config.apply_env_fallbacks(|key| std::env::var(key).ok());

        Ok(app_config)
    }

    fn apply_env_fallbacks(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.database.url.is_none() {
            self.database.url = lookup("DATABASE_URL").filter(|url| !url.is_empty());
        }

        if self.auth.jwt_secret.is_none() {
            self.auth.jwt_secret = lookup("JWT_SECRET").filter(|s| !s.is_empty());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.storage.users_file, "users.json");
        assert_eq!(config.auth.token_expiration_hours, 4);
        assert!(config.database.url.is_none());
        assert!(config.auth.jwt_secret.is_none());
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "server": { "port": 4000 },
            "logging": { "format": "json" }
        }))
        .unwrap();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_env_fallbacks_fill_gaps() {
        let mut config = AppConfig::default();

        config.apply_env_fallbacks(|key| match key {
            "DATABASE_URL" => Some("postgres://localhost/users".to_string()),
            "JWT_SECRET" => Some("from-env".to_string()),
            _ => None,
        });

        assert_eq!(
            config.database.url.as_deref(),
            Some("postgres://localhost/users")
        );
        assert_eq!(config.auth.jwt_secret.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_env_fallbacks_do_not_override_explicit_values() {
        let mut config = AppConfig::default();
        config.database.url = Some("postgres://configured/db".to_string());
        config.auth.jwt_secret = Some("configured".to_string());

        config.apply_env_fallbacks(|_| Some("from-env".to_string()));

        assert_eq!(config.database.url.as_deref(), Some("postgres://configured/db"));
        assert_eq!(config.auth.jwt_secret.as_deref(), Some("configured"));
    }

    #[test]
    fn test_empty_env_secret_is_ignored() {
        let mut config = AppConfig::default();

        config.apply_env_fallbacks(|_| Some(String::new()));

        assert!(config.database.url.is_none());
        assert!(config.auth.jwt_secret.is_none());
    }
}
