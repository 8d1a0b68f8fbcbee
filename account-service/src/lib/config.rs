use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Signing secrets that must never reach a running deployment.
const PLACEHOLDER_SECRETS: [&str; 5] = [
    "your-secret-key",
    "changeme",
    "change-me",
    "secret",
    "jwt-secret",
];

/// Upper bound on token lifetime: one hundred years.
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365 * 100;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub run_mode: String,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    pub cors_origin: String,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    #[serde(default)]
    pub secret: String,
    pub expiration_hours: i64,
}

// Redacted: the secret never reaches logs.
impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, DATABASE__URL, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{RUN_MODE}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults (24 hour tokens, port 8080)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .set_default("database.max_connections", 5)?
            .set_default("server.http_port", 8080)?
            .set_default("server.cors_origin", "http://localhost:3000")?
            .set_default("jwt.expiration_hours", 24)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__"))
            .set_override("run_mode", run_mode)?
            .build()?;

        configuration.try_deserialize()
    }

    /// Reject settings the service must not start with.
    ///
    /// # Errors
    /// * `Message` - Empty or placeholder secret, or token lifetime outside
    ///   `1..=MAX_TOKEN_TTL_HOURS`
    pub fn validate(&self) -> Result<(), ConfigError> {
        let secret = self.jwt.secret.trim();
        if secret.is_empty() {
            return Err(ConfigError::Message(
                "jwt.secret must be set (JWT__SECRET)".to_string(),
            ));
        }
        if PLACEHOLDER_SECRETS
            .iter()
            .any(|p| secret.eq_ignore_ascii_case(p))
        {
            return Err(ConfigError::Message(
                "jwt.secret is a placeholder value".to_string(),
            ));
        }
        if self.jwt.expiration_hours <= 0 {
            return Err(ConfigError::Message(
                "jwt.expiration_hours must be positive".to_string(),
            ));
        }
        if self.jwt.expiration_hours > MAX_TOKEN_TTL_HOURS {
            return Err(ConfigError::Message(format!(
                "jwt.expiration_hours must be at most {}",
                MAX_TOKEN_TTL_HOURS
            )));
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.run_mode.eq_ignore_ascii_case("production")
    }
}
