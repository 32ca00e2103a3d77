use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use thiserror::Error;

/// Minimum secret length recommended for HS256 signing keys.
pub const MIN_JWT_SECRET_BYTES: usize = 32;

/// Run mode in which a weak signing secret only produces a warning.
pub const DEVELOPMENT_MODE: &str = "development";

// Substrings that mark a guessable or placeholder secret
const WEAK_SECRET_PATTERNS: &[&str] = &[
    "secret", "password", "admin", "123456", "qwerty", "default", "example", "test", "demo",
    "sample", "temp", "changeme", "change-me", "letmein", "welcome",
];

/// Reason a JWT signing secret is unfit for production.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecretWeakness {
    #[error("JWT secret is {0} bytes, at least {MIN_JWT_SECRET_BYTES} required")]
    TooShort(usize),

    #[error("JWT secret contains the weak pattern '{0}'")]
    WeakPattern(&'static str),
}

/// Current run mode (`RUN_MODE`, defaulting to development).
pub fn run_mode() -> String {
    env::var("RUN_MODE").unwrap_or_else(|_| DEVELOPMENT_MODE.to_string())
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
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
    pub host: String,
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
}

impl JwtConfig {
    /// Check the signing secret for length and well-known weak patterns.
    ///
    /// The development secret shipped in `config/default.toml` always fails.
    pub fn secret_weakness(&self) -> Option<SecretWeakness> {
        if self.secret.len() < MIN_JWT_SECRET_BYTES {
            return Some(SecretWeakness::TooShort(self.secret.len()));
        }

        let lowered = self.secret.to_lowercase();
        WEAK_SECRET_PATTERNS
            .iter()
            .copied()
            .find(|pattern| lowered.contains(pattern))
            .map(SecretWeakness::WeakPattern)
    }

    /// Apply the secret check for a run mode. A weak secret is tolerated as
    /// `Ok(Some(_))` in development only and rejected anywhere else.
    pub fn enforce_secret(
        &self,
        run_mode: &str,
    ) -> Result<Option<SecretWeakness>, SecretWeakness> {
        match self.secret_weakness() {
            Some(weakness) if run_mode != DEVELOPMENT_MODE => Err(weakness),
            weakness => Ok(weakness),
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, DATABASE__URL, SERVER__HTTP_PORT, etc.);
    ///    a bare `JWT_SECRET` is honoured when `JWT__SECRET` is unset
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults (every key except `jwt.secret`)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = run_mode();
        let legacy_secret = legacy_jwt_secret(|key| env::var(key).ok());

        let configuration = ConfigBuilder::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.http_port", 3333)?
            .set_default("database.url", "sqlite://app.db")?
            .set_default("database.max_connections", 5)?
            .set_default("jwt.expiration_hours", 24)?
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__"))
            .set_override_option("jwt.secret", legacy_secret)?
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }
}

/// `JWT_SECRET` from older deployments, used only when `JWT__SECRET` is unset.
fn legacy_jwt_secret(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    if lookup("JWT__SECRET").is_some() {
        return None;
    }
    lookup("JWT_SECRET").filter(|secret| !secret.is_empty())
}
