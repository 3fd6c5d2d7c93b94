//! # configs
//!
//! Layered runtime configuration: built-in defaults, then an optional
//! `config/default.toml` under the working directory, then
//! `QUARTERDECK__`-prefixed environment variables
//! (`QUARTERDECK__HTTP__PORT=9090`). Secrets are held as [`SecretString`]
//! so they never land in logs via `Debug`.

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

#[cfg(feature = "db-postgres")]
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: SecretString,
    pub max_connections: u32,
}

#[cfg(feature = "auth-jwt")]
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: SecretString,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    #[cfg(feature = "db-postgres")]
    pub database: DatabaseConfig,
    #[cfg(feature = "auth-jwt")]
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Loads configuration from all layers. Fields without defaults
    /// (`database.url`, `auth.jwt_secret`) must come from the file or the
    /// environment; a missing one fails the load rather than the first
    /// request.
    pub fn load() -> Result<Self, ConfigError> {
        // .env is a development convenience; absence is fine.
        let _ = dotenvy::dotenv();

        let settings = config::Config::builder()
            .set_default("http.host", "0.0.0.0")?
            .set_default("http.port", 8080_i64)?
            .set_default("database.max_connections", 16_i64)?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(
                config::Environment::with_prefix("QUARTERDECK")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
