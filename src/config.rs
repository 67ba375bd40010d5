//! # Settings
//!
//! Layered runtime configuration:
//!
//! 1. Defaults in code
//! 2. Optional `config/{environment}.toml`
//! 3. Environment variables with the `PROCUREMENT` prefix and `__` as the
//!    section separator, e.g. `PROCUREMENT__SERVER__PORT=8080`
//!
//! The binary loads `.env` with `dotenvy` before calling [`Settings::load`].

use crate::application::EngineConfig;
use crate::application::engine_config::{
    DEFAULT_MAX_LINE_ITEMS, DEFAULT_MAX_RESPONSE_ITEMS, DEFAULT_NUMBER_PREFIX,
};
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::net::{AddrParseError, SocketAddr};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "PROCUREMENT";

/// Environment variable naming the active environment.
pub const ENVIRONMENT_VAR: &str = "PROCUREMENT_ENVIRONMENT";

/// Application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Active environment (`development`, `production`, ...).
    pub environment: String,
    /// HTTP server.
    pub server: ServerConfig,
    /// Log output.
    pub logging: LoggingConfig,
    /// Engine tunables.
    #[serde(default)]
    pub engine: EngineConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl ServerConfig {
    /// Returns the bind address.
    ///
    /// # Errors
    ///
    /// Returns an error if `host` is not an IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, overridden by `RUST_LOG`.
    pub filter: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Settings {
    /// Loads settings from defaults, the environment's config file and
    /// `PROCUREMENT__*` variables.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a source cannot be read or a value has the
    /// wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var(ENVIRONMENT_VAR).unwrap_or_else(|_| "development".to_string());

        Self::defaults(&environment)?
            .add_source(File::with_name(&format!("config/{environment}")).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Returns a builder holding only the in-code defaults.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a default cannot be set.
    pub fn defaults(environment: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let max_line_items = u64::try_from(DEFAULT_MAX_LINE_ITEMS).unwrap_or(u64::MAX);
        let max_response_items = u64::try_from(DEFAULT_MAX_RESPONSE_ITEMS).unwrap_or(u64::MAX);

        config::Config::builder()
            .set_default("environment", environment)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("logging.filter", "procurement_rfq=info,tower_http=info")?
            .set_default("logging.format", "pretty")?
            .set_default("engine.quotation_number_prefix", DEFAULT_NUMBER_PREFIX)?
            .set_default("engine.max_line_items", max_line_items)?
            .set_default("engine.max_response_items", max_response_items)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Settings {
        Settings::defaults("test")
            .unwrap()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn defaults_deserialize() {
        let settings = from_toml("");
        assert_eq!(settings.environment, "test");
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.logging.format, LogFormat::Pretty);
        assert_eq!(settings.engine, EngineConfig::default());
    }

    #[test]
    fn file_overrides_defaults() {
        let settings = from_toml(
            r#"
            [server]
            port = 8080

            [logging]
            format = "json"

            [engine]
            quotation_number_prefix = "RFQ"
            max_line_items = 20
            "#,
        );
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert_eq!(settings.engine.quotation_number_prefix, "RFQ");
        assert_eq!(settings.engine.max_line_items, 20);
        assert_eq!(settings.engine.max_response_items, DEFAULT_MAX_RESPONSE_ITEMS);
    }

    #[test]
    fn socket_addr_parses() {
        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 9000,
        };
        assert_eq!(server.socket_addr().unwrap().port(), 9000);
    }
}
