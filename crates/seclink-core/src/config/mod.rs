//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! optional TOML files layered under `SECLINK__` environment variables.
//! Each sub-module represents a logical configuration section.

pub mod app;
pub mod links;
pub mod logging;
pub mod storage;

use serde::{Deserialize, Serialize};

use self::app::ServerConfig;
use self::links::LinkConfig;
use self::logging::LoggingConfig;
use self::storage::StorageConfig;

use crate::error::AppError;
use crate::types::ttl::parse_ttl;

/// Root application configuration.
///
/// Constructed once at startup and handed to each component's constructor;
/// nothing reads configuration from global state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Data directory settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Link issuing settings.
    #[serde(default)]
    pub links: LinkConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Sources, lowest precedence first: `config/default.toml`,
    /// `config/{env}.toml`, the explicit `file` (if any), then environment
    /// variables such as `SECLINK__SERVER__PORT=9000`.
    pub fn load(env: &str, file: Option<&str>) -> Result<Self, AppError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false));

        if let Some(path) = file {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("SECLINK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the rest of the application cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.links.id_length < 16 {
            return Err(AppError::configuration(format!(
                "links.id_length must be at least 16, got {}",
                self.links.id_length
            )));
        }

        let ttl = parse_ttl(&self.links.default_ttl).map_err(|e| {
            AppError::configuration(format!("links.default_ttl is invalid: {}", e.message))
        })?;
        if ttl <= chrono::TimeDelta::zero() {
            return Err(AppError::configuration("links.default_ttl must be positive"));
        }

        if self.server.port == self.server.admin_port {
            return Err(AppError::configuration(
                "server.port and server.admin_port must differ",
            ));
        }

        Ok(())
    }
}
