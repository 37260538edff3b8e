//! Application configuration. [Application](crate::application::Application) exposes the
//! configured paths and uses the rest to configure itself.
//!
//! By default, the config is created with opinionated default values, which can then be overwritten
//! by environment variables prefixed with `OAK_` or `oak.json` file. Nested values use `__` as the
//! separator, e.g. `OAK_PATHS__CACHE_PATH`.

use config::{Config, ConfigError, Environment, File};
use derive_more::Constructor;
use serde::Deserialize;
use std::path::PathBuf;

const CONFIG_ENV_PREFIX: &str = "OAK";
const CONFIG_ENV_PREFIX_SEPARATOR: &str = "_";
const CONFIG_ENV_SEPARATOR: &str = "__";

/// Name of the default config file.
pub const CONFIG_FILE: &str = "oak.json";

/// Directories used by the application and its service providers.
#[derive(Clone, Debug, Constructor, Eq, PartialEq)]
pub struct ApplicationPaths {
    /// Directory containing environment files.
    pub env_path: PathBuf,
    /// Directory containing configuration files.
    pub config_path: PathBuf,
    /// Directory for cached data.
    pub cache_path: PathBuf,
}

impl Default for ApplicationPaths {
    fn default() -> Self {
        Self {
            env_path: PathBuf::from("."),
            config_path: PathBuf::from("config"),
            cache_path: PathBuf::from("cache"),
        }
    }
}

impl From<OptionalApplicationPaths> for ApplicationPaths {
    fn from(value: OptionalApplicationPaths) -> Self {
        let default = Self::default();
        Self {
            env_path: value.env_path.unwrap_or(default.env_path),
            config_path: value.config_path.unwrap_or(default.config_path),
            cache_path: value.cache_path.unwrap_or(default.cache_path),
        }
    }
}

/// Framework configuration.
#[non_exhaustive]
#[derive(Clone, Constructor, Debug)]
pub struct ApplicationConfig {
    pub paths: ApplicationPaths,
    /// Should a default tracing logger be installed by
    /// [create_default](crate::application::create_default).
    pub install_tracing_logger: bool,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            paths: Default::default(),
            install_tracing_logger: true,
        }
    }
}

impl From<OptionalApplicationConfig> for ApplicationConfig {
    fn from(value: OptionalApplicationConfig) -> Self {
        let default = Self::default();
        Self {
            paths: value.paths.map(Into::into).unwrap_or(default.paths),
            install_tracing_logger: value
                .install_tracing_logger
                .unwrap_or(default.install_tracing_logger),
        }
    }
}

impl ApplicationConfig {
    /// Loads config from [CONFIG_FILE] (if present) and the environment, falling back to defaults
    /// for missing values.
    pub fn init_from_environment() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .prefix_separator(CONFIG_ENV_PREFIX_SEPARATOR)
                    .separator(CONFIG_ENV_SEPARATOR),
            )
            .build()
            .and_then(|config| config.try_deserialize::<OptionalApplicationConfig>())
            .map(|config| config.into())
    }
}

#[derive(Deserialize)]
struct OptionalApplicationPaths {
    env_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    cache_path: Option<PathBuf>,
}

#[derive(Deserialize)]
struct OptionalApplicationConfig {
    paths: Option<OptionalApplicationPaths>,
    install_tracing_logger: Option<bool>,
}
