//! # Client Configuration
//!
//! Settings for the API client and logging.
//!
//! Sources are layered, later ones overriding earlier ones:
//!
//! 1. built-in defaults
//! 2. an optional TOML file
//! 3. `PETSPOT_*` environment variables (nested keys use `__`), after
//!    loading a `.env` file if one is present
//!
//! # Examples
//!
//! ```
//! use petspot_core::config::ClientConfig;
//!
//! let config = ClientConfig::from_toml_str(r#"
//!     base_url = "https://api.petspot.example/v1/"
//!     request_timeout_ms = 8000
//! "#).unwrap();
//! assert_eq!(config.request_timeout_ms, 8000);
//! assert_eq!(config.default_page_size.get(), 50);
//! ```

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::path::Path;
use thiserror::Error;

/// Default API base URL.
const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/";

/// Default transport timeout in milliseconds.
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Default page size for nearby searches.
const DEFAULT_PAGE_SIZE: u64 = 50;

/// Environment variable prefix.
const ENV_PREFIX: &str = "PETSPOT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A value was read but is not acceptable.
    #[error("invalid configuration: {field}: {reason}")]
    Invalid {
        /// Offending key.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Compact,
    /// One JSON object per line.
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compact => write!(f, "compact"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// API client and logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every endpoint path is resolved against.
    pub base_url: Url,
    /// Transport timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Page size used when a search does not specify one.
    pub default_page_size: NonZeroUsize,
    /// Log output format.
    pub log_format: LogFormat,
}

/// Shape of the merged sources before validation.
#[derive(Debug, Deserialize)]
struct RawClientConfig {
    base_url: String,
    request_timeout_ms: u64,
    default_page_size: u64,
    log_format: LogFormat,
}

impl TryFrom<RawClientConfig> for ClientConfig {
    type Error = ConfigError;

    fn try_from(raw: RawClientConfig) -> Result<Self, Self::Error> {
        let base_url = Url::parse(&raw.base_url)
            .map_err(|e| ConfigError::invalid("base_url", e.to_string()))?;
        let default_page_size = usize::try_from(raw.default_page_size)
            .ok()
            .and_then(NonZeroUsize::new)
            .ok_or_else(|| ConfigError::invalid("default_page_size", "must be positive"))?;

        let config = Self {
            base_url,
            request_timeout_ms: raw.request_timeout_ms,
            default_page_size,
            log_format: raw.log_format,
        };
        config.validate()?;
        Ok(config)
    }
}

impl ClientConfig {
    /// Loads configuration from defaults, `path` (if given and present) and
    /// the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a source cannot be parsed or a value is
    /// invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Ok(env_file) = dotenvy::dotenv() {
            tracing::debug!(path = %env_file.display(), "loaded .env file");
        }

        let mut builder = Self::defaults()?;
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Self::finish(builder)
    }

    /// Parses configuration from a TOML document layered over the defaults.
    /// The environment is not consulted.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the document cannot be parsed or a value
    /// is invalid.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let builder = Self::defaults()?.add_source(File::from_str(toml, FileFormat::Toml));
        Self::finish(builder)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("request_timeout_ms", DEFAULT_REQUEST_TIMEOUT_MS)?
            .set_default("default_page_size", DEFAULT_PAGE_SIZE)?
            .set_default("log_format", LogFormat::default().to_string())?)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let raw: RawClientConfig = builder.build()?.try_deserialize()?;
        Self::try_from(raw)
    }

    /// Checks values that deserialization alone cannot enforce.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for a non-http(s) base URL, a base URL
    /// that cannot carry paths, or a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.base_url.scheme(), "http" | "https") {
            return Err(ConfigError::invalid(
                "base_url",
                format!("unsupported scheme {:?}", self.base_url.scheme()),
            ));
        }
        if self.base_url.cannot_be_a_base() {
            return Err(ConfigError::invalid("base_url", "cannot be used as a base URL"));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::invalid("request_timeout_ms", "must be positive"));
        }
        Ok(())
    }
}
