//! Client configuration.
//!
//! Sources are merged in this order, later ones overriding earlier ones:
//! 1. `ClientConfig::default()`
//! 2. an optional TOML file
//! 3. `DATAFAIR_*` environment variables (`DATAFAIR_BASE_URL`,
//!    `DATAFAIR_TIMEOUT_SECS`)

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_PREFIX: &str = "DATAFAIR_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("base URL must start with http:// or https://, got `{0}`")]
    InvalidBaseUrl(String),

    #[error("timeout must be at least one second")]
    ZeroTimeout,
}

/// Settings fixed when an `ApiClient` is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Origin of the backend, e.g. `http://localhost:5000`.
    pub base_url: String,
    pub timeout_secs: u64,
    /// Sent with every request in addition to `Content-Type: application/json`.
    pub default_headers: BTreeMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 30,
            default_headers: BTreeMap::new(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    /// Sub-second parts round up to the next whole second.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.default_headers.insert(name.to_string(), value.to_string());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The layered provider chain, exposed so callers can merge more sources.
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(ClientConfig::default()));
        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load from defaults and the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment(None))
    }

    /// Load from defaults, `path`, and the environment.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment(Some(path)))
    }

    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: ClientConfig = figment.extract().map_err(Box::new)?;
        config.validate()?;
        tracing::debug!(base_url = %config.base_url, timeout_secs = config.timeout_secs, "client configuration loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}
