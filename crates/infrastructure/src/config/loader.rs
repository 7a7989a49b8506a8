//! Configuration file loading with environment overrides.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use keyhole_domain::{AuthSettings, DomainError};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::serialization::{SerializationError, from_json_bytes};

/// Prefix of the environment variables overriding file settings.
pub const ENV_PREFIX: &str = "KEYHOLE_";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] SerializationError),

    /// A setting is missing or malformed.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] DomainError),
}

/// On-disk shape of `config.json`. Every key is optional so that
/// environment variables can fill the gaps.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    authority: Option<String>,
    client_id: Option<String>,
    redirect_uri: Option<String>,
    post_logout_redirect_uri: Option<String>,
    scope: Option<String>,
    api_base_url: Option<String>,
    load_user_info: Option<bool>,
}

/// Fully validated application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Identity provider client settings.
    pub auth: AuthSettings,
    /// Base URL of the protected backend API, if configured.
    pub api_base_url: Option<Url>,
}

/// Loads [`AppConfig`] from JSON plus environment overrides.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    /// Overrides used instead of the process environment, when set.
    env: Option<HashMap<String, String>>,
}

impl ConfigLoader {
    /// Loader reading overrides from the process environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader reading overrides from the given map instead of the process
    /// environment. Keys are full variable names such as `KEYHOLE_SCOPE`.
    #[must_use]
    pub const fn with_env(env: HashMap<String, String>) -> Self {
        Self { env: Some(env) }
    }

    /// Reads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// resulting settings are invalid.
    pub async fn load(&self, path: &Path) -> Result<AppConfig, ConfigError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded configuration file");
        self.parse(&bytes)
    }

    /// Validates configuration given as JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the settings are invalid.
    pub fn parse(&self, bytes: &[u8]) -> Result<AppConfig, ConfigError> {
        let raw: RawConfig = from_json_bytes(bytes)?;
        self.build(raw)
    }

    /// Builds configuration from environment variables alone.
    ///
    /// # Errors
    ///
    /// Returns an error if required variables are missing or invalid.
    pub fn load_env(&self) -> Result<AppConfig, ConfigError> {
        self.build(RawConfig::default())
    }

    fn var(&self, key: &str) -> Option<String> {
        let name = format!("{ENV_PREFIX}{key}");
        match &self.env {
            Some(env) => env.get(&name).cloned(),
            None => std::env::var(&name).ok(),
        }
    }

    fn overlay(&self, key: &str, file_value: Option<String>) -> String {
        self.var(key).or(file_value).unwrap_or_default()
    }

    fn build(&self, raw: RawConfig) -> Result<AppConfig, ConfigError> {
        let mut auth = AuthSettings::new(
            &self.overlay("AUTHORITY", raw.authority),
            &self.overlay("CLIENT_ID", raw.client_id),
            &self.overlay("REDIRECT_URI", raw.redirect_uri),
            &self.overlay("POST_LOGOUT_REDIRECT_URI", raw.post_logout_redirect_uri),
            &self.overlay("SCOPE", raw.scope),
        )?;
        if let Some(load_user_info) = raw.load_user_info {
            auth = auth.with_load_user_info(load_user_info);
        }

        let api_base_url = self
            .var("API_BASE_URL")
            .or(raw.api_base_url)
            .filter(|value| !value.trim().is_empty())
            .map(|value| {
                Url::parse(value.trim()).map_err(|e| DomainError::InvalidUrl {
                    field: "apiBaseUrl",
                    message: e.to_string(),
                })
            })
            .transpose()?;

        Ok(AppConfig { auth, api_base_url })
    }
}
