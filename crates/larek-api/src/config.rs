//! # API Configuration
//!
//! Where the catalog API lives and how long to wait for it.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     LAREK_API_ORIGIN=https://larek-api.nomoreparties.co                │
//! │     LAREK_API_PATH / LAREK_CDN_PATH / LAREK_TIMEOUT_SECS               │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/larek/larek.toml (Linux)                                 │
//! │     ~/Library/Application Support/dev.larek.storefront/larek.toml      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! origin = "https://larek-api.nomoreparties.co"
//! api_path = "/api/weblarek"
//! cdn_path = "/content/weblarek"
//! timeout_secs = 10
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ApiError, ApiResult};

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "larek.toml";

// =============================================================================
// API Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Scheme + host of the API server.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Path prefix of the JSON API.
    #[serde(default = "default_api_path")]
    pub api_path: String,

    /// Path prefix product images are served from.
    #[serde(default = "default_cdn_path")]
    pub cdn_path: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_origin() -> String {
    "https://larek-api.nomoreparties.co".to_string()
}

fn default_api_path() -> String {
    "/api/weblarek".to_string()
}

fn default_cdn_path() -> String {
    "/content/weblarek".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            origin: default_origin(),
            api_path: default_api_path(),
            cdn_path: default_cdn_path(),
            timeout_secs: default_timeout(),
        }
    }
}

// =============================================================================
// Main API Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub api: ApiSettings,
}

impl ApiConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (larek.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ApiResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading API config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load API config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ApiResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ApiError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "API config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ApiResult<()> {
        let origin = Url::parse(&self.api.origin)?;
        if !matches!(origin.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl(format!(
                "API origin must start with http:// or https://, got: {}",
                self.api.origin
            )));
        }

        for (name, path) in [("api_path", &self.api.api_path), ("cdn_path", &self.api.cdn_path)] {
            if !path.is_empty() && !path.starts_with('/') {
                return Err(ApiError::InvalidConfig(format!(
                    "{} must start with '/', got: {}",
                    name, path
                )));
            }
        }

        if self.api.timeout_secs == 0 {
            return Err(ApiError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `LAREK_*` overrides taken from `lookup`.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(origin) = lookup("LAREK_API_ORIGIN") {
            debug!(origin = %origin, "Overriding API origin from environment");
            self.api.origin = origin;
        }

        if let Some(path) = lookup("LAREK_API_PATH") {
            self.api.api_path = path;
        }

        if let Some(path) = lookup("LAREK_CDN_PATH") {
            self.api.cdn_path = path;
        }

        if let Some(timeout) = lookup("LAREK_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring non-numeric LAREK_TIMEOUT_SECS"),
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "larek", "storefront")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// `{origin}{api_path}`, without a trailing slash.
    pub fn api_url(&self) -> String {
        join_url(&self.api.origin, &self.api.api_path)
    }

    /// `{origin}{cdn_path}`, without a trailing slash.
    pub fn cdn_url(&self) -> String {
        join_url(&self.api.origin, &self.api.cdn_path)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }
}

fn join_url(origin: &str, path: &str) -> String {
    format!("{}{}", origin.trim_end_matches('/'), path.trim_end_matches('/'))
}
