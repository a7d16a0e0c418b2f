//! Configuration for the portfolio API client
//!
//! Supports environment-based configuration, optional TOML files and
//! builder-style overrides on top of sensible defaults.

use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default API base URL (local backend)
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Environment types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development; error details are shown to the user
    Development,
    /// Deployed site
    #[default]
    Production,
}

impl Environment {
    /// Parse from the `PORTFOLIO_ENV` environment variable
    #[must_use]
    pub fn from_env() -> Self {
        Self::parse(&env::var("PORTFOLIO_ENV").unwrap_or_default())
    }

    /// Parse from a free-form name; anything unrecognized is production
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "development" | "dev" | "local" => Self::Development,
            _ => Self::Production,
        }
    }

    /// Whether this is a development environment
    #[must_use]
    pub fn is_development(self) -> bool {
        self == Self::Development
    }
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL every request path is appended to
    pub base_url: String,
    /// Request timeout, in milliseconds on the wire
    #[serde(rename = "timeout_ms", with = "duration_ms")]
    pub timeout: Duration,
    /// Current environment
    pub environment: Environment,
    /// Directory holding the persisted session token.
    /// `None` uses the platform config directory.
    pub token_dir: Option<PathBuf>,
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        u64::try_from(duration.as_millis())
            .unwrap_or(u64::MAX)
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            environment: Environment::default(),
            token_dir: None,
        }
    }
}

impl ClientConfig {
    /// Create a configuration for a base URL with default timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::default().with_base_url(base_url)
    }

    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `PORTFOLIO_API_BASE_URL`: Base URL of the REST API
    /// - `PORTFOLIO_API_TIMEOUT_MS`: Request timeout in milliseconds
    /// - `PORTFOLIO_ENV`: Environment (development/production)
    /// - `PORTFOLIO_TOKEN_DIR`: Directory for the persisted session token
    pub fn from_env() -> ApiResult<Self> {
        let base_url =
            env::var("PORTFOLIO_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout = match env::var("PORTFOLIO_API_TIMEOUT_MS") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map(Duration::from_millis)
                .map_err(|_| ApiError::config(format!("invalid PORTFOLIO_API_TIMEOUT_MS: {raw}")))?,
            Err(_) => DEFAULT_TIMEOUT,
        };

        let config = Self {
            base_url,
            timeout,
            environment: Environment::from_env(),
            token_dir: env::var_os("PORTFOLIO_TOKEN_DIR").map(PathBuf::from),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text; missing keys keep their defaults
    pub fn from_toml_str(text: &str) -> ApiResult<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|e| ApiError::config(format!("invalid client configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> ApiResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            ApiError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set the environment
    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Builder-style method to set the token directory
    #[must_use]
    pub fn with_token_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.token_dir = Some(dir.into());
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.base_url.is_empty() {
            return Err(ApiError::config("base_url cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ApiError::config("base_url must start with http:// or https://"));
        }

        reqwest::Url::parse(&self.base_url)
            .map_err(|e| ApiError::config(format!("base_url is not a valid URL: {e}")))?;

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        Ok(())
    }
}
