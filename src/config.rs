//! Configuration management
//!
//! Loads configuration from:
//! 1. Default values
//! 2. Configuration file (config/default.toml, config/local.toml or an explicit path)
//! 3. Environment variables (override)

use serde::Deserialize;
use std::{net::IpAddr, path::Path};

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub account: AccountConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

/// Signed-in account of the timeline space
#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
    /// Instance URL (e.g., "https://social.example.com")
    pub base_url: String,
    /// OAuth access token issued by the instance
    pub access_token: String,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_seconds: u64,
    /// Optional proxy URL applied to every request
    pub proxy: Option<String>,
}

fn default_user_agent() -> String {
    "ResortDesk/0.1.0".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Log format: "pretty" or "json"
    pub format: String,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// # Loading Order
    /// 1. Default values
    /// 2. config/default.toml (if exists)
    /// 3. config/local.toml (if exists), or `path` when given
    /// 4. Environment variables (RESORTDESK__*)
    ///
    /// # Errors
    /// Returns error if configuration is invalid
    pub fn load(path: Option<&Path>) -> Result<Self, crate::error::AppError> {
        use config::{Config, Environment, File};

        let mut builder = Config::builder()
            // Start with default values
            .set_default("http.user_agent", default_user_agent())?
            .set_default("http.timeout_seconds", 30)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // Load from config/default.toml if it exists
            .add_source(File::with_name("config/default").required(false));

        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name("config/local").required(false)),
        };

        let config = builder
            // Load from environment variables (RESORTDESK__*)
            .add_source(
                Environment::with_prefix("RESORTDESK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// Whether requests go to a local instance over plain http
    ///
    /// Only local hosts pass validation with `http`, so this is a warning
    /// for the caller to log once tracing is up.
    pub fn uses_plain_http(&self) -> bool {
        url::Url::parse(self.account.base_url.trim())
            .map(|url| url.scheme() == "http")
            .unwrap_or(false)
    }

    fn validate(&self) -> Result<(), crate::error::AppError> {
        if self.account.access_token.trim().is_empty() {
            return Err(crate::error::AppError::Config(
                "account.access_token must not be empty".to_string(),
            ));
        }

        if self.http.timeout_seconds == 0 {
            return Err(crate::error::AppError::Config(
                "http.timeout_seconds must be greater than 0".to_string(),
            ));
        }

        let base_url = url::Url::parse(self.account.base_url.trim()).map_err(|e| {
            crate::error::AppError::Config(format!("account.base_url is not a valid URL: {e}"))
        })?;

        match base_url.scheme() {
            "https" => {}
            "http" if is_local_host(base_url.host_str().unwrap_or_default()) => {}
            "http" => {
                return Err(crate::error::AppError::Config(
                    "account.base_url must use https for non-local instances".to_string(),
                ));
            }
            scheme => {
                return Err(crate::error::AppError::Config(format!(
                    "account.base_url has unsupported scheme {scheme}"
                )));
            }
        }

        if let Some(proxy) = &self.http.proxy {
            url::Url::parse(proxy).map_err(|e| {
                crate::error::AppError::Config(format!("http.proxy is not a valid URL: {e}"))
            })?;
        }

        Ok(())
    }
}

fn is_local_host(host: &str) -> bool {
    let host = host
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim_end_matches('.')
        .to_ascii_lowercase();
    if host == "localhost" || host.ends_with(".localhost") {
        return true;
    }

    if let Ok(ip) = host.parse::<IpAddr>() {
        return ip.is_loopback();
    }

    false
}
