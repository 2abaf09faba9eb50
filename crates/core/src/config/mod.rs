//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SIZEWATCH_*)
//! 2. TOML config file (if SIZEWATCH_CONFIG_FILE set)
//! 3. Built-in defaults
//!
//! The configuration is loaded once at startup and handed to each component;
//! nothing reloads it afterwards.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Deserializer, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SIZEWATCH_*, nested keys split on `__`)
/// 2. TOML config file (if SIZEWATCH_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Repeat the check forever, sleeping between iterations.
    ///
    /// Set via SIZEWATCH_ENDLESS environment variable.
    #[serde(default)]
    pub endless: bool,

    /// Seconds to sleep between iterations in endless mode.
    ///
    /// Set via SIZEWATCH_POLL_INTERVAL_SECONDS environment variable.
    #[serde(default = "default_poll_interval_seconds")]
    pub poll_interval_seconds: u64,

    /// Append-only log file.
    ///
    /// Set via SIZEWATCH_LOG_PATH environment variable.
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,

    /// User-Agent string for page fetches.
    ///
    /// Set via SIZEWATCH_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Optional request timeout in milliseconds. Unset keeps the HTTP client default.
    ///
    /// Set via SIZEWATCH_FETCH_TIMEOUT_MS environment variable.
    #[serde(default)]
    pub fetch_timeout_ms: Option<u64>,

    /// Attribute whose value is the size code on the availability element.
    #[serde(default = "default_size_attribute")]
    pub size_attribute: String,

    /// CSS selector of the element holding the product name.
    #[serde(default = "default_product_name_selector")]
    pub product_name_selector: String,

    #[serde(default)]
    pub chat: ChatConfig,

    #[serde(default)]
    pub email: EmailConfig,
}

/// Chat-bot transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Bot API base URL; `/bot{token}/sendMessage` is appended.
    #[serde(default = "default_chat_api_base")]
    pub api_base: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub token: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub chat_id: Option<String>,
}

/// SMTP transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub host: Option<String>,

    #[serde(default = "default_smtp_port")]
    pub port: u16,

    /// Implicit TLS when true, plaintext SMTP otherwise.
    #[serde(default = "default_true")]
    pub ssl: bool,

    #[serde(default, deserialize_with = "lenient_string")]
    pub user: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub password: Option<String>,

    #[serde(default)]
    pub from: Option<String>,

    #[serde(default)]
    pub to: Option<String>,

    #[serde(default = "default_subject")]
    pub subject: String,
}

/// Accept a string, integer or boolean and keep it as text.
///
/// Env and TOML values such as `SIZEWATCH_CHAT__CHAT_ID=123456789` or
/// `chat_id = -100123` arrive as numbers.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Unsigned(u64),
        Signed(i64),
        Flag(bool),
    }

    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        Scalar::Text(s) => s,
        Scalar::Unsigned(n) => n.to_string(),
        Scalar::Signed(n) => n.to_string(),
        Scalar::Flag(b) => b.to_string(),
    }))
}

fn default_poll_interval_seconds() -> u64 {
    120
}

fn default_log_path() -> PathBuf {
    PathBuf::from("log/sizewatch.log")
}

fn default_user_agent() -> String {
    "sizewatch/0.1".into()
}

fn default_size_attribute() -> String {
    "data-product-size".into()
}

fn default_product_name_selector() -> String {
    ".productDescription__productName".into()
}

fn default_chat_api_base() -> String {
    "https://api.telegram.org".into()
}

fn default_smtp_port() -> u16 {
    465
}

fn default_subject() -> String {
    "Stock Alert notification".into()
}

fn default_true() -> bool {
    true
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self { enabled: false, api_base: default_chat_api_base(), token: None, chat_id: None }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: None,
            port: default_smtp_port(),
            ssl: true,
            user: None,
            password: None,
            from: None,
            to: None,
            subject: default_subject(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endless: false,
            poll_interval_seconds: default_poll_interval_seconds(),
            log_path: default_log_path(),
            user_agent: default_user_agent(),
            fetch_timeout_ms: None,
            size_attribute: default_size_attribute(),
            product_name_selector: default_product_name_selector(),
            chat: ChatConfig::default(),
            email: EmailConfig::default(),
        }
    }
}

impl AppConfig {
    /// Sleep between iterations as Duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    /// Fetch timeout as Duration, if one is configured.
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_ms.map(Duration::from_millis)
    }

    /// True when at least one notification transport is enabled.
    pub fn notifications_enabled(&self) -> bool {
        self.chat.enabled || self.email.enabled
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `SIZEWATCH_`
    /// 2. TOML file from `SIZEWATCH_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SIZEWATCH_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("SIZEWATCH_")
                .ignore(&["config_file"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        Self::from_figment(figment)
    }

    /// Extract and validate configuration from a prepared figment.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
