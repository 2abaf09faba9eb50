//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::config::{AppConfig, ChatConfig, EmailConfig};

static ATTRIBUTE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.:-]*$").expect("valid attribute name regex"));

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `poll_interval_seconds` is 0
    /// - `fetch_timeout_ms` is set below 100ms or above 5 minutes
    /// - `user_agent` is empty
    /// - `size_attribute` is not a plain attribute name
    /// - `product_name_selector` is empty
    ///
    /// Returns `ConfigError::Missing` when an enabled transport lacks a
    /// required setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_seconds == 0 {
            return Err(ConfigError::Invalid {
                field: "poll_interval_seconds".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if let Some(timeout_ms) = self.fetch_timeout_ms {
            if timeout_ms < 100 {
                return Err(ConfigError::Invalid {
                    field: "fetch_timeout_ms".into(),
                    reason: "must be at least 100ms".into(),
                });
            }
            if timeout_ms > 300_000 {
                return Err(ConfigError::Invalid {
                    field: "fetch_timeout_ms".into(),
                    reason: "must not exceed 5 minutes (300000ms)".into(),
                });
            }
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if !ATTRIBUTE_NAME.is_match(&self.size_attribute) {
            return Err(ConfigError::Invalid {
                field: "size_attribute".into(),
                reason: format!("{:?} is not an attribute name", self.size_attribute),
            });
        }

        if self.product_name_selector.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "product_name_selector".into(),
                reason: "must not be empty".into(),
            });
        }

        self.chat.validate()?;
        self.email.validate()?;

        Ok(())
    }
}

impl ChatConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }

        require(&self.token, "chat.token", "SIZEWATCH_CHAT__TOKEN")?;
        require(&self.chat_id, "chat.chat_id", "SIZEWATCH_CHAT__CHAT_ID")?;

        if !self.api_base.starts_with("http://") && !self.api_base.starts_with("https://") {
            return Err(ConfigError::Invalid {
                field: "chat.api_base".into(),
                reason: "must be an http(s) URL".into(),
            });
        }

        Ok(())
    }
}

impl EmailConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }

        require(&self.host, "email.host", "SIZEWATCH_EMAIL__HOST")?;
        if self.port == 0 {
            return Err(ConfigError::Invalid { field: "email.port".into(), reason: "must be greater than 0".into() });
        }
        require(&self.user, "email.user", "SIZEWATCH_EMAIL__USER")?;
        require(&self.password, "email.password", "SIZEWATCH_EMAIL__PASSWORD")?;
        require(&self.from, "email.from", "SIZEWATCH_EMAIL__FROM")?;
        require(&self.to, "email.to", "SIZEWATCH_EMAIL__TO")?;

        Ok(())
    }
}

fn require(value: &Option<String>, field: &str, env: &str) -> Result<(), ConfigError> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(ConfigError::Missing { field: field.into(), hint: format!("Set {env} environment variable") }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email_config() -> EmailConfig {
        EmailConfig {
            enabled: true,
            host: Some("smtp.example.com".into()),
            user: Some("alerts@example.com".into()),
            password: Some("hunter2".into()),
            from: Some("alerts@example.com".into()),
            to: Some("me@example.com".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_poll_interval_zero() {
        let config = AppConfig { poll_interval_seconds: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "poll_interval_seconds"));
    }

    #[test]
    fn test_validate_timeout_too_small() {
        let config = AppConfig { fetch_timeout_ms: Some(50), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "fetch_timeout_ms"));
    }

    #[test]
    fn test_validate_timeout_exceeds_limit() {
        let config = AppConfig { fetch_timeout_ms: Some(301_000), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "fetch_timeout_ms"));
    }

    #[test]
    fn test_validate_timeout_edges() {
        for timeout_ms in [100, 300_000] {
            let config = AppConfig { fetch_timeout_ms: Some(timeout_ms), ..Default::default() };
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = AppConfig { user_agent: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));
    }

    #[test]
    fn test_validate_size_attribute() {
        let config = AppConfig { size_attribute: "data-size\"]".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "size_attribute"));

        let config = AppConfig { size_attribute: "data-variant-size".into(), ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_chat_requires_credentials() {
        let config = AppConfig {
            chat: ChatConfig { enabled: true, token: Some("123:abc".into()), ..Default::default() },
            ..Default::default()
        };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Missing { field, .. }) if field == "chat.chat_id"));
    }

    #[test]
    fn test_validate_chat_api_base_scheme() {
        let config = AppConfig {
            chat: ChatConfig {
                enabled: true,
                api_base: "api.telegram.org".into(),
                token: Some("123:abc".into()),
                chat_id: Some("42".into()),
            },
            ..Default::default()
        };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "chat.api_base"));
    }

    #[test]
    fn test_validate_disabled_transports_need_nothing() {
        let config = AppConfig {
            chat: ChatConfig { enabled: false, token: None, ..Default::default() },
            email: EmailConfig { enabled: false, host: None, ..Default::default() },
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_email_complete() {
        let config = AppConfig { email: email_config(), ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_email_missing_recipient() {
        let config = AppConfig { email: EmailConfig { to: None, ..email_config() }, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Missing { field, .. }) if field == "email.to"));
    }

    #[test]
    fn test_validate_email_blank_password() {
        let config =
            AppConfig { email: EmailConfig { password: Some("  ".into()), ..email_config() }, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Missing { field, .. }) if field == "email.password"));
    }

    #[test]
    fn test_validate_email_port_zero() {
        let config = AppConfig { email: EmailConfig { port: 0, ..email_config() }, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "email.port"));
    }
}
