//! Notification dispatch.
//!
//! Transports are kept in an ordered list. Every transport is attempted for
//! every notification, failures are collected into a [`DispatchReport`] and
//! never raised, so one broken transport cannot hide another's delivery.

pub mod chat;
pub mod email;
pub mod error;

pub use chat::ChatTransport;
pub use email::EmailTransport;
pub use error::NotifyError;

use async_trait::async_trait;
use url::Url;

use sizewatch_core::{AppConfig, error_chain};

/// A message to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub text: String,
    /// Link back to the product page, rendered per transport.
    pub link: Option<Url>,
    /// Ask transports that support it to render the text as Markdown.
    pub markdown: bool,
}

impl Notification {
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), link: None, markdown: false }
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        Self { text: text.into(), link: None, markdown: true }
    }

    pub fn with_link(mut self, link: Url) -> Self {
        self.link = Some(link);
        self
    }
}

/// A notification delivery mechanism.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Short name used in logs and failure summaries.
    fn name(&self) -> &'static str;

    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// One transport that failed to deliver.
#[derive(Debug)]
pub struct TransportFailure {
    pub transport: &'static str,
    pub error: NotifyError,
}

/// What happened to one notification across all transports.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub delivered: Vec<&'static str>,
    pub failures: Vec<TransportFailure>,
}

impl DispatchReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// `transport: error` pairs joined with `; `.
    pub fn failure_summary(&self) -> String {
        self.failures
            .iter()
            .map(|f| format!("{}: {}", f.transport, error_chain(&f.error)))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Ordered set of enabled transports.
#[derive(Default)]
pub struct Notifier {
    transports: Vec<Box<dyn Transport>>,
}

impl Notifier {
    pub fn new(transports: Vec<Box<dyn Transport>>) -> Self {
        Self { transports }
    }

    /// Build the transports enabled in `config`: chat first, then e-mail.
    pub fn from_config(config: &AppConfig) -> Result<Self, NotifyError> {
        let mut transports: Vec<Box<dyn Transport>> = Vec::new();

        if config.chat.enabled {
            transports.push(Box::new(ChatTransport::from_config(&config.chat)?));
        }
        if config.email.enabled {
            transports.push(Box::new(EmailTransport::from_config(&config.email)?));
        }

        Ok(Self::new(transports))
    }

    pub fn is_empty(&self) -> bool {
        self.transports.is_empty()
    }

    pub fn transport_names(&self) -> Vec<&'static str> {
        self.transports.iter().map(|t| t.name()).collect()
    }

    /// Attempt every transport in order and collect the results.
    pub async fn dispatch(&self, notification: &Notification) -> DispatchReport {
        let mut report = DispatchReport::default();

        for transport in &self.transports {
            match transport.send(notification).await {
                Ok(()) => {
                    tracing::debug!("notification delivered via {}", transport.name());
                    report.delivered.push(transport.name());
                }
                Err(error) => {
                    tracing::warn!(transport = transport.name(), %error, "notification failed");
                    report.failures.push(TransportFailure { transport: transport.name(), error });
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sizewatch_core::{ChatConfig, EmailConfig};
    use std::sync::{Arc, Mutex};

    struct Recording {
        name: &'static str,
        sent: Arc<Mutex<Vec<String>>>,
        fail_with: Option<u16>,
    }

    #[async_trait]
    impl Transport for Recording {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
            self.sent.lock().unwrap().push(format!("{}:{}", self.name, notification.text));
            match self.fail_with {
                Some(status) => Err(NotifyError::ChatRejected { status }),
                None => Ok(()),
            }
        }
    }

    #[tokio::test]
    async fn test_dispatch_without_transports() {
        let notifier = Notifier::default();
        let report = notifier.dispatch(&Notification::plain("hello")).await;
        assert!(notifier.is_empty());
        assert!(report.is_ok());
        assert!(report.delivered.is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_attempts_all_after_failure() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let notifier = Notifier::new(vec![
            Box::new(Recording { name: "first", sent: Arc::clone(&sent), fail_with: Some(502) }),
            Box::new(Recording { name: "second", sent: Arc::clone(&sent), fail_with: None }),
            Box::new(Recording { name: "third", sent: Arc::clone(&sent), fail_with: Some(403) }),
        ]);

        let report = notifier.dispatch(&Notification::plain("hello")).await;

        assert_eq!(*sent.lock().unwrap(), vec!["first:hello", "second:hello", "third:hello"]);
        assert_eq!(report.delivered, vec!["second"]);
        assert!(!report.is_ok());
        assert_eq!(
            report.failure_summary(),
            "first: chat API returned status 502; third: chat API returned status 403"
        );
    }

    #[test]
    fn test_from_config_order_and_toggles() {
        let config = AppConfig {
            chat: ChatConfig {
                enabled: true,
                token: Some("123:abc".into()),
                chat_id: Some("42".into()),
                ..Default::default()
            },
            email: EmailConfig {
                enabled: true,
                host: Some("smtp.example.com".into()),
                user: Some("alerts@example.com".into()),
                password: Some("hunter2".into()),
                from: Some("alerts@example.com".into()),
                to: Some("me@example.com".into()),
                ..Default::default()
            },
            ..Default::default()
        };

        let notifier = Notifier::from_config(&config).unwrap();
        assert_eq!(notifier.transport_names(), vec!["chat", "email"]);

        let notifier = Notifier::from_config(&AppConfig::default()).unwrap();
        assert!(notifier.is_empty());
    }
}
