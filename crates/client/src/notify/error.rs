//! Notification transport error types.

use std::sync::Arc;

/// Errors from a notification transport.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// A transport was enabled without a required setting.
    #[error("missing setting: {0}")]
    MissingSetting(&'static str),

    /// The bot API endpoint could not be built.
    #[error("invalid chat API URL: {0}")]
    InvalidEndpoint(String),

    /// The bot API request did not complete.
    #[error("chat request failed: {0}")]
    Chat(#[source] Arc<reqwest::Error>),

    /// The bot API answered with a non-2xx status.
    #[error("chat API returned status {status}")]
    ChatRejected { status: u16 },

    /// Sender or recipient is not a valid mailbox.
    #[error("invalid email address: {0}")]
    InvalidAddress(#[from] lettre::address::AddressError),

    /// The message could not be assembled.
    #[error("email message build failed: {0}")]
    EmailBuild(#[from] lettre::error::Error),

    /// Connecting, authenticating or sending over SMTP failed.
    #[error("smtp error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

impl From<reqwest::Error> for NotifyError {
    /// The request URL carries the bot token, so it is stripped before the
    /// error can reach a log line.
    fn from(err: reqwest::Error) -> Self {
        NotifyError::Chat(Arc::new(err.without_url()))
    }
}
