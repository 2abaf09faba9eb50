//! SMTP e-mail transport.
//!
//! One connection per message: connect (implicit TLS or plaintext),
//! authenticate, send a single plain-text message, quit.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use sizewatch_core::EmailConfig;

use super::{Notification, NotifyError, Transport};

/// Sends notifications as e-mail through an SMTP relay.
#[derive(Clone)]
pub struct EmailTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
    subject: String,
}

impl std::fmt::Debug for EmailTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailTransport")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("subject", &self.subject)
            .finish_non_exhaustive()
    }
}

impl EmailTransport {
    pub fn from_config(config: &EmailConfig) -> Result<Self, NotifyError> {
        let host = config.host.as_deref().ok_or(NotifyError::MissingSetting("email.host"))?;
        let user = config.user.clone().ok_or(NotifyError::MissingSetting("email.user"))?;
        let password = config.password.clone().ok_or(NotifyError::MissingSetting("email.password"))?;
        let from: Mailbox = config.from.as_deref().ok_or(NotifyError::MissingSetting("email.from"))?.parse()?;
        let to: Mailbox = config.to.as_deref().ok_or(NotifyError::MissingSetting("email.to"))?.parse()?;

        let builder = if config.ssl {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
        };

        let mailer = builder.port(config.port).credentials(Credentials::new(user, password)).build();

        Ok(Self { mailer, from, to, subject: config.subject.clone() })
    }

    fn render(notification: &Notification) -> String {
        match &notification.link {
            Some(link) => format!("{}\nCheck the product page here: {}\n", notification.text, link),
            None => format!("{}\n", notification.text),
        }
    }

    fn build_message(&self, notification: &Notification) -> Result<Message, NotifyError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(self.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(Self::render(notification))?;
        Ok(message)
    }
}

#[async_trait]
impl Transport for EmailTransport {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let message = self.build_message(notification)?;
        let response = self.mailer.send(message).await?;
        tracing::debug!("smtp accepted message: {:?}", response.code());
        Ok(())
    }
}
