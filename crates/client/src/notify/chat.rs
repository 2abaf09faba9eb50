//! Chat-bot transport.
//!
//! - **Endpoint**: `GET {api_base}/bot{token}/sendMessage`
//! - **Query**: `chat_id`, `text`, `disable_web_page_preview=true` and, for
//!   markdown notifications, `parse_mode=Markdown`; all URL-encoded.
//! - The response body is not inspected, only the status.

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use sizewatch_core::ChatConfig;

use super::{Notification, NotifyError, Transport};

/// Sends notifications through a bot `sendMessage` API.
#[derive(Debug, Clone)]
pub struct ChatTransport {
    http: Client,
    endpoint: Url,
    chat_id: String,
}

impl ChatTransport {
    pub fn new(api_base: &str, token: &str, chat_id: impl Into<String>) -> Result<Self, NotifyError> {
        let endpoint = Url::parse(&format!("{}/bot{}/sendMessage", api_base.trim_end_matches('/'), token))
            .map_err(|e| NotifyError::InvalidEndpoint(format!("{api_base}: {e}")))?;

        let http = Client::builder().use_rustls_tls().build()?;

        Ok(Self { http, endpoint, chat_id: chat_id.into() })
    }

    pub fn from_config(config: &ChatConfig) -> Result<Self, NotifyError> {
        let token = config.token.as_deref().ok_or(NotifyError::MissingSetting("chat.token"))?;
        let chat_id = config.chat_id.as_deref().ok_or(NotifyError::MissingSetting("chat.chat_id"))?;
        Self::new(&config.api_base, token, chat_id)
    }

    /// Message text with the product link rendered for the bot API.
    fn render(notification: &Notification) -> String {
        match (&notification.link, notification.markdown) {
            (Some(link), true) => format!("{}\n[Check the product page here]({})", notification.text, link),
            (Some(link), false) => format!("{}\nCheck the product page here: {}", notification.text, link),
            (None, _) => notification.text.clone(),
        }
    }
}

#[async_trait]
impl Transport for ChatTransport {
    fn name(&self) -> &'static str {
        "chat"
    }

    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let text = Self::render(notification);
        let mut query = vec![
            ("chat_id", self.chat_id.as_str()),
            ("text", text.as_str()),
            ("disable_web_page_preview", "true"),
        ];
        if notification.markdown {
            query.push(("parse_mode", "Markdown"));
        }

        let response = self.http.get(self.endpoint.clone()).query(&query).send().await?;

        let status = response.status();
        tracing::debug!("chat API response status: {}", status);

        if !status.is_success() {
            return Err(NotifyError::ChatRejected { status: status.as_u16() });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_endpoint_includes_token() {
        let transport = ChatTransport::new("https://api.telegram.org/", "123:abc", "42").unwrap();
        assert_eq!(transport.endpoint.as_str(), "https://api.telegram.org/bot123:abc/sendMessage");
    }

    #[test]
    fn test_from_config_requires_token() {
        let config = ChatConfig { enabled: true, chat_id: Some("42".into()), ..Default::default() };
        let result = ChatTransport::from_config(&config);
        assert!(matches!(result, Err(NotifyError::MissingSetting("chat.token"))));
    }

    #[test]
    fn test_render_link() {
        let link = Url::parse("https://shop.example/bike").unwrap();
        let md = Notification::markdown("changed").with_link(link.clone());
        assert_eq!(ChatTransport::render(&md), "changed\n[Check the product page here](https://shop.example/bike)");

        let plain = Notification::plain("changed").with_link(link);
        assert_eq!(ChatTransport::render(&plain), "changed\nCheck the product page here: https://shop.example/bike");
    }

    #[tokio::test]
    async fn test_send_markdown_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/botTEST-TOKEN/sendMessage"))
            .and(query_param("chat_id", "42"))
            .and(query_param("text", "*Stock* & more"))
            .and(query_param("disable_web_page_preview", "true"))
            .and(query_param("parse_mode", "Markdown"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
            .expect(1)
            .mount(&server)
            .await;

        let transport = ChatTransport::new(&server.uri(), "TEST-TOKEN", "42").unwrap();
        transport.send(&Notification::markdown("*Stock* & more")).await.unwrap();
    }

    #[tokio::test]
    async fn test_send_plain_message_has_no_parse_mode() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/botTEST-TOKEN/sendMessage"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let transport = ChatTransport::new(&server.uri(), "TEST-TOKEN", "42").unwrap();
        transport.send(&Notification::plain("hello")).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].url.query_pairs().any(|(k, _)| k == "parse_mode"));
    }

    #[tokio::test]
    async fn test_send_rejected_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"ok":false}"#))
            .mount(&server)
            .await;

        let transport = ChatTransport::new(&server.uri(), "bad", "42").unwrap();
        let result = transport.send(&Notification::plain("hello")).await;
        assert!(matches!(result, Err(NotifyError::ChatRejected { status: 401 })));
    }

    #[tokio::test]
    async fn test_send_network_error_hides_token() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let transport = ChatTransport::new(&format!("http://127.0.0.1:{port}"), "SECRET-TOKEN", "42").unwrap();
        let err = transport.send(&Notification::plain("hello")).await.unwrap_err();

        assert!(matches!(err, NotifyError::Chat(_)));
        let chain = sizewatch_core::error_chain(&err);
        assert!(chain.to_lowercase().contains("connection refused"), "{chain}");
        assert!(!chain.contains("SECRET-TOKEN"));
    }
}
