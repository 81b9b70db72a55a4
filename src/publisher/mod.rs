//! Webhook publisher
//!
//! Delivers the formatted report to a chat webhook. The ledger update
//! and the notification are independent, sequential effects: a publish
//! failure is reported to the operator but never rolls back the ledger
//! write.

use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info};

/// Publish error types
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),
}

pub type PublishResult<T> = Result<T, PublishError>;

/// Outbound message delivery.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn send(&self, message: &str) -> PublishResult<()>;
}

/// A webhook URL treated as an opaque secret.
///
/// Never logged or echoed in full; `Debug` and `Display` redact it.
#[derive(Clone)]
pub struct WebhookUrl(String);

impl WebhookUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for WebhookUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WebhookUrl(***redacted***)")
    }
}

/// Posts the report as a Discord-style `content` payload.
pub struct DiscordPublisher {
    client: Client,
    url: WebhookUrl,
}

impl DiscordPublisher {
    pub fn new(url: WebhookUrl) -> Self {
        Self {
            client: Client::new(),
            url,
        }
    }
}

#[async_trait]
impl Publisher for DiscordPublisher {
    async fn send(&self, message: &str) -> PublishResult<()> {
        debug!("posting report to webhook");
        self.client
            .post(self.url.as_str())
            .json(&serde_json::json!({ "content": message }))
            .send()
            .await?
            .error_for_status()?;
        info!("report delivered to webhook");
        Ok(())
    }
}

/// Publisher that swallows messages; used when no webhook is configured.
pub struct NullPublisher;

#[async_trait]
impl Publisher for NullPublisher {
    async fn send(&self, _message: &str) -> PublishResult<()> {
        info!("no webhook configured, skipping notification");
        Ok(())
    }
}

/// Capturing publisher for tests.
#[derive(Default)]
pub struct MemoryPublisher {
    pub sent: Mutex<Vec<String>>,
    /// When true, every send fails.
    pub fail: bool,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.sent.lock().expect("publisher mutex poisoned").clone()
    }
}

#[async_trait]
impl Publisher for MemoryPublisher {
    async fn send(&self, message: &str) -> PublishResult<()> {
        if self.fail {
            // Surface the same error shape a dead webhook would.
            let err = reqwest::Client::new()
                .get("http://")
                .build()
                .expect_err("url without a host must not build");
            return Err(PublishError::Http(err));
        }
        self.sent
            .lock()
            .expect("publisher mutex poisoned")
            .push(message.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_url_debug_is_redacted() {
        let url = WebhookUrl::new("https://discord.com/api/webhooks/123/secret-token");
        let rendered = format!("{:?}", url);
        assert!(!rendered.contains("secret-token"));
        assert!(!rendered.contains("123"));
        assert!(rendered.contains("redacted"));
    }

    #[tokio::test]
    async fn test_memory_publisher_captures_messages() {
        let publisher = MemoryPublisher::new();
        publisher.send("hello").await.unwrap();
        publisher.send("world").await.unwrap();
        assert_eq!(publisher.messages(), vec!["hello", "world"]);
    }

    #[tokio::test]
    async fn test_failing_memory_publisher_errors() {
        let publisher = MemoryPublisher {
            fail: true,
            ..Default::default()
        };
        assert!(publisher.send("hello").await.is_err());
    }
}
