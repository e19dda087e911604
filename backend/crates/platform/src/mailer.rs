//! Outbound Mail Delivery
//!
//! The domain crates dispatch one-time passcodes through the [`Mailer`]
//! trait. The production implementation posts to a transactional-mail
//! HTTP API with a bounded timeout; a failed or slow dispatch surfaces
//! as [`MailerError`] instead of hanging the request.

use serde::Serialize;
use std::time::Duration;

/// A single outbound message
#[derive(Debug, Clone, Serialize)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Mail delivery failure
#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("Mail delivery failed: {0}")]
    Delivery(String),

    #[error("Mail delivery timed out")]
    Timeout,
}

/// Trait for mail delivery backends
#[trait_variant::make(Mailer: Send)]
pub trait LocalMailer {
    /// Deliver a message, returning once the provider accepted it
    async fn send(&self, message: MailMessage) -> Result<(), MailerError>;
}

/// Configuration for the HTTP mail delivery API
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// Provider endpoint accepting a JSON message payload
    pub api_url: String,
    /// Bearer credential for the provider
    pub api_key: String,
    /// Sender address
    pub from: String,
    /// Upper bound on a single dispatch round trip
    pub timeout: Duration,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            api_key: String::new(),
            from: "no-reply@localhost".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Mailer backed by a transactional-mail HTTP API
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    config: MailerConfig,
}

impl HttpMailer {
    pub fn new(config: MailerConfig) -> Result<Self, MailerError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MailerError::Delivery(e.to_string()))?;

        Ok(Self { client, config })
    }
}

#[derive(Serialize)]
struct ApiPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

impl Mailer for HttpMailer {
    async fn send(&self, message: MailMessage) -> Result<(), MailerError> {
        let payload = ApiPayload {
            from: &self.config.from,
            to: &message.to,
            subject: &message.subject,
            text: &message.body,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MailerError::Timeout
                } else {
                    MailerError::Delivery(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(MailerError::Delivery(format!(
                "provider returned {}",
                response.status()
            )));
        }

        tracing::debug!(to = %message.to, "Mail accepted by provider");

        Ok(())
    }
}

/// Mailer that only logs, for development and tests
#[derive(Debug, Clone, Default)]
pub struct NoopMailer;

impl Mailer for NoopMailer {
    async fn send(&self, message: MailMessage) -> Result<(), MailerError> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            "NoopMailer: dropping message"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_mailer_accepts_everything() {
        let mailer = NoopMailer;
        let result = Mailer::send(
            &mailer,
            MailMessage {
                to: "tipster@example.com".to_string(),
                subject: "Your login code".to_string(),
                body: "123456".to_string(),
            },
        )
        .await;
        assert!(result.is_ok());
    }

    #[test]
    fn test_mailer_config_default_timeout_is_bounded() {
        let config = MailerConfig::default();
        assert!(config.timeout <= Duration::from_secs(30));
    }
}
