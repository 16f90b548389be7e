//! [`ChatClient`] trait and the HTTP implementation.
//!
//! The chat service accepts JSON `{ "message": … }` and answers with
//! `{ success, response?, error? }` under the same success/error exclusivity
//! rule as the transcription envelope.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::AppConfig;

use super::error::ServiceError;

// ---------------------------------------------------------------------------
// ChatClient trait
// ---------------------------------------------------------------------------

/// Stateless request/response adapter over the chat service.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn submit(&self, message: &str) -> Result<String, ServiceError>;
}

// ---------------------------------------------------------------------------
// Wire envelope
// ---------------------------------------------------------------------------

/// Response body of the chat endpoint.
#[derive(Debug, Deserialize)]
pub struct ChatEnvelope {
    pub success: bool,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ChatEnvelope {
    pub fn into_result(self) -> Result<String, ServiceError> {
        if self.success {
            self.response
                .ok_or_else(|| ServiceError::Parse("success response carried no reply".into()))
        } else {
            Err(ServiceError::Remote(self.error.unwrap_or_else(|| {
                "chat service reported an unspecified error".into()
            })))
        }
    }
}

// ---------------------------------------------------------------------------
// HttpChatClient
// ---------------------------------------------------------------------------

/// Production chat client over `reqwest`.
pub struct HttpChatClient {
    client: reqwest::Client,
    url: String,
}

impl HttpChatClient {
    /// Build a client from application config, sharing the same timeout
    /// policy as the transcription client.
    pub fn from_config(config: &AppConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            url: config.chat_url.clone(),
        }
    }
}

#[async_trait]
impl ChatClient for HttpChatClient {
    async fn submit(&self, message: &str) -> Result<String, ServiceError> {
        log::debug!("submitting chat message ({} chars) to {}", message.len(), self.url);

        let body = serde_json::json!({ "message": message });

        let response = self.client.post(&self.url).json(&body).send().await?;

        let envelope: ChatEnvelope = response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))?;

        envelope.into_result()
    }
}

// ---------------------------------------------------------------------------
// MockChatClient (test double)
// ---------------------------------------------------------------------------

#[cfg(test)]
pub struct MockChatClient {
    response: Result<String, ServiceError>,
}

#[cfg(test)]
impl MockChatClient {
    pub fn ok(reply: &str) -> Self {
        Self {
            response: Ok(reply.to_string()),
        }
    }

    pub fn err(message: &str) -> Self {
        Self {
            response: Err(ServiceError::Remote(message.to_string())),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl ChatClient for MockChatClient {
    async fn submit(&self, _message: &str) -> Result<String, ServiceError> {
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
