//! [`TranscriptionClient`] trait and the HTTP implementation.
//!
//! The transcription service accepts a multipart upload (form field `audio`)
//! and answers with a JSON envelope `{ success, transcript?, error? }`.
//! Failures are reported in the body with a non-2xx status, so the client
//! parses the envelope regardless of status code.

use async_trait::async_trait;
use serde::Deserialize;

use crate::audio::{extension_for, AudioPayload};
use crate::config::AppConfig;

use super::error::ServiceError;

// ---------------------------------------------------------------------------
// TranscriptionClient trait
// ---------------------------------------------------------------------------

/// Stateless request/response adapter over the transcription service.
///
/// Implementors must be `Send + Sync` so they can be shared as
/// `Arc<dyn TranscriptionClient>`.  The payload is taken by value — it is
/// consumed exactly once.
#[async_trait]
pub trait TranscriptionClient: Send + Sync {
    async fn submit(&self, payload: AudioPayload) -> Result<String, ServiceError>;
}

// ---------------------------------------------------------------------------
// Wire envelope
// ---------------------------------------------------------------------------

/// Response body of the transcribe endpoint.
///
/// Contract: `success == false` implies `error` is present and `transcript`
/// absent.  A `success == true` body without a transcript violates the
/// contract and is reported as a parse failure.
#[derive(Debug, Deserialize)]
pub struct TranscribeEnvelope {
    pub success: bool,
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl TranscribeEnvelope {
    pub fn into_result(self) -> Result<String, ServiceError> {
        if self.success {
            self.transcript.ok_or_else(|| {
                ServiceError::Parse("success response carried no transcript".into())
            })
        } else {
            Err(ServiceError::Remote(self.error.unwrap_or_else(|| {
                "transcription service reported an unspecified error".into()
            })))
        }
    }
}

// ---------------------------------------------------------------------------
// HttpTranscriptionClient
// ---------------------------------------------------------------------------

/// Production transcription client over `reqwest`.
pub struct HttpTranscriptionClient {
    client: reqwest::Client,
    url: String,
}

impl HttpTranscriptionClient {
    /// Build a client from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.request_timeout_secs`.  A default (no-timeout) client is used
    /// as a last-resort fallback if the builder fails.
    pub fn from_config(config: &AppConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            url: config.transcribe_url.clone(),
        }
    }
}

#[async_trait]
impl TranscriptionClient for HttpTranscriptionClient {
    async fn submit(&self, payload: AudioPayload) -> Result<String, ServiceError> {
        let media_type = payload.media_type().to_string();
        // The service routes on the filename extension of the uploaded part.
        let file_name = format!("capture.{}", extension_for(&media_type));

        log::debug!(
            "submitting {} bytes ({media_type}) to {}",
            payload.len(),
            self.url
        );

        let part = reqwest::multipart::Part::bytes(payload.into_bytes())
            .file_name(file_name)
            .mime_str(&media_type)
            .map_err(|e| ServiceError::Request(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("audio", part);

        let response = self.client.post(&self.url).multipart(form).send().await?;

        let envelope: TranscribeEnvelope = response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))?;

        envelope.into_result()
    }
}

// ---------------------------------------------------------------------------
// MockTranscriptionClient (test double)
// ---------------------------------------------------------------------------

#[cfg(test)]
pub struct MockTranscriptionClient {
    response: Result<String, ServiceError>,
}

#[cfg(test)]
impl MockTranscriptionClient {
    pub fn ok(transcript: &str) -> Self {
        Self {
            response: Ok(transcript.to_string()),
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
impl TranscriptionClient for MockTranscriptionClient {
    async fn submit(&self, _payload: AudioPayload) -> Result<String, ServiceError> {
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
