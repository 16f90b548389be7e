//! Remote service adapters — transcription and chat.
//!
//! Both clients are stateless: one `submit` call, one result.  Failures carry
//! a human-readable message in [`ServiceError`] and are never retried here;
//! retry is a user decision made through the controller.

pub mod chat;
pub mod error;
pub mod transcribe;

pub use chat::{ChatClient, ChatEnvelope, HttpChatClient};
pub use error::ServiceError;
pub use transcribe::{HttpTranscriptionClient, TranscribeEnvelope, TranscriptionClient};

// test-only re-exports for the controller test module.
#[cfg(test)]
pub use chat::MockChatClient;
#[cfg(test)]
pub use transcribe::MockTranscriptionClient;
