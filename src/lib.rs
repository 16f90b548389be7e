//! Voice Chat — client-side controller for a voice → transcription → chat
//! conversation with a remote AI assistant.
//!
//! # Architecture
//!
//! ```text
//! CaptureSession ─┐
//!                 ├─▶ InteractionController ─▶ TranscriptionClient
//! file adapter ───┘         │    ▲                  (remote)
//!                           │    └── transcript shown, user may edit
//!                           ▼
//!                      ChatClient (remote) ─▶ ConversationLog
//! ```
//!
//! The controller owns the full lifecycle of one voice interaction and is the
//! only component with cross-cutting invariants: exactly one interaction is in
//! flight at a time, transcription always completes before a chat submission,
//! and the capture device is released on every exit path.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use voice_chat::audio::{CaptureSession, CpalDevice};
//! use voice_chat::config::AppConfig;
//! use voice_chat::controller::{InteractionController, InteractionEvent};
//! use voice_chat::remote::{HttpChatClient, HttpTranscriptionClient};
//!
//! # async fn example() {
//! let config = AppConfig::default();
//! let session = CaptureSession::new(Arc::new(CpalDevice::new()));
//! let mut controller = InteractionController::new(
//!     session,
//!     Arc::new(HttpTranscriptionClient::from_config(&config)),
//!     Arc::new(HttpChatClient::from_config(&config)),
//! );
//!
//! controller.handle_event(InteractionEvent::StartCapture).await.unwrap();
//! // ... speak ...
//! controller.handle_event(InteractionEvent::StopCapture).await.unwrap();
//! # }
//! ```

pub mod audio;
pub mod config;
pub mod controller;
pub mod remote;
