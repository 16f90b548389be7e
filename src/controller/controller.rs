//! [`InteractionController`] — the interaction state machine.
//!
//! The controller owns the current [`InteractionState`], the transcript of
//! the in-flight interaction, and the [`ConversationLog`].  It is driven by
//! [`InteractionEvent`]s, either directly through
//! [`handle_event`](InteractionController::handle_event) or via a
//! `tokio::sync::mpsc` channel with [`run`](InteractionController::run).
//!
//! # Event flow
//!
//! ```text
//! StartCapture      └─▶ CaptureSession::begin()              [Capturing]
//! StopCapture       └─▶ end() → TranscriptionClient::submit  [Transcribing]
//! FileSelected      └─▶ file payload → submit                [Transcribing]
//!   ├─ Ok  → transcript stored and displayed                 [TranscriptReady]
//!   └─ Err → system-error message appended                   [Error]
//! EditRequested / SaveTranscript — edit loop on the transcript
//! Send              └─▶ user message → ChatClient::submit    [Sending]
//!   ├─ Ok  → assistant message, transcript cleared           [Idle]
//!   └─ Err → system-error message, transcript preserved      [Error]
//! AcknowledgeError  └─▶ TranscriptReady (transcript held) or Idle
//! ```
//!
//! Invalid events are rejected: logged at `warn` by the event loop, state
//! unchanged, reported to direct callers as a [`Rejection`].  Local
//! precondition failures (device unavailable, no file selected, empty
//! transcript) are rejections too; only remote failures reach the `Error`
//! state.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::sync::mpsc;

use crate::audio::{payload_from_file, AudioPayload, CaptureError, CaptureSession, PayloadError};
use crate::remote::{ChatClient, TranscriptionClient};

use super::conversation::{ConversationLog, Message, Role};
use super::state::InteractionState;

// ---------------------------------------------------------------------------
// InteractionEvent
// ---------------------------------------------------------------------------

/// External events that drive the state machine: user actions plus the file
/// selection result.  Remote completions are not events — the controller
/// awaits its own submissions.
#[derive(Debug)]
pub enum InteractionEvent {
    /// Begin a microphone capture (valid from `Idle`).
    StartCapture,
    /// Stop the capture and submit the payload (valid from `Capturing`).
    StopCapture,
    /// A file picker yielded zero or one file (valid from `Idle`).
    FileSelected(Option<PathBuf>),
    /// Make the displayed transcript mutable (valid from `TranscriptReady`).
    EditRequested,
    /// Commit edited transcript text (valid from `Editing`).
    SaveTranscript(String),
    /// Submit the transcript to the chat service (valid from `TranscriptReady`).
    Send,
    /// Dismiss a displayed error (valid from `Error`).
    AcknowledgeError,
}

impl InteractionEvent {
    pub fn label(&self) -> &'static str {
        match self {
            InteractionEvent::StartCapture => "start capture",
            InteractionEvent::StopCapture => "stop capture",
            InteractionEvent::FileSelected(_) => "file selected",
            InteractionEvent::EditRequested => "edit requested",
            InteractionEvent::SaveTranscript(_) => "save transcript",
            InteractionEvent::Send => "send",
            InteractionEvent::AcknowledgeError => "acknowledge error",
        }
    }
}

// ---------------------------------------------------------------------------
// Rejection
// ---------------------------------------------------------------------------

/// A rejected event.  The state machine is unchanged (or back at `Idle` for
/// a failed capture stop); nothing was appended to the conversation log.
#[derive(Debug, Error)]
pub enum Rejection {
    /// The event is not listed for the current state.
    #[error("{event} is not valid while in state {state}")]
    InvalidEvent {
        event: &'static str,
        state: &'static str,
    },

    /// `send` was requested with an empty or whitespace-only transcript.
    #[error("transcript is empty")]
    EmptyTranscript,

    /// A capture precondition failed (device unavailable, not recording).
    #[error(transparent)]
    Capture(#[from] CaptureError),

    /// A file payload precondition failed (no selection, unreadable file).
    #[error(transparent)]
    Payload(#[from] PayloadError),
}

// ---------------------------------------------------------------------------
// ViewState / SharedView
// ---------------------------------------------------------------------------

/// Everything a presentation layer needs: current state, the pending
/// transcript (present means the transcript panel is shown), the displayed
/// error, and the conversation log.
///
/// Mutated only by the controller; a UI reads snapshots.
#[derive(Debug, Default)]
pub struct ViewState {
    pub state: InteractionState,
    pub transcript: Option<String>,
    pub error_message: Option<String>,
    pub log: ConversationLog,
}

/// Thread-safe handle to [`ViewState`].  Cheap to clone; lock for short
/// critical sections only and never across `.await` points.
pub type SharedView = Arc<Mutex<ViewState>>;

// ---------------------------------------------------------------------------
// InteractionController
// ---------------------------------------------------------------------------

/// Drives one voice interaction at a time: capture → transcribe → edit →
/// chat → conversation log.
pub struct InteractionController {
    view: SharedView,
    capture: CaptureSession,
    transcriber: Arc<dyn TranscriptionClient>,
    chat: Arc<dyn ChatClient>,
}

impl InteractionController {
    pub fn new(
        capture: CaptureSession,
        transcriber: Arc<dyn TranscriptionClient>,
        chat: Arc<dyn ChatClient>,
    ) -> Self {
        Self {
            view: Arc::new(Mutex::new(ViewState::default())),
            capture,
            transcriber,
            chat,
        }
    }

    /// Shared handle for observers (UI, tests).
    pub fn view(&self) -> SharedView {
        Arc::clone(&self.view)
    }

    // -----------------------------------------------------------------------
    // Event loop
    // -----------------------------------------------------------------------

    /// Process events until `event_rx` is closed.
    ///
    /// Spawn as a tokio task.  Rejected events are logged and dropped; on
    /// shutdown any active capture is aborted so the device is released even
    /// without a clean stop.
    pub async fn run(mut self, mut event_rx: mpsc::Receiver<InteractionEvent>) {
        while let Some(event) = event_rx.recv().await {
            if let Err(rejection) = self.handle_event(event).await {
                log::warn!("controller: event rejected: {rejection}");
            }
        }

        self.capture.abort();
        log::info!("controller: event channel closed, shutting down");
    }

    /// Apply one event to the state machine.
    ///
    /// Suspends only while a remote submission is pending; the view lock is
    /// never held across an `.await`.
    pub async fn handle_event(&mut self, event: InteractionEvent) -> Result<(), Rejection> {
        let state = self.state();
        log::debug!("controller: {} in state {}", event.label(), state.label());

        match (state, event) {
            (InteractionState::Idle, InteractionEvent::StartCapture) => {
                self.capture.begin()?;
                self.set_state(InteractionState::Capturing);
                Ok(())
            }

            (InteractionState::Idle, InteractionEvent::FileSelected(selection)) => {
                let payload = payload_from_file(selection.as_deref())?;
                self.transcribe(payload).await;
                Ok(())
            }

            (InteractionState::Capturing, InteractionEvent::StopCapture) => {
                match self.capture.end() {
                    Ok(payload) => {
                        self.transcribe(payload).await;
                        Ok(())
                    }
                    Err(e) => {
                        // The device is already released; the interaction is
                        // over without a payload.
                        self.set_state(InteractionState::Idle);
                        Err(e.into())
                    }
                }
            }

            (InteractionState::TranscriptReady, InteractionEvent::EditRequested) => {
                self.set_state(InteractionState::Editing);
                Ok(())
            }

            (InteractionState::Editing, InteractionEvent::SaveTranscript(text)) => {
                let mut view = self.view.lock().unwrap();
                view.transcript = Some(text);
                view.state = InteractionState::TranscriptReady;
                Ok(())
            }

            (InteractionState::TranscriptReady, InteractionEvent::Send) => self.send().await,

            (InteractionState::Error, InteractionEvent::AcknowledgeError) => {
                let mut view = self.view.lock().unwrap();
                view.error_message = None;
                // A transcript preserved across a chat failure stays
                // re-sendable; otherwise the interaction is over.
                view.state = if view.transcript.is_some() {
                    InteractionState::TranscriptReady
                } else {
                    InteractionState::Idle
                };
                Ok(())
            }

            (state, event) => Err(Rejection::InvalidEvent {
                event: event.label(),
                state: state.label(),
            }),
        }
    }

    // -----------------------------------------------------------------------
    // Stage handlers
    // -----------------------------------------------------------------------

    /// Submit a payload for transcription and store the result.
    async fn transcribe(&mut self, payload: AudioPayload) {
        self.set_state(InteractionState::Transcribing);

        match self.transcriber.submit(payload).await {
            Ok(text) => {
                log::debug!("controller: transcript received ({} chars)", text.len());
                let mut view = self.view.lock().unwrap();
                view.transcript = Some(text);
                view.state = InteractionState::TranscriptReady;
            }
            Err(e) => self.fail(format!("Transcription failed: {e}")),
        }
    }

    /// Submit the transcript to the chat service and record the exchange.
    async fn send(&mut self) -> Result<(), Rejection> {
        let transcript = {
            let view = self.view.lock().unwrap();
            view.transcript.clone().unwrap_or_default()
        };

        // The transcript is never sent empty.
        if transcript.trim().is_empty() {
            return Err(Rejection::EmptyTranscript);
        }

        {
            let mut view = self.view.lock().unwrap();
            view.log.append(Message::new(Role::User, transcript.clone()));
            view.state = InteractionState::Sending;
        }

        match self.chat.submit(&transcript).await {
            Ok(reply) => {
                let mut view = self.view.lock().unwrap();
                view.log.append(Message::new(Role::Assistant, reply));
                view.transcript = None; // interaction complete, panel hidden
                view.state = InteractionState::Idle;
            }
            // Transcript preserved so the user may retry after acknowledging.
            Err(e) => self.fail(format!("Chat request failed: {e}")),
        }

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn state(&self) -> InteractionState {
        self.view.lock().unwrap().state
    }

    fn set_state(&self, state: InteractionState) {
        self.view.lock().unwrap().state = state;
    }

    /// Surface a remote failure: append a system-error message, display it,
    /// and enter `Error` until acknowledged.
    fn fail(&self, message: String) {
        log::error!("controller: {message}");
        let mut view = self.view.lock().unwrap();
        view.log.append(Message::new(Role::SystemError, message.clone()));
        view.error_message = Some(message);
        view.state = InteractionState::Error;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
