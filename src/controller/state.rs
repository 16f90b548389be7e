//! [`InteractionState`] — the single enumerated state of one voice
//! interaction.
//!
//! The state machine transitions are:
//!
//! ```text
//! Idle ──start capture──▶ Capturing ──stop capture──▶ Transcribing
//!      ──file selected─────────────────────────────▶ Transcribing
//! Transcribing ──success──▶ TranscriptReady ──edit──▶ Editing ──save──▶ TranscriptReady
//!              ──failure──▶ Error                    TranscriptReady ──send──▶ Sending
//! Sending ──chat success──▶ Idle
//!         ──chat failure──▶ Error (transcript preserved)
//! Error ──acknowledged──▶ TranscriptReady (transcript held) | Idle
//! ```

// ---------------------------------------------------------------------------
// InteractionState
// ---------------------------------------------------------------------------

/// States of one voice interaction.  Exactly one interaction is in flight at
/// a time; any event not listed for the current state is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    /// No interaction in flight; start-capture and file-selection accepted.
    Idle,

    /// Microphone is active; chunks are accumulating in the capture session.
    Capturing,

    /// A payload has been submitted to the transcription service.
    Transcribing,

    /// A transcript is held and displayed; the user may edit or send it.
    TranscriptReady,

    /// The transcript is mutable; a save commits the edited text.
    Editing,

    /// The transcript has been submitted to the chat service.
    Sending,

    /// A remote failure is displayed; the user must acknowledge it before a
    /// new interaction may begin.
    Error,
}

impl InteractionState {
    /// Returns `true` while a remote request is pending.
    ///
    /// A presentation layer uses this to disable the capture and send
    /// controls while busy.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            InteractionState::Transcribing | InteractionState::Sending
        )
    }

    /// A short human-readable label suitable for a status line.
    pub fn label(&self) -> &'static str {
        match self {
            InteractionState::Idle => "Idle",
            InteractionState::Capturing => "Recording",
            InteractionState::Transcribing => "Transcribing",
            InteractionState::TranscriptReady => "Transcript ready",
            InteractionState::Editing => "Editing",
            InteractionState::Sending => "Waiting for reply",
            InteractionState::Error => "Error",
        }
    }
}

impl Default for InteractionState {
    fn default() -> Self {
        InteractionState::Idle
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
