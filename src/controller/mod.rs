//! Interaction controller — state machine, conversation log, shared view.
//!
//! [`InteractionController`] is the only component with cross-cutting
//! invariants: one interaction in flight at a time, transcription completes
//! before chat, errors surfaced before the next interaction, device released
//! on every exit path.

pub mod controller;
pub mod conversation;
pub mod state;

pub use controller::{
    InteractionController, InteractionEvent, Rejection, SharedView, ViewState,
};
pub use conversation::{ConversationLog, Message, Role};
pub use state::InteractionState;
