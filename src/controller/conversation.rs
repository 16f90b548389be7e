//! [`ConversationLog`] — append-only ordered record of exchanged messages.
//!
//! The log is owned exclusively by the interaction controller and left
//! append-only for auditability.  Remote failures are recorded with their own
//! [`Role::SystemError`] rather than masquerading as assistant messages, so
//! error reporting stays distinguishable from the conversation itself.

// ---------------------------------------------------------------------------
// Role / Message
// ---------------------------------------------------------------------------

/// Author of a conversation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The human speaker — a sent transcript.
    User,
    /// The remote assistant's reply.
    Assistant,
    /// A surfaced remote failure; never silently dropped.
    SystemError,
}

impl Role {
    /// Display prefix for a rendered conversation.
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "Assistant",
            Role::SystemError => "Error",
        }
    }
}

/// One immutable conversation entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// ConversationLog
// ---------------------------------------------------------------------------

/// Insertion-ordered, append-only sequence of [`Message`]s, unbounded for
/// the session lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationLog {
    messages: Vec<Message>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message.  There is deliberately no removal or mutation API.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_insertion_order() {
        let mut log = ConversationLog::new();
        log.append(Message::new(Role::User, "hello"));
        log.append(Message::new(Role::Assistant, "hi"));
        log.append(Message::new(Role::SystemError, "rate limited"));

        let roles: Vec<Role> = log.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::SystemError]);
        assert_eq!(log.len(), 3);
        assert_eq!(log.last().unwrap().content, "rate limited");
    }

    #[test]
    fn new_log_is_empty() {
        let log = ConversationLog::new();
        assert!(log.is_empty());
        assert!(log.last().is_none());
    }

    #[test]
    fn role_labels_are_distinct() {
        assert_ne!(Role::User.label(), Role::Assistant.label());
        assert_ne!(Role::Assistant.label(), Role::SystemError.label());
    }
}
