//! Conversation history owned by a single [`Agent`](crate::agent::Agent).
//!
//! The log only grows by whole messages. The one exception is [`Conversation::clear`],
//! which discards everything at once. Every mutation bumps [`Conversation::version`],
//! so a caller holding an old version can tell the history moved underneath it.

use crate::message::Message;

/// Ordered, append-only message log.
#[derive(Debug, Default, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
    version: u64,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fully formed message.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
        self.version += 1;
    }

    /// Read-only view of the history, oldest first.
    pub fn snapshot(&self) -> &[Message] {
        &self.messages
    }

    /// Discards all messages.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.version += 1;
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of mutations applied since creation.
    pub fn version(&self) -> u64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{ContentBlock, Role};

    #[test]
    fn append_preserves_order_and_bumps_version() {
        let mut convo = Conversation::new();
        convo.append(Message::user("one"));
        convo.append(Message::assistant(vec![ContentBlock::text("two")]));

        assert_eq!(convo.len(), 2);
        assert_eq!(convo.version(), 2);
        assert_eq!(convo.snapshot()[0].role, Role::User);
        assert_eq!(convo.snapshot()[1].text(), "two");
        assert_eq!(convo.last().map(|m| m.role), Some(Role::Assistant));
    }

    #[test]
    fn clear_empties_any_history() {
        let mut convo = Conversation::new();
        convo.clear();
        assert!(convo.snapshot().is_empty());

        for i in 0..5 {
            convo.append(Message::user(format!("msg {i}")));
        }
        let before = convo.version();
        convo.clear();

        assert!(convo.is_empty());
        assert!(convo.snapshot().is_empty());
        assert!(convo.version() > before);
    }
}
