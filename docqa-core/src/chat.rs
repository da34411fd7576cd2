//! Ordered, append-only conversation log.
//!
//! Messages are never reordered or edited, with one exception: a `Thinking`
//! placeholder is swapped in place for the final answer (or error) exactly
//! once. Ids are never reused, not even across [`ChatLog::clear`], so a late
//! answer can never resolve a placeholder that belongs to a newer question.

/// Text shown in the placeholder while an answer is pending.
pub const THINKING_TEXT: &str = "Thinking...";

/// Stable identifier of a message within a [`ChatLog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Ai,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Normal,
    /// Placeholder awaiting an answer.
    Thinking,
    /// An answer that failed; `text` is the user-facing error.
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub sender: Sender,
    pub text: String,
    /// Number of retrieved snippets the backend used, when it reported any.
    pub context_used: Option<u32>,
    pub kind: MessageKind,
}

impl ChatMessage {
    pub fn is_placeholder(&self) -> bool {
        self.kind == MessageKind::Thinking
    }
}

/// Final content for a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Answer { text: String, context_used: u32 },
    Failed(String),
}

#[derive(Debug, Default, Clone)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of placeholders still waiting for an answer.
    pub fn pending(&self) -> usize {
        self.messages.iter().filter(|m| m.is_placeholder()).count()
    }

    pub fn get(&self, id: MessageId) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    fn push(&mut self, sender: Sender, text: String, kind: MessageKind) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.messages.push(ChatMessage { id, sender, text, context_used: None, kind });
        id
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> MessageId {
        self.push(Sender::User, text.into(), MessageKind::Normal)
    }

    pub fn push_thinking(&mut self) -> MessageId {
        self.push(Sender::Ai, THINKING_TEXT.to_owned(), MessageKind::Thinking)
    }

    /// Replaces placeholder `id` with its final content.
    ///
    /// Returns `false` (and changes nothing) when `id` is unknown or was
    /// already resolved.
    pub fn resolve(&mut self, id: MessageId, resolution: Resolution) -> bool {
        let Some(msg) = self.messages.iter_mut().find(|m| m.id == id && m.is_placeholder()) else {
            return false;
        };
        match resolution {
            Resolution::Answer { text, context_used } => {
                msg.text = text;
                msg.context_used = (context_used > 0).then_some(context_used);
                msg.kind = MessageKind::Normal;
            }
            Resolution::Failed(text) => {
                msg.text = text;
                msg.kind = MessageKind::Error;
            }
        }
        true
    }

    /// Empties the log. Ids keep counting up.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
