//! In-memory transcript of one chat session.

use swasthya_types::chat::ChatMessage;
use swasthya_types::generation::ContextTurn;
use swasthya_types::language::Language;

/// Ordered, append-only list of messages.
///
/// The only way to remove messages is [`Transcript::reset`], which replaces
/// everything with a single greeting.
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    /// A fresh transcript holding only the greeting for `language`.
    pub fn greeting(language: Language) -> Self {
        Self {
            messages: vec![ChatMessage::assistant(language.greeting())],
        }
    }

    pub fn reset(&mut self, language: Language) {
        self.messages.clear();
        self.messages.push(ChatMessage::assistant(language.greeting()));
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The most recent `max` messages as request context, oldest first.
    ///
    /// The leading greeting is kept only if it falls inside the window.
    pub fn context(&self, max: usize) -> Vec<ContextTurn> {
        let start = self.messages.len().saturating_sub(max);
        self.messages[start..].iter().map(ContextTurn::from).collect()
    }
}
