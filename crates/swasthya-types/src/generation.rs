//! Reply-generation request/response types.
//!
//! These are the shapes exchanged between the chat client and the trusted
//! gateway, and between the gateway and whichever generation backend it
//! forwards to. They never carry credentials.

use serde::{Deserialize, Serialize};

use crate::chat::{ChatMessage, MessageRole};
use crate::language::Language;

/// One turn of conversation context sent along with a reply request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextTurn {
    pub role: MessageRole,
    pub text: String,
}

impl From<&ChatMessage> for ContextTurn {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role,
            text: message.text.clone(),
        }
    }
}

/// A request for the assistant's next reply.
///
/// `messages` is the conversation so far, oldest first; the last entry is
/// the user message being answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyRequest {
    pub language: Language,
    pub messages: Vec<ContextTurn>,
}

impl ReplyRequest {
    /// The user message this request asks a reply for, if any.
    pub fn latest_user_text(&self) -> Option<&str> {
        self.messages
            .last()
            .filter(|turn| turn.role == MessageRole::User)
            .map(|turn| turn.text.as_str())
    }
}

/// The generated reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyResponse {
    pub reply: String,
    pub language: Language,
}

/// Errors from reply generation.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("upstream returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("response contained no reply text")]
    EmptyResponse,

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("not authorized to use the generation service")]
    Unauthorized,

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
