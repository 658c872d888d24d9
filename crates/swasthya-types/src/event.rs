//! Events emitted by a chat session for whatever renders it.
//!
//! The assistant publishes one event per observable state change, so a
//! front end can redraw incrementally instead of polling.

use serde::{Deserialize, Serialize};

use crate::chat::ChatMessage;
use crate::language::Language;
use crate::notification::Notification;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// A message was appended to the transcript.
    MessageAppended { message: ChatMessage },

    /// The "typing" indicator turned on or off.
    TypingChanged { typing: bool },

    /// Voice capture started or stopped.
    ListeningChanged { listening: bool },

    /// The outgoing draft was replaced (e.g. by a voice transcript).
    DraftChanged { text: String },

    /// The transcript was reset to a single greeting in `language`.
    TranscriptReset { language: Language },

    /// Something the user should see as a toast.
    Notify { notification: Notification },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_event_tagging() {
        let event = ChatEvent::TypingChanged { typing: true };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"typing_changed","typing":true}"#);
    }

    #[test]
    fn test_chat_event_roundtrip() {
        let event = ChatEvent::Notify {
            notification: Notification::error("offline"),
        };
        let json = serde_json::to_string(&event).unwrap();
        let parsed: ChatEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }
}
