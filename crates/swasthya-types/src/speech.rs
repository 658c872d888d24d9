//! Speech-recognition events and failure categories.
//!
//! A recognizer emits discrete events rather than blocking: it starts,
//! optionally produces one recognized utterance or one error, then ends.

use serde::{Deserialize, Serialize};

/// Why a recognition attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RecognitionError {
    /// The microphone was open but nothing intelligible was heard.
    #[error("no speech detected")]
    NoSpeech,

    /// The user or the platform refused microphone access.
    #[error("microphone permission denied")]
    PermissionDenied,

    /// Any other recognizer failure.
    #[error("recognition failed: {0}")]
    Other(String),
}

impl RecognitionError {
    /// Text shown to the user for this failure category.
    pub fn user_message(&self) -> &'static str {
        match self {
            RecognitionError::NoSpeech => "No speech was detected. Please try again.",
            RecognitionError::PermissionDenied => {
                "Microphone access was denied. Please allow microphone access and try again."
            }
            RecognitionError::Other(_) => "Could not recognize speech. Please try again.",
        }
    }
}

/// An event emitted by a speech recognizer during one capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecognitionEvent {
    /// The microphone is live.
    Started,
    /// A final transcription of the user's utterance.
    Result { transcript: String },
    /// Recognition failed.
    Error { error: RecognitionError },
    /// The capture is over (always the last event).
    Ended,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_failure_category_has_distinct_message() {
        let messages = [
            RecognitionError::NoSpeech.user_message(),
            RecognitionError::PermissionDenied.user_message(),
            RecognitionError::Other("network".into()).user_message(),
        ];
        assert_ne!(messages[0], messages[1]);
        assert_ne!(messages[1], messages[2]);
        assert_ne!(messages[0], messages[2]);
    }

    #[test]
    fn test_event_serde_tagging() {
        let event = RecognitionEvent::Result {
            transcript: "I have fever".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"result\""));
        assert!(json.contains("I have fever"));
    }
}
