//! Speech-recognition port.
//!
//! The chat assistant never talks to a microphone directly. It is handed a
//! [`SpeechRecognizer`] which either reports itself unavailable or, once
//! started, yields a stream of [`RecognitionEvent`] values ending in
//! [`RecognitionEvent::Ended`].

use futures_util::stream::BoxStream;
use swasthya_types::chat::AssistantPhase;
use swasthya_types::speech::{RecognitionError, RecognitionEvent};

/// Events produced by one capture.
pub type RecognitionStream = BoxStream<'static, RecognitionEvent>;

/// Errors from starting or running a voice capture.
#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    #[error("speech recognition is not available on this device")]
    Unavailable,

    #[error("cannot start voice capture while {0}")]
    Busy(AssistantPhase),

    #[error("failed to start recognizer: {0}")]
    StartFailed(String),

    #[error(transparent)]
    Recognition(#[from] RecognitionError),
}

/// A platform speech-recognition capability.
///
/// Object safe so a chat session can hold `Arc<dyn SpeechRecognizer>` and
/// swap implementations at runtime.
pub trait SpeechRecognizer: Send + Sync {
    /// Whether this platform can recognise speech at all.
    fn is_available(&self) -> bool;

    /// Begin one capture in the given locale (e.g. `hi-IN`).
    fn start(&self, locale: &str) -> Result<RecognitionStream, VoiceError>;
}

/// Recognizer for platforms without a microphone pipeline, such as a
/// terminal session.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableRecognizer;

impl SpeechRecognizer for UnavailableRecognizer {
    fn is_available(&self) -> bool {
        false
    }

    fn start(&self, _locale: &str) -> Result<RecognitionStream, VoiceError> {
        Err(VoiceError::Unavailable)
    }
}
