//! Chat assistant: the state machine behind one chat session.
//!
//! Owns the transcript, the active language, the outgoing draft and the
//! input phase. Reply generation and voice capture are the only suspension
//! points; both are guarded so that the phase returns to `Idle` on every
//! path, including cancellation of the calling future.
//!
//! Phase transitions:
//! ```text
//! Idle -> Sending -> Idle      (send_message)
//! Idle -> Listening -> Idle    (start_voice_capture)
//! ```
//! Each phase rejects entry into the other.
//!
//! A language change or [`ChatAssistant::close`] bumps the session epoch.
//! A reply that resolves under an older epoch is dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures_util::StreamExt;
use swasthya_types::chat::{AssistantPhase, ChatMessage};
use swasthya_types::config::ClientConfig;
use swasthya_types::event::ChatEvent;
use swasthya_types::generation::{GenerationError, ReplyRequest};
use swasthya_types::language::Language;
use swasthya_types::notification::Notification;
use swasthya_types::speech::RecognitionEvent;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::chat::transcript::Transcript;
use crate::event::bus::EventBus;
use crate::generation::box_generator::BoxReplyGenerator;
use crate::generation::service::ReplyService;
use crate::speech::{SpeechRecognizer, VoiceError};

const DEFAULT_MAX_CONTEXT_MESSAGES: usize = 20;

/// Construction options for a [`ChatAssistant`].
#[derive(Debug, Clone)]
pub struct AssistantOptions {
    pub language: Language,
    pub request_timeout: Duration,
    pub max_context_messages: usize,
}

impl Default for AssistantOptions {
    fn default() -> Self {
        Self {
            language: Language::default(),
            request_timeout: Duration::from_secs(30),
            max_context_messages: DEFAULT_MAX_CONTEXT_MESSAGES,
        }
    }
}

impl From<&ClientConfig> for AssistantOptions {
    fn from(config: &ClientConfig) -> Self {
        Self {
            language: config.default_language,
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            max_context_messages: DEFAULT_MAX_CONTEXT_MESSAGES,
        }
    }
}

/// What a call to [`ChatAssistant::send_message`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// The input was blank. Nothing was appended and no call was made.
    Empty,
    /// Another operation held the session. Nothing was appended.
    Busy(AssistantPhase),
    /// The generator's reply was appended.
    Replied(ChatMessage),
    /// Generation failed and the localized fallback was appended.
    Fallback(ChatMessage),
    /// The session moved on before the reply arrived; it was dropped.
    Discarded,
}

impl SendOutcome {
    /// The assistant message appended by this send, if any.
    pub fn reply(&self) -> Option<&ChatMessage> {
        match self {
            SendOutcome::Replied(m) | SendOutcome::Fallback(m) => Some(m),
            _ => None,
        }
    }
}

struct SessionState {
    language: Language,
    transcript: Transcript,
    phase: AssistantPhase,
    epoch: u64,
    draft: String,
}

/// One chat session.
///
/// All methods take `&self`; share the assistant behind an `Arc` to drive
/// it from several tasks. The internal lock is never held across an await.
pub struct ChatAssistant {
    replies: ReplyService,
    recognizer: Arc<dyn SpeechRecognizer>,
    events: EventBus,
    state: Mutex<SessionState>,
    max_context_messages: usize,
}

impl ChatAssistant {
    pub fn new(
        generator: BoxReplyGenerator,
        recognizer: Arc<dyn SpeechRecognizer>,
        options: AssistantOptions,
    ) -> Self {
        Self {
            replies: ReplyService::new(generator, options.request_timeout),
            recognizer,
            events: EventBus::default(),
            state: Mutex::new(SessionState {
                language: options.language,
                transcript: Transcript::greeting(options.language),
                phase: AssistantPhase::Idle,
                epoch: 0,
                draft: String::new(),
            }),
            max_context_messages: options.max_context_messages.max(1),
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // --- Observers ---

    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.events.subscribe()
    }

    pub fn language(&self) -> Language {
        self.state().language
    }

    pub fn phase(&self) -> AssistantPhase {
        self.state().phase
    }

    pub fn is_sending(&self) -> bool {
        self.phase() == AssistantPhase::Sending
    }

    pub fn is_listening(&self) -> bool {
        self.phase() == AssistantPhase::Listening
    }

    /// Snapshot of the transcript, oldest first.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.state().transcript.messages().to_vec()
    }

    pub fn message_count(&self) -> usize {
        self.state().transcript.messages().len()
    }

    pub fn placeholder(&self) -> &'static str {
        self.language().placeholder()
    }

    pub fn speech_locale(&self) -> &'static str {
        self.language().speech_locale()
    }

    pub fn quick_questions(&self) -> &'static [&'static str] {
        self.language().quick_questions()
    }

    pub fn generator_name(&self) -> &str {
        self.replies.generator_name()
    }

    // --- Draft ---

    pub fn draft(&self) -> String {
        self.state().draft.clone()
    }

    pub fn set_draft(&self, text: impl Into<String>) {
        let text = text.into();
        self.state().draft = text.clone();
        self.events.publish(ChatEvent::DraftChanged { text });
    }

    /// Send whatever is in the draft, clearing it if the send is accepted.
    pub async fn send_draft(&self) -> SendOutcome {
        let draft = self.draft();
        let outcome = self.send_message(&draft).await;
        if !matches!(outcome, SendOutcome::Empty | SendOutcome::Busy(_)) {
            let mut state = self.state();
            if state.draft == draft {
                state.draft.clear();
            }
        }
        outcome
    }

    // --- Operations ---

    /// Append a user message and request the assistant's reply.
    ///
    /// Blank input is ignored. A send while another send is outstanding, or
    /// while listening, is rejected without calling the generator. Every
    /// generator failure is absorbed here: the localized fallback is
    /// appended and an error notification is published.
    pub async fn send_message(&self, text: &str) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Empty;
        }

        let (request, epoch, user_message) = {
            let mut state = self.state();
            if state.phase != AssistantPhase::Idle {
                debug!(phase = %state.phase, "send rejected, session busy");
                return SendOutcome::Busy(state.phase);
            }
            let message = ChatMessage::user(text);
            state.transcript.push(message.clone());
            state.phase = AssistantPhase::Sending;
            let request = ReplyRequest {
                language: state.language,
                messages: state.transcript.context(self.max_context_messages),
            };
            (request, state.epoch, message)
        };

        self.events.publish(ChatEvent::MessageAppended {
            message: user_message,
        });
        self.events.publish(ChatEvent::TypingChanged { typing: true });

        let guard = SendingGuard {
            assistant: self,
            epoch,
        };

        let result = self.replies.reply(&request).await;

        let appended = {
            let mut state = self.state();
            if state.epoch != epoch {
                None
            } else {
                let (message, failure) = match result {
                    Ok(text) => (ChatMessage::assistant(text), None),
                    Err(err) => (
                        ChatMessage::assistant(state.language.fallback_reply()),
                        Some(err),
                    ),
                };
                state.transcript.push(message.clone());
                Some((message, failure))
            }
        };
        drop(guard);

        let Some((message, failure)) = appended else {
            debug!(epoch, "reply arrived after the session moved on, dropping it");
            return SendOutcome::Discarded;
        };

        self.events.publish(ChatEvent::MessageAppended {
            message: message.clone(),
        });

        match failure {
            None => SendOutcome::Replied(message),
            Some(err) => {
                warn!(
                    error = %err,
                    language = %request.language,
                    generator = self.replies.generator_name(),
                    "reply generation failed, showing fallback"
                );
                self.notify(Notification::error(failure_message(&err)));
                SendOutcome::Fallback(message)
            }
        }
    }

    /// Switch language and restart the conversation in it.
    ///
    /// The transcript becomes the new language's greeting. A pending reply
    /// is abandoned and the sending phase cleared at once; an active voice
    /// capture is left running.
    pub fn set_language(&self, language: Language) {
        let was_sending = {
            let mut state = self.state();
            state.epoch += 1;
            state.language = language;
            state.transcript.reset(language);
            let was_sending = state.phase == AssistantPhase::Sending;
            if was_sending {
                state.phase = AssistantPhase::Idle;
            }
            was_sending
        };

        info!(language = %language, "chat language changed");
        if was_sending {
            self.events.publish(ChatEvent::TypingChanged { typing: false });
        }
        self.events.publish(ChatEvent::TranscriptReset { language });
    }

    /// Restart the conversation in the current language.
    pub fn clear(&self) {
        let language = self.language();
        self.set_language(language);
    }

    /// Tear the session down. Any reply still in flight will be dropped.
    pub fn close(&self) {
        let was_sending = {
            let mut state = self.state();
            state.epoch += 1;
            let was_sending = state.phase == AssistantPhase::Sending;
            if was_sending {
                state.phase = AssistantPhase::Idle;
            }
            was_sending
        };
        if was_sending {
            self.events.publish(ChatEvent::TypingChanged { typing: false });
        }
        debug!("chat session closed");
    }

    /// Capture one utterance from the recognizer into the draft.
    ///
    /// Returns the recognized text, `Ok(None)` when the capture ended with
    /// nothing recognized, or the reason it could not run. Invoking it
    /// while listening or sending leaves the session untouched.
    pub async fn start_voice_capture(&self) -> Result<Option<String>, VoiceError> {
        if !self.recognizer.is_available() {
            self.notify(Notification::error(
                "Voice input is not supported on this device.",
            ));
            return Err(VoiceError::Unavailable);
        }

        let locale = {
            let mut state = self.state();
            if state.phase != AssistantPhase::Idle {
                debug!(phase = %state.phase, "voice capture ignored, session busy");
                return Err(VoiceError::Busy(state.phase));
            }
            state.phase = AssistantPhase::Listening;
            state.language.speech_locale()
        };
        self.events
            .publish(ChatEvent::ListeningChanged { listening: true });
        let _guard = ListeningGuard { assistant: self };

        let mut stream = match self.recognizer.start(locale) {
            Ok(stream) => stream,
            Err(err) => {
                warn!(error = %err, locale, "failed to start speech recognizer");
                self.notify(Notification::error(
                    "Could not start voice input. Please try again.",
                ));
                return Err(err);
            }
        };

        while let Some(event) = stream.next().await {
            match event {
                RecognitionEvent::Started => {
                    self.notify(Notification::success("Listening... Speak now"));
                }
                RecognitionEvent::Result { transcript } => {
                    let transcript = transcript.trim().to_string();
                    if transcript.is_empty() {
                        continue;
                    }
                    debug!(locale, chars = transcript.chars().count(), "speech recognized");
                    self.set_draft(transcript.clone());
                    return Ok(Some(transcript));
                }
                RecognitionEvent::Error { error } => {
                    warn!(error = %error, locale, "speech recognition failed");
                    self.notify(Notification::error(error.user_message()));
                    return Err(VoiceError::Recognition(error));
                }
                RecognitionEvent::Ended => break,
            }
        }
        Ok(None)
    }

    fn notify(&self, notification: Notification) {
        self.events.publish(ChatEvent::Notify { notification });
    }
}

impl std::fmt::Debug for ChatAssistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("ChatAssistant")
            .field("generator", &self.replies.generator_name())
            .field("language", &state.language)
            .field("phase", &state.phase)
            .field("messages", &state.transcript.messages().len())
            .finish()
    }
}

fn failure_message(err: &GenerationError) -> &'static str {
    match err {
        GenerationError::Timeout(_) => "The health assistant took too long to respond.",
        GenerationError::Unauthorized => "Your session has expired. Please log in again.",
        _ => "Could not reach the health assistant. Please try again.",
    }
}

/// Returns the session to `Idle` when a send finishes or is cancelled,
/// unless the epoch has moved on.
struct SendingGuard<'a> {
    assistant: &'a ChatAssistant,
    epoch: u64,
}

impl Drop for SendingGuard<'_> {
    fn drop(&mut self) {
        let cleared = {
            let mut state = self.assistant.state();
            if state.epoch == self.epoch && state.phase == AssistantPhase::Sending {
                state.phase = AssistantPhase::Idle;
                true
            } else {
                false
            }
        };
        if cleared {
            self.assistant
                .events
                .publish(ChatEvent::TypingChanged { typing: false });
        }
    }
}

struct ListeningGuard<'a> {
    assistant: &'a ChatAssistant,
}

impl Drop for ListeningGuard<'_> {
    fn drop(&mut self) {
        let cleared = {
            let mut state = self.assistant.state();
            if state.phase == AssistantPhase::Listening {
                state.phase = AssistantPhase::Idle;
                true
            } else {
                false
            }
        };
        if cleared {
            self.assistant
                .events
                .publish(ChatEvent::ListeningChanged { listening: false });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::provider::ReplyGenerator;
    use crate::speech::{RecognitionStream, UnavailableRecognizer};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use swasthya_types::chat::MessageRole;
    use swasthya_types::speech::RecognitionError;
    use tokio::sync::Notify;

    /// Replies with a fixed text and counts calls.
    #[derive(Clone)]
    struct CountingGenerator {
        reply: Result<&'static str, ()>,
        calls: Arc<AtomicUsize>,
        gate: Option<Arc<Notify>>,
    }

    impl CountingGenerator {
        fn ok(reply: &'static str) -> Self {
            Self {
                reply: Ok(reply),
                calls: Arc::new(AtomicUsize::new(0)),
                gate: None,
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(()),
                calls: Arc::new(AtomicUsize::new(0)),
                gate: None,
            }
        }

        fn gated(reply: &'static str, gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::ok(reply)
            }
        }
    }

    impl ReplyGenerator for CountingGenerator {
        fn name(&self) -> &str {
            "counting"
        }

        async fn generate(&self, _request: &ReplyRequest) -> Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            match self.reply {
                Ok(text) => Ok(text.to_string()),
                Err(()) => Err(GenerationError::Transport("connection refused".into())),
            }
        }
    }

    struct Never;

    impl ReplyGenerator for Never {
        fn name(&self) -> &str {
            "never"
        }

        async fn generate(&self, _request: &ReplyRequest) -> Result<String, GenerationError> {
            std::future::pending().await
        }
    }

    /// Replays a fixed list of recognition events.
    struct ScriptedRecognizer(Vec<RecognitionEvent>);

    impl SpeechRecognizer for ScriptedRecognizer {
        fn is_available(&self) -> bool {
            true
        }

        fn start(&self, _locale: &str) -> Result<RecognitionStream, VoiceError> {
            Ok(futures_util::stream::iter(self.0.clone()).boxed())
        }
    }

    /// Starts a capture that never produces an event.
    struct SilentRecognizer;

    impl SpeechRecognizer for SilentRecognizer {
        fn is_available(&self) -> bool {
            true
        }

        fn start(&self, _locale: &str) -> Result<RecognitionStream, VoiceError> {
            Ok(futures_util::stream::pending::<RecognitionEvent>().boxed())
        }
    }

    /// Available, but the microphone cannot be opened.
    struct BrokenRecognizer;

    impl SpeechRecognizer for BrokenRecognizer {
        fn is_available(&self) -> bool {
            true
        }

        fn start(&self, _locale: &str) -> Result<RecognitionStream, VoiceError> {
            Err(VoiceError::StartFailed("device busy".into()))
        }
    }

    fn assistant_with<G: ReplyGenerator + 'static>(generator: G) -> ChatAssistant {
        ChatAssistant::new(
            BoxReplyGenerator::new(generator),
            Arc::new(UnavailableRecognizer),
            AssistantOptions::default(),
        )
    }

    fn assistant_with_recognizer(events: Vec<RecognitionEvent>) -> ChatAssistant {
        ChatAssistant::new(
            BoxReplyGenerator::new(CountingGenerator::ok("ok")),
            Arc::new(ScriptedRecognizer(events)),
            AssistantOptions::default(),
        )
    }

    fn drain(rx: &mut broadcast::Receiver<ChatEvent>) -> Vec<ChatEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn error_notifications(events: &[ChatEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match e {
                ChatEvent::Notify { notification } if notification.is_error() => {
                    Some(notification.message.clone())
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn new_session_starts_with_greeting() {
        let assistant = assistant_with(CountingGenerator::ok("ok"));
        let messages = assistant.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, Language::English.greeting());
        assert_eq!(assistant.phase(), AssistantPhase::Idle);
    }

    #[test]
    fn set_language_resets_to_single_greeting_for_every_language() {
        let assistant = assistant_with(CountingGenerator::ok("ok"));
        for language in Language::ALL {
            assistant.set_language(language);
            let messages = assistant.messages();
            assert_eq!(messages.len(), 1);
            assert_eq!(messages[0].role, MessageRole::Assistant);
            assert_eq!(messages[0].text, language.greeting());
            assert_eq!(assistant.speech_locale(), language.speech_locale());
            assert_eq!(assistant.placeholder(), language.placeholder());
        }
    }

    #[tokio::test]
    async fn successful_send_appends_reply_text_exactly() {
        let assistant = assistant_with(CountingGenerator::ok("Please rest and drink fluids."));

        let outcome = assistant.send_message("I have fever").await;

        assert!(matches!(outcome, SendOutcome::Replied(_)));
        let messages = assistant.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, MessageRole::User);
        assert_eq!(messages[1].text, "I have fever");
        assert_eq!(messages[2].role, MessageRole::Assistant);
        assert_eq!(messages[2].text, "Please rest and drink fluids.");
        assert!(!assistant.is_sending());
    }

    #[tokio::test]
    async fn failing_generator_appends_fallback_and_notifies() {
        let assistant = assistant_with(CountingGenerator::failing());
        let mut rx = assistant.subscribe();
        let before = assistant.message_count();

        let outcome = assistant.send_message("I have fever").await;

        assert!(matches!(outcome, SendOutcome::Fallback(_)));
        let messages = assistant.messages();
        assert_eq!(messages.len(), before + 2);
        assert_eq!(messages[before].text, "I have fever");
        assert_eq!(messages[before + 1].text, Language::English.fallback_reply());
        assert!(!assistant.is_sending());

        let events = drain(&mut rx);
        assert_eq!(error_notifications(&events).len(), 1);
        assert!(events.contains(&ChatEvent::TypingChanged { typing: true }));
        assert!(events.contains(&ChatEvent::TypingChanged { typing: false }));
    }

    #[tokio::test]
    async fn fallback_follows_active_language() {
        let assistant = assistant_with(CountingGenerator::failing());
        assistant.set_language(Language::Odia);

        let outcome = assistant.send_message("ଜ୍ୱର ହେଉଛି").await;

        assert_eq!(
            outcome.reply().map(|m| m.text.as_str()),
            Some(Language::Odia.fallback_reply())
        );
    }

    #[tokio::test]
    async fn blank_input_is_a_no_op() {
        let generator = CountingGenerator::ok("ok");
        let calls = generator.calls.clone();
        let assistant = assistant_with(generator);
        let mut rx = assistant.subscribe();

        assert_eq!(assistant.send_message("").await, SendOutcome::Empty);
        assert_eq!(assistant.send_message("   ").await, SendOutcome::Empty);

        assert_eq!(assistant.message_count(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn concurrent_sends_issue_exactly_one_call() {
        let gate = Arc::new(Notify::new());
        let generator = CountingGenerator::gated("ok", gate.clone());
        let calls = generator.calls.clone();
        let assistant = assistant_with(generator);

        let first = assistant.send_message("first");
        let second = async {
            tokio::task::yield_now().await;
            let outcome = assistant.send_message("second").await;
            gate.notify_one();
            outcome
        };
        let (first, second) = tokio::join!(first, second);

        assert!(matches!(first, SendOutcome::Replied(_)));
        assert_eq!(second, SendOutcome::Busy(AssistantPhase::Sending));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(assistant.message_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_degrades_to_fallback() {
        let assistant = assistant_with(Never);
        let mut rx = assistant.subscribe();

        let outcome = assistant.send_message("hello").await;

        assert!(matches!(outcome, SendOutcome::Fallback(_)));
        assert!(!assistant.is_sending());
        let notices = error_notifications(&drain(&mut rx));
        assert_eq!(notices, vec!["The health assistant took too long to respond."]);
    }

    #[tokio::test]
    async fn language_change_discards_pending_reply() {
        let gate = Arc::new(Notify::new());
        let assistant = assistant_with(CountingGenerator::gated("late reply", gate.clone()));

        let send = assistant.send_message("I have fever");
        let switch = async {
            tokio::task::yield_now().await;
            assert!(assistant.is_sending());
            assistant.set_language(Language::Hindi);
            assert!(!assistant.is_sending());
            gate.notify_one();
        };
        let (outcome, ()) = tokio::join!(send, switch);

        assert_eq!(outcome, SendOutcome::Discarded);
        let messages = assistant.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, Language::Hindi.greeting());
        assert_eq!(assistant.phase(), AssistantPhase::Idle);
    }

    #[tokio::test]
    async fn cancelled_send_returns_to_idle() {
        let assistant = assistant_with(Never);
        {
            let send = assistant.send_message("hello");
            tokio::pin!(send);
            let polled = tokio::time::timeout(Duration::from_millis(10), &mut send).await;
            assert!(polled.is_err());
            assert!(assistant.is_sending());
        }
        assert!(!assistant.is_sending());
        assert_eq!(assistant.message_count(), 2);
    }

    #[tokio::test]
    async fn voice_capture_without_capability_notifies_and_stays_idle() {
        let assistant = assistant_with(CountingGenerator::ok("ok"));
        let mut rx = assistant.subscribe();

        let result = assistant.start_voice_capture().await;

        assert!(matches!(result, Err(VoiceError::Unavailable)));
        assert_eq!(assistant.phase(), AssistantPhase::Idle);
        let events = drain(&mut rx);
        assert_eq!(
            error_notifications(&events),
            vec!["Voice input is not supported on this device."]
        );
        assert!(!events
            .iter()
            .any(|e| matches!(e, ChatEvent::ListeningChanged { .. })));
    }

    #[tokio::test]
    async fn recognized_utterance_fills_draft() {
        let assistant = assistant_with_recognizer(vec![
            RecognitionEvent::Started,
            RecognitionEvent::Result {
                transcript: "मुझे बुखार है".to_string(),
            },
            RecognitionEvent::Ended,
        ]);
        let mut rx = assistant.subscribe();

        let result = assistant.start_voice_capture().await.unwrap();

        assert_eq!(result.as_deref(), Some("मुझे बुखार है"));
        assert_eq!(assistant.draft(), "मुझे बुखार है");
        assert_eq!(assistant.phase(), AssistantPhase::Idle);
        let events = drain(&mut rx);
        assert_eq!(
            events.first(),
            Some(&ChatEvent::ListeningChanged { listening: true })
        );
        assert_eq!(
            events.last(),
            Some(&ChatEvent::ListeningChanged { listening: false })
        );
    }

    #[tokio::test]
    async fn recognition_errors_produce_distinct_notifications() {
        let mut seen = Vec::new();
        for error in [
            RecognitionError::NoSpeech,
            RecognitionError::PermissionDenied,
            RecognitionError::Other("network".into()),
        ] {
            let assistant = assistant_with_recognizer(vec![
                RecognitionEvent::Started,
                RecognitionEvent::Error { error },
                RecognitionEvent::Ended,
            ]);
            let mut rx = assistant.subscribe();

            let result = assistant.start_voice_capture().await;

            assert!(matches!(result, Err(VoiceError::Recognition(_))));
            assert_eq!(assistant.phase(), AssistantPhase::Idle);
            seen.extend(error_notifications(&drain(&mut rx)));
        }
        assert_eq!(seen.len(), 3);
        seen.dedup();
        assert_eq!(seen.len(), 3);
    }

    #[tokio::test]
    async fn capture_that_ends_silently_returns_none() {
        let assistant = assistant_with_recognizer(vec![
            RecognitionEvent::Started,
            RecognitionEvent::Ended,
        ]);
        assert_eq!(assistant.start_voice_capture().await.unwrap(), None);
        assert_eq!(assistant.draft(), "");
        assert_eq!(assistant.phase(), AssistantPhase::Idle);
    }

    #[tokio::test]
    async fn send_draft_clears_draft_after_send() {
        let assistant = assistant_with(CountingGenerator::ok("ok"));
        assistant.set_draft("What is ABHA number?");

        let outcome = assistant.send_draft().await;

        assert!(matches!(outcome, SendOutcome::Replied(_)));
        assert_eq!(assistant.draft(), "");
        assert_eq!(assistant.messages()[1].text, "What is ABHA number?");
    }

    #[tokio::test]
    async fn close_drops_in_flight_reply() {
        let gate = Arc::new(Notify::new());
        let assistant = assistant_with(CountingGenerator::gated("late", gate.clone()));

        let send = assistant.send_message("hello");
        let teardown = async {
            tokio::task::yield_now().await;
            assistant.close();
            gate.notify_one();
        };
        let (outcome, ()) = tokio::join!(send, teardown);

        assert_eq!(outcome, SendOutcome::Discarded);
        assert_eq!(assistant.message_count(), 2);
        assert!(!assistant.is_sending());
    }

    #[tokio::test]
    async fn listening_session_rejects_second_capture_and_sends() {
        let generator = CountingGenerator::ok("ok");
        let calls = generator.calls.clone();
        let assistant = ChatAssistant::new(
            BoxReplyGenerator::new(generator),
            Arc::new(SilentRecognizer),
            AssistantOptions::default(),
        );
        {
            let capture = assistant.start_voice_capture();
            tokio::pin!(capture);
            let polled = tokio::time::timeout(Duration::from_millis(10), &mut capture).await;
            assert!(polled.is_err());
            assert_eq!(assistant.phase(), AssistantPhase::Listening);

            let second = assistant.start_voice_capture().await;
            assert!(matches!(
                second,
                Err(VoiceError::Busy(AssistantPhase::Listening))
            ));

            let outcome = assistant.send_message("I have fever").await;
            assert_eq!(outcome, SendOutcome::Busy(AssistantPhase::Listening));
            assert_eq!(assistant.message_count(), 1);
            assert_eq!(calls.load(Ordering::SeqCst), 0);
            assert_eq!(assistant.phase(), AssistantPhase::Listening);
        }
        assert_eq!(assistant.phase(), AssistantPhase::Idle);
    }

    #[tokio::test]
    async fn recognizer_start_failure_notifies_and_returns_to_idle() {
        let assistant = ChatAssistant::new(
            BoxReplyGenerator::new(CountingGenerator::ok("ok")),
            Arc::new(BrokenRecognizer),
            AssistantOptions::default(),
        );
        let mut rx = assistant.subscribe();

        let result = assistant.start_voice_capture().await;

        assert!(matches!(result, Err(VoiceError::StartFailed(_))));
        assert_eq!(assistant.phase(), AssistantPhase::Idle);
        assert_eq!(
            error_notifications(&drain(&mut rx)),
            vec!["Could not start voice input. Please try again."]
        );
    }
}
