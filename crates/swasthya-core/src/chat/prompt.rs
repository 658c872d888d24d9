//! Prompt assembly and request sanitising for reply generation.
//!
//! The generative endpoint takes one free-text prompt. It is assembled from
//! a fixed health-assistant instruction, the recent conversation and the
//! question being answered, using XML tags as section boundaries:
//!
//! ```text
//! <instructions>You are a helpful AI health assistant for rural India...</instructions>
//! <conversation>User: ...\nAssistant: ...</conversation>
//! <question>{latest user message}</question>
//! ```

use swasthya_types::chat::MessageRole;
use swasthya_types::config::ChatLimits;
use swasthya_types::generation::{ContextTurn, GenerationError, ReplyRequest};
use swasthya_types::language::Language;

/// The fixed instruction, localised only by the reply-language clause.
pub fn system_instruction(language: Language) -> String {
    format!(
        "You are a helpful AI health assistant for rural India. \
         Provide helpful health guidance in simple terms. \
         If it's an emergency, advise to contact the local ASHA worker or visit the nearest hospital. \
         Keep responses concise and culturally appropriate for the Indian rural context. \
         Always reply in {}.",
        language.name()
    )
}

/// Builds the single prompt string sent upstream.
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the prompt for a sanitised request.
    ///
    /// Everything except the last message goes into `<conversation>`; the
    /// last message is the question. The leading greeting is omitted from
    /// the conversation since it carries no information.
    pub fn build(request: &ReplyRequest) -> String {
        let mut sections = Vec::with_capacity(3);
        sections.push(format!(
            "<instructions>\n{}\n</instructions>",
            system_instruction(request.language)
        ));

        if let Some((question, history)) = request.messages.split_last() {
            let lines: Vec<String> = history
                .iter()
                .filter(|turn| turn.text != request.language.greeting())
                .map(render_turn)
                .collect();
            if !lines.is_empty() {
                sections.push(format!("<conversation>\n{}\n</conversation>", lines.join("\n")));
            }
            sections.push(format!("<question>\n{}\n</question>", question.text));
        }

        sections.join("\n\n")
    }
}

fn render_turn(turn: &ContextTurn) -> String {
    let speaker = match turn.role {
        MessageRole::User => "User",
        MessageRole::Assistant => "Assistant",
    };
    format!("{speaker}: {}", turn.text)
}

/// Validate and trim an incoming reply request.
///
/// Rejects requests with no messages or whose last message is not a
/// non-empty user message. Keeps at most `max_context_messages` of the most
/// recent messages and truncates each one to `max_message_chars`.
pub fn sanitize_request(
    request: ReplyRequest,
    limits: &ChatLimits,
) -> Result<ReplyRequest, GenerationError> {
    let Some(last) = request.messages.last() else {
        return Err(GenerationError::InvalidRequest(
            "messages must not be empty".to_string(),
        ));
    };
    if last.role != MessageRole::User {
        return Err(GenerationError::InvalidRequest(
            "last message must come from the user".to_string(),
        ));
    }
    if last.text.trim().is_empty() {
        return Err(GenerationError::InvalidRequest(
            "message text must not be empty".to_string(),
        ));
    }

    let keep = limits.max_context_messages.max(1);
    let start = request.messages.len().saturating_sub(keep);
    let messages = request.messages[start..]
        .iter()
        .map(|turn| ContextTurn {
            role: turn.role,
            text: truncate_chars(turn.text.trim(), limits.max_message_chars),
        })
        .collect();

    Ok(ReplyRequest {
        language: request.language,
        messages,
    })
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(role: MessageRole, text: &str) -> ContextTurn {
        ContextTurn {
            role,
            text: text.to_string(),
        }
    }

    fn limits(max_message_chars: usize, max_context_messages: usize) -> ChatLimits {
        ChatLimits {
            max_message_chars,
            max_context_messages,
        }
    }

    #[test]
    fn instruction_names_reply_language_and_asha_worker() {
        let text = system_instruction(Language::Odia);
        assert!(text.contains("reply in Odia"));
        assert!(text.contains("ASHA worker"));
        assert!(text.contains("concise"));
    }

    #[test]
    fn prompt_has_question_and_history_sections() {
        let request = ReplyRequest {
            language: Language::English,
            messages: vec![
                turn(MessageRole::Assistant, Language::English.greeting()),
                turn(MessageRole::User, "I have fever"),
                turn(MessageRole::Assistant, "How long?"),
                turn(MessageRole::User, "Two days"),
            ],
        };
        let prompt = PromptBuilder::build(&request);

        assert!(prompt.starts_with("<instructions>"));
        assert!(prompt.contains("<conversation>\nUser: I have fever\nAssistant: How long?\n</conversation>"));
        assert!(prompt.ends_with("<question>\nTwo days\n</question>"));
        assert!(!prompt.contains("Namaste!"));
    }

    #[test]
    fn prompt_without_history_skips_conversation_section() {
        let request = ReplyRequest {
            language: Language::Hindi,
            messages: vec![turn(MessageRole::User, "बुखार है")],
        };
        let prompt = PromptBuilder::build(&request);
        assert!(!prompt.contains("<conversation>"));
        assert!(prompt.contains("Always reply in Hindi."));
    }

    #[test]
    fn sanitize_rejects_empty_and_assistant_last() {
        let empty = ReplyRequest {
            language: Language::English,
            messages: vec![],
        };
        assert!(matches!(
            sanitize_request(empty, &ChatLimits::default()),
            Err(GenerationError::InvalidRequest(_))
        ));

        let assistant_last = ReplyRequest {
            language: Language::English,
            messages: vec![turn(MessageRole::Assistant, "hello")],
        };
        assert!(sanitize_request(assistant_last, &ChatLimits::default()).is_err());

        let blank = ReplyRequest {
            language: Language::English,
            messages: vec![turn(MessageRole::User, "   ")],
        };
        assert!(sanitize_request(blank, &ChatLimits::default()).is_err());
    }

    #[test]
    fn sanitize_keeps_recent_window_and_truncates() {
        let request = ReplyRequest {
            language: Language::English,
            messages: vec![
                turn(MessageRole::User, "first"),
                turn(MessageRole::Assistant, "second"),
                turn(MessageRole::User, "  third message is long  "),
            ],
        };
        let sanitized = sanitize_request(request, &limits(5, 2)).unwrap();
        let texts: Vec<_> = sanitized.messages.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["secon", "third"]);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("नमस्ते", 2), "नम");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
