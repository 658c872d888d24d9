//! Slash command parsing for the chat loop.

use console::style;

use swasthya_types::language::Language;

#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    /// Switch language; `None` lists the choices.
    Language(Option<Language>),
    /// Capture one utterance by voice.
    Voice,
    /// Send quick question `n` (1-based); `None` lists them.
    Quick(Option<usize>),
    History,
    /// Restart the conversation.
    Clear,
    Exit,
    /// Unknown command or bad argument, with a message to show.
    Invalid(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (cmd, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd.to_lowercase(), Some(arg.trim()).filter(|a| !a.is_empty())),
        None => (trimmed.to_lowercase(), None),
    };

    let command = match cmd.as_str() {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/lang" | "/language" => match arg.map(str::parse::<Language>) {
            None => ChatCommand::Language(None),
            Some(Ok(language)) => ChatCommand::Language(Some(language)),
            Some(Err(e)) => ChatCommand::Invalid(e),
        },
        "/voice" | "/mic" => ChatCommand::Voice,
        "/quick" | "/q" => match arg.map(str::parse::<usize>) {
            None => ChatCommand::Quick(None),
            Some(Ok(n)) if n >= 1 => ChatCommand::Quick(Some(n)),
            Some(_) => ChatCommand::Invalid("/quick expects a question number".to_string()),
        },
        "/history" => ChatCommand::History,
        "/clear" | "/new" => ChatCommand::Clear,
        "/exit" | "/quit" => ChatCommand::Exit,
        other => ChatCommand::Invalid(format!("Unknown command: {other}")),
    };
    Some(command)
}

pub fn print_help() {
    let rows = [
        ("/help", "Show this help message"),
        ("/lang <code>", "Switch language (en, hi, or) and restart"),
        ("/voice", "Speak your question"),
        ("/quick [n]", "List common questions, or ask number n"),
        ("/history", "Show the conversation so far"),
        ("/clear", "Start the conversation over"),
        ("/exit", "End the chat session"),
    ];

    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    for (command, help) in rows {
        println!("  {:<14} {}", style(command).cyan(), help);
    }
    println!();
    println!("  {}", style("Ctrl+D to exit").dim());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_not_a_command() {
        assert_eq!(parse("I have fever"), None);
        assert_eq!(parse("  "), None);
    }

    #[test]
    fn test_parse_lang() {
        assert_eq!(parse("/lang hi"), Some(ChatCommand::Language(Some(Language::Hindi))));
        assert_eq!(parse("/LANG Odia"), Some(ChatCommand::Language(Some(Language::Odia))));
        assert_eq!(parse("/lang"), Some(ChatCommand::Language(None)));
        assert!(matches!(parse("/lang fr"), Some(ChatCommand::Invalid(_))));
    }

    #[test]
    fn test_parse_quick() {
        assert_eq!(parse("/quick"), Some(ChatCommand::Quick(None)));
        assert_eq!(parse("/quick 3"), Some(ChatCommand::Quick(Some(3))));
        assert!(matches!(parse("/quick 0"), Some(ChatCommand::Invalid(_))));
        assert!(matches!(parse("/quick two"), Some(ChatCommand::Invalid(_))));
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(parse("/h"), Some(ChatCommand::Help));
        assert_eq!(parse("/mic"), Some(ChatCommand::Voice));
        assert_eq!(parse("/new"), Some(ChatCommand::Clear));
        assert_eq!(parse("/quit"), Some(ChatCommand::Exit));
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            parse("/remember x"),
            Some(ChatCommand::Invalid("Unknown command: /remember".to_string()))
        );
    }
}
