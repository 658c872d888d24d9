//! Terminal rendering of transcript messages and notifications.

use console::{Term, style};

use swasthya_types::chat::{ChatMessage, MessageRole};
use swasthya_types::notification::{Notification, NotificationLevel};

const INDENT: &str = "  ";
const MIN_WIDTH: usize = 40;

/// Print one transcript message with a role label.
pub fn print_message(message: &ChatMessage) {
    let label = match message.role {
        MessageRole::User => style("You").green().bold(),
        MessageRole::Assistant => style("Swasthya").cyan().bold(),
    };
    println!();
    println!("{INDENT}{label}");
    for line in wrap(&message.text, text_width()) {
        println!("{INDENT}{line}");
    }
}

/// Print a toast-style notification line.
pub fn print_notification(notification: &Notification) {
    let marker = match notification.level {
        NotificationLevel::Success => style("✓").green().bold(),
        NotificationLevel::Info => style("i").blue().bold(),
        NotificationLevel::Error => style("!").red().bold(),
    };
    println!("{INDENT}{marker} {}", notification.message);
}

fn text_width() -> usize {
    let (_, cols) = Term::stdout().size();
    (cols as usize).saturating_sub(INDENT.len() * 2).max(MIN_WIDTH)
}

/// Greedy word wrap. Counts chars, so Devanagari and Odia lines break
/// at roughly the right column; words longer than `width` stay whole.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_len = 0;
        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();
            if current_len > 0 && current_len + 1 + word_len > width {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.push_str(word);
            current_len += word_len;
        }
        lines.push(current);
    }
    lines
}
