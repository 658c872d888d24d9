//! Async line input for the chat loop.

use console::style;
use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

use swasthya_types::language::Language;

#[derive(Debug)]
pub enum InputEvent {
    /// A submitted line, trimmed.
    Line(String),
    /// Ctrl+D.
    Eof,
    /// Ctrl+C.
    Interrupted,
}

pub struct ChatInput {
    rl: Readline,
    // Readline stops when every writer is gone.
    _writer: SharedWriter,
}

impl ChatInput {
    pub fn new(language: Language) -> Result<Self, ReadlineError> {
        let (rl, writer) = Readline::new(prompt_for(language))?;
        Ok(Self {
            rl,
            _writer: writer,
        })
    }

    /// Show the active language in the prompt.
    pub fn set_language(&mut self, language: Language) {
        let _ = self.rl.update_prompt(&prompt_for(language));
    }

    pub async fn read_line(&mut self) -> InputEvent {
        match self.rl.readline().await {
            Ok(ReadlineEvent::Line(line)) => {
                let line = line.trim().to_string();
                if !line.is_empty() {
                    self.rl.add_history_entry(line.clone());
                }
                InputEvent::Line(line)
            }
            Ok(ReadlineEvent::Eof) => InputEvent::Eof,
            Ok(ReadlineEvent::Interrupted) => InputEvent::Interrupted,
            Err(e) => {
                tracing::debug!(error = %e, "readline failed, treating as EOF");
                InputEvent::Eof
            }
        }
    }

    pub fn clear_screen(&mut self) {
        let _ = self.rl.clear();
    }

    /// Restore the terminal. Call before the process prints its last lines.
    pub fn finish(&mut self) {
        let _ = self.rl.flush();
    }
}

fn prompt_for(language: Language) -> String {
    format!(
        "  {} {} ",
        style(format!("You [{}]", language.code())).green().bold(),
        style(">").dim()
    )
}
