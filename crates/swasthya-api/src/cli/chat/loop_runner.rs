//! Main chat loop orchestration.
//!
//! Wires a [`ChatAssistant`] to the gateway, prints the banner and greeting,
//! then reads lines until EOF or `/exit`. Slash commands map onto assistant
//! operations; everything else is sent as a user message.

use std::sync::Arc;
use std::time::Duration;

use console::style;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::{debug, warn};

use swasthya_core::auth::store::SessionStore;
use swasthya_core::chat::assistant::{AssistantOptions, ChatAssistant, SendOutcome};
use swasthya_core::generation::box_generator::BoxReplyGenerator;
use swasthya_core::speech::UnavailableRecognizer;
use swasthya_infra::gateway::GatewayClient;
use swasthya_types::event::ChatEvent;
use swasthya_types::language::Language;
use swasthya_types::notification::Notification;

use crate::cli::context::ClientContext;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::{print_message, print_notification};

/// What the terminal should do after a line was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAction {
    Continue,
    LanguageChanged(Language),
    /// The conversation restarted; redraw from a clean screen.
    ClearScreen,
    Exit,
}

/// One terminal chat session: the assistant plus its event subscription.
pub struct ChatSession {
    assistant: ChatAssistant,
    events: broadcast::Receiver<ChatEvent>,
    shown: Vec<Notification>,
}

impl ChatSession {
    pub fn new(assistant: ChatAssistant) -> Self {
        let events = assistant.subscribe();
        Self {
            assistant,
            events,
            shown: Vec::new(),
        }
    }

    pub fn assistant(&self) -> &ChatAssistant {
        &self.assistant
    }

    /// Notifications printed so far, oldest first.
    pub fn shown_notifications(&self) -> &[Notification] {
        &self.shown
    }

    pub fn print_transcript(&self) {
        for message in self.assistant.messages() {
            print_message(&message);
        }
        println!();
    }

    pub async fn handle_line(&mut self, line: &str) -> LineAction {
        let Some(command) = commands::parse(line) else {
            self.send(line).await;
            return LineAction::Continue;
        };

        match command {
            ChatCommand::Help => commands::print_help(),
            ChatCommand::Language(None) => self.print_languages(),
            ChatCommand::Language(Some(language)) => {
                self.assistant.set_language(language);
                self.drain_notifications();
                self.print_transcript();
                return LineAction::LanguageChanged(language);
            }
            ChatCommand::Voice => self.voice().await,
            ChatCommand::Quick(None) => self.print_quick_questions(),
            ChatCommand::Quick(Some(n)) => {
                match self.assistant.quick_questions().get(n - 1) {
                    Some(question) => {
                        print_message(&swasthya_types::chat::ChatMessage::user(*question));
                        self.send(question).await;
                    }
                    None => self.show(Notification::error(format!(
                        "There are only {} quick questions",
                        self.assistant.quick_questions().len()
                    ))),
                }
            }
            ChatCommand::History => self.print_transcript(),
            ChatCommand::Clear => {
                self.assistant.clear();
                self.drain_notifications();
                return LineAction::ClearScreen;
            }
            ChatCommand::Exit => return LineAction::Exit,
            ChatCommand::Invalid(message) => {
                self.show(Notification::error(format!(
                    "{message}. Type /help for available commands."
                )));
            }
        }
        LineAction::Continue
    }

    async fn send(&mut self, text: &str) -> SendOutcome {
        let spinner = thinking_spinner();
        let outcome = self.assistant.send_message(text).await;
        spinner.finish_and_clear();

        match &outcome {
            SendOutcome::Replied(message) | SendOutcome::Fallback(message) => {
                print_message(message);
                println!();
            }
            SendOutcome::Busy(phase) => {
                self.show(Notification::info(format!(
                    "Please wait, the assistant is {phase}"
                )));
            }
            SendOutcome::Empty => {}
            SendOutcome::Discarded => debug!("reply discarded after session change"),
        }
        self.drain_notifications();
        outcome
    }

    async fn voice(&mut self) {
        match self.assistant.start_voice_capture().await {
            Ok(Some(_)) => {
                self.drain_notifications();
                if let Some(message) = self.assistant.send_draft().await.reply() {
                    print_message(message);
                    println!();
                }
            }
            Ok(None) => self.show(Notification::info("No speech was recognized")),
            Err(e) => debug!(error = %e, "voice capture did not run"),
        }
        self.drain_notifications();
    }

    fn print_languages(&self) {
        println!();
        for language in Language::ALL {
            let marker = if language == self.assistant.language() {
                style("*").green().bold()
            } else {
                style(" ")
            };
            println!(
                "  {marker} {:<4} {}",
                style(language.code()).cyan(),
                language.native_name()
            );
        }
        println!();
    }

    fn print_quick_questions(&self) {
        println!();
        for (i, question) in self.assistant.quick_questions().iter().enumerate() {
            println!("  {} {}", style(format!("{}.", i + 1)).cyan(), question);
        }
        println!();
    }

    fn show(&mut self, notification: Notification) {
        print_notification(&notification);
        self.shown.push(notification);
    }

    /// Print the notifications the assistant published since the last call.
    fn drain_notifications(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(ChatEvent::Notify { notification }) => self.show(notification),
                Ok(_) => {}
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!(skipped, "chat event receiver lagged");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }

    pub fn close(&self) {
        self.assistant.close();
    }
}

fn thinking_spinner() -> indicatif::ProgressBar {
    let spinner = indicatif::ProgressBar::new_spinner();
    spinner.set_style(
        indicatif::ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner()),
    );
    spinner.set_message("thinking...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Run the interactive chat against the configured gateway.
pub async fn run_chat_loop(ctx: &ClientContext, language: Option<Language>) -> anyhow::Result<()> {
    let store: Arc<dyn SessionStore> = Arc::new(ctx.session_store());
    let user = match store.load() {
        Ok(session) => session.map(|s| s.user),
        Err(e) => {
            warn!(error = %e, "ignoring unreadable session file");
            None
        }
    };

    let gateway = GatewayClient::new(&ctx.config.gateway_url, ctx.request_timeout())?
        .with_session_store(store);
    let gateway_reachable = match gateway.health().await {
        Ok(health) => {
            debug!(version = %health.version, "gateway reachable");
            true
        }
        Err(e) => {
            warn!(error = %e, url = %ctx.config.gateway_url, "gateway health check failed");
            false
        }
    };

    let mut options = AssistantOptions::from(&ctx.config);
    if let Some(language) = language {
        options.language = language;
    }
    let initial_language = options.language;
    let assistant = ChatAssistant::new(
        BoxReplyGenerator::new(gateway),
        Arc::new(UnavailableRecognizer),
        options,
    );
    let mut session = ChatSession::new(assistant);

    print_welcome_banner(initial_language, &ctx.config.gateway_url, user.as_ref());
    if !gateway_reachable {
        print_notification(&Notification::error(format!(
            "Gateway unreachable at {}. Start it with `swasthya serve`.",
            ctx.config.gateway_url
        )));
    }
    if user.is_none() {
        print_notification(&Notification::info(
            "Log in with `swasthya login` or `swasthya demo-login` to get replies.",
        ));
    }
    session.print_transcript();

    let mut input = ChatInput::new(initial_language)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        match input.read_line().await {
            InputEvent::Eof => break,
            InputEvent::Interrupted => {
                println!("  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
            }
            InputEvent::Line(line) if line.is_empty() => {}
            InputEvent::Line(line) => match session.handle_line(&line).await {
                LineAction::Continue => {}
                LineAction::LanguageChanged(language) => input.set_language(language),
                LineAction::ClearScreen => {
                    input.clear_screen();
                    session.print_transcript();
                }
                LineAction::Exit => break,
            },
        }
    }

    session.close();
    input.finish();
    println!("\n  {}", style("Session ended.").dim());
    Ok(())
}
