//! CLI command definitions for the `swasthya` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod auth;
pub mod chat;
pub mod context;

use clap::{Parser, Subcommand};

use swasthya_types::auth::UserType;
use swasthya_types::language::Language;

/// Rural healthcare assistant: chat client and trusted gateway.
#[derive(Parser)]
#[command(name = "swasthya", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    /// Gateway base URL, overriding `client.toml`.
    #[arg(long, global = true, env = "SWASTHYA_GATEWAY_URL")]
    pub gateway: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the trusted gateway (holds the Gemini API key).
    Serve {
        /// Port to listen on (default from gateway.toml).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (default from gateway.toml).
        #[arg(long)]
        host: Option<String>,
    },

    /// Chat with the health assistant in the terminal.
    Chat {
        /// Conversation language: en, hi or or.
        #[arg(short, long)]
        language: Option<Language>,
    },

    /// Log in with email and password.
    Login {
        #[arg(short, long)]
        email: String,

        /// Prompted for when omitted.
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Log in as a demo user.
    #[command(name = "demo-login")]
    DemoLogin {
        /// asha or citizen.
        #[arg(default_value = "citizen")]
        user_type: UserType,
    },

    /// Log out and forget the stored session.
    Logout,

    /// Show the logged-in user.
    Whoami,

    /// List supported conversation languages.
    Languages,
}

/// Default log filter for the verbosity flags, used when `RUST_LOG` is unset.
pub fn default_filter(verbose: u8, quiet: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 => "warn",
        1 => "info,swasthya=debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_chat_language() {
        let cli = Cli::try_parse_from(["swasthya", "chat", "--language", "or"]).unwrap();
        match cli.command {
            Commands::Chat { language } => assert_eq!(language, Some(Language::Odia)),
            _ => panic!("expected chat"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_language() {
        assert!(Cli::try_parse_from(["swasthya", "chat", "-l", "fr"]).is_err());
    }

    #[test]
    fn test_demo_login_defaults_to_citizen() {
        let cli = Cli::try_parse_from(["swasthya", "demo-login"]).unwrap();
        match cli.command {
            Commands::DemoLogin { user_type } => assert_eq!(user_type, UserType::Citizen),
            _ => panic!("expected demo-login"),
        }
    }

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(0, true), "error");
        assert_eq!(default_filter(0, false), "warn");
        assert_eq!(default_filter(2, false), "trace");
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
