//! Swasthya CLI and trusted gateway entry point.
//!
//! Binary name: `swasthya`
//!
//! Parses CLI arguments, sets up tracing, then dispatches to the chat and
//! auth commands or starts the gateway server.

mod cli;
mod http;
mod state;

use clap::Parser;
use console::style;

use swasthya_infra::config::resolve_data_dir;
use swasthya_observe::tracing_setup::{init_tracing, shutdown_tracing};
use swasthya_types::language::Language;

use cli::context::ClientContext;
use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = cli::default_filter(cli.verbose, cli.quiet);
    if let Err(e) = init_tracing(cli.otel, filter) {
        eprintln!("Warning: failed to initialize tracing: {e}");
    }

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { port, host } => serve(host, port).await,

        Commands::Chat { language } => {
            let ctx = ClientContext::load(cli.gateway).await;
            cli::chat::loop_runner::run_chat_loop(&ctx, language).await
        }

        Commands::Login { email, password } => {
            let ctx = ClientContext::load(cli.gateway).await;
            cli::auth::login(&ctx, email, password, cli.json).await
        }

        Commands::DemoLogin { user_type } => {
            let ctx = ClientContext::load(cli.gateway).await;
            cli::auth::demo_login(&ctx, user_type, cli.json).await
        }

        Commands::Logout => {
            let ctx = ClientContext::load(cli.gateway).await;
            cli::auth::logout(&ctx, cli.json).await
        }

        Commands::Whoami => {
            let ctx = ClientContext::load(cli.gateway).await;
            cli::auth::whoami(&ctx, cli.json)
        }

        Commands::Languages => {
            if cli.json {
                let languages: Vec<_> = Language::ALL
                    .iter()
                    .map(|l| {
                        serde_json::json!({
                            "code": l.code(),
                            "name": l.name(),
                            "native_name": l.native_name(),
                            "speech_locale": l.speech_locale(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&languages)?);
            } else {
                println!();
                for l in Language::ALL {
                    println!(
                        "  {:<4} {:<10} {:<8} {}",
                        style(l.code()).cyan(),
                        l.name(),
                        l.native_name(),
                        style(l.speech_locale()).dim()
                    );
                }
                println!();
            }
            Ok(())
        }
    }
}

async fn serve(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let data_dir = resolve_data_dir();
    let state = AppState::init(&data_dir).await?;

    let host = host.unwrap_or_else(|| state.config.host.clone());
    let port = port.unwrap_or(state.config.port);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        addr = %addr,
        model = %state.config.gemini.model,
        upstream_timeout_secs = state.replies.timeout().as_secs(),
        require_auth = state.config.require_auth,
        accounts = state.accounts.len(),
        "gateway listening"
    );
    println!(
        "  {} Swasthya gateway listening on {}",
        style("+").red().bold(),
        style(format!("http://{addr}")).cyan()
    );
    println!("  {}", style("Press Ctrl+C to stop").dim());

    let router = http::router::build_router(state);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("\n  Server stopped.");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
