//! `swasthya login`, `demo-login`, `logout` and `whoami`.

use std::time::Duration;

use console::style;

use swasthya_core::auth::flow::{LoginFlow, LoginOutcome, failure_notification};
use swasthya_core::auth::store::SessionStore;
use swasthya_infra::auth::{FileSessionStore, HttpAuthClient};
use swasthya_types::auth::{AuthError, Credentials, UserProfile, UserType};
use swasthya_types::notification::Notification;

use crate::cli::chat::renderer::print_notification;
use crate::cli::context::ClientContext;

type CliLoginFlow = LoginFlow<HttpAuthClient, FileSessionStore>;

fn login_flow(ctx: &ClientContext) -> anyhow::Result<CliLoginFlow> {
    let backend = HttpAuthClient::new(&ctx.config.gateway_url, ctx.request_timeout())?;
    Ok(LoginFlow::new(backend, ctx.session_store()))
}

pub async fn login(
    ctx: &ClientContext,
    email: String,
    password: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let password = match password {
        Some(p) => p,
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .interact()?,
    };
    let credentials = Credentials { email, password };

    let flow = login_flow(ctx)?;
    let outcome = flow.login(&credentials).await.map_err(report_failure)?;
    print_outcome(&outcome, json)
}

pub async fn demo_login(ctx: &ClientContext, user_type: UserType, json: bool) -> anyhow::Result<()> {
    let flow = login_flow(ctx)?;
    let outcome = flow.demo_login(user_type).await.map_err(report_failure)?;
    print_outcome(&outcome, json)
}

pub async fn logout(ctx: &ClientContext, json: bool) -> anyhow::Result<()> {
    // Logout must not hang on an unreachable gateway; the local session is
    // cleared either way.
    let backend = HttpAuthClient::new(&ctx.config.gateway_url, Duration::from_secs(5))?;
    let flow = LoginFlow::new(backend, ctx.session_store());

    match flow.logout().await {
        Ok(user) => {
            if json {
                println!("{}", serde_json::json!({ "logged_out": user.email }));
            } else {
                print_notification(&Notification::success(format!(
                    "Logged out {}",
                    user.email
                )));
            }
            Ok(())
        }
        Err(AuthError::NotLoggedIn) => {
            if json {
                println!("{}", serde_json::json!({ "logged_out": null }));
            } else {
                print_notification(&Notification::info("Not logged in"));
            }
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn whoami(ctx: &ClientContext, json: bool) -> anyhow::Result<()> {
    match ctx.session_store().load()? {
        Some(session) if json => {
            println!("{}", serde_json::to_string_pretty(&session.user)?);
        }
        Some(session) => {
            print_profile(&session.user);
            println!(
                "  {}  {}",
                style("Since:").bold(),
                style(session.stored_at.format("%Y-%m-%d %H:%M UTC")).dim()
            );
            println!();
        }
        None if json => println!("null"),
        None => print_notification(&Notification::info(
            "Not logged in. Run `swasthya login` or `swasthya demo-login`.",
        )),
    }
    Ok(())
}

fn report_failure(err: AuthError) -> anyhow::Error {
    let notification = failure_notification(&err);
    tracing::debug!(error = ?err, "login failed");
    anyhow::anyhow!(notification.message)
}

fn print_outcome(outcome: &LoginOutcome, json: bool) -> anyhow::Result<()> {
    if json {
        let value = serde_json::json!({
            "user": outcome.session.user,
            "dashboard": outcome.dashboard,
            "demo_credentials": outcome.demo_credentials,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!();
    print_notification(&outcome.notification);
    print_profile(&outcome.session.user);
    println!(
        "  {}  {}",
        style("Dashboard:").bold(),
        style(outcome.dashboard).cyan()
    );
    if let Some(creds) = &outcome.demo_credentials {
        println!(
            "  {}  {} / {}",
            style("Demo credentials:").bold(),
            creds.email,
            creds.password
        );
    }
    println!();
    Ok(())
}

fn print_profile(user: &UserProfile) {
    println!();
    println!(
        "  {} {}",
        style(&user.full_name).cyan().bold(),
        style(format!("({})", user.user_type)).dim()
    );
    println!("  {}  {}", style("Email:").bold(), user.email);

    let details = [
        ("Phone:", &user.phone),
        ("ABHA:", &user.abha_id),
        ("District:", &user.district),
        ("Block:", &user.block),
        ("Village:", &user.village),
    ];
    for (label, value) in details {
        if let Some(value) = value {
            println!("  {}  {}", style(label).bold(), value);
        }
    }
}
