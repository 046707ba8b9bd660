//! Status command implementation

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;

use crate::auth::AuthState;
use crate::cli::{CommandContext, OutputFormat};
use crate::config::TokenStoreKind;
use crate::error::Result;
use crate::output::{formatters, json};

/// Snapshot of local state; never contacts the server
#[derive(Debug, Serialize)]
struct StatusReport {
    config_file: String,
    api_host: String,
    token_store: TokenStoreKind,
    signed_in: bool,
    user: Option<String>,
    token_expires_at: Option<DateTime<Utc>>,
    token_expired: bool,
    onboarded: bool,
    statement_uploaded: bool,
}

impl StatusReport {
    fn collect(ctx: &CommandContext) -> Self {
        let session = ctx.session().session();
        let record = ctx.session().store().record();
        let token_expired = record.as_ref().is_some_and(|r| r.is_expired());
        Self {
            config_file: ctx.config_path.display().to_string(),
            api_host: ctx.client.gateway().base_url().to_string(),
            token_store: ctx.token_store,
            signed_in: ctx.session().state() != AuthState::LoggedOut,
            user: session.current_user,
            token_expires_at: record.and_then(|r| r.expires_at()),
            token_expired,
            onboarded: ctx.config.onboarded,
            statement_uploaded: ctx.config.statement_uploaded,
        }
    }
}

/// Run the status command
pub fn run(ctx: &CommandContext) -> Result<()> {
    let report = StatusReport::collect(ctx);

    if ctx.format == OutputFormat::Json {
        println!("{}", json::format_json(&report)?);
        return Ok(());
    }

    println!("{}\n", "Finport Status".bold());
    println!("Config file: {}", report.config_file.cyan());
    println!("API host:    {}", report.api_host.cyan());
    println!();

    if report.signed_in {
        let user = report.user.as_deref().unwrap_or("unknown user");
        println!("{} Signed in as {}", "✓".green(), user.bold());
        match report.token_expires_at {
            Some(_) if report.token_expired => println!(
                "{} Access token expired (will refresh on next command)",
                "⚠".yellow()
            ),
            Some(expires) => println!(
                "{} Access token valid (expires in {})",
                "✓".green(),
                formatters::format_time_left(expires, Utc::now())
            ),
            None => println!("{} Access token expiry unknown", "○".dimmed()),
        }
    } else {
        println!("{} Not signed in", "✗".red());
        println!("  → Run 'finport login' or 'finport register'");
    }

    if report.signed_in && !report.statement_uploaded {
        println!("{} No bank statement uploaded yet", "○".dimmed());
        println!("  → Run 'finport transaction upload <FILE> --bank <BANK>'");
    }
    println!();

    Ok(())
}
