//! register, login and logout commands

use clap::Args;
use colored::Colorize;
use dialoguer::{Input, Password, theme::ColorfulTheme};
use log::debug;

use crate::cli::CommandContext;
use crate::client::AuthApi;
use crate::error::{ApiError, Error, Result};

/// Email/password arguments, prompted for when missing
#[derive(Args, Debug, Clone, Default)]
pub struct Credentials {
    /// Account email
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Account password
    #[arg(long, env = "FINPORT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

impl Credentials {
    /// Fill in whatever was not passed on the command line.
    fn resolve(self, default_email: Option<&str>, confirm_password: bool) -> Result<(String, String)> {
        let theme = ColorfulTheme::default();

        let email = match self.email {
            Some(email) => email,
            None => {
                let mut prompt = Input::<String>::with_theme(&theme).with_prompt("Email");
                if let Some(default) = default_email {
                    prompt = prompt.default(default.to_string());
                }
                prompt.interact_text()?
            }
        };

        let password = match self.password {
            Some(password) => password,
            None => {
                let mut prompt = Password::with_theme(&theme).with_prompt("Password");
                if confirm_password {
                    prompt = prompt.with_confirmation("Repeat password", "Passwords don't match");
                }
                prompt.interact()?
            }
        };

        let email = email.trim().to_string();
        if email.is_empty() || password.is_empty() {
            return Err(Error::Other("Email and password are required".to_string()));
        }
        Ok((email, password))
    }
}

/// Run the register command
pub async fn register(ctx: &mut CommandContext, credentials: Credentials) -> Result<()> {
    let (email, password) = credentials.resolve(None, true)?;

    println!("{}", "Creating account...".cyan());
    ctx.client
        .register(&email, &password)
        .await
        .map_err(|err| describe_failure(err, "Registration"))?;

    remember_user(ctx, email)?;
    println!("{} Account created, you're signed in.", "✓".green());
    print_next_steps(ctx);
    Ok(())
}

/// Run the login command
pub async fn login(ctx: &mut CommandContext, credentials: Credentials) -> Result<()> {
    let default_email = ctx.config.email.clone();
    let (email, password) = credentials.resolve(default_email.as_deref(), false)?;

    println!("{}", "Signing in...".cyan());
    ctx.client
        .login(&email, &password)
        .await
        .map_err(|err| describe_failure(err, "Login"))?;

    remember_user(ctx, email)?;
    println!("{} Signed in.", "✓".green());
    print_next_steps(ctx);
    Ok(())
}

/// Run the logout command
pub async fn logout(ctx: &CommandContext) -> Result<()> {
    ctx.client.logout().await?;
    println!("{} Signed out, stored tokens removed.", "✓".green());
    Ok(())
}

fn remember_user(ctx: &mut CommandContext, email: String) -> Result<()> {
    ctx.config.email = Some(email);
    ctx.config.onboarded = true;
    ctx.config.token_store = ctx.token_store;
    ctx.save_config()
}

fn print_next_steps(ctx: &CommandContext) {
    if ctx.config.statement_uploaded {
        return;
    }
    println!("\n{}", "Next step:".bold());
    println!(
        "  {} - import your first bank statement",
        "finport transaction upload <FILE> --bank <BANK>".cyan()
    );
}

/// Turn an auth endpoint failure into a message for the user.
fn describe_failure(err: Error, action: &str) -> Error {
    debug!("{} failed: {}", action, err);
    let message = match (err.as_api(), err.as_api().and_then(ApiError::status_code)) {
        (_, Some(400 | 401 | 403)) => "wrong email or password".to_string(),
        (_, Some(409)) => "this email is already registered".to_string(),
        (Some(ApiError::Status { code: 422, message }), _) => {
            format!("invalid input ({})", message)
        }
        (_, Some(code)) if code >= 500 => "the server is unavailable, try again later".to_string(),
        (Some(ApiError::Network(reason)), _) => format!("cannot reach the server ({})", reason),
        (Some(ApiError::Decoding(_)), _) => "the server sent an unexpected response".to_string(),
        _ => return err,
    };
    Error::Other(format!("{} failed: {}", action, message))
}
