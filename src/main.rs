//! Finport CLI - personal finance companion for the Finport service

use clap::{CommandFactory, Parser};
use colored::Colorize;
use log::debug;

mod auth;
mod cli;
mod client;
mod config;
mod error;
mod output;

use cli::{
    AnalyticsCommands, Cli, CommandContext, Commands, GlobalOptions, GoalCommands, Shell,
    StatementCommands, TransactionCommands,
};
use client::models::GoalUpdate;
use error::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

/// `--debug` forces debug output; otherwise `RUST_LOG` or warnings only
fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_module("finport", log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

async fn run(cli: Cli) -> Result<()> {
    let opts = GlobalOptions::from_cli(&cli);
    let command = cli.command;

    if let Commands::Completion { shell } = command {
        print_completions(shell);
        return Ok(());
    }

    let mut ctx = CommandContext::new(&opts)?;
    if !command.requires_session() {
        return dispatch(&mut ctx, command).await;
    }
    ctx.require_session()?;

    let session = ctx.session().subscribe();
    let result = dispatch(&mut ctx, command).await;
    if !session.borrow().is_authenticated() {
        debug!("Session ended while running the command");
        eprintln!(
            "{} Your session has expired. Run 'finport login' to sign in again.",
            "⚠".yellow()
        );
    }
    result
}

fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "finport", &mut std::io::stdout());
}

async fn dispatch(ctx: &mut CommandContext, command: Commands) -> Result<()> {
    match command {
        Commands::Goal(goal_cmd) => match goal_cmd {
            GoalCommands::List => cli::goal::list(ctx).await,
            GoalCommands::Create {
                title,
                target,
                deadline,
            } => cli::goal::create(ctx, title, target, deadline).await,
            GoalCommands::Update {
                id,
                title,
                target,
                deadline,
            } => {
                let update = GoalUpdate {
                    title,
                    target_amount: target,
                    deadline,
                };
                cli::goal::update(ctx, id, update).await
            }
            GoalCommands::Deposit { id, amount } => cli::goal::deposit(ctx, id, amount).await,
        },
        Commands::Transaction(tx_cmd) => match tx_cmd {
            TransactionCommands::History { category, limit } => {
                cli::transaction::history(ctx, category, limit).await
            }
            TransactionCommands::Upload { file, bank } => {
                cli::transaction::upload(ctx, &file, bank).await
            }
            TransactionCommands::Categorize { id, category } => {
                cli::transaction::categorize(ctx, id, category).await
            }
        },
        Commands::Statement(StatementCommands::List) => {
            cli::transaction::list_statements(ctx).await
        }
        Commands::Analytics(analytics_cmd) => match analytics_cmd {
            AnalyticsCommands::Categories => cli::analytics::categories(ctx).await,
            AnalyticsCommands::Monthly => cli::analytics::monthly(ctx).await,
            AnalyticsCommands::Income => cli::analytics::income(ctx).await,
            AnalyticsCommands::Overview => cli::analytics::overview(ctx).await,
        },
        Commands::Portrait { month, year } => cli::insight::portrait(ctx, month, year).await,
        Commands::Advice => cli::insight::advice(ctx).await,
        Commands::Forecast { months, category } => {
            cli::insight::forecast(ctx, months, category).await
        }
        Commands::Register(credentials) => cli::auth::register(ctx, credentials).await,
        Commands::Login(credentials) => cli::auth::login(ctx, credentials).await,
        Commands::Logout => cli::auth::logout(ctx).await,
        Commands::Status => cli::status::run(ctx),
        Commands::Completion { shell } => {
            print_completions(shell);
            Ok(())
        }
    }
}
