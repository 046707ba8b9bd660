//! CLI command definitions and handlers

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
pub use clap_complete::Shell;

pub mod analytics;
pub mod args;
pub mod auth;
pub mod context;
pub mod goal;
pub mod insight;
pub mod status;
pub mod transaction;

pub use args::{GlobalOptions, OutputFormat};
pub use context::CommandContext;

use crate::config::TokenStoreKind;

/// Finport CLI - personal finance companion for the Finport service
#[derive(Parser, Debug)]
#[command(name = "finport")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "FINPORT_FORMAT",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: Option<OutputFormat>,

    /// Override config file location
    #[arg(long, global = true, env = "FINPORT_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Override the Finport API host
    #[arg(long, global = true, env = "FINPORT_API_HOST", hide_env = true)]
    pub api_host: Option<String>,

    /// Where to keep tokens (keyring, file)
    #[arg(
        long,
        global = true,
        env = "FINPORT_TOKEN_STORE",
        hide_env = true,
        hide_possible_values = true
    )]
    pub token_store: Option<TokenStoreKind>,

    /// Enable debug logging
    #[arg(long, global = true, env = "FINPORT_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an account and sign in
    Register(auth::Credentials),

    /// Sign in with email and password
    Login(auth::Credentials),

    /// Forget the stored session
    Logout,

    /// Show session and configuration status
    Status,

    /// Manage savings goals
    #[command(subcommand)]
    Goal(GoalCommands),

    /// Browse, upload and categorize transactions
    #[command(subcommand, alias = "tx")]
    Transaction(TransactionCommands),

    /// List uploaded bank statements
    #[command(subcommand)]
    Statement(StatementCommands),

    /// Spending analytics
    #[command(subcommand)]
    Analytics(AnalyticsCommands),

    /// Monthly financial portrait
    Portrait {
        /// Month number (1-12), defaults to the current month
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        /// Year, defaults to the current year
        #[arg(long)]
        year: Option<i32>,
    },

    /// Advice for the current month
    Advice,

    /// Forecast upcoming spending
    Forecast {
        /// Months ahead to forecast
        #[arg(long, short = 'm', default_value_t = 3)]
        months: u32,

        /// Restrict the forecast to one category
        #[arg(long, short = 'c')]
        category: Option<String>,
    },

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Commands {
    /// Whether the command talks to protected endpoints.
    pub fn requires_session(&self) -> bool {
        !matches!(
            self,
            Commands::Register(_)
                | Commands::Login(_)
                | Commands::Logout
                | Commands::Status
                | Commands::Completion { .. }
        )
    }
}

/// Goal subcommands
#[derive(Subcommand, Debug)]
pub enum GoalCommands {
    /// List goals with progress
    List,

    /// Create a goal
    Create {
        /// Goal name
        title: String,

        /// Amount to save
        #[arg(long, short = 't')]
        target: f64,

        /// Target date (YYYY-MM-DD)
        #[arg(long, short = 'd')]
        deadline: Option<NaiveDate>,
    },

    /// Change a goal's name, target or deadline
    Update {
        /// Goal ID
        id: i64,

        /// New name
        #[arg(long)]
        title: Option<String>,

        /// New target amount
        #[arg(long, short = 't')]
        target: Option<f64>,

        /// New target date (YYYY-MM-DD)
        #[arg(long, short = 'd')]
        deadline: Option<NaiveDate>,
    },

    /// Add money to a goal
    Deposit {
        /// Goal ID
        id: i64,

        /// Amount to add
        amount: f64,
    },
}

/// Transaction subcommands
#[derive(Subcommand, Debug)]
pub enum TransactionCommands {
    /// Show transaction history
    History {
        /// Only show transactions in this category
        #[arg(long, short = 'c')]
        category: Option<String>,

        /// Maximum rows to show
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// Upload a PDF bank statement
    Upload {
        /// Path to the PDF file
        file: std::path::PathBuf,

        /// Issuing bank
        #[arg(long, short = 'b')]
        bank: String,
    },

    /// Set the category of a transaction
    Categorize {
        /// Transaction ID
        id: i64,

        /// New category
        category: String,
    },
}

/// Statement subcommands
#[derive(Subcommand, Debug)]
pub enum StatementCommands {
    /// List uploaded statements
    List,
}

/// Analytics subcommands
#[derive(Subcommand, Debug)]
pub enum AnalyticsCommands {
    /// Spending by category
    Categories,

    /// Income and expenses per month
    Monthly,

    /// Income overview
    Income,

    /// Categories, months and income in one view
    Overview,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "finport",
            "goal",
            "list",
            "--format",
            "json",
            "--token-store",
            "file",
        ])
        .unwrap();
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert_eq!(cli.token_store, Some(TokenStoreKind::File));
        assert!(matches!(cli.command, Commands::Goal(GoalCommands::List)));
    }

    #[test]
    fn test_requires_session() {
        fn parse(args: &[&str]) -> Commands {
            Cli::try_parse_from(args).unwrap().command
        }
        assert!(!parse(&["finport", "status"]).requires_session());
        assert!(!parse(&["finport", "login", "-e", "a@b.c"]).requires_session());
        assert!(parse(&["finport", "advice"]).requires_session());
        assert!(parse(&["finport", "statement", "list"]).requires_session());
    }

    #[test]
    fn test_portrait_rejects_bad_month() {
        assert!(Cli::try_parse_from(["finport", "portrait", "--month", "13"]).is_err());
        let cli = Cli::try_parse_from(["finport", "portrait", "--month", "3", "--year", "2024"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Portrait {
                month: Some(3),
                year: Some(2024)
            }
        ));
    }

    #[test]
    fn test_goal_create_parses_deadline() {
        let cli = Cli::try_parse_from([
            "finport", "goal", "create", "Vacation", "--target", "1500", "-d", "2025-06-01",
        ])
        .unwrap();
        match cli.command {
            Commands::Goal(GoalCommands::Create {
                title,
                target,
                deadline,
            }) => {
                assert_eq!(title, "Vacation");
                assert_eq!(target, 1500.0);
                assert_eq!(deadline, NaiveDate::from_ymd_opt(2025, 6, 1));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
