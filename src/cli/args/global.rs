//! Global CLI options shared across all commands

use crate::cli::{Cli, OutputFormat};
use crate::config::TokenStoreKind;

/// Global CLI options passed to all command handlers.
///
/// Captures the flag/env layer only. Config file values are merged in
/// `CommandContext`, so the precedence is flag > env > config > default.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Output format override
    pub format: Option<OutputFormat>,

    /// Custom config file path (defaults to ~/.finport/config.yaml)
    pub config: Option<String>,

    /// Custom API host
    pub api_host: Option<String>,

    /// Where tokens are kept, overriding the config file
    pub token_store: Option<TokenStoreKind>,
}

impl GlobalOptions {
    /// Called once in main.rs after parsing.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            config: cli.config.clone(),
            api_host: cli.api_host.clone(),
            token_store: cli.token_store,
        }
    }

    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }

    pub fn api_host_ref(&self) -> Option<&str> {
        self.api_host.as_deref()
    }
}
