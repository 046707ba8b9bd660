//! Command execution context
//!
//! Loads the config once, picks the credential backend and wires the
//! session manager into a shared API client.

use std::path::PathBuf;
use std::sync::Arc;

use crate::auth::{CredentialStore, FileBackend, KeyringBackend, SecretBackend, SessionManager};
use crate::cli::{GlobalOptions, OutputFormat};
use crate::client::{FinportClient, Gateway};
use crate::config::{Config, TokenStoreKind};
use crate::error::{ApiError, Result};

/// Context for command execution containing config, client, and runtime options.
pub struct CommandContext {
    /// Loaded configuration
    pub config: Config,
    /// Where `config` was loaded from and is saved back to
    pub config_path: PathBuf,
    /// API client sharing one session manager (Arc-wrapped for parallel requests)
    pub client: Arc<FinportClient>,
    /// Resolved output format
    pub format: OutputFormat,
    /// Credential backend in use
    pub token_store: TokenStoreKind,
}

impl CommandContext {
    /// Build the context without touching the network.
    ///
    /// # Errors
    /// Returns error if the config cannot be parsed or the HTTP client
    /// cannot be built.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config_path = Config::resolve_path(opts.config_ref())?;
        let config = Config::load_from(&config_path)?;

        let token_store = opts.token_store.unwrap_or(config.token_store);
        let store = CredentialStore::new(credential_backend(token_store, &config_path));
        let session = Arc::new(SessionManager::new(store, config.email.clone()));
        let gateway = Gateway::new(config.api_host_with(opts.api_host_ref()))?;
        let client = Arc::new(FinportClient::new(gateway, session));

        let format = resolve_format(opts.format, &config);

        Ok(Self {
            config,
            config_path,
            client,
            format,
            token_store,
        })
    }

    pub fn session(&self) -> &SessionManager {
        self.client.session()
    }

    /// Fail early when there is no stored session at all.
    pub fn require_session(&self) -> Result<()> {
        if self.session().session().is_authenticated() {
            Ok(())
        } else {
            Err(ApiError::Auth("no stored session".to_string()).into())
        }
    }

    /// Write the config back to where it was loaded from.
    pub fn save_config(&self) -> Result<()> {
        self.config.save_to(&self.config_path)
    }
}

/// Flag/env format, then the config preference, then the default.
fn resolve_format(flag: Option<OutputFormat>, config: &Config) -> OutputFormat {
    flag.or_else(|| {
        config
            .preferences
            .format
            .as_deref()
            .and_then(OutputFormat::from_preference)
    })
    .unwrap_or_default()
}

fn credential_backend(kind: TokenStoreKind, config_path: &std::path::Path) -> Arc<dyn SecretBackend> {
    match kind {
        TokenStoreKind::Keyring => Arc::new(KeyringBackend::new()),
        TokenStoreKind::File => Arc::new(FileBackend::new(Config::token_file_path(config_path))),
    }
}
