//! Session and credential management
//!
//! - [`CredentialStore`]: secure persistence of the token pair (keychain or file)
//! - [`SessionManager`]: token lifecycle with single-flight refresh
//! - [`TokenPair`]: tokens issued by the auth endpoints

pub mod session;
pub mod store;
pub mod token;

pub use session::{AuthState, SessionManager, TokenRefresher};
pub use store::{CredentialStore, FileBackend, KeyringBackend, SecretBackend};
pub use token::{LoginRequest, RefreshRequest, TokenPair};
