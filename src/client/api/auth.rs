//! Authentication API trait

use async_trait::async_trait;

use crate::auth::TokenPair;
use crate::error::Result;

/// Authentication operations for the Finport API
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Sign in with email and password; the issued pair becomes the session.
    async fn login(&self, email: &str, password: &str) -> Result<TokenPair>;

    /// Create an account; the issued pair becomes the session.
    async fn register(&self, email: &str, password: &str) -> Result<TokenPair>;

    /// Forget the local session. No server call is made.
    async fn logout(&self) -> Result<()>;
}
