//! Token lifecycle and observable session state
//!
//! [`SessionManager`] owns the `LoggedOut -> LoggedIn -> Refreshing` state
//! machine. Every token write goes through its [`CredentialStore`], and a
//! refresh is single-flight: callers that see a 401 while another refresh is
//! running wait on the same lock and then reuse its outcome.

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::sync::{Mutex, watch};

use super::store::CredentialStore;
use super::token::TokenPair;
use crate::error::{ApiError, Result};

/// Where the token lifecycle currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    LoggedOut,
    LoggedIn,
    Refreshing,
}

/// Observable session snapshot for the front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub state: AuthState,
    pub current_user: Option<String>,
}

impl Session {
    fn logged_out() -> Self {
        Self {
            state: AuthState::LoggedOut,
            current_user: None,
        }
    }

    /// True while a usable access token is stored (including mid-refresh).
    pub fn is_authenticated(&self) -> bool {
        self.state != AuthState::LoggedOut
    }
}

/// Exchanges a refresh token for a new pair
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair>;
}

/// Result of the last refresh, kept under the refresh lock
#[derive(Debug)]
struct RefreshOutcome {
    /// Access token the refresh replaced
    replaced: Option<String>,
    /// New access token, or why the refresh failed
    result: std::result::Result<String, String>,
}

/// Token lifecycle manager
pub struct SessionManager {
    store: CredentialStore,
    state: watch::Sender<Session>,
    last_refresh: Mutex<Option<RefreshOutcome>>,
}

impl SessionManager {
    /// Build the manager, deriving the initial session from the store.
    pub fn new(store: CredentialStore, user: Option<String>) -> Self {
        let initial = if store.read_access_token().is_some() {
            Session {
                state: AuthState::LoggedIn,
                current_user: user,
            }
        } else {
            Session::logged_out()
        };
        debug!("Initial session state: {:?}", initial.state);

        let (state, _) = watch::channel(initial);
        Self {
            store,
            state,
            last_refresh: Mutex::new(None),
        }
    }

    /// Subscribe to session transitions.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Current session snapshot.
    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().state
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Access token to attach to the next request, if any.
    pub fn bearer_token(&self) -> Option<String> {
        self.store.read_access_token()
    }

    /// Record a successful login or registration.
    ///
    /// The session only becomes `LoggedIn` once the pair is stored.
    pub fn establish(&self, pair: &TokenPair, user: Option<String>) -> Result<()> {
        if let Err(e) = self.store.save(Some(pair)) {
            self.publish(AuthState::LoggedOut, None);
            return Err(e.into());
        }
        info!("Session established");
        self.publish(AuthState::LoggedIn, user);
        Ok(())
    }

    /// Explicit logout: forget both tokens.
    pub fn logout(&self) {
        self.store.clear();
        info!("Logged out");
        self.publish(AuthState::LoggedOut, None);
    }

    /// Handle a 401 received while presenting `stale` as the bearer token.
    ///
    /// Returns the access token to retry with. Only one refresh runs at a
    /// time; a caller that waited behind another refresh gets that refresh's
    /// token, or an auth error if it failed.
    pub async fn recover_from_unauthorized(
        &self,
        stale: Option<&str>,
        refresher: &dyn TokenRefresher,
    ) -> Result<String> {
        let mut last_refresh = self.last_refresh.lock().await;

        // A refresh for this exact token already ran while we waited
        if let Some(outcome) = last_refresh.as_ref().filter(|o| o.replaced.as_deref() == stale) {
            debug!("Reusing outcome of a concurrent refresh");
            return outcome.result.clone().map_err(|e| ApiError::Auth(e).into());
        }

        match self.store.read_access_token() {
            Some(current) if Some(current.as_str()) != stale => {
                debug!("Token already refreshed by a concurrent request");
                return Ok(current);
            }
            Some(_) => {}
            None => {
                self.publish(AuthState::LoggedOut, None);
                return Err(ApiError::Auth("no stored session".to_string()).into());
            }
        }

        let result = self.refresh(refresher).await;
        *last_refresh = Some(RefreshOutcome {
            replaced: stale.map(str::to_string),
            result: result.clone(),
        });
        result.map_err(|e| ApiError::Auth(e).into())
    }

    /// Run one refresh. On any failure the store is cleared and the session
    /// logged out; the error is the message for `ApiError::Auth`.
    async fn refresh(&self, refresher: &dyn TokenRefresher) -> std::result::Result<String, String> {
        let Some(refresh_token) = self.store.read_refresh_token() else {
            self.expire();
            return Err("no refresh token stored".to_string());
        };

        self.publish(AuthState::Refreshing, self.current_user());
        debug!("Refreshing access token");

        let pair = match refresher.refresh(&refresh_token).await {
            Ok(pair) if !pair.access_token.is_empty() => pair,
            Ok(_) => {
                self.expire();
                return Err("refresh returned an empty token".to_string());
            }
            Err(e) => {
                warn!("Token refresh failed: {}", e);
                self.expire();
                return Err(format!("session expired: {}", e));
            }
        };

        if let Err(e) = self.store.save(Some(&pair)) {
            self.expire();
            return Err(format!("could not store refreshed tokens: {}", e));
        }
        self.publish(AuthState::LoggedIn, self.current_user());
        info!("Access token refreshed");
        Ok(pair.access_token)
    }

    fn current_user(&self) -> Option<String> {
        self.state.borrow().current_user.clone()
    }

    /// Failed re-auth: wipe credentials and flip to logged out.
    fn expire(&self) {
        self.store.clear();
        self.publish(AuthState::LoggedOut, None);
    }

    fn publish(&self, state: AuthState, user: Option<String>) {
        let next = Session {
            state,
            current_user: if state == AuthState::LoggedOut {
                None
            } else {
                user
            },
        };
        self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}
