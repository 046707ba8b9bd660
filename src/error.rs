//! Error types for the Finport CLI

use thiserror::Error;

/// Result type alias for Finport operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Dialoguer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Operation failed: {0}")]
    Other(String),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Dialoguer(err.to_string())
    }
}

impl Error {
    /// The API error behind this error, if any.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None,
        }
    }

    /// True when the server answered 401 Unauthorized.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.as_api(), Some(ApiError::Status { code: 401, .. }))
    }
}

/// Errors surfaced by the request gateway and the token lifecycle
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure, no response was received
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a status outside 200..300
    #[error("Server returned {code}: {message}")]
    Status { code: u16, message: String },

    /// The response body did not match the expected shape
    #[error("Unexpected response from server: {0}")]
    Decoding(String),

    /// No usable credentials, or the refresh attempt was exhausted
    #[error("Not signed in ({0}). Run `finport login` to sign in.")]
    Auth(String),
}

impl ApiError {
    /// HTTP status code for `Status` errors.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to API".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Secure storage errors. Callers of the credential store treat these as
/// "no token" rather than aborting.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Keychain error: {0}")]
    Keyring(String),

    #[error("Token file error: {0}")]
    File(String),

    #[error("Stored credentials are corrupt: {0}")]
    Corrupt(String),
}

impl From<keyring::Error> for CredentialError {
    fn from(err: keyring::Error) -> Self {
        CredentialError::Keyring(err.to_string())
    }
}
