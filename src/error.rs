//! Error types for Smart College

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Password hashing error: {0}")]
    Password(#[from] bcrypt::BcryptError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Config file not found. Run 'smartcollege init' first.")]
    ConfigNotFound,
}

pub type Result<T> = std::result::Result<T, Error>;

/// Typed failure of a session operation.
///
/// Login and refresh never panic or bubble transport errors; every failure
/// lands in one of these variants so the caller always has a definite value
/// to branch on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Wrong username or password, message comes from the backend when it sent one
    #[error("{0}")]
    InvalidCredentials(String),

    /// Backend unreachable or the transport failed
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered with a shape we cannot use
    #[error("Unexpected response from authentication service: {0}")]
    InvalidResponse(String),

    #[error("No refresh token available")]
    NoRefreshToken,

    #[error("Session expired, please log in again")]
    SessionExpired,

    /// A newer login/logout/refresh was issued while this one was in flight
    #[error("Request superseded by a newer session change")]
    Superseded,
}

impl AuthError {
    /// Message suitable for an inline form error
    pub fn user_message(&self) -> String {
        match self {
            AuthError::InvalidCredentials(msg) if msg.trim().is_empty() => {
                "Invalid credentials".to_string()
            }
            AuthError::InvalidCredentials(msg) => msg.clone(),
            AuthError::Network(_) => "Network error".to_string(),
            other => other.to_string(),
        }
    }

    /// Whether resubmitting the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, AuthError::Network(_) | AuthError::Superseded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_never_empty() {
        let errors = [
            AuthError::InvalidCredentials(String::new()),
            AuthError::InvalidCredentials("Invalid username or password".to_string()),
            AuthError::Network("connection refused".to_string()),
            AuthError::InvalidResponse("missing user".to_string()),
            AuthError::NoRefreshToken,
            AuthError::SessionExpired,
            AuthError::Superseded,
        ];
        for err in errors {
            assert!(!err.user_message().is_empty(), "{:?}", err);
        }
    }

    #[test]
    fn test_network_error_is_generic_for_users() {
        let err = AuthError::Network("dns failure on 10.0.0.1".to_string());
        assert_eq!(err.user_message(), "Network error");
        assert!(err.is_retryable());
        assert!(!AuthError::InvalidCredentials("x".into()).is_retryable());
    }
}
