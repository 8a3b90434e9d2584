//! Completion-client error kinds and classification helpers.
//!
//! ```rust
//! use pcompletion::CompletionError;
//!
//! let auth = CompletionError::auth("bad key");
//! assert!(!auth.retryable);
//!
//! let limited = CompletionError::rate_limit("slow down");
//! assert!(limited.retryable);
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionErrorKind {
    Auth,
    RateLimit,
    BadRequest,
    NotFound,
    Network,
    Server,
    Config,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionError {
    pub kind: CompletionErrorKind,
    pub message: String,
    pub retryable: bool,
}

impl CompletionError {
    pub fn new(kind: CompletionErrorKind, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable,
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(CompletionErrorKind::Auth, message, false)
    }

    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::new(CompletionErrorKind::RateLimit, message, true)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(CompletionErrorKind::BadRequest, message, false)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(CompletionErrorKind::NotFound, message, false)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(CompletionErrorKind::Network, message, true)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(CompletionErrorKind::Server, message, true)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(CompletionErrorKind::Config, message, false)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(CompletionErrorKind::Other, message, false)
    }
}

impl Display for CompletionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for CompletionError {}

/// Table-driven classification over the provider's status-code space.
/// Unknown codes fall back to a terminal generic failure so callers never
/// loop on an unrecognized failure mode.
pub fn classify_status(status: u16, message: impl Into<String>) -> CompletionError {
    let message = message.into();

    match status {
        401 | 403 => CompletionError::auth(message),
        400 | 422 => CompletionError::bad_request(message),
        404 => CompletionError::not_found(message),
        408 => CompletionError::network(message),
        429 => CompletionError::rate_limit(message),
        500..=599 => CompletionError::server(message),
        _ => CompletionError::other(format!("request failed with status {status}: {message}")),
    }
}
