use thiserror::Error;

/// Result type alias for chatline-core
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for the chat page helper
///
/// Event handlers never produce these; only configuration loading and the
/// browser bootstrap can fail.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration errors, including unreadable config files
    #[error("configuration error: {0}")]
    Config(String),

    /// Parse/serialization errors
    #[error("parse error: {0}")]
    Parse(String),

    /// A required page element could not be found or had the wrong type
    #[error("DOM error: {0}")]
    Dom(#[from] DomError),
}

/// Errors raised while binding handlers to a live page
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomError {
    /// No global window/document is available
    #[error("no document available in this context")]
    NoDocument,

    /// Element with the given id is missing from the page
    #[error("element '#{id}' not found")]
    MissingElement { id: String },

    /// Element exists but is not of the expected kind
    #[error("element '#{id}' is not a {expected}")]
    WrongElementKind { id: String, expected: &'static str },

    /// Registering an event listener failed
    #[error("failed to register '{event}' listener")]
    Listener { event: String },
}

impl DomError {
    pub fn missing(id: impl Into<String>) -> Self {
        Self::MissingElement { id: id.into() }
    }

    pub fn wrong_kind(id: impl Into<String>, expected: &'static str) -> Self {
        Self::WrongElementKind { id: id.into(), expected }
    }

    pub fn listener(event: impl Into<String>) -> Self {
        Self::Listener { event: event.into() }
    }
}

impl Error {
    /// Wrap a config file failure with the path that caused it
    pub fn config_file(path: &std::path::Path, reason: impl std::fmt::Display) -> Self {
        Self::Config(format!("{}: {}", path.display(), reason))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}
