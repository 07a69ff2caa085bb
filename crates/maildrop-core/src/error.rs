/// Error types for Maildrop
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MaildropError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Emit error: {0}")]
    Emit(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Broker error: {0}")]
    Broker(#[from] lapin::Error),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse classification callers can branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid configuration, including credentials
    Configuration,
    /// The request was rejected before any network call
    Validation,
    /// The broker did not acknowledge the event
    Publish,
    /// Lower-level store, broker or filesystem failure
    Transport,
}

impl MaildropError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) | Self::MissingCredentials(_) => ErrorKind::Configuration,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Emit(_) => ErrorKind::Publish,
            Self::Storage(_)
            | Self::Broker(_)
            | Self::Timeout(_)
            | Self::Io(_)
            | Self::Serialization(_) => ErrorKind::Transport,
        }
    }

    /// True when the failure happened before anything was uploaded or published
    pub fn is_pre_flight(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Configuration | ErrorKind::Validation
        )
    }
}

impl From<url::ParseError> for MaildropError {
    fn from(err: url::ParseError) -> Self {
        Self::Config(format!("Invalid URL: {}", err))
    }
}
