//! Error types used throughout the job

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for mailcal
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum MailCalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Date parse error: {0}")]
    DateParse(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MailCalError {
    /// True for failures reported by (or on the way to) the remote mail and
    /// calendar service.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Auth(_) | Self::NotFound(_) | Self::InvalidInput(_)
        )
    }

    /// Stable label suitable for structured log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Network(_) => "network",
            Self::Auth(_) => "auth",
            Self::NotFound(_) => "not_found",
            Self::InvalidInput(_) => "invalid_input",
            Self::DateParse(_) => "date_parse",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for mailcal operations
pub type Result<T> = std::result::Result<T, MailCalError>;
