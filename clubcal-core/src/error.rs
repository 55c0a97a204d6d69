//! Error types for clubcal.

use thiserror::Error;

/// Errors that can occur in clubcal operations.
#[derive(Error, Debug)]
pub enum ClubCalError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Failed to fetch events: {0}")]
    Fetch(String),

    #[error("Calendar renderer unavailable: {0}")]
    RendererUnavailable(String),

    #[error("Event not found: {0}")]
    EventNotFound(i64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for clubcal operations.
pub type ClubCalResult<T> = Result<T, ClubCalError>;
