//! Error types for slash-core

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for command engine operations
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid participant: needs an id with a display name, or a handle")]
    InvalidParticipant,

    #[error("Pool '{0}' has no items")]
    EmptyPool(String),

    #[error("Unknown pool category: {0}")]
    UnknownCategory(String),

    #[error("Profile lookup failed: {0}")]
    Lookup(#[from] LookupError),
}

/// Failures while fetching or reading a public profile page
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("HTTP error for @{handle}: {source}")]
    Http {
        handle: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Profile page for @{handle} has no {field}")]
    Unparsable { handle: String, field: &'static str },
}
