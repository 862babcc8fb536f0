//! Telegram error classification
//!
//! Decides whether a failed Bot API call is something to tell the chat
//! about or something the dispatcher's error handler should see.

use teloxide::RequestError;
use tracing::{debug, warn};

/// Result of classifying a failed request
#[derive(Debug, PartialEq, Eq)]
pub enum ErrorOutcome {
    /// Telegram refused the request; the detail is shown to the chat.
    Refused(String),
    /// Transport trouble; propagate.
    Propagate,
}

/// Classify a `RequestError` raised while performing `action`.
pub fn classify(action: &str, err: &RequestError) -> ErrorOutcome {
    match err {
        RequestError::Api(api_err) => {
            warn!("Telegram refused '{}': {}", action, api_err);
            ErrorOutcome::Refused(api_err.to_string())
        }
        RequestError::MigrateToChatId(new_id) => {
            warn!("Chat migrated during '{}': new_id={}", action, new_id.0);
            ErrorOutcome::Refused(err.to_string())
        }
        RequestError::RetryAfter(_)
        | RequestError::Network(_)
        | RequestError::Io(_)
        | RequestError::InvalidJson { .. } => {
            debug!("Transport error during '{}': {}", action, err);
            ErrorOutcome::Propagate
        }
    }
}
