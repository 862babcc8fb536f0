//! Mock implementations for unit testing without network access.
//!
//! Enabled with the `test-support` feature:
//!
//! ```toml
//! [dev-dependencies]
//! slash-core = { path = "...", features = ["test-support"] }
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::error::LookupError;
use crate::profile::ProfileLookup;

const FALLBACK_TITLE: &str = "Telegram Messenger";

/// Serves canned profile pages and counts fetches per handle.
///
/// Handles without a registered account get Telegram's fallback page.
#[derive(Clone, Default)]
pub struct MockProfileLookup {
    accounts: Arc<HashMap<String, String>>,
    failing: Arc<HashSet<String>>,
    fetches: Arc<Mutex<Vec<String>>>,
}

impl MockProfileLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an existing account with its display name.
    pub fn with_account(mut self, handle: &str, name: &str) -> Self {
        Arc::make_mut(&mut self.accounts).insert(handle.to_string(), name.to_string());
        self
    }

    /// Make lookups of `handle` fail.
    pub fn with_failure(mut self, handle: &str) -> Self {
        Arc::make_mut(&mut self.failing).insert(handle.to_string());
        self
    }

    pub fn fetch_count(&self, handle: &str) -> usize {
        self.fetches.lock().unwrap().iter().filter(|h| *h == handle).count()
    }

    pub fn total_fetches(&self) -> usize {
        self.fetches.lock().unwrap().len()
    }
}

impl ProfileLookup for MockProfileLookup {
    async fn fetch_profile(&self, handle: &str) -> Result<String, LookupError> {
        self.fetches.lock().unwrap().push(handle.to_string());

        if self.failing.contains(handle) {
            return Err(LookupError::Unparsable {
                handle: handle.to_string(),
                field: "og:title",
            });
        }

        let og_title = self
            .accounts
            .get(handle)
            .map(|name| name.replace('&', "&amp;").replace('"', "&quot;"))
            .unwrap_or_else(|| FALLBACK_TITLE.to_string());
        let title = if self.accounts.contains_key(handle) {
            format!("Telegram: Contact @{handle}")
        } else {
            FALLBACK_TITLE.to_string()
        };

        Ok(format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<title>{title}</title>\n\
             <meta property=\"og:title\" content=\"{og_title}\">\n</head>\n</html>"
        ))
    }
}
