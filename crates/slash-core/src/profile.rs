//! Public profile lookup
//!
//! Handle-only participants get their display name from the public
//! `t.me/<handle>` page. The page's `og:title` carries the name; when it
//! equals the page `<title>` Telegram served its generic fallback page and
//! the account does not exist.

use std::future::Future;
use std::sync::LazyLock;

use quick_xml::escape::{resolve_html5_entity, unescape_with};
use regex::Regex;
use tracing::debug;

use crate::error::LookupError;

const DEFAULT_BASE_URL: &str = "https://t.me";

static OG_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta property="og:title" content="(.*)""#).expect("valid og:title regex")
});

static PAGE_TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<title>(.*)</title>").expect("valid title regex"));

/// Fetch the raw profile page markup for a public handle.
///
/// One trait, one operation; swap it for a mock in tests.
pub trait ProfileLookup: Send + Sync {
    fn fetch_profile(&self, handle: &str) -> impl Future<Output = Result<String, LookupError>> + Send;
}

/// [`ProfileLookup`] over HTTP with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpProfileLookup {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProfileLookup {
    /// Lookup against `https://t.me`. The client should not keep cookies.
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl ProfileLookup for HttpProfileLookup {
    async fn fetch_profile(&self, handle: &str) -> Result<String, LookupError> {
        let url = format!("{}/{}", self.base_url, handle);
        debug!("Fetching profile page {}", url);

        let http_err = |source| LookupError::Http {
            handle: handle.to_string(),
            source,
        };
        let response = self.client.get(&url).send().await.map_err(http_err)?;
        response.text().await.map_err(http_err)
    }
}

/// Extract the display name from a profile page.
///
/// `Ok(None)` means the account does not exist.
pub fn extract_display_name(handle: &str, page: &str) -> Result<Option<String>, LookupError> {
    let og_title = capture(&OG_TITLE_RE, page).ok_or_else(|| LookupError::Unparsable {
        handle: handle.to_string(),
        field: "og:title",
    })?;
    let page_title = capture(&PAGE_TITLE_RE, page).ok_or_else(|| LookupError::Unparsable {
        handle: handle.to_string(),
        field: "title",
    })?;

    if og_title == page_title || og_title.is_empty() {
        return Ok(None);
    }

    let name = unescape_with(og_title, resolve_html5_entity)
        .map(|name| name.into_owned())
        .unwrap_or_else(|_| og_title.to_string());
    Ok(Some(name))
}

fn capture<'p>(re: &Regex, page: &'p str) -> Option<&'p str> {
    re.captures(page)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
