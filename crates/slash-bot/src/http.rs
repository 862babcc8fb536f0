//! HTTP clients for the Bot API and profile lookups

use anyhow::{Context, Result};

use crate::config::BotConfig;

fn with_proxy(builder: reqwest::ClientBuilder, proxy: Option<&str>) -> Result<reqwest::ClientBuilder> {
    match proxy {
        Some(url) => {
            let proxy = reqwest::Proxy::all(url).with_context(|| format!("Invalid proxy URL: {url}"))?;
            Ok(builder.proxy(proxy))
        }
        None => Ok(builder),
    }
}

/// Client used by every bot worker to talk to the Bot API.
pub fn telegram_client(config: &BotConfig) -> Result<reqwest::Client> {
    let builder = with_proxy(teloxide::net::default_reqwest_settings(), config.proxy.as_deref())?;
    builder.build().context("Failed to build Telegram HTTP client")
}

/// Client used to fetch public profile pages. Keeps no cookies.
pub fn lookup_client(config: &BotConfig) -> Result<reqwest::Client> {
    let builder = with_proxy(reqwest::Client::builder(), config.proxy.as_deref())?;
    builder.build().context("Failed to build profile lookup HTTP client")
}
