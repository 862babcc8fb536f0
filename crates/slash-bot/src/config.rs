//! Configuration management for slash-bot

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;

use std::fs;
use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::env::ReadEnv;
use crate::stickers::default_stickers;

/// Anything outside the bot-token alphabet separates tokens.
static TOKEN_SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z\-_\d:]+").expect("valid token separator regex"));

/// Complete bot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub bot: BotConfig,
}

/// Settings shared by every bot the process runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Bot tokens from BotFather, one worker each
    #[serde(default)]
    pub tokens: Vec<String>,
    /// Outbound proxy for Telegram and profile lookups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    /// Sticker file ids for the random-sticker reply
    #[serde(default = "default_stickers")]
    pub stickers: Vec<String>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        Ok(config)
    }

    /// Load configuration from environment variables
    ///
    /// - `TOKEN`: one or more bot tokens (required)
    /// - `PROXY`: outbound proxy URL (optional)
    pub fn from_env<E: ReadEnv>(env: &E) -> Result<Self> {
        let tokens = split_tokens(&env.var("TOKEN").context("TOKEN not set")?);
        let proxy = env.var("PROXY").ok().filter(|p| !p.is_empty());

        let config = Config {
            bot: BotConfig {
                tokens,
                proxy,
                stickers: default_stickers(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Replace the token list with the tokens found in `raw`.
    pub fn set_tokens(&mut self, raw: &str) {
        self.bot.tokens = split_tokens(raw);
    }

    pub fn validate(&self) -> Result<()> {
        if self.bot.tokens.is_empty() {
            bail!("no valid bot token found");
        }
        if self.bot.stickers.is_empty() {
            bail!("sticker catalog is empty");
        }
        Ok(())
    }
}

/// Split a token list on any character that cannot appear in a token.
pub fn split_tokens(raw: &str) -> Vec<String> {
    TOKEN_SEPARATOR_RE
        .split(raw)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
