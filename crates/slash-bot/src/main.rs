//! slash-bot
//!
//! Answers slash commands in Telegram groups with rendered sentences,
//! pins on request, repeats cheers and replies with random stickers.
//! One process can serve several bot accounts.

mod adapter;
mod config;
mod env;
mod errors;
mod handlers;
mod http;
mod stickers;
mod supervisor;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::env::SystemEnv;
use crate::supervisor::Supervisor;

/// slash-bot CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/slash-bot.toml")]
    config: String,

    /// Bot token(s) (overrides config file)
    #[arg(long, env = "TOKEN")]
    token: Option<String>,

    /// Outbound proxy URL (overrides config file)
    #[arg(long, env = "PROXY")]
    proxy: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slash_bot=debug,slash_core=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting slash-bot");

    let args = Args::parse();

    let config = if std::path::Path::new(&args.config).exists() {
        info!("Loading config from file: {}", args.config);
        let mut config = Config::from_file(&args.config)?;

        if let Some(token) = args.token {
            config.set_tokens(&token);
        }
        if let Some(proxy) = args.proxy.filter(|p| !p.is_empty()) {
            config.bot.proxy = Some(proxy);
        }

        config.validate()?;
        config
    } else {
        info!("Config file not found, using environment variables");
        Config::from_env(&SystemEnv)?
    };

    info!(
        "Configuration loaded: {} bot(s), {} sticker(s), proxy {}",
        config.bot.tokens.len(),
        config.bot.stickers.len(),
        if config.bot.proxy.is_some() { "on" } else { "off" }
    );

    let telegram = http::telegram_client(&config.bot)?;
    let lookup = http::lookup_client(&config.bot)?;
    let registry = Arc::new(slash_core::phrases::registry(config.bot.stickers.clone())?);

    Supervisor::new(telegram, lookup, registry)
        .run(&config.bot.tokens)
        .await?;

    info!("slash-bot stopped");
    Ok(())
}
