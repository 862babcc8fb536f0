//! Bot worker supervision
//!
//! One dispatcher per bot token, all sharing the phrase and sticker pools.
//! Workers start together and stop together.

use std::convert::Infallible;
use std::sync::Arc;

use anyhow::{Context, Result};
use futures::future::join_all;
use slash_core::{FairRegistry, HttpProfileLookup};
use teloxide::dispatching::ShutdownToken;
use teloxide::prelude::*;
use tokio::task::JoinHandle;
use tracing::{Instrument, error, info, trace, warn};

use crate::handlers::{self, BotContext};

/// A running dispatcher for one bot account.
pub struct Worker {
    username: String,
    shutdown: ShutdownToken,
    handle: JoinHandle<()>,
}

impl Worker {
    pub fn username(&self) -> &str {
        &self.username
    }

    async fn stop(self) {
        match self.shutdown.shutdown() {
            Ok(done) => done.await,
            Err(_) => {
                warn!("Dispatcher for @{} was idle, aborting", self.username);
                self.handle.abort();
            }
        }
        if let Err(e) = self.handle.await
            && !e.is_cancelled()
        {
            error!("Dispatcher for @{} panicked: {}", self.username, e);
        }
        info!("Stopped @{}", self.username);
    }
}

pub struct Supervisor {
    telegram: reqwest::Client,
    lookup: reqwest::Client,
    registry: Arc<FairRegistry<String>>,
    api_url: Option<reqwest::Url>,
    workers: Vec<Worker>,
}

impl Supervisor {
    pub fn new(
        telegram: reqwest::Client,
        lookup: reqwest::Client,
        registry: Arc<FairRegistry<String>>,
    ) -> Self {
        Self {
            telegram,
            lookup,
            registry,
            api_url: None,
            workers: Vec::new(),
        }
    }

    /// Talk to a Bot API server other than the public one.
    pub fn with_api_url(mut self, url: reqwest::Url) -> Self {
        self.api_url = Some(url);
        self
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    async fn spawn_worker(&self, index: usize, token: &str) -> Result<Worker> {
        let mut bot = Bot::with_client(token, self.telegram.clone());
        if let Some(url) = &self.api_url {
            bot = bot.set_api_url(url.clone());
        }

        let me = bot
            .get_me()
            .await
            .with_context(|| format!("Failed to authenticate bot #{index}"))?;
        let username = me.username().to_string();
        let ctx = Arc::new(BotContext::new(
            &username,
            HttpProfileLookup::new(self.lookup.clone()),
            Arc::clone(&self.registry),
        ));
        let span = ctx.span.clone();

        let mut dispatcher = Dispatcher::builder(bot, handlers::schema())
            .dependencies(dptree::deps![ctx])
            .default_handler(|upd| async move {
                trace!("Ignored update {}", upd.id.0);
            })
            .distribution_function(|_| None::<Infallible>)
            .build();
        let shutdown = dispatcher.shutdown_token();

        let handle = tokio::spawn(
            async move {
                info!("Dispatcher started");
                dispatcher.dispatch().await;
                info!("Dispatcher finished");
            }
            .instrument(span),
        );

        info!("Bot authenticated as: @{}", username);
        Ok(Worker {
            username,
            shutdown,
            handle,
        })
    }

    /// Start one worker per token. Workers that came up are kept even when
    /// another fails; the first failure is returned.
    pub async fn start_all(&mut self, tokens: &[String]) -> Result<()> {
        let results = join_all(
            tokens
                .iter()
                .enumerate()
                .map(|(index, token)| self.spawn_worker(index, token)),
        )
        .await;

        let mut first_err = None;
        for result in results {
            match result {
                Ok(worker) => self.workers.push(worker),
                Err(e) => {
                    error!("Failed to start worker: {:#}", e);
                    first_err.get_or_insert(e);
                }
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Stop every worker and wait until all of them are done.
    pub async fn shutdown_all(&mut self) {
        join_all(self.workers.drain(..).map(Worker::stop)).await;
    }

    /// Start all workers, wait for Ctrl-C, then stop them.
    pub async fn run(mut self, tokens: &[String]) -> Result<()> {
        let outcome = match self.start_all(tokens).await {
            Ok(()) => {
                let usernames: Vec<&str> = self.workers.iter().map(Worker::username).collect();
                info!("Running as {:?}, press Ctrl-C to stop", usernames);
                tokio::signal::ctrl_c()
                    .await
                    .context("Failed to listen for Ctrl-C")
            }
            Err(e) => Err(e),
        };

        info!("Shutting down");
        self.shutdown_all().await;
        outcome
    }
}
