//! Message handlers for the command triggers

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod handlers_tests;


use std::sync::Arc;

use slash_core::phrases;
use slash_core::roles::assign_roles;
use slash_core::{
    CommandNormalizer, FairRegistry, HttpProfileLookup, ParsedCommand, ProfileLookup,
    ReplyContext, SenderIdentity, Trigger,
};
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{InputFile, Message, MessageId, ParseMode, ReplyParameters, ThreadId};
use tracing::{Instrument, Span, debug, error, info, info_span, warn};

use crate::adapter::{effective_reply, has_protected_content, reply_context, sender_identity};
use crate::errors::{self, ErrorOutcome};

/// Keeps right-to-left names from flipping the rendered sentence.
pub const LEFT_TO_RIGHT_MARK: char = '\u{200e}';

pub type HandlerResult = anyhow::Result<()>;

/// Per-bot state shared by every handler invocation.
pub struct BotContext {
    pub normalizer: CommandNormalizer,
    pub lookup: HttpProfileLookup,
    pub registry: Arc<FairRegistry<String>>,
    /// Carries `@username`; handlers run on dispatcher workers outside it.
    pub span: Span,
}

impl BotContext {
    pub fn new(
        username: &str,
        lookup: HttpProfileLookup,
        registry: Arc<FairRegistry<String>>,
    ) -> Self {
        Self {
            normalizer: CommandNormalizer::new(username),
            lookup,
            registry,
            span: info_span!("bot", username = %format!("@{username}")),
        }
    }
}

/// Update tree: plain text messages that classify as a trigger.
pub fn schema() -> UpdateHandler<anyhow::Error> {
    Update::filter_message()
        .filter_map(|msg: Message| msg.text().and_then(Trigger::classify))
        .endpoint(handle_trigger)
}

async fn handle_trigger(
    bot: Bot,
    msg: Message,
    trigger: Trigger,
    ctx: Arc<BotContext>,
) -> HandlerResult {
    let span = ctx.span.clone();
    dispatch_trigger(bot, msg, trigger, ctx).instrument(span).await
}

async fn dispatch_trigger(
    bot: Bot,
    msg: Message,
    trigger: Trigger,
    ctx: Arc<BotContext>,
) -> HandlerResult {
    debug!(
        "Received trigger {:?} in chat {} (message {})",
        trigger, msg.chat.id.0, msg.id.0
    );

    match trigger {
        Trigger::Cheer => repeat(&bot, &msg).await,
        Trigger::Pin => pin(&bot, &msg, &ctx).await,
        Trigger::RandomSticker => random_sticker(&bot, &msg, &ctx).await,
        Trigger::Sentence(parsed) => reply_sentence(&bot, &msg, parsed, &ctx).await,
    }
}

fn topic_thread(msg: &Message) -> Option<ThreadId> {
    msg.thread_id.filter(|_| msg.is_topic_message)
}

/// Re-broadcast a cheering message: copy when protected, forward otherwise.
async fn repeat(bot: &Bot, msg: &Message) -> HandlerResult {
    if has_protected_content(msg) {
        let mut req = bot.copy_message(msg.chat.id, msg.chat.id, msg.id);
        req.message_thread_id = topic_thread(msg);
        req.await?;
    } else {
        let mut req = bot.forward_message(msg.chat.id, msg.chat.id, msg.id);
        req.message_thread_id = topic_thread(msg);
        req.await?;
    }
    info!("Repeated message {} in chat {}", msg.id.0, msg.chat.id.0);
    Ok(())
}

async fn reply_text(bot: &Bot, msg: &Message, reply_to: MessageId, text: String) -> HandlerResult {
    let mut req = bot.send_message(msg.chat.id, text);
    req.message_thread_id = topic_thread(msg);
    req.reply_parameters = Some(ReplyParameters::new(reply_to));
    req.await?;
    Ok(())
}

async fn pin_message(bot: &Bot, chat_id: ChatId, message_id: MessageId) -> ResponseResult<()> {
    let mut unpin = bot.unpin_chat_message(chat_id);
    unpin.message_id = Some(message_id);
    unpin.await?;

    let mut pin = bot.pin_chat_message(chat_id, message_id);
    pin.disable_notification = Some(true);
    pin.await?;
    Ok(())
}

/// Pin the replied-to message, or explain why not.
async fn pin(bot: &Bot, msg: &Message, ctx: &BotContext) -> HandlerResult {
    let Some(target) = effective_reply(msg) else {
        warn!("Pin without a target in chat {}", msg.chat.id.0);
        let text = phrases::pin_rejection(&ctx.registry)?;
        return reply_text(bot, msg, msg.id, text).await;
    };

    match pin_message(bot, msg.chat.id, target.id).await {
        Ok(()) => {
            info!("Pinned message {} in chat {}", target.id.0, msg.chat.id.0);
            Ok(())
        }
        Err(err) => match errors::classify("pin", &err) {
            ErrorOutcome::Refused(detail) => {
                let text = phrases::pin_apology(&ctx.registry, &detail)?;
                reply_text(bot, msg, target.id, text).await
            }
            ErrorOutcome::Propagate => Err(err.into()),
        },
    }
}

async fn random_sticker(bot: &Bot, msg: &Message, ctx: &BotContext) -> HandlerResult {
    let sticker = ctx.registry.draw(phrases::STICKERS)?;
    let mut req = bot.send_sticker(msg.chat.id, InputFile::file_id(sticker));
    req.message_thread_id = topic_thread(msg);
    req.reply_parameters = Some(ReplyParameters::new(msg.id));
    req.await?;
    info!("Sent sticker in chat {}", msg.chat.id.0);
    Ok(())
}

/// Render the reply for a sentence command, ready to send as HTML.
///
/// `Ok(None)` means the message gets no reply.
pub async fn render_reply<L: ProfileLookup>(
    normalizer: &CommandNormalizer,
    lookup: &L,
    sender: &SenderIdentity,
    reply: Option<&ReplyContext>,
    parsed: &ParsedCommand,
) -> slash_core::Result<Option<String>> {
    let command = normalizer.normalize(parsed);
    let ctx = match assign_roles(sender, reply, command) {
        Ok(ctx) => ctx,
        Err(err) => {
            debug!("Skipping sentence: {}", err);
            return Ok(None);
        }
    };
    let text = ctx.render(lookup).await?;
    Ok(Some(format!("{LEFT_TO_RIGHT_MARK}{text}")))
}

async fn reply_sentence(
    bot: &Bot,
    msg: &Message,
    parsed: ParsedCommand,
    ctx: &BotContext,
) -> HandlerResult {
    let Some(sender) = sender_identity(msg) else {
        debug!("Sentence without a sender in chat {}", msg.chat.id.0);
        return Ok(());
    };
    let reply = reply_context(msg);

    let rendered = render_reply(&ctx.normalizer, &ctx.lookup, &sender, reply.as_ref(), &parsed).await;
    let text = match rendered {
        Ok(Some(text)) => text,
        Ok(None) => return Ok(()),
        Err(err) => {
            error!("Failed to render sentence in chat {}: {}", msg.chat.id.0, err);
            return Ok(());
        }
    };

    let mut req = bot.send_message(msg.chat.id, text.as_str());
    req.parse_mode = Some(ParseMode::Html);
    req.message_thread_id = topic_thread(msg);
    req.reply_parameters = Some(ReplyParameters::new(msg.id));
    req.await?;

    info!("Replied in chat {}: {}", msg.chat.id.0, text);
    Ok(())
}
