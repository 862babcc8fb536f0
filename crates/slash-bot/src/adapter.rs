//! Conversion from teloxide messages to command-engine identities

#[cfg(test)]
#[path = "adapter_tests.rs"]
mod adapter_tests;

use slash_core::{ReplyContext, SenderIdentity};
use teloxide::types::{Chat, Message, MessageKind, User};

/// Identity that sent `msg`; a chat posting as itself wins over the user.
pub fn sender_identity(msg: &Message) -> Option<SenderIdentity> {
    if let Some(chat) = &msg.sender_chat {
        return Some(chat_identity(chat));
    }
    msg.from.as_ref().map(user_identity)
}

fn user_identity(user: &User) -> SenderIdentity {
    SenderIdentity {
        id: user.id.0 as i64,
        name: user.full_name(),
        handle: user.username.clone(),
    }
}

fn chat_identity(chat: &Chat) -> SenderIdentity {
    let name = chat
        .title()
        .or_else(|| chat.first_name())
        .unwrap_or_default()
        .to_string();
    SenderIdentity {
        id: chat.id.0,
        name,
        handle: chat.username().map(|s| s.to_string()),
    }
}

/// The replied-to message as the command engine sees it.
pub fn reply_context(msg: &Message) -> Option<ReplyContext> {
    let reply = msg.reply_to_message()?;
    Some(ReplyContext {
        sender: sender_identity(reply)?,
        is_topic_created_notice: reply.forum_topic_created().is_some(),
    })
}

/// The replied-to message, unless it is the topic-creation notice every
/// topic message implicitly replies to.
pub fn effective_reply(msg: &Message) -> Option<&Message> {
    msg.reply_to_message()
        .filter(|reply| reply.forum_topic_created().is_none())
}

pub fn has_protected_content(msg: &Message) -> bool {
    matches!(&msg.kind, MessageKind::Common(common) if common.has_protected_content)
}
