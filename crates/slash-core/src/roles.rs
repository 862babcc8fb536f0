//! Participant roles of a sentence command
//!
//! The sender is the subject; the author of the replied-to message is the
//! target. Without a reply the sender targets themselves, unless the
//! command names someone with an inline `@mention`.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::Result;
use crate::normalize::NormalizedCommand;
use crate::participant::Participant;
use crate::render::RenderContext;

static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([a-zA-Z]\w{4,})").expect("valid mention regex"));

/// Who sent a message: a user, or a chat posting as itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderIdentity {
    pub id: i64,
    /// Full name of a user, or title of a chat.
    pub name: String,
    pub handle: Option<String>,
}

impl SenderIdentity {
    pub fn to_participant(&self) -> Result<Participant> {
        Participant::new(Some(self.id), Some(self.name.clone()), self.handle.clone())
    }
}

/// The message a command replies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyContext {
    pub sender: SenderIdentity,
    /// The transport points topic messages at the topic-creation notice
    /// when they reply to nothing.
    pub is_topic_created_notice: bool,
}

impl ReplyContext {
    /// `None` for the synthetic reply to a topic-creation notice.
    pub fn effective(reply: Option<&ReplyContext>) -> Option<&ReplyContext> {
        reply.filter(|r| !r.is_topic_created_notice)
    }
}

/// Build the render context for a command sent by `sender`.
///
/// Applies the `@mention` override when there is no real reply target.
pub fn assign_roles(
    sender: &SenderIdentity,
    reply: Option<&ReplyContext>,
    command: NormalizedCommand,
) -> Result<RenderContext> {
    let subject = sender.to_participant()?;
    let target = match ReplyContext::effective(reply) {
        Some(reply) => reply.sender.to_participant()?,
        None => sender.to_participant()?,
    };

    let (target, command) = if subject == target {
        match take_mention(&command) {
            Some((handle, command)) => {
                debug!(handle = %handle, "Target taken from inline mention");
                (Participant::from_handle(handle), command)
            }
            None => (target, command),
        }
    } else {
        (target, command)
    };

    Ok(RenderContext::new(subject, target, command))
}

/// Find the first mention in the predicate, else in the complement, and
/// return its handle with the command minus the mention.
fn take_mention(command: &NormalizedCommand) -> Option<(String, NormalizedCommand)> {
    if let Some(caps) = MENTION_RE.captures(&command.predicate) {
        let (whole, handle) = (caps.get(0)?, caps.get(1)?);
        let predicate = command.predicate[..whole.start()].to_string();
        return Some((
            handle.as_str().to_string(),
            command.with_text(predicate, command.complement.clone()),
        ));
    }

    let caps = MENTION_RE.captures(&command.complement)?;
    let (whole, handle) = (caps.get(0)?, caps.get(1)?);
    let complement = format!(
        "{}{}",
        &command.complement[..whole.start()],
        &command.complement[whole.end()..]
    );
    Some((
        handle.as_str().to_string(),
        command.with_text(command.predicate.clone(), complement.trim().to_string()),
    ))
}
