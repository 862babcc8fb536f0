//! Sentence rendering
//!
//! Produces the HTML reply for a sentence command:
//!
//! | Predicate | Complement | Output |
//! |-----------|------------|--------|
//! | empty     | –          | `!` or `¡` (strict) |
//! | `me`      | optional   | `{subject}[ {complement}]` |
//! | `you`     | optional   | `{target}[ {complement}]` |
//! | other     | present    | `{subject} {predicate} {target} {complement}` |
//! | other     | absent     | `{subject} {predicate} 了 {target}` |
//!
//! Every non-empty form gets tail punctuation unless it already ends in a
//! sentence-final mark.

use tracing::trace;

use crate::error::Result;
use crate::normalize::NormalizedCommand;
use crate::participant::Participant;
use crate::profile::ProfileLookup;

/// Linking particle between predicate and target when no complement is given.
pub const LINKING_PARTICLE: &str = "了";

const PUNCTUATION_TAIL: &str = ".,?!;:~(。，？！；：～（";

/// Tail punctuation for text ending in `last`.
pub fn tail_for(last: char) -> &'static str {
    if PUNCTUATION_TAIL.contains(last) {
        ""
    } else if last.is_ascii() {
        "!"
    } else {
        "！"
    }
}

fn tail_of(text: &str) -> &'static str {
    text.chars().next_back().map(tail_for).unwrap_or_default()
}

/// Subject, target and command of one reply.
#[derive(Debug)]
pub struct RenderContext {
    subject: Participant,
    target: Participant,
    command: NormalizedCommand,
}

impl RenderContext {
    /// Assemble a context, exchanging roles for swapping commands unless the
    /// sender targets themselves.
    pub fn new(subject: Participant, target: Participant, command: NormalizedCommand) -> Self {
        let (subject, target) = if command.swap && subject != target {
            (target, subject)
        } else {
            (subject, target)
        };
        Self {
            subject,
            target,
            command,
        }
    }

    pub fn subject(&self) -> &Participant {
        &self.subject
    }

    pub fn target(&self) -> &Participant {
        &self.target
    }

    pub fn command(&self) -> &NormalizedCommand {
        &self.command
    }

    pub fn is_self_reference(&self) -> bool {
        self.subject == self.target
    }

    /// Resolve both participants concurrently, then compose the text.
    pub async fn render<L: ProfileLookup>(self, lookup: &L) -> Result<String> {
        if !self.command.predicate.is_empty() {
            tokio::try_join!(self.subject.resolve(lookup), self.target.resolve(lookup))?;
        }
        Ok(self.compose())
    }

    /// Compose the reply from whatever the participants currently know.
    pub fn compose(&self) -> String {
        let command = &self.command;
        let is_self = self.is_self_reference();
        let complement = command.complement.as_str();

        let text = match (command.predicate.as_str(), command.has_complement()) {
            ("", _) => {
                return if command.strict { "¡" } else { "!" }.to_string();
            }
            ("me", has_complement) => {
                let tail_source = if has_complement {
                    complement.to_string()
                } else {
                    self.subject.plain_name(false).into_owned()
                };
                let mut text = self.subject.mention(false);
                if has_complement {
                    text.push(' ');
                    text.push_str(complement);
                }
                text + tail_of(&tail_source)
            }
            ("you", has_complement) => {
                let tail_source = if has_complement {
                    complement.to_string()
                } else {
                    self.target.plain_name(is_self).into_owned()
                };
                let mut text = self.target.mention(is_self);
                if has_complement {
                    text.push(' ');
                    text.push_str(complement);
                }
                text + tail_of(&tail_source)
            }
            (predicate, true) => format!(
                "{} {} {} {}{}",
                self.subject.mention(false),
                predicate,
                self.target.mention(is_self),
                complement,
                tail_of(complement),
            ),
            (predicate, false) => {
                let particle = if command.omit_particle {
                    String::new()
                } else {
                    format!("{LINKING_PARTICLE} ")
                };
                format!(
                    "{} {} {}{}{}",
                    self.subject.mention(false),
                    predicate,
                    particle,
                    self.target.mention(is_self),
                    tail_of(&self.target.plain_name(is_self)),
                )
            }
        };

        trace!(text = %text, "Composed sentence");
        text
    }
}
