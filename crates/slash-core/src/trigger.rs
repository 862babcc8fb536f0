//! Trigger classification
//!
//! Decides which of the bot's reactions a message asks for. Patterns are
//! checked in priority order because the sentence marker overlaps with
//! the other three.

use tracing::trace;

use crate::grammar::{self, ParsedCommand};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Cheering stroke pattern: re-broadcast the message.
    Cheer,
    /// Pin the replied-to message.
    Pin,
    /// Reply with a random sticker.
    RandomSticker,
    /// Render a sentence.
    Sentence(ParsedCommand),
}

impl Trigger {
    /// Classify a message text; `None` when the bot should stay silent.
    pub fn classify(text: &str) -> Option<Self> {
        let trigger = if grammar::is_cheer(text) {
            Some(Self::Cheer)
        } else if grammar::is_pin(text) {
            Some(Self::Pin)
        } else if grammar::is_marker_burst(text) {
            Some(Self::RandomSticker)
        } else {
            grammar::parse_sentence(text).map(Self::Sentence)
        };

        if trigger.is_none() {
            trace!("Not a command: {:?}", text);
        }
        trigger
    }
}
