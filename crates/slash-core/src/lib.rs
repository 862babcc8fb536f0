//! Command engine for slash-bot
//!
//! Recognizes the slash/backslash command grammar embedded in chat
//! messages, resolves the two participants of a command and renders
//! the resulting "subject verb object" sentence. Also hosts the
//! fairness-randomized picker used for cosmetic replies and stickers.

pub mod error;
pub mod fair;
pub mod grammar;
#[cfg(any(test, feature = "test-support"))]
pub mod mocks;
pub mod normalize;
pub mod participant;
pub mod phrases;
pub mod profile;
pub mod render;
pub mod roles;
pub mod trigger;

// Re-export commonly used types
pub use error::{Error, LookupError, Result};
pub use fair::{FairPool, FairRegistry};
pub use grammar::{Marker, ParsedCommand};
pub use normalize::{CommandNormalizer, NormalizedCommand};
pub use participant::{Participant, ResolutionState};
pub use profile::{HttpProfileLookup, ProfileLookup};
pub use render::RenderContext;
pub use roles::{ReplyContext, SenderIdentity};
pub use trigger::Trigger;
