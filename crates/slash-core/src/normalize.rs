//! Command normalization
//!
//! Turns a [`ParsedCommand`] into the text that is safe to embed in an
//! HTML-formatted reply.

use std::sync::LazyLock;

use quick_xml::escape::partial_escape;
use regex::Regex;

use crate::grammar::ParsedCommand;

static ESCAPED_WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\(\s)").expect("valid escaped whitespace regex"));

/// Escape HTML entities (`&`, `<`, `>`).
pub fn escape_markup(text: &str) -> String {
    partial_escape(text).into_owned()
}

/// Normalized sentence command, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedCommand {
    pub predicate: String,
    /// Empty when the command had no complement.
    pub complement: String,
    pub swap: bool,
    pub strict: bool,
    pub omit_particle: bool,
}

impl NormalizedCommand {
    pub fn has_complement(&self) -> bool {
        !self.complement.is_empty()
    }

    /// Same command with a different predicate and complement.
    pub fn with_text(&self, predicate: String, complement: String) -> Self {
        Self {
            predicate,
            complement,
            ..self.clone()
        }
    }
}

/// Per-bot normalizer; strips the bot's own `@username` from predicates.
#[derive(Debug, Clone)]
pub struct CommandNormalizer {
    self_mention: Option<Regex>,
}

impl CommandNormalizer {
    /// Normalizer for a bot with the given username (without `@`).
    pub fn new(bot_username: &str) -> Self {
        let self_mention = Regex::new(&format!("(?i){}", regex::escape(&format!("@{bot_username}"))))
            .ok();
        Self { self_mention }
    }

    /// Normalizer that leaves mentions untouched.
    pub fn anonymous() -> Self {
        Self { self_mention: None }
    }

    pub fn normalize(&self, parsed: &ParsedCommand) -> NormalizedCommand {
        let predicate = ESCAPED_WHITESPACE_RE.replace_all(&parsed.predicate, "$1");
        let predicate = match &self.self_mention {
            Some(re) => re.replace_all(&predicate, "").into_owned(),
            None => predicate.into_owned(),
        };

        NormalizedCommand {
            predicate: escape_markup(&predicate),
            complement: escape_markup(parsed.complement.as_deref().unwrap_or_default()),
            swap: parsed.marker.swaps(),
            strict: parsed.marker.is_strict(),
            omit_particle: parsed.omit_particle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{Marker, parse_sentence};

    fn normalize(text: &str) -> NormalizedCommand {
        CommandNormalizer::new("SlashBot").normalize(&parse_sentence(text).unwrap())
    }

    #[test]
    fn escape_markup_handles_ampersand_once() {
        assert_eq!(escape_markup("<b>&x"), "&lt;b&gt;&amp;x");
        assert_eq!(escape_markup("&lt;"), "&amp;lt;");
        assert_eq!(escape_markup("plain 文字"), "plain 文字");
    }

    #[test]
    fn escaped_space_becomes_single_token() {
        let cmd = normalize("/a\\ b");
        assert_eq!(cmd.predicate, "a b");
        assert!(!cmd.has_complement());
    }

    #[test]
    fn escaped_space_then_complement() {
        let cmd = normalize("/give\\ up on <life>");
        assert_eq!(cmd.predicate, "give up");
        assert_eq!(cmd.complement, "on &lt;life&gt;");
    }

    #[test]
    fn self_mention_is_removed_case_insensitively() {
        assert_eq!(normalize("/hug@slashbot").predicate, "hug");
        assert_eq!(normalize("/hug@SLASHBOT").predicate, "hug");
        assert_eq!(normalize("/hug@otherbot").predicate, "hug@otherbot");
    }

    #[test]
    fn anonymous_normalizer_keeps_mentions() {
        let parsed = parse_sentence("/hug@slashbot").unwrap();
        let cmd = CommandNormalizer::anonymous().normalize(&parsed);
        assert_eq!(cmd.predicate, "hug@slashbot");
    }

    #[test]
    fn swap_follows_marker_family() {
        for (text, swap, strict) in [
            ("/a", false, false),
            ("/$a", false, true),
            ("\\a", true, true),
            ("\\$a", true, true),
        ] {
            let cmd = normalize(text);
            assert_eq!(cmd.swap, swap, "{text}");
            assert_eq!(cmd.strict, strict, "{text}");
        }
        assert!(Marker::Alt.swaps());
    }

    #[test]
    fn omit_particle_is_carried() {
        assert!(normalize("/eat\\").omit_particle);
        assert!(!normalize("/eat").omit_particle);
    }
}
