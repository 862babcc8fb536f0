//! Command grammar
//!
//! Recognizes the four message shapes the bot reacts to: the cheering
//! stroke pattern, the pin trigger, a burst of bare markers, and the
//! sentence command `<marker><predicate>[ <complement>]`.

use std::sync::LazyLock;

use regex::Regex;

static CHEER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:",
        r"\\+ .* /+",
        r"|＼+ .* ／+",
        r"|(?:\\.*/\s*){2,}",
        r"|(?:＼.*／\s*){2,}",
        r"|\\{2,}/{2,}",
        r"|＼{2,}／{2,}",
        r")$",
    ))
    .expect("valid cheer regex")
});

static PIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\\/]_?pin$").expect("valid pin regex"));

static MARKER_BURST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[\\/]_?){2,}$").expect("valid marker burst regex"));

/// Leading delimiter of a sentence command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// `/`
    Plain,
    /// `/$`
    PlainStrict,
    /// `\`
    Alt,
    /// `\$`
    AltStrict,
}

impl Marker {
    /// Alt markers exchange subject and target before rendering.
    pub fn swaps(self) -> bool {
        matches!(self, Self::Alt | Self::AltStrict)
    }

    /// Strict markers pick the alternate exclamation for an empty predicate.
    pub fn is_strict(self) -> bool {
        !matches!(self, Self::Plain)
    }

    /// Byte length of the marker in the message.
    fn len(self) -> usize {
        match self {
            Self::Plain | Self::Alt => 1,
            Self::PlainStrict | Self::AltStrict => 2,
        }
    }

    fn from_prefix(text: &str) -> Option<Self> {
        let mut chars = text.chars();
        let alt = match chars.next()? {
            '/' => false,
            '\\' => true,
            _ => return None,
        };
        let dollar = chars.next() == Some('$');
        Some(match (alt, dollar) {
            (false, false) => Self::Plain,
            (false, true) => Self::PlainStrict,
            (true, false) => Self::Alt,
            (true, true) => Self::AltStrict,
        })
    }
}

/// A sentence command as written, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub marker: Marker,
    /// Predicate with escaped whitespace still in `\<ws>` form and the
    /// particle-omitting trailing backslash removed.
    pub predicate: String,
    pub complement: Option<String>,
    pub omit_particle: bool,
}

/// True for the cheering stroke pattern (`\ ... /`, `\\//`, `＼ ... ／`, ...).
pub fn is_cheer(text: &str) -> bool {
    CHEER_RE.is_match(text)
}

/// True for `/pin`, `\pin`, `/_pin` and `\_pin`.
pub fn is_pin(text: &str) -> bool {
    PIN_RE.is_match(text)
}

/// True for two or more bare markers such as `//`, `\/\`, `/_/_`.
pub fn is_marker_burst(text: &str) -> bool {
    MARKER_BURST_RE.is_match(text)
}

/// Parse a sentence command.
///
/// Returns `None` when the text does not start with a marker, or when the
/// predicate is empty but a complement follows.
pub fn parse_sentence(text: &str) -> Option<ParsedCommand> {
    let marker = Marker::from_prefix(text)?;
    let body = &text[marker.len()..];

    let mut predicate_end = body.len();
    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        if c == '\\' {
            // Backslash pairs with whatever follows; a lone one at the end stays.
            chars.next();
            continue;
        }
        if c.is_whitespace() {
            predicate_end = i;
            break;
        }
    }

    let raw_predicate = &body[..predicate_end];
    let complement = body[predicate_end..].trim_start();
    let complement = (!complement.is_empty()).then(|| complement.to_string());

    if raw_predicate.is_empty() && complement.is_some() {
        return None;
    }

    let (predicate, omit_particle) = match raw_predicate.strip_suffix('\\') {
        Some(stripped) => (stripped, true),
        None => (raw_predicate, false),
    };

    Some(ParsedCommand {
        marker,
        predicate: predicate.to_string(),
        complement,
        omit_particle,
    })
}
