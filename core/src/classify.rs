//! Source-message classification.
//!
//! A raw feed message yields three facts: which game number it reports,
//! which suits appear in its first parenthesized group, and where it is in
//! its lifecycle (still being edited, finalized, or provisional). Messages
//! without a recognizable number are ignored upstream.

use crate::suit::Suit;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Prefix glyph the source places on a result it is still finalizing.
const EDITING_MARKER: char = '⏰';
/// Glyphs that mark a settled result, safe to evaluate.
const FINALIZED_MARKERS: [char; 2] = ['✅', '🔰'];

static NUMBER_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)#N\s*(\d+)").expect("invalid number tag pattern"));

/// Positional fallbacks, tried in order when the explicit tag is absent.
static NUMBER_FALLBACKS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^#(\d+)",
        r"(?i)N\s*(\d+)",
        r"(?i)Numéro\s*(\d+)",
        r"(?i)Game\s*(\d+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid fallback pattern"))
    .collect()
});

static FIRST_GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([^)]+)\)").expect("invalid group pattern"));

/// One classified source-feed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMessage {
    pub number: u64,
    /// Suits observed in the first parenthesized group, in canonical order.
    pub suits: Vec<Suit>,
    pub editing: bool,
    pub finalized: bool,
}

impl SourceMessage {
    /// An editing message that has not been finalized is not safe to
    /// evaluate yet; editing takes precedence over finalization markers
    /// being absent.
    pub fn is_settled(&self) -> bool {
        self.finalized || !self.editing
    }
}

/// Classify a raw message body. `None` when no game number is found.
pub fn classify(text: &str) -> Option<SourceMessage> {
    let number = extract_game_number(text)?;
    Some(SourceMessage {
        number,
        suits: extract_suits(text),
        editing: is_editing(text),
        finalized: is_finalized(text),
    })
}

/// Find the game number: the explicit `#N` tag wins, then the positional
/// fallbacks in priority order.
pub fn extract_game_number(text: &str) -> Option<u64> {
    if let Some(caps) = NUMBER_TAG.captures(text)
        && let Ok(n) = caps[1].parse()
    {
        return Some(n);
    }
    NUMBER_FALLBACKS
        .iter()
        .find_map(|re| re.captures(text).and_then(|caps| caps[1].parse().ok()))
}

/// Suits present in the first parenthesized group, reported in the fixed
/// canonical order regardless of how the group spells or orders them.
pub fn extract_suits(text: &str) -> Vec<Suit> {
    let Some(caps) = FIRST_GROUP.captures(text) else {
        return Vec::new();
    };
    let observed: HashSet<Suit> = caps[1].chars().filter_map(Suit::from_glyph).collect();
    Suit::CANONICAL_ORDER
        .iter()
        .copied()
        .filter(|s| observed.contains(s))
        .collect()
}

fn is_editing(text: &str) -> bool {
    text.trim_start().starts_with(EDITING_MARKER)
}

fn is_finalized(text: &str) -> bool {
    FINALIZED_MARKERS.iter().any(|m| text.contains(*m))
}
