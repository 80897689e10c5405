//! Card suit symbols and their canonicalization.
//!
//! The same suit arrives in several visual spellings: each glyph appears
//! with or without the U+FE0F emoji variant selector, and hearts have two
//! base glyphs (U+2764 in operator tables, U+2665 in feed messages). All
//! spellings funnel into one enum here, so every later comparison is plain
//! equality.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Emoji variant selector, ignored when reading suit tokens.
pub const VARIANT_SELECTOR: char = '\u{fe0f}';

/// The four suits a table entry can predict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    /// Fixed order used when listing observed suits (insertion order of the
    /// canonical list, never input order).
    pub const CANONICAL_ORDER: [Suit; 4] = [Suit::Hearts, Suit::Spades, Suit::Diamonds, Suit::Clubs];

    /// Map a single glyph to its suit. Accepts both heart base glyphs.
    pub fn from_glyph(c: char) -> Option<Suit> {
        match c {
            '❤' | '♥' => Some(Suit::Hearts),
            '♦' => Some(Suit::Diamonds),
            '♣' => Some(Suit::Clubs),
            '♠' => Some(Suit::Spades),
            _ => None,
        }
    }

    /// Display glyph with emoji presentation, as written in operator tables.
    pub fn glyph(&self) -> &'static str {
        match self {
            Suit::Hearts => "❤️",
            Suit::Diamonds => "♦️",
            Suit::Clubs => "♣️",
            Suit::Spades => "♠️",
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

impl From<Suit> for String {
    fn from(suit: Suit) -> String {
        suit.glyph().to_string()
    }
}

impl TryFrom<String> for Suit {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value
            .chars()
            .find_map(Suit::from_glyph)
            .ok_or_else(|| format!("unrecognized suit glyph: {value:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_heart_glyphs_normalize_to_hearts() {
        assert_eq!(Suit::from_glyph('❤'), Some(Suit::Hearts));
        assert_eq!(Suit::from_glyph('♥'), Some(Suit::Hearts));
    }

    #[test]
    fn string_form_round_trips() {
        for suit in Suit::CANONICAL_ORDER {
            let s: String = suit.into();
            assert_eq!(Suit::try_from(s), Ok(suit));
        }
    }

    #[test]
    fn variant_selector_is_not_a_suit() {
        assert_eq!(Suit::from_glyph(VARIANT_SELECTOR), None);
    }

    #[test]
    fn bare_and_selector_spellings_parse_alike() {
        assert_eq!(Suit::try_from("♦".to_string()), Ok(Suit::Diamonds));
        assert_eq!(Suit::try_from("♦️".to_string()), Ok(Suit::Diamonds));
    }
}
