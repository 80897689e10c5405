//! Operator table-text parsing.
//!
//! Input is free-form line-oriented text: each useful line is a game number
//! followed by a suit token, optionally bracketed (`6 [❤️]`, `12 (♣)`,
//! `18 ♠️`). Lines that do not start with a number are skipped silently;
//! a number followed by an unreadable suit token is collected as an error.
//! The whole batch is parsed regardless of individual bad lines.

use super::LookupTable;
use crate::suit::{Suit, VARIANT_SELECTOR};

/// Maximum characters of the offending line echoed into an error string.
const ERROR_LINE_PREVIEW: usize = 30;

enum LineResult {
    Entry(u64, Suit),
    Skip,
    BadSuit(String),
}

/// Parse table text into a candidate table plus an ordered list of error
/// strings. Duplicate numbers resolve last-line-wins. Pure transform, no
/// side effects.
pub fn parse_table_text(text: &str) -> (LookupTable, Vec<String>) {
    let mut table = LookupTable::new();
    let mut errors = Vec::new();

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        match parse_line(line) {
            LineResult::Entry(number, suit) => table.insert(number, suit),
            LineResult::Skip => {}
            LineResult::BadSuit(token) => {
                let preview: String = line.chars().take(ERROR_LINE_PREVIEW).collect();
                errors.push(format!("unknown suit {token:?} (line: {preview})"));
            }
        }
    }

    (table, errors)
}

fn parse_line(line: &str) -> LineResult {
    let digits_end = line
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(line.len());
    if digits_end == 0 {
        return LineResult::Skip;
    }
    let Ok(number) = line[..digits_end].parse::<u64>() else {
        return LineResult::Skip;
    };

    let mut rest = line[digits_end..].trim_start();
    rest = rest.strip_prefix(['[', '(']).unwrap_or(rest).trim_start();

    // Operator tables spell suits in the U+2764-family glyphs, with or
    // without the variant selector.
    let token: String = rest
        .chars()
        .take_while(|&c| matches!(c, '❤' | '♦' | '♣' | '♠' | VARIANT_SELECTOR))
        .collect();
    if token.is_empty() {
        return LineResult::Skip;
    }

    match token.chars().next().and_then(Suit::from_glyph) {
        Some(suit) => LineResult::Entry(number, suit),
        None => LineResult::BadSuit(token),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bracketed_and_bare_tokens() {
        let (table, errors) = parse_table_text("6 [❤️]\n12 (♣)\n18 ♠️\n24♦");
        assert!(errors.is_empty());
        assert_eq!(table.get(6), Some(Suit::Hearts));
        assert_eq!(table.get(12), Some(Suit::Clubs));
        assert_eq!(table.get(18), Some(Suit::Spades));
        assert_eq!(table.get(24), Some(Suit::Diamonds));
    }

    #[test]
    fn lines_without_leading_number_are_skipped_silently() {
        let (table, errors) = parse_table_text("header line\n# comment\n6 [♦️]\n\n  \n");
        assert!(errors.is_empty());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn number_with_unreadable_suit_is_an_error() {
        // A lone variant selector is a suit-ish token that maps to nothing.
        let (table, errors) = parse_table_text("6 [\u{fe0f}]\n12 [♠️]");
        assert_eq!(table.len(), 1);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("unknown suit"));
    }

    #[test]
    fn number_followed_by_plain_text_is_skipped_not_errored() {
        let (table, errors) = parse_table_text("12 points\n6 [♣️]");
        assert!(errors.is_empty());
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(6), Some(Suit::Clubs));
    }

    #[test]
    fn duplicate_numbers_use_last_line() {
        let (table, errors) = parse_table_text("6 [❤️]\n6 [♠️]");
        assert!(errors.is_empty());
        assert_eq!(table.get(6), Some(Suit::Spades));
    }

    #[test]
    fn parsing_a_listing_is_idempotent() {
        let (table, errors) = parse_table_text("6 [❤️]\n12 [♣️]\n18 [❤️]\n30 [♦]");
        assert!(errors.is_empty());
        let (reparsed, reparse_errors) = parse_table_text(&table.to_listing());
        assert!(reparse_errors.is_empty());
        assert_eq!(reparsed, table);
    }

    #[test]
    fn error_lines_do_not_abort_the_batch() {
        let (table, errors) = parse_table_text("1 [♦️]\n2 [\u{fe0f}]\n3 [♣️]");
        assert_eq!(table.len(), 2);
        assert_eq!(errors.len(), 1);
    }
}
