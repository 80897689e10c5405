//! The prediction lookup table: an ordered mapping from game number to the
//! suit expected at that number.
//!
//! The table is replaced wholesale by operator uploads (never merged) and
//! persisted through [`store::TableStore`].

pub mod parser;
pub mod store;

use crate::suit::Suit;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered game-number → suit mapping. At most one suit per number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LookupTable {
    entries: BTreeMap<u64, Suit>,
}

impl LookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, number: u64) -> Option<Suit> {
        self.entries.get(&number).copied()
    }

    pub fn contains(&self, number: u64) -> bool {
        self.entries.contains_key(&number)
    }

    /// Insert one entry. A duplicate number silently overwrites (last wins).
    pub fn insert(&mut self, number: u64, suit: Suit) {
        self.entries.insert(number, suit);
    }

    /// Swap in a whole new table. Partial merges are never performed.
    pub fn replace(&mut self, other: LookupTable) {
        self.entries = other.entries;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending number order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, Suit)> + '_ {
        self.entries.iter().map(|(&n, &s)| (n, s))
    }

    /// Smallest and largest numbers present, if any.
    pub fn bounds(&self) -> Option<(u64, u64)> {
        let first = self.entries.keys().next()?;
        let last = self.entries.keys().next_back()?;
        Some((*first, *last))
    }

    /// Up to `limit` entries strictly after `after`, for status previews.
    pub fn upcoming(&self, after: u64, limit: usize) -> Vec<(u64, Suit)> {
        self.entries
            .range(after + 1..)
            .take(limit)
            .map(|(&n, &s)| (n, s))
            .collect()
    }

    /// Render the table in the same line format the parser accepts, so a
    /// listing can be fed straight back through an upload.
    pub fn to_listing(&self) -> String {
        let mut out = String::new();
        for (number, suit) in self.iter() {
            out.push_str(&format!("{number} [{suit}]\n"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LookupTable {
        let mut table = LookupTable::new();
        table.insert(6, Suit::Hearts);
        table.insert(12, Suit::Clubs);
        table.insert(18, Suit::Spades);
        table
    }

    #[test]
    fn replace_is_wholesale() {
        let mut table = sample();
        let mut incoming = LookupTable::new();
        incoming.insert(40, Suit::Diamonds);
        table.replace(incoming);
        assert_eq!(table.len(), 1);
        assert!(!table.contains(6));
        assert_eq!(table.get(40), Some(Suit::Diamonds));
    }

    #[test]
    fn upcoming_is_strictly_after() {
        let table = sample();
        let next = table.upcoming(6, 5);
        assert_eq!(next, vec![(12, Suit::Clubs), (18, Suit::Spades)]);
    }

    #[test]
    fn json_round_trip_preserves_entries() {
        let table = sample();
        let json = serde_json::to_string(&table).unwrap();
        let back: LookupTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn bounds_cover_extremes() {
        assert_eq!(sample().bounds(), Some((6, 18)));
        assert_eq!(LookupTable::new().bounds(), None);
    }
}
