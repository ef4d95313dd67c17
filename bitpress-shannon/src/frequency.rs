//! Word frequency table built during the first encoding pass.

use std::collections::HashMap;

/// Occurrence counts per distinct word, in first-occurrence order.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    entries: Vec<(u64, u64)>,
    index: HashMap<u64, usize>,
    total: u64,
}

impl FrequencyTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table by counting every word in `words`.
    pub fn from_words(words: impl IntoIterator<Item = u64>) -> Self {
        let mut table = Self::new();
        for word in words {
            table.add(word);
        }
        table
    }

    /// Count one occurrence of `word`.
    pub fn add(&mut self, word: u64) {
        self.add_count(word, 1);
    }

    /// Count `count` occurrences of `word`.
    pub fn add_count(&mut self, word: u64, count: u64) {
        let next = self.entries.len();
        let slot = *self.index.entry(word).or_insert(next);
        if slot == next {
            self.entries.push((word, 0));
        }
        self.entries[slot].1 += count;
        self.total += count;
    }

    /// Occurrences of `word` (0 if never seen).
    pub fn count(&self, word: u64) -> u64 {
        self.index.get(&word).map_or(0, |&slot| self.entries[slot].1)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no word has been counted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// `(word, count)` pairs in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.entries.iter().copied()
    }

    /// `(word, count)` pairs by descending count; equal counts keep
    /// first-occurrence order.
    pub fn sorted_by_frequency(&self) -> Vec<(u64, u64)> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted
    }
}
