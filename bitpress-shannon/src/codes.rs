//! Shannon-Fano code construction.
//!
//! Words are sorted by descending frequency and the list is split
//! recursively: each split point is the first index at which the running
//! count reaches half of the partition's total (integer division). Words
//! left of the split get a `0` appended to their code, words right of it a
//! `1`, until every partition holds a single word.

use crate::frequency::FrequencyTable;
use std::collections::HashMap;
use tracing::debug;

/// A prefix-free code: `0`/`1` values, first bit first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Code(pub Vec<u8>);

impl Code {
    /// The code's bits.
    pub fn bits(&self) -> &[u8] {
        &self.0
    }

    /// Code length in bits.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the code has no bits.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for bit in &self.0 {
            write!(f, "{bit}")?;
        }
        Ok(())
    }
}

/// One row of a [`CodeTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeEntry {
    /// The coded word.
    pub word: u64,
    /// Occurrences counted in the first pass.
    pub frequency: u64,
    /// The word's code.
    pub code: Code,
}

/// Word-to-code mapping, in descending frequency order.
#[derive(Debug, Clone, Default)]
pub struct CodeTable {
    entries: Vec<CodeEntry>,
    index: HashMap<u64, usize>,
}

impl CodeTable {
    /// Build codes for every word in `frequencies`.
    pub fn build(frequencies: &FrequencyTable) -> Self {
        let mut entries: Vec<CodeEntry> = frequencies
            .sorted_by_frequency()
            .into_iter()
            .map(|(word, frequency)| CodeEntry {
                word,
                frequency,
                code: Code::default(),
            })
            .collect();

        if entries.len() == 1 {
            entries[0].code.0.push(0);
        } else {
            assign_codes(&mut entries);
        }

        let index = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.word, i))
            .collect();

        let table = Self { entries, index };
        debug!(
            words = table.len(),
            max_code_len = table.max_code_len(),
            "built shannon-fano codes"
        );
        table
    }

    /// Code for `word`, if it was counted.
    pub fn code(&self, word: u64) -> Option<&Code> {
        self.index.get(&word).map(|&i| &self.entries[i].code)
    }

    /// Number of coded words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in descending frequency order.
    pub fn iter(&self) -> impl Iterator<Item = &CodeEntry> {
        self.entries.iter()
    }

    /// Length of the longest code.
    pub fn max_code_len(&self) -> usize {
        self.entries.iter().map(|e| e.code.len()).max().unwrap_or(0)
    }

    /// Mean code length weighted by `frequencies` (0.0 when empty).
    pub fn average_code_length(&self, frequencies: &FrequencyTable) -> f64 {
        let total = frequencies.total();
        if total == 0 {
            return 0.0;
        }
        let bits: u64 = frequencies
            .iter()
            .map(|(word, count)| count * self.code(word).map_or(0, |c| c.len() as u64))
            .sum();
        bits as f64 / total as f64
    }

    /// Total payload size in bits for the counted words.
    pub fn encoded_bits(&self) -> u64 {
        self.entries
            .iter()
            .map(|e| e.frequency * e.code.len() as u64)
            .sum()
    }
}

/// Split point for a sorted partition: one past the first index whose
/// running count reaches `total / 2`, keeping both halves non-empty.
fn split_point(entries: &[CodeEntry]) -> usize {
    let half = entries.iter().map(|e| e.frequency).sum::<u64>() / 2;
    let mut running = 0;
    let mut split = entries.len();
    for (i, entry) in entries.iter().enumerate() {
        running += entry.frequency;
        if running >= half {
            split = i + 1;
            break;
        }
    }
    split.min(entries.len() - 1)
}

fn assign_codes(entries: &mut [CodeEntry]) {
    let mut work = vec![0..entries.len()];

    while let Some(range) = work.pop() {
        if range.len() < 2 {
            continue;
        }

        let partition = &mut entries[range.clone()];
        let split = split_point(partition);
        let (left, right) = partition.split_at_mut(split);
        for entry in left {
            entry.code.0.push(0);
        }
        for entry in right {
            entry.code.0.push(1);
        }

        let mid = range.start + split;
        work.push(mid..range.end);
        work.push(range.start..mid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(table: &CodeTable) -> Vec<(u64, String)> {
        table
            .iter()
            .map(|e| (e.word, e.code.to_string()))
            .collect()
    }

    #[test]
    fn test_three_words() {
        let mut frequencies = FrequencyTable::new();
        frequencies.add_count(0x62, 5);
        frequencies.add_count(0x61, 11);
        frequencies.add_count(0x63, 2);

        let table = CodeTable::build(&frequencies);
        assert_eq!(
            codes(&table),
            vec![
                (0x61, "0".to_string()),
                (0x62, "10".to_string()),
                (0x63, "11".to_string())
            ]
        );
        assert_eq!(table.encoded_bits(), 11 + 10 + 4);
    }

    #[test]
    fn test_single_word_gets_one_bit() {
        let frequencies = FrequencyTable::from_words([42; 100]);
        let table = CodeTable::build(&frequencies);
        assert_eq!(table.code(42), Some(&Code(vec![0])));
        assert_eq!(table.encoded_bits(), 100);
    }

    #[test]
    fn test_empty_table() {
        let table = CodeTable::build(&FrequencyTable::new());
        assert!(table.is_empty());
        assert_eq!(table.max_code_len(), 0);
    }

    #[test]
    fn test_codes_are_prefix_free() {
        let words: Vec<u64> = (0..500u64).map(|i| (i * i + 3 * i) % 37).collect();
        let frequencies = FrequencyTable::from_words(words);
        let table = CodeTable::build(&frequencies);
        assert_eq!(table.len(), frequencies.len());

        let all: Vec<&Code> = table.iter().map(|e| &e.code).collect();
        for (i, a) in all.iter().enumerate() {
            for (j, b) in all.iter().enumerate() {
                if i != j {
                    assert!(!b.bits().starts_with(a.bits()), "{a} is a prefix of {b}");
                }
            }
        }
    }

    #[test]
    fn test_equal_frequencies_give_balanced_codes() {
        let frequencies = FrequencyTable::from_words([1, 2, 3, 4]);
        let table = CodeTable::build(&frequencies);
        assert_eq!(
            codes(&table),
            vec![
                (1, "00".to_string()),
                (2, "01".to_string()),
                (3, "10".to_string()),
                (4, "11".to_string())
            ]
        );
        assert_eq!(table.average_code_length(&frequencies), 2.0);
    }

    #[test]
    fn test_frequent_words_get_shorter_codes() {
        let mut frequencies = FrequencyTable::new();
        for (word, count) in [(1, 1000), (2, 200), (3, 100), (4, 50), (5, 10), (6, 5)] {
            frequencies.add_count(word, count);
        }
        let table = CodeTable::build(&frequencies);
        let lengths: Vec<usize> = table.iter().map(|e| e.code.len()).collect();
        assert!(lengths.windows(2).all(|w| w[0] <= w[1]), "{lengths:?}");
        assert!(table.average_code_length(&frequencies) < 2.0);
    }
}
