//! LZSS encoder configuration.

use bitpress_core::error::{BitpressError, Result};

/// Smallest accepted history field width.
pub const MIN_HISTORY_BITS: u8 = 1;
/// Largest accepted history field width (a 16 MiB window).
pub const MAX_HISTORY_BITS: u8 = 24;
/// Smallest accepted match-length field width.
pub const MIN_MATCH_BITS: u8 = 1;
/// Largest accepted match-length field width.
pub const MAX_MATCH_BITS: u8 = 16;

/// Size of a literal record: one tag bit plus one byte.
pub const LITERAL_RECORD_BITS: u32 = 9;

/// How many match candidates the encoder examines per position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchDepth {
    /// Examine every candidate and keep the longest.
    #[default]
    Exhaustive,
    /// Stop at the first candidate.
    First,
    /// Keep the longest of the first `n` candidates.
    BestOf(u32),
}

impl SearchDepth {
    /// Map a numeric depth (0 = exhaustive, 1 = first, n = best of n).
    pub fn from_depth(depth: u32) -> Self {
        match depth {
            0 => Self::Exhaustive,
            1 => Self::First,
            n => Self::BestOf(n),
        }
    }

    /// Numeric form of this depth.
    pub fn depth(&self) -> u32 {
        match self {
            Self::Exhaustive => 0,
            Self::First => 1,
            Self::BestOf(n) => *n,
        }
    }

    /// Maximum number of candidates to examine, or `None` for no limit.
    pub fn candidate_limit(&self) -> Option<usize> {
        match self {
            Self::Exhaustive => None,
            Self::First => Some(1),
            Self::BestOf(n) => Some(*n as usize),
        }
    }
}

impl std::fmt::Display for SearchDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exhaustive => write!(f, "exhaustive"),
            Self::First => write!(f, "first"),
            Self::BestOf(n) => write!(f, "best-of-{n}"),
        }
    }
}

/// LZSS encoding parameters.
///
/// Only `history_bits` and `match_bits` are written to the file header;
/// the search depth affects compression ratio and speed, not the format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LzssConfig {
    /// Width of the offset field; the history holds `2^history_bits - 1` bytes.
    pub history_bits: u8,
    /// Width of the length field; matches are at most `2^match_bits - 1` bytes.
    pub match_bits: u8,
    /// Match search policy.
    pub search: SearchDepth,
}

impl LzssConfig {
    /// Small window, first match found.
    pub const FAST: Self = Self {
        history_bits: 10,
        match_bits: 4,
        search: SearchDepth::First,
    };

    /// 4 KiB window, 15-byte matches, exhaustive search.
    pub const DEFAULT: Self = Self {
        history_bits: 12,
        match_bits: 4,
        search: SearchDepth::Exhaustive,
    };

    /// 16 KiB window, 63-byte matches, exhaustive search.
    pub const BEST: Self = Self {
        history_bits: 14,
        match_bits: 6,
        search: SearchDepth::Exhaustive,
    };

    /// Create a configuration with an exhaustive search.
    pub fn new(history_bits: u8, match_bits: u8) -> Self {
        Self {
            history_bits,
            match_bits,
            search: SearchDepth::Exhaustive,
        }
    }

    /// Replace the search policy.
    pub fn with_search(mut self, search: SearchDepth) -> Self {
        self.search = search;
        self
    }

    /// Check every field against its accepted range.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_HISTORY_BITS..=MAX_HISTORY_BITS).contains(&self.history_bits) {
            return Err(BitpressError::invalid_parameter(
                "history_bits",
                u64::from(self.history_bits),
                "must be between 1 and 24",
            ));
        }
        if !(MIN_MATCH_BITS..=MAX_MATCH_BITS).contains(&self.match_bits) {
            return Err(BitpressError::invalid_parameter(
                "match_bits",
                u64::from(self.match_bits),
                "must be between 1 and 16",
            ));
        }
        if self.search == SearchDepth::BestOf(0) {
            return Err(BitpressError::invalid_parameter(
                "search_depth",
                0,
                "best-of search needs at least one candidate",
            ));
        }
        Ok(())
    }

    /// History capacity in bytes.
    pub fn max_history_len(&self) -> usize {
        (1usize << self.history_bits) - 1
    }

    /// Longest match a record can express.
    pub fn max_match_len(&self) -> usize {
        (1usize << self.match_bits) - 1
    }

    /// Size of a match record in bits.
    pub fn record_bits(&self) -> u32 {
        1 + u32::from(self.history_bits) + u32::from(self.match_bits)
    }

    /// Longest match that is still emitted as literals.
    ///
    /// A match record replaces `length` literal records of 9 bits each, so
    /// it only pays off once `length` exceeds `ceil(record_bits / 9)`.
    pub fn break_even_point(&self) -> usize {
        self.record_bits().div_ceil(LITERAL_RECORD_BITS) as usize
    }
}

impl Default for LzssConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LzssConfig::default();
        assert_eq!(config.max_history_len(), 4095);
        assert_eq!(config.max_match_len(), 15);
        assert_eq!(config.record_bits(), 17);
        assert_eq!(config.break_even_point(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_break_even_point() {
        // ceil((h + m + 1) / 9)
        assert_eq!(LzssConfig::new(1, 1).break_even_point(), 1);
        assert_eq!(LzssConfig::new(4, 4).break_even_point(), 1);
        assert_eq!(LzssConfig::new(4, 5).break_even_point(), 2);
        assert_eq!(LzssConfig::new(16, 8).break_even_point(), 3);
        assert_eq!(LzssConfig::new(24, 16).break_even_point(), 5);
    }

    #[test]
    fn test_presets_are_valid() {
        for config in [LzssConfig::FAST, LzssConfig::DEFAULT, LzssConfig::BEST] {
            assert!(config.validate().is_ok(), "{config:?}");
        }
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(LzssConfig::new(0, 4).validate().is_err());
        assert!(LzssConfig::new(25, 4).validate().is_err());
        assert!(LzssConfig::new(12, 0).validate().is_err());
        assert!(LzssConfig::new(12, 17).validate().is_err());
        assert!(
            LzssConfig::new(12, 4)
                .with_search(SearchDepth::BestOf(0))
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_search_depth_mapping() {
        assert_eq!(SearchDepth::from_depth(0), SearchDepth::Exhaustive);
        assert_eq!(SearchDepth::from_depth(1), SearchDepth::First);
        assert_eq!(SearchDepth::from_depth(5), SearchDepth::BestOf(5));
        assert_eq!(SearchDepth::BestOf(5).depth(), 5);
        assert_eq!(SearchDepth::Exhaustive.candidate_limit(), None);
        assert_eq!(SearchDepth::First.candidate_limit(), Some(1));
        assert_eq!(SearchDepth::BestOf(3).to_string(), "best-of-3");
    }
}
