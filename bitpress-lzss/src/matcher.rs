//! Match search over the history window.

use crate::config::SearchDepth;

/// A back-reference candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Start of the match in the history window.
    pub offset: usize,
    /// Number of matching bytes.
    pub length: usize,
}

/// Find the longest prefix of `lookahead` that occurs in `history`.
///
/// Candidates are history positions whose byte equals `lookahead[0]`,
/// scanned from offset 0 upwards. Each candidate is extended while the
/// bytes keep matching, without running past the end of either slice.
/// `depth` bounds how many candidates are examined; among those, the
/// longest wins and ties go to the earliest offset.
pub fn find_match(history: &[u8], lookahead: &[u8], depth: SearchDepth) -> Option<Match> {
    let &first = lookahead.first()?;
    let limit = depth.candidate_limit().unwrap_or(usize::MAX);

    let mut best: Option<Match> = None;
    let mut examined = 0;

    for (offset, _) in history.iter().enumerate().filter(|&(_, &b)| b == first) {
        let length = history[offset..]
            .iter()
            .zip(lookahead)
            .take_while(|(h, l)| h == l)
            .count();

        if best.is_none_or(|m| length > m.length) {
            best = Some(Match { offset, length });
        }

        examined += 1;
        if examined >= limit || length == lookahead.len() {
            break;
        }
    }

    best
}
