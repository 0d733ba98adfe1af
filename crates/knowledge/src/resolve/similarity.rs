//! String similarity strategies for approximate name matching.

use std::fmt::Debug;

/// A similarity measure over two normalised strings.
pub trait SimilarityStrategy: Send + Sync + Debug {
    /// Strategy identifier, for logs.
    fn name(&self) -> &str;

    /// Similarity in `[0, 1]`; `1.0` means identical.
    fn ratio(&self, a: &str, b: &str) -> f64;
}

/// Ratcliff/Obershelp "gestalt" matching: twice the number of characters in
/// matching blocks over the total number of characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceRatio;

impl SimilarityStrategy for SequenceRatio {
    fn name(&self) -> &str {
        "sequence-ratio"
    }

    fn ratio(&self, a: &str, b: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let total = a.len() + b.len();
        if total == 0 {
            return 1.0;
        }
        let matched = matching_chars(&a, &b, 0, a.len(), 0, b.len());
        2.0 * matched as f64 / total as f64
    }
}

/// Characters covered by matching blocks within `a[alo..ahi]` and
/// `b[blo..bhi]`.
fn matching_chars(a: &[char], b: &[char], alo: usize, ahi: usize, blo: usize, bhi: usize) -> usize {
    let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
    if size == 0 {
        return 0;
    }
    size + matching_chars(a, b, alo, i, blo, j) + matching_chars(a, b, i + size, ahi, j + size, bhi)
}

/// Longest common block; ties go to the earliest start in `a`, then in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best) = (alo, blo, 0);
    // lengths[j] = length of the common suffix ending at a[i - 1], b[j - 1]
    let mut prev = vec![0usize; bhi - blo + 1];

    for i in alo..ahi {
        let mut row = vec![0usize; bhi - blo + 1];
        for j in blo..bhi {
            if a[i] == b[j] {
                let k = prev[j - blo] + 1;
                row[j - blo + 1] = k;
                if k > best {
                    best = k;
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                }
            }
        }
        prev = row;
    }

    (best_i, best_j, best)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_and_disjoint() {
        let s = SequenceRatio;
        assert_eq!(s.ratio("lounge", "lounge"), 1.0);
        assert_eq!(s.ratio("abc", "xyz"), 0.0);
        assert_eq!(s.ratio("", ""), 1.0);
    }

    #[test]
    fn test_known_ratios() {
        let s = SequenceRatio;
        // Blocks "a" and "cd": 2 * 3 / 8
        assert!((s.ratio("abcd", "acdb") - 0.75).abs() < 1e-9);
        // One transposition in a seven-letter word
        assert!(s.ratio("loungee", "lounge") > 0.9);
        assert!((s.ratio("xrspace", "xrspcae") - 2.0 * 6.0 / 14.0).abs() < 1e-9);
    }

    #[test]
    fn test_symmetric_enough_for_names() {
        let s = SequenceRatio;
        let forward = s.ratio("blackbox", "blackboxstudio");
        let backward = s.ratio("blackboxstudio", "blackbox");
        assert!((forward - backward).abs() < 1e-9);
    }
}
