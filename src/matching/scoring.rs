use serde::{Deserialize, Serialize};

/// Weight of positional identity in the combined score
pub const IDENTITY_WEIGHT: f64 = 0.6;

/// Weight of longest-common-substring coverage in the combined score
pub const COVERAGE_WEIGHT: f64 = 0.4;

/// Safely convert usize to f64 for ratio calculations
///
/// Sequence lengths are far below the 2^52 mantissa limit, so the precision
/// loss clippy warns about cannot occur in practice.
#[inline]
fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Weights for the two similarity components
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Weight for positional identity
    pub identity: f64,
    /// Weight for LCS coverage of the shorter sequence
    pub coverage: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            identity: IDENTITY_WEIGHT,
            coverage: COVERAGE_WEIGHT,
        }
    }
}

impl ScoringWeights {
    /// Normalize weights to sum to 1.0
    ///
    /// Negative, non-finite or all-zero weights fall back to the defaults.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let valid = |w: f64| w.is_finite() && w >= 0.0;
        let total = self.identity + self.coverage;
        if !valid(self.identity) || !valid(self.coverage) || total <= 0.0 || !total.is_finite() {
            return Self::default();
        }
        Self {
            identity: self.identity / total,
            coverage: self.coverage / total,
        }
    }
}

/// Component scores between a chain sequence and a candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityScore {
    /// Fraction of aligned positions (up to the shorter length) that agree
    pub identity: f64,

    /// Longest common substring length over the shorter length
    pub coverage: f64,

    /// Weighted combination, clamped to `[0.0, 1.0]`
    pub combined: f64,
}

impl SimilarityScore {
    /// Score two sequences with the default weights
    #[must_use]
    pub fn calculate(a: &str, b: &str) -> Self {
        Self::calculate_with_weights(a, b, &ScoringWeights::default())
    }

    #[must_use]
    pub fn calculate_with_weights(a: &str, b: &str, weights: &ScoringWeights) -> Self {
        let shorter = a.len().min(b.len());
        if shorter == 0 {
            return Self {
                identity: 0.0,
                coverage: 0.0,
                combined: 0.0,
            };
        }

        let identity = positional_identity(a, b);
        let coverage =
            count_to_f64(longest_common_substring(a, b)) / count_to_f64(shorter);
        let combined = (weights.identity * identity + weights.coverage * coverage).clamp(0.0, 1.0);

        Self {
            identity,
            coverage,
            combined,
        }
    }
}

/// Combined similarity of two sequences in `[0.0, 1.0]`.
///
/// Returns 0.0 when either sequence is empty.
#[must_use]
pub fn similarity(a: &str, b: &str) -> f64 {
    SimilarityScore::calculate(a, b).combined
}

/// Fraction of positions, up to the shorter length, where both sequences carry
/// the same residue
#[must_use]
pub fn positional_identity(a: &str, b: &str) -> f64 {
    let shorter = a.len().min(b.len());
    if shorter == 0 {
        return 0.0;
    }
    let matches = a
        .bytes()
        .zip(b.bytes())
        .filter(|(x, y)| x == y)
        .count();
    count_to_f64(matches) / count_to_f64(shorter)
}

/// Length of the longest contiguous run shared by both sequences.
///
/// Classic O(n·m) table, kept to two rows.
#[must_use]
pub fn longest_common_substring(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut previous = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];
    let mut longest = 0;

    for &x in a {
        for (j, &y) in b.iter().enumerate() {
            current[j + 1] = if x == y { previous[j] + 1 } else { 0 };
            longest = longest.max(current[j + 1]);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_similarity_reflexive() {
        for s in ["A", "AGS", "MKVLAAGIVALLLAAGCSS", "XXXX"] {
            assert!((similarity(s, s) - 1.0).abs() < f64::EPSILON, "{s}");
        }
    }

    #[test]
    fn test_similarity_disjoint() {
        assert!(similarity("ABCDE", "XYZWQ").abs() < f64::EPSILON);
    }

    #[test]
    fn test_similarity_empty() {
        assert!(similarity("", "ABC").abs() < f64::EPSILON);
        assert!(similarity("ABC", "").abs() < f64::EPSILON);
        assert!(similarity("", "").abs() < f64::EPSILON);
    }

    #[test]
    fn test_similarity_in_range() {
        let pairs = [
            ("AAAAA", "ABCDE"),
            ("MKV", "MKVLLA"),
            ("GGGGGGGG", "AG"),
            ("ABC", "CBA"),
        ];
        for (a, b) in pairs {
            let s = similarity(a, b);
            assert!((0.0..=1.0).contains(&s), "{a} vs {b}: {s}");
            // Symmetric
            assert!((s - similarity(b, a)).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_prefix_scores_full() {
        // Shorter sequence is fully covered and identical at every position
        assert!((similarity("MKV", "MKVLLA") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_positional_identity() {
        assert!((positional_identity("ABCD", "ABXD") - 0.75).abs() < 1e-9);
        assert!((positional_identity("AB", "ABCDEF") - 1.0).abs() < 1e-9);
        assert!(positional_identity("ABC", "XAB").abs() < 1e-9);
    }

    #[test]
    fn test_longest_common_substring() {
        assert_eq!(longest_common_substring("ABCDE", "XBCDY"), 3);
        assert_eq!(longest_common_substring("ABC", "XAB"), 2);
        assert_eq!(longest_common_substring("ABC", "XYZ"), 0);
        assert_eq!(longest_common_substring("", "ABC"), 0);
        assert_eq!(longest_common_substring("AAAA", "AA"), 2);
    }

    #[test]
    fn test_shifted_sequence_scores_on_coverage_only() {
        let score = SimilarityScore::calculate("ABC", "XAB");
        assert!(score.identity.abs() < 1e-9);
        assert!((score.coverage - 2.0 / 3.0).abs() < 1e-9);
        assert!((score.combined - 0.4 * 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_weights_normalized() {
        let weights = ScoringWeights {
            identity: 3.0,
            coverage: 1.0,
        }
        .normalized();
        assert!((weights.identity - 0.75).abs() < 1e-9);
        assert!((weights.coverage - 0.25).abs() < 1e-9);

        let zero = ScoringWeights {
            identity: 0.0,
            coverage: 0.0,
        };
        assert_eq!(zero.normalized(), ScoringWeights::default());
    }

    #[test]
    fn test_negative_weights_fall_back_to_defaults() {
        let weights = ScoringWeights {
            identity: -1.0,
            coverage: 2.0,
        };
        assert_eq!(weights.normalized(), ScoringWeights::default());
        assert_eq!(
            ScoringWeights {
                identity: f64::NAN,
                coverage: 1.0,
            }
            .normalized(),
            ScoringWeights::default()
        );
    }

    #[test]
    fn test_combined_stays_in_range_with_raw_weights() {
        // Every other position differs, so identity is 0.6 and coverage 0.2
        let weights = ScoringWeights {
            identity: -1.0,
            coverage: 2.0,
        };
        let score = SimilarityScore::calculate_with_weights("AXAXA", "AYAYA", &weights);
        assert!((0.0..=1.0).contains(&score.combined), "{}", score.combined);
        assert!(score.combined.abs() < f64::EPSILON);

        let heavy = ScoringWeights {
            identity: 5.0,
            coverage: 5.0,
        };
        let score = SimilarityScore::calculate_with_weights("MKV", "MKV", &heavy);
        assert!((score.combined - 1.0).abs() < f64::EPSILON);
    }
}
