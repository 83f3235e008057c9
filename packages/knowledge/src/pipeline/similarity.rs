//! Character-overlap similarity for company names.
//!
//! Short names (five characters or fewer) are compared strictly so that
//! unrelated acronyms never collide: only substring containment or a nearly
//! identical character set counts.

use std::collections::HashSet;

/// Names at or below this length use the strict comparison.
pub const SHORT_NAME_LEN: usize = 5;

/// Minimum Jaccard overlap accepted between two short names.
const SHORT_JACCARD_MIN: f32 = 0.85;

/// Similarity in `0.0..=1.0` between two names, ignoring case and
/// surrounding whitespace.
///
/// - `1.0` for equal strings
/// - `0.9` when one contains the other
/// - otherwise the Jaccard overlap of their character sets (spaces ignored)
///
/// When either string is short, containment still scores `0.9`, a length
/// difference above one scores `0.0`, and the overlap only counts above
/// `0.85`.
pub fn similarity(a: &str, b: &str) -> f32 {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();

    if a == b {
        return 1.0;
    }

    let len_a = a.chars().count();
    let len_b = b.chars().count();
    let short = len_a <= SHORT_NAME_LEN || len_b <= SHORT_NAME_LEN;
    let contains = a.contains(b.as_str()) || b.contains(a.as_str());

    if short {
        if contains {
            return 0.9;
        }
        if len_a.abs_diff(len_b) > 1 {
            return 0.0;
        }
    } else if contains {
        return 0.9;
    }

    let set_a: HashSet<char> = a.chars().filter(|c| *c != ' ').collect();
    let set_b: HashSet<char> = b.chars().filter(|c| *c != ' ').collect();
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    let jaccard = intersection as f32 / union as f32;

    if short && jaccard <= SHORT_JACCARD_MIN {
        0.0
    } else {
        jaccard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_equal_ignoring_case_and_whitespace() {
        assert_eq!(similarity("  Meril ", "meril"), 1.0);
    }

    #[test]
    fn test_short_names_do_not_collide() {
        assert_eq!(similarity("acme", "apex"), 0.0);
        assert_eq!(similarity("tcs", "hcl"), 0.0);
        assert_eq!(similarity("meril", "merrill lynch"), 0.0);
    }

    #[test]
    fn test_containment_scores_point_nine() {
        assert_eq!(similarity("tcs", "tcs ltd"), 0.9);
        assert_eq!(similarity("infosys", "infosys limited"), 0.9);
        assert_eq!(similarity("deloitte", "deloitte touche"), 0.9);
    }

    #[test]
    fn test_long_names_use_plain_overlap() {
        let score = similarity("capgemini", "cognizant");
        assert!(score > 0.0 && score < 0.7, "score was {score}");
    }

    #[test]
    fn test_short_anagram_passes_overlap() {
        // Same length, identical character set.
        assert_eq!(similarity("ibm", "bmi"), 1.0);
    }

    proptest! {
        #[test]
        fn prop_score_is_bounded_and_symmetric(a in "[a-z ]{0,12}", b in "[a-z ]{0,12}") {
            let ab = similarity(&a, &b);
            let ba = similarity(&b, &a);
            prop_assert!((0.0..=1.0).contains(&ab));
            prop_assert_eq!(ab, ba);
        }

        #[test]
        fn prop_short_names_far_apart_score_zero(a in "[a-z]{1,5}", b in "[a-z]{1,5}") {
            prop_assume!(a.len().abs_diff(b.len()) > 1);
            prop_assume!(!a.contains(b.as_str()) && !b.contains(a.as_str()));
            prop_assert_eq!(similarity(&a, &b), 0.0);
        }

        #[test]
        fn prop_short_names_score_zero_or_high(a in "[a-z]{1,5}", b in "[a-z]{1,5}") {
            let score = similarity(&a, &b);
            prop_assert!(score == 0.0 || score > SHORT_JACCARD_MIN);
        }
    }
}
