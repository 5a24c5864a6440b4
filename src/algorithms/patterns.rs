//! Cycle detection over categorical sequences.
//!
//! Two deliberately distinct routines cover two jobs. The display routine
//! ([`detect_pattern_length`]) explains a historical rotation to the user:
//! it anchors on the earliest window, scans in non-overlapping strides, and
//! demands a 70% match rate before it reports anything. The synthesis
//! routine ([`recent_cycle`]) feeds prediction and must always produce an
//! actionable cycle: it anchors on the most recent window, accepts two
//! confirmations, and falls back to the raw recent tail, then to a fixed
//! default alphabet. Unifying the two would silently change prediction
//! output on histories whose recent rotation drifted from the long-run one.

use once_cell::sync::Lazy;

/// Default rotation used when the history is too short to infer one.
pub static DEFAULT_MAP_CYCLE: Lazy<Vec<String>> = Lazy::new(|| {
    vec![
        "Sever_Map_G1_1_v2".to_string(),
        "Sever_Map_G1_2_v2".to_string(),
        "Sever_Map_G1_3_v2".to_string(),
        "Sever_Map_G1_4_v2".to_string(),
    ]
});

/// Finds the shortest repeating cycle length in a categorical sequence.
///
/// Candidate lengths run from 1 to `min(max_length, len / 2)`. For each,
/// the first `length` tokens form the candidate, which is compared against
/// non-overlapping stride-`length` windows. A length is accepted when the
/// match count reaches 70% of the expected window count and exceeds one —
/// a single coincidental match does not count. The first (smallest)
/// accepted length wins: a shorter confirmed cycle beats a longer one that
/// also happens to fit.
///
/// Returns 0 when the sequence has fewer than 4 elements or no length
/// passes the threshold.
pub fn detect_pattern_length<T: PartialEq>(sequence: &[T], max_length: usize) -> usize {
    if sequence.len() < 4 {
        return 0;
    }

    let upper = max_length.min(sequence.len() / 2);
    for length in 1..=upper {
        let candidate = &sequence[..length];

        let mut matches = 0usize;
        let mut start = length;
        while start + length <= sequence.len() {
            if &sequence[start..start + length] == candidate {
                matches += 1;
            }
            start += length;
        }

        let expected = (sequence.len() - length) / length;
        if matches > 1 && matches as f64 >= 0.7 * expected as f64 {
            return length;
        }
    }

    0
}

/// Derives the cycle the most recent tokens are rotating through.
///
/// For lengths 2 to 4 the last `length` tokens form the candidate; it is
/// accepted when the window immediately before it repeats the candidate
/// (the recent history actually cycles at that length) and the candidate
/// recurs at least twice in an overlapping scan of the preceding history.
/// When no length qualifies the last four tokens are returned as-is, and
/// histories shorter than four tokens yield `default`.
pub fn recent_cycle(sequence: &[String], default: &[String]) -> Vec<String> {
    if sequence.len() < 4 {
        return default.to_vec();
    }

    for length in 2..=4usize {
        if sequence.len() < 2 * length {
            continue;
        }
        let candidate = &sequence[sequence.len() - length..];
        let preceding = &sequence[sequence.len() - 2 * length..sequence.len() - length];
        if preceding != candidate {
            continue;
        }

        let matches = (0..sequence.len() - length)
            .filter(|&i| &sequence[i..i + length] == candidate)
            .count();
        if matches >= 2 {
            return candidate.to_vec();
        }
    }

    sequence[sequence.len() - 4..].to_vec()
}
