//! Lenient score extraction from free-text judge replies.
//!
//! Judges are asked for `summary1: [[4]], summary2: [[5]]` but rarely follow
//! a format exactly, so every bracketed integer anywhere in the reply counts.
//! Whether enough scores were found is decided separately by [`is_sufficient`].

use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

lazy_static! {
    /// A decimal integer directly enclosed in square brackets; `[[7]]` matches on the inner pair.
    /// `\d` is Unicode-aware, so fullwidth and other script digits match too.
    static ref BRACKETED_INT: Regex = Regex::new(r"\[(\d+)\]").unwrap();
    static ref DECIMAL_DIGIT: Regex = Regex::new(r"^\p{Nd}$").unwrap();
}

/// Every bracketed integer in `raw`, in order of appearance.
///
/// Digits from any script count (`[[７]]` is 7). Matches that do not fit an
/// `i64` are dropped with a warning.
pub fn parse_scores(raw: &str) -> Vec<i64> {
    BRACKETED_INT
        .captures_iter(raw)
        .filter_map(|caps| {
            let digits = caps.get(1)?.as_str();
            let score = decimal_value(digits);
            if score.is_none() {
                warn!(value = digits, "dropping unparsable judge score");
            }
            score
        })
        .collect()
}

fn decimal_value(digits: &str) -> Option<i64> {
    digits.chars().try_fold(0i64, |acc, c| {
        acc.checked_mul(10)?
            .checked_add(i64::from(digit_value(c)?))
    })
}

fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0u8; 4];
    DECIMAL_DIGIT.is_match(c.encode_utf8(&mut buf))
}

/// Value of a Unicode decimal digit (general category Nd).
///
/// Nd characters always come in contiguous runs of whole 0..=9 sets, so the
/// value is the offset from the start of the run, modulo 10.
fn digit_value(c: char) -> Option<u32> {
    if let Some(d) = c.to_digit(10) {
        return Some(d);
    }
    if !is_decimal_digit(c) {
        return None;
    }
    let mut zero = c as u32;
    while let Some(prev) = zero.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        zero -= 1;
    }
    Some((c as u32 - zero) % 10)
}

/// A reply is usable once it yields a score for each candidate.
pub fn is_sufficient(scores: &[i64]) -> bool {
    scores.len() >= 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_bracketed_scores_in_order() {
        assert_eq!(parse_scores("[8] and then [2]"), vec![8, 2]);
        assert_eq!(parse_scores("summary1: [[4]], summary2: [[5]]"), vec![4, 5]);
    }

    #[test]
    fn no_brackets_is_empty_not_error() {
        assert!(parse_scores("").is_empty());
        assert!(parse_scores("The first summary is better: 8 vs 3").is_empty());
        assert!(parse_scores("[a] [] [ 7 ] [-3] [7.5]").is_empty());
    }

    #[test]
    fn partial_extraction_keeps_valid_entries() {
        let huge = "9".repeat(40);
        let raw = format!("summary1: [[{huge}]], summary2: [[6]]");
        assert_eq!(parse_scores(&raw), vec![6]);
    }

    #[test]
    fn scores_outside_expected_range_are_kept() {
        assert_eq!(parse_scores("[12] [0]"), vec![12, 0]);
    }

    #[test]
    fn extra_scores_are_returned() {
        assert_eq!(parse_scores("[1] [2] [3]"), vec![1, 2, 3]);
    }

    #[test]
    fn unicode_surroundings() {
        assert_eq!(parse_scores("摘要一：[[9]]，摘要二：[[3]]"), vec![9, 3]);
    }

    #[test]
    fn non_ascii_digits_are_converted() {
        assert_eq!(parse_scores("summary1: [[７]], summary2: [[３]]"), vec![7, 3]);
        assert_eq!(parse_scores("summary1: [[٧]], summary2: [[٣]]"), vec![7, 3]);
        assert_eq!(parse_scores("[１０] [०]"), vec![10, 0]);
        // Mathematical digits: five adjacent 0..=9 sets.
        assert_eq!(parse_scores("[\u{1D7D5}] [\u{1D7FF}]"), vec![7, 9]);
    }

    #[test]
    fn sufficiency_requires_two() {
        assert!(!is_sufficient(&[]));
        assert!(!is_sufficient(&[5]));
        assert!(is_sufficient(&[5, 5]));
        assert!(is_sufficient(&[1, 2, 3]));
    }
}
