//! Score normalization and match classification.
//!
//! Raw engine output maps into per-kind bands of [0, 1] so the reported
//! ranking stays intuitive: exact (1.0) > prefix [0.9, 1) > substring >
//! acronym > alignment > fuzzy. The highest applicable score wins and its
//! kind is reported; anything under the configured minimum is suppressed.

use crate::config::{BONUS_CONSECUTIVE, BONUS_WORD_START, RawScore};

// ---------------------------------------------------------------------------
// Normalization constants
// ---------------------------------------------------------------------------

/// Prefix epsilon: a prefix covering the entire candidate scores 1.0 and
/// longer candidates decay linearly toward `1 - ε`.
const PREFIX_EPSILON: f32 = 0.0012;

/// Lower bound of the prefix band; substring scores clamp below it.
const PREFIX_FLOOR: f32 = 0.9;

const SUBSTRING_BASE: f32 = 0.7;
const SUBSTRING_RATIO_WEIGHT: f32 = 0.2;
const SUBSTRING_POSITION_PENALTY: f32 = 0.1;
const SUBSTRING_WORD_START_BONUS: f32 = 0.05;

/// Full-acronym score: below any prefix, above typical substrings. A
/// partial acronym is also capped here so it never outranks a full one.
const ACRONYM_SCORE: f32 = 0.85;
const ACRONYM_PARTIAL_WEIGHT: f32 = 0.1;

/// Alignment never beats a clean prefix.
const ALIGNMENT_CEILING: f32 = 0.95;

const FUZZY_CEILING: f32 = 0.85;
const FUZZY_GAP_RUN_PENALTY: f32 = 0.05;

/// Highest per-position bonus the fuzzy formula can accumulate.
const FUZZY_MAX_BONUS: RawScore = BONUS_WORD_START + BONUS_CONSECUTIVE;

// ---------------------------------------------------------------------------
// Per-kind normalization
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn exact() -> f32 {
    1.0
}

/// `1 - ε + ε·q/c`, with the epsilon scaled down by `prefix_weight` so a
/// larger weight pulls prefix scores toward 1.0. Bounded to [0.9, 1).
#[inline]
pub(crate) fn prefix(q: usize, c: usize, prefix_weight: f32) -> f32 {
    let epsilon = PREFIX_EPSILON / prefix_weight;
    let score = 1.0 - epsilon + epsilon * q as f32 / c as f32;
    score.clamp(PREFIX_FLOOR, 1.0)
}

/// Base grows with query coverage, decays with match position, and a
/// word-start occurrence earns a small bump. Clamped below the prefix
/// band.
#[inline]
pub(crate) fn substring(
    q: usize,
    c: usize,
    start: usize,
    word_start: bool,
    substring_weight: f32,
) -> f32 {
    let ratio = (substring_weight * q as f32 / c as f32).min(1.0);
    let mut score = SUBSTRING_BASE + SUBSTRING_RATIO_WEIGHT * ratio
        - SUBSTRING_POSITION_PENALTY * start as f32 / c as f32;
    if word_start {
        score += SUBSTRING_WORD_START_BONUS;
    }
    score.clamp(0.0, PREFIX_FLOOR - f32::EPSILON)
}

#[inline]
pub(crate) fn acronym() -> f32 {
    ACRONYM_SCORE
}

/// A partial acronym rides on the fuzzy score plus a fraction-matched
/// bump, capped at the full-acronym score.
#[inline]
pub(crate) fn partial_acronym(fuzzy_score: f32, matched_initials: usize, q: usize) -> f32 {
    (fuzzy_score + ACRONYM_PARTIAL_WEIGHT * matched_initials as f32 / q as f32).min(ACRONYM_SCORE)
}

/// Raw alignment divided by its theoretical maximum, clamped so alignment
/// never beats a clean prefix.
#[inline]
pub(crate) fn alignment(raw: i64, max_raw: i64) -> f32 {
    (raw as f32 / max_raw as f32).clamp(0.0, ALIGNMENT_CEILING)
}

/// Bounded-distance fallback: distance against the larger length, a
/// penalty per gap run, and the accumulated word-start/consecutive
/// bonuses against their per-position maximum.
#[inline]
pub(crate) fn fuzzy(
    distance: usize,
    q: usize,
    c: usize,
    gap_runs: usize,
    bonus_sum: RawScore,
) -> f32 {
    let score = 1.0 - distance as f32 / q.max(c) as f32
        - FUZZY_GAP_RUN_PENALTY * gap_runs as f32
        + bonus_sum as f32 / (q as f32 * FUZZY_MAX_BONUS as f32);
    score.clamp(0.0, FUZZY_CEILING)
}

/// One-character queries score like a one-byte substring occurrence:
/// earlier positions win and a word start earns the bump.
#[inline]
pub(crate) fn one_char(pos: usize, c: usize, word_start: bool) -> f32 {
    substring(1, c, pos, word_start, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_band() {
        let score = prefix(7, 11, 1.0);
        assert!(
            (0.999..1.0).contains(&score),
            "prefix 7/11 should be ~0.999, got {score}"
        );
        // Longer candidates score lower but stay in the band.
        assert!(prefix(2, 3, 1.0) > prefix(2, 30, 1.0));
        assert!(prefix(2, 10_000, 1.0) >= 0.9);
    }

    #[test]
    fn prefix_weight_pulls_toward_one() {
        assert!(prefix(2, 20, 4.0) > prefix(2, 20, 1.0));
        assert!(prefix(2, 20, 0.25) < prefix(2, 20, 1.0));
    }

    #[test]
    fn substring_stays_below_the_prefix_band() {
        // Near-total coverage with a word-start bump still loses to any
        // prefix.
        assert!(substring(10, 11, 1, true, 1.0) < 0.9);
        assert!(substring(10, 11, 1, true, 1.0) > substring(3, 11, 1, true, 1.0));
    }

    #[test]
    fn substring_prefers_early_word_aligned_hits() {
        assert!(substring(4, 11, 3, true, 1.0) > substring(4, 11, 3, false, 1.0));
        assert!(substring(4, 11, 1, false, 1.0) > substring(4, 11, 6, false, 1.0));
    }

    #[test]
    fn fuzzy_is_capped_below_acronym_and_substring_ceilings() {
        // A huge bonus sum cannot push fuzzy past its ceiling.
        assert_eq!(fuzzy(0, 7, 7, 0, 7 * FUZZY_MAX_BONUS), 0.85);
        assert_eq!(fuzzy(7, 7, 7, 0, 0), 0.0);
    }

    #[test]
    fn partial_acronym_never_outranks_full() {
        assert!(partial_acronym(0.85, 3, 4) <= acronym());
        assert!(partial_acronym(0.5, 2, 4) > 0.5);
    }

    #[test]
    fn alignment_normalization() {
        assert_eq!(alignment(0, 240), 0.0);
        assert!((alignment(160, 240) - 2.0 / 3.0).abs() < 1e-6);
        // Clamped so alignment never beats a clean prefix.
        assert_eq!(alignment(1000, 240), 0.95);
    }
}
