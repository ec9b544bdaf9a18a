//! Matcher configuration.
//!
//! All preconditions are enforced at construction time: a config that
//! exists is a config that is valid, so the scoring hot path never
//! re-validates. Violations are programmer errors and panic.

/// Raw score unit used by the alignment engine and the bonus system.
pub(crate) type RawScore = i32;

// ---------------------------------------------------------------------------
// Shared bonus constants
// ---------------------------------------------------------------------------
// The bonus system is shared between the two engines (both consume the same
// word-boundary rule); keeping the defaults in one place prevents the
// engines from drifting apart and ranking the same candidate differently.

/// Awarded when the previous candidate position also matched.
pub(crate) const BONUS_CONSECUTIVE: RawScore = 4;

/// Awarded when the matched candidate position starts a word.
pub(crate) const BONUS_WORD_START: RawScore = 8;

/// Awarded when the original (un-folded) bytes agree, case included.
pub(crate) const BONUS_CASE_MATCH: RawScore = 2;

const DEFAULT_MATCH_SCORE: RawScore = 16;
const DEFAULT_MISMATCH_PENALTY: RawScore = 4;
const DEFAULT_GAP_START_PENALTY: RawScore = 3;
const DEFAULT_GAP_EXTEND_PENALTY: RawScore = 1;

const DEFAULT_MAX_EDIT_DISTANCE: usize = 2;

// ---------------------------------------------------------------------------
// Per-engine configuration
// ---------------------------------------------------------------------------

/// Tuning for the bounded prefix-edit-distance engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EditDistanceConfig {
    /// Maximum number of edits (insert, delete, substitute, adjacent
    /// transpose) tolerated against the best candidate prefix.
    pub max_edit_distance: usize,
    /// Scales the prefix epsilon; larger pulls prefix scores toward 1.0.
    pub prefix_weight: f32,
    /// Scales the length-ratio term of the substring base score.
    pub substring_weight: f32,
}

impl Default for EditDistanceConfig {
    fn default() -> Self {
        EditDistanceConfig {
            max_edit_distance: DEFAULT_MAX_EDIT_DISTANCE,
            prefix_weight: 1.0,
            substring_weight: 1.0,
        }
    }
}

impl EditDistanceConfig {
    /// Build a validated config. Panics on non-positive or non-finite
    /// weights.
    pub fn new(max_edit_distance: usize, prefix_weight: f32, substring_weight: f32) -> Self {
        assert!(
            prefix_weight.is_finite() && prefix_weight > 0.0,
            "prefix_weight must be finite and positive"
        );
        assert!(
            substring_weight.is_finite() && substring_weight > 0.0,
            "substring_weight must be finite and positive"
        );
        EditDistanceConfig {
            max_edit_distance,
            prefix_weight,
            substring_weight,
        }
    }
}

/// Tuning for the Smith-Waterman local-alignment engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SmithWatermanConfig {
    /// Points for each folded-equal byte pair on the diagonal.
    pub match_score: RawScore,
    /// Deducted for a diagonal step over unequal bytes.
    pub mismatch_penalty: RawScore,
    /// Cost of opening a gap in either sequence.
    pub gap_start_penalty: RawScore,
    /// Cost of extending an open gap by one byte.
    pub gap_extend_penalty: RawScore,
    /// Split the query on runs of spaces and align each sub-query
    /// independently, summing the raw scores.
    pub split_spaces: bool,
    /// Bonus when the previous diagonal step was also a match.
    pub bonus_consecutive: RawScore,
    /// Bonus when the matched candidate byte starts a word.
    pub bonus_word_start: RawScore,
    /// Bonus when the original bytes agree, case preserved.
    pub bonus_case_match: RawScore,
}

impl Default for SmithWatermanConfig {
    fn default() -> Self {
        SmithWatermanConfig {
            match_score: DEFAULT_MATCH_SCORE,
            mismatch_penalty: DEFAULT_MISMATCH_PENALTY,
            gap_start_penalty: DEFAULT_GAP_START_PENALTY,
            gap_extend_penalty: DEFAULT_GAP_EXTEND_PENALTY,
            split_spaces: true,
            bonus_consecutive: BONUS_CONSECUTIVE,
            bonus_word_start: BONUS_WORD_START,
            bonus_case_match: BONUS_CASE_MATCH,
        }
    }
}

impl SmithWatermanConfig {
    /// Build a validated config. Panics if any score, penalty or bonus is
    /// negative, or if a perfect match would score zero.
    pub fn new(
        match_score: RawScore,
        mismatch_penalty: RawScore,
        gap_start_penalty: RawScore,
        gap_extend_penalty: RawScore,
        split_spaces: bool,
    ) -> Self {
        let config = SmithWatermanConfig {
            match_score,
            mismatch_penalty,
            gap_start_penalty,
            gap_extend_penalty,
            split_spaces,
            ..Default::default()
        };
        config.validate();
        config
    }

    fn validate(&self) {
        assert!(self.match_score > 0, "match_score must be positive");
        assert!(self.mismatch_penalty >= 0, "mismatch_penalty must be non-negative");
        assert!(self.gap_start_penalty >= 0, "gap_start_penalty must be non-negative");
        assert!(self.gap_extend_penalty >= 0, "gap_extend_penalty must be non-negative");
        assert!(self.bonus_consecutive >= 0, "bonus_consecutive must be non-negative");
        assert!(self.bonus_word_start >= 0, "bonus_word_start must be non-negative");
        assert!(self.bonus_case_match >= 0, "bonus_case_match must be non-negative");
    }

    /// Highest raw score a single query byte can contribute. The scorer
    /// divides by `query_len * per_position_max()` to normalize.
    pub(crate) fn per_position_max(&self) -> RawScore {
        self.match_score + self.bonus_consecutive + self.bonus_word_start + self.bonus_case_match
    }
}

// ---------------------------------------------------------------------------
// Top-level configuration
// ---------------------------------------------------------------------------

/// Which alignment engine scores candidates that survive the prefilter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Algorithm {
    /// Bounded prefix edit distance with Damerau transposition.
    EditDistance(EditDistanceConfig),
    /// Smith-Waterman local alignment with affine gaps and bonuses.
    SmithWaterman(SmithWatermanConfig),
}

impl Default for Algorithm {
    fn default() -> Self {
        Algorithm::EditDistance(EditDistanceConfig::default())
    }
}

impl Algorithm {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Algorithm::EditDistance(_) => "edit_distance",
            Algorithm::SmithWaterman(_) => "smith_waterman",
        }
    }
}

/// Complete matcher configuration attached to a prepared query.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MatchConfig {
    /// Matches scoring below this are suppressed.
    pub min_score: f32,
    /// Engine selection plus per-engine tuning.
    pub algorithm: Algorithm,
}

impl MatchConfig {
    /// Build a validated config. Panics unless `min_score` is in [0, 1].
    pub fn new(algorithm: Algorithm, min_score: f32) -> Self {
        assert!(
            (0.0..=1.0).contains(&min_score),
            "min_score must be within [0, 1], got {min_score}"
        );
        if let Algorithm::SmithWaterman(sw) = &algorithm {
            sw.validate();
        }
        MatchConfig { min_score, algorithm }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let ed = EditDistanceConfig::default();
        assert_eq!(ed.max_edit_distance, 2);
        assert_eq!(ed.prefix_weight, 1.0);

        let sw = SmithWatermanConfig::default();
        assert_eq!(sw.match_score, 16);
        assert_eq!(sw.mismatch_penalty, 4);
        assert_eq!(sw.gap_start_penalty, 3);
        assert_eq!(sw.gap_extend_penalty, 1);
        assert!(sw.split_spaces);
        assert_eq!(sw.per_position_max(), 30);
    }

    #[test]
    #[should_panic(expected = "min_score")]
    fn min_score_out_of_range_panics() {
        let _ = MatchConfig::new(Algorithm::default(), 1.5);
    }

    #[test]
    #[should_panic(expected = "non-negative")]
    fn negative_penalty_panics() {
        let _ = SmithWatermanConfig::new(16, -1, 3, 1, true);
    }
}
