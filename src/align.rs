//! Smith-Waterman local-alignment engine.
//!
//! Local alignment with affine gap penalties plus position-dependent
//! bonuses: unlike edit distance this is bonus-driven, so a longer run of
//! consecutive or word-aligned matches outscores fewer gaps. Neither
//! string has to be consumed entirely; the reported raw score is the best
//! cell anywhere in the matrix.
//!
//! Storage is two rolling score rows, one in-place gap column and two
//! rows of diagonal-match flags feeding the consecutive bonus. No full
//! matrix is retained.

use crate::buffer::ScoringBuffer;
use crate::config::{RawScore, SmithWatermanConfig};
use crate::query::PreparedQuery;

/// Low enough that a gap can never be opened from it, far enough from
/// `i32::MIN` that subtracting penalties cannot wrap.
const NEG: RawScore = RawScore::MIN / 2;

pub(crate) struct AlignOutcome {
    /// Best raw score; the sum over sub-queries in split mode.
    pub raw: i64,
    /// Theoretical maximum used for normalization:
    /// `query_len * (match_score + every bonus)`.
    pub max_raw: i64,
}

pub(crate) fn run(
    query: &PreparedQuery,
    candidate: &[u8],
    config: &SmithWatermanConfig,
    buf: &mut ScoringBuffer,
) -> Option<AlignOutcome> {
    let q = query.len();
    let c = buf.candidate_folded.len();
    buf.ensure_sw_rows(c + 1);

    let query_folded = query.folded_bytes();
    let query_original = query.original_bytes();

    let ScoringBuffer {
        candidate_folded,
        word_initials,
        sw_row_prev,
        sw_row_curr,
        sw_gap_col,
        sw_diag_prev,
        sw_diag_curr,
        sw_max_cell,
        ..
    } = &mut *buf;

    let mut total: i64 = 0;
    let mut aligned_any = false;

    if config.split_spaces && query_folded.contains(&b' ') {
        // Align each space-delimited sub-query independently against the
        // full candidate and sum the raw scores. Summing (instead of one
        // alignment of the whole query) lets arbitrary gaps sit between
        // sub-queries without gap-penalty cost, so "get user" matches
        // both segments of "getUserById".
        let mut start = 0;
        while start < q {
            while start < q && query_folded[start] == b' ' {
                start += 1;
            }
            if start == q {
                break;
            }
            let mut end = start;
            while end < q && query_folded[end] != b' ' {
                end += 1;
            }

            *sw_max_cell = (0, 0);
            align_one(
                &query_folded[start..end],
                &query_original[start..end],
                candidate_folded,
                candidate,
                word_initials,
                config,
                sw_row_prev,
                sw_row_curr,
                sw_gap_col,
                sw_diag_prev,
                sw_diag_curr,
                sw_max_cell,
            );
            // A sub-query with no alignment disqualifies the whole
            // candidate.
            if sw_max_cell.0 <= 0 {
                return None;
            }
            total += sw_max_cell.0 as i64;
            aligned_any = true;
            start = end;
        }
    }

    if !aligned_any {
        *sw_max_cell = (0, 0);
        align_one(
            query_folded,
            query_original,
            candidate_folded,
            candidate,
            word_initials,
            config,
            sw_row_prev,
            sw_row_curr,
            sw_gap_col,
            sw_diag_prev,
            sw_diag_curr,
            sw_max_cell,
        );
        if sw_max_cell.0 <= 0 {
            return None;
        }
        total = sw_max_cell.0 as i64;
    }

    Some(AlignOutcome {
        raw: total,
        max_raw: q as i64 * config.per_position_max() as i64,
    })
}

/// One local alignment of `pattern` against the candidate. Writes the
/// best cell (raw score, 0-indexed end position) into `max_cell`.
#[allow(clippy::too_many_arguments)]
fn align_one(
    pattern: &[u8],
    pattern_original: &[u8],
    candidate_folded: &[u8],
    candidate_original: &[u8],
    word_initials: &[usize],
    config: &SmithWatermanConfig,
    h_prev: &mut Vec<RawScore>,
    h_curr: &mut Vec<RawScore>,
    gap_col: &mut Vec<RawScore>,
    diag_prev: &mut Vec<u8>,
    diag_curr: &mut Vec<u8>,
    max_cell: &mut (RawScore, usize),
) {
    let c = candidate_folded.len();

    h_prev[..=c].fill(0);
    gap_col[..=c].fill(NEG);
    diag_prev[..=c].fill(0);

    for i in 1..=pattern.len() {
        let pb = pattern[i - 1];
        let pob = pattern_original[i - 1];
        h_curr[0] = 0;
        diag_curr[0] = 0;
        // E: best score ending in a gap over candidate bytes, carried
        // along the row.
        let mut gap_row = NEG;
        // Word starts are sorted; a cursor gives O(1) membership per step.
        let mut ws = 0usize;

        for j in 1..=c {
            let pos = j - 1;
            while ws < word_initials.len() && word_initials[ws] < pos {
                ws += 1;
            }
            let at_word_start = ws < word_initials.len() && word_initials[ws] == pos;

            let is_match = pb == candidate_folded[pos];
            let mut diag = h_prev[j - 1]
                + if is_match {
                    config.match_score
                } else {
                    -config.mismatch_penalty
                };
            // Bonuses apply only on the diagonal step and only on match.
            if is_match {
                if diag_prev[j - 1] != 0 {
                    diag += config.bonus_consecutive;
                }
                if at_word_start {
                    diag += config.bonus_word_start;
                }
                if candidate_original[pos] == pob {
                    diag += config.bonus_case_match;
                }
            }

            gap_row = (h_curr[j - 1] - config.gap_start_penalty)
                .max(gap_row - config.gap_extend_penalty);
            gap_col[j] =
                (h_prev[j] - config.gap_start_penalty).max(gap_col[j] - config.gap_extend_penalty);

            let h = diag.max(gap_row).max(gap_col[j]).max(0);
            h_curr[j] = h;
            diag_curr[j] = (is_match && h > 0 && h == diag) as u8;

            if h > max_cell.0 {
                *max_cell = (h, pos);
            }
        }

        std::mem::swap(h_prev, h_curr);
        std::mem::swap(diag_prev, diag_curr);
    }
}
