//! Bounded prefix-edit-distance engine.
//!
//! Computes the minimum number of single-byte insertions, deletions,
//! substitutions and adjacent transpositions needed to turn the query into
//! some *prefix* of the candidate, capped at the configured budget. The
//! candidate is aligned against its best prefix, never the whole string.
//!
//! ## Pruning strategies
//!
//! - **Diagonal banding**: with budget `k`, only cells within `k` of the
//!   main diagonal can stay under the cap, so each candidate column
//!   computes at most `2k + 1` query rows.
//! - **Early termination**: costs never decrease along the recurrence, so
//!   once every in-band cell of a column exceeds `k` the candidate is
//!   dead and the scan stops.
//!
//! The scoring pass keeps three rolling columns (the third is what the
//! transposition reads, two columns back). Rolling state cannot be walked
//! backwards, so match positions are recovered by densely re-scoring the
//! accepted window (at most `q + k` bytes) and tracing back through it.

use crate::boundary;
use crate::buffer::ScoringBuffer;
use crate::config::{BONUS_CONSECUTIVE, BONUS_WORD_START, EditDistanceConfig, RawScore};
use crate::query::PreparedQuery;

/// Cost ceiling for unreachable cells. Saturating arithmetic keeps
/// additions from wrapping past it.
const INF: u16 = u16::MAX / 2;

#[inline(always)]
fn cost(v: usize) -> u16 {
    v.min(INF as usize) as u16
}

/// Raw engine outcome, consumed by the scorer.
pub(crate) enum EdResult {
    /// The query equals the leading candidate word initials.
    Acronym,
    /// One-character fast path: first occurrence of the query byte.
    OneChar { pos: usize, word_start: bool },
    /// DP outcome. `matched_initials` is non-zero when at least half of
    /// the query matched the candidate's word initials in order.
    Fuzzy {
        distance: usize,
        gap_runs: usize,
        bonus_sum: RawScore,
        matched_initials: usize,
    },
}

enum AcronymProbe {
    Full,
    Partial { matched: usize },
    None,
}

pub(crate) fn run(
    query: &PreparedQuery,
    candidate: &[u8],
    config: &EditDistanceConfig,
    buf: &mut ScoringBuffer,
) -> Option<EdResult> {
    let q = query.len();
    let query_folded = query.folded_bytes();

    // One-character fast path. The DP is near-useless for q == 1: any
    // candidate containing the byte matches with distance 0, and a
    // candidate lacking it should be rejected rather than matched through
    // a substitution against its first byte.
    if q == 1 {
        let pos = memchr::memchr(query_folded[0], &buf.candidate_folded)?;
        let word_start = boundary::is_word_start(candidate, &buf.candidate_folded, pos);
        return Some(EdResult::OneChar { pos, word_start });
    }

    let mut matched_initials = 0;
    match acronym_probe(query_folded, &buf.candidate_folded, &buf.word_initials) {
        AcronymProbe::Full => return Some(EdResult::Acronym),
        AcronymProbe::Partial { matched } => matched_initials = matched,
        AcronymProbe::None => {}
    }

    let k = config.max_edit_distance;
    buf.ensure_ed_rows(q + 1);
    let distance = {
        let ScoringBuffer {
            candidate_folded,
            ed_row_prev2,
            ed_row_prev,
            ed_row_curr,
            alignment_state,
            ..
        } = &mut *buf;
        banded_prefix_distance(
            query_folded,
            candidate_folded,
            k,
            ed_row_prev2,
            ed_row_prev,
            ed_row_curr,
            alignment_state,
        )?
    };

    let end = buf.alignment_state;
    buf.ensure_ed_matrix((q + 1) * (end + 1));
    let (bonus_sum, gap_runs) = {
        let ScoringBuffer {
            candidate_folded,
            ed_matrix,
            match_positions,
            ..
        } = &mut *buf;
        recover_match_positions(query_folded, &candidate_folded[..end], ed_matrix, match_positions);
        bonus_over_positions(match_positions, &candidate[..end], &candidate_folded[..end])
    };

    Some(EdResult::Fuzzy {
        distance,
        gap_runs,
        bonus_sum,
        matched_initials,
    })
}

/// Test the query against the candidate's word initials.
///
/// Engages only when the candidate has at least as many words as the query
/// has bytes. A full match is an acronym; matching at least half of the
/// query bytes in order keeps an acronym bonus alive through the DP.
fn acronym_probe(query_folded: &[u8], folded: &[u8], initials: &[usize]) -> AcronymProbe {
    let q = query_folded.len();
    if q < 2 || q > initials.len() {
        return AcronymProbe::None;
    }
    if initials[..q]
        .iter()
        .zip(query_folded)
        .all(|(&p, &b)| folded[p] == b)
    {
        return AcronymProbe::Full;
    }
    let mut matched = 0;
    for &p in initials {
        if matched < q && folded[p] == query_folded[matched] {
            matched += 1;
        }
    }
    if matched >= q.div_ceil(2) {
        AcronymProbe::Partial { matched }
    } else {
        AcronymProbe::None
    }
}

/// Banded DP over rolling columns.
///
/// Returns the bounded distance to the best candidate prefix and writes
/// the winning prefix length to `end_out`; ties break toward the shorter
/// prefix. `None` when every prefix needs more than `k` edits.
fn banded_prefix_distance(
    query_folded: &[u8],
    candidate_folded: &[u8],
    k: usize,
    prev2: &mut Vec<u16>,
    prev: &mut Vec<u16>,
    curr: &mut Vec<u16>,
    end_out: &mut usize,
) -> Option<usize> {
    let q = query_folded.len();
    let c = candidate_folded.len();
    // Prefixes longer than q + k cost more than k on length alone.
    let last_col = c.min(q + k);

    // Column 0: turning query[..i] into the empty prefix costs i deletions.
    for (i, cell) in prev.iter_mut().enumerate().take(q + 1) {
        *cell = cost(i);
    }
    // The empty prefix itself is a valid target when q <= k.
    let mut best: (u16, usize) = if q <= k { (cost(q), 0) } else { (INF, 0) };

    for j in 1..=last_col {
        let lo = j.saturating_sub(k);
        let hi = (j + k).min(q);
        let cj = candidate_folded[j - 1];

        // The cell just below the band is unreachable; seed it so the
        // in-band delete move reads INF.
        if lo > 0 {
            curr[lo - 1] = INF;
        }

        let mut col_min = INF;
        for i in lo..=hi {
            let cell = if i == 0 {
                cost(j)
            } else {
                let qi = query_folded[i - 1];
                let substitute = prev[i - 1].saturating_add((qi != cj) as u16);
                let delete = curr[i - 1].saturating_add(1);
                let insert = prev[i].saturating_add(1);
                let mut cell = substitute.min(delete).min(insert);
                if i >= 2 && j >= 2 && qi == candidate_folded[j - 2] && query_folded[i - 2] == cj {
                    cell = cell.min(prev2[i - 2].saturating_add(1));
                }
                cell
            };
            curr[i] = cell;
            col_min = col_min.min(cell);
        }

        // Guard cell above the band: the next column's insert move reads
        // one row past this band.
        if hi < q {
            curr[hi + 1] = INF;
        }

        if hi == q && curr[q] < best.0 {
            best = (curr[q], j);
        }

        // Costs never decrease along the recurrence: a dead column kills
        // every later one.
        if col_min as usize > k {
            break;
        }

        std::mem::swap(prev2, prev);
        std::mem::swap(prev, curr);
    }

    if best.0 as usize <= k {
        *end_out = best.1;
        Some(best.0 as usize)
    } else {
        None
    }
}

/// Densely re-score the accepted window and walk back from `(q, w)`,
/// recording the candidate positions matched to a query byte.
fn recover_match_positions(
    query_folded: &[u8],
    window: &[u8],
    matrix: &mut [u16],
    positions: &mut Vec<usize>,
) {
    let q = query_folded.len();
    let w = window.len();
    let cols = w + 1;

    for j in 0..=w {
        matrix[j] = cost(j);
    }
    for i in 1..=q {
        let qi = query_folded[i - 1];
        matrix[i * cols] = cost(i);
        for j in 1..=w {
            let wj = window[j - 1];
            let substitute = matrix[(i - 1) * cols + j - 1].saturating_add((qi != wj) as u16);
            let delete = matrix[(i - 1) * cols + j].saturating_add(1);
            let insert = matrix[i * cols + j - 1].saturating_add(1);
            let mut cell = substitute.min(delete).min(insert);
            if i >= 2 && j >= 2 && qi == window[j - 2] && query_folded[i - 2] == wj {
                cell = cell.min(matrix[(i - 2) * cols + j - 2].saturating_add(1));
            }
            matrix[i * cols + j] = cell;
        }
    }

    positions.clear();
    let mut i = q;
    let mut j = w;
    while i > 0 && j > 0 {
        let here = matrix[i * cols + j];
        if query_folded[i - 1] == window[j - 1] && matrix[(i - 1) * cols + j - 1] == here {
            positions.push(j - 1);
            i -= 1;
            j -= 1;
            continue;
        }
        if i >= 2
            && j >= 2
            && query_folded[i - 1] == window[j - 2]
            && query_folded[i - 2] == window[j - 1]
            && matrix[(i - 2) * cols + j - 2].saturating_add(1) == here
        {
            // Both transposed bytes are genuine matches, just swapped.
            positions.push(j - 1);
            positions.push(j - 2);
            i -= 2;
            j -= 2;
            continue;
        }
        let substitute = matrix[(i - 1) * cols + j - 1];
        let delete = matrix[(i - 1) * cols + j];
        let insert = matrix[i * cols + j - 1];
        if substitute <= delete && substitute <= insert {
            i -= 1;
            j -= 1;
        } else if delete <= insert {
            i -= 1;
        } else {
            j -= 1;
        }
    }
    // Traceback produces positions in reverse order.
    positions.reverse();
}

/// Accumulate word-start and consecutive-match bonuses over the matched
/// positions, and count the gap runs between them.
fn bonus_over_positions(positions: &[usize], original: &[u8], folded: &[u8]) -> (RawScore, usize) {
    let mut bonus_sum = 0;
    let mut gap_runs = 0;
    let mut prev: Option<usize> = None;
    for &p in positions {
        if boundary::is_word_start(original, folded, p) {
            bonus_sum += BONUS_WORD_START;
        }
        match prev {
            Some(pp) if pp + 1 == p => bonus_sum += BONUS_CONSECUTIVE,
            Some(_) => gap_runs += 1,
            None => {}
        }
        prev = Some(p);
    }
    (bonus_sum, gap_runs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fold(s: &str) -> Vec<u8> {
        s.bytes().map(|b| b.to_ascii_lowercase()).collect()
    }

    fn distance(query: &str, candidate: &str, k: usize) -> Option<(usize, usize)> {
        let qf = fold(query);
        let cf = fold(candidate);
        let mut prev2 = vec![0u16; qf.len() + 1];
        let mut prev = vec![0u16; qf.len() + 1];
        let mut curr = vec![0u16; qf.len() + 1];
        let mut end = 0;
        banded_prefix_distance(&qf, &cf, k, &mut prev2, &mut prev, &mut curr, &mut end)
            .map(|d| (d, end))
    }

    #[test]
    fn exact_prefix_has_distance_zero() {
        assert_eq!(distance("getuser", "getuserbyid", 2), Some((0, 7)));
        assert_eq!(distance("ab", "ab", 2), Some((0, 2)));
    }

    #[test]
    fn single_substitution() {
        assert_eq!(distance("getuser", "setuser", 2), Some((1, 7)));
    }

    #[test]
    fn adjacent_transposition_is_one_edit() {
        assert_eq!(distance("gteuser", "getuser", 2), Some((1, 7)));
        // Dropping the trailing "c" is just as cheap as transposing, and
        // the shorter prefix wins the tie.
        assert_eq!(distance("abdc", "abcd", 2), Some((1, 3)));
    }

    #[test]
    fn insertion_and_deletion() {
        // Dropping the trailing "r" reaches the 5-byte prefix in one edit.
        assert_eq!(distance("getusr", "getuser", 2), Some((1, 5)));
        // Query carries one byte the candidate lacks.
        assert_eq!(distance("getxuser", "getuser", 2), Some((1, 7)));
    }

    #[test]
    fn over_budget_is_rejected() {
        assert_eq!(distance("abcdef", "fedcba", 2), None);
        assert_eq!(distance("getuser", "fetchda", 2), None);
    }

    #[test]
    fn ties_break_toward_the_shorter_prefix() {
        // "ab" matches the prefix "a" (one deletion), "aa" (one
        // substitution) and "aab" (one insertion); the shortest wins.
        assert_eq!(distance("ab", "aab", 1), Some((1, 1)));
    }

    #[test]
    fn recovery_records_matched_positions() {
        let qf = fold("getuser");
        let cf = fold("setuser");
        let mut matrix = vec![0u16; (qf.len() + 1) * (cf.len() + 1)];
        let mut positions = Vec::new();
        recover_match_positions(&qf, &cf, &mut matrix, &mut positions);
        // Every byte except the substituted "g" is a genuine match.
        assert_eq!(positions, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn recovery_keeps_transposed_bytes_as_matches() {
        let qf = fold("gteuser");
        let cf = fold("getuser");
        let mut matrix = vec![0u16; (qf.len() + 1) * (cf.len() + 1)];
        let mut positions = Vec::new();
        recover_match_positions(&qf, &cf, &mut matrix, &mut positions);
        assert_eq!(positions, vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn bonus_counts_word_starts_consecutives_and_gaps() {
        let original = b"setUser";
        let folded = fold("setUser");
        let (bonus, gaps) = bonus_over_positions(&[1, 2, 3, 4, 5, 6], original, &folded);
        // Position 3 is the camelCase word start (+8); positions 2..=6
        // each follow a matched neighbour (+4 each).
        assert_eq!(bonus, 8 + 5 * 4);
        assert_eq!(gaps, 0);

        let (_, gaps) = bonus_over_positions(&[0, 1, 4, 5], original, &folded);
        assert_eq!(gaps, 1);
    }

    #[test]
    fn acronym_probe_full_and_partial() {
        let folded = fold("Bristol-Myers Squibb");
        let initials = vec![0, 8, 14];
        assert!(matches!(
            acronym_probe(b"bms", &folded, &initials),
            AcronymProbe::Full
        ));
        assert!(matches!(
            acronym_probe(b"bmq", &folded, &initials),
            AcronymProbe::Partial { matched: 2 }
        ));
        // Fewer initials than query bytes: the path stays out.
        assert!(matches!(
            acronym_probe(b"bmsq", &folded, &initials),
            AcronymProbe::None
        ));
    }
}
