//! Reusable scoring scratch.

use crate::boundary;
use crate::bytes;
use crate::config::RawScore;

/// Caller-owned scratch area for the scoring pipeline.
///
/// Create one per working thread with [`make_buffer`] and pass it to every
/// [`score`](crate::score) call. Capacity grows monotonically to the
/// largest query/candidate seen and never shrinks; contents are logically
/// invalidated between calls, so reusing a buffer yields results identical
/// to a fresh one. Exclusive `&mut` access rules out cross-thread sharing
/// by construction.
#[derive(Default, Debug)]
pub struct ScoringBuffer {
    /// ASCII-folded bytes of the candidate under evaluation.
    pub(crate) candidate_folded: Vec<u8>,
    /// Rolling edit-distance columns. The third column enables the
    /// Damerau transposition, which reads two columns back.
    pub(crate) ed_row_prev2: Vec<u16>,
    pub(crate) ed_row_prev: Vec<u16>,
    pub(crate) ed_row_curr: Vec<u16>,
    /// Full-cost window for match-position recovery; the rolling columns
    /// cannot be walked backwards, so the accepted window is re-scored
    /// densely here before traceback.
    pub(crate) ed_matrix: Vec<u16>,
    /// Candidate positions matched to a query byte, ascending.
    pub(crate) match_positions: Vec<usize>,
    /// Candidate word-start positions, ascending.
    pub(crate) word_initials: Vec<usize>,
    /// Smith-Waterman rolling H rows.
    pub(crate) sw_row_prev: Vec<RawScore>,
    pub(crate) sw_row_curr: Vec<RawScore>,
    /// The F column of the affine recurrence, updated in place.
    pub(crate) sw_gap_col: Vec<RawScore>,
    /// Whether each cell's best move was a diagonal match; feeds the
    /// consecutive bonus one row later.
    pub(crate) sw_diag_prev: Vec<u8>,
    pub(crate) sw_diag_curr: Vec<u8>,
    /// Best alignment cell seen by the most recent Smith-Waterman pass:
    /// raw score and 0-indexed end position in the candidate.
    pub(crate) sw_max_cell: (RawScore, usize),
    /// Edit-distance tie-break scratch: the winning prefix end column.
    pub(crate) alignment_state: usize,
}

/// Create an empty scoring buffer.
pub fn make_buffer() -> ScoringBuffer {
    ScoringBuffer::default()
}

/// Grow-only resize; existing capacity is never released.
#[inline]
fn grow<T: Copy>(v: &mut Vec<T>, len: usize, fill: T) {
    if v.len() < len {
        v.resize(len, fill);
    }
}

impl ScoringBuffer {
    /// Fold the candidate bytes into the reusable buffer.
    #[inline]
    pub(crate) fn fold_candidate(&mut self, candidate: &[u8]) {
        bytes::fold_into(candidate, &mut self.candidate_folded);
    }

    /// Collect the folded candidate's word starts into `word_initials`.
    pub(crate) fn collect_word_initials(&mut self, original: &[u8]) {
        let ScoringBuffer {
            candidate_folded,
            word_initials,
            ..
        } = self;
        boundary::collect_word_starts(original, candidate_folded, word_initials);
    }

    /// Ensure the three rolling edit-distance columns hold `width` cells.
    pub(crate) fn ensure_ed_rows(&mut self, width: usize) {
        grow(&mut self.ed_row_prev2, width, 0);
        grow(&mut self.ed_row_prev, width, 0);
        grow(&mut self.ed_row_curr, width, 0);
    }

    /// Ensure the recovery window holds `cells` entries.
    pub(crate) fn ensure_ed_matrix(&mut self, cells: usize) {
        grow(&mut self.ed_matrix, cells, 0);
    }

    /// Ensure the Smith-Waterman rows hold `width` cells.
    pub(crate) fn ensure_sw_rows(&mut self, width: usize) {
        grow(&mut self.sw_row_prev, width, 0);
        grow(&mut self.sw_row_curr, width, 0);
        grow(&mut self.sw_gap_col, width, 0);
        grow(&mut self.sw_diag_prev, width, 0);
        grow(&mut self.sw_diag_curr, width, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_is_monotonic() {
        let mut buffer = make_buffer();
        buffer.ensure_ed_rows(32);
        assert_eq!(buffer.ed_row_curr.len(), 32);
        buffer.ensure_ed_rows(8);
        // Shrink requests are ignored.
        assert_eq!(buffer.ed_row_curr.len(), 32);
        buffer.ensure_ed_rows(64);
        assert_eq!(buffer.ed_row_curr.len(), 64);
    }

    #[test]
    fn fold_candidate_reuses_allocation() {
        let mut buffer = make_buffer();
        buffer.fold_candidate(b"Bristol-Myers Squibb");
        let capacity = buffer.candidate_folded.capacity();
        buffer.fold_candidate(b"AAPL");
        assert_eq!(buffer.candidate_folded, b"aapl");
        assert_eq!(buffer.candidate_folded.capacity(), capacity);
    }

    #[test]
    fn word_initials_track_the_current_candidate() {
        let mut buffer = make_buffer();
        buffer.fold_candidate(b"Bristol-Myers Squibb");
        buffer.collect_word_initials(b"Bristol-Myers Squibb");
        assert_eq!(buffer.word_initials, vec![0, 8, 14]);
        buffer.fold_candidate(b"plain");
        buffer.collect_word_initials(b"plain");
        assert_eq!(buffer.word_initials, vec![0]);
    }
}
