//! The controller: wires prefilter, engine and scorer together, plus the
//! bulk convenience surface.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::align;
use crate::boundary;
use crate::buffer::{ScoringBuffer, make_buffer};
use crate::config::Algorithm;
use crate::edit::{self, EdResult};
use crate::prefilter::{self, FastHit, Prefiltered};
use crate::query::PreparedQuery;
use crate::score;
use crate::{CandidateMatch, MatchKind, ScoredMatch};

/// Per-call pipeline: fold the candidate, run the prefilter, dispatch to
/// the configured engine on survival, normalize and gate.
///
/// No heap allocation happens once the buffer has grown to cover the
/// largest query/candidate seen; neither the candidate nor the prepared
/// query is mutated, and buffer contents never influence the result.
pub(crate) fn score_candidate(
    candidate: &str,
    query: &PreparedQuery,
    buf: &mut ScoringBuffer,
) -> Option<ScoredMatch> {
    let cand = candidate.as_bytes();
    buf.fold_candidate(cand);

    let config = query.config();
    let min_score = config.min_score;

    match prefilter::run(query, &buf.candidate_folded) {
        Prefiltered::Rejected => None,
        Prefiltered::Hit(hit) => {
            let (fast_score, fast_kind) = fast_hit_score(hit, query, cand, buf);
            // In alignment mode a substring hit still competes with the
            // engine; the higher normalized score and its kind win.
            if let Algorithm::SmithWaterman(sw) = &config.algorithm
                && matches!(hit, FastHit::Substring { .. })
            {
                buf.collect_word_initials(cand);
                if let Some(outcome) = align::run(query, cand, sw, buf) {
                    let aligned = score::alignment(outcome.raw, outcome.max_raw);
                    if aligned > fast_score {
                        return gate(aligned, MatchKind::Alignment, min_score);
                    }
                }
            }
            gate(fast_score, fast_kind, min_score)
        }
        Prefiltered::Survived => {
            buf.collect_word_initials(cand);
            match &config.algorithm {
                Algorithm::EditDistance(ed) => match edit::run(query, cand, ed, buf)? {
                    EdResult::Acronym => gate(score::acronym(), MatchKind::Acronym, min_score),
                    EdResult::OneChar { pos, word_start } => gate(
                        score::one_char(pos, cand.len(), word_start),
                        MatchKind::Substring,
                        min_score,
                    ),
                    EdResult::Fuzzy {
                        distance,
                        gap_runs,
                        bonus_sum,
                        matched_initials,
                    } => {
                        let fuzzy =
                            score::fuzzy(distance, query.len(), cand.len(), gap_runs, bonus_sum);
                        if matched_initials > 0 {
                            gate(
                                score::partial_acronym(fuzzy, matched_initials, query.len()),
                                MatchKind::Acronym,
                                min_score,
                            )
                        } else {
                            gate(fuzzy, MatchKind::Fuzzy, min_score)
                        }
                    }
                },
                Algorithm::SmithWaterman(sw) => {
                    let outcome = align::run(query, cand, sw, buf)?;
                    gate(
                        score::alignment(outcome.raw, outcome.max_raw),
                        MatchKind::Alignment,
                        min_score,
                    )
                }
            }
        }
    }
}

#[inline]
fn gate(score: f32, kind: MatchKind, min_score: f32) -> Option<ScoredMatch> {
    (score >= min_score).then_some(ScoredMatch { score, kind })
}

fn fast_hit_score(
    hit: FastHit,
    query: &PreparedQuery,
    cand: &[u8],
    buf: &ScoringBuffer,
) -> (f32, MatchKind) {
    let q = query.len();
    let c = cand.len();
    // The classification weights only apply in edit-distance mode.
    let (prefix_weight, substring_weight) = match &query.config().algorithm {
        Algorithm::EditDistance(ed) => (ed.prefix_weight, ed.substring_weight),
        Algorithm::SmithWaterman(_) => (1.0, 1.0),
    };
    match hit {
        FastHit::Exact => (score::exact(), MatchKind::Exact),
        FastHit::Prefix => (score::prefix(q, c, prefix_weight), MatchKind::Prefix),
        FastHit::Substring { start } => {
            let word_start = boundary::is_word_start(cand, &buf.candidate_folded, start);
            (
                score::substring(q, c, start, word_start, substring_weight),
                MatchKind::Substring,
            )
        }
    }
}

// ---------------------------------------------------------------------------
// Bulk convenience surface
// ---------------------------------------------------------------------------

/// Score every candidate and return the matches sorted by descending
/// score. Single-threaded; callers shard candidates to parallelize.
pub fn matches<I>(candidates: I, query: &PreparedQuery) -> Vec<CandidateMatch<I::Item>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut buffer = make_buffer();
    let mut out: Vec<CandidateMatch<I::Item>> = candidates
        .into_iter()
        .filter_map(|candidate| {
            score_candidate(candidate.as_ref(), query, &mut buffer).map(|m| CandidateMatch {
                candidate,
                score: m.score,
                kind: m.kind,
            })
        })
        .collect();
    out.sort_by(|a, b| b.score.total_cmp(&a.score));
    out
}

/// Keep only the `limit` best matches via a bounded min-heap and return
/// them sorted by descending score. Ties keep the earlier candidate.
pub fn top_matches<I>(
    candidates: I,
    query: &PreparedQuery,
    limit: usize,
) -> Vec<CandidateMatch<I::Item>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    if limit == 0 {
        return Vec::new();
    }
    let mut buffer = make_buffer();
    let mut heap: BinaryHeap<Reverse<HeapEntry<I::Item>>> = BinaryHeap::with_capacity(limit + 1);
    for (seq, candidate) in candidates.into_iter().enumerate() {
        let Some(m) = score_candidate(candidate.as_ref(), query, &mut buffer) else {
            continue;
        };
        let entry = HeapEntry {
            score: m.score,
            kind: m.kind,
            seq,
            candidate,
        };
        if heap.len() < limit {
            heap.push(Reverse(entry));
        } else {
            let beats_worst = heap.peek().is_some_and(|worst| entry > worst.0);
            if beats_worst {
                heap.pop();
                heap.push(Reverse(entry));
            }
        }
    }
    heap.into_sorted_vec()
        .into_iter()
        .map(|Reverse(entry)| CandidateMatch {
            candidate: entry.candidate,
            score: entry.score,
            kind: entry.kind,
        })
        .collect()
}

struct HeapEntry<T> {
    score: f32,
    kind: MatchKind,
    seq: usize,
    candidate: T,
}

impl<T> PartialEq for HeapEntry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for HeapEntry<T> {}

impl<T> PartialOrd for HeapEntry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for HeapEntry<T> {
    // Higher score ranks higher; equal scores rank the earlier candidate
    // higher, which also makes the output order deterministic.
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}
