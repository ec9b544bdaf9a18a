//! Multi-stage prefilter.
//!
//! Rejects or fast-classifies most candidates in O(|candidate|) without
//! touching alignment DP. The cascade order is fixed: empty query, length
//! gate, exact, prefix, substring, character-set gate. The character-set
//! gate runs last among the cheap checks because it is the only one with a
//! non-trivial constant factor.

use memchr::memmem;

use crate::bytes::ByteBitmap;
use crate::config::Algorithm;
use crate::query::PreparedQuery;

/// Outcome of the cascade.
pub(crate) enum Prefiltered {
    /// A fast recognizer classified the candidate.
    Hit(FastHit),
    /// The candidate cannot match; stop.
    Rejected,
    /// Fall through to the configured engine.
    Survived,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FastHit {
    /// Folded bytes are equal (also covers the empty query).
    Exact,
    /// The folded candidate starts with the folded query.
    Prefix,
    /// The folded query occurs at byte offset `start` (> 0).
    Substring { start: usize },
}

pub(crate) fn run(query: &PreparedQuery, candidate_folded: &[u8]) -> Prefiltered {
    let q = query.len();
    let c = candidate_folded.len();

    if q == 0 {
        return Prefiltered::Hit(FastHit::Exact);
    }

    // Length gate. Prefix edit distance allows the candidate to be a
    // prefix of any length >= q - k, so only a query longer than the
    // candidate plus the edit budget is hopeless. Local alignment only
    // needs a non-empty candidate.
    match query.config().algorithm {
        Algorithm::EditDistance(ed) => {
            if q > c + ed.max_edit_distance {
                return Prefiltered::Rejected;
            }
        }
        Algorithm::SmithWaterman(_) => {
            if c == 0 {
                return Prefiltered::Rejected;
            }
        }
    }

    let query_folded = query.folded_bytes();

    if q <= c && &candidate_folded[..q] == query_folded {
        return Prefiltered::Hit(if q == c { FastHit::Exact } else { FastHit::Prefix });
    }

    if let Some(start) = memmem::find(candidate_folded, query_folded) {
        // start == 0 was covered by the prefix check above.
        return Prefiltered::Hit(FastHit::Substring { start });
    }

    if let Algorithm::EditDistance(ed) = query.config().algorithm {
        let candidate_bitmap = ByteBitmap::from_bytes(candidate_folded);
        let missing = query.char_bitmap().missing_from(&candidate_bitmap) as usize;
        if missing > ed.max_edit_distance {
            return Prefiltered::Rejected;
        }
    }

    Prefiltered::Survived
}
