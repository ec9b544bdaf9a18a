//! Tern is a high-throughput fuzzy string matcher for interactive search
//! over large catalogs of short strings: tickers, identifiers, product
//! names, file paths.
//!
//! A query is prepared once with [`prepare`], then streamed over any
//! number of candidates with [`score`], which decides whether each
//! candidate matches, classifies the match and returns a normalized score
//! in [0, 1]. Ranking is intuitive: exact > prefix > substring > acronym >
//! alignment > fuzzy.
//!
//! ## Key design choices
//!
//! - **Prefilter first**: a cascade of cheap recognizers (length gate,
//!   exact, prefix, substring, character-set intersection) settles most
//!   candidates without touching alignment DP.
//! - **Two engines**: a bounded prefix-edit-distance engine with Damerau
//!   transposition (the default), and a Smith-Waterman local-alignment
//!   engine with affine gaps and word-boundary/case/consecutive bonuses.
//! - **Heap-free hot path**: all scratch lives in a caller-owned
//!   [`ScoringBuffer`] that grows monotonically; after warm-up a call
//!   allocates nothing.
//! - **Byte-level semantics**: strings are UTF-8 byte sequences and case
//!   folding is ASCII-only, keeping the inner loops branch-light and
//!   diacritics distinguishable.
//!
//! # Example
//!
//! ```
//! use tern::MatchKind;
//!
//! let query = tern::prepare("getUser");
//! let mut buffer = tern::make_buffer();
//!
//! let m = tern::score("getUserById", &query, &mut buffer).unwrap();
//! assert_eq!(m.kind, MatchKind::Prefix);
//!
//! assert!(tern::score("fetchData", &query, &mut buffer).is_none());
//! ```

#![warn(missing_docs)]

#[macro_use]
extern crate log;

mod align;
mod boundary;
mod buffer;
mod bytes;
mod config;
mod edit;
mod matcher;
mod prefilter;
mod query;
mod score;


pub use crate::buffer::{ScoringBuffer, make_buffer};
pub use crate::bytes::ByteBitmap;
pub use crate::config::{Algorithm, EditDistanceConfig, MatchConfig, SmithWatermanConfig};
pub use crate::matcher::{matches, top_matches};
pub use crate::query::{PreparedQuery, prepare, prepare_with};

/// Classification of a reported match, strongest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchKind {
    /// Folded bytes are equal.
    Exact,
    /// The folded candidate starts with the folded query.
    Prefix,
    /// The folded query occurs inside the candidate, not at the start.
    Substring,
    /// The query matches the candidate's word initials.
    Acronym,
    /// A Smith-Waterman local alignment won.
    Alignment,
    /// The bounded edit distance to some candidate prefix stayed within
    /// budget.
    Fuzzy,
}

/// Normalized verdict for one candidate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoredMatch {
    /// Normalized score in [0, 1], at least the configured minimum.
    pub score: f32,
    /// How the candidate matched.
    pub kind: MatchKind,
}

/// A candidate kept by the bulk helpers, with its verdict.
#[derive(Clone, Debug)]
pub struct CandidateMatch<T> {
    /// The candidate as supplied by the caller.
    pub candidate: T,
    /// Normalized score in [0, 1].
    pub score: f32,
    /// How the candidate matched.
    pub kind: MatchKind,
}

/// Score one candidate against a prepared query.
///
/// Returns `None` when the candidate does not match or scores below the
/// configured minimum. The same `(candidate, query)` pair always yields
/// the same result regardless of the buffer's history; the buffer is pure
/// scratch and is re-initialized on every call.
pub fn score(
    candidate: &str,
    query: &PreparedQuery,
    buffer: &mut ScoringBuffer,
) -> Option<ScoredMatch> {
    matcher::score_candidate(candidate, query, buffer)
}
