//! Query preparation.

use crate::boundary;
use crate::bytes::{self, ByteBitmap};
use crate::config::MatchConfig;

/// Immutable, metadata-rich representation of a user query.
///
/// Built once, then shared freely: all fields are read-only and the type
/// is `Send + Sync`, so one prepared query can serve any number of
/// concurrent scoring threads (each holding its own [`ScoringBuffer`]).
///
/// [`ScoringBuffer`]: crate::ScoringBuffer
#[derive(Clone, Debug)]
pub struct PreparedQuery {
    original: Vec<u8>,
    folded: Vec<u8>,
    char_bitmap: ByteBitmap,
    word_starts: Vec<usize>,
    config: MatchConfig,
}

/// Prepare a query with the default configuration (edit-distance engine,
/// `min_score` 0).
pub fn prepare(query: &str) -> PreparedQuery {
    prepare_with(query, MatchConfig::default())
}

/// Prepare a query with an explicit configuration.
pub fn prepare_with(query: &str, config: MatchConfig) -> PreparedQuery {
    let original = query.as_bytes().to_vec();
    let mut folded = Vec::with_capacity(original.len());
    bytes::fold_into(&original, &mut folded);
    let char_bitmap = ByteBitmap::from_bytes(&folded);
    let mut word_starts = Vec::new();
    boundary::collect_word_starts(&original, &folded, &mut word_starts);
    debug!(
        "prepared query {:?}: {} bytes, {} words, algorithm {}",
        query,
        folded.len(),
        word_starts.len(),
        config.algorithm.name()
    );
    PreparedQuery {
        original,
        folded,
        char_bitmap,
        word_starts,
        config,
    }
}

impl PreparedQuery {
    /// Query length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.folded.len()
    }

    /// Whether the query is empty. An empty query matches everything.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.folded.is_empty()
    }

    /// The query bytes as typed, un-folded.
    #[inline]
    pub fn original_bytes(&self) -> &[u8] {
        &self.original
    }

    /// The ASCII-lowercased query bytes. Same length as the original.
    #[inline]
    pub fn folded_bytes(&self) -> &[u8] {
        &self.folded
    }

    /// Presence set of the folded query bytes.
    #[inline]
    pub fn char_bitmap(&self) -> &ByteBitmap {
        &self.char_bitmap
    }

    /// Positions at which a query word begins.
    #[inline]
    pub fn word_starts(&self) -> &[usize] {
        &self.word_starts
    }

    /// The configuration this query was prepared with.
    #[inline]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folding_preserves_length_and_bitmap_tracks_folded_bytes() {
        let query = prepare("GetUserById");
        assert_eq!(query.original_bytes().len(), query.folded_bytes().len());
        assert_eq!(query.folded_bytes(), b"getuserbyid");
        for &b in query.folded_bytes() {
            assert!(query.char_bitmap().contains(b));
        }
        // The bitmap tracks folded bytes, not originals.
        assert!(!query.char_bitmap().contains(b'G'));
    }

    #[test]
    fn word_starts_begin_at_zero() {
        let query = prepare("getUser");
        assert_eq!(query.word_starts(), &[0, 3]);
        assert!(prepare("").word_starts().is_empty());
    }
}
