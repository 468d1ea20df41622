/*!
 * Session state models.
 *
 * `SessionState` is the persisted record of one book's curation
 * progress: the outcome of every reviewed occurrence position plus the
 * cursor to resume from. It is serialized as a flat JSON document keyed
 * by the book id.
 */

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Final or pending outcome of one reviewed occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewOutcome {
    /// Confirmed as a proper name
    ConfirmedName,
    /// Confirmed as an epithet
    ConfirmedEpithet,
    /// Recorded but excluded from the dictionaries
    Rejected,
    /// Left unclassified, re-presented in a later session
    Deferred,
}

impl ReviewOutcome {
    /// Terminal outcomes are never re-presented; deferred ones are.
    pub fn is_final(&self) -> bool {
        !matches!(self, Self::Deferred)
    }
}

/// Persisted curation progress for one book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    /// Session ID
    pub id: String,
    /// Book this session belongs to
    pub book_id: String,
    /// Fingerprint of the token stream the session was created against
    pub stream_hash: String,
    /// Outcome per reviewed occurrence start position
    pub reviewed: BTreeMap<usize, ReviewOutcome>,
    /// Highest position presented so far
    pub cursor: usize,
    /// Creation time (RFC 3339)
    pub created_at: String,
    /// Last update time (RFC 3339)
    pub updated_at: String,
}

impl SessionState {
    /// Create a fresh session for a book
    pub fn new(book_id: &str, stream_hash: &str) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            id: Uuid::new_v4().to_string(),
            book_id: book_id.to_string(),
            stream_hash: stream_hash.to_string(),
            reviewed: BTreeMap::new(),
            cursor: 0,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Record the outcome for an occurrence position and advance the
    /// cursor.
    pub fn mark_reviewed(&mut self, position: usize, outcome: ReviewOutcome) {
        self.reviewed.insert(position, outcome);
        if position > self.cursor {
            self.cursor = position;
        }
        self.updated_at = Utc::now().to_rfc3339();
    }

    /// Outcome recorded at a position, if any
    pub fn outcome_at(&self, position: usize) -> Option<ReviewOutcome> {
        self.reviewed.get(&position).copied()
    }

    /// Whether a position has a terminal outcome and must not be
    /// re-presented.
    pub fn is_finalized(&self, position: usize) -> bool {
        self.outcome_at(position).is_some_and(|o| o.is_final())
    }

    /// Positions deferred to a later session, in order
    pub fn deferred_positions(&self) -> Vec<usize> {
        self.reviewed
            .iter()
            .filter(|(_, o)| **o == ReviewOutcome::Deferred)
            .map(|(p, _)| *p)
            .collect()
    }

    /// Whether this session matches the given stream fingerprint
    pub fn matches_stream(&self, stream_hash: &str) -> bool {
        self.stream_hash == stream_hash
    }

    /// Count of reviewed positions with the given outcome
    pub fn count(&self, outcome: ReviewOutcome) -> usize {
        self.reviewed.values().filter(|o| **o == outcome).count()
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}: {} reviewed ({} deferred), cursor at {}",
            &self.id[..8.min(self.id.len())],
            self.book_id,
            self.reviewed.len(),
            self.count(ReviewOutcome::Deferred),
            self.cursor
        )
    }
}
