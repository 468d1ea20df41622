/*!
 * Error types for the onoma annotation engine.
 *
 * This module contains custom error types for different parts of the
 * application, using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

use crate::dictionaries::categories::Category;

/// Errors raised while validating or scanning a book's token stream.
///
/// These are fatal for the affected book's run: a malformed stream cannot
/// be annotated, although progress already checkpointed survives.
#[derive(Error, Debug)]
pub enum DetectorError {
    /// Token positions must be strictly increasing within a book
    #[error("book {book}: token position {position} is not after previous position {previous}")]
    NonMonotonicPosition {
        /// Book identifier
        book: String,
        /// Offending position
        position: usize,
        /// Position of the preceding token
        previous: usize,
    },

    /// The same position appeared twice in the stream
    #[error("book {book}: duplicate token position {position}")]
    DuplicatePosition {
        /// Book identifier
        book: String,
        /// Duplicated position
        position: usize,
    },
}

/// Errors raised by dictionary updates.
///
/// Classification conflicts are recoverable: they are surfaced to the
/// curator and the run continues once resolved. The dictionaries are left
/// unchanged when a conflicting write is refused.
#[derive(Error, Debug)]
pub enum DictionaryError {
    /// A lemma already holds a different classification
    #[error("lemma \"{lemma}\" is already classified as {existing}, refusing {proposed} without explicit override")]
    ClassificationConflict {
        /// Canonical lemma
        lemma: String,
        /// Classification currently on record
        existing: Category,
        /// Classification that was refused
        proposed: Category,
    },

    /// An ignored lemma cannot simultaneously hold a classification
    #[error("lemma \"{lemma}\" is in the ignore set and cannot be classified")]
    LemmaIgnored {
        /// Canonical lemma
        lemma: String,
    },

    /// A classified lemma cannot be moved into the ignore set
    #[error("lemma \"{lemma}\" is classified as {existing} and cannot be ignored")]
    LemmaClassified {
        /// Canonical lemma
        lemma: String,
        /// Classification currently on record
        existing: Category,
    },

    /// A normalization rule would silently remap an existing canonical lemma
    #[error("normalization rule for \"{variant}\" would remap canonical lemma \"{lemma}\" to \"{target}\"")]
    NormalizationConflict {
        /// Raw variant the rule applies to
        variant: String,
        /// Canonical lemma the variant already resolves to
        lemma: String,
        /// Lemma the refused rule pointed at
        target: String,
    },

    /// Merging two category dictionaries found irreconcilable entries
    #[error("{} lemma(s) conflict between the merged category dictionaries", conflicts.len())]
    MergeConflicts {
        /// One entry per conflicting lemma
        conflicts: Vec<MergeConflict>,
    },
}

/// A single cross-dictionary disagreement found during a merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConflict {
    /// Canonical lemma both sides classified
    pub lemma: String,
    /// Classification held by the receiving dictionary
    pub ours: Category,
    /// Classification held by the incoming dictionary
    pub theirs: Category,
}

/// Errors raised by session persistence.
///
/// A failed checkpoint is fatal for the current decision: the batch aborts
/// rather than silently continuing without the write.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Writing a session checkpoint failed
    #[error("failed to checkpoint session for book {book}: {reason}")]
    Checkpoint {
        /// Book identifier
        book: String,
        /// Underlying failure
        reason: String,
    },

    /// Reading a persisted session failed
    #[error("failed to load session for book {book}: {reason}")]
    Load {
        /// Book identifier
        book: String,
        /// Underlying failure
        reason: String,
    },

    /// The book's token stream no longer matches the persisted session
    #[error("book {book} changed since session {session} was created")]
    BookChanged {
        /// Book identifier
        book: String,
        /// Stale session id
        session: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the variant detector
    #[error("Detector error: {0}")]
    Detector(#[from] DetectorError),

    /// Error from a dictionary update
    #[error("Dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    /// Error from session persistence
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
