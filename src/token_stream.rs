/*!
 * Validated per-book token streams and collocation windows.
 *
 * The loader boundary hands the core an ordered sequence of
 * `(position, surface)` pairs for one book. `TokenStream::new` validates
 * the ordering invariant (strictly increasing positions) and resolves
 * every surface form to its canonical lemma once, so the detector never
 * re-normalizes. A non-monotonic or duplicate position is fatal for the
 * book's run.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::dictionaries::NormalizationTable;
use crate::errors::DetectorError;

/// Word tokens for the plain-text loader; punctuation is dropped.
static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("valid token regex"));

/// One word-form with its position inside a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Position index within the book
    pub position: usize,
    /// Surface form as it appears in the text
    pub surface: String,
    /// Canonical lemma after normalization
    pub lemma: String,
}

/// The ordered, validated token sequence of one book.
#[derive(Debug, Clone)]
pub struct TokenStream {
    book_id: String,
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Build a stream from already-positioned surface forms.
    ///
    /// Positions must be strictly increasing; violations abort with
    /// `DetectorError`, naming the book and position involved.
    pub fn new(
        book_id: &str,
        entries: Vec<(usize, String)>,
        normalization: &NormalizationTable,
    ) -> Result<Self, DetectorError> {
        let mut tokens = Vec::with_capacity(entries.len());
        let mut previous: Option<usize> = None;

        for (position, surface) in entries {
            match previous {
                Some(prev) if position == prev => {
                    return Err(DetectorError::DuplicatePosition {
                        book: book_id.to_string(),
                        position,
                    });
                }
                Some(prev) if position < prev => {
                    return Err(DetectorError::NonMonotonicPosition {
                        book: book_id.to_string(),
                        position,
                        previous: prev,
                    });
                }
                _ => {}
            }
            previous = Some(position);

            let lemma = normalization.normalize(&surface);
            tokens.push(Token {
                position,
                surface,
                lemma,
            });
        }

        Ok(Self {
            book_id: book_id.to_string(),
            tokens,
        })
    }

    /// Tokenize plain text into a stream, numbering tokens from zero.
    pub fn from_text(
        book_id: &str,
        text: &str,
        normalization: &NormalizationTable,
    ) -> Result<Self, DetectorError> {
        let entries = WORD_RE
            .find_iter(text)
            .enumerate()
            .map(|(i, m)| (i, m.as_str().to_string()))
            .collect();
        Self::new(book_id, entries, normalization)
    }

    /// Book this stream belongs to
    pub fn book_id(&self) -> &str {
        &self.book_id
    }

    /// All tokens in order
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the book is empty
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Index of the first token at or after `position`, for resuming a
    /// scan from a session cursor.
    pub fn index_at_or_after(&self, position: usize) -> usize {
        self.tokens
            .partition_point(|t| t.position < position)
    }

    /// SHA256 fingerprint over positions and surface forms.
    ///
    /// Used to detect that a book's text changed since a session was
    /// created; lemmas are excluded so normalization rule growth does not
    /// invalidate sessions.
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.book_id.as_bytes());
        for token in &self.tokens {
            hasher.update(token.position.to_le_bytes());
            hasher.update([0u8]);
            hasher.update(token.surface.as_bytes());
            hasher.update([0u8]);
        }
        format!("{:x}", hasher.finalize())
    }

    /// Extract the collocation window around the token index span
    /// `[start, end]` (inclusive).
    ///
    /// Returns up to `window_size` tokens on each side, clipped at the
    /// book boundaries; no wraparound, no padding. The matched span
    /// itself is excluded. Pure function over the stream.
    pub fn collocation_window(&self, start: usize, end: usize, window_size: usize) -> Vec<Token> {
        debug_assert!(start <= end && end < self.tokens.len());

        let left_from = start.saturating_sub(window_size);
        let right_to = (end + 1 + window_size).min(self.tokens.len());

        let mut window = Vec::with_capacity((start - left_from) + (right_to - end - 1));
        window.extend_from_slice(&self.tokens[left_from..start]);
        window.extend_from_slice(&self.tokens[end + 1..right_to]);
        window
    }
}
