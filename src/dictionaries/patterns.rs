/*!
 * The pattern dictionary: confirmed name-variant patterns for one book.
 *
 * A pattern is a contiguous sequence of canonical lemmas (one or more
 * tokens). The dictionary grows monotonically as the curator confirms
 * novel occurrences. Matching is longest-pattern-first so a short pattern
 * never masks a longer overlapping one; ties on length fall back to
 * earliest registration order.
 *
 * Persisted per book as an ordered JSON array of lemma sequences, which
 * preserves registration order across sessions.
 */

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A confirmed surface pattern, expressed as canonical lemmas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pattern {
    lemmas: Vec<String>,
}

impl Pattern {
    /// Build a pattern from canonical lemmas; empty lemmas are dropped
    pub fn new<I, S>(lemmas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lemmas: lemmas
                .into_iter()
                .map(Into::into)
                .filter(|l: &String| !l.is_empty())
                .collect(),
        }
    }

    /// The canonical lemma sequence
    pub fn lemmas(&self) -> &[String] {
        &self.lemmas
    }

    /// Number of tokens the pattern spans
    pub fn len(&self) -> usize {
        self.lemmas.len()
    }

    /// Whether the pattern holds no lemmas
    pub fn is_empty(&self) -> bool {
        self.lemmas.is_empty()
    }

    /// The lemma key under which occurrences of this pattern are
    /// classified, e.g. `"der wirt"`
    pub fn key(&self) -> String {
        self.lemmas.join(" ")
    }
}

/// Ordered collection of confirmed patterns for a single book.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Pattern>", into = "Vec<Pattern>")]
pub struct PatternDictionary {
    patterns: Vec<Pattern>,
    /// first lemma -> indices into `patterns`, for prefix matching
    #[serde(skip)]
    by_first: BTreeMap<String, Vec<usize>>,
}

impl PatternDictionary {
    /// Create an empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a confirmed pattern; returns false if already present.
    /// Empty patterns are rejected the same way.
    pub fn register(&mut self, pattern: Pattern) -> bool {
        if pattern.is_empty() || self.contains(&pattern) {
            return false;
        }
        let index = self.patterns.len();
        self.by_first
            .entry(pattern.lemmas[0].clone())
            .or_default()
            .push(index);
        self.patterns.push(pattern);
        true
    }

    /// Whether an identical pattern is already registered
    pub fn contains(&self, pattern: &Pattern) -> bool {
        match self.by_first.get(pattern.lemmas.first().map_or("", |l| l)) {
            Some(indices) => indices.iter().any(|&i| self.patterns[i] == *pattern),
            None => false,
        }
    }

    /// Find the pattern matching at the start of `lemmas`.
    ///
    /// `lemmas` is the canonical-lemma tail of the token stream beginning
    /// at the scan position. Of all patterns that are a prefix of it, the
    /// longest wins; equal lengths resolve to the earliest registered.
    pub fn longest_match(&self, lemmas: &[&str]) -> Option<&Pattern> {
        let first = lemmas.first()?;
        let indices = self.by_first.get(*first)?;

        let mut best: Option<&Pattern> = None;
        for &i in indices {
            let candidate = &self.patterns[i];
            if candidate.len() > lemmas.len() {
                continue;
            }
            if !candidate
                .lemmas
                .iter()
                .zip(lemmas)
                .all(|(p, l)| p == *l)
            {
                continue;
            }
            // indices are in registration order, so strict > keeps the
            // earliest pattern on ties
            if best.is_none_or(|b| candidate.len() > b.len()) {
                best = Some(candidate);
            }
        }
        best
    }

    /// Length of the longest registered pattern, in tokens.
    /// Bounds the lookahead a scanner needs at each position.
    pub fn max_len(&self) -> usize {
        self.patterns.iter().map(Pattern::len).max().unwrap_or(0)
    }

    /// Number of registered patterns
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether no patterns are registered
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Iterate over patterns in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }
}

impl From<Vec<Pattern>> for PatternDictionary {
    fn from(patterns: Vec<Pattern>) -> Self {
        let mut dict = Self::new();
        for pattern in patterns {
            dict.register(pattern);
        }
        dict
    }
}

impl From<PatternDictionary> for Vec<Pattern> {
    fn from(dict: PatternDictionary) -> Self {
        dict.patterns
    }
}
