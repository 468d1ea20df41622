/*!
 * The ignore set: canonical lemmas that are never candidates.
 *
 * Holds function words, pronouns and similar forms the curator has ruled
 * out. Persisted as a sorted JSON array of lemmas.
 */

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Canonical lemmas excluded from variant candidacy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IgnoreSet {
    lemmas: BTreeSet<String>,
}

impl IgnoreSet {
    /// Create an empty ignore set
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a canonical lemma is ignored
    pub fn contains(&self, lemma: &str) -> bool {
        self.lemmas.contains(lemma)
    }

    /// Add a lemma; returns true if it was newly inserted.
    ///
    /// Callers holding a category dictionary must check the exclusivity
    /// invariant first (see `Dictionaries::ignore_lemma`).
    pub fn insert(&mut self, lemma: &str) -> bool {
        self.lemmas.insert(lemma.to_string())
    }

    /// Remove a lemma; returns true if it was present
    pub fn remove(&mut self, lemma: &str) -> bool {
        self.lemmas.remove(lemma)
    }

    /// Number of ignored lemmas
    pub fn len(&self) -> usize {
        self.lemmas.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.lemmas.is_empty()
    }

    /// Iterate over ignored lemmas in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.lemmas.iter()
    }
}

impl FromIterator<String> for IgnoreSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            lemmas: iter.into_iter().collect(),
        }
    }
}
