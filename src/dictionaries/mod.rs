/*!
 * Reference dictionaries consulted and updated during annotation.
 *
 * Four stores cooperate during a run:
 * - `normalization`: raw lemma spellings -> canonical lemma forms
 * - `ignore`: canonical lemmas excluded from candidacy (function words)
 * - `categories`: canonical lemma -> classification, global across books
 * - `patterns`: per-book confirmed name-variant patterns
 *
 * The category dictionary and the ignore set are mutually exclusive in
 * effect: a lemma may hold a classification or be ignored, never both.
 * Both insert paths enforce this.
 */

pub mod categories;
pub mod ignore;
pub mod normalization;
pub mod patterns;

pub use categories::{Category, CategoryDictionary};
pub use ignore::IgnoreSet;
pub use normalization::NormalizationTable;
pub use patterns::PatternDictionary;

/// The global dictionaries shared by every book within a run.
///
/// Exclusively owned by the annotation controller for the duration of a
/// run and passed explicitly wherever they are read, so tests can supply
/// fixture dictionaries.
#[derive(Debug, Clone, Default)]
pub struct Dictionaries {
    /// Raw spelling -> canonical lemma rules
    pub normalization: NormalizationTable,
    /// Lemmas that are never candidates
    pub ignore: IgnoreSet,
    /// Canonical lemma -> classification
    pub categories: CategoryDictionary,
}

impl Dictionaries {
    /// Create an empty dictionary set
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a lemma, enforcing exclusivity with the ignore set.
    pub fn classify(
        &mut self,
        lemma: &str,
        category: Category,
        override_existing: bool,
    ) -> Result<(), crate::errors::DictionaryError> {
        if self.ignore.contains(lemma) {
            return Err(crate::errors::DictionaryError::LemmaIgnored {
                lemma: lemma.to_string(),
            });
        }
        if override_existing {
            self.categories.classify_with_override(lemma, category);
            Ok(())
        } else {
            self.categories.classify(lemma, category)
        }
    }

    /// Move a lemma into the ignore set, enforcing exclusivity with the
    /// category dictionary.
    pub fn ignore_lemma(&mut self, lemma: &str) -> Result<bool, crate::errors::DictionaryError> {
        if let Some(existing) = self.categories.get(lemma) {
            return Err(crate::errors::DictionaryError::LemmaClassified {
                lemma: lemma.to_string(),
                existing,
            });
        }
        Ok(self.ignore.insert(lemma))
    }
}
