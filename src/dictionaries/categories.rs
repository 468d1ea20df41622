/*!
 * The category dictionary: canonical lemma -> classification.
 *
 * Classifications accumulate across sessions and books. Entries are
 * append-only except for explicit curator override; a conflicting write
 * without the override flag is refused and surfaced, never applied
 * silently. Persisted as a flat `{lemma: "a" | "e"}` map.
 */

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{DictionaryError, MergeConflict};

/// Curator-assigned classification of a canonical lemma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    /// A direct proper name (category `a`)
    #[serde(rename = "a")]
    Name,
    /// A descriptive naming variant (category `e`)
    #[serde(rename = "e")]
    Epithet,
}

impl Category {
    /// Single-letter label used in the persisted stores and curator prompts
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "a",
            Self::Epithet => "e",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Epithet => write!(f, "epithet"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "a" | "name" => Ok(Self::Name),
            "e" | "epithet" => Ok(Self::Epithet),
            other => Err(anyhow::anyhow!("invalid category: {}", other)),
        }
    }
}

/// Global mapping of canonical lemmas to their classification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryDictionary {
    entries: BTreeMap<String, Category>,
}

impl CategoryDictionary {
    /// Create an empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the classification of a canonical lemma
    pub fn get(&self, lemma: &str) -> Option<Category> {
        self.entries.get(lemma).copied()
    }

    /// Whether the lemma holds any classification
    pub fn contains(&self, lemma: &str) -> bool {
        self.entries.contains_key(lemma)
    }

    /// Classify a lemma, refusing to overwrite a conflicting entry.
    ///
    /// Re-asserting the recorded classification is a no-op. A different
    /// classification returns `ClassificationConflict` and leaves the
    /// dictionary unchanged; the caller resolves it with the curator and
    /// may retry via [`CategoryDictionary::classify_with_override`].
    pub fn classify(&mut self, lemma: &str, category: Category) -> Result<(), DictionaryError> {
        match self.entries.get(lemma) {
            Some(existing) if *existing != category => {
                Err(DictionaryError::ClassificationConflict {
                    lemma: lemma.to_string(),
                    existing: *existing,
                    proposed: category,
                })
            }
            Some(_) => Ok(()),
            None => {
                self.entries.insert(lemma.to_string(), category);
                Ok(())
            }
        }
    }

    /// Overwrite a lemma's classification after explicit curator confirmation
    pub fn classify_with_override(&mut self, lemma: &str, category: Category) {
        self.entries.insert(lemma.to_string(), category);
    }

    /// Remove a lemma's classification, returning the removed entry
    pub fn remove(&mut self, lemma: &str) -> Option<Category> {
        self.entries.remove(lemma)
    }

    /// Merge another dictionary into this one.
    ///
    /// New lemmas and agreeing entries are absorbed. Disagreeing entries
    /// are collected and returned as `MergeConflicts` with neither side
    /// applied; last-confirmed-wins is never applied silently.
    pub fn merge(&mut self, other: &CategoryDictionary) -> Result<usize, DictionaryError> {
        // conflicts are collected before anything is absorbed, so a
        // refused merge leaves the receiving dictionary untouched
        let conflicts: Vec<MergeConflict> = other
            .entries
            .iter()
            .filter_map(|(lemma, theirs)| match self.entries.get(lemma) {
                Some(ours) if ours != theirs => Some(MergeConflict {
                    lemma: lemma.clone(),
                    ours: *ours,
                    theirs: *theirs,
                }),
                _ => None,
            })
            .collect();
        if !conflicts.is_empty() {
            return Err(DictionaryError::MergeConflicts { conflicts });
        }

        let mut absorbed = 0usize;
        for (lemma, theirs) in &other.entries {
            if !self.entries.contains_key(lemma) {
                self.entries.insert(lemma.clone(), *theirs);
                absorbed += 1;
            }
        }
        Ok(absorbed)
    }

    /// Number of classified lemmas
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(lemma, category)` pairs in lemma order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Category)> {
        self.entries.iter()
    }
}
