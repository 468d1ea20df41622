/*!
 * Lemma normalization: raw spellings to canonical lemma forms.
 *
 * Normalization is a two-stage, pure function. A fixed fold pass handles
 * case and the spelling variation typical of Middle High German editions
 * (diacritics, ligatures, `iu`/`üe` diphthongs, consonantal `v`). A
 * table lookup then maps folded variants onto their canonical lemma.
 * Canonical lemmas are stored pre-folded, which makes the whole function
 * idempotent: normalizing a canonical form returns it unchanged.
 */

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::DictionaryError;

/// Character and digraph substitutions applied before any table lookup.
/// Order matters: single characters fold before the digraphs, so a
/// substitution that creates a digraph still folds in the same pass.
const FOLD_TABLE: &[(&str, &str)] = &[
    ("æ", "ae"),
    ("œ", "oe"),
    ("é", "e"),
    ("è", "e"),
    ("ë", "e"),
    ("á", "a"),
    ("à", "a"),
    ("û", "u"),
    ("î", "i"),
    ("â", "a"),
    ("ô", "o"),
    ("ê", "e"),
    ("ü", "u"),
    ("ö", "o"),
    ("ä", "a"),
    ("ß", "ss"),
    ("iu", "ie"),
    ("üe", "ue"),
];

/// Apply the fixed fold rules to a raw string.
///
/// Lowercases, substitutes the fold table, rewrites a standalone `v` word
/// to `f`, and collapses internal whitespace. Total over any input and
/// idempotent on its own output.
pub fn fold(raw: &str) -> String {
    let mut text = raw.trim().to_lowercase();
    for (from, to) in FOLD_TABLE {
        if text.contains(from) {
            text = text.replace(from, to);
        }
    }

    let words: Vec<&str> = text
        .split_whitespace()
        .map(|w| if w == "v" { "f" } else { w })
        .collect();
    words.join(" ")
}

/// Mapping of canonical lemmas to the raw spelling variants that resolve
/// to them.
///
/// Serialized as `{lemma: [variant, ...]}`, matching the persisted
/// `lemma_normalization.json` layout; the reverse index used for lookup
/// is rebuilt on load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Vec<String>>", into = "BTreeMap<String, Vec<String>>")]
pub struct NormalizationTable {
    /// canonical lemma -> sorted variant list
    entries: BTreeMap<String, Vec<String>>,
    /// folded variant -> canonical lemma
    #[serde(skip)]
    reverse: BTreeMap<String, String>,
}

impl NormalizationTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize a raw form to its canonical lemma.
    ///
    /// Unmapped forms return themselves after folding, so the function is
    /// total. `normalize(normalize(x)) == normalize(x)` holds for every
    /// input.
    pub fn normalize(&self, raw: &str) -> String {
        let folded = fold(raw);
        match self.reverse.get(&folded) {
            Some(lemma) => lemma.clone(),
            None => folded,
        }
    }

    /// Register a raw variant of a canonical lemma.
    ///
    /// Both sides are folded before insertion. A variant that is already
    /// the canonical form of another lemma is refused: accepting it would
    /// remap that lemma and break idempotence.
    pub fn add_rule(&mut self, lemma: &str, variant: &str) -> Result<(), DictionaryError> {
        let lemma = fold(lemma);
        let variant = fold(variant);

        if variant == lemma {
            // a lemma is trivially its own variant
            return Ok(());
        }

        if self.entries.contains_key(&variant) {
            return Err(DictionaryError::NormalizationConflict {
                variant: variant.clone(),
                lemma: variant,
                target: lemma,
            });
        }
        if let Some(existing) = self.reverse.get(&variant) {
            if *existing != lemma {
                return Err(DictionaryError::NormalizationConflict {
                    variant,
                    lemma: existing.clone(),
                    target: lemma,
                });
            }
            return Ok(());
        }

        let variants = self.entries.entry(lemma.clone()).or_default();
        if !variants.contains(&variant) {
            variants.push(variant.clone());
            variants.sort();
        }
        self.reverse.insert(variant, lemma);
        Ok(())
    }

    /// Whether a folded form is a known canonical lemma
    pub fn is_canonical(&self, lemma: &str) -> bool {
        self.entries.contains_key(&fold(lemma))
    }

    /// Number of canonical lemmas with at least one registered variant
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no rules
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(lemma, variants)` pairs in lemma order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.entries.iter()
    }
}

impl From<BTreeMap<String, Vec<String>>> for NormalizationTable {
    fn from(entries: BTreeMap<String, Vec<String>>) -> Self {
        let mut table = Self {
            entries: BTreeMap::new(),
            reverse: BTreeMap::new(),
        };
        for (lemma, variants) in entries {
            for variant in variants {
                // Persisted rules were validated on the way in; a stale
                // conflict in a hand-edited file keeps the first mapping.
                let _ = table.add_rule(&lemma, &variant);
            }
        }
        table
    }
}

impl From<NormalizationTable> for BTreeMap<String, Vec<String>> {
    fn from(table: NormalizationTable) -> Self {
        table.entries
    }
}
