/*!
 * Seed records: statically shaped rows for loading curated reference
 * data into the dictionaries.
 *
 * Scholarly name registers arrive as flat lists (lemma plus variants,
 * lemma plus category, ...). The row types here mirror that shape so a
 * register exported from elsewhere deserializes directly, and
 * [`SeedBundle::apply`] funnels every row through the same validated
 * dictionary operations as interactive curation. Conflicting rows are
 * refused with the same errors a curator would see.
 */

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::dictionaries::patterns::Pattern;
use crate::dictionaries::{Category, Dictionaries, PatternDictionary};
use crate::file_utils::FileManager;

/// One canonical lemma with its raw spelling variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizationRow {
    pub lemma: String,
    pub variants: Vec<String>,
}

/// One lemma to keep out of detection entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IgnoreRow {
    pub lemma: String,
}

/// One lemma with its confirmed classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRow {
    pub lemma: String,
    pub category: Category,
}

/// One confirmed pattern, as a lemma sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternRow {
    pub lemmas: Vec<String>,
}

/// A complete seed file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedBundle {
    #[serde(default)]
    pub normalization: Vec<NormalizationRow>,
    #[serde(default)]
    pub ignored: Vec<IgnoreRow>,
    #[serde(default)]
    pub categories: Vec<CategoryRow>,
    #[serde(default)]
    pub patterns: Vec<PatternRow>,
}

impl SeedBundle {
    /// Read a seed bundle from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        FileManager::read_json(path.as_ref())
            .with_context(|| format!("Failed to read seed file: {:?}", path.as_ref()))
    }

    /// Apply every row to the dictionaries and the pattern dictionary.
    ///
    /// Rows pass through the same conflict checks as interactive
    /// decisions; the first conflicting row aborts with its dictionary
    /// error, leaving earlier rows applied.
    pub fn apply(
        &self,
        dictionaries: &mut Dictionaries,
        patterns: &mut PatternDictionary,
    ) -> Result<()> {
        for row in &self.normalization {
            for variant in &row.variants {
                dictionaries
                    .normalization
                    .add_rule(&row.lemma, variant)
                    .with_context(|| format!("Seed normalization row for \"{}\"", row.lemma))?;
            }
        }
        for row in &self.ignored {
            dictionaries
                .ignore_lemma(&row.lemma)
                .with_context(|| format!("Seed ignore row for \"{}\"", row.lemma))?;
        }
        for row in &self.categories {
            dictionaries
                .classify(&row.lemma, row.category, false)
                .with_context(|| format!("Seed category row for \"{}\"", row.lemma))?;
        }
        let mut registered = 0;
        for row in &self.patterns {
            if patterns.register(Pattern::new(row.lemmas.iter().cloned())) {
                registered += 1;
            }
        }

        info!(
            "Applied seed: {} normalization lemmas, {} ignored, {} categories, {} new patterns",
            self.normalization.len(),
            self.ignored.len(),
            self.categories.len(),
            registered
        );
        Ok(())
    }
}
