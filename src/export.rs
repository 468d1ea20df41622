/*!
 * Export of annotation results for downstream analysis.
 *
 * The flat occurrence record keeps only surfaces and stable identifiers,
 * so an exported bundle is self-contained: importing it into an empty
 * store reproduces the same classifications. Collocation windows are
 * exported as surface lists, the shape concordance tooling expects.
 */

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::detector::{Classification, Occurrence, Provenance};
use crate::dictionaries::patterns::Pattern;
use crate::dictionaries::{CategoryDictionary, PatternDictionary};
use crate::file_utils::FileManager;

/// Flat, self-contained record of one occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccurrenceRecord {
    pub book_id: String,
    pub start_position: usize,
    pub end_position: usize,
    pub surface: String,
    pub lemma: String,
    pub classification: Classification,
    pub provenance: Provenance,
    /// Collocation window surfaces, left to right, span excluded
    pub window: Vec<String>,
}

impl From<&Occurrence> for OccurrenceRecord {
    fn from(occurrence: &Occurrence) -> Self {
        Self {
            book_id: occurrence.book_id.clone(),
            start_position: occurrence.start_position,
            end_position: occurrence.end_position,
            surface: occurrence.surface.clone(),
            lemma: occurrence.lemma.clone(),
            classification: occurrence.classification,
            provenance: occurrence.provenance,
            window: occurrence
                .window
                .iter()
                .map(|t| t.surface.clone())
                .collect(),
        }
    }
}

/// Everything needed to reproduce a book's annotation state elsewhere.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportBundle {
    pub book_id: String,
    pub occurrences: Vec<OccurrenceRecord>,
    /// Classifications for every lemma appearing in the occurrences
    pub categories: CategoryDictionary,
    /// The book's confirmed patterns, in registration order
    pub patterns: Vec<Pattern>,
}

impl ExportBundle {
    /// Assemble a bundle from a finished run's occurrences.
    pub fn new(
        book_id: &str,
        occurrences: &[Occurrence],
        categories: &CategoryDictionary,
        patterns: &PatternDictionary,
    ) -> Self {
        Self {
            book_id: book_id.to_string(),
            occurrences: occurrences.iter().map(OccurrenceRecord::from).collect(),
            categories: categories.clone(),
            patterns: patterns.iter().cloned().collect(),
        }
    }

    /// Write the bundle as pretty-printed JSON.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        FileManager::write_json_atomic(path.as_ref(), self)
            .with_context(|| format!("Failed to write export bundle: {:?}", path.as_ref()))
    }

    /// Read a bundle back.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        FileManager::read_json(path.as_ref())
            .with_context(|| format!("Failed to read export bundle: {:?}", path.as_ref()))
    }

    /// Occurrence counts per lemma, split by classification.
    pub fn frequency_summary(&self) -> BTreeMap<Classification, BTreeMap<String, usize>> {
        let mut summary: BTreeMap<Classification, BTreeMap<String, usize>> = BTreeMap::new();
        for record in &self.occurrences {
            *summary
                .entry(record.classification)
                .or_default()
                .entry(record.lemma.clone())
                .or_default() += 1;
        }
        summary
    }
}
