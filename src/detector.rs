/*!
 * The variant detector: scans a book's token stream for name-variant
 * occurrences.
 *
 * For each position the detector first tries the book's pattern
 * dictionary (longest-pattern-first, ties by registration order) and
 * emits a `known` occurrence when a pattern matches, drawing the
 * classification from the category dictionary. A pattern whose lemma key
 * has no classification is a data-consistency gap between the two
 * dictionaries; the occurrence is emitted `unclassified` with a warning
 * rather than silently guessed. After a match the scan advances past the
 * span, so shorter patterns inside it are not re-emitted.
 *
 * Positions not covered by a pattern are candidates for `novel`
 * occurrences via the configured surface heuristics: capitalization, and
 * a list of name-formation affixes (affix-only matches carry a
 * low-confidence warning). Ignored lemmas are never emitted.
 *
 * The scan is lazy, finite, and restartable from any token index, which
 * is how session resumption avoids re-presenting reviewed positions.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::app_config::HeuristicsConfig;
use crate::dictionaries::normalization::fold;
use crate::dictionaries::{Category, Dictionaries, PatternDictionary};
use crate::token_stream::{Token, TokenStream};

/// Whether an occurrence matched a known pattern or was newly detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Matched an entry of the book's pattern dictionary
    Known,
    /// Surfaced by a heuristic, awaiting curator confirmation
    Novel,
}

/// Classification state of an occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// A direct proper name
    Name,
    /// A descriptive naming variant
    Epithet,
    /// Not yet classified; surfaced for curator review
    Unclassified,
}

impl From<Category> for Classification {
    fn from(category: Category) -> Self {
        match category {
            Category::Name => Self::Name,
            Category::Epithet => Self::Epithet,
        }
    }
}

/// Non-fatal annotations attached to an occurrence during detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum OccurrenceWarning {
    /// The pattern dictionary knows the lemma but the category dictionary
    /// holds no classification for it
    ClassificationGap {
        /// Lemma key missing from the category dictionary
        lemma: String,
    },
    /// The occurrence was surfaced by the affix heuristic alone
    LowConfidence {
        /// Affix that triggered the match
        affix: String,
    },
}

impl fmt::Display for OccurrenceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClassificationGap { lemma } => {
                write!(f, "pattern \"{lemma}\" has no entry in the category dictionary")
            }
            Self::LowConfidence { affix } => {
                write!(f, "matched only by name-formation affix \"{affix}\"")
            }
        }
    }
}

/// One observed instance of a candidate name variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    /// Book the occurrence belongs to
    pub book_id: String,
    /// Position of the first token of the span
    pub start_position: usize,
    /// Position of the last token of the span
    pub end_position: usize,
    /// Surface text as it appears in the book
    pub surface: String,
    /// Canonical lemma key, e.g. `"der wirt"`
    pub lemma: String,
    /// Collocation window: surrounding tokens, clipped at book boundaries
    pub window: Vec<Token>,
    /// Classification drawn from the category dictionary, if any
    pub classification: Classification,
    /// Whether the occurrence was known or novel
    pub provenance: Provenance,
    /// Non-fatal detection warnings
    pub warnings: Vec<OccurrenceWarning>,
}

impl Occurrence {
    /// Render the collocation window with the matched span in the middle,
    /// for curator presentation (KWIC-style).
    pub fn context_line(&self) -> String {
        let left: Vec<&str> = self
            .window
            .iter()
            .filter(|t| t.position < self.start_position)
            .map(|t| t.surface.as_str())
            .collect();
        let right: Vec<&str> = self
            .window
            .iter()
            .filter(|t| t.position > self.end_position)
            .map(|t| t.surface.as_str())
            .collect();
        format!("{} [{}] {}", left.join(" "), self.surface, right.join(" "))
            .trim()
            .to_string()
    }
}

/// Scanner configuration plus the matching logic.
#[derive(Debug, Clone)]
pub struct VariantDetector {
    window_size: usize,
    heuristics: HeuristicsConfig,
}

impl VariantDetector {
    /// Create a detector with the run's window size and heuristics
    pub fn new(window_size: usize, heuristics: HeuristicsConfig) -> Self {
        Self {
            window_size,
            heuristics,
        }
    }

    /// Collocation window size used for emitted occurrences
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Lazy scan over a whole stream, starting at token index
    /// `from_index`.
    pub fn scan<'a>(
        &'a self,
        stream: &'a TokenStream,
        dictionaries: &'a Dictionaries,
        patterns: &'a PatternDictionary,
        from_index: usize,
    ) -> OccurrenceScan<'a> {
        OccurrenceScan {
            detector: self,
            stream,
            dictionaries,
            patterns,
            index: from_index,
        }
    }

    /// Produce the next occurrence at or after token index `index`.
    ///
    /// Returns the occurrence and the index to continue from. This is the
    /// stepping form of [`VariantDetector::scan`] used by the annotation
    /// controller, which mutates the dictionaries between steps.
    pub fn next_from(
        &self,
        stream: &TokenStream,
        dictionaries: &Dictionaries,
        patterns: &PatternDictionary,
        mut index: usize,
    ) -> Option<(Occurrence, usize)> {
        let tokens = stream.tokens();
        let max_pattern_len = patterns.max_len().max(1);

        while index < tokens.len() {
            let tail_end = (index + max_pattern_len).min(tokens.len());
            let tail: Vec<&str> = tokens[index..tail_end]
                .iter()
                .map(|t| t.lemma.as_str())
                .collect();

            if let Some(pattern) = patterns.longest_match(&tail) {
                let key = pattern.key();
                if !dictionaries.ignore.contains(&key) {
                    let end = index + pattern.len() - 1;
                    let occurrence =
                        self.known_occurrence(stream, dictionaries, index, end, key);
                    return Some((occurrence, end + 1));
                }
                index += pattern.len();
                continue;
            }

            let token = &tokens[index];
            if dictionaries.ignore.contains(&token.lemma) {
                index += 1;
                continue;
            }

            if let Some(occurrence) = self.novel_occurrence(stream, index) {
                return Some((occurrence, index + 1));
            }
            index += 1;
        }
        None
    }

    fn known_occurrence(
        &self,
        stream: &TokenStream,
        dictionaries: &Dictionaries,
        start: usize,
        end: usize,
        lemma: String,
    ) -> Occurrence {
        let tokens = stream.tokens();
        let surface: Vec<&str> = tokens[start..=end].iter().map(|t| t.surface.as_str()).collect();

        let (classification, warnings) = match dictionaries.categories.get(&lemma) {
            Some(category) => (category.into(), Vec::new()),
            None => (
                Classification::Unclassified,
                vec![OccurrenceWarning::ClassificationGap {
                    lemma: lemma.clone(),
                }],
            ),
        };

        Occurrence {
            book_id: stream.book_id().to_string(),
            start_position: tokens[start].position,
            end_position: tokens[end].position,
            surface: surface.join(" "),
            lemma,
            window: stream.collocation_window(start, end, self.window_size),
            classification,
            provenance: Provenance::Known,
            warnings,
        }
    }

    fn novel_occurrence(&self, stream: &TokenStream, index: usize) -> Option<Occurrence> {
        let token = &stream.tokens()[index];

        if token.surface.chars().count() < self.heuristics.min_surface_len {
            return None;
        }
        if !token.surface.chars().all(char::is_alphanumeric) {
            return None;
        }

        let capitalized = self.heuristics.capitalized
            && token.surface.chars().next().is_some_and(char::is_uppercase);

        let affix_hit = if capitalized {
            None
        } else {
            let folded = fold(&token.surface);
            self.heuristics
                .name_affixes
                .iter()
                .find(|affix| !affix.is_empty() && folded.ends_with(affix.as_str()))
                .cloned()
        };

        if !capitalized && affix_hit.is_none() {
            return None;
        }

        let warnings = match affix_hit {
            Some(affix) => vec![OccurrenceWarning::LowConfidence { affix }],
            None => Vec::new(),
        };

        Some(Occurrence {
            book_id: stream.book_id().to_string(),
            start_position: token.position,
            end_position: token.position,
            surface: token.surface.clone(),
            lemma: token.lemma.clone(),
            window: stream.collocation_window(index, index, self.window_size),
            classification: Classification::Unclassified,
            provenance: Provenance::Novel,
            warnings,
        })
    }
}

/// Lazy iterator over the occurrences of one stream.
///
/// Borrows the dictionaries immutably, so it suits headless scans and
/// tests; the interactive controller steps with
/// [`VariantDetector::next_from`] instead.
pub struct OccurrenceScan<'a> {
    detector: &'a VariantDetector,
    stream: &'a TokenStream,
    dictionaries: &'a Dictionaries,
    patterns: &'a PatternDictionary,
    index: usize,
}

impl Iterator for OccurrenceScan<'_> {
    type Item = Occurrence;

    fn next(&mut self) -> Option<Occurrence> {
        let (occurrence, next_index) = self.detector.next_from(
            self.stream,
            self.dictionaries,
            self.patterns,
            self.index,
        )?;
        self.index = next_index;
        Some(occurrence)
    }
}
