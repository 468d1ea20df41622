/*!
 * Annotation controller: the review loop tying detection, curation and
 * persistence together.
 *
 * One run walks a book's token stream, presents each detected occurrence
 * to the curator, applies the decision to the dictionaries and the
 * book's pattern dictionary, and checkpoints the session after every
 * decision. A failed checkpoint aborts the run instead of risking a
 * decision that was applied but not recorded.
 *
 * Positions with a terminal outcome in the resumed session are skipped;
 * deferred positions are re-presented.
 */

use anyhow::Result;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::curator::{ConflictResolution, Curator, Decision};
use crate::detector::{Classification, Occurrence, Provenance, VariantDetector};
use crate::dictionaries::patterns::Pattern;
use crate::dictionaries::{Category, Dictionaries, PatternDictionary};
use crate::errors::{AppError, DictionaryError};
use crate::session::ReviewOutcome;
use crate::store::DataStore;
use crate::token_stream::TokenStream;

/// An occurrence together with its recorded review outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalizedOccurrence {
    pub occurrence: Occurrence,
    pub outcome: ReviewOutcome,
}

/// Counters for one review run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub presented: usize,
    pub confirmed_names: usize,
    pub confirmed_epithets: usize,
    pub rejected: usize,
    pub deferred: usize,
    pub ignored: usize,
    /// Whether the curator stopped the run before the end of the stream
    pub aborted: bool,
}

/// Result of reviewing one book.
#[derive(Debug, Clone)]
pub struct BookRun {
    pub summary: RunSummary,
    /// Occurrences decided this run, with their final classification
    pub finalized: Vec<FinalizedOccurrence>,
}

/// Drives the review loop for one or more books.
pub struct AnnotationController<C: Curator> {
    detector: VariantDetector,
    dictionaries: Dictionaries,
    curator: C,
}

impl<C: Curator> AnnotationController<C> {
    pub fn new(detector: VariantDetector, dictionaries: Dictionaries, curator: C) -> Self {
        Self {
            detector,
            dictionaries,
            curator,
        }
    }

    /// Shared dictionaries as mutated by the run so far
    pub fn dictionaries(&self) -> &Dictionaries {
        &self.dictionaries
    }

    /// Give the curator back, consuming the controller
    pub fn into_parts(self) -> (Dictionaries, C) {
        (self.dictionaries, self.curator)
    }

    /// Review one book end to end, resuming its session if one exists.
    pub fn run_book(
        &mut self,
        stream: &TokenStream,
        patterns: &mut PatternDictionary,
        store: &DataStore,
    ) -> Result<BookRun, AppError> {
        let mut guard = store.open_session(stream.book_id(), &stream.content_hash())?;
        let mut summary = RunSummary::default();
        let mut finalized = Vec::new();
        let mut index = 0;

        while let Some((occurrence, next_index)) =
            self.detector
                .next_from(stream, &self.dictionaries, patterns, index)
        {
            index = next_index;
            if guard.state().is_finalized(occurrence.start_position) {
                continue;
            }

            // the curator may need several attempts for one occurrence,
            // e.g. when an ignore request is refused
            loop {
                summary.presented += 1;
                let decision = self.curator.decide(&occurrence)?;

                match decision {
                    Decision::ConfirmName | Decision::ConfirmEpithet => {
                        let proposed = if decision == Decision::ConfirmName {
                            Category::Name
                        } else {
                            Category::Epithet
                        };
                        let category = self.apply_confirmation(&occurrence, proposed)?;
                        if occurrence.provenance == Provenance::Novel {
                            patterns
                                .register(Pattern::new(occurrence.lemma.split_whitespace()));
                        }
                        store.save_dictionaries(&self.dictionaries)?;
                        store.save_patterns(stream.book_id(), patterns)?;

                        let outcome = match category {
                            Category::Name => {
                                summary.confirmed_names += 1;
                                ReviewOutcome::ConfirmedName
                            }
                            Category::Epithet => {
                                summary.confirmed_epithets += 1;
                                ReviewOutcome::ConfirmedEpithet
                            }
                        };
                        guard.mark_reviewed(occurrence.start_position, outcome);
                        guard.checkpoint()?;
                        finalized.push(FinalizedOccurrence {
                            occurrence: reclassified(occurrence, category),
                            outcome,
                        });
                    }
                    Decision::Reject => {
                        summary.rejected += 1;
                        guard.mark_reviewed(occurrence.start_position, ReviewOutcome::Rejected);
                        guard.checkpoint()?;
                        finalized.push(FinalizedOccurrence {
                            occurrence,
                            outcome: ReviewOutcome::Rejected,
                        });
                    }
                    Decision::Defer => {
                        summary.deferred += 1;
                        guard.mark_reviewed(occurrence.start_position, ReviewOutcome::Deferred);
                        guard.checkpoint()?;
                    }
                    Decision::Ignore => {
                        match self.dictionaries.ignore_lemma(&occurrence.lemma) {
                            Ok(_) => {
                                summary.ignored += 1;
                                store.save_dictionaries(&self.dictionaries)?;
                            }
                            Err(DictionaryError::LemmaClassified { lemma, existing }) => {
                                warn!(
                                    "Cannot ignore \"{}\": already classified as {}",
                                    lemma, existing
                                );
                                // re-present the same occurrence
                                continue;
                            }
                            Err(e) => return Err(e.into()),
                        }
                    }
                    Decision::Abort => {
                        info!("Run aborted by curator at position {}", occurrence.start_position);
                        summary.aborted = true;
                        guard.checkpoint()?;
                        return Ok(BookRun { summary, finalized });
                    }
                }
                break;
            }
        }

        guard.checkpoint()?;
        info!(
            "Finished {}: {} presented, {} names, {} epithets, {} rejected, {} deferred, {} ignored",
            stream.book_id(),
            summary.presented,
            summary.confirmed_names,
            summary.confirmed_epithets,
            summary.rejected,
            summary.deferred,
            summary.ignored
        );
        Ok(BookRun { summary, finalized })
    }

    /// Apply a confirmed classification, surfacing conflicts to the
    /// curator. Returns the classification actually on record afterwards.
    fn apply_confirmation(
        &mut self,
        occurrence: &Occurrence,
        proposed: Category,
    ) -> Result<Category, AppError> {
        match self.dictionaries.classify(&occurrence.lemma, proposed, false) {
            Ok(()) => Ok(proposed),
            Err(DictionaryError::ClassificationConflict { lemma, existing, .. }) => {
                let resolution = self
                    .curator
                    .resolve_conflict(&lemma, existing, proposed)?;
                match resolution {
                    ConflictResolution::Override => {
                        self.dictionaries
                            .classify(&occurrence.lemma, proposed, true)?;
                        Ok(proposed)
                    }
                    ConflictResolution::KeepExisting => Ok(existing),
                }
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Headless scan of one book, without a session or curator.
pub fn scan_book(
    detector: &VariantDetector,
    stream: &TokenStream,
    dictionaries: &Dictionaries,
    patterns: &PatternDictionary,
) -> Vec<Occurrence> {
    detector.scan(stream, dictionaries, patterns, 0).collect()
}

fn reclassified(mut occurrence: Occurrence, category: Category) -> Occurrence {
    occurrence.classification = Classification::from(category);
    occurrence
}
