/*!
 * Scripted curator for headless runs and tests.
 *
 * Plays back a fixed sequence of decisions and conflict resolutions,
 * recording everything that was presented so tests can assert on the
 * exact review flow.
 */

use std::collections::VecDeque;

use anyhow::Result;

use crate::curator::{ConflictResolution, Curator, Decision};
use crate::detector::Occurrence;
use crate::dictionaries::Category;

/// A conflict the engine surfaced to this curator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfacedConflict {
    /// Canonical lemma in conflict
    pub lemma: String,
    /// Classification on record
    pub existing: Category,
    /// Classification that was proposed
    pub proposed: Category,
}

/// Curator that answers from a prepared script.
#[derive(Debug, Default)]
pub struct ScriptedCurator {
    decisions: VecDeque<Decision>,
    resolutions: VecDeque<ConflictResolution>,
    /// Decision returned once the script is exhausted
    fallback: Option<Decision>,
    /// Everything that was presented, in order
    pub presented: Vec<Occurrence>,
    /// Every conflict that was surfaced, in order
    pub conflicts: Vec<SurfacedConflict>,
}

impl ScriptedCurator {
    /// Answer with the given decisions in order; error when exhausted
    pub fn from_script<I: IntoIterator<Item = Decision>>(decisions: I) -> Self {
        Self {
            decisions: decisions.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Confirm every occurrence as a proper name
    pub fn confirming_names() -> Self {
        Self {
            fallback: Some(Decision::ConfirmName),
            ..Self::default()
        }
    }

    /// Defer every occurrence
    pub fn deferring_all() -> Self {
        Self {
            fallback: Some(Decision::Defer),
            ..Self::default()
        }
    }

    /// Reject every occurrence
    pub fn rejecting_all() -> Self {
        Self {
            fallback: Some(Decision::Reject),
            ..Self::default()
        }
    }

    /// Queue conflict resolutions; defaults to `KeepExisting` when empty
    pub fn with_resolutions<I: IntoIterator<Item = ConflictResolution>>(
        mut self,
        resolutions: I,
    ) -> Self {
        self.resolutions = resolutions.into_iter().collect();
        self
    }

    /// Continue the script with a fallback decision once exhausted
    pub fn with_fallback(mut self, fallback: Decision) -> Self {
        self.fallback = Some(fallback);
        self
    }
}

impl Curator for ScriptedCurator {
    fn decide(&mut self, occurrence: &Occurrence) -> Result<Decision> {
        self.presented.push(occurrence.clone());
        match self.decisions.pop_front().or(self.fallback) {
            Some(decision) => Ok(decision),
            None => anyhow::bail!(
                "scripted curator exhausted at {} position {}",
                occurrence.book_id,
                occurrence.start_position
            ),
        }
    }

    fn resolve_conflict(
        &mut self,
        lemma: &str,
        existing: Category,
        proposed: Category,
    ) -> Result<ConflictResolution> {
        self.conflicts.push(SurfacedConflict {
            lemma: lemma.to_string(),
            existing,
            proposed,
        });
        Ok(self
            .resolutions
            .pop_front()
            .unwrap_or(ConflictResolution::KeepExisting))
    }
}
