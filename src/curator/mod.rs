/*!
 * Curator ports: how classification decisions reach the engine.
 *
 * The annotation pipeline blocks on exactly one step, the curator
 * decision. It is abstracted behind the synchronous [`Curator`] trait so
 * the detection and state-machine logic runs headlessly with scripted
 * decisions in tests, while the CLI plugs in the interactive console
 * implementation.
 */

use anyhow::Result;

use crate::detector::Occurrence;
use crate::dictionaries::Category;

/// A decision made for one presented occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Confirm the lemma as a proper name
    ConfirmName,
    /// Confirm the lemma as an epithet
    ConfirmEpithet,
    /// Record the occurrence but keep it out of the dictionaries
    Reject,
    /// Leave unclassified; re-present in a later session
    Defer,
    /// Add the lemma to the ignore set and stop surfacing it
    Ignore,
    /// Stop the run; partial progress is checkpointed
    Abort,
}

/// How a classification conflict is resolved after being surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictResolution {
    /// Keep the classification already on record
    KeepExisting,
    /// Overwrite with the newly proposed classification
    Override,
}

/// Synchronous decision port between the engine and the curator.
///
/// The pipeline suspends on [`Curator::decide`] with no timeout; an
/// open-ended wait is the intended workflow. Implementations signal
/// cancellation by returning [`Decision::Abort`], which still
/// checkpoints partial progress.
pub trait Curator {
    /// Present an occurrence and wait for the curator's decision
    fn decide(&mut self, occurrence: &Occurrence) -> Result<Decision>;

    /// Surface a classification conflict and wait for its resolution
    fn resolve_conflict(
        &mut self,
        lemma: &str,
        existing: Category,
        proposed: Category,
    ) -> Result<ConflictResolution>;
}

pub mod console;
pub mod scripted;

pub use console::ConsoleCurator;
