/*!
 * Interactive console curator.
 *
 * Presents each occurrence with its collocation context on stdout and
 * reads single-letter decisions from stdin. The matched span is
 * highlighted with ANSI bold yellow so it stands out inside the verse
 * context.
 */

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::curator::{ConflictResolution, Curator, Decision};
use crate::detector::{Classification, Occurrence, Provenance};
use crate::dictionaries::Category;

const HIGHLIGHT: &str = "\x1B[1;33m";
const RESET: &str = "\x1B[0m";

/// Curator that prompts a human reviewer on the terminal.
#[derive(Debug, Default)]
pub struct ConsoleCurator {
    /// Disable ANSI highlighting, for dumb terminals and logs
    pub plain: bool,
}

impl ConsoleCurator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the window with the matched span highlighted
    fn highlighted_context(&self, occurrence: &Occurrence) -> String {
        if self.plain {
            return occurrence.context_line();
        }
        let left: Vec<&str> = occurrence
            .window
            .iter()
            .filter(|t| t.position < occurrence.start_position)
            .map(|t| t.surface.as_str())
            .collect();
        let right: Vec<&str> = occurrence
            .window
            .iter()
            .filter(|t| t.position > occurrence.end_position)
            .map(|t| t.surface.as_str())
            .collect();
        format!(
            "{} {HIGHLIGHT}{}{RESET} {}",
            left.join(" "),
            occurrence.surface,
            right.join(" ")
        )
        .trim()
        .to_string()
    }

    fn print_occurrence(&self, occurrence: &Occurrence) {
        let provenance = match occurrence.provenance {
            Provenance::Known => "known pattern",
            Provenance::Novel => "novel candidate",
        };
        println!("{}", "-".repeat(60));
        println!(
            "{} @ {} ({provenance})",
            occurrence.book_id, occurrence.start_position
        );
        println!("  lemma:   {}", occurrence.lemma);
        println!("  surface: {}", occurrence.surface);
        if let Classification::Name | Classification::Epithet = occurrence.classification {
            println!("  on record as: {:?}", occurrence.classification);
        }
        for warning in &occurrence.warnings {
            println!("  warning: {warning}");
        }
        println!("  context: {}", self.highlighted_context(occurrence));
    }

    fn read_answer(&self, prompt: &str) -> Result<Option<String>> {
        print!("{prompt}");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        let bytes = std::io::stdin()
            .lock()
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
        if bytes == 0 {
            // EOF: treat as cancellation
            return Ok(None);
        }
        Ok(Some(line.trim().to_lowercase()))
    }
}

impl Curator for ConsoleCurator {
    fn decide(&mut self, occurrence: &Occurrence) -> Result<Decision> {
        self.print_occurrence(occurrence);

        loop {
            let answer = self
                .read_answer("[a] name / [e] epithet / [r] reject / [d] defer / [i] ignore / [q] quit: ")?;
            let Some(answer) = answer else {
                return Ok(Decision::Abort);
            };
            match answer.as_str() {
                "a" => return Ok(Decision::ConfirmName),
                "e" => return Ok(Decision::ConfirmEpithet),
                "r" => return Ok(Decision::Reject),
                "d" | "" => return Ok(Decision::Defer),
                "i" => return Ok(Decision::Ignore),
                "q" => return Ok(Decision::Abort),
                other => println!("Unrecognized choice '{other}', try again."),
            }
        }
    }

    fn resolve_conflict(
        &mut self,
        lemma: &str,
        existing: Category,
        proposed: Category,
    ) -> Result<ConflictResolution> {
        println!(
            "Conflict: \"{lemma}\" is recorded as {existing} but was just confirmed as {proposed}."
        );
        loop {
            let answer = self.read_answer("[k] keep existing / [o] override: ")?;
            let Some(answer) = answer else {
                return Ok(ConflictResolution::KeepExisting);
            };
            match answer.as_str() {
                "k" | "" => return Ok(ConflictResolution::KeepExisting),
                "o" => return Ok(ConflictResolution::Override),
                other => println!("Unrecognized choice '{other}', try again."),
            }
        }
    }
}
