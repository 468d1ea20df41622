/*!
 * Per-book annotation sessions.
 *
 * A session records which occurrence positions have been reviewed and
 * where to resume, making curation incremental across repeated runs on
 * the same book. Sessions are created on the first run for a book,
 * loaded and updated on every subsequent run, and never deleted
 * automatically.
 */

pub mod models;

pub use models::{ReviewOutcome, SessionState};
