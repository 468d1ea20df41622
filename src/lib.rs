/*!
 * # Onoma - Name-Variant Annotation for Medieval Narrative Verse
 *
 * A Rust library for detecting and recording proper-name variants and
 * epithets in tokenized editions of medieval narrative poems.
 *
 * ## Features
 *
 * - Normalize raw lemma spellings to canonical forms (diacritics,
 *   ligatures, Middle High German digraph variation)
 * - Detect known name-variant patterns and surface novel candidates
 * - Record collocation windows around every detected occurrence
 * - Interactive curation with conflict-safe category dictionaries
 * - Resumable per-book sessions with a checkpoint after every decision
 * - Seed import of curated reference registers and JSON export bundles
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `token_stream`: Validated, position-ordered book token streams
 * - `dictionaries`: The reference stores consulted during annotation:
 *   - `dictionaries::normalization`: Raw spelling -> canonical lemma
 *   - `dictionaries::ignore`: Lemmas excluded from candidacy
 *   - `dictionaries::categories`: Canonical lemma -> classification
 *   - `dictionaries::patterns`: Per-book confirmed variant patterns
 * - `detector`: The variant detector and its occurrence model
 * - `curator`: Decision ports (interactive console, scripted)
 * - `annotation_controller`: The review loop tying it all together
 * - `session`: Persisted per-book curation progress
 * - `store`: JSON-backed persistence for dictionaries and sessions
 * - `seed`: Import of curated reference registers
 * - `export`: Self-contained result bundles for downstream analysis
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod annotation_controller;
pub mod app_config;
pub mod curator;
pub mod detector;
pub mod dictionaries;
pub mod errors;
pub mod export;
pub mod file_utils;
pub mod seed;
pub mod session;
pub mod store;
pub mod token_stream;

// Re-export main types for easier usage
pub use annotation_controller::{AnnotationController, BookRun, RunSummary};
pub use app_config::Config;
pub use detector::{Occurrence, VariantDetector};
pub use dictionaries::{Category, Dictionaries, PatternDictionary};
pub use errors::{AppError, DetectorError, DictionaryError, SessionError};
pub use store::DataStore;
pub use token_stream::TokenStream;
