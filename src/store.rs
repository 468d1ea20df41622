/*!
 * JSON-backed persistence for dictionaries and sessions.
 *
 * Three logical stores live under one data directory:
 * - global: `lemma_normalization.json`, `ignored_lemmas.json`,
 *   `lemma_categories.json`
 * - per book: `patterns/{book}.json`
 * - per book: `sessions/{book}.json`
 *
 * Every write goes through the atomic write-then-rename helper, so an
 * interrupted checkpoint can never corrupt a store. Keys are stable
 * strings and every store round-trips losslessly.
 */

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, error, info};

use crate::dictionaries::{
    CategoryDictionary, Dictionaries, IgnoreSet, NormalizationTable, PatternDictionary,
};
use crate::errors::SessionError;
use crate::file_utils::FileManager;
use crate::session::{ReviewOutcome, SessionState};

const NORMALIZATION_FILE: &str = "lemma_normalization.json";
const IGNORED_FILE: &str = "ignored_lemmas.json";
const CATEGORIES_FILE: &str = "lemma_categories.json";

/// Filesystem store rooted at the configured data directory.
#[derive(Debug, Clone)]
pub struct DataStore {
    root: PathBuf,
}

impl DataStore {
    /// Create a store rooted at `root`; the directory is created lazily
    /// on first write.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn session_path(&self, book_id: &str) -> PathBuf {
        self.root.join("sessions").join(book_file_name(book_id))
    }

    fn patterns_path(&self, book_id: &str) -> PathBuf {
        self.root.join("patterns").join(book_file_name(book_id))
    }

    // =========================================================================
    // Global dictionaries
    // =========================================================================

    /// Load the global dictionaries; missing files yield empty stores.
    pub fn load_dictionaries(&self) -> Result<Dictionaries> {
        let normalization: NormalizationTable =
            self.load_or_default(&self.root.join(NORMALIZATION_FILE))?;
        let ignore: IgnoreSet = self.load_or_default(&self.root.join(IGNORED_FILE))?;
        let categories: CategoryDictionary =
            self.load_or_default(&self.root.join(CATEGORIES_FILE))?;

        debug!(
            "Loaded dictionaries: {} normalization lemmas, {} ignored, {} classified",
            normalization.len(),
            ignore.len(),
            categories.len()
        );

        Ok(Dictionaries {
            normalization,
            ignore,
            categories,
        })
    }

    /// Persist the global dictionaries.
    pub fn save_dictionaries(&self, dictionaries: &Dictionaries) -> Result<()> {
        FileManager::write_json_atomic(
            self.root.join(NORMALIZATION_FILE),
            &dictionaries.normalization,
        )?;
        FileManager::write_json_atomic(self.root.join(IGNORED_FILE), &dictionaries.ignore)?;
        FileManager::write_json_atomic(self.root.join(CATEGORIES_FILE), &dictionaries.categories)?;
        Ok(())
    }

    // =========================================================================
    // Per-book pattern dictionaries
    // =========================================================================

    /// Load a book's pattern dictionary; missing file yields an empty one.
    pub fn load_patterns(&self, book_id: &str) -> Result<PatternDictionary> {
        self.load_or_default(&self.patterns_path(book_id))
    }

    /// Persist a book's pattern dictionary.
    pub fn save_patterns(&self, book_id: &str, patterns: &PatternDictionary) -> Result<()> {
        FileManager::write_json_atomic(self.patterns_path(book_id), patterns)
    }

    // =========================================================================
    // Sessions
    // =========================================================================

    /// Load a book's session, if one was persisted.
    pub fn load_session(&self, book_id: &str) -> Result<Option<SessionState>, SessionError> {
        let path = self.session_path(book_id);
        if !FileManager::file_exists(&path) {
            return Ok(None);
        }
        FileManager::read_json(&path)
            .map(Some)
            .map_err(|e| SessionError::Load {
                book: book_id.to_string(),
                reason: e.to_string(),
            })
    }

    /// Write a session checkpoint.
    ///
    /// A failure here must abort the in-flight decision, never be
    /// swallowed; callers propagate the error.
    pub fn checkpoint_session(&self, state: &SessionState) -> Result<(), SessionError> {
        FileManager::write_json_atomic(self.session_path(&state.book_id), state).map_err(|e| {
            SessionError::Checkpoint {
                book: state.book_id.clone(),
                reason: e.to_string(),
            }
        })
    }

    /// List all persisted sessions, sorted by book id.
    pub fn list_sessions(&self) -> Result<Vec<SessionState>> {
        let dir = self.root.join("sessions");
        if !FileManager::dir_exists(&dir) {
            return Ok(Vec::new());
        }
        let mut sessions = Vec::new();
        for path in FileManager::find_files(&dir, "json")? {
            let session: SessionState = FileManager::read_json(&path)
                .with_context(|| format!("Failed to read session file: {:?}", path))?;
            sessions.push(session);
        }
        sessions.sort_by(|a, b| a.book_id.cmp(&b.book_id));
        Ok(sessions)
    }

    /// Open a session guard for a book, resuming the persisted session
    /// when its fingerprint still matches the stream.
    ///
    /// A persisted session for a changed book is surfaced as
    /// `SessionError::BookChanged`; the caller decides whether to discard
    /// it (the stale file is never overwritten silently).
    pub fn open_session(
        &self,
        book_id: &str,
        stream_hash: &str,
    ) -> Result<SessionGuard<'_>, SessionError> {
        let state = match self.load_session(book_id)? {
            Some(existing) if existing.matches_stream(stream_hash) => {
                info!("Resuming session {}", existing);
                existing
            }
            Some(stale) => {
                return Err(SessionError::BookChanged {
                    book: book_id.to_string(),
                    session: stale.id,
                });
            }
            None => {
                info!("Starting new session for book {}", book_id);
                SessionState::new(book_id, stream_hash)
            }
        };
        Ok(SessionGuard {
            store: self,
            state,
            dirty: false,
        })
    }

    /// Discard a persisted session so the next run starts fresh.
    pub fn discard_session(&self, book_id: &str) -> Result<()> {
        let path = self.session_path(book_id);
        if FileManager::file_exists(&path) {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove session file: {:?}", path))?;
        }
        Ok(())
    }

    fn load_or_default<T>(&self, path: &Path) -> Result<T>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        if FileManager::file_exists(path) {
            FileManager::read_json(path)
        } else {
            Ok(T::default())
        }
    }
}

/// Scoped access to a persisted session.
///
/// Decisions are recorded through the guard and checkpointed explicitly
/// after each one. Dropping the guard writes any unsaved state as a last
/// resort, so a curator abort or an early return still persists partial
/// progress; the explicit checkpoint remains the path whose failure
/// aborts the batch.
#[derive(Debug)]
pub struct SessionGuard<'a> {
    store: &'a DataStore,
    state: SessionState,
    dirty: bool,
}

impl SessionGuard<'_> {
    /// Current session state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Record an outcome; the caller must checkpoint afterwards.
    pub fn mark_reviewed(&mut self, position: usize, outcome: ReviewOutcome) {
        self.state.mark_reviewed(position, outcome);
        self.dirty = true;
    }

    /// Write the session to disk.
    pub fn checkpoint(&mut self) -> Result<(), SessionError> {
        self.store.checkpoint_session(&self.state)?;
        self.dirty = false;
        Ok(())
    }
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        if self.dirty {
            if let Err(e) = self.store.checkpoint_session(&self.state) {
                error!("Failed to checkpoint session on exit: {}", e);
            }
        }
    }
}

/// Stable file name for a book id.
fn book_file_name(book_id: &str) -> String {
    let safe: String = book_id
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}.json", safe.to_lowercase())
}
