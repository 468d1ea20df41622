/*!
 * Tests for the JSON data store and session persistence
 */

use crate::common::create_temp_dir;
use onoma::dictionaries::patterns::Pattern;
use onoma::dictionaries::{Category, Dictionaries};
use onoma::errors::SessionError;
use onoma::session::{ReviewOutcome, SessionState};
use onoma::store::DataStore;

#[test]
fn test_store_layout_shouldUseStableFileNames() {
    let dir = create_temp_dir().unwrap();
    let store = DataStore::new(dir.path());

    let mut dicts = Dictionaries::new();
    dicts.classify("gahmuret", Category::Name, false).unwrap();
    store.save_dictionaries(&dicts).unwrap();

    let mut patterns = onoma::PatternDictionary::new();
    patterns.register(Pattern::new(["gahmuret"]));
    store.save_patterns("Parzival (ed. Lachmann)", &patterns).unwrap();

    assert!(dir.path().join("lemma_categories.json").exists());
    assert!(dir.path().join("lemma_normalization.json").exists());
    assert!(dir.path().join("ignored_lemmas.json").exists());
    // book ids are sanitized into file names
    assert!(dir
        .path()
        .join("patterns")
        .join("parzival__ed__lachmann_.json")
        .exists());
}

#[test]
fn test_checkpoint_thenLoad_shouldRestoreEveryOutcome() {
    let dir = create_temp_dir().unwrap();
    let store = DataStore::new(dir.path());

    let mut state = SessionState::new("parzival", "hash");
    state.mark_reviewed(3, ReviewOutcome::ConfirmedName);
    state.mark_reviewed(9, ReviewOutcome::Deferred);
    state.mark_reviewed(12, ReviewOutcome::Rejected);
    store.checkpoint_session(&state).unwrap();

    let restored = store.load_session("parzival").unwrap().unwrap();
    assert_eq!(restored.id, state.id);
    assert_eq!(restored.outcome_at(3), Some(ReviewOutcome::ConfirmedName));
    assert_eq!(restored.deferred_positions(), vec![9]);
    assert_eq!(restored.cursor, 12);
}

#[test]
fn test_loadSession_withCorruptFile_shouldSurfaceLoadError() {
    let dir = create_temp_dir().unwrap();
    let store = DataStore::new(dir.path());

    let sessions_dir = dir.path().join("sessions");
    std::fs::create_dir_all(&sessions_dir).unwrap();
    std::fs::write(sessions_dir.join("parzival.json"), "{ not json").unwrap();

    let err = store.load_session("parzival").unwrap_err();
    assert!(matches!(err, SessionError::Load { .. }));
}

#[test]
fn test_discardSession_shouldAllowFreshStart() {
    let dir = create_temp_dir().unwrap();
    let store = DataStore::new(dir.path());

    {
        let mut guard = store.open_session("parzival", "old-hash").unwrap();
        guard.mark_reviewed(1, ReviewOutcome::Rejected);
        guard.checkpoint().unwrap();
    }

    assert!(matches!(
        store.open_session("parzival", "new-hash"),
        Err(SessionError::BookChanged { .. })
    ));

    store.discard_session("parzival").unwrap();
    let guard = store.open_session("parzival", "new-hash").unwrap();
    assert!(guard.state().reviewed.is_empty());
}

#[test]
fn test_dictionaries_sharedAcrossBooks() {
    let dir = create_temp_dir().unwrap();
    let store = DataStore::new(dir.path());

    let mut dicts = store.load_dictionaries().unwrap();
    dicts.classify("gahmuret", Category::Name, false).unwrap();
    store.save_dictionaries(&dicts).unwrap();

    // a second book's run sees the classification
    let reloaded = store.load_dictionaries().unwrap();
    assert_eq!(reloaded.categories.get("gahmuret"), Some(Category::Name));

    // while pattern dictionaries stay per book
    let mut patterns = onoma::PatternDictionary::new();
    patterns.register(Pattern::new(["gahmuret"]));
    store.save_patterns("parzival", &patterns).unwrap();
    assert!(store.load_patterns("iwein").unwrap().is_empty());
}
