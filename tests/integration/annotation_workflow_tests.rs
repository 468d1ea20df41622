/*!
 * End-to-end annotation workflow tests: detect, decide, checkpoint,
 * resume.
 */

use crate::common::{create_temp_dir, stream_of};
use onoma::annotation_controller::AnnotationController;
use onoma::app_config::HeuristicsConfig;
use onoma::curator::scripted::ScriptedCurator;
use onoma::curator::{ConflictResolution, Decision};
use onoma::detector::VariantDetector;
use onoma::dictionaries::{Category, Dictionaries, PatternDictionary};
use onoma::store::DataStore;

fn detector() -> VariantDetector {
    VariantDetector::new(2, HeuristicsConfig::default())
}

#[test]
fn test_workflow_confirmedNovel_shouldBeKnownOnNextScan() {
    let dir = create_temp_dir().unwrap();
    let store = DataStore::new(dir.path());
    let stream = stream_of("parzival", &["der", "Gahmuret", "reit"]);
    let mut patterns = PatternDictionary::new();

    let mut ctrl = AnnotationController::new(
        detector(),
        Dictionaries::new(),
        ScriptedCurator::confirming_names(),
    );
    ctrl.run_book(&stream, &mut patterns, &store).unwrap();

    // a later scan of a fresh book sees the confirmed pattern as known
    let (dicts, _) = ctrl.into_parts();
    let other = stream_of("iwein", &["Gahmuret", "was", "komen"]);
    let hits: Vec<_> = detector().scan(&other, &dicts, &patterns, 0).collect();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].provenance, onoma::detector::Provenance::Known);
    assert_eq!(
        hits[0].classification,
        onoma::detector::Classification::Name
    );
}

#[test]
fn test_workflow_resume_shouldNotRePresentFinalizedPositions() {
    let dir = create_temp_dir().unwrap();
    let store = DataStore::new(dir.path());
    let stream = stream_of(
        "parzival",
        &["Gahmuret", "reit", "Herzeloyde", "sprach", "Condwiramurs"],
    );
    let mut patterns = PatternDictionary::new();

    // first run: reject one, defer one, then abort
    let mut ctrl = AnnotationController::new(
        detector(),
        Dictionaries::new(),
        ScriptedCurator::from_script([Decision::Reject, Decision::Defer, Decision::Abort]),
    );
    let run = ctrl.run_book(&stream, &mut patterns, &store).unwrap();
    assert!(run.summary.aborted);

    // second run resumes: deferred and unseen positions only
    let mut ctrl = AnnotationController::new(
        detector(),
        Dictionaries::new(),
        ScriptedCurator::rejecting_all(),
    );
    ctrl.run_book(&stream, &mut patterns, &store).unwrap();
    let (_, curator) = ctrl.into_parts();

    let surfaces: Vec<&str> = curator
        .presented
        .iter()
        .map(|o| o.surface.as_str())
        .collect();
    assert_eq!(surfaces, vec!["Herzeloyde", "Condwiramurs"]);
}

#[test]
fn test_workflow_conflictAcrossBooks_shouldSurfaceNotOverwrite() {
    let dir = create_temp_dir().unwrap();
    let store = DataStore::new(dir.path());

    // book one: "wirt" confirmed as epithet
    let first = stream_of("parzival", &["Wirt"]);
    let mut first_patterns = PatternDictionary::new();
    let mut ctrl = AnnotationController::new(
        detector(),
        Dictionaries::new(),
        ScriptedCurator::from_script([Decision::ConfirmEpithet]),
    );
    ctrl.run_book(&first, &mut first_patterns, &store).unwrap();
    let (dicts, _) = ctrl.into_parts();

    // book two: the same lemma confirmed as name surfaces the conflict
    let second = stream_of("iwein", &["Wirt"]);
    let mut second_patterns = PatternDictionary::new();
    let mut ctrl = AnnotationController::new(
        detector(),
        dicts,
        ScriptedCurator::from_script([Decision::ConfirmName]),
    );
    ctrl.run_book(&second, &mut second_patterns, &store).unwrap();
    let (dicts, curator) = ctrl.into_parts();

    assert_eq!(curator.conflicts.len(), 1);
    assert_eq!(curator.conflicts[0].lemma, "wirt");
    assert_eq!(curator.conflicts[0].existing, Category::Epithet);
    // default resolution keeps the record
    assert_eq!(dicts.categories.get("wirt"), Some(Category::Epithet));
}

#[test]
fn test_workflow_conflictOverride_shouldPersistNewClassification() {
    let dir = create_temp_dir().unwrap();
    let store = DataStore::new(dir.path());

    let mut dicts = Dictionaries::new();
    dicts.classify("wirt", Category::Epithet, false).unwrap();

    let stream = stream_of("iwein", &["Wirt"]);
    let mut patterns = PatternDictionary::new();
    let curator = ScriptedCurator::from_script([Decision::ConfirmName])
        .with_resolutions([ConflictResolution::Override]);
    let mut ctrl = AnnotationController::new(detector(), dicts, curator);
    ctrl.run_book(&stream, &mut patterns, &store).unwrap();

    // the override reached the persisted store
    let reloaded = store.load_dictionaries().unwrap();
    assert_eq!(reloaded.categories.get("wirt"), Some(Category::Name));
}

#[test]
fn test_workflow_everyDecisionIsCheckpointed() {
    let dir = create_temp_dir().unwrap();
    let store = DataStore::new(dir.path());
    let stream = stream_of("parzival", &["Gahmuret", "unde", "Herzeloyde"]);
    let mut patterns = PatternDictionary::new();

    let mut ctrl = AnnotationController::new(
        detector(),
        Dictionaries::new(),
        ScriptedCurator::from_script([Decision::ConfirmName, Decision::Abort]),
    );
    ctrl.run_book(&stream, &mut patterns, &store).unwrap();

    // the confirmed decision survived the abort
    let session = store.load_session("parzival").unwrap().unwrap();
    assert!(session.is_finalized(0));
    let dicts = store.load_dictionaries().unwrap();
    assert_eq!(dicts.categories.get("gahmuret"), Some(Category::Name));
}
