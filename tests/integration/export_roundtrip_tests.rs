/*!
 * Export bundle round-trip tests: an exported bundle reproduces the
 * same classifications when imported into an empty store.
 */

use crate::common::{create_temp_dir, stream_of};
use onoma::app_config::HeuristicsConfig;
use onoma::detector::{Classification, VariantDetector};
use onoma::dictionaries::patterns::Pattern;
use onoma::dictionaries::{Category, Dictionaries, PatternDictionary};
use onoma::export::ExportBundle;

fn fixture() -> (Dictionaries, PatternDictionary) {
    let mut dicts = Dictionaries::new();
    dicts.classify("gahmuret", Category::Name, false).unwrap();
    dicts.classify("der wirt", Category::Epithet, false).unwrap();
    let mut patterns = PatternDictionary::new();
    patterns.register(Pattern::new(["gahmuret"]));
    patterns.register(Pattern::new(["der", "wirt"]));
    (dicts, patterns)
}

#[test]
fn test_export_thenImport_shouldYieldIdenticalOccurrences() {
    let (dicts, patterns) = fixture();
    let stream = stream_of("parzival", &["der", "wirt", "gruozte", "Gahmuret"]);
    let detector = VariantDetector::new(2, HeuristicsConfig::default());

    let occurrences: Vec<_> = detector.scan(&stream, &dicts, &patterns, 0).collect();
    let bundle = ExportBundle::new("parzival", &occurrences, &dicts.categories, &patterns);

    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("bundle.json");
    bundle.write_to(&path).unwrap();

    // rebuild dictionaries from the bundle alone
    let restored = ExportBundle::from_file(&path).unwrap();
    let mut imported = Dictionaries::new();
    imported.categories.merge(&restored.categories).unwrap();
    let imported_patterns: PatternDictionary = restored.patterns.clone().into();

    // scanning the same stream with the imported stores matches
    let rescan: Vec<_> = detector
        .scan(&stream, &imported, &imported_patterns, 0)
        .collect();
    assert_eq!(rescan.len(), occurrences.len());
    for (a, b) in rescan.iter().zip(&occurrences) {
        assert_eq!(a.lemma, b.lemma);
        assert_eq!(a.classification, b.classification);
        assert_eq!(a.start_position, b.start_position);
    }
}

#[test]
fn test_frequencySummary_shouldGroupByClassification() {
    let (dicts, patterns) = fixture();
    let stream = stream_of(
        "parzival",
        &["der", "wirt", "sach", "Gahmuret", "und", "der", "wirt", "sprach"],
    );
    let detector = VariantDetector::new(2, HeuristicsConfig::default());
    let occurrences: Vec<_> = detector.scan(&stream, &dicts, &patterns, 0).collect();
    let bundle = ExportBundle::new("parzival", &occurrences, &dicts.categories, &patterns);

    let summary = bundle.frequency_summary();
    assert_eq!(summary[&Classification::Epithet]["der wirt"], 2);
    assert_eq!(summary[&Classification::Name]["gahmuret"], 1);
}
