/*!
 * Tests for variant detection heuristics and window recording
 */

use crate::common::stream_of;
use onoma::app_config::HeuristicsConfig;
use onoma::detector::{Classification, Provenance, VariantDetector};
use onoma::dictionaries::patterns::Pattern;
use onoma::dictionaries::{Category, Dictionaries, PatternDictionary};
use onoma::Occurrence;

fn scan_with(
    detector: &VariantDetector,
    dicts: &Dictionaries,
    patterns: &PatternDictionary,
    words: &[&str],
) -> Vec<Occurrence> {
    let stream = stream_of("parzival", words);
    detector.scan(&stream, dicts, patterns, 0).collect()
}

#[test]
fn test_scan_withCapitalizationDisabled_shouldOnlyUseAffixes() {
    let heuristics = HeuristicsConfig {
        capitalized: false,
        name_affixes: vec!["lin".to_string()],
        min_surface_len: 2,
    };
    let detector = VariantDetector::new(2, heuristics);
    let dicts = Dictionaries::new();
    let patterns = PatternDictionary::new();

    let hits = scan_with(&detector, &dicts, &patterns, &["Gahmuret", "magedlin"]);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].surface, "magedlin");
}

#[test]
fn test_scan_withShortSurface_shouldNotSurface() {
    let detector = VariantDetector::new(2, HeuristicsConfig::default());
    let dicts = Dictionaries::new();
    let patterns = PatternDictionary::new();

    // single capital letter stays below the length threshold
    let hits = scan_with(&detector, &dicts, &patterns, &["A", "Gahmuret"]);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].surface, "Gahmuret");
}

#[test]
fn test_scan_withMultiTokenPattern_shouldSpanAndRecordWindow() {
    let mut dicts = Dictionaries::new();
    dicts.classify("der wirt", Category::Epithet, false).unwrap();
    let mut patterns = PatternDictionary::new();
    patterns.register(Pattern::new(["der", "wirt"]));

    let detector = VariantDetector::new(2, HeuristicsConfig::default());
    let hits = scan_with(
        &detector,
        &dicts,
        &patterns,
        &["do", "sprach", "der", "wirt", "ze", "gaste"],
    );

    assert_eq!(hits.len(), 1);
    let hit = &hits[0];
    assert_eq!(hit.start_position, 2);
    assert_eq!(hit.end_position, 3);
    assert_eq!(hit.surface, "der wirt");
    let window: Vec<&str> = hit.window.iter().map(|t| t.surface.as_str()).collect();
    assert_eq!(window, vec!["do", "sprach", "ze", "gaste"]);
}

#[test]
fn test_scan_withIgnoredPatternKey_shouldSkipSpan() {
    let mut dicts = Dictionaries::new();
    dicts.ignore_lemma("der wirt").unwrap();
    let mut patterns = PatternDictionary::new();
    patterns.register(Pattern::new(["der", "wirt"]));

    let detector = VariantDetector::new(2, HeuristicsConfig::default());
    let hits = scan_with(&detector, &dicts, &patterns, &["der", "wirt", "Gahmuret"]);

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].surface, "Gahmuret");
    assert_eq!(hits[0].provenance, Provenance::Novel);
}

#[test]
fn test_scan_withAdjacentPatterns_shouldEmitBoth() {
    let mut dicts = Dictionaries::new();
    dicts.classify("gahmuret", Category::Name, false).unwrap();
    dicts.classify("herzeloyde", Category::Name, false).unwrap();
    let mut patterns = PatternDictionary::new();
    patterns.register(Pattern::new(["gahmuret"]));
    patterns.register(Pattern::new(["herzeloyde"]));

    let detector = VariantDetector::new(1, HeuristicsConfig::default());
    let hits = scan_with(&detector, &dicts, &patterns, &["Gahmuret", "Herzeloyde"]);

    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|h| h.classification == Classification::Name));
}

#[test]
fn test_contextLine_shouldBracketTheSpan() {
    let mut dicts = Dictionaries::new();
    dicts.classify("gahmuret", Category::Name, false).unwrap();
    let mut patterns = PatternDictionary::new();
    patterns.register(Pattern::new(["gahmuret"]));

    let detector = VariantDetector::new(1, HeuristicsConfig::default());
    let hits = scan_with(&detector, &dicts, &patterns, &["der", "Gahmuret", "reit"]);
    assert_eq!(hits[0].context_line(), "der [Gahmuret] reit");
}
