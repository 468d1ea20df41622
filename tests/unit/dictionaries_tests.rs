/*!
 * Tests for dictionary invariants across the public API
 */

use onoma::dictionaries::patterns::Pattern;
use onoma::dictionaries::{Category, Dictionaries, PatternDictionary};
use onoma::errors::DictionaryError;

#[test]
fn test_classify_thenConflictingClassify_shouldLeaveDictionaryUnchanged() {
    let mut dicts = Dictionaries::new();
    dicts.classify("wirt", Category::Epithet, false).unwrap();

    let err = dicts.classify("wirt", Category::Name, false).unwrap_err();
    match err {
        DictionaryError::ClassificationConflict {
            lemma,
            existing,
            proposed,
        } => {
            assert_eq!(lemma, "wirt");
            assert_eq!(existing, Category::Epithet);
            assert_eq!(proposed, Category::Name);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(dicts.categories.get("wirt"), Some(Category::Epithet));
}

#[test]
fn test_classifyWithOverride_shouldReplaceAfterConflict() {
    let mut dicts = Dictionaries::new();
    dicts.classify("wirt", Category::Epithet, false).unwrap();
    dicts.classify("wirt", Category::Name, true).unwrap();
    assert_eq!(dicts.categories.get("wirt"), Some(Category::Name));
}

#[test]
fn test_ignoreAndClassify_shouldStayMutuallyExclusive() {
    let mut dicts = Dictionaries::new();
    dicts.ignore_lemma("unde").unwrap();
    assert!(dicts.classify("unde", Category::Name, false).is_err());

    dicts.classify("gahmuret", Category::Name, false).unwrap();
    assert!(dicts.ignore_lemma("gahmuret").is_err());

    // removing the classification unblocks the ignore
    dicts.categories.remove("gahmuret");
    assert!(dicts.ignore_lemma("gahmuret").unwrap());
}

#[test]
fn test_normalization_rulesComposeAcrossBooks() {
    let mut dicts = Dictionaries::new();
    dicts.normalization.add_rule("gawan", "gâwân").unwrap();
    dicts.normalization.add_rule("gawan", "Gâwâne").unwrap();

    assert_eq!(dicts.normalization.normalize("Gâwâne"), "gawan");
    assert_eq!(dicts.normalization.normalize("gâwân"), "gawan");
    // the canonical form maps to itself
    assert_eq!(dicts.normalization.normalize("gawan"), "gawan");
}

#[test]
fn test_categoryMerge_withConflicts_shouldListEveryLemma() {
    let mut ours = Dictionaries::new();
    ours.classify("wirt", Category::Epithet, false).unwrap();
    ours.classify("gast", Category::Epithet, false).unwrap();

    let mut theirs = Dictionaries::new();
    theirs.classify("wirt", Category::Name, false).unwrap();
    theirs.classify("gast", Category::Name, false).unwrap();
    theirs.classify("gahmuret", Category::Name, false).unwrap();

    let err = ours.categories.merge(&theirs.categories).unwrap_err();
    match err {
        DictionaryError::MergeConflicts { conflicts } => {
            let lemmas: Vec<&str> = conflicts.iter().map(|c| c.lemma.as_str()).collect();
            assert_eq!(lemmas, vec!["gast", "wirt"]);
        }
        other => panic!("unexpected error: {other}"),
    }
    // nothing absorbed on conflict
    assert!(ours.categories.get("gahmuret").is_none());
}

#[test]
fn test_patternDictionary_growsMonotonically() {
    let mut patterns = PatternDictionary::new();
    assert!(patterns.register(Pattern::new(["der", "wirt"])));
    assert!(patterns.register(Pattern::new(["gahmuret"])));
    assert!(!patterns.register(Pattern::new(["der", "wirt"])));
    assert!(!patterns.register(Pattern::new(Vec::<String>::new())));
    assert_eq!(patterns.len(), 2);
    assert_eq!(patterns.max_len(), 2);
}
