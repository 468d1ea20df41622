/*!
 * Tests for token stream validation and collocation windows
 */

use crate::common::{sample_verse, stream_of};
use onoma::dictionaries::NormalizationTable;
use onoma::errors::DetectorError;
use onoma::token_stream::TokenStream;

#[test]
fn test_fromText_withVersePassage_shouldDropPunctuation() {
    let table = NormalizationTable::new();
    let stream = TokenStream::from_text("parzival", sample_verse(), &table).unwrap();

    let surfaces: Vec<&str> = stream.tokens().iter().map(|t| t.surface.as_str()).collect();
    assert_eq!(surfaces[0], "Der");
    assert!(!surfaces.iter().any(|s| s.contains('.') || s.contains(':')));
}

#[test]
fn test_fromText_shouldApplyNormalizationRules() {
    let mut table = NormalizationTable::new();
    table.add_rule("gahmuret", "gahmuretes").unwrap();

    let stream = TokenStream::from_text("parzival", "Gahmuretes swert", &table).unwrap();
    assert_eq!(stream.tokens()[0].lemma, "gahmuret");
    assert_eq!(stream.tokens()[0].surface, "Gahmuretes");
}

#[test]
fn test_new_withSparsePositions_shouldAccept() {
    let table = NormalizationTable::new();
    // verse numbering leaves gaps where lines were lost
    let entries = vec![(10, "der".to_string()), (25, "wirt".to_string())];
    let stream = TokenStream::new("parzival", entries, &table).unwrap();
    assert_eq!(stream.len(), 2);
}

#[test]
fn test_new_withNonMonotonicPositions_shouldNameBookAndPosition() {
    let table = NormalizationTable::new();
    let entries = vec![(7, "der".to_string()), (4, "wirt".to_string())];
    let err = TokenStream::new("parzival", entries, &table).unwrap_err();

    match err {
        DetectorError::NonMonotonicPosition {
            book,
            position,
            previous,
        } => {
            assert_eq!(book, "parzival");
            assert_eq!(position, 4);
            assert_eq!(previous, 7);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_collocationWindow_inMiddle_shouldTakeBothSides() {
    let stream = stream_of("b", &["a", "b", "c", "d", "e", "f", "g"]);
    let window = stream.collocation_window(3, 3, 2);
    let surfaces: Vec<&str> = window.iter().map(|t| t.surface.as_str()).collect();
    assert_eq!(surfaces, vec!["b", "c", "e", "f"]);
}

#[test]
fn test_contentHash_withChangedSurface_shouldDiffer() {
    let a = stream_of("b", &["der", "wirt"]);
    let b = stream_of("b", &["der", "gast"]);
    assert_ne!(a.content_hash(), b.content_hash());
}

#[test]
fn test_contentHash_withSameText_shouldBeStable() {
    let a = stream_of("b", &["der", "wirt"]);
    let b = stream_of("b", &["der", "wirt"]);
    assert_eq!(a.content_hash(), b.content_hash());
}
