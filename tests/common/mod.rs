/*!
 * Common test utilities for the onoma test suite
 */

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tempfile::TempDir;

use onoma::dictionaries::NormalizationTable;
use onoma::token_stream::TokenStream;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Builds a token stream from whitespace-separated words, positions
/// numbered from zero and no normalization rules.
pub fn stream_of(book_id: &str, words: &[&str]) -> TokenStream {
    let table = NormalizationTable::new();
    let entries = words
        .iter()
        .enumerate()
        .map(|(i, w)| (i, w.to_string()))
        .collect();
    TokenStream::new(book_id, entries, &table).expect("valid fixture stream")
}

/// A short Middle High German verse passage used across tests.
pub fn sample_verse() -> &'static str {
    "Der guote Gahmuret reit hin.\n\
     dô sprach der wirt ze sîme gast:\n\
     Gahmuret was komen."
}
