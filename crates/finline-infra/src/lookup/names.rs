//! Stock code→name lookup table.
//!
//! Loads the two-column CSV (`股號,股名`) maintained outside this repo.
//! A missing or malformed file degrades to an empty table with a warning;
//! quotes still work, just without the company name in the prompt.

use std::collections::HashMap;
use std::path::Path;

use tracing::warn;

/// In-memory code→name mapping.
#[derive(Debug, Default)]
pub struct StockNameTable {
    names: HashMap<String, String>,
}

impl StockNameTable {
    /// An empty table (used when the CSV is unavailable).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the table from a CSV file, falling back to empty on failure.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "stock name table unavailable, proceeding without names");
                Self::empty()
            }
        }
    }

    /// Parse CSV content. Rows that don't have at least two columns are
    /// skipped; a header row is detected by its non-numeric first column.
    pub fn parse(content: &str) -> Self {
        let mut names = HashMap::new();
        for line in content.lines() {
            let mut fields = line.split(',');
            let (Some(code), Some(name)) = (fields.next(), fields.next()) else {
                continue;
            };
            let code = code.trim();
            let name = name.trim();
            if code.is_empty() || name.is_empty() {
                continue;
            }
            if !code.chars().next().is_some_and(|c| c.is_ascii_digit()) {
                // Header row (股號,股名) or junk.
                continue;
            }
            names.insert(code.to_string(), name.to_string());
        }
        Self { names }
    }

    /// The company name for a stock code, if known. Codes with a trailing
    /// letter (e.g. 1101B) fall back to their numeric base.
    pub fn name_of(&self, code: &str) -> Option<&str> {
        if let Some(name) = self.names.get(code) {
            return Some(name);
        }
        let base = code.trim_end_matches(|c: char| c.is_ascii_alphabetic());
        if base != code {
            return self.names.get(base).map(String::as_str);
        }
        None
    }

    /// Number of known codes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
