//! Tagged cell content and sparse grid storage.
//!
//! Cells hold exactly one of three content kinds:
//! - [`CellContent::Formula`] - an expression over other cells and parameters
//! - [`CellContent::Number`] / [`CellContent::Text`] - literal values
//!
//! The grid is sparse: an absent entry is an empty cell. Formula cells
//! carry their placeholder token map, extracted once at construction.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::cell_ref::CellRef;
use super::tokens::{TokenMap, extract_tokens};

/// A formula cell: raw definition text plus its placeholder tokens.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FormulaCell {
    /// Raw definition text, leading `=` marker retained.
    text: String,
    tokens: TokenMap,
}

impl FormulaCell {
    /// Build a formula cell from raw text. The text is stored as entered
    /// (with its `=` marker); tokens are extracted from the body.
    pub fn new(raw: &str) -> FormulaCell {
        let text = raw.trim().to_string();
        let body = text.strip_prefix('=').unwrap_or(&text).trim();
        FormulaCell {
            tokens: extract_tokens(body),
            text,
        }
    }

    /// The raw definition text including the leading `=` marker.
    pub fn raw(&self) -> &str {
        &self.text
    }

    /// The expression text with the assignment marker stripped.
    pub fn body(&self) -> &str {
        self.text.strip_prefix('=').unwrap_or(&self.text).trim()
    }

    pub fn tokens(&self) -> &TokenMap {
        &self.tokens
    }
}

/// The content stored in a (non-empty) cell.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum CellContent {
    Formula(FormulaCell),
    Number(f64),
    Text(String),
}

impl CellContent {
    /// Parse user input into cell content.
    /// - Empty or whitespace -> None (the grid stores nothing)
    /// - Starts with '=' -> Formula
    /// - Quoted string -> Text (without quotes)
    /// - Valid number -> Number
    /// - Otherwise -> Text
    pub fn from_input(input: &str) -> Option<CellContent> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }

        if trimmed.starts_with('=') {
            return Some(CellContent::Formula(FormulaCell::new(trimmed)));
        }

        if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
            let text = &trimmed[1..trimmed.len() - 1];
            return Some(CellContent::Text(text.to_string()));
        }

        if let Ok(n) = trimmed.parse::<f64>() {
            return Some(CellContent::Number(n));
        }

        Some(CellContent::Text(trimmed.to_string()))
    }

    /// Get a display string for the cell content (for editing).
    pub fn to_input_string(&self) -> String {
        match self {
            CellContent::Formula(f) => f.raw().to_string(),
            CellContent::Number(n) => n.to_string(),
            CellContent::Text(s) => s.clone(),
        }
    }
}

/// Thread-safe sparse grid storage (DashMap is internally Arc-based,
/// clones are cheap).
pub type Grid = Arc<DashMap<CellRef, CellContent>>;

pub fn new_grid() -> Grid {
    Arc::new(DashMap::new())
}
