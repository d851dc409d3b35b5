//! Grid model consumed by the expansion core.
//!
//! This module provides the data the core reads when it inlines formulas:
//!
//! - [`CellRef`] - Cell reference parsing (A1 notation ↔ row/col indices)
//! - [`CellContent`], [`FormulaCell`], [`Grid`] - Tagged cell storage
//! - [`TokenReferent`], [`extract_tokens`] - Placeholder token classification

mod cell;
mod cell_ref;
mod tokens;

pub use cell::{CellContent, FormulaCell, Grid, new_grid};
pub use cell_ref::CellRef;
pub use tokens::{TokenMap, TokenReferent, extract_tokens};
