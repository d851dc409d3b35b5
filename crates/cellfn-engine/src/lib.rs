//! cellfn-engine - grid collaborator model for the cellfn expansion core.

pub mod engine;

pub use engine::{CellContent, CellRef, FormulaCell, Grid, TokenMap, TokenReferent, new_grid};
