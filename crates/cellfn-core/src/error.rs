//! Error types for the expansion core.

use thiserror::Error;

use cellfn_engine::engine::CellRef;

/// Failures raised while generating a function signature. Each variant
/// carries the definition name and the offending reference where one
/// exists, so the host can highlight the cell that broke expansion.
#[derive(Error, Debug)]
pub enum DefineError {
    #[error("definition '{definition}' has no output cell")]
    NoOutputCell { definition: String },

    #[error("output cell {cell} of definition '{definition}' does not hold a formula")]
    OutputNotFormula { definition: String, cell: CellRef },

    #[error("'{name}' is not a declared parameter")]
    UnknownParameter { name: String },

    #[error("definition '{definition}': token '{token}' refers to empty cell {cell}")]
    DanglingReference {
        definition: String,
        token: String,
        cell: CellRef,
    },

    #[error("definition '{definition}': circular reference through cell {cell}")]
    CircularReference { definition: String, cell: CellRef },
}

pub type Result<T> = std::result::Result<T, DefineError>;
