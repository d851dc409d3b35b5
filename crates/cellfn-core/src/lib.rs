//! cellfn-core - turn a spreadsheet region into a closed-form function.
//!
//! A [`Definition`] names a function, binds parameter names to sample
//! cells, and points at an output cell. Signature generation recursively
//! inlines every non-parameter cell reference in the output formula,
//! producing a single re-parseable expression of the parameters.

pub mod definition;
pub mod display;
pub mod error;
pub mod parameter;
pub mod registry;

pub use definition::Definition;
pub use display::{DisplayMode, value_to_display};
pub use error::{DefineError, Result};
pub use parameter::Parameter;
pub use registry::{CompiledFunction, FunctionRegistry};

pub use cellfn_engine::engine::{
    CellContent, CellRef, FormulaCell, Grid, TokenReferent, new_grid,
};
