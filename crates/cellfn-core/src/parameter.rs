//! Named function parameters bound to sample cells.

use std::fmt;

use cellfn_engine::engine::CellRef;

/// A formal parameter of a generated function: the name that appears
/// verbatim as a token in formula text, and the cell supplying its
/// sample value while the sheet is being authored. Immutable after
/// construction; callers guarantee a non-empty name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameter {
    name: String,
    test_cell: CellRef,
}

impl Parameter {
    pub fn new(name: impl Into<String>, test_cell: CellRef) -> Parameter {
        Parameter {
            name: name.into(),
            test_cell,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn test_cell(&self) -> &CellRef {
        &self.test_cell
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
