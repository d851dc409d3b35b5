//! Function definitions and the recursive expansion algorithm.
//!
//! A [`Definition`] is configured against a live grid: parameters are the
//! free variables of the generated function, every other cell reference in
//! the output formula is a bound reference to be inlined. Expansion walks
//! the reference graph depth-first, substituting each non-parameter token
//! with the referenced cell's own expansion (formula) or textual form
//! (literal), parenthesized so inlining never changes operator precedence.
//!
//! Every signature query re-reads the grid, so results always reflect
//! live edits; there is no snapshot or dirty tracking.

use regex::Regex;
use std::collections::{BTreeMap, HashSet};

use cellfn_engine::engine::{CellContent, CellRef, FormulaCell, Grid, TokenReferent};

use crate::error::{DefineError, Result};
use crate::parameter::Parameter;

/// One generated function: name, ordered parameters, output cell, and the
/// grid the formulas live on.
#[derive(Clone)]
pub struct Definition {
    name: String,
    /// Insertion order is the argument order of the generated function.
    parameters: Vec<Parameter>,
    output_cell: Option<CellRef>,
    grid: Grid,
}

impl Definition {
    /// Create an unnamed definition with no parameters and no output cell.
    pub fn new(grid: Grid) -> Definition {
        Definition {
            name: String::new(),
            parameters: Vec::new(),
            output_cell: None,
            grid,
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a parameter, or overwrite an existing one with the same name
    /// in place. Positions of unrelated parameters never move.
    pub fn add_parameter(&mut self, parameter: Parameter) {
        match self.parameters.iter().position(|p| p.name() == parameter.name()) {
            Some(idx) => self.parameters[idx] = parameter,
            None => self.parameters.push(parameter),
        }
    }

    /// Discard all parameters, swapping in a fresh empty list. Used before
    /// re-deriving the definition from a changed selection.
    pub fn reset_parameters(&mut self) {
        self.parameters = Vec::new();
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn set_output_cell(&mut self, cell: CellRef) {
        self.output_cell = Some(cell);
    }

    pub fn output_cell(&self) -> Option<&CellRef> {
        self.output_cell.as_ref()
    }

    pub fn is_parameter(&self, name: &str) -> bool {
        self.parameters.iter().any(|p| p.name() == name)
    }

    /// The sample cell bound to a declared parameter.
    pub fn parameter_test_cell(&self, name: &str) -> Result<&CellRef> {
        self.parameters
            .iter()
            .find(|p| p.name() == name)
            .map(Parameter::test_cell)
            .ok_or_else(|| DefineError::UnknownParameter {
                name: name.to_string(),
            })
    }

    /// The full signature string, e.g. `"addTax(price) = = price*1.2"`.
    ///
    /// The expanded body keeps its own leading `= ` marker, so the result
    /// carries a double marker after the argument list; downstream
    /// compilers rely on that exact shape.
    pub fn function_string(&self) -> Result<String> {
        Ok(format!("{} = {}", self.signature(), self.expand_output_cell()?))
    }

    /// A placeholder signature with a constant-zero body, e.g.
    /// `"addTax(price) = 0"`. Never reads the grid and never fails; used
    /// to register a function's name and arity before its cells exist.
    pub fn mock_function_string(&self) -> String {
        format!("{} = 0", self.signature())
    }

    fn signature(&self) -> String {
        let names: Vec<&str> = self.parameters.iter().map(Parameter::name).collect();
        format!("{}({})", self.name, names.join(","))
    }

    /// Expand the output cell's formula into a single expression of the
    /// declared parameters, prefixed with its `= ` marker.
    pub fn expand_output_cell(&self) -> Result<String> {
        let output = self
            .output_cell
            .clone()
            .ok_or_else(|| DefineError::NoOutputCell {
                definition: self.name.clone(),
            })?;

        let content = self.grid.get(&output).map(|entry| entry.value().clone());
        let formula = match content {
            Some(CellContent::Formula(f)) => f,
            // Empty and literal output cells have nothing to expand.
            _ => {
                return Err(DefineError::OutputNotFormula {
                    definition: self.name.clone(),
                    cell: output,
                });
            }
        };

        let mut visiting = HashSet::new();
        visiting.insert(output);
        Ok(format!("= {}", self.expand_expression(&formula, &mut visiting)?))
    }

    /// Substitute every non-parameter token of `formula` with the expansion
    /// of the cell it references. `visiting` holds the cells on the current
    /// recursion path; revisiting one means the reference graph has a cycle.
    fn expand_expression(
        &self,
        formula: &FormulaCell,
        visiting: &mut HashSet<CellRef>,
    ) -> Result<String> {
        let mut replacements = BTreeMap::new();

        for (token, referent) in formula.tokens() {
            match referent {
                TokenReferent::Parameter(name) => {
                    if self.is_parameter(name) {
                        // Free variable of the generated function; the
                        // token stays in the text verbatim.
                        continue;
                    }
                    return Err(DefineError::UnknownParameter { name: name.clone() });
                }
                TokenReferent::Cell(cell) => {
                    let expanded = self.expand_cell(token, cell, visiting)?;
                    replacements.insert(token.clone(), expanded);
                }
            }
        }

        Ok(substitute_tokens(formula.body(), &replacements))
    }

    /// Expand one referenced cell into a parenthesized sub-expression.
    fn expand_cell(
        &self,
        token: &str,
        cell: &CellRef,
        visiting: &mut HashSet<CellRef>,
    ) -> Result<String> {
        if visiting.contains(cell) {
            return Err(DefineError::CircularReference {
                definition: self.name.clone(),
                cell: cell.clone(),
            });
        }

        // Clone the content out so no grid entry stays borrowed across
        // the recursive walk; a cell edited away mid-walk is a dangling
        // reference, not undefined behavior.
        let content = self.grid.get(cell).map(|entry| entry.value().clone()).ok_or_else(|| {
            DefineError::DanglingReference {
                definition: self.name.clone(),
                token: token.to_string(),
                cell: cell.clone(),
            }
        })?;

        let body = match content {
            CellContent::Formula(f) => {
                visiting.insert(cell.clone());
                let expanded = self.expand_expression(&f, visiting)?;
                visiting.remove(cell);
                expanded
            }
            CellContent::Number(n) => n.to_string(),
            CellContent::Text(s) => format!("\"{}\"", s),
        };

        // Parentheses keep the inlined sub-expression from changing the
        // operator precedence of the surrounding formula.
        Ok(format!("({})", body))
    }
}

/// Apply all token replacements in one pass over `body`, outside of
/// string literals only. A single pass means replacement output is never
/// re-scanned, so an inlined text literal whose content happens to look
/// like a cell reference stays intact. Matches are anchored on word
/// boundaries so a token that is a substring of another (`B1` vs `B11`)
/// never corrupts the longer one.
fn substitute_tokens(body: &str, replacements: &BTreeMap<String, String>) -> String {
    if replacements.is_empty() {
        return body.to_string();
    }

    let mut escaped: Vec<String> = replacements.keys().map(|t| regex::escape(t)).collect();
    // Longest token first within the alternation.
    escaped.sort_by_key(|t| std::cmp::Reverse(t.len()));
    let re = Regex::new(&format!(r"\b(?:{})\b", escaped.join("|")))
        .expect("token alternation regex must compile");

    let replace_seg = |seg: &str| {
        re.replace_all(seg, |caps: &regex::Captures| {
            match replacements.get(&caps[0]) {
                Some(replacement) => replacement.clone(),
                None => caps[0].to_string(),
            }
        })
        .to_string()
    };

    // Walk the text, handing only the segments outside string literals
    // to the replacer; quoted segments are emitted verbatim.
    let bytes = body.as_bytes();
    let mut out = String::new();
    let mut seg_start = 0;
    let mut in_string = false;
    let mut backslashes = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        let b = bytes[i];
        if in_string {
            if b == b'\\' {
                backslashes += 1;
                i += 1;
                continue;
            }
            if b == b'"' && backslashes.is_multiple_of(2) {
                out.push_str(&body[seg_start..=i]);
                in_string = false;
                seg_start = i + 1;
            }
            backslashes = 0;
            i += 1;
            continue;
        }

        if b == b'"' {
            out.push_str(&replace_seg(&body[seg_start..i]));
            in_string = true;
            seg_start = i;
            backslashes = 0;
            i += 1;
            continue;
        }

        i += 1;
    }

    if seg_start < body.len() {
        if in_string {
            out.push_str(&body[seg_start..]);
        } else {
            out.push_str(&replace_seg(&body[seg_start..]));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellfn_engine::engine::new_grid;

    fn set(grid: &Grid, a1: &str, input: &str) {
        let cell = CellRef::from_str(a1).unwrap();
        let content = CellContent::from_input(input).unwrap();
        grid.insert(cell, content);
    }

    #[test]
    fn test_add_parameter_overwrites_in_place() {
        let mut def = Definition::new(new_grid());
        def.add_parameter(Parameter::new("a", CellRef::new(0, 0)));
        def.add_parameter(Parameter::new("b", CellRef::new(1, 0)));
        def.add_parameter(Parameter::new("a", CellRef::new(2, 0)));

        let names: Vec<&str> = def.parameters().iter().map(Parameter::name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(def.parameter_test_cell("a").unwrap(), &CellRef::new(2, 0));
    }

    #[test]
    fn test_parameter_test_cell_unknown_name_errors() {
        let def = Definition::new(new_grid());
        assert!(matches!(
            def.parameter_test_cell("ghost"),
            Err(DefineError::UnknownParameter { name }) if name == "ghost"
        ));
    }

    #[test]
    fn test_reset_parameters_clears_list() {
        let mut def = Definition::new(new_grid());
        def.add_parameter(Parameter::new("a", CellRef::new(0, 0)));
        def.reset_parameters();
        assert!(def.parameters().is_empty());
        assert!(!def.is_parameter("a"));
    }

    #[test]
    fn test_expand_without_output_cell_errors() {
        let mut def = Definition::new(new_grid());
        def.set_name("f");
        assert!(matches!(
            def.expand_output_cell(),
            Err(DefineError::NoOutputCell { definition }) if definition == "f"
        ));
    }

    #[test]
    fn test_expand_literal_output_cell_errors() {
        let grid = new_grid();
        set(&grid, "A1", "42");
        let mut def = Definition::new(grid);
        def.set_name("f");
        def.set_output_cell(CellRef::from_str("A1").unwrap());
        assert!(matches!(
            def.expand_output_cell(),
            Err(DefineError::OutputNotFormula { .. })
        ));
    }

    fn replacements(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(token, replacement)| (token.to_string(), replacement.to_string()))
            .collect()
    }

    #[test]
    fn test_substitute_tokens_is_boundary_anchored() {
        let map = replacements(&[("B1", "(2)")]);
        assert_eq!(substitute_tokens("B1+B11", &map), "(2)+B11");
        assert_eq!(substitute_tokens("B1+B1", &map), "(2)+(2)");
    }

    #[test]
    fn test_substitute_tokens_skips_string_literals() {
        let map = replacements(&[("B1", "(2)")]);
        assert_eq!(
            substitute_tokens(r#"B1 + "B1 units""#, &map),
            r#"(2) + "B1 units""#
        );
    }

    #[test]
    fn test_substitute_tokens_does_not_rescan_replacement_output() {
        let map = replacements(&[("B1", "(\"C1\")"), ("C1", "(4)")]);
        assert_eq!(substitute_tokens("B1 + C1", &map), "(\"C1\") + (4)");
    }

    #[test]
    fn test_text_literal_expands_quoted() {
        let grid = new_grid();
        set(&grid, "A1", "=B1 + suffix");
        set(&grid, "B1", "\"kg\"");
        let mut def = Definition::new(grid);
        def.set_name("unit");
        def.add_parameter(Parameter::new("suffix", CellRef::from_str("C1").unwrap()));
        def.set_output_cell(CellRef::from_str("A1").unwrap());
        assert_eq!(def.expand_output_cell().unwrap(), "= (\"kg\") + suffix");
    }
}
