//! Display-mode selection for rendering cell values.
//!
//! The grid renderer asks one question: given a cell's content and its
//! already-computed value, what string goes in the cell? In `Normal` mode
//! the answer is always the computed value. In `Test` mode formula cells
//! show an aesthetic form of their definition text instead, so a user
//! authoring a function can see the expressions they are wiring up.

use cellfn_engine::engine::{CellContent, FormulaCell};

/// How cell values are rendered on the grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DisplayMode {
    #[default]
    Normal,
    Test,
}

/// Pick the string to display for a cell. The caller has already
/// evaluated the cell; `Test` mode discards that result for formula
/// cells and shows the definition instead.
pub fn value_to_display(mode: DisplayMode, content: &CellContent, computed: &str) -> String {
    match (mode, content) {
        (DisplayMode::Test, CellContent::Formula(f)) => aesthetic_text(f),
        _ => computed.to_string(),
    }
}

/// Render a formula's definition text with the marker separated and
/// binary operators spaced out. String literals are left untouched.
pub fn aesthetic_text(formula: &FormulaCell) -> String {
    let mut out = String::from("= ");
    let mut in_string = false;
    let mut prev_space = false;

    for ch in formula.body().chars() {
        if in_string {
            out.push(ch);
            if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
            }
            ' ' => {
                // Collapse runs of spaces, including one we just inserted.
                if !prev_space {
                    out.push(' ');
                    prev_space = true;
                }
                continue;
            }
            '+' | '-' | '*' | '/' | '%' | '^' => {
                if !prev_space {
                    out.push(' ');
                }
                out.push(ch);
                out.push(' ');
                prev_space = true;
                continue;
            }
            _ => out.push(ch),
        }
        prev_space = ch == ' ';
    }

    // Operator spacing can leave a trailing blank on e.g. "B1+".
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formula(input: &str) -> CellContent {
        CellContent::from_input(input).unwrap()
    }

    #[test]
    fn test_normal_mode_shows_computed_value() {
        let content = formula("=B1*2");
        assert_eq!(value_to_display(DisplayMode::Normal, &content, "10"), "10");
    }

    #[test]
    fn test_test_mode_shows_definition_for_formulas() {
        let content = formula("=B1*price+1");
        assert_eq!(
            value_to_display(DisplayMode::Test, &content, "10"),
            "= B1 * price + 1"
        );
    }

    #[test]
    fn test_test_mode_keeps_computed_value_for_literals() {
        let content = CellContent::from_input("42").unwrap();
        assert_eq!(value_to_display(DisplayMode::Test, &content, "42"), "42");
    }

    #[test]
    fn test_aesthetic_text_leaves_string_literals_alone() {
        let CellContent::Formula(f) = formula(r#"=label+"a+b""#) else {
            unreachable!()
        };
        assert_eq!(aesthetic_text(&f), r#"= label + "a+b""#);
    }

    #[test]
    fn test_aesthetic_text_does_not_double_space() {
        let CellContent::Formula(f) = formula("= B1 + C1") else {
            unreachable!()
        };
        assert_eq!(aesthetic_text(&f), "= B1 + C1");
    }
}
