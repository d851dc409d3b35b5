//! Placeholder token extraction from formula text.
//!
//! A formula body like `B1 * rate + tax(B2)` contains three kinds of
//! identifier-shaped substrings: cell references (`B1`, `B2`), free
//! parameter names (`rate`), and function call names (`tax`). The
//! expansion core only cares about the first two, so extraction builds a
//! map from each placeholder token to what it denotes:
//!
//! - tokens in A1 notation denote a cell
//! - any other bare identifier denotes a parameter name
//! - identifiers immediately followed by `(`, and the literal keywords
//!   `true`/`false`/`if`/`else`, are not placeholders at all
//!
//! References inside string literals are ignored, same as dependency
//! extraction ignores them.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

use super::cell_ref::CellRef;

/// What a placeholder token in a formula body stands for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenReferent {
    /// A free variable of the surrounding definition.
    Parameter(String),
    /// A reference to another cell on the grid.
    Cell(CellRef),
}

/// Placeholder token -> referent. Each token appears once no matter how
/// often it occurs in the text; BTreeMap keeps iteration deterministic.
pub type TokenMap = BTreeMap<String, TokenReferent>;

const KEYWORDS: [&str; 4] = ["true", "false", "if", "else"];

/// Extract the placeholder token map from a formula body.
pub fn extract_tokens(body: &str) -> TokenMap {
    let mut tokens = TokenMap::new();

    // Ignore identifiers inside string literals.
    let body = strip_string_literals(body);

    for caps in ident_re().captures_iter(&body) {
        let m = caps.get(1).expect("identifier capture group is present");
        let token = m.as_str();

        if KEYWORDS.contains(&token) {
            continue;
        }
        // An identifier directly followed by `(` is a function call name.
        if body[m.end()..].trim_start().starts_with('(') {
            continue;
        }

        let referent = match CellRef::from_str(token) {
            Some(cell) => TokenReferent::Cell(cell),
            None => TokenReferent::Parameter(token.to_string()),
        };
        tokens.insert(token.to_string(), referent);
    }

    tokens
}

fn ident_re() -> &'static Regex {
    static IDENT_RE: OnceLock<Regex> = OnceLock::new();
    IDENT_RE.get_or_init(|| {
        Regex::new(r"\b([A-Za-z_][A-Za-z0-9_]*)\b")
            .expect("placeholder identifier regex must compile")
    })
}

fn strip_string_literals(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for ch in text.chars() {
        if in_string {
            if escaped {
                escaped = false;
                out.push(' ');
                continue;
            }
            if ch == '\\' {
                escaped = true;
                out.push(' ');
                continue;
            }
            if ch == '"' {
                in_string = false;
                out.push('"');
            } else {
                out.push(' ');
            }
        } else if ch == '"' {
            in_string = true;
            out.push('"');
        } else {
            out.push(ch);
        }
    }

    out
}
