//! Statement parsing.
//!
//! Grammar (case-insensitive):
//!
//! ```text
//! <type> [(<maxIterations>)] <values> [<accumOp>] [AS <alias>]
//! ```
//!
//! with `type` one of `once|reverse|repeat|yoyo|shuffle|random|binary`,
//! `values` a comma list / range / single number / reference, and
//! `accumOp` one of
//! `replace|add|subtract|multiply|divide|log|log2|log10|pow`.
//!
//! Parsing here is purely lexical; turning the values text into a pool
//! needs the live registry (references resolve against it) and happens
//! in [`PatternContext`](crate::PatternContext).

use thiserror::Error;

use crate::sequence::{Accumulator, Picker};

/// Why a statement failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty statement")]
    Empty,
    #[error("statement '{0}' has no values")]
    MissingValues(String),
}

/// A lexically parsed statement, values still as text.
#[derive(Debug, Clone, PartialEq)]
pub struct RawStatement {
    pub picker: Picker,
    /// `reverse` statements flip the pool before first use.
    pub reverse: bool,
    /// Zero means unbounded.
    pub max_iterations: u32,
    pub values: String,
    pub accumulator: Accumulator,
    /// Explicit `AS` alias, if present.
    pub alias: Option<String>,
    /// Fallback registry key: the normalized statement with spaces
    /// replaced by underscores.
    pub canonical_alias: String,
}

fn is_max_iterations(token: &str) -> bool {
    token.len() > 2
        && token.starts_with('(')
        && token.ends_with(')')
        && token[1..token.len() - 1].bytes().all(|b| b.is_ascii_digit())
}

/// Normalize a statement: lowercase, detach a glued iteration count
/// (`repeat(3)` -> `repeat (3)`), and tighten comma lists.
fn normalize(stmt: &str) -> String {
    let mut s = stmt.trim().to_lowercase();
    if !s.contains(',') && s.contains('(') && !s.contains(" (") {
        s = s.replace('(', " (");
    }
    s.replace(", ", ",")
}

/// Lexically parse a sequence statement.
pub fn parse_statement(stmt: &str) -> Result<RawStatement, ParseError> {
    let normalized = normalize(stmt);
    if normalized.is_empty() {
        return Err(ParseError::Empty);
    }

    let tokens: Vec<&str> = normalized.split(' ').filter(|t| !t.is_empty()).collect();
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut picker = Picker::Once;
    let mut reverse = false;
    let mut max_iterations = 0;
    let values;
    let mut accum_index = 2;

    if Picker::is_type_keyword(tokens[0]) {
        picker = Picker::parse(tokens[0]).unwrap_or_default();
        reverse = tokens[0] == "reverse";
        if tokens.len() > 1 && is_max_iterations(tokens[1]) {
            max_iterations = tokens[1][1..tokens[1].len() - 1].parse().unwrap_or(0);
            values = tokens
                .get(2)
                .copied()
                .ok_or_else(|| ParseError::MissingValues(normalized.clone()))?;
            accum_index = 3;
        } else {
            values = tokens
                .get(1)
                .copied()
                .ok_or_else(|| ParseError::MissingValues(normalized.clone()))?;
        }
    } else {
        values = tokens[0];
    }

    let accumulator = tokens
        .get(accum_index)
        .and_then(|t| Accumulator::parse(t))
        .unwrap_or_default();

    let alias = if tokens.len() > 2 && tokens[tokens.len() - 2] == "as" {
        let last = tokens[tokens.len() - 1];
        (!last.is_empty()).then(|| last.to_string())
    } else {
        None
    };

    Ok(RawStatement {
        picker,
        reverse,
        max_iterations,
        values: values.to_string(),
        accumulator,
        alias,
        canonical_alias: normalized.replace(' ', "_"),
    })
}
