//! Reference resolution.
//!
//! Replaces every [`Token::Reference`] in a single left-to-right pass:
//!
//! - `[A.1:C.3]` (anything containing `:`) becomes a numbered range
//!   placeholder and the range text is recorded in a [`RangeRegistry`];
//! - `[A.1]` becomes the cell's current value: a bare number when numeric,
//!   a string literal otherwise. Missing cells read as `0`.
//!
//! A `;` directly after a scalar reference is turned into `,`, so argument
//! lists written with semicolons keep working.

use std::fmt;

use tracing::trace;

use super::grid::CellGrid;
use super::number::to_number;
use super::registry::RangeRegistry;
use super::token::{Token, render_tokens};

/// Expression with no references left, ready for evaluation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedExpression {
    pub tokens: Vec<Token>,
    pub ranges: RangeRegistry,
}

impl fmt::Display for ResolvedExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", render_tokens(&self.tokens))
    }
}

/// Literal token for a scalar cell value.
fn scalar_literal(value: Option<String>) -> Token {
    let Some(value) = value else {
        return Token::Number("0".to_string());
    };
    match to_number(&value) {
        Some(_) if value.trim().is_empty() => Token::Number("0".to_string()),
        Some(_) => Token::Number(value.trim().to_string()),
        None => Token::Str(value),
    }
}

/// Resolve all references in `tokens` against `grid`.
pub fn resolve_references(tokens: Vec<Token>, grid: &dyn CellGrid) -> ResolvedExpression {
    let mut ranges = RangeRegistry::new();
    let mut out = Vec::with_capacity(tokens.len());
    let mut after_scalar = false;

    for token in tokens {
        if std::mem::take(&mut after_scalar) && token == Token::Semicolon {
            out.push(Token::Comma);
            continue;
        }
        match token {
            Token::Reference(range) if range.contains(':') => {
                let index = ranges.register(&range);
                trace!(range = %range, index, "range placeholder");
                out.push(Token::Placeholder(index));
            }
            Token::Reference(id) => {
                out.push(scalar_literal(grid.cell_value(&id)));
                after_scalar = true;
            }
            other => out.push(other),
        }
    }

    ResolvedExpression {
        tokens: out,
        ranges,
    }
}
