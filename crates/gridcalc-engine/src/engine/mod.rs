//! Formula engine API.
//!
//! Pipeline for one statement `[target]=expression`:
//!
//! - [`split_formulas`] / [`FormulaStatement`] - Split batches on `||` and parse statements
//! - [`tokenize`] - Tokenize the expression, bracketed references included
//! - [`rewrite_calls`] - Pass built-in arguments as one collection
//! - [`resolve_references`] - Substitute cell values, park ranges in a [`RangeRegistry`]
//! - [`expand_range`] - Collect the cells inside a range
//! - [`Evaluator`] - Evaluate the resolved expression on Rhai
//! - [`FormulaEngine`] - Run the pipeline, write back, fire change handlers

mod cell_id;
mod eval;
mod format;
mod grid;
mod number;
mod propagate;
mod range;
mod registry;
mod resolve;
mod rewrite;
mod split;
mod token;

pub use cell_id::CellId;
pub use eval::{Evaluator, Script, create_engine, render_script};
pub use format::{format_dynamic, format_number};
pub use grid::{CellGrid, ChangeHandler};
pub use number::{parse_float, to_number};
pub use propagate::{FormulaEngine, Propagation};
pub use range::{ExpandedRange, RangeBounds, expand_range};
pub use registry::RangeRegistry;
pub use resolve::{ResolvedExpression, resolve_references};
pub use rewrite::rewrite_calls;
pub use split::{FormulaStatement, STATEMENT_DELIMITER, split_formulas};
pub use token::{RANGES_VAR, Token, render_tokens, tokenize};

pub use rhai::Dynamic;

#[cfg(test)]
pub(crate) use grid::test_grid;
