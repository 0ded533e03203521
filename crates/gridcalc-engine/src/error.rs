//! Error types for the formula engine.

use rhai::EvalAltResult;
use thiserror::Error;

/// Errors raised while applying formula statements.
///
/// Evaluation problems inside a well-formed statement are not reported here:
/// they degrade to the resolved expression text being written to the target.
#[derive(Error, Debug)]
pub enum FormulaError {
    #[error("Formula has no '=': {0}")]
    MissingAssignment(String),

    #[error("Formula has no [target] cell before '=': {0}")]
    MissingTarget(String),

    #[error("Circular reference detected at {cell} (propagation depth {depth})")]
    CircularReference { cell: String, depth: usize },

    #[error("Unsupported token in expression: {0}")]
    UnsupportedToken(String),

    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("Rhai error: {0}")]
    Rhai(
        #[from]
        #[source]
        Box<EvalAltResult>,
    ),

    #[error("Invalid engine config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FormulaError>;
