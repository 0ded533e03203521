//! Formula batches and statements.
//!
//! A batch joins statements with `||`; each statement has the form
//! `[target]=expression`.

use crate::error::{FormulaError, Result};

pub const STATEMENT_DELIMITER: &str = "||";

/// Split a batch into statements, in order. Blank statements are dropped.
pub fn split_formulas(formulae: &str) -> Vec<&str> {
    formulae
        .split(STATEMENT_DELIMITER)
        .filter(|s| !s.trim().is_empty())
        .collect()
}

/// One `[target]=expression` statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormulaStatement {
    pub target: String,
    pub expression: String,
}

impl FormulaStatement {
    /// Split on the first `=`; the target id sits between the first `[`
    /// and the following `]` of the left-hand side.
    pub fn parse(formula: &str) -> Result<FormulaStatement> {
        let (lhs, rhs) = formula
            .split_once('=')
            .ok_or_else(|| FormulaError::MissingAssignment(formula.to_string()))?;
        let target = lhs
            .split_once('[')
            .and_then(|(_, rest)| rest.split_once(']'))
            .map(|(id, _)| id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| FormulaError::MissingTarget(formula.to_string()))?;

        Ok(FormulaStatement {
            target: target.to_string(),
            expression: rhs.to_string(),
        })
    }
}
