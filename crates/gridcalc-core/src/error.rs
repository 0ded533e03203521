//! Error types for Gridcalc core.

use thiserror::Error;

use gridcalc_engine::FormulaError;

/// Errors that can occur while loading, saving or recalculating a sheet.
#[derive(Error, Debug)]
pub enum GridcalcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Formula error: {0}")]
    Formula(
        #[from]
        #[source]
        FormulaError,
    ),

    #[error("No file path set")]
    NoFilePath,
}

pub type Result<T> = std::result::Result<T, GridcalcError>;
