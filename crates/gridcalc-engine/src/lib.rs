//! gridcalc_engine - Bracket-reference formula engine + Rhai integration.

pub(crate) mod builtins;
pub mod config;
pub mod engine;
pub mod error;

pub use config::EngineConfig;
pub use engine::{CellGrid, ChangeHandler, FormulaEngine, Propagation};
pub use error::{FormulaError, Result};
