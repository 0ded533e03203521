//! gridcalc-core - In-memory sheet + storage.

pub mod error;
pub mod sheet;
pub mod storage;

pub use error::{GridcalcError, Result};
pub use sheet::Sheet;

pub use gridcalc_engine::engine::CellId;
pub use gridcalc_engine::{CellGrid, ChangeHandler, EngineConfig, FormulaEngine, Propagation};
