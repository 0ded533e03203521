//! The grid collaborator contract.
//!
//! The engine owns no cells. Everything it reads or writes goes through a
//! [`CellGrid`] passed in by the caller.

use std::sync::Arc;

use super::propagate::Propagation;
use crate::error::Result;

/// Handler fired after a computed value is written to a cell.
///
/// The handler receives the propagation context (use [`Propagation::apply`]
/// to recalculate dependent formulas) and the grid that was written to.
pub type ChangeHandler =
    Arc<dyn Fn(&Propagation<'_>, &mut dyn CellGrid) -> Result<()> + Send + Sync>;

pub trait CellGrid {
    /// Current raw text of a cell, or None if no such cell exists.
    fn cell_value(&self, id: &str) -> Option<String>;

    /// Every live cell as `(id, value)`, in the grid's own order.
    fn cells(&self) -> Vec<(String, String)>;

    /// Store a value; later `cell_value` calls must observe it.
    fn set_cell_value(&mut self, id: &str, value: &str);

    /// Handler registered for changes to `id`, if any.
    fn change_handler(&self, id: &str) -> Option<ChangeHandler>;
}
