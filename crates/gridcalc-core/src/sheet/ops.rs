use std::sync::Arc;

use gridcalc_engine::{CellGrid, ChangeHandler, FormulaEngine, Propagation};
use tracing::debug;

use super::Sheet;
use crate::error::Result;

impl Sheet {
    /// Set a cell's value, creating the cell if needed.
    /// Does not fire change handlers; use [`Sheet::apply`] for that.
    pub fn set(&mut self, id: impl Into<String>, value: impl Into<String>) {
        let id = id.into();
        if !self.values.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.values.insert(id, value.into());
        self.modified = true;
    }

    pub fn get(&self, id: &str) -> Option<String> {
        self.values.get(id).map(|v| v.value().clone())
    }

    /// Cell ids in enumeration order.
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    /// Register a handler fired after a computed value is written to `id`.
    /// Replaces any previous handler for that cell.
    pub fn on_cell_changed(&mut self, id: impl Into<String>, handler: ChangeHandler) {
        self.handlers.insert(id.into(), handler);
    }

    /// Re-apply `formulae` whenever a computed value is written to `id`.
    pub fn on_cell_changed_formula(&mut self, id: impl Into<String>, formulae: impl Into<String>) {
        let id = id.into();
        let formulae = formulae.into();
        debug!(cell = %id, formulae = %formulae, "registered change formula");
        self.on_cell_changed(
            id,
            Arc::new(move |p: &Propagation<'_>, grid: &mut dyn CellGrid| {
                p.apply(grid, &formulae)
            }),
        );
    }

    pub fn remove_handler(&mut self, id: &str) -> bool {
        self.handlers.remove(id).is_some()
    }

    /// Apply a formula batch to this sheet.
    pub fn apply(&mut self, engine: &FormulaEngine, formulae: &str) -> Result<()> {
        engine.apply(self, formulae)?;
        Ok(())
    }
}

impl CellGrid for Sheet {
    fn cell_value(&self, id: &str) -> Option<String> {
        self.get(id)
    }

    fn cells(&self) -> Vec<(String, String)> {
        self.order
            .iter()
            .filter_map(|id| self.get(id).map(|v| (id.clone(), v)))
            .collect()
    }

    fn set_cell_value(&mut self, id: &str, value: &str) {
        self.set(id, value);
    }

    fn change_handler(&self, id: &str) -> Option<ChangeHandler> {
        self.handlers.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_enumeration_keeps_first_insertion_order() {
        let mut sheet = Sheet::new();
        sheet.set("B.1", "1");
        sheet.set("A.1", "2");
        sheet.set("B.1", "3");
        assert_eq!(
            sheet.cells(),
            vec![
                ("B.1".to_string(), "3".to_string()),
                ("A.1".to_string(), "2".to_string())
            ]
        );
    }

    #[test]
    fn test_engine_writes_create_cells() {
        let mut sheet = Sheet::new();
        sheet.apply(&FormulaEngine::new(), "[Z.9]=1+2").unwrap();
        assert_eq!(sheet.get("Z.9").as_deref(), Some("3"));
        assert!(sheet.modified);
    }

    #[test]
    fn test_remove_handler() {
        let mut sheet = Sheet::new();
        sheet.on_cell_changed_formula("A.1", "[B.1]=[A.1]");
        assert!(sheet.remove_handler("A.1"));
        assert!(!sheet.remove_handler("A.1"));
    }
}
