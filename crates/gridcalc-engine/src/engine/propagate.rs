//! Statement application, write-back and change propagation.
//!
//! Applying a statement runs the whole pipeline (rewrite calls, resolve
//! references, evaluate), writes the result to the target cell and then
//! fires the target's change handler synchronously. Handlers usually apply
//! more formulas, so propagation is a direct call chain. Its depth is
//! counted, and a chain deeper than `max_propagation_depth` is reported as
//! [`FormulaError::CircularReference`].

use tracing::{debug, trace, warn};

use super::eval::Evaluator;
use super::format::format_dynamic;
use super::grid::CellGrid;
use super::resolve::{ResolvedExpression, resolve_references};
use super::rewrite::rewrite_calls;
use super::split::{FormulaStatement, split_formulas};
use super::token::tokenize;
use crate::config::EngineConfig;
use crate::error::{FormulaError, Result};

/// Formula engine. Holds no grid state between calls.
pub struct FormulaEngine {
    config: EngineConfig,
    evaluator: Evaluator,
}

impl Default for FormulaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FormulaEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let evaluator = Evaluator::new(&config);
        FormulaEngine { config, evaluator }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Rewrite calls and resolve references in an expression.
    pub fn resolve(&self, expression: &str, grid: &dyn CellGrid) -> ResolvedExpression {
        resolve_references(rewrite_calls(tokenize(expression)), grid)
    }

    /// Compute the display value of an expression without writing it.
    ///
    /// When evaluation fails the resolved expression text is returned.
    pub fn evaluate(&self, expression: &str, grid: &dyn CellGrid) -> String {
        let resolved = self.resolve(expression, grid);
        trace!(resolved = %resolved, "resolved expression");
        match self.evaluator.evaluate(&resolved, grid) {
            Ok(value) => format_dynamic(&value),
            Err(err) => {
                warn!(error = %err, "evaluation failed; keeping resolved text");
                resolved.to_string()
            }
        }
    }

    /// Apply a `||`-joined batch of statements in order.
    pub fn apply(&self, grid: &mut dyn CellGrid, formulae: &str) -> Result<()> {
        self.apply_at_depth(grid, formulae, 0)
    }

    fn apply_at_depth(&self, grid: &mut dyn CellGrid, formulae: &str, depth: usize) -> Result<()> {
        for formula in split_formulas(formulae) {
            let statement = FormulaStatement::parse(formula)?;
            let value = self.evaluate(&statement.expression, grid);
            debug!(cell = %statement.target, value = %value, depth, "applied formula");
            self.write_back(grid, &statement.target, &value, depth)?;
        }
        Ok(())
    }

    /// Store `value` in `target` and fire the target's change handler.
    pub fn write_back(
        &self,
        grid: &mut dyn CellGrid,
        target: &str,
        value: &str,
        depth: usize,
    ) -> Result<()> {
        grid.set_cell_value(target, value);

        let Some(handler) = grid.change_handler(target) else {
            return Ok(());
        };
        let depth = depth + 1;
        if depth > self.config.max_propagation_depth {
            warn!(cell = target, depth, "propagation too deep; circular reference");
            return Err(FormulaError::CircularReference {
                cell: target.to_string(),
                depth,
            });
        }
        let propagation = Propagation {
            engine: self,
            cell: target,
            depth,
        };
        handler(&propagation, grid)
    }
}

/// Context handed to a change handler.
pub struct Propagation<'a> {
    engine: &'a FormulaEngine,
    cell: &'a str,
    depth: usize,
}

impl Propagation<'_> {
    /// Apply a formula batch one level deeper in the propagation chain.
    pub fn apply(&self, grid: &mut dyn CellGrid, formulae: &str) -> Result<()> {
        self.engine.apply_at_depth(grid, formulae, self.depth)
    }

    /// The cell whose change fired the handler.
    pub fn cell(&self) -> &str {
        self.cell
    }

    /// Nesting level of the handler (1 for the first write of a batch).
    pub fn depth(&self) -> usize {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::grid::test_grid::TestGrid;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_apply_writes_target() {
        let mut grid = TestGrid::with_cells(&[("A.1", "2"), ("A.2", "3")]);
        FormulaEngine::new().apply(&mut grid, "[A.3]=[A.1]+[A.2]").unwrap();
        assert_eq!(grid.cell_value("A.3").as_deref(), Some("5"));
    }

    #[test]
    fn test_handler_fires_once_per_write() {
        let mut grid = TestGrid::with_cells(&[("A.1", "2"), ("A.2", "3"), ("A.3", "")]);
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        grid.handlers.insert(
            "A.3".to_string(),
            Arc::new(move |p: &Propagation<'_>, _: &mut dyn CellGrid| -> Result<()> {
                assert_eq!(p.cell(), "A.3");
                assert_eq!(p.depth(), 1);
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );

        FormulaEngine::new().apply(&mut grid, "[A.3]=[A.1]+[A.2]").unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handler_recalculates_dependents_immediately() {
        let mut grid = TestGrid::with_cells(&[("A.1", "1")]);
        grid.handlers.insert(
            "A.1".to_string(),
            Arc::new(|p: &Propagation<'_>, g: &mut dyn CellGrid| p.apply(g, "[B.1]=[A.1]*10")),
        );

        FormulaEngine::new()
            .apply(&mut grid, "[A.1]=4||[C.1]=[B.1]+1")
            .unwrap();
        assert_eq!(grid.cell_value("B.1").as_deref(), Some("40"));
        assert_eq!(grid.cell_value("C.1").as_deref(), Some("41"));
    }

    #[test]
    fn test_cycle_reported_as_circular_reference() {
        let mut grid = TestGrid::default();
        grid.handlers.insert(
            "A.1".to_string(),
            Arc::new(|p: &Propagation<'_>, g: &mut dyn CellGrid| p.apply(g, "[B.1]=[A.1]+1")),
        );
        grid.handlers.insert(
            "B.1".to_string(),
            Arc::new(|p: &Propagation<'_>, g: &mut dyn CellGrid| p.apply(g, "[A.1]=[B.1]+1")),
        );

        let engine = FormulaEngine::with_config(EngineConfig {
            max_propagation_depth: 5,
            ..EngineConfig::default()
        });
        let err = engine.apply(&mut grid, "[A.1]=0").unwrap_err();
        assert!(matches!(err, FormulaError::CircularReference { depth: 6, .. }));
    }

    #[test]
    fn test_failed_evaluation_writes_resolved_text() {
        let mut grid = TestGrid::with_cells(&[("A.1", "2")]);
        FormulaEngine::new().apply(&mut grid, "[B.1]=[A.1] + * 3").unwrap();
        assert_eq!(grid.cell_value("B.1").as_deref(), Some("2 + * 3"));
    }

    #[test]
    fn test_malformed_statement_is_an_error() {
        let mut grid = TestGrid::default();
        assert!(FormulaEngine::new().apply(&mut grid, "A.1=1").is_err());
    }
}
