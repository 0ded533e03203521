//! Range expansion.
//!
//! A range `start:end` names two opposite corners of a rectangle. Corners
//! are normalized, so `C.3:A.1` covers the same cells as `A.1:C.3`. Rows
//! compare numerically and columns lexically. Cells are collected by
//! walking the grid's own enumeration, so the result follows grid order.

use tracing::trace;

use super::cell_id::CellId;
use super::grid::CellGrid;
use super::number::parse_float;

/// Inclusive row/column bounds of a range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeBounds {
    pub lower_row: u64,
    pub upper_row: u64,
    pub lower_col: String,
    pub upper_col: String,
}

impl RangeBounds {
    /// Parse `start:end`. None if there is not exactly one `:` or either
    /// corner is not a valid cell id.
    pub fn parse(range: &str) -> Option<RangeBounds> {
        let (start, end) = range.split_once(':')?;
        if end.contains(':') {
            return None;
        }
        let start = CellId::parse(start)?;
        let end = CellId::parse(end)?;
        Some(RangeBounds {
            lower_row: start.row.min(end.row),
            upper_row: start.row.max(end.row),
            lower_col: start.column.clone().min(end.column.clone()),
            upper_col: start.column.max(end.column),
        })
    }

    pub fn contains(&self, id: &CellId) -> bool {
        (self.lower_row..=self.upper_row).contains(&id.row)
            && id.column >= self.lower_col
            && id.column <= self.upper_col
    }
}

/// Cells captured by a range, in grid order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpandedRange {
    /// The range text as written, e.g. `A.1:C.3`.
    pub source: String,
    /// `(id, value)` pairs inside the bounding rectangle.
    pub cells: Vec<(String, String)>,
}

impl ExpandedRange {
    /// Cell values read as numbers; non-numeric contents are NaN.
    pub fn numbers(&self) -> Vec<f64> {
        self.cells.iter().map(|(_, v)| parse_float(v)).collect()
    }

    /// Raw cell values.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(_, v)| v.as_str())
    }

    pub fn sum(&self) -> f64 {
        self.numbers().into_iter().sum()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Collect the cells of `grid` inside `range`.
///
/// Malformed ranges yield an empty result. Grid cells whose ids do not
/// parse are never included.
pub fn expand_range(range: &str, grid: &dyn CellGrid) -> ExpandedRange {
    let mut expanded = ExpandedRange {
        source: range.to_string(),
        cells: Vec::new(),
    };
    let Some(bounds) = RangeBounds::parse(range) else {
        trace!(range, "malformed range expands to nothing");
        return expanded;
    };

    for (id, value) in grid.cells() {
        if CellId::parse(&id).is_some_and(|cell| bounds.contains(&cell)) {
            expanded.cells.push((id, value));
        }
    }
    trace!(range = %expanded.source, cells = expanded.len(), "expanded range");
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::grid::test_grid::TestGrid;
    use pretty_assertions::assert_eq;

    fn sample() -> TestGrid {
        TestGrid::with_cells(&[
            ("B.1", "1"),
            ("B.2", "2"),
            ("B.3", "3"),
            ("C.1", "4"),
            ("C.2", "5"),
            ("C.3", "6"),
            ("D.1", "100"),
        ])
    }

    #[test]
    fn test_expand_inclusive_rectangle() {
        let expanded = expand_range("B.1:C.2", &sample());
        assert_eq!(expanded.numbers(), vec![1.0, 2.0, 4.0, 5.0]);
        assert_eq!(expanded.sum(), 12.0);
    }

    #[test]
    fn test_reversed_corners_normalized() {
        let forward = expand_range("B.1:C.2", &sample());
        let reversed = expand_range("C.2:B.1", &sample());
        assert_eq!(reversed.cells, forward.cells);
    }

    #[test]
    fn test_single_row_range() {
        let expanded = expand_range("B.3:C.3", &sample());
        assert_eq!(expanded.texts().collect::<Vec<_>>(), vec!["3", "6"]);
    }

    #[test]
    fn test_non_numeric_cell_is_nan() {
        let grid = TestGrid::with_cells(&[("A.1", "2"), ("A.2", "n/a")]);
        let expanded = expand_range("A.1:A.2", &grid);
        assert!(expanded.sum().is_nan());
        assert_eq!(expanded.len(), 2);
    }

    #[test]
    fn test_malformed_range_is_empty() {
        assert!(expand_range("B.1:", &sample()).is_empty());
        assert!(expand_range("B.x:C.2", &sample()).is_empty());
        assert!(expand_range("B.1:C.2:D.3", &sample()).is_empty());
    }

    #[test]
    fn test_columns_compare_lexically() {
        let grid = TestGrid::with_cells(&[("AA.1", "1"), ("B.1", "2"), ("C.1", "3")]);
        // "AA" sorts between "A" and "B".
        let expanded = expand_range("A.1:B.1", &grid);
        assert_eq!(expanded.texts().collect::<Vec<_>>(), vec!["1", "2"]);
    }
}
