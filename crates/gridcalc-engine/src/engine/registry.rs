//! Range placeholders for one statement.
//!
//! The resolver replaces each range reference with a numbered placeholder
//! and records the range text here. Ranges are only expanded when the
//! statement is evaluated, against the grid as it is at that moment.

use super::grid::CellGrid;
use super::range::{ExpandedRange, expand_range};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RangeRegistry {
    ranges: Vec<String>,
}

impl RangeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a range and return its placeholder index.
    pub fn register(&mut self, range: &str) -> usize {
        self.ranges.push(range.to_string());
        self.ranges.len() - 1
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ranges.iter().map(String::as_str)
    }

    /// Expand every registered range, in placeholder order.
    pub fn bind(&self, grid: &dyn CellGrid) -> Vec<ExpandedRange> {
        self.ranges
            .iter()
            .map(|range| expand_range(range, grid))
            .collect()
    }
}
