//! Cell id parsing and formatting.
//!
//! Cell ids pair a column segment made of letters with a numeric row
//! segment, usually joined by a dot. Either segment may come first:
//!
//! ```ignore
//! let id = CellId::parse("B.3").unwrap();
//! assert_eq!(id.column, "B");
//! assert_eq!(id.row, 3);
//! assert_eq!(CellId::parse("3.B"), Some(id));
//! ```
//!
//! Columns compare lexically as strings, so `AA` sorts before `B`.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// A cell id split into its column letters and row number.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct CellId {
    pub column: String,
    pub row: u64,
}

fn column_first_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?<col>[A-Za-z]+)\.?(?<row>[0-9]+)$")
            .expect("column-first cell id regex must compile")
    })
}

fn row_first_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?<row>[0-9]+)\.?(?<col>[A-Za-z]+)$")
            .expect("row-first cell id regex must compile")
    })
}

impl CellId {
    pub fn new(column: impl Into<String>, row: u64) -> CellId {
        CellId {
            column: column.into(),
            row,
        }
    }

    /// Parse an id such as `A.1`, `1.A` or `A1`.
    /// Returns None if either segment is missing or the row overflows.
    pub fn parse(id: &str) -> Option<CellId> {
        let id = id.trim();
        let caps = column_first_re()
            .captures(id)
            .or_else(|| row_first_re().captures(id))?;
        let row = caps["row"].parse::<u64>().ok()?;
        Some(CellId::new(&caps["col"], row))
    }

    /// Id for a zero-indexed grid position (0, 0) -> `A.1`.
    pub fn from_position(col: usize, row: usize) -> CellId {
        CellId::new(CellId::col_to_letters(col), row as u64 + 1)
    }

    /// Zero-based column index (A -> 0, Z -> 25, AA -> 26).
    /// None if the letters overflow `usize`.
    pub fn column_index(&self) -> Option<usize> {
        let mut n: usize = 0;
        for c in self.column.chars() {
            let digit = (c.to_ascii_uppercase() as u8).checked_sub(b'A')? as usize + 1;
            n = n.checked_mul(26)?.checked_add(digit)?;
        }
        n.checked_sub(1)
    }

    /// Zero-based row index (row 1 -> 0). None for row 0.
    pub fn row_index(&self) -> Option<usize> {
        usize::try_from(self.row.checked_sub(1)?).ok()
    }

    /// Convert column index to spreadsheet-style letters (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col as u128 + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.column, self.row)
    }
}

#[cfg(test)]
mod tests {
    use super::CellId;

    #[test]
    fn test_parse_dotted_ids() {
        let id = CellId::parse("A.1").unwrap();
        assert_eq!(id.column, "A");
        assert_eq!(id.row, 1);

        let id = CellId::parse("AB.120").unwrap();
        assert_eq!(id.column, "AB");
        assert_eq!(id.row, 120);
    }

    #[test]
    fn test_parse_row_first_and_undotted() {
        assert_eq!(CellId::parse("7.C"), Some(CellId::new("C", 7)));
        assert_eq!(CellId::parse("C7"), Some(CellId::new("C", 7)));
    }

    #[test]
    fn test_parse_invalid_inputs() {
        assert!(CellId::parse("").is_none());
        assert!(CellId::parse("A").is_none());
        assert!(CellId::parse("12").is_none());
        assert!(CellId::parse("A.x").is_none());
        assert!(CellId::parse("A..1").is_none());
        assert!(CellId::parse(&format!("A.{}", "9".repeat(40))).is_none());
    }

    #[test]
    fn test_from_position_round_trips_display() {
        assert_eq!(CellId::from_position(0, 0).to_string(), "A.1");
        assert_eq!(CellId::from_position(27, 9).to_string(), "AB.10");
    }

    #[test]
    fn test_position_indices_invert_from_position() {
        let id = CellId::parse("AB.10").unwrap();
        assert_eq!(id.column_index(), Some(27));
        assert_eq!(id.row_index(), Some(9));
        assert_eq!(CellId::parse("z.1").unwrap().column_index(), Some(25));
        assert_eq!(CellId::parse("A.0").unwrap().row_index(), None);
        assert_eq!(CellId::new("Z".repeat(40), 1).column_index(), None);
    }

    #[test]
    fn test_col_to_letters_handles_max_usize() {
        let letters = CellId::col_to_letters(usize::MAX);
        assert!(!letters.is_empty());
        assert!(letters.chars().all(|c| c.is_ascii_uppercase()));
    }
}
