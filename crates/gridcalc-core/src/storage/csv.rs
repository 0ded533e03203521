//! CSV import/export functionality
//!
//! Import reads a grid: field `c` of line `r` (both zero-indexed) becomes
//! cell `<letters(c)>.<r + 1>`, so the first line holds `A.1`, `B.1`, ...
//! Export writes the same layout back, so a saved sheet loads unchanged.
//! [`write_cells`] prints `id,value` rows for display.

use crate::error::{GridcalcError, Result};
use crate::sheet::Sheet;
use gridcalc_engine::CellGrid;
use gridcalc_engine::engine::{CellId, to_number};
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use tracing::warn;

const MAX_CSV_FILE_BYTES: u64 = 16 * 1_048_576; // 16 MiB

/// Parse a CSV file into `(id, value)` cells
pub fn parse_csv(path: &Path) -> Result<Vec<(String, String)>> {
    let meta = std::fs::metadata(path)?;
    if meta.len() > MAX_CSV_FILE_BYTES {
        return Err(GridcalcError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CSV_FILE_BYTES
            ),
        )));
    }
    let content = std::fs::read_to_string(path)?;
    parse_csv_str(&content)
}

/// Parse CSV text into `(id, value)` cells. Empty fields are skipped.
pub fn parse_csv_str(content: &str) -> Result<Vec<(String, String)>> {
    let mut cells = Vec::new();

    for (row_idx, line) in content.lines().enumerate() {
        let fields = parse_csv_line(line).map_err(|message| GridcalcError::Parse {
            line: row_idx + 1,
            message,
        })?;
        for (col_idx, field) in fields.into_iter().enumerate() {
            if field.is_empty() {
                continue;
            }
            let id = CellId::from_position(col_idx, row_idx);
            cells.push((id.to_string(), field));
        }
    }

    Ok(cells)
}

/// Parse a single CSV line, handling quoted fields
pub(crate) fn parse_csv_line(line: &str) -> std::result::Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut field_was_quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                // Check for escaped quote
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else {
            match c {
                '"' => {
                    in_quotes = true;
                    field_was_quoted = true;
                }
                ',' => {
                    if field_was_quoted {
                        fields.push(std::mem::take(&mut current));
                    } else {
                        fields.push(current.trim().to_string());
                        current.clear();
                    }
                    field_was_quoted = false;
                }
                _ => current.push(c),
            }
        }
    }
    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    if field_was_quoted {
        fields.push(current);
    } else {
        fields.push(current.trim().to_string());
    }
    Ok(fields)
}

/// Export the sheet as a CSV grid, laid out the way [`parse_csv`] reads it:
/// `A.1` is the first field of the first line.
///
/// Cells whose ids are not grid positions (or name row 0) are left out.
pub fn write_csv(path: &Path, sheet: &Sheet) -> Result<()> {
    let mut positioned: HashMap<(usize, usize), String> = HashMap::new();
    let mut max_row = 0usize;
    let mut max_col = 0usize;

    for (id, value) in sheet.cells() {
        let position = CellId::parse(&id)
            .and_then(|cell| Some((cell.row_index()?, cell.column_index()?)));
        let Some((row, col)) = position else {
            warn!(cell = %id, "not a grid position; left out of CSV export");
            continue;
        };
        max_row = max_row.max(row);
        max_col = max_col.max(col);
        positioned.insert((row, col), value);
    }

    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    if !positioned.is_empty() {
        for row in 0..=max_row {
            let line: Vec<String> = (0..=max_col)
                .map(|col| {
                    positioned
                        .get(&(row, col))
                        .map(|v| escape_csv_field(v))
                        .unwrap_or_default()
                })
                .collect();
            writeln!(file, "{}", line.join(","))?;
        }
    }
    file.flush()?;
    Ok(())
}

/// Write `id,value` rows to any writer, in enumeration order.
///
/// Values are quoted where needed but otherwise printed as stored.
pub fn write_cells<W: Write>(out: &mut W, sheet: &Sheet) -> Result<()> {
    for (id, value) in sheet.cells() {
        writeln!(out, "{},{}", quote_csv_field(&id), quote_csv_field(&value))?;
    }
    Ok(())
}

/// Quote a field if it would not read back verbatim.
fn quote_csv_field(field: &str) -> String {
    if field.contains(',')
        || field.contains('"')
        || field.contains('\n')
        || field.contains('\r')
        || field.trim() != field
    {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Escape a field for a CSV file opened by spreadsheet apps
pub(crate) fn escape_csv_field(field: &str) -> String {
    // Guard against CSV formula injection; numbers (signed, `-Infinity`)
    // are left alone.
    let first = field.trim_start_matches([' ', '\t']).chars().next();
    if matches!(first, Some('=' | '+' | '-' | '@')) && to_number(field).is_none() {
        quote_csv_field(&format!("'{}", field))
    } else {
        quote_csv_field(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_csv_line_simple() {
        assert_eq!(parse_csv_line("a,b,c").unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_csv_line_quoted() {
        assert_eq!(
            parse_csv_line(r#"a,"hello, world",c"#).unwrap(),
            vec!["a", "hello, world", "c"]
        );
        assert_eq!(
            parse_csv_line(r#""say ""hi""",  x "#).unwrap(),
            vec![r#"say "hi""#, "x"]
        );
    }

    #[test]
    fn test_parse_csv_line_unterminated() {
        assert!(parse_csv_line(r#"a,"open"#).is_err());
    }

    #[test]
    fn test_parse_csv_str_lays_out_ids() {
        let cells = parse_csv_str("1,2\n,x\n").unwrap();
        assert_eq!(
            cells,
            vec![
                ("A.1".to_string(), "1".to_string()),
                ("B.1".to_string(), "2".to_string()),
                ("B.2".to_string(), "x".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_error_reports_line() {
        let err = parse_csv_str("a\n\"b").unwrap_err();
        assert!(matches!(err, GridcalcError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_escape_csv_field() {
        assert_eq!(escape_csv_field("plain"), "plain");
        assert_eq!(escape_csv_field("a,b"), "\"a,b\"");
        assert_eq!(escape_csv_field("-3.5"), "-3.5");
        assert_eq!(escape_csv_field("-Infinity"), "-Infinity");
        assert_eq!(escape_csv_field("=1+1"), "'=1+1");
        assert_eq!(escape_csv_field("-x"), "'-x");
        assert_eq!(escape_csv_field(" padded"), "\" padded\"");
    }

    #[test]
    fn test_write_cells_prints_values_as_stored() {
        let sheet = Sheet::from_cells([("A.1", "x\"y"), ("A.2", "-x"), ("A.3", "=1")]);
        let mut out = Vec::new();
        write_cells(&mut out, &sheet).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "A.1,\"x\"\"y\"\nA.2,-x\nA.3,=1\n"
        );
    }

    #[test]
    fn test_write_csv_lays_out_grid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let sheet = Sheet::from_cells([
            ("B.2", "a, b"),
            ("A.1", "1"),
            ("C.1", "3"),
            ("Total", "9"),
        ]);
        write_csv(&path, &sheet).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "1,,3\n,\"a, b\",\n");
    }

    #[test]
    fn test_write_csv_output_parses_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let sheet = Sheet::from_cells([("A.1", "2"), ("B.3", " x "), ("A.2", "-4")]);
        write_csv(&path, &sheet).unwrap();

        let mut cells = parse_csv(&path).unwrap();
        cells.sort();
        assert_eq!(
            cells,
            vec![
                ("A.1".to_string(), "2".to_string()),
                ("A.2".to_string(), "-4".to_string()),
                ("B.3".to_string(), " x ".to_string()),
            ]
        );
    }
}
