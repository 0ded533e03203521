//! Sheet import/export.

pub mod csv;

pub use csv::{parse_csv, parse_csv_str, write_cells, write_csv};
