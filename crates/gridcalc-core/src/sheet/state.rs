use dashmap::DashMap;
use gridcalc_engine::ChangeHandler;
use std::collections::HashMap;
use std::path::PathBuf;

/// In-memory grid of named cells.
///
/// Values are plain text. Cells enumerate in first-insertion order, which is
/// the order range expansion sees them in.
pub struct Sheet {
    /// Cell values by id
    pub(crate) values: DashMap<String, String>,
    /// Ids in first-insertion order
    pub(crate) order: Vec<String>,
    /// Change handlers by cell id
    pub(crate) handlers: HashMap<String, ChangeHandler>,
    /// File the sheet was loaded from or last saved to
    pub file_path: Option<PathBuf>,
    /// Whether any value changed since load/save
    pub modified: bool,
}

impl Sheet {
    /// Create an empty sheet.
    ///
    /// This constructor is side-effect free: it does not touch the filesystem.
    pub fn new() -> Self {
        Sheet {
            values: DashMap::new(),
            order: Vec::new(),
            handlers: HashMap::new(),
            file_path: None,
            modified: false,
        }
    }

    /// Create a sheet from `(id, value)` pairs, in order.
    pub fn from_cells<I, K, V>(cells: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut sheet = Sheet::new();
        for (id, value) in cells {
            sheet.set(id, value);
        }
        sheet.modified = false;
        sheet
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}
