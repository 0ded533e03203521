use super::Sheet;
use crate::error::{GridcalcError, Result};
use crate::storage::{parse_csv, write_csv};
use std::path::Path;

impl Sheet {
    /// Load cells from a CSV grid file, replacing current contents.
    /// Change handlers are kept.
    pub fn load_csv(&mut self, path: &Path) -> Result<()> {
        let cells = parse_csv(path)?;
        self.values.clear();
        self.order.clear();
        for (id, value) in cells {
            self.set(id, value);
        }
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    /// Write the sheet as a CSV grid and remember the path.
    pub fn save_csv(&mut self, path: &Path) -> Result<()> {
        write_csv(path, self)?;
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    /// Save to the current file path.
    pub fn save(&mut self) -> Result<()> {
        let path = self.file_path.clone().ok_or(GridcalcError::NoFilePath)?;
        self.save_csv(&path)
    }
}
