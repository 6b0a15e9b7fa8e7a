use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::backend::SheetBackend;
use crate::error::{Result, TrackerError};

/// In-memory sheet backend for tests and `--memory` demo mode. Contents
/// die with the process.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    sheets: Arc<Mutex<HashMap<String, Sheet>>>,
}

struct Sheet {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_sheet<T>(&self, sheet: &str, f: impl FnOnce(&mut Sheet) -> Result<T>) -> Result<T> {
        let mut sheets = self.sheets.lock();
        let entry = sheets
            .get_mut(sheet)
            .ok_or_else(|| TrackerError::Connection(format!("unknown sheet '{sheet}'")))?;
        f(entry)
    }
}

impl SheetBackend for MemoryBackend {
    fn ensure_sheet(&self, sheet: &str, header: &[&str]) -> Result<()> {
        let mut sheets = self.sheets.lock();
        sheets.entry(sheet.to_string()).or_insert_with(|| Sheet {
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        });
        Ok(())
    }

    fn append_row(&self, sheet: &str, row: Vec<String>) -> Result<()> {
        self.with_sheet(sheet, |s| {
            s.rows.push(row);
            Ok(())
        })
    }

    fn read_rows(&self, sheet: &str) -> Result<Vec<Vec<String>>> {
        self.with_sheet(sheet, |s| Ok(s.rows.clone()))
    }

    fn update_row(&self, sheet: &str, index: usize, row: Vec<String>) -> Result<()> {
        self.with_sheet(sheet, |s| match s.rows.get_mut(index) {
            Some(slot) => {
                *slot = row;
                Ok(())
            }
            None => Err(TrackerError::NotFound(format!(
                "row {index} in sheet '{sheet}'"
            ))),
        })
    }

    fn delete_row(&self, sheet: &str, index: usize) -> Result<()> {
        self.with_sheet(sheet, |s| {
            if index >= s.rows.len() {
                return Err(TrackerError::NotFound(format!(
                    "row {index} in sheet '{sheet}'"
                )));
            }
            s.rows.remove(index);
            Ok(())
        })
    }
}
