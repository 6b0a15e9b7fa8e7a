use crate::error::Result;

/// Narrow interface to a spreadsheet-shaped backing store: named sheets,
/// a fixed header row, string cells, positional data rows.
///
/// Shipped implementations are [`super::MemoryBackend`] and
/// [`super::SqliteBackend`]. A hosted spreadsheet service plugs in behind
/// the same trait; such a backend must refuse to construct without a usable
/// credential rather than fail lazily at the first call.
///
/// There are no transactions. A row update is a single call, which narrows
/// the partial-failure window to one write but does not remove it.
pub trait SheetBackend: Send + Sync {
    /// Create `sheet` with `header` unless it already exists. Idempotent;
    /// the backend's own existence check is the synchronization point for
    /// concurrent callers.
    fn ensure_sheet(&self, sheet: &str, header: &[&str]) -> Result<()>;

    /// Insert `row` as the new last data row.
    fn append_row(&self, sheet: &str, row: Vec<String>) -> Result<()>;

    /// Every data row (header excluded) in stored order, oldest first.
    fn read_rows(&self, sheet: &str) -> Result<Vec<Vec<String>>>;

    /// Overwrite the data row at `index` (0-based) in one write.
    fn update_row(&self, sheet: &str, index: usize, row: Vec<String>) -> Result<()>;

    /// Remove the data row at `index`. Every later row shifts up by one,
    /// so any previously computed index is stale after this returns.
    fn delete_row(&self, sheet: &str, index: usize) -> Result<()>;
}
