use std::path::Path;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use rusqlite::{Connection, OptionalExtension};

use super::backend::SheetBackend;
use super::schema;
use crate::error::{Result, TrackerError};

/// Helper macro to convert rusqlite errors to TrackerError.
macro_rules! db_err {
    ($result:expr) => {
        $result.map_err(|e| TrackerError::Connection(e.to_string()))
    };
}

/// Durable local sheet backend on SQLite.
///
/// Sheets are stored generically: one `sheets` row per worksheet and one
/// `sheet_rows` row per data row, with the cells kept as a JSON array so a
/// row update is a single write. Insertion order doubles as row order.
///
/// Thread-safe via `parking_lot::Mutex`; two separate processes editing the
/// same file can still race, which mirrors the backing-service model.
#[derive(Clone)]
pub struct SqliteBackend {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteBackend {
    /// Open or create the database file.
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| TrackerError::Connection(e.to_string()))?;
        }

        let conn = db_err!(Connection::open(db_path))?;

        db_err!(conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA foreign_keys=ON;
            PRAGMA busy_timeout=5000;
            "
        ))?;

        db_err!(conn.execute_batch(schema::SCHEMA))?;

        tracing::debug!("opened sheet store at {}", db_path.display());

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open the store at the default per-user data path.
    pub fn open_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "jobtrack")
            .ok_or_else(|| TrackerError::Connection("cannot resolve a data directory".into()))?;
        Self::open(&dirs.data_dir().join("jobtrack.db"))
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock()
    }

    fn sheet_exists(conn: &Connection, sheet: &str) -> Result<bool> {
        let found: Option<i64> = db_err!(conn
            .query_row(
                "SELECT 1 FROM sheets WHERE name = ?1",
                rusqlite::params![sheet],
                |row| row.get(0),
            )
            .optional())?;
        Ok(found.is_some())
    }

    /// Rowid of the `index`-th data row of `sheet`, in insertion order.
    fn row_id_at(conn: &Connection, sheet: &str, index: usize) -> Result<i64> {
        db_err!(conn
            .query_row(
                "SELECT id FROM sheet_rows WHERE sheet = ?1 ORDER BY id LIMIT 1 OFFSET ?2",
                rusqlite::params![sheet, index as i64],
                |row| row.get(0),
            )
            .optional())?
        .ok_or_else(|| TrackerError::NotFound(format!("row {index} in sheet '{sheet}'")))
    }
}

impl SheetBackend for SqliteBackend {
    fn ensure_sheet(&self, sheet: &str, header: &[&str]) -> Result<()> {
        let conn = self.conn();
        let header_json = serde_json::to_string(header)
            .map_err(|e| TrackerError::Connection(e.to_string()))?;
        // "already exists" is the synchronization point.
        db_err!(conn.execute(
            "INSERT OR IGNORE INTO sheets (name, header) VALUES (?1, ?2)",
            rusqlite::params![sheet, header_json],
        ))?;
        Ok(())
    }

    fn append_row(&self, sheet: &str, row: Vec<String>) -> Result<()> {
        let conn = self.conn();
        if !Self::sheet_exists(&conn, sheet)? {
            return Err(TrackerError::Connection(format!("unknown sheet '{sheet}'")));
        }
        let cells = serde_json::to_string(&row)
            .map_err(|e| TrackerError::Connection(e.to_string()))?;
        db_err!(conn.execute(
            "INSERT INTO sheet_rows (sheet, cells) VALUES (?1, ?2)",
            rusqlite::params![sheet, cells],
        ))?;
        Ok(())
    }

    fn read_rows(&self, sheet: &str) -> Result<Vec<Vec<String>>> {
        let conn = self.conn();
        if !Self::sheet_exists(&conn, sheet)? {
            return Err(TrackerError::Connection(format!("unknown sheet '{sheet}'")));
        }
        let mut stmt = db_err!(
            conn.prepare("SELECT cells FROM sheet_rows WHERE sheet = ?1 ORDER BY id")
        )?;
        let cells = db_err!(stmt.query_map(rusqlite::params![sheet], |row| {
            row.get::<_, String>(0)
        }))?;

        let mut rows = Vec::new();
        for cell_json in cells {
            let cell_json = db_err!(cell_json)?;
            let row: Vec<String> = serde_json::from_str(&cell_json)
                .map_err(|e| TrackerError::Connection(format!("corrupt row cells: {e}")))?;
            rows.push(row);
        }
        Ok(rows)
    }

    fn update_row(&self, sheet: &str, index: usize, row: Vec<String>) -> Result<()> {
        let conn = self.conn();
        let row_id = Self::row_id_at(&conn, sheet, index)?;
        let cells = serde_json::to_string(&row)
            .map_err(|e| TrackerError::Connection(e.to_string()))?;
        db_err!(conn.execute(
            "UPDATE sheet_rows SET cells = ?1 WHERE id = ?2",
            rusqlite::params![cells, row_id],
        ))?;
        Ok(())
    }

    fn delete_row(&self, sheet: &str, index: usize) -> Result<()> {
        let conn = self.conn();
        let row_id = Self::row_id_at(&conn, sheet, index)?;
        db_err!(conn.execute(
            "DELETE FROM sheet_rows WHERE id = ?1",
            rusqlite::params![row_id],
        ))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_temp() -> (TempDir, SqliteBackend) {
        let dir = TempDir::new().unwrap();
        let backend = SqliteBackend::open(&dir.path().join("test.db")).unwrap();
        (dir, backend)
    }

    #[test]
    fn rows_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.db");

        let backend = SqliteBackend::open(&path).unwrap();
        backend.ensure_sheet("t", &["A", "B"]).unwrap();
        backend
            .append_row("t", vec!["1".into(), "2".into()])
            .unwrap();
        drop(backend);

        let backend = SqliteBackend::open(&path).unwrap();
        let rows = backend.read_rows("t").unwrap();
        assert_eq!(rows, vec![vec!["1".to_string(), "2".to_string()]]);
    }

    #[test]
    fn update_row_overwrites_in_place() {
        let (_dir, backend) = open_temp();
        backend.ensure_sheet("t", &["A"]).unwrap();
        backend.append_row("t", vec!["old".into()]).unwrap();
        backend.append_row("t", vec!["keep".into()]).unwrap();

        backend.update_row("t", 0, vec!["new".into()]).unwrap();

        let rows = backend.read_rows("t").unwrap();
        assert_eq!(rows[0], vec!["new".to_string()]);
        assert_eq!(rows[1], vec!["keep".to_string()]);
    }

    #[test]
    fn delete_row_shifts_indices() {
        let (_dir, backend) = open_temp();
        backend.ensure_sheet("t", &["A"]).unwrap();
        for v in ["a", "b", "c"] {
            backend.append_row("t", vec![v.into()]).unwrap();
        }

        backend.delete_row("t", 1).unwrap();

        let rows = backend.read_rows("t").unwrap();
        assert_eq!(rows, vec![vec!["a".to_string()], vec!["c".to_string()]]);

        let err = backend.delete_row("t", 2).unwrap_err();
        assert!(matches!(err, TrackerError::NotFound(_)));
    }

    #[test]
    fn ensure_sheet_twice_keeps_rows() {
        let (_dir, backend) = open_temp();
        backend.ensure_sheet("t", &["A"]).unwrap();
        backend.append_row("t", vec!["x".into()]).unwrap();
        backend.ensure_sheet("t", &["A"]).unwrap();
        assert_eq!(backend.read_rows("t").unwrap().len(), 1);
    }
}
