//! Typed access to the two worksheets backing the tracker.
//!
//! The raw backend deals in string cells; everything crossing this module's
//! boundary is a decoded model. An explicit [`Store`] handle is passed into
//! the service and the UIs at construction, there is no process-wide
//! connection state.

mod backend;
mod memory;
mod schema;
mod sqlite;

pub use backend::SheetBackend;
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::{Result, TrackerError};
use crate::models::{Application, HistoryAction, HistoryEntry, Status};

pub const APPLICATIONS_SHEET: &str = "applications";
pub const HISTORY_SHEET: &str = "history";

const APPLICATIONS_HEADER: [&str; 7] = [
    "ID",
    "Company",
    "Position",
    "Status",
    "Timestamp",
    "Notes",
    "Link",
];
const HISTORY_HEADER: [&str; 5] = ["HistoryID", "ApplicationID", "Action", "Detail", "Timestamp"];

/// Handle on the two-sheet store. Cheap to clone.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn SheetBackend>,
}

impl Store {
    pub fn new(backend: impl SheetBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Throwaway in-memory store with the schema in place.
    pub fn in_memory() -> Result<Self> {
        let store = Self::new(MemoryBackend::new());
        store.ensure_schema()?;
        Ok(store)
    }

    /// Durable store at `path`, creating the schema when absent.
    pub fn open(path: &Path) -> Result<Self> {
        let store = Self::new(SqliteBackend::open(path)?);
        store.ensure_schema()?;
        Ok(store)
    }

    /// Durable store at the default per-user data path.
    pub fn open_default() -> Result<Self> {
        let store = Self::new(SqliteBackend::open_default()?);
        store.ensure_schema()?;
        Ok(store)
    }

    /// Create both worksheets with their canonical headers when missing.
    pub fn ensure_schema(&self) -> Result<()> {
        self.backend
            .ensure_sheet(APPLICATIONS_SHEET, &APPLICATIONS_HEADER)?;
        self.backend.ensure_sheet(HISTORY_SHEET, &HISTORY_HEADER)
    }

    pub fn insert_application(&self, app: &Application) -> Result<()> {
        self.backend
            .append_row(APPLICATIONS_SHEET, encode_application(app))
    }

    pub fn list_applications(&self) -> Result<Vec<Application>> {
        self.backend
            .read_rows(APPLICATIONS_SHEET)?
            .iter()
            .enumerate()
            .map(|(i, row)| decode_application(i, row))
            .collect()
    }

    /// Position of the first (by the uniqueness invariant, only) row with
    /// this id. Linear scan over the identifier column.
    pub fn find_application_index(&self, id: &str) -> Result<usize> {
        let rows = self.backend.read_rows(APPLICATIONS_SHEET)?;
        rows.iter()
            .position(|row| row.first().is_some_and(|cell| cell == id))
            .ok_or_else(|| TrackerError::NotFound(format!("application '{id}'")))
    }

    pub fn get_application(&self, id: &str) -> Result<Application> {
        let rows = self.backend.read_rows(APPLICATIONS_SHEET)?;
        let index = rows
            .iter()
            .position(|row| row.first().is_some_and(|cell| cell == id))
            .ok_or_else(|| TrackerError::NotFound(format!("application '{id}'")))?;
        decode_application(index, &rows[index])
    }

    /// Overwrite the whole row in a single backend write. The index is
    /// looked up and used immediately; it must not be cached across calls.
    pub fn update_application_row(&self, app: &Application) -> Result<()> {
        let index = self.find_application_index(&app.id)?;
        self.backend
            .update_row(APPLICATIONS_SHEET, index, encode_application(app))
    }

    pub fn delete_application_row(&self, id: &str) -> Result<()> {
        let index = self.find_application_index(id)?;
        self.backend.delete_row(APPLICATIONS_SHEET, index)
    }

    pub fn insert_history(&self, entry: &HistoryEntry) -> Result<()> {
        self.backend.append_row(HISTORY_SHEET, encode_history(entry))
    }

    pub fn list_history(&self) -> Result<Vec<HistoryEntry>> {
        self.backend
            .read_rows(HISTORY_SHEET)?
            .iter()
            .enumerate()
            .map(|(i, row)| decode_history(i, row))
            .collect()
    }

    pub fn delete_history_row(&self, history_id: &str) -> Result<()> {
        let rows = self.backend.read_rows(HISTORY_SHEET)?;
        let index = rows
            .iter()
            .position(|row| row.first().is_some_and(|cell| cell == history_id))
            .ok_or_else(|| TrackerError::NotFound(format!("history entry '{history_id}'")))?;
        self.backend.delete_row(HISTORY_SHEET, index)
    }
}

fn encode_application(app: &Application) -> Vec<String> {
    vec![
        app.id.clone(),
        app.company.clone(),
        app.position.clone(),
        app.status.as_str().to_string(),
        app.last_action_at.to_rfc3339(),
        app.notes.clone().unwrap_or_default(),
        app.link.clone().unwrap_or_default(),
    ]
}

fn decode_application(index: usize, row: &[String]) -> Result<Application> {
    // Sheets written before the Link column existed have six columns;
    // treat the missing cell as empty.
    if row.len() < 6 {
        return Err(malformed(
            APPLICATIONS_SHEET,
            index,
            format!("expected at least 6 columns, got {}", row.len()),
        ));
    }

    let status = Status::from_str(&row[3])
        .ok_or_else(|| malformed(APPLICATIONS_SHEET, index, format!("unknown status '{}'", row[3])))?;
    let last_action_at = parse_timestamp(APPLICATIONS_SHEET, index, &row[4])?;

    Ok(Application {
        id: row[0].clone(),
        company: row[1].clone(),
        position: row[2].clone(),
        status,
        last_action_at,
        notes: none_if_empty(&row[5]),
        link: none_if_empty(row.get(6).map(String::as_str).unwrap_or_default()),
    })
}

fn encode_history(entry: &HistoryEntry) -> Vec<String> {
    vec![
        entry.history_id.clone(),
        entry.application_id.clone(),
        entry.action.as_str().to_string(),
        entry.detail.clone(),
        entry.timestamp.to_rfc3339(),
    ]
}

fn decode_history(index: usize, row: &[String]) -> Result<HistoryEntry> {
    if row.len() < 5 {
        return Err(malformed(
            HISTORY_SHEET,
            index,
            format!("expected 5 columns, got {}", row.len()),
        ));
    }

    let action = HistoryAction::from_str(&row[2])
        .ok_or_else(|| malformed(HISTORY_SHEET, index, format!("unknown action '{}'", row[2])))?;
    let timestamp = parse_timestamp(HISTORY_SHEET, index, &row[4])?;

    Ok(HistoryEntry {
        history_id: row[0].clone(),
        application_id: row[1].clone(),
        action,
        detail: row[3].clone(),
        timestamp,
    })
}

fn parse_timestamp(sheet: &'static str, index: usize, cell: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(cell)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| malformed(sheet, index, format!("bad timestamp '{cell}': {e}")))
}

fn malformed(sheet: &'static str, row: usize, reason: String) -> TrackerError {
    TrackerError::MalformedRow { sheet, row, reason }
}

fn none_if_empty(cell: &str) -> Option<String> {
    if cell.is_empty() {
        None
    } else {
        Some(cell.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(id: &str) -> Application {
        Application {
            id: id.to_string(),
            company: "Acme".into(),
            position: "Engineer".into(),
            status: Status::Applied,
            last_action_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            notes: None,
            link: None,
        }
    }

    #[test]
    fn round_trips_an_application() {
        let store = Store::in_memory().unwrap();
        let mut app = sample("ab12cd34");
        app.notes = Some("call back".into());
        app.link = Some("https://example.com/job".into());
        store.insert_application(&app).unwrap();

        let loaded = store.get_application("ab12cd34").unwrap();
        assert_eq!(loaded.company, "Acme");
        assert_eq!(loaded.status, Status::Applied);
        assert_eq!(loaded.notes.as_deref(), Some("call back"));
        assert_eq!(loaded.link.as_deref(), Some("https://example.com/job"));
    }

    #[test]
    fn tolerates_rows_without_link_column() {
        let backend = MemoryBackend::new();
        let store = Store::new(backend.clone());
        store.ensure_schema().unwrap();

        // A row written by the pre-link schema revision.
        backend
            .append_row(
                APPLICATIONS_SHEET,
                vec![
                    "old00001".into(),
                    "Acme".into(),
                    "Engineer".into(),
                    "applied".into(),
                    "2026-03-01T12:00:00+00:00".into(),
                    "".into(),
                ],
            )
            .unwrap();

        let app = store.get_application("old00001").unwrap();
        assert_eq!(app.link, None);
        assert_eq!(app.notes, None);
    }

    #[test]
    fn rejects_unknown_status() {
        let backend = MemoryBackend::new();
        let store = Store::new(backend.clone());
        store.ensure_schema().unwrap();

        backend
            .append_row(
                APPLICATIONS_SHEET,
                vec![
                    "bad00001".into(),
                    "Acme".into(),
                    "Engineer".into(),
                    "ghosted".into(),
                    "2026-03-01T12:00:00+00:00".into(),
                    "".into(),
                    "".into(),
                ],
            )
            .unwrap();

        let err = store.list_applications().unwrap_err();
        assert!(matches!(err, TrackerError::MalformedRow { .. }));
    }

    #[test]
    fn rejects_unparseable_timestamp() {
        let backend = MemoryBackend::new();
        let store = Store::new(backend.clone());
        store.ensure_schema().unwrap();

        backend
            .append_row(
                APPLICATIONS_SHEET,
                vec![
                    "bad00002".into(),
                    "Acme".into(),
                    "Engineer".into(),
                    "applied".into(),
                    "01-03-2026 12:00".into(),
                    "".into(),
                    "".into(),
                ],
            )
            .unwrap();

        let err = store.list_applications().unwrap_err();
        assert!(matches!(err, TrackerError::MalformedRow { .. }));
    }

    #[test]
    fn find_application_index_scans_in_order() {
        let store = Store::in_memory().unwrap();
        store.insert_application(&sample("first001")).unwrap();
        store.insert_application(&sample("second02")).unwrap();

        assert_eq!(store.find_application_index("first001").unwrap(), 0);
        assert_eq!(store.find_application_index("second02").unwrap(), 1);
        let err = store.find_application_index("absent00").unwrap_err();
        assert!(matches!(err, TrackerError::NotFound(_)));
    }

    #[test]
    fn delete_then_lookup_uses_fresh_indices() {
        let store = Store::in_memory().unwrap();
        store.insert_application(&sample("first001")).unwrap();
        store.insert_application(&sample("second02")).unwrap();

        store.delete_application_row("first001").unwrap();
        // The surviving row shifted to index 0; a fresh scan must find it.
        assert_eq!(store.find_application_index("second02").unwrap(), 0);
    }
}
