//! Business rules: the one-history-entry-per-update invariant and the
//! coordination between the applications and history sheets.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{Result, TrackerError};
use crate::models::{
    Application, CreateApplicationInput, HistoryAction, HistoryEntry, UpdateApplicationInput,
};
use crate::store::Store;

#[derive(Clone)]
pub struct Tracker {
    store: Store,
}

impl Tracker {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Create an application and its `NewRecord` audit entry.
    pub fn add_application(&self, input: CreateApplicationInput) -> Result<Application> {
        if input.company.trim().is_empty() {
            return Err(TrackerError::Validation("company is required".into()));
        }
        if input.position.trim().is_empty() {
            return Err(TrackerError::Validation("position is required".into()));
        }

        let app = Application {
            id: short_id(),
            company: input.company,
            position: input.position,
            status: input.status,
            last_action_at: Utc::now(),
            notes: none_if_blank(input.notes),
            link: none_if_blank(input.link),
        };

        self.store.insert_application(&app)?;
        self.append_history(
            &app.id,
            HistoryAction::NewRecord,
            format!("Status: {}", app.status.label()),
            app.last_action_at,
        )?;

        tracing::debug!("added application {}", app.id);
        Ok(app)
    }

    /// Overwrite every mutable field and refresh the timestamp, then derive
    /// at most one history entry. A status change masks a simultaneous note
    /// change, and link-only edits never reach the history log.
    pub fn update_application(
        &self,
        id: &str,
        input: UpdateApplicationInput,
    ) -> Result<Application> {
        let existing = self.store.get_application(id)?;
        let old_status = existing.status;

        let updated = Application {
            id: existing.id,
            company: input.company,
            position: input.position,
            status: input.status,
            last_action_at: Utc::now(),
            notes: none_if_blank(input.notes),
            link: none_if_blank(input.link),
        };
        self.store.update_application_row(&updated)?;

        if old_status != updated.status {
            self.append_history(
                id,
                HistoryAction::StatusUpdate,
                format!("{} -> {}", old_status.label(), updated.status.label()),
                updated.last_action_at,
            )?;
        } else if let Some(notes) = &updated.notes {
            self.append_history(
                id,
                HistoryAction::NoteUpdate,
                format!("Note: {notes}"),
                updated.last_action_at,
            )?;
        }

        tracing::debug!("updated application {id}");
        Ok(updated)
    }

    /// Remove the application row only. History rows stay behind as an
    /// audit trail, and deleting an already-absent id succeeds.
    pub fn delete_application(&self, id: &str) -> Result<()> {
        match self.store.delete_application_row(id) {
            Ok(()) => {
                tracing::debug!("deleted application {id}");
                Ok(())
            }
            Err(TrackerError::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Remove exactly one history row by its own id.
    pub fn delete_history_entry(&self, history_id: &str) -> Result<()> {
        self.store.delete_history_row(history_id)?;
        tracing::debug!("deleted history entry {history_id}");
        Ok(())
    }

    pub fn get_application(&self, id: &str) -> Result<Application> {
        self.store.get_application(id)
    }

    pub fn list_applications(&self) -> Result<Vec<Application>> {
        self.store.list_applications()
    }

    pub fn list_history(&self) -> Result<Vec<HistoryEntry>> {
        self.store.list_history()
    }

    /// Audit entries for one application, most recent first. Full-table
    /// scan; fine at the tens-to-hundreds scale this runs at.
    pub fn list_history_for(&self, application_id: &str) -> Result<Vec<HistoryEntry>> {
        let mut entries: Vec<HistoryEntry> = self
            .store
            .list_history()?
            .into_iter()
            .filter(|entry| entry.application_id == application_id)
            .collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(entries)
    }

    fn append_history(
        &self,
        application_id: &str,
        action: HistoryAction,
        detail: String,
        timestamp: DateTime<Utc>,
    ) -> Result<()> {
        self.store.insert_history(&HistoryEntry {
            history_id: short_id(),
            application_id: application_id.to_string(),
            action,
            detail,
            timestamp,
        })
    }
}

/// 8-hex-char opaque identifier.
fn short_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

fn none_if_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
