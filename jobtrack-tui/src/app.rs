//! Application state for the jobtrack TUI.

use crossterm::event::KeyCode;

use jobtrack_core::dashboard::Filter;
use jobtrack_core::models::{Application, HistoryEntry, Status, UpdateApplicationInput};
use jobtrack_core::Tracker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,
    Charts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browse,
    /// Typing into the company filter.
    EditFilter,
    /// Typing a note for the selected application.
    EditNote,
    ConfirmDeleteApplication,
    ConfirmDeleteHistory,
}

/// Application state.
pub struct App {
    tracker: Tracker,
    pub applications: Vec<Application>,
    pub history: Vec<HistoryEntry>,
    pub view: View,
    pub mode: Mode,
    pub selected: usize,
    pub history_selected: usize,
    pub status_filter: Option<Status>,
    pub company_query: String,
    pub note_input: String,
    pub should_quit: bool,
    pub last_error: Option<String>,
}

impl App {
    pub fn new(tracker: Tracker) -> Self {
        Self {
            tracker,
            applications: Vec::new(),
            history: Vec::new(),
            view: View::List,
            mode: Mode::Browse,
            selected: 0,
            history_selected: 0,
            status_filter: None,
            company_query: String::new(),
            note_input: String::new(),
            should_quit: false,
            last_error: None,
        }
    }

    /// Re-fetch both sheets. Every screen works off this snapshot until the
    /// next reload; there is no cache beyond it.
    pub fn reload(&mut self) {
        let loaded = self
            .tracker
            .list_applications()
            .and_then(|apps| self.tracker.list_history().map(|history| (apps, history)));
        match loaded {
            Ok((apps, history)) => {
                self.applications = apps;
                self.history = history;
                self.last_error = None;
            }
            Err(e) => self.last_error = Some(e.to_string()),
        }
        self.clamp_selection();
    }

    pub fn filter(&self) -> Filter {
        Filter {
            statuses: self.status_filter.map(|s| vec![s]).unwrap_or_default(),
            company: if self.company_query.is_empty() {
                None
            } else {
                Some(self.company_query.clone())
            },
        }
    }

    pub fn visible(&self) -> Vec<&Application> {
        self.filter().apply(&self.applications)
    }

    pub fn selected_application(&self) -> Option<&Application> {
        self.visible().get(self.selected).copied()
    }

    /// History of the selected application, most recent first.
    pub fn selected_history(&self) -> Vec<&HistoryEntry> {
        let Some(app) = self.selected_application() else {
            return Vec::new();
        };
        let mut entries: Vec<&HistoryEntry> = self
            .history
            .iter()
            .filter(|entry| entry.application_id == app.id)
            .collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match self.mode {
            Mode::Browse => self.handle_browse_key(code),
            Mode::EditFilter => self.handle_filter_key(code),
            Mode::EditNote => self.handle_note_key(code),
            Mode::ConfirmDeleteApplication => {
                if code == KeyCode::Char('y') {
                    self.delete_selected_application();
                }
                self.mode = Mode::Browse;
            }
            Mode::ConfirmDeleteHistory => {
                if code == KeyCode::Char('y') {
                    self.delete_selected_history_entry();
                }
                self.mode = Mode::Browse;
            }
        }
    }

    fn handle_browse_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => {
                self.view = match self.view {
                    View::List => View::Charts,
                    View::Charts => View::List,
                };
            }
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Char(']') => {
                let len = self.selected_history().len();
                if self.history_selected + 1 < len {
                    self.history_selected += 1;
                }
            }
            KeyCode::Char('[') => {
                self.history_selected = self.history_selected.saturating_sub(1);
            }
            KeyCode::Char('s') => self.cycle_status_filter(),
            KeyCode::Char('/') => self.mode = Mode::EditFilter,
            KeyCode::Char('u') => self.advance_selected_status(),
            KeyCode::Char('n') => {
                if let Some(notes) = self.selected_application().map(|a| a.notes.clone()) {
                    self.note_input = notes.unwrap_or_default();
                    self.mode = Mode::EditNote;
                }
            }
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('d') => {
                if self.selected_application().is_some() {
                    self.mode = Mode::ConfirmDeleteApplication;
                }
            }
            KeyCode::Char('x') => {
                if !self.selected_history().is_empty() {
                    self.mode = Mode::ConfirmDeleteHistory;
                }
            }
            KeyCode::Esc => {
                self.status_filter = None;
                self.company_query.clear();
                self.clamp_selection();
            }
            _ => {}
        }
    }

    fn handle_filter_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => self.mode = Mode::Browse,
            KeyCode::Esc => {
                self.company_query.clear();
                self.mode = Mode::Browse;
                self.clamp_selection();
            }
            KeyCode::Backspace => {
                self.company_query.pop();
                self.clamp_selection();
            }
            KeyCode::Char(c) => {
                self.company_query.push(c);
                self.clamp_selection();
            }
            _ => {}
        }
    }

    fn handle_note_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => {
                self.save_selected_note();
                self.mode = Mode::Browse;
            }
            KeyCode::Esc => {
                self.note_input.clear();
                self.mode = Mode::Browse;
            }
            KeyCode::Backspace => {
                self.note_input.pop();
            }
            KeyCode::Char(c) => self.note_input.push(c),
            _ => {}
        }
    }

    /// Move the selected application to the next status. Goes through the
    /// service, so the usual history entry is derived.
    fn advance_selected_status(&mut self) {
        let Some((id, input)) = self.selected_application().map(|app| {
            let index = Status::ALL
                .iter()
                .position(|&s| s == app.status)
                .unwrap_or_default();
            let next = Status::ALL[(index + 1) % Status::ALL.len()];
            (
                app.id.clone(),
                UpdateApplicationInput {
                    company: app.company.clone(),
                    position: app.position.clone(),
                    status: next,
                    notes: app.notes.clone(),
                    link: app.link.clone(),
                },
            )
        }) else {
            return;
        };

        if let Err(e) = self.tracker.update_application(&id, input) {
            self.last_error = Some(e.to_string());
            return;
        }
        self.reload();
    }

    fn save_selected_note(&mut self) {
        let note = self.note_input.trim().to_string();
        let Some((id, input)) = self.selected_application().map(|app| {
            (
                app.id.clone(),
                UpdateApplicationInput {
                    company: app.company.clone(),
                    position: app.position.clone(),
                    status: app.status,
                    notes: if note.is_empty() { None } else { Some(note.clone()) },
                    link: app.link.clone(),
                },
            )
        }) else {
            return;
        };

        if let Err(e) = self.tracker.update_application(&id, input) {
            self.last_error = Some(e.to_string());
            return;
        }
        self.reload();
    }

    fn cycle_status_filter(&mut self) {
        self.status_filter = match self.status_filter {
            None => Some(Status::ALL[0]),
            Some(current) => {
                let index = Status::ALL
                    .iter()
                    .position(|&s| s == current)
                    .unwrap_or(Status::ALL.len());
                Status::ALL.get(index + 1).copied()
            }
        };
        self.clamp_selection();
    }

    fn delete_selected_application(&mut self) {
        let Some(id) = self.selected_application().map(|a| a.id.clone()) else {
            return;
        };
        if let Err(e) = self.tracker.delete_application(&id) {
            self.last_error = Some(e.to_string());
            return;
        }
        self.reload();
    }

    fn delete_selected_history_entry(&mut self) {
        let Some(history_id) = self
            .selected_history()
            .get(self.history_selected)
            .map(|entry| entry.history_id.clone())
        else {
            return;
        };
        if let Err(e) = self.tracker.delete_history_entry(&history_id) {
            self.last_error = Some(e.to_string());
            return;
        }
        self.reload();
    }

    fn select_next(&mut self) {
        let len = self.visible().len();
        if self.selected + 1 < len {
            self.selected += 1;
            self.history_selected = 0;
        }
    }

    fn select_previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.history_selected = 0;
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        self.selected = self.selected.min(len.saturating_sub(1));
        let hlen = self.selected_history().len();
        self.history_selected = self.history_selected.min(hlen.saturating_sub(1));
    }
}
