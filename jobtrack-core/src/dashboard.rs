//! Dashboard projections: filtering, summary aggregates and staleness.
//!
//! Everything here is a pure function over the current application list,
//! recomputed on every render and never persisted.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::models::{Application, Status};

/// Days without action after which an application still in `Applied`
/// counts as stale.
pub const STALE_AFTER_DAYS: i64 = 14;

/// Status-set membership AND case-insensitive company substring. An empty
/// filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    pub statuses: Vec<Status>,
    pub company: Option<String>,
}

impl Filter {
    pub fn matches(&self, app: &Application) -> bool {
        let status_ok = self.statuses.is_empty() || self.statuses.contains(&app.status);
        let company_ok = match &self.company {
            Some(query) if !query.trim().is_empty() => app
                .company
                .to_lowercase()
                .contains(&query.trim().to_lowercase()),
            _ => true,
        };
        status_ok && company_ok
    }

    pub fn apply<'a>(&self, apps: &'a [Application]) -> Vec<&'a Application> {
        apps.iter().filter(|app| self.matches(app)).collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total: usize,
    pub interviews_pending: usize,
    pub offers: usize,
    /// Every status in canonical order, zeroes included.
    pub by_status: Vec<(Status, usize)>,
    /// Company frequency, most frequent first.
    pub by_company: Vec<(String, usize)>,
    /// One point per application in chronological order.
    pub timeline: Vec<TimelinePoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelinePoint {
    pub at: DateTime<Utc>,
    pub status: Status,
    pub company: String,
}

pub fn summarize(apps: &[Application]) -> Summary {
    let by_status = Status::ALL
        .iter()
        .map(|&status| (status, apps.iter().filter(|a| a.status == status).count()))
        .collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for app in apps {
        *counts.entry(app.company.as_str()).or_default() += 1;
    }
    let mut by_company: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    by_company.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut timeline: Vec<TimelinePoint> = apps
        .iter()
        .map(|app| TimelinePoint {
            at: app.last_action_at,
            status: app.status,
            company: app.company.clone(),
        })
        .collect();
    timeline.sort_by_key(|point| point.at);

    Summary {
        total: apps.len(),
        interviews_pending: apps
            .iter()
            .filter(|a| a.status == Status::InterviewPending)
            .count(),
        offers: apps
            .iter()
            .filter(|a| a.status == Status::OfferReceived)
            .count(),
        by_status,
        by_company,
        timeline,
    }
}

pub fn is_stale(app: &Application, now: DateTime<Utc>) -> bool {
    app.status == Status::Applied
        && now - app.last_action_at > Duration::days(STALE_AFTER_DAYS)
}

pub fn stale_ids(apps: &[Application], now: DateTime<Utc>) -> Vec<String> {
    apps.iter()
        .filter(|app| is_stale(app, now))
        .map(|app| app.id.clone())
        .collect()
}

/// List marker for a status, mirroring the dashboard's traffic-light icons.
pub fn status_glyph(status: Status) -> &'static str {
    match status {
        Status::Rejected => "x",
        Status::OfferReceived => "+",
        Status::InterviewPending => "o",
        _ => "-",
    }
}
