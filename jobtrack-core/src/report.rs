//! Export document generation.
//!
//! Renders the stored applications and their histories into a paginated
//! plain-text document. Every emitted line passes through [`sanitize`], so
//! generation cannot fail on non-ASCII free text; characters without an
//! ASCII fold come out as `?`.

use chrono::{DateTime, Utc};

use crate::models::{Application, HistoryEntry};

/// Data lines per page, footer excluded.
pub const PAGE_BODY_LINES: usize = 48;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// One block per application with notes, link and full history.
    Detailed,
    /// One table row per application with truncated notes.
    Compact,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "detailed" => Some(Self::Detailed),
            "compact" => Some(Self::Compact),
            _ => None,
        }
    }
}

pub fn render(
    apps: &[Application],
    history: &[HistoryEntry],
    format: ReportFormat,
    now: DateTime<Utc>,
) -> String {
    let raw = match format {
        ReportFormat::Detailed => detailed_lines(apps, history, now),
        ReportFormat::Compact => compact_lines(apps, now),
    };
    let lines: Vec<String> = raw.iter().map(|line| sanitize(line)).collect();
    paginate(&lines)
}

fn detailed_lines(
    apps: &[Application],
    history: &[HistoryEntry],
    now: DateTime<Utc>,
) -> Vec<String> {
    let mut lines = vec![
        "JOB APPLICATION REPORT".to_string(),
        format!("Generated: {}", now.format(TIME_FORMAT)),
        String::new(),
    ];

    if apps.is_empty() {
        lines.push("No applications recorded.".to_string());
        return lines;
    }

    for app in apps {
        lines.push("=".repeat(72));
        lines.push(format!("{} - {}", app.company, app.position));
        lines.push(format!(
            "Status: {}    Last action: {}",
            app.status.label(),
            app.last_action_at.format(TIME_FORMAT)
        ));
        if let Some(link) = &app.link {
            lines.push(format!("Link: {link}"));
        }
        if let Some(notes) = &app.notes {
            lines.push("Notes:".to_string());
            for note_line in notes.lines() {
                lines.push(format!("  {note_line}"));
            }
        }

        lines.push("History:".to_string());
        let mut entries: Vec<&HistoryEntry> = history
            .iter()
            .filter(|entry| entry.application_id == app.id)
            .collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        if entries.is_empty() {
            lines.push("  (none)".to_string());
        }
        for entry in entries {
            lines.push(format!(
                "  {}  {:<13}  {}",
                entry.timestamp.format(TIME_FORMAT),
                entry.action.label(),
                entry.detail
            ));
        }
        lines.push(String::new());
    }

    lines
}

fn compact_lines(apps: &[Application], now: DateTime<Utc>) -> Vec<String> {
    let mut lines = vec![
        "JOB APPLICATIONS".to_string(),
        format!("Generated: {}", now.format(TIME_FORMAT)),
        String::new(),
        format!(
            "{:<24} {:<24} {:<18} {:<17} {}",
            "Company", "Position", "Status", "Last action", "Notes"
        ),
        "-".repeat(100),
    ];

    for app in apps {
        lines.push(format!(
            "{:<24} {:<24} {:<18} {:<17} {}",
            truncate(&app.company, 24),
            truncate(&app.position, 24),
            app.status.label(),
            app.last_action_at.format(TIME_FORMAT),
            truncate(app.notes.as_deref().unwrap_or_default(), 30),
        ));
    }

    lines
}

fn paginate(lines: &[String]) -> String {
    let chunks: Vec<&[String]> = if lines.is_empty() {
        vec![&[]]
    } else {
        lines.chunks(PAGE_BODY_LINES).collect()
    };
    let total = chunks.len();

    let mut out = String::new();
    for (page, chunk) in chunks.iter().enumerate() {
        for line in chunk.iter() {
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&format!("{:>72}\n", format!("Page {} of {}", page + 1, total)));
        if page + 1 < total {
            out.push('\x0c');
        }
    }
    out
}

/// Fold `text` to printable ASCII. Latin diacritics map to their base
/// letter, a few typographic marks to their plain forms, anything else
/// to `?`.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '\t' {
            out.push(' ');
        } else if c.is_ascii() && !c.is_ascii_control() {
            out.push(c);
        } else {
            out.push_str(fold(c));
        }
    }
    out
}

fn fold(c: char) -> &'static str {
    match c {
        'Ç' => "C",
        'ç' => "c",
        'Ğ' => "G",
        'ğ' => "g",
        'İ' => "I",
        'ı' => "i",
        'Ş' => "S",
        'ş' => "s",
        'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' => "A",
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => "a",
        'É' | 'È' | 'Ê' | 'Ë' => "E",
        'é' | 'è' | 'ê' | 'ë' => "e",
        'Í' | 'Ì' | 'Î' | 'Ï' => "I",
        'í' | 'ì' | 'î' | 'ï' => "i",
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => "O",
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => "o",
        'Ú' | 'Ù' | 'Û' | 'Ü' => "U",
        'ú' | 'ù' | 'û' | 'ü' => "u",
        'Ý' => "Y",
        'ý' | 'ÿ' => "y",
        'Ñ' => "N",
        'ñ' => "n",
        'Æ' => "AE",
        'æ' => "ae",
        'Œ' => "OE",
        'œ' => "oe",
        'ß' => "ss",
        '\u{2018}' | '\u{2019}' => "'",
        '\u{201C}' | '\u{201D}' => "\"",
        '\u{2013}' | '\u{2014}' => "-",
        '\u{2026}' => "...",
        '\u{00A0}' => " ",
        _ => "?",
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HistoryAction, Status};
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
    }

    fn app(id: &str, company: &str) -> Application {
        Application {
            id: id.to_string(),
            company: company.to_string(),
            position: "Engineer".into(),
            status: Status::Applied,
            last_action_at: at(1, 12),
            notes: None,
            link: None,
        }
    }

    fn entry(app_id: &str, detail: &str, day: u32) -> HistoryEntry {
        HistoryEntry {
            history_id: format!("h-{detail}"),
            application_id: app_id.to_string(),
            action: HistoryAction::StatusUpdate,
            detail: detail.to_string(),
            timestamp: at(day, 9),
        }
    }

    #[test]
    fn sanitize_folds_diacritics() {
        assert_eq!(sanitize("Şirket Ö."), "Sirket O.");
        assert_eq!(sanitize("Müdür çağrı"), "Mudur cagri");
        assert_eq!(sanitize("naïve façade"), "naive facade");
    }

    #[test]
    fn sanitize_replaces_unfoldable_characters() {
        assert_eq!(sanitize("目標 ok"), "?? ok");
        assert_eq!(sanitize("✓ done"), "? done");
    }

    #[test]
    fn detailed_report_survives_non_ascii_input() {
        let mut a = app("a1", "Şirket Ö.");
        a.notes = Some("Görüşme 14:00'te".into());

        let text = render(&[a], &[], ReportFormat::Detailed, at(2, 10));
        assert!(text.contains("Sirket O. - Engineer"));
        assert!(text.contains("Gorusme 14:00'te"));
        assert!(text.is_ascii());
    }

    #[test]
    fn detailed_report_lists_history_newest_first() {
        let a = app("a1", "Acme");
        let history = vec![
            entry("a1", "older", 2),
            entry("a1", "newest", 5),
            entry("other", "foreign", 9),
        ];

        let text = render(&[a], &history, ReportFormat::Detailed, at(6, 10));
        let newest = text.find("newest").unwrap();
        let older = text.find("older").unwrap();
        assert!(newest < older);
        assert!(!text.contains("foreign"));
    }

    #[test]
    fn compact_report_truncates_long_notes() {
        let mut a = app("a1", "Acme");
        a.notes = Some("x".repeat(80));

        let text = render(&[a], &[], ReportFormat::Compact, at(2, 10));
        assert!(text.contains(&format!("{}...", "x".repeat(27))));
        assert!(!text.contains(&"x".repeat(31)));
    }

    #[test]
    fn report_is_paginated() {
        let apps: Vec<Application> = (0..60)
            .map(|i| app(&format!("a{i}"), &format!("Company {i}")))
            .collect();

        let text = render(&apps, &[], ReportFormat::Compact, at(2, 10));
        assert!(text.contains("Page 1 of 2"));
        assert!(text.contains("Page 2 of 2"));
        assert!(text.contains('\x0c'));
    }

    #[test]
    fn empty_store_still_renders_a_page() {
        let text = render(&[], &[], ReportFormat::Detailed, at(2, 10));
        assert!(text.contains("No applications recorded."));
        assert!(text.contains("Page 1 of 1"));
    }
}
