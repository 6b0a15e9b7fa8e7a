//! UI rendering with Ratatui.
//!
//! Design: minimal black and white aesthetic, one status line at the
//! bottom. Everything is recomputed from the current snapshot on each draw.

use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, BarChart, Block, Borders, Chart, Dataset, GraphType, List, ListItem, Paragraph},
    Frame,
};

use jobtrack_core::dashboard::{self, Summary};
use jobtrack_core::models::Status;

use crate::app::{App, Mode, View};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Render the application UI.
pub fn render(frame: &mut Frame, app: &App) {
    // Main layout: content area + status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status bar (single line, no border)
        ])
        .split(frame.area());

    match app.view {
        View::List => render_list(frame, app, chunks[0]),
        View::Charts => render_charts(frame, app, chunks[0]),
    }
    render_status(frame, app, chunks[1]);
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let now = Utc::now();
    let items: Vec<ListItem> = app
        .visible()
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let style = if i == app.selected {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };

            let stale = if dashboard::is_stale(entry, now) {
                "  !14d"
            } else {
                ""
            };
            ListItem::new(format!(
                " {} {} - {} ({}){}",
                dashboard::status_glyph(entry.status),
                entry.company,
                entry.position,
                entry.status.label(),
                stale,
            ))
            .style(style)
        })
        .collect();

    let title = list_title(app);
    let list = List::new(items).block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(list, chunks[0]);

    render_detail(frame, app, chunks[1]);
}

fn list_title(app: &App) -> String {
    let mut title = String::from(" applications");
    if let Some(status) = app.status_filter {
        title.push_str(&format!(" [{}]", status.label()));
    }
    if !app.company_query.is_empty() {
        title.push_str(&format!(" /{}", app.company_query));
    }
    title.push(' ');
    title
}

fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    if let Some(selected) = app.selected_application() {
        lines.push(Line::from(format!("Status: {}", selected.status.label())));
        lines.push(Line::from(format!(
            "Last action: {}",
            selected.last_action_at.format(TIME_FORMAT)
        )));
        if let Some(link) = &selected.link {
            lines.push(Line::from(format!("Link: {link}")));
        }
        if let Some(notes) = &selected.notes {
            lines.push(Line::from("Notes:"));
            for note_line in notes.lines() {
                lines.push(Line::from(format!("  {note_line}")));
            }
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "History",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for (i, entry) in app.selected_history().iter().enumerate() {
            let style = if i == app.history_selected {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(
                format!(
                    " {}  {:<13}  {}",
                    entry.timestamp.format(TIME_FORMAT),
                    entry.action.label(),
                    entry.detail
                ),
                style,
            )));
        }
    } else {
        lines.push(Line::from("No applications match."));
    }

    let detail =
        Paragraph::new(lines).block(Block::default().title(" detail ").borders(Borders::ALL));
    frame.render_widget(detail, area);
}

fn render_charts(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    let summary = dashboard::summarize(&app.applications);

    render_status_chart(frame, &summary, chunks[0]);
    render_company_chart(frame, &summary, chunks[1]);
    render_timeline(frame, &summary, chunks[2]);
}

fn render_status_chart(frame: &mut Frame, summary: &Summary, area: Rect) {
    let data: Vec<(&str, u64)> = summary
        .by_status
        .iter()
        .map(|(status, count)| (short_status(*status), *count as u64))
        .collect();

    let chart = BarChart::default()
        .block(Block::default().title(" by status ").borders(Borders::ALL))
        .data(&data)
        .bar_width(5)
        .bar_gap(1);
    frame.render_widget(chart, area);
}

fn render_company_chart(frame: &mut Frame, summary: &Summary, area: Rect) {
    let top: Vec<(String, u64)> = summary
        .by_company
        .iter()
        .take(8)
        .map(|(name, count)| (name.clone(), *count as u64))
        .collect();
    let data: Vec<(&str, u64)> = top
        .iter()
        .map(|(name, count)| (name.as_str(), *count))
        .collect();

    let chart = BarChart::default()
        .block(Block::default().title(" by company ").borders(Borders::ALL))
        .data(&data)
        .bar_width(8)
        .bar_gap(1);
    frame.render_widget(chart, area);
}

fn render_timeline(frame: &mut Frame, summary: &Summary, area: Rect) {
    let first = summary.timeline.first().map(|p| p.at);
    let points: Vec<(f64, f64)> = summary
        .timeline
        .iter()
        .map(|point| {
            let days = first
                .map(|start| (point.at - start).num_hours() as f64 / 24.0)
                .unwrap_or(0.0);
            (days, status_index(point.status))
        })
        .collect();

    let max_x = points
        .iter()
        .map(|(x, _)| *x)
        .fold(1.0_f64, f64::max);

    let datasets = vec![Dataset::default()
        .name("applications")
        .marker(symbols::Marker::Dot)
        .graph_type(GraphType::Scatter)
        .data(&points)];

    let x_labels: Vec<String> = match (summary.timeline.first(), summary.timeline.last()) {
        (Some(first), Some(last)) => vec![
            first.at.format("%Y-%m-%d").to_string(),
            last.at.format("%Y-%m-%d").to_string(),
        ],
        _ => vec![String::new(), String::new()],
    };
    let y_labels: Vec<String> = Status::ALL
        .iter()
        .map(|s| short_status(*s).to_string())
        .collect();

    let chart = Chart::new(datasets)
        .block(Block::default().title(" timeline ").borders(Borders::ALL))
        .x_axis(Axis::default().bounds([0.0, max_x]).labels(x_labels))
        .y_axis(Axis::default().bounds([-0.5, 4.5]).labels(y_labels));
    frame.render_widget(chart, area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let status_text = match app.mode {
        Mode::EditFilter => Line::from(vec![
            Span::raw("company: "),
            Span::raw(app.company_query.as_str()),
            Span::styled("_", Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Mode::EditNote => Line::from(vec![
            Span::raw("note: "),
            Span::raw(app.note_input.as_str()),
            Span::styled("_", Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Mode::ConfirmDeleteApplication => {
            let company = app
                .selected_application()
                .map(|a| a.company.clone())
                .unwrap_or_default();
            confirm_line(format!("delete {company}?"))
        }
        Mode::ConfirmDeleteHistory => confirm_line("delete history entry?".to_string()),
        Mode::Browse => {
            if let Some(ref err) = app.last_error {
                Line::from(vec![
                    Span::raw("error: "),
                    Span::styled(err.as_str(), Style::default().add_modifier(Modifier::DIM)),
                ])
            } else {
                hint_line()
            }
        }
    };

    let status = Paragraph::new(status_text);
    frame.render_widget(status, area);
}

fn confirm_line(prompt: String) -> Line<'static> {
    Line::from(vec![
        Span::raw(prompt),
        Span::raw(" "),
        Span::styled("y", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("/"),
        Span::styled("n", Style::default().add_modifier(Modifier::BOLD)),
    ])
}

fn hint_line() -> Line<'static> {
    let key = |k: &'static str| Span::styled(k, Style::default().add_modifier(Modifier::BOLD));
    Line::from(vec![
        key("q"),
        Span::raw(" quit  "),
        key("tab"),
        Span::raw(" charts  "),
        key("j/k"),
        Span::raw(" select  "),
        key("[/]"),
        Span::raw(" history  "),
        key("s"),
        Span::raw(" filter  "),
        key("/"),
        Span::raw(" company  "),
        key("u"),
        Span::raw(" advance  "),
        key("n"),
        Span::raw(" note  "),
        key("d"),
        Span::raw(" delete  "),
        key("x"),
        Span::raw(" del entry  "),
        key("r"),
        Span::raw(" reload"),
    ])
}

fn short_status(status: Status) -> &'static str {
    match status {
        Status::Applied => "appl",
        Status::Interviewed => "intv",
        Status::InterviewPending => "pend",
        Status::OfferReceived => "offr",
        Status::Rejected => "rej",
    }
}

fn status_index(status: Status) -> f64 {
    Status::ALL
        .iter()
        .position(|&s| s == status)
        .unwrap_or_default() as f64
}
