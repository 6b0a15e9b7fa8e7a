//! HTTP API powering the dashboard.
//!
//! Domain errors are translated into transport responses here; the core
//! crate stays free of HTTP concerns. Every error aborts only the request
//! that raised it.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use jobtrack_core::dashboard::{self, Filter, Summary};
use jobtrack_core::models::{
    Application, CreateApplicationInput, HistoryEntry, Status, UpdateApplicationInput,
};
use jobtrack_core::report::{self, ReportFormat};
use jobtrack_core::{Tracker, TrackerError};

pub fn create_router(tracker: Tracker) -> Router {
    Router::new()
        .route(
            "/api/applications",
            get(list_applications).post(create_application),
        )
        .route(
            "/api/applications/{id}",
            get(get_application)
                .put(update_application)
                .delete(delete_application),
        )
        .route("/api/applications/{id}/history", get(list_history))
        .route("/api/history/{history_id}", delete(delete_history_entry))
        .route("/api/dashboard", get(dashboard_summary))
        .route("/api/report", get(download_report))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(tracker)
}

struct ApiError(TrackerError);

impl From<TrackerError> for ApiError {
    fn from(err: TrackerError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            TrackerError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            TrackerError::NotFound(_) => StatusCode::NOT_FOUND,
            TrackerError::Connection(_) => StatusCode::BAD_GATEWAY,
            TrackerError::MalformedRow { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("request failed: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    /// Comma-separated status names.
    status: Option<String>,
    company: Option<String>,
}

fn parse_filter(query: &ListQuery) -> Result<Filter, ApiError> {
    let mut statuses = Vec::new();
    if let Some(raw) = &query.status {
        for name in raw.split(',').filter(|s| !s.trim().is_empty()) {
            let status = Status::from_str(name.trim()).ok_or_else(|| {
                ApiError(TrackerError::Validation(format!("unknown status '{name}'")))
            })?;
            statuses.push(status);
        }
    }
    Ok(Filter {
        statuses,
        company: query.company.clone(),
    })
}

async fn list_applications(
    State(tracker): State<Tracker>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Application>>, ApiError> {
    let filter = parse_filter(&query)?;
    let apps = tracker.list_applications()?;
    Ok(Json(filter.apply(&apps).into_iter().cloned().collect()))
}

async fn create_application(
    State(tracker): State<Tracker>,
    Json(input): Json<CreateApplicationInput>,
) -> Result<(StatusCode, Json<Application>), ApiError> {
    let app = tracker.add_application(input)?;
    Ok((StatusCode::CREATED, Json(app)))
}

async fn get_application(
    State(tracker): State<Tracker>,
    Path(id): Path<String>,
) -> Result<Json<Application>, ApiError> {
    Ok(Json(tracker.get_application(&id)?))
}

async fn update_application(
    State(tracker): State<Tracker>,
    Path(id): Path<String>,
    Json(input): Json<UpdateApplicationInput>,
) -> Result<Json<Application>, ApiError> {
    Ok(Json(tracker.update_application(&id, input)?))
}

async fn delete_application(
    State(tracker): State<Tracker>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    tracker.delete_application(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_history(
    State(tracker): State<Tracker>,
    Path(id): Path<String>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    Ok(Json(tracker.list_history_for(&id)?))
}

async fn delete_history_entry(
    State(tracker): State<Tracker>,
    Path(history_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    tracker.delete_history_entry(&history_id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
struct DashboardResponse {
    summary: Summary,
    /// Applications sitting in `Applied` past the staleness window.
    stale: Vec<String>,
}

async fn dashboard_summary(
    State(tracker): State<Tracker>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let apps = tracker.list_applications()?;
    Ok(Json(DashboardResponse {
        summary: dashboard::summarize(&apps),
        stale: dashboard::stale_ids(&apps, Utc::now()),
    }))
}

#[derive(Debug, Deserialize)]
struct ReportQuery {
    format: Option<String>,
}

async fn download_report(
    State(tracker): State<Tracker>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ApiError> {
    let format = match query.format.as_deref() {
        None => ReportFormat::Detailed,
        Some(name) => ReportFormat::from_str(name).ok_or_else(|| {
            ApiError(TrackerError::Validation(format!(
                "unknown report format '{name}'"
            )))
        })?,
    };

    let apps = tracker.list_applications()?;
    let history = tracker.list_history()?;
    let text = report::render(&apps, &history, format, Utc::now());

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        text,
    )
        .into_response())
}
