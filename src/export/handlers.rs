use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    auth::extractors::AuthUser,
    error::TrackerError,
    export::csv_export::{goals_csv, sessions_csv},
    progress::services::snapshot,
    state::AppState,
};

pub fn export_routes() -> Router<AppState> {
    Router::new()
        .route("/export_data/", get(export_data))
        .route("/export_study_logs_csv/", get(export_study_logs_csv))
        .route("/export_study_goals_csv/", get(export_study_goals_csv))
}

#[derive(Debug, Serialize)]
pub struct ExportLinks {
    pub study_logs_csv: &'static str,
    pub study_goals_csv: &'static str,
}

fn csv_attachment(filename: &str, body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}

#[instrument(skip_all)]
pub async fn export_data(_user: AuthUser) -> Json<ExportLinks> {
    Json(ExportLinks {
        study_logs_csv: "/export_study_logs_csv/",
        study_goals_csv: "/export_study_goals_csv/",
    })
}

#[instrument(skip(state, user))]
pub async fn export_study_logs_csv(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Response, TrackerError> {
    let owner = user.owner();
    let sessions = state.tracker.list_closed_sessions(owner).await?;
    let body = sessions_csv(&sessions)?;
    info!(%owner, rows = sessions.len(), "study logs exported");
    Ok(csv_attachment("study_logs.csv", body))
}

#[instrument(skip(state, user))]
pub async fn export_study_goals_csv(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Response, TrackerError> {
    let owner = user.owner();
    let progress = snapshot(state.tracker.as_ref(), owner).await?;
    let body = goals_csv(&progress.goals)?;
    info!(%owner, rows = progress.goals.len(), "study goals exported");
    Ok(csv_attachment("study_goals.csv", body))
}
