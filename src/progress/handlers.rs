use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::instrument;

use crate::{
    auth::extractors::AuthUser,
    error::TrackerError,
    export::chart::{png_data_url, render_goal_chart},
    progress::services::{snapshot, CategorySummary, GoalProgress},
    state::AppState,
};

pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/", get(dashboard))
        .route("/dashboard/chart.png", get(dashboard_chart))
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub category_summary: Vec<CategorySummary>,
    pub goal_summary: Vec<GoalProgress>,
    /// PNG bar chart as a `data:` URL.
    pub graph: String,
}

#[instrument(skip(state, user))]
pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<DashboardResponse>, TrackerError> {
    let progress = snapshot(state.tracker.as_ref(), user.owner()).await?;
    let png = render_goal_chart(&progress.goals, &state.config.chart)?;
    Ok(Json(DashboardResponse {
        category_summary: progress.categories,
        goal_summary: progress.goals,
        graph: png_data_url(&png),
    }))
}

#[instrument(skip(state, user))]
pub async fn dashboard_chart(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Response, TrackerError> {
    let progress = snapshot(state.tracker.as_ref(), user.owner()).await?;
    let png = render_goal_chart(&progress.goals, &state.config.chart)?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}
