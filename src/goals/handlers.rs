use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::{
    auth::extractors::AuthUser,
    error::TrackerError,
    goals::{
        dto::{GoalRequest, GoalsResponse, SetGoalResponse},
        services,
    },
    state::AppState,
};

pub fn goal_routes() -> Router<AppState> {
    Router::new().route("/goals/", get(list_goals).post(set_goal))
}

#[instrument(skip(state, user))]
pub async fn list_goals(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<GoalsResponse>, TrackerError> {
    let goals = services::list_goals(state.tracker.as_ref(), user.owner()).await?;
    let categories = state.tracker.list_categories().await?;
    Ok(Json(GoalsResponse { goals, categories }))
}

#[instrument(skip(state, user))]
pub async fn set_goal(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<GoalRequest>,
) -> Result<Json<SetGoalResponse>, TrackerError> {
    let owner = user.owner();
    let goal = services::set_goal(state.tracker.as_ref(), owner, &payload).await?;
    let goals = services::list_goals(state.tracker.as_ref(), owner).await?;
    Ok(Json(SetGoalResponse { goal, goals }))
}
