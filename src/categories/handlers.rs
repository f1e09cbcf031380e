use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::{
    auth::extractors::AuthUser, categories::repo_types::Category, error::TrackerError,
    state::AppState,
};

pub fn category_routes() -> Router<AppState> {
    Router::new().route("/categories/", get(list_categories))
}

#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<Vec<Category>>, TrackerError> {
    let categories = state.tracker.list_categories().await?;
    Ok(Json(categories))
}
