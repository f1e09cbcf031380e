use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use time::OffsetDateTime;
use tracing::{debug, instrument};

use crate::{
    auth::extractors::{AuthUser, MaybeAuthUser},
    error::TrackerError,
    sessions::{
        dto::{
            ActionResponse, IndexResponse, SessionView, TrackerAction, TrackerStatus,
            WelcomeResponse,
        },
        services::{self, StartForm},
    },
    state::AppState,
};

pub fn tracker_routes() -> Router<AppState> {
    Router::new().route("/", get(index).post(track))
}

fn welcome() -> WelcomeResponse {
    WelcomeResponse {
        authenticated: false,
        message: "Track your study time by category and follow your goals.",
        signup_url: "/signup/",
        login_url: "/login/",
    }
}

/// GET / : landing payload for visitors, tracker status for users.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    user: MaybeAuthUser,
) -> Result<Json<IndexResponse>, TrackerError> {
    let Some(owner) = user.owner() else {
        return Ok(Json(IndexResponse::Welcome(welcome())));
    };

    let current = services::current(state.tracker.as_ref(), owner).await?;
    let categories = state.tracker.list_categories().await?;
    Ok(Json(IndexResponse::Tracker(TrackerStatus {
        authenticated: true,
        studying: current.is_some(),
        current_session: current.as_ref().map(SessionView::from),
        categories,
    })))
}

/// POST / : start or stop the timer.
#[instrument(skip(state, user))]
pub async fn track(
    State(state): State<AppState>,
    user: AuthUser,
    Json(action): Json<TrackerAction>,
) -> Result<(StatusCode, Json<ActionResponse>), TrackerError> {
    let owner = user.owner();
    let now = OffsetDateTime::now_utc();

    match action {
        TrackerAction::Start { category_id } => {
            let form = StartForm { category_id };
            let session = services::start(state.tracker.as_ref(), owner, &form, now).await?;
            Ok((
                StatusCode::CREATED,
                Json(ActionResponse {
                    studying: true,
                    current_session: Some(SessionView::from(&session)),
                    stopped: None,
                }),
            ))
        }
        TrackerAction::Stop => {
            let stopped = match services::stop(state.tracker.as_ref(), owner, now).await {
                Ok(session) => Some(SessionView::from(&session)),
                Err(TrackerError::NoOpenSession) => {
                    debug!(%owner, "stop with nothing to stop");
                    None
                }
                Err(e) => return Err(e),
            };
            Ok((
                StatusCode::OK,
                Json(ActionResponse {
                    studying: false,
                    current_session: None,
                    stopped,
                }),
            ))
        }
    }
}
