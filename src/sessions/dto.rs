use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::categories::repo_types::Category;
use crate::sessions::repo_types::{SessionState, StudySession};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionView {
    pub id: Uuid,
    pub category_id: i64,
    pub category: String,
    pub state: SessionState,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub end_time: Option<OffsetDateTime>,
    pub duration_in_minutes: Option<f64>,
}

impl From<&StudySession> for SessionView {
    fn from(s: &StudySession) -> Self {
        Self {
            id: s.id,
            category_id: s.category_id,
            category: s.category_name.clone(),
            state: s.state(),
            start_time: s.start_time,
            end_time: s.end_time,
            duration_in_minutes: s.duration_in_minutes(),
        }
    }
}

/// Body of `POST /`.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TrackerAction {
    Start {
        #[serde(default)]
        category_id: Option<i64>,
    },
    Stop,
}

/// Landing payload for anonymous visitors.
#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub authenticated: bool,
    pub message: &'static str,
    pub signup_url: &'static str,
    pub login_url: &'static str,
}

/// Tracker status for an authenticated user.
#[derive(Debug, Serialize)]
pub struct TrackerStatus {
    pub authenticated: bool,
    pub studying: bool,
    pub current_session: Option<SessionView>,
    pub categories: Vec<Category>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum IndexResponse {
    Welcome(WelcomeResponse),
    Tracker(TrackerStatus),
}

/// Reply to a start or stop action.
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub studying: bool,
    pub current_session: Option<SessionView>,
    /// The session closed by a stop; `None` when there was nothing to stop.
    pub stopped: Option<SessionView>,
}
