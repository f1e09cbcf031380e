use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::sessions::dto::SessionView;
use crate::sessions::repo_types::StudySession;

/// Field name -> messages, in the shape returned to clients.
pub type FieldErrors = BTreeMap<&'static str, Vec<String>>;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("invalid input")]
    Validation(FieldErrors),
    #[error("no open session")]
    NoOpenSession,
    #[error("a session is already open")]
    Conflict(Box<StudySession>),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl TrackerError {
    pub fn field(name: &'static str, message: impl Into<String>) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(name, vec![message.into()]);
        TrackerError::Validation(fields)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<FieldErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    open_session: Option<SessionView>,
}

impl IntoResponse for TrackerError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, fields, open_session) = match self {
            TrackerError::Validation(fields) => (StatusCode::BAD_REQUEST, Some(fields), None),
            TrackerError::NoOpenSession => (StatusCode::NOT_FOUND, None, None),
            TrackerError::Conflict(session) => {
                (StatusCode::CONFLICT, None, Some(SessionView::from(&*session)))
            }
            TrackerError::Store(e) => {
                error!(error = %e, "store failure");
                (StatusCode::INTERNAL_SERVER_ERROR, None, None)
            }
        };
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message,
            fields,
            open_session,
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(
            TrackerError::field("category_id", "required").into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            TrackerError::NoOpenSession.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            TrackerError::Store(anyhow::anyhow!("boom")).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn field_helper_builds_single_entry() {
        let TrackerError::Validation(fields) = TrackerError::field("target_minutes", "negative")
        else {
            panic!("expected validation error");
        };
        assert_eq!(fields.get("target_minutes").unwrap(), &vec!["negative".to_string()]);
    }
}
