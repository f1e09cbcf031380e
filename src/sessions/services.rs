use time::OffsetDateTime;
use tracing::{info, warn};

use crate::error::TrackerError;
use crate::sessions::repo_types::StudySession;
use crate::store::{OpenOutcome, Owner, TrackerStore};

/// Input of a start request, validated before any store access.
#[derive(Debug, Clone, Default)]
pub struct StartForm {
    pub category_id: Option<i64>,
}

impl StartForm {
    pub fn validate(&self) -> Result<i64, TrackerError> {
        match self.category_id {
            Some(id) if id > 0 => Ok(id),
            Some(_) => Err(TrackerError::field("category_id", "Select a valid choice.")),
            None => Err(TrackerError::field("category_id", "This field is required.")),
        }
    }
}

/// Open a session for `owner`. Rejected with `Conflict` while another one is open.
pub async fn start(
    store: &dyn TrackerStore,
    owner: Owner,
    form: &StartForm,
    at: OffsetDateTime,
) -> Result<StudySession, TrackerError> {
    let category_id = form.validate()?;
    if store.find_category(category_id).await?.is_none() {
        warn!(%owner, category_id, "start with unknown category");
        return Err(TrackerError::field("category_id", "Select a valid choice."));
    }

    match store.open_session(owner, category_id, at).await? {
        OpenOutcome::Opened(session) => {
            info!(%owner, session_id = %session.id, category = %session.category_name, "session started");
            Ok(session)
        }
        OpenOutcome::AlreadyOpen(existing) => {
            warn!(%owner, session_id = %existing.id, "start rejected, session already open");
            Err(TrackerError::Conflict(Box::new(existing)))
        }
    }
}

/// Close the open session of `owner`. `NoOpenSession` when there is none.
pub async fn stop(
    store: &dyn TrackerStore,
    owner: Owner,
    at: OffsetDateTime,
) -> Result<StudySession, TrackerError> {
    match store.close_open_session(owner, at).await? {
        Some(session) => {
            info!(
                %owner,
                session_id = %session.id,
                minutes = session.duration_in_minutes().unwrap_or_default(),
                "session stopped"
            );
            Ok(session)
        }
        None => Err(TrackerError::NoOpenSession),
    }
}

pub async fn current(
    store: &dyn TrackerStore,
    owner: Owner,
) -> Result<Option<StudySession>, TrackerError> {
    Ok(store.find_open_session(owner).await?)
}
