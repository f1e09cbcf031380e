use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::categories::repo_types::Category;
use crate::goals::repo_types::Goal;
use crate::sessions::repo_types::StudySession;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgTrackerStore;

/// Identity every tracker query is scoped to.
///
/// Only obtainable from an authenticated request (see `AuthUser::owner`),
/// so a store call cannot be made without naming whose rows it touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Owner(Uuid);

impl Owner {
    pub(crate) fn new(user_id: Uuid) -> Self {
        Self(user_id)
    }

    pub fn id(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Result of trying to open a session.
#[derive(Debug, Clone, PartialEq)]
pub enum OpenOutcome {
    Opened(StudySession),
    /// The owner already had an open session; nothing was written.
    AlreadyOpen(StudySession),
}

#[async_trait]
pub trait TrackerStore: Send + Sync {
    async fn list_categories(&self) -> anyhow::Result<Vec<Category>>;
    async fn find_category(&self, id: i64) -> anyhow::Result<Option<Category>>;
    /// Insert the category if no category has this name yet.
    async fn ensure_category(&self, name: &str) -> anyhow::Result<Category>;

    /// Atomically check for an open session and insert a new one if none exists.
    async fn open_session(
        &self,
        owner: Owner,
        category_id: i64,
        at: OffsetDateTime,
    ) -> anyhow::Result<OpenOutcome>;
    /// Close the owner's open session, if any.
    async fn close_open_session(
        &self,
        owner: Owner,
        at: OffsetDateTime,
    ) -> anyhow::Result<Option<StudySession>>;
    async fn find_open_session(&self, owner: Owner) -> anyhow::Result<Option<StudySession>>;
    /// Closed sessions, newest start first.
    async fn list_closed_sessions(&self, owner: Owner) -> anyhow::Result<Vec<StudySession>>;

    async fn upsert_goal(
        &self,
        owner: Owner,
        category_id: i64,
        target_minutes: f64,
    ) -> anyhow::Result<Goal>;
    /// Goals in creation order.
    async fn list_goals(&self, owner: Owner) -> anyhow::Result<Vec<Goal>>;
}
