//! In-process `TrackerStore` used by unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{OpenOutcome, Owner, TrackerStore};
use crate::categories::repo_types::Category;
use crate::goals::repo_types::Goal;
use crate::sessions::repo_types::StudySession;

#[derive(Default)]
struct Inner {
    categories: Vec<Category>,
    sessions: Vec<StudySession>,
    goals: Vec<Goal>,
}

impl Inner {
    fn category(&self, id: i64) -> anyhow::Result<&Category> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| anyhow::anyhow!("category {} does not exist", id))
    }
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> anyhow::Result<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store poisoned"))
    }

    /// Every session row regardless of owner or state.
    pub fn all_sessions(&self) -> Vec<StudySession> {
        self.lock().map(|g| g.sessions.clone()).unwrap_or_default()
    }

    /// Every goal row regardless of owner.
    pub fn all_goals(&self) -> Vec<Goal> {
        self.lock().map(|g| g.goals.clone()).unwrap_or_default()
    }

    /// Insert an already closed session, bypassing the tracker.
    pub fn insert_closed(
        &self,
        owner: Owner,
        category_id: i64,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> anyhow::Result<StudySession> {
        let mut inner = self.lock()?;
        let category_name = inner.category(category_id)?.name.clone();
        let session = StudySession {
            id: Uuid::new_v4(),
            user_id: owner.id(),
            category_id,
            category_name,
            start_time: start,
            end_time: Some(end),
        };
        inner.sessions.push(session.clone());
        Ok(session)
    }

    /// Drop a category together with its sessions and goals.
    pub fn delete_category(&self, id: i64) -> anyhow::Result<()> {
        let mut inner = self.lock()?;
        inner.categories.retain(|c| c.id != id);
        inner.sessions.retain(|s| s.category_id != id);
        inner.goals.retain(|g| g.category_id != id);
        Ok(())
    }
}

#[async_trait]
impl TrackerStore for MemoryStore {
    async fn list_categories(&self) -> anyhow::Result<Vec<Category>> {
        Ok(self.lock()?.categories.clone())
    }

    async fn find_category(&self, id: i64) -> anyhow::Result<Option<Category>> {
        Ok(self.lock()?.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn ensure_category(&self, name: &str) -> anyhow::Result<Category> {
        let mut inner = self.lock()?;
        if let Some(existing) = inner.categories.iter().find(|c| c.name == name) {
            return Ok(existing.clone());
        }
        let id = inner.categories.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let category = Category {
            id,
            name: name.to_string(),
        };
        inner.categories.push(category.clone());
        Ok(category)
    }

    async fn open_session(
        &self,
        owner: Owner,
        category_id: i64,
        at: OffsetDateTime,
    ) -> anyhow::Result<OpenOutcome> {
        let mut inner = self.lock()?;
        if let Some(open) = inner
            .sessions
            .iter()
            .find(|s| s.user_id == owner.id() && s.end_time.is_none())
        {
            return Ok(OpenOutcome::AlreadyOpen(open.clone()));
        }
        let category_name = inner.category(category_id)?.name.clone();
        let session = StudySession {
            id: Uuid::new_v4(),
            user_id: owner.id(),
            category_id,
            category_name,
            start_time: at,
            end_time: None,
        };
        inner.sessions.push(session.clone());
        Ok(OpenOutcome::Opened(session))
    }

    async fn close_open_session(
        &self,
        owner: Owner,
        at: OffsetDateTime,
    ) -> anyhow::Result<Option<StudySession>> {
        let mut inner = self.lock()?;
        let open = inner
            .sessions
            .iter_mut()
            .find(|s| s.user_id == owner.id() && s.end_time.is_none());
        Ok(open.map(|s| {
            s.end_time = Some(at.max(s.start_time));
            s.clone()
        }))
    }

    async fn find_open_session(&self, owner: Owner) -> anyhow::Result<Option<StudySession>> {
        Ok(self
            .lock()?
            .sessions
            .iter()
            .find(|s| s.user_id == owner.id() && s.end_time.is_none())
            .cloned())
    }

    async fn list_closed_sessions(&self, owner: Owner) -> anyhow::Result<Vec<StudySession>> {
        let mut rows: Vec<StudySession> = self
            .lock()?
            .sessions
            .iter()
            .filter(|s| s.user_id == owner.id() && s.end_time.is_some())
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(rows)
    }

    async fn upsert_goal(
        &self,
        owner: Owner,
        category_id: i64,
        target_minutes: f64,
    ) -> anyhow::Result<Goal> {
        let mut inner = self.lock()?;
        let category_name = inner.category(category_id)?.name.clone();
        if let Some(goal) = inner
            .goals
            .iter_mut()
            .find(|g| g.user_id == owner.id() && g.category_id == category_id)
        {
            goal.target_minutes = target_minutes;
            return Ok(goal.clone());
        }
        let goal = Goal {
            id: Uuid::new_v4(),
            user_id: owner.id(),
            category_id,
            category_name,
            target_minutes,
        };
        inner.goals.push(goal.clone());
        Ok(goal)
    }

    async fn list_goals(&self, owner: Owner) -> anyhow::Result<Vec<Goal>> {
        Ok(self
            .lock()?
            .goals
            .iter()
            .filter(|g| g.user_id == owner.id())
            .cloned()
            .collect())
    }
}
