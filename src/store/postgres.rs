use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::warn;
use uuid::Uuid;

use super::{OpenOutcome, Owner, TrackerStore};
use crate::categories::repo_types::Category;
use crate::goals::repo_types::Goal;
use crate::sessions::repo_types::StudySession;

/// A concurrent stop can close the conflicting row between our insert and
/// the follow-up read; the insert is retried this many times.
const OPEN_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct PgTrackerStore {
    db: PgPool,
}

impl PgTrackerStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TrackerStore for PgTrackerStore {
    async fn list_categories(&self) -> anyhow::Result<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name
              FROM categories
             ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list categories")?;
        Ok(rows)
    }

    async fn find_category(&self, id: i64) -> anyhow::Result<Option<Category>> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name
              FROM categories
             WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find category")?;
        Ok(row)
    }

    async fn ensure_category(&self, name: &str) -> anyhow::Result<Category> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name)
            VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name
            "#,
        )
        .bind(name)
        .fetch_one(&self.db)
        .await
        .with_context(|| format!("ensure category {}", name))?;
        Ok(row)
    }

    async fn open_session(
        &self,
        owner: Owner,
        category_id: i64,
        at: OffsetDateTime,
    ) -> anyhow::Result<OpenOutcome> {
        for attempt in 1..=OPEN_ATTEMPTS {
            // The partial unique index on (user_id) WHERE end_time IS NULL
            // makes the existence check and the insert a single step.
            let inserted = sqlx::query_as::<_, StudySession>(
                r#"
                WITH inserted AS (
                    INSERT INTO study_sessions (id, user_id, category_id, start_time)
                    VALUES ($1, $2, $3, $4)
                    ON CONFLICT (user_id) WHERE end_time IS NULL DO NOTHING
                    RETURNING id, user_id, category_id, start_time, end_time
                )
                SELECT i.id, i.user_id, i.category_id, c.name AS category_name,
                       i.start_time, i.end_time
                  FROM inserted i
                  JOIN categories c ON c.id = i.category_id
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(owner.id())
            .bind(category_id)
            .bind(at)
            .fetch_optional(&self.db)
            .await
            .context("insert open session")?;

            if let Some(session) = inserted {
                return Ok(OpenOutcome::Opened(session));
            }
            if let Some(existing) = self.find_open_session(owner).await? {
                return Ok(OpenOutcome::AlreadyOpen(existing));
            }
            warn!(%owner, attempt, "open session vanished during start; retrying");
        }
        anyhow::bail!("could not open a session for {} after {} attempts", owner, OPEN_ATTEMPTS)
    }

    async fn close_open_session(
        &self,
        owner: Owner,
        at: OffsetDateTime,
    ) -> anyhow::Result<Option<StudySession>> {
        let row = sqlx::query_as::<_, StudySession>(
            r#"
            WITH closed AS (
                UPDATE study_sessions
                   SET end_time = GREATEST($2, start_time)
                 WHERE user_id = $1 AND end_time IS NULL
             RETURNING id, user_id, category_id, start_time, end_time
            )
            SELECT s.id, s.user_id, s.category_id, c.name AS category_name,
                   s.start_time, s.end_time
              FROM closed s
              JOIN categories c ON c.id = s.category_id
            "#,
        )
        .bind(owner.id())
        .bind(at)
        .fetch_optional(&self.db)
        .await
        .context("close open session")?;
        Ok(row)
    }

    async fn find_open_session(&self, owner: Owner) -> anyhow::Result<Option<StudySession>> {
        let row = sqlx::query_as::<_, StudySession>(
            r#"
            SELECT s.id, s.user_id, s.category_id, c.name AS category_name,
                   s.start_time, s.end_time
              FROM study_sessions s
              JOIN categories c ON c.id = s.category_id
             WHERE s.user_id = $1 AND s.end_time IS NULL
            "#,
        )
        .bind(owner.id())
        .fetch_optional(&self.db)
        .await
        .context("find open session")?;
        Ok(row)
    }

    async fn list_closed_sessions(&self, owner: Owner) -> anyhow::Result<Vec<StudySession>> {
        let rows = sqlx::query_as::<_, StudySession>(
            r#"
            SELECT s.id, s.user_id, s.category_id, c.name AS category_name,
                   s.start_time, s.end_time
              FROM study_sessions s
              JOIN categories c ON c.id = s.category_id
             WHERE s.user_id = $1 AND s.end_time IS NOT NULL
             ORDER BY s.start_time DESC
            "#,
        )
        .bind(owner.id())
        .fetch_all(&self.db)
        .await
        .context("list closed sessions")?;
        Ok(rows)
    }

    async fn upsert_goal(
        &self,
        owner: Owner,
        category_id: i64,
        target_minutes: f64,
    ) -> anyhow::Result<Goal> {
        let row = sqlx::query_as::<_, Goal>(
            r#"
            WITH upserted AS (
                INSERT INTO study_goals (id, user_id, category_id, target_minutes)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (user_id, category_id)
                DO UPDATE SET target_minutes = EXCLUDED.target_minutes
                RETURNING id, user_id, category_id, target_minutes
            )
            SELECT g.id, g.user_id, g.category_id, c.name AS category_name, g.target_minutes
              FROM upserted g
              JOIN categories c ON c.id = g.category_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner.id())
        .bind(category_id)
        .bind(target_minutes)
        .fetch_one(&self.db)
        .await
        .context("upsert goal")?;
        Ok(row)
    }

    async fn list_goals(&self, owner: Owner) -> anyhow::Result<Vec<Goal>> {
        let rows = sqlx::query_as::<_, Goal>(
            r#"
            SELECT g.id, g.user_id, g.category_id, c.name AS category_name, g.target_minutes
              FROM study_goals g
              JOIN categories c ON c.id = g.category_id
             WHERE g.user_id = $1
             ORDER BY g.created_at ASC, g.id ASC
            "#,
        )
        .bind(owner.id())
        .fetch_all(&self.db)
        .await
        .context("list goals")?;
        Ok(rows)
    }
}
