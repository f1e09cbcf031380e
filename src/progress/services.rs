//! Read-only projection of closed sessions and goals into progress figures.
//!
//! Recomputed on every call. The dashboard and the goal CSV both go through
//! [`snapshot`], so they always agree on achieved minutes.

use std::collections::HashMap;

use serde::Serialize;

use crate::categories::repo_types::Category;
use crate::error::TrackerError;
use crate::goals::repo_types::Goal;
use crate::sessions::dto::SessionView;
use crate::sessions::repo_types::{round_minutes, StudySession};
use crate::store::{Owner, TrackerStore};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category_id: i64,
    pub category: String,
    pub total_minutes: f64,
    pub sessions: Vec<SessionView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    pub category_id: i64,
    pub category: String,
    pub target_minutes: f64,
    pub achieved_minutes: f64,
    pub remaining_minutes: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    pub categories: Vec<CategorySummary>,
    pub goals: Vec<GoalProgress>,
    /// Closed sessions, newest start first.
    pub sessions: Vec<StudySession>,
}

pub fn remaining_minutes(target: f64, achieved: f64) -> f64 {
    (target - achieved).max(0.0)
}

/// Totals per category over closed sessions only. Every category gets an
/// entry; the total is rounded once, after summation.
pub fn category_summary(categories: &[Category], sessions: &[StudySession]) -> Vec<CategorySummary> {
    let mut by_category: HashMap<i64, (f64, Vec<SessionView>)> = HashMap::new();
    for session in sessions {
        let Some(minutes) = session.elapsed_minutes() else {
            continue;
        };
        let entry = by_category.entry(session.category_id).or_default();
        entry.0 += minutes;
        entry.1.push(SessionView::from(session));
    }

    categories
        .iter()
        .map(|c| {
            let (total, views) = by_category.remove(&c.id).unwrap_or_default();
            CategorySummary {
                category_id: c.id,
                category: c.name.clone(),
                total_minutes: round_minutes(total),
                sessions: views,
            }
        })
        .collect()
}

pub fn goal_summary(goals: &[Goal], categories: &[CategorySummary]) -> Vec<GoalProgress> {
    goals
        .iter()
        .map(|g| {
            let achieved = categories
                .iter()
                .find(|c| c.category_id == g.category_id)
                .map(|c| c.total_minutes)
                .unwrap_or(0.0);
            GoalProgress {
                category_id: g.category_id,
                category: g.category_name.clone(),
                target_minutes: g.target_minutes,
                achieved_minutes: achieved,
                remaining_minutes: remaining_minutes(g.target_minutes, achieved),
            }
        })
        .collect()
}

/// Load everything the owner's progress views need and project it.
pub async fn snapshot(store: &dyn TrackerStore, owner: Owner) -> Result<ProgressSnapshot, TrackerError> {
    let categories = store.list_categories().await?;
    let sessions = store.list_closed_sessions(owner).await?;
    let goals = store.list_goals(owner).await?;

    let categories = category_summary(&categories, &sessions);
    let goals = goal_summary(&goals, &categories);
    Ok(ProgressSnapshot {
        categories,
        goals,
        sessions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goals::dto::GoalRequest;
    use crate::goals::services::set_goal;
    use crate::sessions::services::{start, stop, StartForm};
    use crate::store::memory::MemoryStore;
    use time::macros::datetime;
    use time::{Duration, OffsetDateTime};
    use uuid::Uuid;

    const T0: OffsetDateTime = datetime!(2024-05-01 09:00 UTC);

    fn goal_req(category_id: i64, target: f64) -> GoalRequest {
        GoalRequest {
            category_id: Some(category_id),
            target_minutes: Some(target),
        }
    }

    #[test]
    fn remaining_is_clamped_at_zero() {
        assert_eq!(remaining_minutes(60.0, 90.0), 0.0);
        assert_eq!(remaining_minutes(60.0, 60.0), 0.0);
        assert_eq!(remaining_minutes(60.0, 15.5), 44.5);
        assert_eq!(remaining_minutes(0.0, 0.0), 0.0);
    }

    #[test]
    fn total_is_rounded_after_summation() {
        let owner = Uuid::new_v4();
        let reading = Category {
            id: 1,
            name: "Reading".into(),
        };
        // three sessions of 20 seconds each: 0.333.. minutes apiece
        let sessions: Vec<StudySession> = (0..3)
            .map(|i| {
                let start = T0 + Duration::hours(i);
                StudySession {
                    id: Uuid::new_v4(),
                    user_id: owner,
                    category_id: 1,
                    category_name: "Reading".into(),
                    start_time: start,
                    end_time: Some(start + Duration::seconds(20)),
                }
            })
            .collect();

        let summary = category_summary(&[reading], &sessions);
        // per-session rounding would give 0.99
        assert_eq!(summary[0].total_minutes, 1.0);
        assert_eq!(summary[0].sessions.len(), 3);
    }

    #[test]
    fn open_sessions_do_not_count() {
        let reading = Category {
            id: 1,
            name: "Reading".into(),
        };
        let open = StudySession {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            category_id: 1,
            category_name: "Reading".into(),
            start_time: T0,
            end_time: None,
        };
        let summary = category_summary(&[reading], &[open]);
        assert_eq!(summary[0].total_minutes, 0.0);
        assert!(summary[0].sessions.is_empty());
    }

    #[tokio::test]
    async fn reading_ninety_minutes_against_sixty_minute_goal() {
        let store = MemoryStore::new();
        let reading = store.ensure_category("Reading").await.unwrap();
        let math = store.ensure_category("Math").await.unwrap();
        let owner = Owner::new(Uuid::new_v4());

        let form = StartForm {
            category_id: Some(reading.id),
        };
        start(&store, owner, &form, T0).await.unwrap();
        stop(&store, owner, T0 + Duration::minutes(90)).await.unwrap();
        set_goal(&store, owner, &goal_req(reading.id, 60.0)).await.unwrap();
        set_goal(&store, owner, &goal_req(math.id, 30.0)).await.unwrap();

        let snap = snapshot(&store, owner).await.unwrap();

        assert_eq!(snap.categories.len(), 2);
        let reading_total = snap
            .categories
            .iter()
            .find(|c| c.category == "Reading")
            .unwrap();
        assert_eq!(reading_total.total_minutes, 90.0);
        let math_total = snap.categories.iter().find(|c| c.category == "Math").unwrap();
        assert_eq!(math_total.total_minutes, 0.0);

        assert_eq!(
            snap.goals,
            vec![
                GoalProgress {
                    category_id: reading.id,
                    category: "Reading".into(),
                    target_minutes: 60.0,
                    achieved_minutes: 90.0,
                    remaining_minutes: 0.0,
                },
                GoalProgress {
                    category_id: math.id,
                    category: "Math".into(),
                    target_minutes: 30.0,
                    achieved_minutes: 0.0,
                    remaining_minutes: 30.0,
                },
            ]
        );
    }

    #[tokio::test]
    async fn snapshot_ignores_other_owners() {
        let store = MemoryStore::new();
        let reading = store.ensure_category("Reading").await.unwrap();
        let alice = Owner::new(Uuid::new_v4());
        let bob = Owner::new(Uuid::new_v4());

        store
            .insert_closed(bob, reading.id, T0, T0 + Duration::minutes(45))
            .unwrap();
        set_goal(&store, bob, &goal_req(reading.id, 60.0)).await.unwrap();

        let snap = snapshot(&store, alice).await.unwrap();
        assert!(snap.goals.is_empty());
        assert!(snap.sessions.is_empty());
        assert_eq!(snap.categories[0].total_minutes, 0.0);
    }

    #[tokio::test]
    async fn deleting_a_category_drops_its_rows() {
        let store = MemoryStore::new();
        let reading = store.ensure_category("Reading").await.unwrap();
        let owner = Owner::new(Uuid::new_v4());
        store
            .insert_closed(owner, reading.id, T0, T0 + Duration::minutes(30))
            .unwrap();
        set_goal(&store, owner, &goal_req(reading.id, 60.0)).await.unwrap();

        store.delete_category(reading.id).unwrap();

        let snap = snapshot(&store, owner).await.unwrap();
        assert!(snap.categories.is_empty());
        assert!(snap.goals.is_empty());
        assert!(snap.sessions.is_empty());
    }
}
