use tracing::{info, warn};

use crate::error::{FieldErrors, TrackerError};
use crate::goals::dto::GoalRequest;
use crate::goals::repo_types::Goal;
use crate::store::{Owner, TrackerStore};

/// Goal input that passed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidGoal {
    pub category_id: i64,
    pub target_minutes: f64,
}

/// Check a goal request without touching the store.
pub fn validate(req: &GoalRequest) -> Result<ValidGoal, TrackerError> {
    let mut fields = FieldErrors::new();

    let category_id = match req.category_id {
        Some(id) if id > 0 => Some(id),
        Some(_) => {
            fields.insert("category_id", vec!["Select a valid choice.".into()]);
            None
        }
        None => {
            fields.insert("category_id", vec!["This field is required.".into()]);
            None
        }
    };

    let target_minutes = match req.target_minutes {
        Some(t) if !t.is_finite() => {
            fields.insert("target_minutes", vec!["Enter a number.".into()]);
            None
        }
        Some(t) if t < 0.0 => {
            fields.insert(
                "target_minutes",
                vec!["Ensure this value is greater than or equal to 0.".into()],
            );
            None
        }
        Some(t) => Some(t),
        None => {
            fields.insert("target_minutes", vec!["This field is required.".into()]);
            None
        }
    };

    match (category_id, target_minutes) {
        (Some(category_id), Some(target_minutes)) => Ok(ValidGoal {
            category_id,
            target_minutes,
        }),
        _ => Err(TrackerError::Validation(fields)),
    }
}

/// Create or overwrite the goal of `owner` for the request's category.
pub async fn set_goal(
    store: &dyn TrackerStore,
    owner: Owner,
    req: &GoalRequest,
) -> Result<Goal, TrackerError> {
    let valid = validate(req)?;
    if store.find_category(valid.category_id).await?.is_none() {
        warn!(%owner, category_id = valid.category_id, "goal for unknown category");
        return Err(TrackerError::field("category_id", "Select a valid choice."));
    }

    let goal = store
        .upsert_goal(owner, valid.category_id, valid.target_minutes)
        .await?;
    info!(
        %owner,
        goal_id = %goal.id,
        category = %goal.category_name,
        target_minutes = goal.target_minutes,
        "goal set"
    );
    Ok(goal)
}

pub async fn list_goals(store: &dyn TrackerStore, owner: Owner) -> Result<Vec<Goal>, TrackerError> {
    Ok(store.list_goals(owner).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use uuid::Uuid;

    fn req(category_id: i64, target: f64) -> GoalRequest {
        GoalRequest {
            category_id: Some(category_id),
            target_minutes: Some(target),
        }
    }

    fn field_names(err: TrackerError) -> Vec<&'static str> {
        match err {
            TrackerError::Validation(fields) => fields.keys().copied().collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn validate_accepts_zero_and_positive() {
        assert_eq!(
            validate(&req(1, 0.0)).unwrap(),
            ValidGoal {
                category_id: 1,
                target_minutes: 0.0
            }
        );
        assert_eq!(validate(&req(2, 45.5)).unwrap().target_minutes, 45.5);
    }

    #[test]
    fn validate_rejects_negative_and_non_finite() {
        assert_eq!(field_names(validate(&req(1, -1.0)).unwrap_err()), vec!["target_minutes"]);
        assert_eq!(
            field_names(validate(&req(1, f64::NAN)).unwrap_err()),
            vec!["target_minutes"]
        );
        assert_eq!(
            field_names(validate(&req(1, f64::INFINITY)).unwrap_err()),
            vec!["target_minutes"]
        );
    }

    #[test]
    fn validate_reports_every_missing_field() {
        assert_eq!(
            field_names(validate(&GoalRequest::default()).unwrap_err()),
            vec!["category_id", "target_minutes"]
        );
    }

    #[tokio::test]
    async fn set_goal_twice_updates_in_place() {
        let store = MemoryStore::new();
        let math = store.ensure_category("Math").await.unwrap();
        let owner = Owner::new(Uuid::new_v4());

        let first = set_goal(&store, owner, &req(math.id, 30.0)).await.unwrap();
        let second = set_goal(&store, owner, &req(math.id, 45.0)).await.unwrap();

        assert_eq!(first.id, second.id);
        let goals = list_goals(&store, owner).await.unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].target_minutes, 45.0);
        assert_eq!(goals[0].category_name, "Math");
    }

    #[tokio::test]
    async fn negative_target_is_not_written() {
        let store = MemoryStore::new();
        let math = store.ensure_category("Math").await.unwrap();
        let owner = Owner::new(Uuid::new_v4());

        let err = set_goal(&store, owner, &req(math.id, -5.0)).await.unwrap_err();
        assert!(matches!(err, TrackerError::Validation(_)));
        assert!(store.all_goals().is_empty());
    }

    #[tokio::test]
    async fn unknown_category_is_rejected() {
        let store = MemoryStore::new();
        let owner = Owner::new(Uuid::new_v4());

        let err = set_goal(&store, owner, &req(42, 10.0)).await.unwrap_err();
        assert_eq!(field_names(err), vec!["category_id"]);
    }

    #[tokio::test]
    async fn goals_are_scoped_per_owner() {
        let store = MemoryStore::new();
        let math = store.ensure_category("Math").await.unwrap();
        let alice = Owner::new(Uuid::new_v4());
        let bob = Owner::new(Uuid::new_v4());

        set_goal(&store, alice, &req(math.id, 30.0)).await.unwrap();
        set_goal(&store, bob, &req(math.id, 90.0)).await.unwrap();

        let alice_goals = list_goals(&store, alice).await.unwrap();
        assert_eq!(alice_goals.len(), 1);
        assert_eq!(alice_goals[0].target_minutes, 30.0);
        assert_eq!(store.all_goals().len(), 2);
    }
}
