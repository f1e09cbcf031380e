use serde::{Deserialize, Serialize};

use crate::categories::repo_types::Category;
use crate::goals::repo_types::Goal;

/// Body of `POST /goals/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoalRequest {
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub target_minutes: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct GoalsResponse {
    pub goals: Vec<Goal>,
    pub categories: Vec<Category>,
}

#[derive(Debug, Serialize)]
pub struct SetGoalResponse {
    pub goal: Goal,
    pub goals: Vec<Goal>,
}
