use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Target minutes a user wants to reach for one category.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Goal {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub category_id: i64,
    #[serde(rename = "category")]
    pub category_name: String,
    pub target_minutes: f64,
}
