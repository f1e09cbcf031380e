use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Shared study category; referenced by sessions and goals of every user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}
