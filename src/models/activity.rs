use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Append-only audit row written by `crate::fanout` on project mutations.
#[derive(Debug, Serialize, FromRow)]
pub struct ActivityEntry {
    pub activity_id: i32,
    pub project_id: i32,
    pub actor_id: i32,
    pub action: String,
    pub detail: String,
    pub created_at: DateTime<Utc>,
}
