use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Serialize, FromRow)]
pub struct Subtask {
    pub subtask_id: i32,
    pub project_id: i32,
    pub title: String,
    pub is_done: bool,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}
