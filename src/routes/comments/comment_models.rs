use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Comment creation/update requests
#[derive(Deserialize)]
pub struct AddCommentRequest {
    pub body: String,
}

#[derive(Deserialize)]
pub struct UpdateCommentRequest {
    pub body: String,
}

// Comment row joined with the author's display name
#[derive(Debug, Serialize, FromRow)]
pub struct CommentView {
    pub comment_id: i32,
    pub project_id: i32,
    pub author_id: i32,
    pub author_name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Deletion response
#[derive(Serialize)]
pub struct DeleteCommentResponse {
    pub success: bool,
    pub message: String,
}
