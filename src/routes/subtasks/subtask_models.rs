use serde::{Deserialize, Serialize};

// Subtask creation request
#[derive(Deserialize)]
pub struct AddSubtaskRequest {
    pub title: String,
    pub position: Option<i32>,
}

// Subtask update request; absent fields are left untouched
#[derive(Deserialize)]
pub struct UpdateSubtaskRequest {
    pub title: Option<String>,
    pub is_done: Option<bool>,
    pub position: Option<i32>,
}

// Deletion response
#[derive(Serialize)]
pub struct DeleteSubtaskResponse {
    pub success: bool,
    pub message: String,
}
