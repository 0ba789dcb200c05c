use serde::{Deserialize, Serialize};

// Listing filter
#[derive(Deserialize)]
pub struct ListNotificationsQuery {
    pub unread_only: Option<bool>,
}

// Mark-read response
#[derive(Serialize)]
pub struct MarkReadResponse {
    pub success: bool,
    pub message: String,
}

// Read-all response
#[derive(Serialize)]
pub struct ReadAllResponse {
    pub marked: u64,
}
