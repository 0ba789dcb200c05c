use serde::{Deserialize, Serialize};

// Tag creation request
#[derive(Deserialize)]
pub struct AddTagRequest {
    pub tag_name: String,
    pub color: Option<String>,
}

// Deletion response
#[derive(Serialize)]
pub struct DeleteTagResponse {
    pub success: bool,
    pub message: String,
}

// Assign/unassign response
#[derive(Serialize)]
pub struct TagAssignmentResponse {
    pub success: bool,
    pub message: String,
}
