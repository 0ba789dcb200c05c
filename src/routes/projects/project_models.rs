use serde::{Deserialize, Serialize};

use crate::models::project::{Priority, Stage};

// Listing filters
#[derive(Deserialize)]
pub struct ListProjectsQuery {
    pub stage: Option<Stage>,
    pub owner_id: Option<i32>,
    pub tag: Option<String>,
    pub include_archived: Option<bool>,
}

// Project creation request
#[derive(Deserialize)]
pub struct CreateProjectRequest {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub owner_id: Option<i32>,
}

// Project field update request; absent fields are left untouched
#[derive(Deserialize)]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub progress: Option<i16>,
    pub owner_id: Option<i32>,
}

// Stage transition request and response
#[derive(Deserialize)]
pub struct UpdateStageRequest {
    pub stage: Stage,
}

#[derive(Serialize)]
pub struct UpdateStageResponse {
    pub changed: bool,
    pub stage: Stage,
}

// Archive toggle response
#[derive(Serialize)]
pub struct ArchiveResponse {
    pub changed: bool,
    pub is_archived: bool,
}

// Deletion response
#[derive(Serialize)]
pub struct DeleteProjectResponse {
    pub success: bool,
    pub message: String,
}
