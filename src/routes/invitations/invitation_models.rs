use serde::{Deserialize, Serialize};

use crate::models::user::Role;

// Invitation creation request
#[derive(Deserialize)]
pub struct CreateInvitationRequest {
    pub email: String,
    pub role: Option<Role>,
}

// Acceptance request; carries the invite token and the external identity
// of the new member instead of a bearer token, since the member does not
// exist yet.
#[derive(Deserialize)]
pub struct AcceptInvitationRequest {
    pub invite_token: uuid::Uuid,
    pub external_id: String,
    pub user_name: String,
}

// Revoke response
#[derive(Serialize)]
pub struct RevokeInvitationResponse {
    pub success: bool,
    pub message: String,
}
