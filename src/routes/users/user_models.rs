use serde::Deserialize;

use crate::models::user::Role;

// Role change request
#[derive(Deserialize)]
pub struct SetRoleRequest {
    pub role: Role,
}
