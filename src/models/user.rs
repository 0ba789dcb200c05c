use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Workspace role. Stored as TEXT; policy checks live in `crate::policy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Member,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Member => "member",
        }
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "member" => Ok(Role::Member),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

#[derive(Debug, Serialize, FromRow)]
pub struct User {
    pub user_id: i32,
    pub external_id: String,
    pub user_name: String,
    pub user_email: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_text() {
        for role in [Role::Admin, Role::Manager, Role::Member] {
            assert_eq!(Role::try_from(role.as_str().to_string()), Ok(role));
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(Role::try_from("owner".to_string()).is_err());
    }
}
