use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    StageChanged,
    Assigned,
    Commented,
    Invited,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::StageChanged => "stage_changed",
            NotificationKind::Assigned => "assigned",
            NotificationKind::Commented => "commented",
            NotificationKind::Invited => "invited",
        }
    }
}

impl TryFrom<String> for NotificationKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "stage_changed" => Ok(NotificationKind::StageChanged),
            "assigned" => Ok(NotificationKind::Assigned),
            "commented" => Ok(NotificationKind::Commented),
            "invited" => Ok(NotificationKind::Invited),
            other => Err(format!("unknown notification kind: {}", other)),
        }
    }
}

#[derive(Debug, Serialize, FromRow)]
pub struct Notification {
    pub notification_id: i32,
    pub user_id: i32,
    #[sqlx(try_from = "String")]
    pub kind: NotificationKind,
    pub body: String,
    pub project_id: Option<i32>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_text() {
        for kind in [
            NotificationKind::StageChanged,
            NotificationKind::Assigned,
            NotificationKind::Commented,
            NotificationKind::Invited,
        ] {
            assert_eq!(NotificationKind::try_from(kind.as_str().to_string()), Ok(kind));
        }
        assert!(NotificationKind::try_from("mentioned".to_string()).is_err());
    }
}
