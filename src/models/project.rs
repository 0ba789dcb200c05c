use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Kanban pipeline stage. Stored as TEXT.
///
/// Legal moves:
///   unassigned -> assigned | skipped
///   assigned   -> submitted | skipped
///   submitted  -> won | lost
///   skipped    -> unassigned   (re-open a declined RFP)
/// won and lost are terminal. Archiving is a separate flag on the project,
/// not a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Unassigned,
    Assigned,
    Submitted,
    Skipped,
    Won,
    Lost,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Unassigned => "unassigned",
            Stage::Assigned => "assigned",
            Stage::Submitted => "submitted",
            Stage::Skipped => "skipped",
            Stage::Won => "won",
            Stage::Lost => "lost",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Won | Stage::Lost)
    }

    pub fn can_transition_to(self, next: Stage) -> bool {
        use Stage::*;
        matches!(
            (self, next),
            (Unassigned, Assigned)
                | (Unassigned, Skipped)
                | (Assigned, Submitted)
                | (Assigned, Skipped)
                | (Submitted, Won)
                | (Submitted, Lost)
                | (Skipped, Unassigned)
        )
    }
}

impl TryFrom<String> for Stage {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "unassigned" => Ok(Stage::Unassigned),
            "assigned" => Ok(Stage::Assigned),
            "submitted" => Ok(Stage::Submitted),
            "skipped" => Ok(Stage::Skipped),
            "won" => Ok(Stage::Won),
            "lost" => Ok(Stage::Lost),
            other => Err(format!("unknown stage: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl TryFrom<String> for Priority {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            other => Err(format!("unknown priority: {}", other)),
        }
    }
}

#[derive(Debug, Serialize, FromRow)]
pub struct Project {
    pub project_id: i32,
    pub title: String,
    pub description: Option<String>,
    #[sqlx(try_from = "String")]
    pub stage: Stage,
    #[sqlx(try_from = "String")]
    pub priority: Priority,
    pub owner_id: Option<i32>,
    pub progress: i16,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_moves_forward() {
        assert!(Stage::Unassigned.can_transition_to(Stage::Assigned));
        assert!(Stage::Assigned.can_transition_to(Stage::Submitted));
        assert!(Stage::Submitted.can_transition_to(Stage::Won));
        assert!(Stage::Submitted.can_transition_to(Stage::Lost));
    }

    #[test]
    fn skipping_and_reopening() {
        assert!(Stage::Unassigned.can_transition_to(Stage::Skipped));
        assert!(Stage::Assigned.can_transition_to(Stage::Skipped));
        assert!(Stage::Skipped.can_transition_to(Stage::Unassigned));
        assert!(!Stage::Skipped.can_transition_to(Stage::Won));
    }

    #[test]
    fn no_stage_skipping_or_backtracking() {
        assert!(!Stage::Unassigned.can_transition_to(Stage::Submitted));
        assert!(!Stage::Unassigned.can_transition_to(Stage::Won));
        assert!(!Stage::Submitted.can_transition_to(Stage::Assigned));
        assert!(!Stage::Assigned.can_transition_to(Stage::Unassigned));
    }

    #[test]
    fn terminal_stages_stay_terminal() {
        for next in [
            Stage::Unassigned,
            Stage::Assigned,
            Stage::Submitted,
            Stage::Skipped,
            Stage::Won,
            Stage::Lost,
        ] {
            assert!(!Stage::Won.can_transition_to(next));
            assert!(!Stage::Lost.can_transition_to(next));
        }
        assert!(Stage::Won.is_terminal());
        assert!(Stage::Lost.is_terminal());
        assert!(!Stage::Submitted.is_terminal());
    }

    #[test]
    fn same_stage_is_never_a_transition() {
        for stage in [Stage::Unassigned, Stage::Assigned, Stage::Submitted] {
            assert!(!stage.can_transition_to(stage));
        }
    }

    #[test]
    fn stage_and_priority_round_trip_through_text() {
        for stage in [
            Stage::Unassigned,
            Stage::Assigned,
            Stage::Submitted,
            Stage::Skipped,
            Stage::Won,
            Stage::Lost,
        ] {
            assert_eq!(Stage::try_from(stage.as_str().to_string()), Ok(stage));
        }
        for priority in [Priority::Low, Priority::Medium, Priority::High, Priority::Urgent] {
            assert_eq!(Priority::try_from(priority.as_str().to_string()), Ok(priority));
        }
        assert!(Stage::try_from("archived".to_string()).is_err());
    }
}
