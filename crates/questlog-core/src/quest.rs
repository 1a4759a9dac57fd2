//! Quests and their status lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::reward::Difficulty;

/// Quest status.
///
/// Valid transitions:
/// - Not Started → In Progress
/// - In Progress → Completed
/// - Not Started / In Progress → Failed
///
/// Completed and Failed are terminal. A reset creates a new quest via
/// [`Quest::restarted`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum QuestStatus {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Failed,
}

impl QuestStatus {
    /// Check if a transition is valid.
    pub fn can_transition_to(&self, to: &QuestStatus) -> bool {
        match self {
            QuestStatus::NotStarted => {
                matches!(to, QuestStatus::InProgress | QuestStatus::Failed)
            }
            QuestStatus::InProgress => {
                matches!(to, QuestStatus::Completed | QuestStatus::Failed)
            }
            QuestStatus::Completed | QuestStatus::Failed => false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, QuestStatus::Completed | QuestStatus::Failed)
    }
}

impl fmt::Display for QuestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QuestStatus::NotStarted => "Not Started",
            QuestStatus::InProgress => "In Progress",
            QuestStatus::Completed => "Completed",
            QuestStatus::Failed => "Failed",
        };
        f.write_str(label)
    }
}

/// Error returned when an invalid status transition is attempted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, thiserror::Error)]
#[error("Invalid quest transition: {from} → {to}")]
pub struct QuestTransitionError {
    pub from: QuestStatus,
    pub to: QuestStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub xp: u64,
    pub gold: u64,
    pub status: QuestStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_from_habit_id: Option<String>,
}

impl Quest {
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        difficulty: Difficulty,
        xp: u64,
        gold: u64,
    ) -> Self {
        Quest {
            id: new_quest_id(),
            title: title.into(),
            category: category.into(),
            difficulty,
            xp,
            gold,
            status: QuestStatus::NotStarted,
            tags: Vec::new(),
            created_from_habit_id: None,
        }
    }

    /// Copy in status `to`.
    pub fn transition_to(&self, to: QuestStatus) -> Result<Quest, QuestTransitionError> {
        if !self.status.can_transition_to(&to) {
            return Err(QuestTransitionError {
                from: self.status,
                to,
            });
        }
        Ok(Quest {
            status: to,
            ..self.clone()
        })
    }

    pub fn start(&self) -> Result<Quest, QuestTransitionError> {
        self.transition_to(QuestStatus::InProgress)
    }

    pub fn complete(&self) -> Result<Quest, QuestTransitionError> {
        self.transition_to(QuestStatus::Completed)
    }

    pub fn fail(&self) -> Result<Quest, QuestTransitionError> {
        self.transition_to(QuestStatus::Failed)
    }

    /// Fresh copy with a new id, back at Not Started.
    pub fn restarted(&self) -> Quest {
        Quest {
            id: new_quest_id(),
            status: QuestStatus::NotStarted,
            ..self.clone()
        }
    }
}

fn new_quest_id() -> String {
    format!("quest-{}", uuid::Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quest() -> Quest {
        Quest::new("Slay the backlog", "work", Difficulty::Hard, 200, 80)
    }

    #[test]
    fn status_transitions() {
        assert!(QuestStatus::NotStarted.can_transition_to(&QuestStatus::InProgress));
        assert!(QuestStatus::NotStarted.can_transition_to(&QuestStatus::Failed));
        assert!(!QuestStatus::NotStarted.can_transition_to(&QuestStatus::Completed));
        assert!(QuestStatus::InProgress.can_transition_to(&QuestStatus::Completed));
        assert!(QuestStatus::InProgress.can_transition_to(&QuestStatus::Failed));
        assert!(!QuestStatus::InProgress.can_transition_to(&QuestStatus::NotStarted));
        assert!(!QuestStatus::Completed.can_transition_to(&QuestStatus::Failed));
        assert!(!QuestStatus::Failed.can_transition_to(&QuestStatus::InProgress));
    }

    #[test]
    fn happy_path() {
        let done = quest().start().unwrap().complete().unwrap();
        assert_eq!(done.status, QuestStatus::Completed);
        assert!(done.status.is_terminal());
    }

    #[test]
    fn terminal_states_reject_everything() {
        let done = quest().start().unwrap().complete().unwrap();
        let err = done.fail().unwrap_err();
        assert_eq!(err, QuestTransitionError { from: QuestStatus::Completed, to: QuestStatus::Failed });
        assert_eq!(err.to_string(), "Invalid quest transition: Completed → Failed");

        let failed = quest().fail().unwrap();
        assert!(failed.start().is_err());
    }

    #[test]
    fn restart_creates_a_new_quest() {
        let failed = quest().fail().unwrap();
        let again = failed.restarted();
        assert_ne!(again.id, failed.id);
        assert_eq!(again.status, QuestStatus::NotStarted);
        assert_eq!(again.title, failed.title);
    }

    #[test]
    fn status_serde_uses_display_names() {
        assert_eq!(serde_json::to_string(&QuestStatus::NotStarted).unwrap(), "\"Not Started\"");
        let status: QuestStatus = serde_json::from_str("\"In Progress\"").unwrap();
        assert_eq!(status, QuestStatus::InProgress);
    }
}
