//! Scheduled tasks and their derived rewards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::reward::{calculate_rewards_between, Difficulty, Rewards};

/// A block of scheduled work.
///
/// Rewards are derived from the time range at construction. Later edits go
/// through [`Task::with_rewards`] and are not re-validated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub difficulty: Difficulty,
    pub category: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub xp_reward: u64,
    pub gold_reward: u64,
    pub completed: bool,
}

impl Task {
    /// Schedule a task between `start_time` and `end_time`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTimeRange`] unless `end_time > start_time`,
    /// [`ValidationError::MissingField`] for a blank title, and propagates
    /// reward errors for an invalid streak multiplier.
    pub fn schedule(
        title: impl Into<String>,
        difficulty: Difficulty,
        category: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        streak_multiplier: f64,
    ) -> Result<Task, ValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ValidationError::MissingField("title".to_string()));
        }
        if end_time <= start_time {
            return Err(ValidationError::InvalidTimeRange {
                start: start_time,
                end: end_time,
            });
        }

        let rewards =
            calculate_rewards_between(start_time, end_time, Some(difficulty), streak_multiplier)?;

        Ok(Task {
            id: format!("task-{}", uuid::Uuid::new_v4()),
            title,
            difficulty,
            category: category.into(),
            start_time,
            end_time,
            xp_reward: rewards.xp,
            gold_reward: rewards.gold,
            completed: false,
        })
    }

    /// Rewards currently attached to the task.
    pub fn rewards(&self) -> Rewards {
        Rewards {
            xp: self.xp_reward,
            gold: self.gold_reward,
            duration_minutes: self.duration_minutes(),
        }
    }

    pub fn duration_minutes(&self) -> u64 {
        ((self.end_time - self.start_time).num_milliseconds() as f64 / 60_000.0)
            .round()
            .max(1.0) as u64
    }

    /// Copy with manually overridden rewards.
    pub fn with_rewards(&self, xp: u64, gold: u64) -> Task {
        Task {
            xp_reward: xp,
            gold_reward: gold,
            ..self.clone()
        }
    }

    /// Copy marked as completed. Completing twice is a no-op.
    pub fn mark_completed(&self) -> Task {
        Task {
            completed: true,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::Player;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, minute, 0).unwrap()
    }

    #[test]
    fn schedule_derives_rewards() {
        let task = Task::schedule("Write report", Difficulty::Normal, "work", at(8, 0), at(9, 0), 1.0)
            .unwrap();
        assert_eq!(task.xp_reward, 300);
        assert_eq!(task.gold_reward, 60);
        assert_eq!(task.duration_minutes(), 60);
        assert!(task.id.starts_with("task-"));
        assert!(!task.completed);
    }

    #[test]
    fn schedule_rejects_empty_or_reversed_range() {
        let err = Task::schedule("x", Difficulty::Easy, "work", at(9, 0), at(9, 0), 1.0).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidTimeRange { .. }));
        let err = Task::schedule("x", Difficulty::Easy, "work", at(9, 0), at(8, 0), 1.0).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidTimeRange { .. }));
    }

    #[test]
    fn schedule_rejects_blank_title() {
        let err = Task::schedule("  ", Difficulty::Easy, "work", at(8, 0), at(9, 0), 1.0).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("title".to_string()));
    }

    #[test]
    fn completing_twice_awards_once() {
        let task = Task::schedule("Gym", Difficulty::Hard, "fitness", at(7, 0), at(7, 30), 1.0)
            .unwrap();
        let player = Player::default();

        let (player, task) = player.complete_task(&task);
        assert!(task.completed);
        assert_eq!(player.xp, 200);
        assert_eq!(player.gold, 40);

        let (again, task_again) = player.complete_task(&task);
        assert_eq!(again, player);
        assert_eq!(task_again, task);
    }

    #[test]
    fn reward_override_is_unconstrained() {
        let task = Task::schedule("Read", Difficulty::Easy, "study", at(20, 0), at(21, 0), 1.0)
            .unwrap()
            .with_rewards(5, 0);
        assert_eq!(task.rewards().xp, 5);
        assert_eq!(task.rewards().duration_minutes, 60);
    }

    #[test]
    fn serializes_camel_case() {
        let task = Task::schedule("Read", Difficulty::SRank, "study", at(20, 0), at(21, 0), 1.0)
            .unwrap();
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["difficulty"], "S-Rank");
        assert!(json.get("xpReward").is_some());
        assert!(json.get("startTime").is_some());
    }
}
