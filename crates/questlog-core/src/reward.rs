//! XP and gold rewards for scheduled work.
//!
//! A task is worth one "block" per 30 minutes of scheduled time. Blocks are
//! scaled by the difficulty multiplier and the caller's streak multiplier,
//! and the product is rounded once at the end.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::calendar::parse_instant;
use crate::error::ValidationError;

/// Minutes of scheduled time that make up one reward block.
pub const MINUTES_PER_BLOCK: f64 = 30.0;
/// XP granted per block at multiplier 1.
pub const XP_PER_BLOCK: f64 = 100.0;
/// Gold granted per block at multiplier 1.
pub const GOLD_PER_BLOCK: f64 = 20.0;
/// Multiplier applied when the difficulty is missing or unrecognized.
pub const DEFAULT_DIFFICULTY_MULTIPLIER: f64 = 1.0;

/// Task difficulty.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
    #[serde(rename = "S-Rank")]
    SRank,
}

impl Difficulty {
    /// All difficulties in ascending order.
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::SRank,
    ];

    /// Reward multiplier for this difficulty.
    pub fn multiplier(&self) -> f64 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Normal => 1.5,
            Difficulty::Hard => 2.0,
            Difficulty::SRank => 3.0,
        }
    }

    /// Wire name ("Easy", "Normal", "Hard", "S-Rank").
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
            Difficulty::SRank => "S-Rank",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str() == s.trim())
            .ok_or_else(|| ValidationError::invalid_value("difficulty", format!("unknown difficulty {s:?}")))
    }
}

/// Multiplier for a difficulty given as free text.
///
/// Unknown labels fall back to [`DEFAULT_DIFFICULTY_MULTIPLIER`]; this never fails.
pub fn difficulty_multiplier(label: &str) -> f64 {
    label
        .parse::<Difficulty>()
        .map(|d| d.multiplier())
        .unwrap_or(DEFAULT_DIFFICULTY_MULTIPLIER)
}

/// Computed reward for a block of scheduled time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Rewards {
    pub xp: u64,
    pub gold: u64,
    pub duration_minutes: u64,
}

/// Calculate rewards from ISO 8601 timestamps and a difficulty label.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidTimestamp`] if either timestamp does not
/// parse, or [`ValidationError::InvalidValue`] for a negative or non-finite
/// streak multiplier.
pub fn calculate_rewards(
    start_time: &str,
    end_time: &str,
    difficulty: &str,
    streak_multiplier: f64,
) -> Result<Rewards, ValidationError> {
    let start = parse_instant("startTime", start_time)?;
    let end = parse_instant("endTime", end_time)?;
    compute(start, end, difficulty_multiplier(difficulty), streak_multiplier)
}

/// Calculate rewards for already-parsed instants.
///
/// `None` difficulty uses the default multiplier.
pub fn calculate_rewards_between(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    difficulty: Option<Difficulty>,
    streak_multiplier: f64,
) -> Result<Rewards, ValidationError> {
    let multiplier = difficulty
        .map(|d| d.multiplier())
        .unwrap_or(DEFAULT_DIFFICULTY_MULTIPLIER);
    compute(start, end, multiplier, streak_multiplier)
}

fn compute(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    difficulty_multiplier: f64,
    streak_multiplier: f64,
) -> Result<Rewards, ValidationError> {
    if !streak_multiplier.is_finite() || streak_multiplier < 0.0 {
        return Err(ValidationError::invalid_value(
            "streakMultiplier",
            format!("must be a non-negative number, got {streak_multiplier}"),
        ));
    }

    let elapsed_ms = (end - start).num_milliseconds() as f64;
    let minutes = (elapsed_ms / 60_000.0).round().max(1.0);
    let blocks = minutes / MINUTES_PER_BLOCK;
    let scale = blocks * difficulty_multiplier * streak_multiplier;

    Ok(Rewards {
        xp: (scale * XP_PER_BLOCK).round() as u64,
        gold: (scale * GOLD_PER_BLOCK).round() as u64,
        duration_minutes: minutes as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn one_hour_normal_task() {
        let rewards =
            calculate_rewards("2024-01-01T08:00:00Z", "2024-01-01T09:00:00Z", "Normal", 1.0)
                .unwrap();
        assert_eq!(rewards.duration_minutes, 60);
        assert_eq!(rewards.xp, 300);
        assert_eq!(rewards.gold, 60);
    }

    #[test]
    fn difficulty_table() {
        assert_eq!(difficulty_multiplier("Easy"), 1.0);
        assert_eq!(difficulty_multiplier("Normal"), 1.5);
        assert_eq!(difficulty_multiplier("Hard"), 2.0);
        assert_eq!(difficulty_multiplier("S-Rank"), 3.0);
    }

    #[test]
    fn unknown_difficulty_falls_back_to_one() {
        assert_eq!(difficulty_multiplier("Unknown"), 1.0);
        assert_eq!(difficulty_multiplier(""), 1.0);
        let rewards =
            calculate_rewards("2024-01-01T08:00:00Z", "2024-01-01T08:30:00Z", "Unknown", 1.0)
                .unwrap();
        assert_eq!(rewards.xp, 100);
        assert_eq!(rewards.gold, 20);
    }

    #[test]
    fn short_and_reversed_ranges_count_as_one_minute() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let same = calculate_rewards_between(start, start, Some(Difficulty::Easy), 1.0).unwrap();
        assert_eq!(same.duration_minutes, 1);
        // 1/30 block * 100 = 3.33 -> 3
        assert_eq!(same.xp, 3);
        assert_eq!(same.gold, 1);

        let reversed =
            calculate_rewards_between(start, start - Duration::hours(2), None, 1.0).unwrap();
        assert_eq!(reversed.duration_minutes, 1);
    }

    #[test]
    fn rounding_happens_once_at_the_end() {
        // 45 minutes Hard x1.1: 1.5 * 2 * 1.1 = 3.3 -> xp 330, gold 66
        let rewards =
            calculate_rewards("2024-01-01T08:00:00Z", "2024-01-01T08:45:00Z", "Hard", 1.1)
                .unwrap();
        assert_eq!(rewards.xp, 330);
        assert_eq!(rewards.gold, 66);
    }

    #[test]
    fn duration_rounds_to_nearest_minute() {
        let rewards =
            calculate_rewards("2024-01-01T08:00:00Z", "2024-01-01T08:29:31Z", "Easy", 1.0)
                .unwrap();
        assert_eq!(rewards.duration_minutes, 30);
    }

    #[test]
    fn invalid_timestamps_are_rejected() {
        let err = calculate_rewards("not a date", "2024-01-01T09:00:00Z", "Normal", 1.0).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidTimestamp { ref field, .. } if field == "startTime"));

        let err = calculate_rewards("2024-01-01T08:00:00Z", "", "Normal", 1.0).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidTimestamp { ref field, .. } if field == "endTime"));
    }

    #[test]
    fn negative_multiplier_is_rejected() {
        let err =
            calculate_rewards("2024-01-01T08:00:00Z", "2024-01-01T09:00:00Z", "Normal", -1.0)
                .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { .. }));
        assert!(calculate_rewards("2024-01-01T08:00:00Z", "2024-01-01T09:00:00Z", "Normal", f64::NAN).is_err());
    }

    #[test]
    fn zero_multiplier_gives_nothing() {
        let rewards =
            calculate_rewards("2024-01-01T08:00:00Z", "2024-01-01T09:00:00Z", "S-Rank", 0.0)
                .unwrap();
        assert_eq!(rewards.xp, 0);
        assert_eq!(rewards.gold, 0);
    }

    #[test]
    fn difficulty_serde_uses_wire_names() {
        assert_eq!(serde_json::to_string(&Difficulty::SRank).unwrap(), "\"S-Rank\"");
        let parsed: Difficulty = serde_json::from_str("\"Hard\"").unwrap();
        assert_eq!(parsed, Difficulty::Hard);
        assert_eq!("S-Rank".parse::<Difficulty>().unwrap(), Difficulty::SRank);
    }
}
