//! Habits and their completion heatmaps.
//!
//! The heatmap is the source of truth. `streak` is a cache that every
//! toggle refreshes; [`Habit::current_streak`] recomputes it on demand.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::ValidationError;
use crate::heatmap::{current_streak, longest_streak_from_dates, ActivityLog};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub name: String,
    pub category: String,
    /// Cached current streak, as of the last toggle.
    #[serde(default)]
    pub streak: u32,
    #[serde(default = "default_streak_multiplier")]
    pub streak_multiplier: f64,
    #[serde(default)]
    pub heatmap: BTreeSet<NaiveDate>,
    #[serde(default, rename = "rewardXP")]
    pub reward_xp: u64,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_streak_multiplier() -> f64 {
    1.0
}

impl Habit {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Habit {
            id: format!("habit-{}", uuid::Uuid::new_v4()),
            name: name.into(),
            category: category.into(),
            streak: 0,
            streak_multiplier: default_streak_multiplier(),
            heatmap: BTreeSet::new(),
            reward_xp: 0,
            tags: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_streak_multiplier(mut self, multiplier: f64) -> Self {
        self.streak_multiplier = multiplier;
        self
    }

    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.heatmap.contains(&date)
    }

    pub fn activity(&self) -> ActivityLog {
        ActivityLog::from_date_set(&self.heatmap)
    }

    /// Streak recomputed from the heatmap.
    pub fn current_streak(&self, today: NaiveDate) -> u32 {
        current_streak(&self.activity(), today)
    }

    pub fn longest_streak(&self) -> u32 {
        longest_streak_from_dates(&self.activity())
    }

    /// Copy with `date`'s completion flipped and the streak cache refreshed.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::FutureDate`] for dates after `today`.
    pub fn toggle_completion(&self, date: NaiveDate, today: NaiveDate) -> Result<Habit, ValidationError> {
        if date > today {
            return Err(ValidationError::FutureDate { date, today });
        }

        let mut heatmap = self.heatmap.clone();
        if !heatmap.remove(&date) {
            heatmap.insert(date);
        }

        let mut habit = Habit {
            heatmap,
            ..self.clone()
        };
        habit.streak = habit.current_streak(today);
        Ok(habit)
    }

    /// Copy with the streak cache brought up to date.
    pub fn refreshed(&self, today: NaiveDate) -> Habit {
        Habit {
            streak: self.current_streak(today),
            ..self.clone()
        }
    }

    /// Days in the 7 days ending `today` without a completion.
    pub fn missed_count_last_7(&self, today: NaiveDate) -> u32 {
        (0..7)
            .map(|offset| today - Duration::days(offset))
            .filter(|d| !self.heatmap.contains(d))
            .count() as u32
    }
}
