//! Weighted random events for habits.
//!
//! Every roll is a categorical draw over "no event" plus the four event
//! kinds. Positive events get likelier as a streak grows, warnings get
//! likelier as misses pile up. All randomness comes from an injected
//! [`RandomSource`], so a fixed source makes every roll reproducible.

use chrono::{DateTime, Local, NaiveDate, Timelike, Utc};
use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

use crate::habit::Habit;
use crate::reward::Difficulty;

/// Source of uniform floats in `[0, 1)`.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

impl<F: FnMut() -> f64> RandomSource for F {
    fn next_f64(&mut self) -> f64 {
        self()
    }
}

/// PCG-backed source, seeded or from OS entropy.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: Mcg128Xsl64,
}

impl SeededRandom {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mcg128Xsl64::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: Mcg128Xsl64::from_entropy(),
        }
    }

    /// Seeded when `seed` is set, entropy otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed list of values, cycling when exhausted.
///
/// An empty list always yields 0.0.
#[derive(Debug, Clone)]
pub struct FixedSequence {
    values: Vec<f64>,
    index: usize,
}

impl FixedSequence {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            index: 0,
        }
    }
}

impl RandomSource for FixedSequence {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.index % self.values.len()];
        self.index += 1;
        value
    }
}

/// A candidate value and its relative weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Weighted<T> {
    pub value: T,
    pub weight: f64,
}

impl<T> Weighted<T> {
    pub fn new(value: T, weight: f64) -> Self {
        Self { value, weight }
    }
}

/// Draw one candidate with probability proportional to its weight.
///
/// Candidates with non-positive or non-finite weight are never picked.
/// Returns `None` when no candidate has positive weight.
pub fn weighted_pick<T: Clone, R: RandomSource + ?Sized>(
    candidates: &[Weighted<T>],
    rng: &mut R,
) -> Option<T> {
    let eligible: Vec<&Weighted<T>> = candidates
        .iter()
        .filter(|c| c.weight.is_finite() && c.weight > 0.0)
        .collect();
    let total: f64 = eligible.iter().map(|c| c.weight).sum();
    if total <= 0.0 {
        return None;
    }

    let draw = rng.next_f64();
    let draw = if draw.is_finite() { draw.clamp(0.0, 1.0) } else { 0.0 };
    let target = draw * total;

    let mut cumulative = 0.0;
    for candidate in &eligible {
        cumulative += candidate.weight;
        if target < cumulative {
            return Some(candidate.value.clone());
        }
    }
    // draw == 1.0 or float drift at the top end
    eligible.last().map(|c| c.value.clone())
}

/// Kind of random event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    MicroReward,
    ChaosQuest,
    ShadowWarning,
    PatternBreak,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::MicroReward => "micro_reward",
            EventKind::ChaosQuest => "chaos_quest",
            EventKind::ShadowWarning => "shadow_warning",
            EventKind::PatternBreak => "pattern_break",
        }
    }
}

/// Small instant reward carried by a micro_reward event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MicroReward {
    pub xp: u64,
    pub gold: u64,
}

/// Hints for building a quest out of a chaos_quest event.
///
/// Explicit `xp`/`gold` override the synthesized values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct QuestDraft {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xp: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gold: Option<u64>,
}

/// An ephemeral rolled event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuestEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward: Option<MicroReward>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quest: Option<QuestDraft>,
}

/// Habit statistics a roll is based on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct HabitContext {
    pub streak: u32,
    pub missed_count_last_7: u32,
    /// Days left before the habit's current goal ends, if it has one.
    #[serde(default)]
    pub days_remaining: Option<u32>,
}

impl HabitContext {
    /// Derive streak and misses from the habit's heatmap.
    pub fn from_habit(habit: &Habit, today: NaiveDate) -> Self {
        Self {
            streak: habit.current_streak(today),
            missed_count_last_7: habit.missed_count_last_7(today),
            days_remaining: None,
        }
    }

    pub fn with_days_remaining(mut self, days: u32) -> Self {
        self.days_remaining = Some(days);
        self
    }
}

/// Game-balance constants for event rolls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnpredictabilityConfig {
    /// Random seed for reproducibility (None = random)
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_no_event_weight")]
    pub no_event_weight: f64,
    #[serde(default = "default_micro_reward_base")]
    pub micro_reward_base: f64,
    #[serde(default = "default_micro_reward_per_streak_day")]
    pub micro_reward_per_streak_day: f64,
    #[serde(default = "default_chaos_quest_base")]
    pub chaos_quest_base: f64,
    #[serde(default = "default_chaos_quest_per_streak_day")]
    pub chaos_quest_per_streak_day: f64,
    #[serde(default = "default_shadow_warning_base")]
    pub shadow_warning_base: f64,
    #[serde(default = "default_shadow_warning_per_miss")]
    pub shadow_warning_per_miss: f64,
    #[serde(default = "default_pattern_break_base")]
    pub pattern_break_base: f64,
    #[serde(default = "default_pattern_break_urgency_bonus")]
    pub pattern_break_urgency_bonus: f64,
    /// `days_remaining` at or below this adds the urgency bonus.
    #[serde(default = "default_urgency_window_days")]
    pub urgency_window_days: u32,
    /// Streak days beyond this stop adding weight.
    #[serde(default = "default_streak_cap")]
    pub streak_cap: u32,
    #[serde(default = "default_micro_reward_xp")]
    pub micro_reward_xp: u64,
    #[serde(default = "default_micro_reward_gold")]
    pub micro_reward_gold: u64,
    /// Probability that a time-of-day event fires in its window.
    #[serde(default = "default_time_event_chance")]
    pub time_event_chance: f64,
    /// Late night is `late_night_start_hour..24` plus `0..late_night_end_hour`.
    #[serde(default = "default_late_night_start_hour")]
    pub late_night_start_hour: u32,
    #[serde(default = "default_late_night_end_hour")]
    pub late_night_end_hour: u32,
    #[serde(default = "default_early_morning_start_hour")]
    pub early_morning_start_hour: u32,
    #[serde(default = "default_early_morning_end_hour")]
    pub early_morning_end_hour: u32,
    #[serde(default = "default_late_night_warning_weight")]
    pub late_night_warning_weight: f64,
    #[serde(default = "default_late_night_pattern_break_weight")]
    pub late_night_pattern_break_weight: f64,
    #[serde(default = "default_early_morning_micro_reward_weight")]
    pub early_morning_micro_reward_weight: f64,
    #[serde(default = "default_early_morning_chaos_quest_weight")]
    pub early_morning_chaos_quest_weight: f64,
    /// Streak needed for a Normal chaos quest.
    #[serde(default = "default_normal_streak")]
    pub normal_streak: u32,
    #[serde(default = "default_hard_streak")]
    pub hard_streak: u32,
    #[serde(default = "default_s_rank_streak")]
    pub s_rank_streak: u32,
}

fn default_no_event_weight() -> f64 {
    60.0
}
fn default_micro_reward_base() -> f64 {
    10.0
}
fn default_micro_reward_per_streak_day() -> f64 {
    0.5
}
fn default_chaos_quest_base() -> f64 {
    2.0
}
fn default_chaos_quest_per_streak_day() -> f64 {
    0.4
}
fn default_shadow_warning_base() -> f64 {
    1.0
}
fn default_shadow_warning_per_miss() -> f64 {
    3.0
}
fn default_pattern_break_base() -> f64 {
    2.0
}
fn default_pattern_break_urgency_bonus() -> f64 {
    6.0
}
fn default_urgency_window_days() -> u32 {
    3
}
fn default_streak_cap() -> u32 {
    30
}
fn default_micro_reward_xp() -> u64 {
    15
}
fn default_micro_reward_gold() -> u64 {
    5
}
fn default_time_event_chance() -> f64 {
    0.1
}
fn default_late_night_start_hour() -> u32 {
    23
}
fn default_late_night_end_hour() -> u32 {
    4
}
fn default_early_morning_start_hour() -> u32 {
    5
}
fn default_early_morning_end_hour() -> u32 {
    8
}
fn default_late_night_warning_weight() -> f64 {
    3.0
}
fn default_late_night_pattern_break_weight() -> f64 {
    1.0
}
fn default_early_morning_micro_reward_weight() -> f64 {
    3.0
}
fn default_early_morning_chaos_quest_weight() -> f64 {
    1.0
}
fn default_normal_streak() -> u32 {
    7
}
fn default_hard_streak() -> u32 {
    14
}
fn default_s_rank_streak() -> u32 {
    30
}

impl Default for UnpredictabilityConfig {
    fn default() -> Self {
        Self {
            seed: None,
            no_event_weight: default_no_event_weight(),
            micro_reward_base: default_micro_reward_base(),
            micro_reward_per_streak_day: default_micro_reward_per_streak_day(),
            chaos_quest_base: default_chaos_quest_base(),
            chaos_quest_per_streak_day: default_chaos_quest_per_streak_day(),
            shadow_warning_base: default_shadow_warning_base(),
            shadow_warning_per_miss: default_shadow_warning_per_miss(),
            pattern_break_base: default_pattern_break_base(),
            pattern_break_urgency_bonus: default_pattern_break_urgency_bonus(),
            urgency_window_days: default_urgency_window_days(),
            streak_cap: default_streak_cap(),
            micro_reward_xp: default_micro_reward_xp(),
            micro_reward_gold: default_micro_reward_gold(),
            time_event_chance: default_time_event_chance(),
            late_night_start_hour: default_late_night_start_hour(),
            late_night_end_hour: default_late_night_end_hour(),
            early_morning_start_hour: default_early_morning_start_hour(),
            early_morning_end_hour: default_early_morning_end_hour(),
            late_night_warning_weight: default_late_night_warning_weight(),
            late_night_pattern_break_weight: default_late_night_pattern_break_weight(),
            early_morning_micro_reward_weight: default_early_morning_micro_reward_weight(),
            early_morning_chaos_quest_weight: default_early_morning_chaos_quest_weight(),
            normal_streak: default_normal_streak(),
            hard_streak: default_hard_streak(),
            s_rank_streak: default_s_rank_streak(),
        }
    }
}

impl UnpredictabilityConfig {
    /// Candidate weights for a habit roll; `None` is "no event".
    pub fn habit_weights(&self, context: &HabitContext) -> Vec<Weighted<Option<EventKind>>> {
        let streak = f64::from(context.streak.min(self.streak_cap));
        let misses = f64::from(context.missed_count_last_7.min(7));
        let urgent = context
            .days_remaining
            .is_some_and(|days| days <= self.urgency_window_days);

        vec![
            Weighted::new(None, self.no_event_weight),
            Weighted::new(
                Some(EventKind::MicroReward),
                self.micro_reward_base + self.micro_reward_per_streak_day * streak,
            ),
            Weighted::new(
                Some(EventKind::ChaosQuest),
                self.chaos_quest_base + self.chaos_quest_per_streak_day * streak,
            ),
            Weighted::new(
                Some(EventKind::ShadowWarning),
                self.shadow_warning_base + self.shadow_warning_per_miss * misses,
            ),
            Weighted::new(
                Some(EventKind::PatternBreak),
                self.pattern_break_base
                    + if urgent { self.pattern_break_urgency_bonus } else { 0.0 },
            ),
        ]
    }

    /// Candidates for the given local hour, or `None` outside any window.
    fn time_weights(&self, hour: u32) -> Option<Vec<Weighted<EventKind>>> {
        let late_night = hour >= self.late_night_start_hour || hour < self.late_night_end_hour;
        let early_morning =
            (self.early_morning_start_hour..self.early_morning_end_hour).contains(&hour);

        if late_night {
            Some(vec![
                Weighted::new(EventKind::ShadowWarning, self.late_night_warning_weight),
                Weighted::new(EventKind::PatternBreak, self.late_night_pattern_break_weight),
            ])
        } else if early_morning {
            Some(vec![
                Weighted::new(EventKind::MicroReward, self.early_morning_micro_reward_weight),
                Weighted::new(EventKind::ChaosQuest, self.early_morning_chaos_quest_weight),
            ])
        } else {
            None
        }
    }

    /// Chaos quest difficulty hint for a streak.
    pub fn difficulty_for_streak(&self, streak: u32) -> Difficulty {
        if streak >= self.s_rank_streak {
            Difficulty::SRank
        } else if streak >= self.hard_streak {
            Difficulty::Hard
        } else if streak >= self.normal_streak {
            Difficulty::Normal
        } else {
            Difficulty::Easy
        }
    }
}

/// Rolls random events from an owned random source.
pub struct UnpredictabilityEngine<R = SeededRandom> {
    config: UnpredictabilityConfig,
    rng: R,
}

impl UnpredictabilityEngine<SeededRandom> {
    /// Engine with default config and an entropy-seeded source.
    pub fn new() -> Self {
        Self::with_config(UnpredictabilityConfig::default())
    }

    /// Engine seeded from `config.seed`.
    pub fn with_config(config: UnpredictabilityConfig) -> Self {
        let rng = SeededRandom::new(config.seed);
        Self { config, rng }
    }
}

impl Default for UnpredictabilityEngine<SeededRandom> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource> UnpredictabilityEngine<R> {
    /// Engine drawing from an injected source.
    pub fn with_rng(config: UnpredictabilityConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &UnpredictabilityConfig {
        &self.config
    }

    /// Roll a streak/miss-driven event for `habit`.
    ///
    /// Consumes exactly one draw.
    pub fn roll_event_for_habit(&mut self, habit: &Habit, context: &HabitContext) -> Option<QuestEvent> {
        let candidates = self.config.habit_weights(context);
        let kind = weighted_pick(&candidates, &mut self.rng).flatten();
        tracing::debug!(
            habit_id = %habit.id,
            streak = context.streak,
            missed = context.missed_count_last_7,
            event = kind.map(|k| k.as_str()),
            "habit roll"
        );
        kind.map(|kind| self.build_habit_event(kind, habit, context))
    }

    /// Roll a time-of-day event.
    ///
    /// Outside the late-night and early-morning windows nothing is drawn.
    /// Inside, one draw decides whether an event fires and a second picks it.
    pub fn roll_time_based_event(&mut self, now: DateTime<Utc>) -> Option<QuestEvent> {
        let hour = now.with_timezone(&Local).hour();
        let candidates = self.config.time_weights(hour)?;

        if self.rng.next_f64() >= self.config.time_event_chance {
            tracing::debug!(hour, "time roll: no event");
            return None;
        }

        let kind = weighted_pick(&candidates, &mut self.rng)?;
        tracing::debug!(hour, event = kind.as_str(), "time roll");
        Some(self.build_time_event(kind, hour))
    }

    fn build_habit_event(&self, kind: EventKind, habit: &Habit, context: &HabitContext) -> QuestEvent {
        match kind {
            EventKind::MicroReward => QuestEvent {
                kind,
                message: format!("Bonus loot for keeping up {}", habit.name),
                reward: Some(MicroReward {
                    xp: self.config.micro_reward_xp,
                    gold: self.config.micro_reward_gold,
                }),
                quest: None,
            },
            EventKind::ChaosQuest => QuestEvent {
                kind,
                message: format!("A chaos gate opened around {}", habit.name),
                reward: None,
                quest: Some(QuestDraft {
                    title: format!("Chaos Quest: {}", habit.name),
                    category: Some(habit.category.clone()),
                    difficulty: Some(self.config.difficulty_for_streak(context.streak)),
                    tags: vec!["chaos".to_string()],
                    xp: None,
                    gold: None,
                }),
            },
            EventKind::ShadowWarning => QuestEvent {
                kind,
                message: format!(
                    "{} slipped {} of the last 7 days",
                    habit.name, context.missed_count_last_7
                ),
                reward: None,
                quest: None,
            },
            EventKind::PatternBreak => QuestEvent {
                kind,
                message: match context.days_remaining {
                    Some(days) => format!("{days} days left: break the pattern on {}", habit.name),
                    None => format!("Break the pattern: do {} somewhere new", habit.name),
                },
                reward: None,
                quest: None,
            },
        }
    }

    fn build_time_event(&self, kind: EventKind, hour: u32) -> QuestEvent {
        match kind {
            EventKind::MicroReward => QuestEvent {
                kind,
                message: format!("Early riser bonus ({hour:02}:00)"),
                reward: Some(MicroReward {
                    xp: self.config.micro_reward_xp,
                    gold: self.config.micro_reward_gold,
                }),
                quest: None,
            },
            EventKind::ChaosQuest => QuestEvent {
                kind,
                message: "A dawn gate opened".to_string(),
                reward: None,
                quest: Some(QuestDraft {
                    title: "Dawn Gate".to_string(),
                    category: None,
                    difficulty: Some(Difficulty::Normal),
                    tags: vec!["chaos".to_string(), "dawn".to_string()],
                    xp: None,
                    gold: None,
                }),
            },
            EventKind::ShadowWarning => QuestEvent {
                kind,
                message: format!("The shadows grow restless at {hour:02}:00. Rest up."),
                reward: None,
                quest: None,
            },
            EventKind::PatternBreak => QuestEvent {
                kind,
                message: "Night owl: try tomorrow's first task tonight".to_string(),
                reward: None,
                quest: None,
            },
        }
    }
}
