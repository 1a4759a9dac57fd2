//! # Questlog Core Library
//!
//! This library provides the reward, progression and habit-quest logic for
//! Questlog, a gamified to-do tracker. Every engine is a local computation over
//! plain values: callers hand in tasks, habits and completion dates and get new
//! values back. The CLI binary and any frontend are thin layers over the same
//! functions.
//!
//! ## Architecture
//!
//! - **Rewards**: XP and gold for a scheduled task from its duration,
//!   difficulty and streak multiplier
//! - **Progression**: the XP curve, levels, ranks and color tiers
//! - **Heatmap**: per-day activity windows, streaks and summary stats
//! - **Unpredictability**: weighted random events driven by habit state and the
//!   time of day, with an injectable random source
//! - **Linker**: turns chaos events into concrete quests
//! - **Shadows**: companions unlocked by category streaks
//!
//! ## Key Components
//!
//! - [`calculate_rewards`]: Task rewards from ISO timestamps
//! - [`Player`]: XP and gold balance with derived level and rank
//! - [`build_heatmap`]: Activity heatmap for the trailing weeks
//! - [`UnpredictabilityEngine`]: Event rolls
//! - [`HabitQuestLinker`]: Habit-to-quest synthesis
//! - [`BalanceConfig`]: Tunable game-balance constants

pub mod calendar;
pub mod config;
pub mod error;
pub mod gate;
pub mod habit;
pub mod heatmap;
pub mod linker;
pub mod progression;
pub mod quest;
pub mod reward;
pub mod shadow;
pub mod task;
pub mod unpredictability;

pub use config::{BalanceConfig, HeatmapConfig};
pub use error::{ConfigError, CoreError, ValidationError};
pub use gate::{Gate, GateDay};
pub use habit::Habit;
pub use heatmap::{build_heatmap, current_streak, longest_streak, ActivityLog, Heatmap, HeatmapCell};
pub use linker::{HabitQuestLinker, LinkOutcome, LinkerConfig};
pub use progression::{level_for_xp, xp_for_level, ColorTier, Player, ProgressionState, Rank};
pub use quest::{Quest, QuestStatus};
pub use reward::{calculate_rewards, Difficulty, Rewards};
pub use shadow::{Companion, CompanionBonus, UnlockRule};
pub use task::Task;
pub use unpredictability::{
    EventKind, FixedSequence, HabitContext, QuestEvent, RandomSource, SeededRandom,
    UnpredictabilityConfig, UnpredictabilityEngine,
};
