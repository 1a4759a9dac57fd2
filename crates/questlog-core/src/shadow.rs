//! Shadow companions unlocked by category streaks.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Required category reserved for the weekly-perfection rule.
pub const PERFECT_WEEK_CATEGORY: &str = "perfect_week";

/// How a companion is unlocked.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UnlockRule {
    /// Streak in `required_category` reaches `required_streak_days`.
    #[default]
    CategoryStreak,
    /// Not implemented: never unlocks. The weekly-perfection rule has no
    /// agreed definition yet.
    PerfectWeek,
}

/// Bonus granted while a companion is unlocked.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CompanionBonus {
    /// Percentage added to XP rewards in the companion's category.
    XpPercent(f64),
    /// Percentage added to gold rewards.
    GoldPercent(f64),
    /// Missed days forgiven per week.
    StreakShield(u32),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Companion {
    pub id: String,
    pub name: String,
    pub required_category: String,
    pub required_streak_days: u32,
    #[serde(default)]
    pub rule: UnlockRule,
    pub bonus: CompanionBonus,
}

impl Companion {
    pub fn category_streak(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        days: u32,
        bonus: CompanionBonus,
    ) -> Self {
        Companion {
            id: id.into(),
            name: name.into(),
            required_category: category.into(),
            required_streak_days: days,
            rule: UnlockRule::CategoryStreak,
            bonus,
        }
    }
}

/// Whether `companion` is unlocked for the given per-category streaks.
///
/// A category missing from `category_streaks` counts as a streak of 0.
/// The `perfect_week` category never unlocks, whatever the rule says.
pub fn is_unlocked(companion: &Companion, category_streaks: &HashMap<String, u32>) -> bool {
    if companion.required_category == PERFECT_WEEK_CATEGORY {
        return false;
    }
    match companion.rule {
        UnlockRule::CategoryStreak => {
            let streak = category_streaks
                .get(&companion.required_category)
                .copied()
                .unwrap_or(0);
            streak >= companion.required_streak_days
        }
        UnlockRule::PerfectWeek => false,
    }
}

/// Companions from `roster` that are currently unlocked, in roster order.
pub fn unlocked_roster<'a>(
    roster: &'a [Companion],
    category_streaks: &HashMap<String, u32>,
) -> Vec<&'a Companion> {
    roster
        .iter()
        .filter(|c| is_unlocked(c, category_streaks))
        .collect()
}

/// The built-in companion roster.
pub fn default_roster() -> Vec<Companion> {
    vec![
        Companion::category_streak("vanguard", "Vanguard", "fitness", 7, CompanionBonus::XpPercent(10.0)),
        Companion::category_streak("scholar", "Scholar", "study", 7, CompanionBonus::XpPercent(10.0)),
        Companion::category_streak("sentinel", "Sentinel", "mind", 14, CompanionBonus::StreakShield(1)),
        Companion::category_streak("merchant", "Merchant", "work", 21, CompanionBonus::GoldPercent(15.0)),
        Companion {
            id: "sovereign".to_string(),
            name: "Sovereign".to_string(),
            required_category: PERFECT_WEEK_CATEGORY.to_string(),
            required_streak_days: 7,
            rule: UnlockRule::PerfectWeek,
            bonus: CompanionBonus::XpPercent(25.0),
        },
    ]
}
