//! Level curve, rank and color tier tables, and the player's progression state.
//!
//! ## XP Curve
//!
//! `level = floor(sqrt(xp / 100)) + 1`, so level L starts at
//! `(L - 1)^2 * 100` XP:
//! - Level 1: 0 XP
//! - Level 2: 100 XP
//! - Level 6: 2,500 XP
//! - Level 11: 10,000 XP

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::task::Task;

/// XP scale of the level curve.
pub const XP_CURVE_SCALE: u64 = 100;
/// Highest level covered by the color tier bands.
pub const MAX_TIER_LEVEL: u32 = 100;
/// Boost gained per level above 1.
pub const BOOST_PER_LEVEL: f64 = 0.2;

/// Player rank, a display band derived from level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    #[serde(rename = "E-Rank")]
    E,
    #[serde(rename = "D-Rank")]
    D,
    #[serde(rename = "C-Rank")]
    C,
    #[serde(rename = "B-Rank")]
    B,
    #[serde(rename = "A-Rank")]
    A,
    #[serde(rename = "S-Rank")]
    S,
    #[serde(rename = "National Level")]
    National,
}

/// (minimum level, rank), ascending.
pub const RANK_TABLE: &[(u32, Rank)] = &[
    (1, Rank::E),
    (10, Rank::D),
    (20, Rank::C),
    (35, Rank::B),
    (50, Rank::A),
    (70, Rank::S),
    (90, Rank::National),
];

impl Rank {
    pub fn name(&self) -> &'static str {
        match self {
            Rank::E => "E-Rank",
            Rank::D => "D-Rank",
            Rank::C => "C-Rank",
            Rank::B => "B-Rank",
            Rank::A => "A-Rank",
            Rank::S => "S-Rank",
            Rank::National => "National Level",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Color tier, a display band with its own color.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ColorTier {
    Gray,
    Green,
    Blue,
    Purple,
    Orange,
    Red,
    Gold,
}

/// Color tier bands: (tier, min level, max level, display color).
///
/// Bands are contiguous and cover 1..=100.
pub const COLOR_TIER_TABLE: &[(ColorTier, u32, u32, &str)] = &[
    (ColorTier::Gray, 1, 9, "#9ca3af"),
    (ColorTier::Green, 10, 19, "#22c55e"),
    (ColorTier::Blue, 20, 34, "#3b82f6"),
    (ColorTier::Purple, 35, 49, "#a855f7"),
    (ColorTier::Orange, 50, 69, "#f97316"),
    (ColorTier::Red, 70, 89, "#ef4444"),
    (ColorTier::Gold, 90, 100, "#eab308"),
];

impl ColorTier {
    fn band(&self) -> (ColorTier, u32, u32, &'static str) {
        COLOR_TIER_TABLE
            .iter()
            .copied()
            .find(|(tier, ..)| tier == self)
            .unwrap_or(COLOR_TIER_TABLE[0])
    }

    pub fn min_level(&self) -> u32 {
        self.band().1
    }

    pub fn max_level(&self) -> u32 {
        self.band().2
    }

    /// Hex display color.
    pub fn color(&self) -> &'static str {
        self.band().3
    }
}

/// Integer square root, exact for all `u64`.
fn isqrt(n: u64) -> u64 {
    let mut root = (n as f64).sqrt() as u64;
    while root.checked_mul(root).map_or(true, |sq| sq > n) {
        root -= 1;
    }
    while (root + 1).checked_mul(root + 1).is_some_and(|sq| sq <= n) {
        root += 1;
    }
    root
}

/// Level reached with `xp` total experience.
pub fn level_for_xp(xp: u64) -> u32 {
    let level = isqrt(xp / XP_CURVE_SCALE) + 1;
    u32::try_from(level).unwrap_or(u32::MAX)
}

/// Level for an untyped XP amount, as received from storage or a form.
///
/// Fractional XP is floored. Negative or NaN XP is rejected rather than
/// clamped so a corrupted record surfaces instead of silently resetting.
pub fn level_for_raw_xp(xp: f64) -> Result<u32, ValidationError> {
    if xp.is_nan() || xp < 0.0 {
        return Err(ValidationError::NegativeXp(xp));
    }
    Ok(level_for_xp(xp.floor() as u64))
}

/// Minimum XP to start `level`. Levels below 1 are treated as 1.
pub fn xp_for_level(level: u32) -> u64 {
    let steps = u64::from(level.max(1) - 1);
    steps.saturating_mul(steps).saturating_mul(XP_CURVE_SCALE)
}

/// Minimum XP to start `level + 1`.
pub fn xp_for_next_level(level: u32) -> u64 {
    let level = u64::from(level.max(1));
    level.saturating_mul(level).saturating_mul(XP_CURVE_SCALE)
}

/// Fraction (0.0..1.0) of the way from the current level to the next.
pub fn level_progress(xp: u64) -> f64 {
    let level = level_for_xp(xp);
    let floor = xp_for_level(level);
    let span = xp_for_next_level(level).saturating_sub(floor);
    if span == 0 {
        return 0.0;
    }
    (xp - floor) as f64 / span as f64
}

/// Rank for a level: the highest threshold not above it.
pub fn rank_for_level(level: u32) -> Rank {
    RANK_TABLE
        .iter()
        .rev()
        .find(|(min_level, _)| *min_level <= level)
        .map(|(_, rank)| *rank)
        .unwrap_or(Rank::E)
}

/// Color tier for a level, clamped into 1..=100.
pub fn color_tier_for_level(level: u32) -> ColorTier {
    let level = level.clamp(1, MAX_TIER_LEVEL);
    COLOR_TIER_TABLE
        .iter()
        .rev()
        .find(|(_, min_level, ..)| *min_level <= level)
        .map(|(tier, ..)| *tier)
        .unwrap_or(ColorTier::Gray)
}

/// Boost value for vision/equipment tiers: `1.0 + (level - 1) * 0.2`,
/// rounded to 2 decimals.
pub fn calculate_boost_value(level: u32) -> f64 {
    let raw = 1.0 + (f64::from(level) - 1.0) * BOOST_PER_LEVEL;
    (raw * 100.0).round() / 100.0
}

/// Everything derived from a player's XP, ready for display.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionState {
    pub xp: u64,
    pub gold: u64,
    pub level: u32,
    pub rank: Rank,
    pub color_tier: ColorTier,
    pub xp_for_next_level: u64,
    pub level_progress: f64,
}

impl ProgressionState {
    pub fn from_xp(xp: u64, gold: u64) -> Self {
        let level = level_for_xp(xp);
        Self {
            xp,
            gold,
            level,
            rank: rank_for_level(level),
            color_tier: color_tier_for_level(level),
            xp_for_next_level: xp_for_next_level(level),
            level_progress: level_progress(xp),
        }
    }
}

/// Player currencies. Level, rank and tier are always derived.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub xp: u64,
    pub gold: u64,
}

impl Player {
    pub fn new(xp: u64, gold: u64) -> Self {
        Self { xp, gold }
    }

    /// Build from untyped storage values, rejecting negative amounts.
    pub fn from_raw(xp: f64, gold: f64) -> Result<Self, ValidationError> {
        if xp.is_nan() || xp < 0.0 {
            return Err(ValidationError::NegativeXp(xp));
        }
        if gold.is_nan() || gold < 0.0 {
            return Err(ValidationError::invalid_value(
                "gold",
                format!("must be non-negative, got {gold}"),
            ));
        }
        Ok(Self::new(xp.floor() as u64, gold.floor() as u64))
    }

    pub fn level(&self) -> u32 {
        level_for_xp(self.xp)
    }

    pub fn rank(&self) -> Rank {
        rank_for_level(self.level())
    }

    pub fn color_tier(&self) -> ColorTier {
        color_tier_for_level(self.level())
    }

    pub fn state(&self) -> ProgressionState {
        ProgressionState::from_xp(self.xp, self.gold)
    }

    /// Add XP and gold.
    pub fn award(&self, xp: u64, gold: u64) -> Player {
        Player {
            xp: self.xp.saturating_add(xp),
            gold: self.gold.saturating_add(gold),
        }
    }

    /// Remove XP, clamped at zero.
    pub fn debit_xp(&self, amount: u64) -> Player {
        Player {
            xp: self.xp.saturating_sub(amount),
            gold: self.gold,
        }
    }

    /// Spend gold, clamped at zero.
    pub fn spend_gold(&self, amount: u64) -> Player {
        Player {
            xp: self.xp,
            gold: self.gold.saturating_sub(amount),
        }
    }

    /// Complete `task` and collect its rewards.
    ///
    /// Completing an already-completed task changes nothing.
    pub fn complete_task(&self, task: &Task) -> (Player, Task) {
        if task.completed {
            return (*self, task.clone());
        }
        let player = self.award(task.xp_reward, task.gold_reward);
        (player, task.mark_completed())
    }
}
