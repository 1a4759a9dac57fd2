//! Turning habit rolls into quests.
//!
//! The linker asks the [`UnpredictabilityEngine`] for a time-of-day event and
//! a habit event, keeps the habit event when both fire, and materializes a
//! [`Quest`] only for chaos quests. Everything else is logged and returned
//! as-is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::habit::Habit;
use crate::quest::{Quest, QuestStatus};
use crate::reward::Difficulty;
use crate::unpredictability::{
    EventKind, HabitContext, QuestDraft, QuestEvent, RandomSource, SeededRandom,
    UnpredictabilityConfig, UnpredictabilityEngine,
};

/// Quest synthesis constants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkerConfig {
    /// XP of a chaos quest at streak multiplier 1.
    #[serde(default = "default_xp_seed")]
    pub xp_seed: f64,
    #[serde(default = "default_min_multiplier")]
    pub min_multiplier: f64,
    #[serde(default = "default_max_multiplier")]
    pub max_multiplier: f64,
    /// Gold per XP.
    #[serde(default = "default_credit_ratio")]
    pub credit_ratio: f64,
    #[serde(default = "default_max_credits")]
    pub max_credits: u64,
    #[serde(default = "default_max_tags")]
    pub max_tags: usize,
}

fn default_xp_seed() -> f64 {
    150.0
}
fn default_min_multiplier() -> f64 {
    0.5
}
fn default_max_multiplier() -> f64 {
    5.0
}
fn default_credit_ratio() -> f64 {
    0.4
}
fn default_max_credits() -> u64 {
    9999
}
fn default_max_tags() -> usize {
    12
}

impl Default for LinkerConfig {
    fn default() -> Self {
        Self {
            xp_seed: default_xp_seed(),
            min_multiplier: default_min_multiplier(),
            max_multiplier: default_max_multiplier(),
            credit_ratio: default_credit_ratio(),
            max_credits: default_max_credits(),
            max_tags: default_max_tags(),
        }
    }
}

impl LinkerConfig {
    /// Streak multiplier clamped into the configured band. NaN counts as the minimum.
    pub fn clamp_multiplier(&self, multiplier: f64) -> f64 {
        if multiplier.is_nan() {
            self.min_multiplier
        } else {
            multiplier.clamp(self.min_multiplier, self.max_multiplier)
        }
    }
}

/// Result of one linking pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LinkOutcome {
    pub event: Option<QuestEvent>,
    pub quest: Option<Quest>,
}

pub struct HabitQuestLinker<R = SeededRandom> {
    engine: UnpredictabilityEngine<R>,
    config: LinkerConfig,
}

impl HabitQuestLinker<SeededRandom> {
    /// Linker with default balance and an entropy-seeded source.
    pub fn new() -> Self {
        Self::with_configs(UnpredictabilityConfig::default(), LinkerConfig::default())
    }

    pub fn with_configs(unpredictability: UnpredictabilityConfig, linker: LinkerConfig) -> Self {
        Self {
            engine: UnpredictabilityEngine::with_config(unpredictability),
            config: linker,
        }
    }
}

impl Default for HabitQuestLinker<SeededRandom> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource> HabitQuestLinker<R> {
    pub fn with_engine(engine: UnpredictabilityEngine<R>, config: LinkerConfig) -> Self {
        Self { engine, config }
    }

    pub fn config(&self) -> &LinkerConfig {
        &self.config
    }

    /// Roll for `habit` and build a quest if a chaos quest comes up.
    ///
    /// The time-of-day roll happens first, then the habit roll; the habit
    /// event wins when both fire.
    pub fn link_habit_to_quest(
        &mut self,
        habit: &Habit,
        context: &HabitContext,
        now: DateTime<Utc>,
        extra_tags: &[String],
    ) -> LinkOutcome {
        let time_event = self.engine.roll_time_based_event(now);
        let habit_event = self.engine.roll_event_for_habit(habit, context);

        let Some(event) = habit_event.or(time_event) else {
            return LinkOutcome::default();
        };

        let quest = match (event.kind, &event.quest) {
            (EventKind::ChaosQuest, Some(draft)) => {
                Some(synthesize_quest(habit, draft, extra_tags, &self.config))
            }
            _ => None,
        };

        match &quest {
            Some(quest) => tracing::info!(
                habit_id = %habit.id,
                quest_id = %quest.id,
                xp = quest.xp,
                gold = quest.gold,
                "chaos quest spawned"
            ),
            None => tracing::info!(
                habit_id = %habit.id,
                event = event.kind.as_str(),
                message = %event.message,
                "habit event"
            ),
        }

        LinkOutcome {
            event: Some(event),
            quest,
        }
    }
}

/// Build a quest from a chaos quest draft.
///
/// `xp = max(1, round(xp_seed * clamped multiplier))` and
/// `gold = clamp(round(xp * credit_ratio), 0, max_credits)`, where explicit
/// draft values win. Gold is derived from the final XP.
pub fn synthesize_quest(
    habit: &Habit,
    draft: &QuestDraft,
    extra_tags: &[String],
    config: &LinkerConfig,
) -> Quest {
    let multiplier = config.clamp_multiplier(habit.streak_multiplier);
    let xp = draft
        .xp
        .unwrap_or_else(|| (config.xp_seed * multiplier).round().max(1.0) as u64);
    let gold = draft.gold.unwrap_or_else(|| {
        ((xp as f64 * config.credit_ratio).round().max(0.0) as u64).min(config.max_credits)
    });

    Quest {
        id: format!("quest-{}", uuid::Uuid::new_v4()),
        title: draft.title.clone(),
        category: draft
            .category
            .clone()
            .unwrap_or_else(|| habit.category.clone()),
        difficulty: draft.difficulty.unwrap_or(Difficulty::Normal),
        xp,
        gold,
        status: QuestStatus::NotStarted,
        tags: merge_tags(
            &[draft.tags.as_slice(), habit.tags.as_slice(), extra_tags],
            config.max_tags,
        ),
        created_from_habit_id: Some(habit.id.clone()),
    }
}

/// Union of tag lists in order, capped at `max` entries.
///
/// Tags are trimmed of surrounding whitespace and blank ones are dropped.
/// Duplicates are detected case-insensitively; the first spelling is kept
/// as written apart from the trim.
pub fn merge_tags(groups: &[&[String]], max: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    groups
        .iter()
        .flat_map(|group| group.iter())
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .filter(|tag| seen.insert(tag.to_lowercase()))
        .take(max)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unpredictability::FixedSequence;
    use chrono::{Local, TimeZone};

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn midday() -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(2024, 6, 3, 13, 0, 0)
            .earliest()
            .unwrap()
            .with_timezone(&Utc)
    }

    fn linker(draws: &[f64]) -> HabitQuestLinker<FixedSequence> {
        HabitQuestLinker::with_engine(
            UnpredictabilityEngine::with_rng(UnpredictabilityConfig::default(), FixedSequence::new(draws.to_vec())),
            LinkerConfig::default(),
        )
    }

    #[test]
    fn merge_tags_dedupes_case_insensitively_and_caps() {
        let event_tags = tags(&["chaos", "Fitness"]);
        let habit_tags = tags(&["fitness", "morning", " "]);
        let extra = tags(&["CHAOS", "bonus"]);
        let merged = merge_tags(&[event_tags.as_slice(), habit_tags.as_slice(), extra.as_slice()], 12);
        assert_eq!(merged, tags(&["chaos", "Fitness", "morning", "bonus"]));

        let many: Vec<String> = (0..20).map(|i| format!("t{i}")).collect();
        assert_eq!(merge_tags(&[many.as_slice()], 12).len(), 12);
    }

    #[test]
    fn merge_tags_trims_but_keeps_case() {
        let padded = tags(&[" Night Owl ", "night owl", "\tDawn"]);
        assert_eq!(merge_tags(&[padded.as_slice()], 12), tags(&["Night Owl", "Dawn"]));
    }

    #[test]
    fn synthesized_xp_scales_with_clamped_multiplier() {
        let config = LinkerConfig::default();
        let draft = QuestDraft { title: "Chaos".into(), ..Default::default() };

        let habit = Habit::new("Run", "fitness").with_streak_multiplier(2.0);
        let quest = synthesize_quest(&habit, &draft, &[], &config);
        assert_eq!(quest.xp, 300);
        assert_eq!(quest.gold, 120);

        let habit = habit.with_streak_multiplier(50.0);
        assert_eq!(synthesize_quest(&habit, &draft, &[], &config).xp, 750);

        let habit = habit.with_streak_multiplier(0.0);
        assert_eq!(synthesize_quest(&habit, &draft, &[], &config).xp, 75);

        let habit = habit.with_streak_multiplier(f64::NAN);
        assert_eq!(synthesize_quest(&habit, &draft, &[], &config).xp, 75);
    }

    #[test]
    fn xp_never_drops_below_one_and_gold_is_capped() {
        let config = LinkerConfig { xp_seed: 0.0, ..Default::default() };
        let draft = QuestDraft { title: "Chaos".into(), ..Default::default() };
        let habit = Habit::new("Run", "fitness");
        let quest = synthesize_quest(&habit, &draft, &[], &config);
        assert_eq!(quest.xp, 1);
        assert_eq!(quest.gold, 0);

        let config = LinkerConfig { xp_seed: 100_000.0, ..Default::default() };
        let quest = synthesize_quest(&habit, &draft, &[], &config);
        assert_eq!(quest.gold, 9999);
    }

    #[test]
    fn explicit_draft_values_take_precedence() {
        let draft = QuestDraft {
            title: "Boss rush".into(),
            category: Some("special".into()),
            difficulty: Some(Difficulty::SRank),
            xp: Some(999),
            gold: Some(1),
            ..Default::default()
        };
        let habit = Habit::new("Run", "fitness").with_streak_multiplier(3.0);
        let quest = synthesize_quest(&habit, &draft, &[], &LinkerConfig::default());
        assert_eq!(quest.xp, 999);
        assert_eq!(quest.gold, 1);
        assert_eq!(quest.category, "special");
        assert_eq!(quest.difficulty, Difficulty::SRank);
    }

    #[test]
    fn gold_follows_overridden_xp() {
        let draft = QuestDraft { title: "x".into(), xp: Some(1000), ..Default::default() };
        let quest = synthesize_quest(&Habit::new("Run", "fitness"), &draft, &[], &LinkerConfig::default());
        assert_eq!(quest.gold, 400);
    }

    #[test]
    fn no_event_returns_nothing() {
        let habit = Habit::new("Run", "fitness");
        let outcome = linker(&[0.0]).link_habit_to_quest(&habit, &HabitContext::default(), midday(), &[]);
        assert_eq!(outcome, LinkOutcome::default());
    }

    #[test]
    fn chaos_roll_materializes_a_quest() {
        let habit = Habit::new("Run", "fitness").with_tags(["outdoors", "Chaos"]);
        let context = HabitContext { streak: 14, ..Default::default() };
        let outcome = linker(&[80.0 / 87.6]).link_habit_to_quest(&habit, &context, midday(), &tags(&["weekend"]));

        let event = outcome.event.unwrap();
        assert_eq!(event.kind, EventKind::ChaosQuest);
        let quest = outcome.quest.unwrap();
        assert_eq!(quest.status, QuestStatus::NotStarted);
        assert_eq!(quest.created_from_habit_id.as_deref(), Some(habit.id.as_str()));
        assert_eq!(quest.category, "fitness");
        assert_eq!(quest.difficulty, Difficulty::Hard);
        assert_eq!(quest.xp, 150);
        assert_eq!(quest.gold, 60);
        assert_eq!(quest.tags, tags(&["chaos", "outdoors", "weekend"]));
    }

    #[test]
    fn non_quest_events_never_produce_quests() {
        let habit = Habit::new("Run", "fitness");
        // of 75: micro [60, 70), warning [72, 73), pattern_break [73, 75)
        for draw in [65.0 / 75.0, 72.5 / 75.0, 0.99] {
            let outcome = linker(&[draw]).link_habit_to_quest(&habit, &HabitContext::default(), midday(), &[]);
            let event = outcome.event.unwrap();
            assert_ne!(event.kind, EventKind::ChaosQuest);
            assert!(outcome.quest.is_none());
        }
    }
}
