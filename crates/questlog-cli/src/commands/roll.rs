use chrono::Utc;
use clap::Args;
use questlog_core::calendar::{parse_calendar_date, parse_instant};
use questlog_core::{BalanceConfig, Habit, HabitContext, HabitQuestLinker};
use std::collections::BTreeSet;

use super::{print_json, resolve_today};

#[derive(Args)]
pub struct RollArgs {
    /// Habit name
    #[arg(long)]
    name: String,
    /// Habit category
    #[arg(long, default_value = "general")]
    category: String,
    /// Completion dates (YYYY-MM-DD, comma separated)
    #[arg(long, value_delimiter = ',')]
    dates: Vec<String>,
    /// Habit streak multiplier
    #[arg(long, default_value_t = 1.0)]
    multiplier: f64,
    /// Habit tag (repeatable)
    #[arg(long = "habit-tag")]
    habit_tags: Vec<String>,
    /// Extra tag for a spawned quest (repeatable)
    #[arg(long = "tag")]
    tags: Vec<String>,
    /// Days left in the habit's current goal
    #[arg(long)]
    days_remaining: Option<u32>,
    /// Random seed (overrides unpredictability.seed)
    #[arg(long)]
    seed: Option<u64>,
    /// Reference date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    today: Option<String>,
    /// Roll time (ISO 8601), defaults to now
    #[arg(long)]
    now: Option<String>,
}

pub fn run(args: RollArgs) -> Result<(), Box<dyn std::error::Error>> {
    let today = resolve_today(args.today.as_deref())?;
    let now = match &args.now {
        Some(raw) => parse_instant("now", raw)?,
        None => Utc::now(),
    };

    let dates = args
        .dates
        .iter()
        .map(|raw| parse_calendar_date(raw))
        .collect::<Result<BTreeSet<_>, _>>()?;
    let mut habit = Habit::new(args.name, args.category)
        .with_tags(args.habit_tags)
        .with_streak_multiplier(args.multiplier);
    for date in dates {
        habit = habit.toggle_completion(date, today)?;
    }

    let mut context = HabitContext::from_habit(&habit, today);
    context.days_remaining = args.days_remaining;

    let mut config = BalanceConfig::load_or_default();
    if args.seed.is_some() {
        config.unpredictability.seed = args.seed;
    }

    let mut linker = HabitQuestLinker::with_configs(config.unpredictability, config.linker);
    let outcome = linker.link_habit_to_quest(&habit, &context, now, &args.tags);
    print_json(&outcome)
}
