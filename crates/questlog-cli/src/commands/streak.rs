use clap::Args;
use questlog_core::heatmap::longest_streak_from_dates;
use questlog_core::{current_streak, ActivityLog};
use serde::Serialize;

use super::{print_json, resolve_today};

#[derive(Args)]
pub struct StreakArgs {
    /// Completion dates (YYYY-MM-DD, comma separated)
    #[arg(long, value_delimiter = ',')]
    dates: Vec<String>,
    /// Reference date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    today: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StreakReport {
    current: u32,
    longest: u32,
    active_days: usize,
}

pub fn run(args: StreakArgs) -> Result<(), Box<dyn std::error::Error>> {
    let today = resolve_today(args.today.as_deref())?;
    let log = ActivityLog::from_dates(&args.dates)?;
    print_json(&StreakReport {
        current: current_streak(&log, today),
        longest: longest_streak_from_dates(&log),
        active_days: log.active_days(),
    })
}
