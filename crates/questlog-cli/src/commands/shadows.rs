use clap::Args;
use questlog_core::shadow::{default_roster, is_unlocked};
use questlog_core::Companion;
use serde::Serialize;
use std::collections::HashMap;

use super::print_json;

#[derive(Args)]
pub struct ShadowsArgs {
    /// Category streak as CATEGORY=DAYS (repeatable)
    #[arg(long = "streak", value_parser = parse_category_streak)]
    streaks: Vec<(String, u32)>,
    /// Only list unlocked companions
    #[arg(long)]
    unlocked: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CompanionStatus {
    #[serde(flatten)]
    companion: Companion,
    unlocked: bool,
}

fn parse_category_streak(raw: &str) -> Result<(String, u32), String> {
    let (category, days) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected CATEGORY=DAYS, got {raw:?}"))?;
    let days = days
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid streak days {days:?}: {e}"))?;
    Ok((category.trim().to_string(), days))
}

pub fn run(args: ShadowsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let streaks: HashMap<String, u32> = args.streaks.into_iter().collect();
    let statuses: Vec<CompanionStatus> = default_roster()
        .into_iter()
        .map(|companion| CompanionStatus {
            unlocked: is_unlocked(&companion, &streaks),
            companion,
        })
        .filter(|status| !args.unlocked || status.unlocked)
        .collect();
    print_json(&statuses)
}
