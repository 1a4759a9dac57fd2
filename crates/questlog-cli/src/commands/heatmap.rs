use clap::Args;
use questlog_core::{build_heatmap, ActivityLog, BalanceConfig};
use std::collections::HashMap;

use super::{print_json, resolve_today};

#[derive(Args)]
pub struct HeatmapArgs {
    /// Completion dates (YYYY-MM-DD, comma separated)
    #[arg(long, value_delimiter = ',', conflicts_with = "counts")]
    dates: Vec<String>,
    /// Per-day counts as a JSON object, e.g. '{"2024-06-01": 3}'
    #[arg(long)]
    counts: Option<String>,
    /// Number of weeks to show (defaults to heatmap.default_weeks)
    #[arg(long)]
    weeks: Option<u32>,
    /// Reference date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    today: Option<String>,
    /// Print an ASCII grid instead of JSON
    #[arg(long)]
    ascii: bool,
}

pub fn run(args: HeatmapArgs) -> Result<(), Box<dyn std::error::Error>> {
    let today = resolve_today(args.today.as_deref())?;
    let log = match &args.counts {
        Some(raw) => {
            let counts: HashMap<String, u32> = serde_json::from_str(raw)?;
            ActivityLog::from_counts(&counts)?
        }
        None => ActivityLog::from_dates(&args.dates)?,
    };
    let weeks = match args.weeks {
        Some(weeks) => weeks,
        None => BalanceConfig::load_or_default().heatmap.default_weeks,
    };

    let heatmap = build_heatmap(&log, weeks, today);
    if args.ascii {
        print!("{}", heatmap.render_ascii());
        return Ok(());
    }
    print_json(&heatmap)
}
