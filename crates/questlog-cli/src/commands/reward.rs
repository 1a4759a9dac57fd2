use clap::Args;
use questlog_core::calculate_rewards;

use super::print_json;

#[derive(Args)]
pub struct RewardArgs {
    /// Start time (ISO 8601, e.g. "2024-01-01T08:00:00Z")
    #[arg(long)]
    start: String,
    /// End time (ISO 8601)
    #[arg(long)]
    end: String,
    /// Difficulty: Easy, Normal, Hard or S-Rank (unknown values count as Easy)
    #[arg(long, default_value = "Normal")]
    difficulty: String,
    /// Streak multiplier
    #[arg(long, default_value_t = 1.0)]
    multiplier: f64,
}

pub fn run(args: RewardArgs) -> Result<(), Box<dyn std::error::Error>> {
    let rewards = calculate_rewards(&args.start, &args.end, &args.difficulty, args.multiplier)?;
    print_json(&rewards)
}
