use clap::Args;
use questlog_core::progression::calculate_boost_value;
use questlog_core::Player;
use serde::Serialize;

use super::print_json;

#[derive(Args)]
pub struct LevelArgs {
    /// Total XP
    #[arg(allow_negative_numbers = true)]
    xp: f64,
    /// Gold balance
    #[arg(long, default_value_t = 0.0)]
    gold: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LevelReport {
    #[serde(flatten)]
    state: questlog_core::ProgressionState,
    color: &'static str,
    boost: f64,
}

pub fn run(args: LevelArgs) -> Result<(), Box<dyn std::error::Error>> {
    let player = Player::from_raw(args.xp, args.gold)?;
    let state = player.state();
    print_json(&LevelReport {
        color: state.color_tier.color(),
        boost: calculate_boost_value(state.level),
        state,
    })
}
