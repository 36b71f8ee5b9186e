use super::report_outcome;
use crate::reports::TerminalRenderer;
use clap::Args;
use rankboard::api::{Dashboard, PLAYER_SLOT};
use rankboard::config::Config;
use rankboard::lifecycle::RenderOutcome;

#[derive(Args, Debug, Clone)]
pub struct PlayerArgs {
    #[command(flatten)]
    pub config: Config,

    /// Player name, matched exactly
    pub name: String,
}

pub async fn run(dashboard: &Dashboard<TerminalRenderer>, args: PlayerArgs) {
    println!("\n👤 === PLAYER: {} === 👤", args.name);
    let min = dashboard.config().limits.profile_min_categories;
    let outcome = dashboard.select_player(Some(args.name)).await;
    if outcome == RenderOutcome::NoData {
        println!("   (A profile needs at least {} scoring categories.)", min);
    }
    report_outcome(&PLAYER_SLOT.into(), &outcome);
}
