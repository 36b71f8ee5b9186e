use super::report_outcome;
use crate::reports::TerminalRenderer;
use clap::Args;
use rankboard::api::{Dashboard, MODAL_SLOT};
use rankboard::config::Config;
use rankboard::lifecycle::ChartKind;
use rankboard::state::View;

#[derive(Args, Debug, Clone)]
pub struct ChartsArgs {
    #[command(flatten)]
    pub config: Config,

    /// Also show one chart expanded (e.g. top-sources, score-vs-units)
    #[arg(long)]
    pub expand: Option<ChartKind>,
}

pub async fn run(dashboard: &Dashboard<TerminalRenderer>, args: ChartsArgs) {
    println!("\n📈 === DASHBOARD === 📈");
    for (slot, outcome) in dashboard.switch_view(View::Dashboard).await {
        report_outcome(&slot, &outcome);
    }

    if let Some(kind) = args.expand {
        let outcome = dashboard.open_modal(kind).await;
        report_outcome(&MODAL_SLOT.into(), &outcome);
        dashboard.close_modal();
    }
}
