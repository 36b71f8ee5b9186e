use super::report_outcome;
use crate::reports::{self, TerminalRenderer};
use clap::Args;
use rankboard::api::Dashboard;
use rankboard::config::Config;
use rankboard::error::BoardResult;
use rankboard::state::View;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub config: Config,

    /// Show the detailed table with these category columns added
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,

    /// Write the filtered, sorted view to a CSV file
    #[arg(short, long)]
    pub export: Option<PathBuf>,
}

pub async fn run(dashboard: &Dashboard<TerminalRenderer>, args: ReportArgs) -> BoardResult<()> {
    println!("\n🏆 === PLAYER RANKING === 🏆");
    reports::print_summary(&dashboard.summary());

    let view = if args.columns.is_empty() {
        View::Ranking
    } else {
        for column in &args.columns {
            if !dashboard.toggle_column(column.trim()) {
                eprintln!("⚠️  Column '{}' not shown.", column);
            }
        }
        View::Detailed
    };

    for (slot, outcome) in dashboard.switch_view(view).await {
        report_outcome(&slot, &outcome);
    }

    if let Some(path) = &args.export {
        let rows = dashboard.export_view_to_path(path)?;
        println!("💾 Exported {} rows to {}", rows, path.display());
    }
    Ok(())
}
