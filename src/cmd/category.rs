use super::report_outcome;
use crate::reports::TerminalRenderer;
use clap::Args;
use rankboard::api::{Dashboard, CATEGORY_SLOT};
use rankboard::config::Config;

#[derive(Args, Debug, Clone)]
pub struct CategoryArgs {
    #[command(flatten)]
    pub config: Config,

    /// Category column to rank; lists the available ones when omitted
    pub name: Option<String>,
}

pub async fn run(dashboard: &Dashboard<TerminalRenderer>, args: CategoryArgs) {
    let Some(name) = args.name else {
        println!("\n📂 Available categories:");
        for category in dashboard.category_options() {
            println!("   - {}", category);
        }
        return;
    };

    println!("\n🔎 === CATEGORY: {} === 🔎", name);
    let outcome = dashboard.select_category(Some(name)).await;
    report_outcome(&CATEGORY_SLOT.into(), &outcome);
}
