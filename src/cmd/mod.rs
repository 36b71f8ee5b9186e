pub mod category;
pub mod charts;
pub mod player;
pub mod report;

use rankboard::lifecycle::{RenderOutcome, SlotKey};

pub fn report_outcome(slot: &SlotKey, outcome: &RenderOutcome) {
    match outcome {
        RenderOutcome::Rendered { .. } | RenderOutcome::Superseded => {}
        RenderOutcome::NoData => println!("\n📭 [{}] No data available.", slot),
        RenderOutcome::Failed(e) => eprintln!("\n❌ [{}] {}", slot, e),
    }
}
