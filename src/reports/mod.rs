use async_trait::async_trait;
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use rankboard::aggregate::{format_compact, SummaryStats};
use rankboard::api::{cell_text, LoadReport};
use rankboard::lifecycle::{
    ChartPayload, RenderError, Series, SlotKey, TablePayload, VisualPayload, VisualRenderer,
};
use rankboard::schema::{display_name, is_core_column};
use std::sync::atomic::{AtomicUsize, Ordering};

const BAR_WIDTH: usize = 30;

/// Prints every payload as an ASCII table. Handles only count what is live.
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    live: AtomicUsize,
}

#[derive(Debug)]
pub struct TerminalHandle {
    pub slot: SlotKey,
}

impl TerminalRenderer {
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

impl Drop for TerminalRenderer {
    fn drop(&mut self) {
        let live = self.live();
        if live > 0 {
            tracing::warn!("{} terminal visuals still live at shutdown", live);
        }
    }
}

#[async_trait]
impl VisualRenderer for TerminalRenderer {
    type Handle = TerminalHandle;

    async fn create(
        &self,
        slot: &SlotKey,
        payload: &VisualPayload,
    ) -> Result<Self::Handle, RenderError> {
        let table = match payload {
            VisualPayload::Chart(chart) => chart_table(chart),
            VisualPayload::Table(data) => record_table(data),
        };
        println!("\n📊 {} [{}]", payload.title(), slot);
        println!("{}", table);
        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(TerminalHandle { slot: slot.clone() })
    }

    fn destroy(&self, handle: Self::Handle) {
        tracing::debug!("Released terminal visual for '{}'", handle.slot);
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(len.max(1))
}

fn chart_table(chart: &ChartPayload) -> Table {
    let mut table = new_table();
    match &chart.series {
        Series::Values(values) => {
            let label_header = if chart.category_label.is_empty() {
                "Label".to_string()
            } else {
                chart.category_label.clone()
            };
            table.set_header(vec![
                Cell::new(label_header).add_attribute(Attribute::Bold),
                Cell::new("Value").add_attribute(Attribute::Bold),
                Cell::new(""),
            ]);
            let max = values.iter().cloned().fold(0.0f64, f64::max);
            for (label, value) in chart.labels.iter().zip(values) {
                table.add_row(vec![
                    Cell::new(label),
                    Cell::new(format_compact(*value)).set_alignment(CellAlignment::Right),
                    Cell::new(bar(*value, max)).fg(Color::Cyan),
                ]);
            }
        }
        Series::Points(points) => {
            table.set_header(vec![
                Cell::new("Player").add_attribute(Attribute::Bold),
                Cell::new("Units").add_attribute(Attribute::Bold),
                Cell::new("Score").add_attribute(Attribute::Bold),
            ]);
            for p in points {
                table.add_row(vec![
                    Cell::new(&p.name),
                    Cell::new(format_compact(p.x)).set_alignment(CellAlignment::Right),
                    Cell::new(format_compact(p.y))
                        .set_alignment(CellAlignment::Right)
                        .fg(Color::Cyan),
                ]);
            }
        }
    }
    table
}

fn record_table(data: &TablePayload) -> Table {
    let mut table = new_table();
    let mut header = vec![Cell::new("#").add_attribute(Attribute::Bold)];
    header.extend(data.visible_columns.iter().map(|c| {
        let cell = Cell::new(display_name(c)).add_attribute(Attribute::Bold);
        if is_core_column(c) {
            cell.fg(Color::Green)
        } else {
            cell
        }
    }));
    table.set_header(header);

    for (rank, record) in data.rows.iter().enumerate() {
        let mut row = vec![Cell::new(rank + 1)];
        row.extend(
            data.visible_columns
                .iter()
                .map(|c| Cell::new(cell_text(record.value(c)))),
        );
        table.add_row(row);
    }

    for i in 2..=data.visible_columns.len() {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
    table
}

pub fn print_summary(stats: &SummaryStats) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Players").add_attribute(Attribute::Bold),
        Cell::new("Total Score").fg(Color::Cyan),
        Cell::new("Total Units"),
        Cell::new("Avg Score"),
        Cell::new("Avg Units"),
    ]);
    table.add_row(vec![
        Cell::new(stats.players),
        Cell::new(format_compact(stats.total_score)).fg(Color::Cyan),
        Cell::new(format_compact(stats.total_units)),
        Cell::new(format_compact(stats.avg_score)),
        Cell::new(format_compact(stats.avg_units)),
    ]);
    println!("\n{}", table);
}

pub fn print_load_report(report: &LoadReport) {
    println!(
        "✅ Loaded {} players with {} rules ({} rows dropped, {} values coerced to 0).",
        report.players,
        report.rules,
        report.dropped,
        report.non_numeric()
    );
    for d in report.diagnostics.iter().take(10) {
        println!("   ⚠️  [Row {}] {}: {}", d.row + 1, d.kind, d.detail);
    }
    if report.diagnostics.len() > 10 {
        println!("   ... {} more", report.diagnostics.len() - 10);
    }
}
