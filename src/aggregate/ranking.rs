use super::{LabeledSeries, ScatterPoint};
use crate::records::ProcessedRecord;
use crate::schema::display_name;
use std::cmp::Ordering;

/// Best players in one category: positive values only, largest first.
pub fn category_ranking<'a>(
    records: &'a [ProcessedRecord],
    category: &str,
    top_n: usize,
) -> Vec<&'a ProcessedRecord> {
    let mut ranked: Vec<&ProcessedRecord> = records
        .iter()
        .filter(|r| r.category(category).is_some_and(|v| v > 0.0))
        .collect();
    ranked.sort_by(|a, b| {
        let va = a.category(category).unwrap_or(0.0);
        let vb = b.category(category).unwrap_or(0.0);
        vb.partial_cmp(&va).unwrap_or(Ordering::Equal)
    });
    ranked.truncate(top_n);
    ranked
}

/// Bar data for a category ranking: player names against their value.
pub fn ranking_series(ranked: &[&ProcessedRecord], category: &str) -> LabeledSeries {
    let mut series = LabeledSeries::default();
    for record in ranked {
        series.push(record.name(), record.category(category).unwrap_or(0.0));
    }
    series
}

pub fn top_by_units(records: &[ProcessedRecord], top_n: usize) -> Vec<&ProcessedRecord> {
    let mut ranked: Vec<&ProcessedRecord> = records.iter().collect();
    ranked.sort_by(|a, b| {
        b.unit_count()
            .partial_cmp(&a.unit_count())
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(top_n);
    ranked
}

/// Radar data for one player: their strongest categories.
pub fn player_profile(record: &ProcessedRecord, top_n: usize) -> LabeledSeries {
    let mut series = LabeledSeries::default();
    for (key, value) in record.ranked_categories().into_iter().take(top_n) {
        series.push(display_name(key), value);
    }
    series
}

/// Units (x) against score (y), skipping players with neither.
pub fn score_vs_units(records: &[ProcessedRecord]) -> Vec<ScatterPoint> {
    records
        .iter()
        .map(|r| ScatterPoint {
            x: r.unit_count(),
            y: r.total_score(),
            name: r.name().to_string(),
        })
        .filter(|p| p.x > 0.0 || p.y > 0.0)
        .collect()
}
