use super::LabeledSeries;
use crate::records::ProcessedRecord;
use crate::schema::display_name;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Accumulates per-category values in first-seen order.
#[derive(Default)]
struct CategoryAccumulator {
    index: HashMap<String, usize>,
    entries: Vec<(String, f64)>,
}

impl CategoryAccumulator {
    fn add(&mut self, key: &str, amount: f64) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 += amount,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), amount));
            }
        }
    }

    /// Largest first; equal totals keep first-seen order.
    fn into_sorted(self) -> Vec<(String, f64)> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        entries
    }
}

/// Donut data: each category's positive total, top `top_n`, remainder folded
/// into an `others_label` slice when it is above zero.
pub fn top_category_totals(
    records: &[ProcessedRecord],
    top_n: usize,
    others_label: &str,
) -> LabeledSeries {
    let mut acc = CategoryAccumulator::default();
    for record in records {
        for (key, value) in record.categories() {
            if *value > 0.0 {
                acc.add(key, *value);
            }
        }
    }

    let sorted = acc.into_sorted();
    let split = top_n.min(sorted.len());
    let others: f64 = sorted[split..].iter().map(|(_, v)| v).sum();

    let mut series = LabeledSeries::default();
    for (key, total) in &sorted[..split] {
        series.push(display_name(key), *total);
    }
    if others > 0.0 {
        series.push(others_label, others);
    }
    series
}

/// Horizontal-bar data: how many players have a positive value per
/// category. Top `top_n` by count, then reversed so the largest is last.
pub fn category_frequency(records: &[ProcessedRecord], top_n: usize) -> LabeledSeries {
    let mut acc = CategoryAccumulator::default();
    for record in records {
        for (key, value) in record.categories() {
            if *value > 0.0 {
                acc.add(key, 1.0);
            }
        }
    }

    let mut top = acc.into_sorted();
    top.truncate(top_n);
    top.reverse();

    let mut series = LabeledSeries::default();
    for (key, count) in top {
        series.push(display_name(&key), count);
    }
    series
}
