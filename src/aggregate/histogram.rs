use super::trim_decimal;
use crate::records::ProcessedRecord;
use serde::Serialize;

// (exclusive lower threshold on the max score, bracket width), widest first
const WIDTH_TABLE: [(f64, f64); 7] = [
    (1_000_000.0, 200_000.0),
    (500_000.0, 100_000.0),
    (100_000.0, 50_000.0),
    (20_000.0, 10_000.0),
    (5_000.0, 2_500.0),
    (1_000.0, 1_000.0),
    (100.0, 100.0),
];

/// Upper bound on the number of brackets. Past it, brackets widen instead
/// of multiplying.
pub const MAX_BRACKETS: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bracket {
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl Bracket {
    pub fn label(&self) -> String {
        format!(
            "{}k-{}k",
            trim_decimal(self.min / 1000.0, 3),
            trim_decimal(self.max / 1000.0, 3)
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Histogram {
    pub width: f64,
    pub brackets: Vec<Bracket>,
}

impl Histogram {
    pub fn labels(&self) -> Vec<String> {
        self.brackets.iter().map(Bracket::label).collect()
    }

    pub fn counts(&self) -> Vec<f64> {
        self.brackets.iter().map(|b| b.count as f64).collect()
    }

    pub fn total(&self) -> usize {
        self.brackets.iter().map(|b| b.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }
}

/// Bracket width for a given maximum score. Narrows as the maximum shrinks;
/// at or below 100 it is `max(10, ceil(max / 10))`. Widened when the table
/// width would need more than [`MAX_BRACKETS`] brackets.
pub fn bracket_width(max_score: f64) -> f64 {
    let width = WIDTH_TABLE
        .iter()
        .find(|(threshold, _)| max_score > *threshold)
        .map(|(_, width)| *width)
        .unwrap_or_else(|| (max_score / 10.0).ceil().max(10.0));

    let limit = MAX_BRACKETS as f64;
    if max_score / width > limit {
        (max_score / limit).ceil()
    } else {
        width
    }
}

/// Score distribution. Every record lands in exactly one bracket: the last
/// bracket is open-ended upward, and negative scores fall into the first.
///
/// Only finite scores size the brackets. A score that overflowed to
/// infinity still lands in the last bracket; NaN lands in the first.
pub fn score_histogram(records: &[ProcessedRecord]) -> Histogram {
    if records.is_empty() {
        return Histogram::default();
    }

    let max_score = records
        .iter()
        .map(|r| r.total_score())
        .filter(|s| s.is_finite())
        .fold(0.0f64, f64::max);
    let width = bracket_width(max_score);
    let num_brackets = ((max_score / width).ceil() as usize).clamp(1, MAX_BRACKETS);

    let mut brackets: Vec<Bracket> = (0..num_brackets)
        .map(|i| Bracket {
            min: i as f64 * width,
            max: (i + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for record in records {
        let slot = (record.total_score() / width).floor();
        let idx = if slot.is_nan() || slot <= 0.0 {
            0
        } else {
            // Saturating cast: +inf maps to usize::MAX
            (slot as usize).min(num_brackets - 1)
        };
        brackets[idx].count += 1;
    }

    Histogram { width, brackets }
}
