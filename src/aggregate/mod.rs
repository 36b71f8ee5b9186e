//! Chart-feeding aggregations over the processed record batch.
//!
//! Everything here is a pure function of its inputs. Accumulation may visit
//! categories in any order; sorted outputs are stable, so repeated calls on
//! unchanged data produce identical labels and values.

pub mod categories;
pub mod histogram;
pub mod ranking;

pub use self::categories::{category_frequency, top_category_totals};
pub use self::histogram::{bracket_width, score_histogram, Bracket, Histogram, MAX_BRACKETS};
pub use self::ranking::{
    category_ranking, player_profile, ranking_series, score_vs_units, top_by_units,
};

use crate::records::ProcessedRecord;
use crate::schema::is_category_column;
use serde::Serialize;
use std::collections::BTreeSet;

pub const DEFAULT_TOP_SOURCES: usize = 7;
pub const DEFAULT_FREQUENT_SOURCES: usize = 10;
pub const DEFAULT_CATEGORY_RANKING: usize = 15;
pub const DEFAULT_PROFILE_CATEGORIES: usize = 8;
pub const DEFAULT_TOP_UNITS: usize = 5;

/// Parallel label/value arrays, the shape most charts consume.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LabeledSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl LabeledSeries {
    pub fn push(&mut self, label: impl Into<String>, value: f64) {
        self.labels.push(label.into());
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SummaryStats {
    pub players: usize,
    pub total_score: f64,
    pub total_units: f64,
    pub avg_score: f64,
    pub avg_units: f64,
}

pub fn summary_stats(records: &[ProcessedRecord]) -> SummaryStats {
    let players = records.len();
    let total_score: f64 = records.iter().map(|r| r.total_score()).sum();
    let total_units: f64 = records.iter().map(|r| r.unit_count()).sum();
    let (avg_score, avg_units) = if players > 0 {
        (total_score / players as f64, total_units / players as f64)
    } else {
        (0.0, 0.0)
    };
    SummaryStats {
        players,
        total_score,
        total_units,
        avg_score,
        avg_units,
    }
}

/// Sorted, de-duplicated category columns for a category picker.
pub fn category_options<'a, I>(headers: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    headers
        .into_iter()
        .map(str::trim)
        .filter(|h| is_category_column(h))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Every category key seen on any record, sorted.
pub fn observed_categories(records: &[ProcessedRecord]) -> Vec<String> {
    category_options(
        records
            .iter()
            .flat_map(|r| r.categories().keys().map(String::as_str)),
    )
}

/// Compact number rendering (`1.2K`, `3.4M`) with at most one decimal.
pub fn format_compact(value: f64) -> String {
    let abs = value.abs();
    let (scaled, suffix) = if abs >= 1e9 {
        (value / 1e9, "B")
    } else if abs >= 1e6 {
        (value / 1e6, "M")
    } else if abs >= 1e3 {
        (value / 1e3, "K")
    } else {
        (value, "")
    };
    format!("{}{}", trim_decimal(scaled, 1), suffix)
}

/// Fixed-precision rendering with trailing zeros removed.
pub fn trim_decimal(value: f64, digits: usize) -> String {
    let s = format!("{:.*}", digits, value);
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    };
    if s == "-0" {
        "0".to_string()
    } else {
        s
    }
}
