//! Raw rows to canonical, immutable player records.

use crate::schema::{category_fields, is_category_column, CoreField};
use crate::scorer::{coerce_number, Rule, ScoreEngine};
use serde::Serialize;
use serde_json::{Number, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use strum::Display;
use tracing::{info, warn};

/// A scored player row. TOTAL_SCORE and UNIT_COUNT are always derived from
/// the categories and the rules in effect; they are never read from input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedRecord {
    name: String,
    total_score: f64,
    unit_count: f64,
    categories: BTreeMap<String, f64>,
}

/// A single cell as seen by sorting and table rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue<'a> {
    Text(&'a str),
    Number(f64),
    Missing,
}

impl CellValue<'_> {
    pub fn as_number(&self) -> f64 {
        match self {
            CellValue::Number(n) => *n,
            _ => 0.0,
        }
    }
}

impl ProcessedRecord {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn total_score(&self) -> f64 {
        self.total_score
    }

    pub fn unit_count(&self) -> f64 {
        self.unit_count
    }

    pub fn categories(&self) -> &BTreeMap<String, f64> {
        &self.categories
    }

    pub fn category(&self, key: &str) -> Option<f64> {
        self.categories.get(key).copied()
    }

    /// Looks up any column, core or category.
    pub fn value(&self, column: &str) -> CellValue<'_> {
        match CoreField::from_column(column) {
            Some(CoreField::Player) => CellValue::Text(&self.name),
            Some(CoreField::TotalScore) => CellValue::Number(self.total_score),
            Some(CoreField::UnitCount) => CellValue::Number(self.unit_count),
            None => self
                .categories
                .get(column)
                .map_or(CellValue::Missing, |v| CellValue::Number(*v)),
        }
    }

    /// Categories with a positive value, largest first. Ties keep key order.
    pub fn ranked_categories(&self) -> Vec<(&str, f64)> {
        let mut out: Vec<(&str, f64)> = self
            .categories
            .iter()
            .filter(|(_, v)| **v > 0.0)
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        out.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DiagnosticKind {
    MalformedRecord,
    NonNumericCategoryValue,
}

/// Recoverable per-row problem. Never aborts a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Position of the row in the raw input.
    pub row: usize,
    pub detail: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProcessOutcome {
    pub records: Vec<ProcessedRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ProcessOutcome {
    pub fn dropped(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::MalformedRecord)
            .count()
    }
}

/// Derives the full record batch from raw rows and rules.
///
/// Output order matches input order minus dropped rows.
pub fn process(rows: &[Value], rules: &[Rule]) -> ProcessOutcome {
    info!(
        "Processing {} players with {} rules.",
        rows.len(),
        rules.len()
    );
    let engine = ScoreEngine::new(rules);
    let mut outcome = ProcessOutcome {
        records: Vec::with_capacity(rows.len()),
        diagnostics: Vec::new(),
    };

    for (idx, row) in rows.iter().enumerate() {
        if let Some(record) = process_row(&engine, idx, row, &mut outcome.diagnostics) {
            outcome.records.push(record);
        }
    }

    info!(
        "Finished processing. {} players remain ({} dropped).",
        outcome.records.len(),
        outcome.dropped()
    );
    outcome
}

fn process_row(
    engine: &ScoreEngine,
    idx: usize,
    row: &Value,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<ProcessedRecord> {
    let Some(map) = row.as_object() else {
        warn!("Skipping invalid player row {}: {}", idx, row);
        diagnostics.push(Diagnostic {
            kind: DiagnosticKind::MalformedRecord,
            row: idx,
            detail: "row is not a mapping".to_string(),
        });
        return None;
    };

    let name = match map.get(CoreField::Player.column()) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => number_name(n),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    };
    if name.is_empty() {
        warn!("Skipping player row {} with missing or empty name.", idx);
        diagnostics.push(Diagnostic {
            kind: DiagnosticKind::MalformedRecord,
            row: idx,
            detail: "missing or empty player name".to_string(),
        });
        return None;
    }

    let mut categories = BTreeMap::new();
    for (key, value) in category_fields(map) {
        let numeric = coerce_number(value).unwrap_or_else(|| {
            diagnostics.push(Diagnostic {
                kind: DiagnosticKind::NonNumericCategoryValue,
                row: idx,
                detail: format!("{} = {}", key, value),
            });
            0.0
        });
        categories.insert(key.to_string(), numeric);
    }

    let breakdown = engine.score_fields(categories.iter().map(|(k, v)| (k.as_str(), *v)));

    Some(ProcessedRecord {
        name,
        total_score: breakdown.total_score,
        unit_count: breakdown.unit_count,
        categories,
    })
}

/// Decimal rendering of a numeric name: whole floats drop the `.0`.
fn number_name(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() => f.to_string(),
        _ => n.to_string(),
    }
}

/// Builds a record directly from already-numeric parts. Scores are derived
/// from `rules` exactly as [`process`] would.
pub fn record_from_parts<I, K>(name: &str, categories: I, rules: &[Rule]) -> ProcessedRecord
where
    I: IntoIterator<Item = (K, f64)>,
    K: Into<String>,
{
    let categories: BTreeMap<String, f64> = categories
        .into_iter()
        .map(|(k, v)| (k.into(), v))
        .filter(|(k, _)| is_category_column(k))
        .collect();
    let breakdown =
        ScoreEngine::new(rules).score_fields(categories.iter().map(|(k, v)| (k.as_str(), *v)));
    ProcessedRecord {
        name: name.trim().to_string(),
        total_score: breakdown.total_score,
        unit_count: breakdown.unit_count,
        categories,
    }
}
