pub mod loader;
pub mod types;

pub use self::types::{Rule, ScoreBreakdown};
use crate::schema::category_fields;
use serde_json::Value;
use std::collections::HashMap;

/// Per-record scoring against a fixed rule set.
///
/// The category lookup is built once in [`ScoreEngine::new`]; build a new
/// engine whenever the rules change.
#[derive(Debug, Clone, Default)]
pub struct ScoreEngine {
    rule_map: HashMap<String, f64>,
}

impl ScoreEngine {
    pub fn new(rules: &[Rule]) -> Self {
        // Later rules override earlier ones for the same category
        let rule_map = rules
            .iter()
            .map(|r| (r.category.clone(), r.score_per_unit))
            .collect();
        Self { rule_map }
    }

    pub fn rule_count(&self) -> usize {
        self.rule_map.len()
    }

    pub fn score_per_unit(&self, category: &str) -> Option<f64> {
        self.rule_map.get(category).copied()
    }

    /// Scores one raw row. Every non-core field counts as a category; values
    /// that are not numbers are coerced and fall back to zero.
    pub fn score(&self, row: &Value) -> ScoreBreakdown {
        let Some(map) = row.as_object() else {
            return ScoreBreakdown::default();
        };
        self.score_fields(
            category_fields(map).map(|(k, v)| (k, coerce_number(v).unwrap_or(0.0))),
        )
    }

    /// Scores already-normalized `(category, value)` pairs.
    pub fn score_fields<'a, I>(&self, fields: I) -> ScoreBreakdown
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut out = ScoreBreakdown::default();
        for (category, value) in fields {
            out.unit_count += value;
            if let Some(per_unit) = self.rule_map.get(category) {
                out.total_score += value * per_unit;
            }
        }
        out
    }
}

/// Numeric view of a loose cell value.
///
/// Empty cells (null, blank text) read as zero. Returns `None` only for
/// values with no numeric reading at all; callers substitute zero.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::String(s) => {
            let t = s.trim();
            if t.is_empty() {
                0.0
            } else {
                t.parse::<f64>().ok()?
            }
        }
        Value::Array(_) | Value::Object(_) => return None,
    };
    n.is_finite().then_some(n)
}
