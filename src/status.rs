//! User-facing status signals and label translation.

use crate::error::BoardResult;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use strum::{Display, EnumString};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusSignal {
    pub level: StatusLevel,
    pub key: String,
    pub detail: String,
}

/// Receives transient status messages (toasts in a UI, log lines in a CLI).
pub trait StatusSink: Send + Sync {
    fn report(&self, level: StatusLevel, key: &str, detail: &str);
}

/// Forwards every signal to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingStatus;

impl StatusSink for TracingStatus {
    fn report(&self, level: StatusLevel, key: &str, detail: &str) {
        match level {
            StatusLevel::Info | StatusLevel::Success => info!(key, "{}", detail),
            StatusLevel::Warning => warn!(key, "{}", detail),
            StatusLevel::Error => error!(key, "{}", detail),
        }
    }
}

/// Keeps every signal in memory.
#[derive(Debug, Default)]
pub struct StatusLog {
    signals: Mutex<Vec<StatusSignal>>,
}

impl StatusLog {
    pub fn signals(&self) -> Vec<StatusSignal> {
        self.signals
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    pub fn count(&self, level: StatusLevel) -> usize {
        self.signals().iter().filter(|s| s.level == level).count()
    }
}

impl StatusSink for StatusLog {
    fn report(&self, level: StatusLevel, key: &str, detail: &str) {
        if let Ok(mut signals) = self.signals.lock() {
            signals.push(StatusSignal {
                level,
                key: key.to_string(),
                detail: detail.to_string(),
            });
        }
    }
}

pub trait Translator: Send + Sync {
    /// Localized text for `key`, or the key itself when unknown.
    fn text(&self, key: &str) -> String;
}

const BUILTIN_EN: &[(&str, &str)] = &[
    ("charts.othersCategory", "Others"),
    ("charts.topSourcesTitle", "Top Sources by Score"),
    ("charts.distributionTitle", "Score Distribution"),
    ("charts.scoreVsUnitsTitle", "Score vs Units"),
    ("charts.frequentSourcesTitle", "Most Frequent Sources"),
    ("charts.playerProfileTitle", "Player Profile"),
    ("charts.categoryRankingTitle", "Category Ranking"),
    ("charts.playerCount", "Players"),
    ("table.rankingTitle", "Player Ranking"),
    ("table.detailTitle", "Detailed Table"),
    ("table.topUnitsTitle", "Top Players by Units"),
    ("table.noData", "No data available"),
    ("status.dataLoaded", "Data loaded"),
    ("status.noUsableData", "No usable data in file"),
    ("status.rowsDropped", "Some rows were skipped"),
    ("status.chartError", "Chart could not be rendered"),
    ("status.exported", "Export complete"),
];

/// Dotted-key dictionary, seeded with English defaults.
#[derive(Debug, Clone)]
pub struct KeyTranslator {
    entries: HashMap<String, String>,
}

impl Default for KeyTranslator {
    fn default() -> Self {
        Self {
            entries: BUILTIN_EN
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl KeyTranslator {
    /// Overlays a nested JSON dictionary (`{"charts": {"othersCategory": ..}}`)
    /// on the built-in defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> BoardResult<Self> {
        let content = fs::read_to_string(path)?;
        let root: Value = serde_json::from_str(&content)?;
        let mut translator = Self::default();
        translator.merge_value("", &root);
        Ok(translator)
    }

    fn merge_value(&mut self, prefix: &str, value: &Value) {
        match value {
            Value::Object(map) => {
                for (k, v) in map {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{}.{}", prefix, k)
                    };
                    self.merge_value(&key, v);
                }
            }
            Value::String(s) => {
                self.entries.insert(prefix.to_string(), s.clone());
            }
            _ => {}
        }
    }
}

impl Translator for KeyTranslator {
    fn text(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}
