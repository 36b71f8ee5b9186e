#![allow(dead_code)]

use async_trait::async_trait;
use rankboard::aggregate::LabeledSeries;
use rankboard::lifecycle::{
    ChartKind, ChartPayload, RenderError, SlotKey, VisualPayload, VisualRenderer,
};
use rankboard::records::{record_from_parts, ProcessedRecord};
use rankboard::scorer::loader::LoadedTable;
use rankboard::scorer::Rule;
use serde_json::{json, Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

// --- DATA BUILDERS ---

/// The two-player fixture used throughout: Ann {fire:10, water:5}, Bo {fire:2}.
pub fn scenario_rows() -> Vec<Value> {
    vec![
        json!({"PLAYER": "Ann", "fire": 10, "water": 5}),
        json!({"PLAYER": "Bo", "fire": 2}),
    ]
}

pub fn scenario_rules() -> Vec<Rule> {
    vec![Rule::new("fire", 3.0)]
}

pub fn row(name: &str, cells: &[(&str, f64)]) -> Value {
    let mut map = Map::new();
    map.insert("PLAYER".to_string(), json!(name));
    for (k, v) in cells {
        map.insert(k.to_string(), json!(v));
    }
    Value::Object(map)
}

pub fn record(name: &str, cells: &[(&str, f64)], rules: &[Rule]) -> ProcessedRecord {
    record_from_parts(name, cells.iter().map(|(k, v)| (*k, *v)), rules)
}

pub fn table(rows: Vec<Value>) -> LoadedTable {
    let mut headers = vec!["PLAYER".to_string()];
    for r in &rows {
        if let Some(map) = r.as_object() {
            for k in map.keys() {
                if !headers.contains(k) {
                    headers.push(k.clone());
                }
            }
        }
    }
    LoadedTable {
        rows,
        headers,
        last_modified: None,
    }
}

/// Six players over five categories, enough for every dashboard chart.
pub fn league_rows() -> Vec<Value> {
    vec![
        row("Ann", &[("fire", 10.0), ("water", 5.0), ("earth", 2.0), ("air", 1.0)]),
        row("Bo", &[("fire", 2.0), ("water", 1.0)]),
        row("Cid", &[("earth", 8.0), ("air", 4.0), ("void", 1.0)]),
        row("Dee", &[("fire", 1.0), ("water", 1.0), ("earth", 1.0)]),
        row("Eve", &[("void", 20.0)]),
        row("Fay", &[("fire", 0.0)]),
    ]
}

pub fn league_rules() -> Vec<Rule> {
    vec![
        Rule::new("fire", 3.0),
        Rule::new("water", 2.0),
        Rule::new("earth", 1.5),
        Rule::new("void", 10.0),
    ]
}

pub fn chart(title: &str, points: usize) -> VisualPayload {
    let mut series = LabeledSeries::default();
    for i in 0..points {
        series.push(format!("p{}", i), i as f64 + 1.0);
    }
    VisualPayload::Chart(ChartPayload::from_series(
        ChartKind::TopSources,
        title,
        "",
        series,
    ))
}

// --- FAKE RENDERER ---

#[derive(Debug)]
pub struct FakeHandle {
    pub slot: SlotKey,
    pub title: String,
    pub data_len: usize,
}

/// Renderer with per-title latency and failure injection. Tracks how many
/// handles are alive so leaks show up as a non-zero count.
#[derive(Debug, Default)]
pub struct FakeRenderer {
    delays: Mutex<HashMap<String, Duration>>,
    failing: Mutex<HashSet<String>>,
    live: AtomicUsize,
    created: AtomicUsize,
    destroyed: Mutex<Vec<String>>,
}

impl FakeRenderer {
    pub fn delay(&self, title: &str, delay: Duration) {
        self.delays
            .lock()
            .unwrap()
            .insert(title.to_string(), delay);
    }

    pub fn fail(&self, title: &str) {
        self.failing.lock().unwrap().insert(title.to_string());
    }

    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn destroyed(&self) -> Vec<String> {
        self.destroyed.lock().unwrap().clone()
    }
}

#[async_trait]
impl VisualRenderer for FakeRenderer {
    type Handle = FakeHandle;

    async fn create(
        &self,
        slot: &SlotKey,
        payload: &VisualPayload,
    ) -> Result<Self::Handle, RenderError> {
        let title = payload.title().to_string();
        let delay = self.delays.lock().unwrap().get(&title).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.lock().unwrap().contains(&title) {
            return Err(RenderError::Rejected(title));
        }
        self.live.fetch_add(1, Ordering::SeqCst);
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(FakeHandle {
            slot: slot.clone(),
            title,
            data_len: payload.data_len(),
        })
    }

    fn destroy(&self, handle: Self::Handle) {
        self.live.fetch_sub(1, Ordering::SeqCst);
        self.destroyed.lock().unwrap().push(handle.title);
    }
}
