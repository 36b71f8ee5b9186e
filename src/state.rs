//! Closed-schema application state.
//!
//! Keys are fixed at compile time. The string-keyed `get`/`set` pair exists
//! for loosely typed callers and rejects unknown keys with a warning instead
//! of creating them.

use crate::pipeline::SortSpec;
use crate::records::ProcessedRecord;
use crate::scorer::Rule;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::SystemTime;
use strum::{AsRefStr, Display, EnumIter, EnumString};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString)]
#[strum(serialize_all = "camelCase")]
pub enum StateKey {
    Dataset,
    Rules,
    FilterText,
    SortSpec,
    SelectedRecordId,
    SelectedCategory,
    ColumnHeaders,
    VisibleColumns,
    CurrentView,
    LastUpdated,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum View {
    #[default]
    Dashboard,
    Ranking,
    Charts,
    Analytics,
    Detailed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StateValue {
    Dataset(Arc<[ProcessedRecord]>),
    Rules(Arc<[Rule]>),
    Text(String),
    Selection(Option<String>),
    Sort(SortSpec),
    Columns(Vec<String>),
    View(View),
    Timestamp(Option<SystemTime>),
}

impl StateValue {
    fn kind(&self) -> &'static str {
        match self {
            StateValue::Dataset(_) => "dataset",
            StateValue::Rules(_) => "rules",
            StateValue::Text(_) => "text",
            StateValue::Selection(_) => "selection",
            StateValue::Sort(_) => "sort",
            StateValue::Columns(_) => "columns",
            StateValue::View(_) => "view",
            StateValue::Timestamp(_) => "timestamp",
        }
    }
}

#[derive(Debug, Clone)]
pub struct StateStore {
    dataset: Arc<[ProcessedRecord]>,
    rules: Arc<[Rule]>,
    filter_text: String,
    sort_spec: SortSpec,
    selected_record_id: Option<String>,
    selected_category: Option<String>,
    column_headers: Vec<String>,
    visible_columns: Vec<String>,
    current_view: View,
    last_updated: Option<SystemTime>,
    dataset_version: u64,
}

impl Default for StateStore {
    fn default() -> Self {
        Self {
            dataset: Arc::new([]),
            rules: Arc::new([]),
            filter_text: String::new(),
            sort_spec: SortSpec::default(),
            selected_record_id: None,
            selected_category: None,
            column_headers: Vec::new(),
            visible_columns: Vec::new(),
            current_view: View::default(),
            last_updated: None,
            dataset_version: 0,
        }
    }
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a key by name. Unknown names warn and yield `None`.
    pub fn get(&self, key: &str) -> Option<StateValue> {
        match key.parse::<StateKey>() {
            Ok(k) => Some(self.get_key(k)),
            Err(_) => {
                warn!("Attempted to get unknown state key: {}", key);
                None
            }
        }
    }

    /// Writes a key by name. Returns whether the write was applied; unknown
    /// names and mismatched value types warn and leave state untouched.
    pub fn set(&mut self, key: &str, value: StateValue) -> bool {
        match key.parse::<StateKey>() {
            Ok(k) => self.set_key(k, value),
            Err(_) => {
                warn!("Attempted to set unknown state key: {}", key);
                false
            }
        }
    }

    pub fn get_key(&self, key: StateKey) -> StateValue {
        match key {
            StateKey::Dataset => StateValue::Dataset(Arc::clone(&self.dataset)),
            StateKey::Rules => StateValue::Rules(Arc::clone(&self.rules)),
            StateKey::FilterText => StateValue::Text(self.filter_text.clone()),
            StateKey::SortSpec => StateValue::Sort(self.sort_spec.clone()),
            StateKey::SelectedRecordId => StateValue::Selection(self.selected_record_id.clone()),
            StateKey::SelectedCategory => StateValue::Selection(self.selected_category.clone()),
            StateKey::ColumnHeaders => StateValue::Columns(self.column_headers.clone()),
            StateKey::VisibleColumns => StateValue::Columns(self.visible_columns.clone()),
            StateKey::CurrentView => StateValue::View(self.current_view),
            StateKey::LastUpdated => StateValue::Timestamp(self.last_updated),
        }
    }

    pub fn set_key(&mut self, key: StateKey, value: StateValue) -> bool {
        match (key, value) {
            (StateKey::Dataset, StateValue::Dataset(d)) => self.set_dataset(d),
            (StateKey::Rules, StateValue::Rules(r)) => self.set_rules(r),
            (StateKey::FilterText, StateValue::Text(t)) => self.set_filter_text(t),
            (StateKey::SortSpec, StateValue::Sort(s)) => self.set_sort_spec(s),
            (StateKey::SelectedRecordId, StateValue::Selection(s)) => {
                self.set_selected_record_id(s)
            }
            (StateKey::SelectedCategory, StateValue::Selection(s)) => {
                self.set_selected_category(s)
            }
            (StateKey::ColumnHeaders, StateValue::Columns(c)) => self.set_column_headers(c),
            (StateKey::VisibleColumns, StateValue::Columns(c)) => self.set_visible_columns(c),
            (StateKey::CurrentView, StateValue::View(v)) => self.set_current_view(v),
            (StateKey::LastUpdated, StateValue::Timestamp(t)) => self.set_last_updated(t),
            (key, value) => {
                warn!(
                    "Ignoring {} value for state key '{}'",
                    value.kind(),
                    key.as_ref()
                );
                return false;
            }
        }
        debug!("State updated: {}", key.as_ref());
        true
    }

    pub fn dataset(&self) -> Arc<[ProcessedRecord]> {
        Arc::clone(&self.dataset)
    }

    /// Replaces the whole batch and invalidates memoized views.
    pub fn set_dataset(&mut self, dataset: impl Into<Arc<[ProcessedRecord]>>) {
        self.dataset = dataset.into();
        self.dataset_version += 1;
    }

    pub fn rules(&self) -> Arc<[Rule]> {
        Arc::clone(&self.rules)
    }

    pub fn set_rules(&mut self, rules: impl Into<Arc<[Rule]>>) {
        self.rules = rules.into();
        self.dataset_version += 1;
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn set_filter_text(&mut self, text: impl Into<String>) {
        self.filter_text = text.into();
    }

    pub fn sort_spec(&self) -> &SortSpec {
        &self.sort_spec
    }

    pub fn set_sort_spec(&mut self, sort: SortSpec) {
        self.sort_spec = sort;
    }

    pub fn selected_record_id(&self) -> Option<&str> {
        self.selected_record_id.as_deref()
    }

    pub fn set_selected_record_id(&mut self, id: Option<String>) {
        self.selected_record_id = id;
    }

    pub fn selected_category(&self) -> Option<&str> {
        self.selected_category.as_deref()
    }

    pub fn set_selected_category(&mut self, category: Option<String>) {
        self.selected_category = category;
    }

    pub fn column_headers(&self) -> &[String] {
        &self.column_headers
    }

    pub fn set_column_headers(&mut self, headers: Vec<String>) {
        self.column_headers = headers;
    }

    pub fn visible_columns(&self) -> &[String] {
        &self.visible_columns
    }

    pub fn set_visible_columns(&mut self, columns: Vec<String>) {
        self.visible_columns = columns;
    }

    pub fn current_view(&self) -> View {
        self.current_view
    }

    pub fn set_current_view(&mut self, view: View) {
        self.current_view = view;
    }

    pub fn last_updated(&self) -> Option<SystemTime> {
        self.last_updated
    }

    pub fn set_last_updated(&mut self, at: Option<SystemTime>) {
        self.last_updated = at;
    }

    /// Bumped whenever the dataset or rules are replaced.
    pub fn dataset_version(&self) -> u64 {
        self.dataset_version
    }
}
