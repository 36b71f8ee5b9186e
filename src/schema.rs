//! Schema discovery over loosely typed player rows.
//!
//! Rows carry a small reserved set of core columns; every other column
//! holding a number is a category. The category set is never cached: it is
//! derived from whichever row is being examined.

use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Reserved columns. Never treated as categories and never hideable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString)]
pub enum CoreField {
    #[strum(serialize = "PLAYER")]
    Player,
    #[strum(serialize = "TOTAL_SCORE")]
    TotalScore,
    #[strum(serialize = "UNIT_COUNT")]
    UnitCount,
}

impl CoreField {
    pub fn column(self) -> &'static str {
        match self {
            CoreField::Player => "PLAYER",
            CoreField::TotalScore => "TOTAL_SCORE",
            CoreField::UnitCount => "UNIT_COUNT",
        }
    }

    pub fn from_column(key: &str) -> Option<Self> {
        key.parse().ok()
    }

    /// Core columns in display order.
    pub fn columns() -> Vec<&'static str> {
        CoreField::iter().map(CoreField::column).collect()
    }
}

#[inline]
pub fn is_core_column(key: &str) -> bool {
    CoreField::from_column(key).is_some()
}

/// Columns that hold category values: every named column that is not core.
/// Scoring, processing and the category pickers all classify through this.
#[inline]
pub fn is_category_column(key: &str) -> bool {
    !key.is_empty() && !is_core_column(key)
}

/// True iff `key` is a category column and `value` is a JSON number.
#[inline]
pub fn is_category_field(key: &str, value: &Value) -> bool {
    is_category_column(key) && value.is_number()
}

/// Raw category cells of one row, before any coercion.
pub fn category_fields(map: &Map<String, Value>) -> impl Iterator<Item = (&str, &Value)> {
    map.iter()
        .filter(|(k, _)| is_category_column(k))
        .map(|(k, v)| (k.as_str(), v))
}

/// Category keys of a single row, in the row's key order.
pub fn category_keys(row: &Value) -> Vec<&str> {
    match row.as_object() {
        Some(map) => map
            .iter()
            .filter(|(k, v)| is_category_field(k, v))
            .map(|(k, _)| k.as_str())
            .collect(),
        None => Vec::new(),
    }
}

/// Readable label for a column key (`Epic_Crypt` -> `Epic Crypt`).
pub fn display_name(key: &str) -> String {
    key.replace('_', " ")
}
