//! Filter + sort projection of the record batch.

use crate::records::{CellValue, ProcessedRecord};
use crate::schema::CoreField;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use strum::{Display, EnumString};
use tracing::debug;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    /// Header-click behaviour: same column flips direction, a new column
    /// starts descending.
    pub fn clicked(&self, column: &str) -> Self {
        if self.column == column {
            Self::new(column, self.direction.toggled())
        } else {
            Self::new(column, SortDirection::Desc)
        }
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::new(CoreField::TotalScore.column(), SortDirection::Desc)
    }
}

/// Parses `COLUMN` or `COLUMN:asc|desc`.
impl FromStr for SortSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, dir) = match s.rsplit_once(':') {
            Some((c, d)) => (c.trim(), Some(d.trim())),
            None => (s.trim(), None),
        };
        if column.is_empty() {
            return Err(format!("Sort spec '{}' has no column", s));
        }
        let direction = match dir {
            Some(d) => d
                .parse()
                .map_err(|_| format!("Unknown sort direction '{}'", d))?,
            None => SortDirection::Desc,
        };
        Ok(Self::new(column, direction))
    }
}

pub fn matches_filter(record: &ProcessedRecord, lower_filter: &str) -> bool {
    lower_filter.is_empty() || record.name().to_lowercase().contains(lower_filter)
}

/// Case-insensitive substring filter on the player name, then a stable sort.
pub fn filter_and_sort(
    records: &[ProcessedRecord],
    filter_text: &str,
    sort: &SortSpec,
) -> Vec<ProcessedRecord> {
    let lower_filter = filter_text.to_lowercase();
    let mut out: Vec<ProcessedRecord> = records
        .iter()
        .filter(|r| matches_filter(r, &lower_filter))
        .cloned()
        .collect();

    out.sort_by(|a, b| {
        let ord = compare_cells(a.value(&sort.column), b.value(&sort.column));
        match sort.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
    out
}

/// Text compares case-folded first, raw second. Anything else compares as a
/// number with missing values reading as zero.
pub fn compare_cells(a: CellValue<'_>, b: CellValue<'_>) -> Ordering {
    match (a, b) {
        (CellValue::Text(x), CellValue::Text(y)) => x
            .to_lowercase()
            .cmp(&y.to_lowercase())
            .then_with(|| x.cmp(y)),
        _ => a
            .as_number()
            .partial_cmp(&b.as_number())
            .unwrap_or(Ordering::Equal),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ViewKey {
    dataset_version: u64,
    filter_text: String,
    sort: SortSpec,
}

/// Single-entry memo for [`filter_and_sort`].
#[derive(Debug, Default)]
pub struct ViewMemo {
    cached: Option<(ViewKey, Vec<ProcessedRecord>)>,
    hits: u64,
}

impl ViewMemo {
    pub fn view(
        &mut self,
        dataset_version: u64,
        records: &[ProcessedRecord],
        filter_text: &str,
        sort: &SortSpec,
    ) -> Vec<ProcessedRecord> {
        let key = ViewKey {
            dataset_version,
            filter_text: filter_text.to_string(),
            sort: sort.clone(),
        };
        if let Some((cached_key, rows)) = &self.cached {
            if *cached_key == key {
                self.hits += 1;
                debug!("View memo hit #{} ({} rows)", self.hits, rows.len());
                return rows.clone();
            }
        }
        let rows = filter_and_sort(records, filter_text, sort);
        self.cached = Some((key, rows.clone()));
        rows
    }

    /// Cache hits since creation. Diagnostics only; the same count is
    /// logged at debug level on every hit.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn clear(&mut self) {
        self.cached = None;
    }
}
