use super::SlotKey;
use crate::aggregate::{LabeledSeries, ScatterPoint};
use crate::records::ProcessedRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    TopSources,
    ScoreDistribution,
    ScoreVsUnits,
    FrequentSources,
    PlayerProfile,
    CategoryRanking,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Series {
    Values(Vec<f64>),
    Points(Vec<ScatterPoint>),
}

impl Series {
    pub fn len(&self) -> usize {
        match self {
            Series::Values(v) => v.len(),
            Series::Points(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPayload {
    pub kind: ChartKind,
    pub title: String,
    /// Axis or legend caption, e.g. the selected category.
    pub category_label: String,
    pub labels: Vec<String>,
    pub series: Series,
}

impl ChartPayload {
    pub fn from_series(
        kind: ChartKind,
        title: impl Into<String>,
        category_label: impl Into<String>,
        data: LabeledSeries,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            category_label: category_label.into(),
            labels: data.labels,
            series: Series::Values(data.values),
        }
    }

    pub fn from_points(
        kind: ChartKind,
        title: impl Into<String>,
        category_label: impl Into<String>,
        points: Vec<ScatterPoint>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            category_label: category_label.into(),
            labels: Vec::new(),
            series: Series::Points(points),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablePayload {
    pub title: String,
    pub rows: Vec<ProcessedRecord>,
    pub visible_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum VisualPayload {
    Chart(ChartPayload),
    Table(TablePayload),
}

impl VisualPayload {
    /// Number of data points or rows carried.
    pub fn data_len(&self) -> usize {
        match self {
            VisualPayload::Chart(c) => c.series.len(),
            VisualPayload::Table(t) => t.rows.len(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            VisualPayload::Chart(c) => &c.title,
            VisualPayload::Table(t) => &t.title,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Render container not found for slot '{0}'")]
    ContainerMissing(SlotKey),

    #[error("Renderer rejected payload: {0}")]
    Rejected(String),
}

/// Turns payloads into live visualizations. `create` may suspend; `destroy`
/// must release the handle synchronously.
#[async_trait]
pub trait VisualRenderer: Send + Sync + 'static {
    type Handle: Send + 'static;

    async fn create(
        &self,
        slot: &SlotKey,
        payload: &VisualPayload,
    ) -> Result<Self::Handle, RenderError>;

    fn destroy(&self, handle: Self::Handle);
}
