use serde::{Deserialize, Serialize};

/// Score weight for one category, as read from the rules file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Score_Per_Unit")]
    pub score_per_unit: f64,
}

impl Rule {
    pub fn new(category: impl Into<String>, score_per_unit: f64) -> Self {
        Self {
            category: category.into(),
            score_per_unit,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    // Sum of value * score_per_unit over ruled categories
    pub total_score: f64,
    // Sum of every category value, ruled or not
    pub unit_count: f64,
}
