use crate::aggregate::{
    DEFAULT_CATEGORY_RANKING, DEFAULT_FREQUENT_SOURCES, DEFAULT_PROFILE_CATEGORIES,
    DEFAULT_TOP_SOURCES, DEFAULT_TOP_UNITS,
};
use crate::error::{BoardError, BoardResult};
use crate::pipeline::SortSpec;
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub view: ViewParams,
    #[command(flatten)]
    pub limits: AggregationLimits,
}

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewParams {
    /// Case-insensitive player-name filter
    #[arg(long, default_value = "")]
    pub filter: String,

    /// Sort as COLUMN or COLUMN:asc|desc
    #[arg(long, default_value = "TOTAL_SCORE:desc")]
    pub sort: String,

    #[arg(long, default_value_t = 300)]
    pub debounce_ms: u64,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            filter: String::new(),
            sort: "TOTAL_SCORE:desc".to_string(),
            debounce_ms: 300,
        }
    }
}

impl ViewParams {
    pub fn sort_spec(&self) -> BoardResult<SortSpec> {
        self.sort.parse().map_err(BoardError::Config)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationLimits {
    #[arg(long, default_value_t = DEFAULT_TOP_SOURCES)]
    pub top_sources: usize,
    #[arg(long, default_value_t = DEFAULT_FREQUENT_SOURCES)]
    pub frequent_sources: usize,
    #[arg(long, default_value_t = DEFAULT_CATEGORY_RANKING)]
    pub category_ranking: usize,
    #[arg(long, default_value_t = DEFAULT_PROFILE_CATEGORIES)]
    pub profile_categories: usize,
    #[arg(long, default_value_t = DEFAULT_TOP_UNITS)]
    pub top_units: usize,
    // Radar charts need at least a triangle
    #[arg(long, default_value_t = 3)]
    pub profile_min_categories: usize,
}

impl Default for AggregationLimits {
    fn default() -> Self {
        Self {
            top_sources: DEFAULT_TOP_SOURCES,
            frequent_sources: DEFAULT_FREQUENT_SOURCES,
            category_ranking: DEFAULT_CATEGORY_RANKING,
            profile_categories: DEFAULT_PROFILE_CATEGORIES,
            top_units: DEFAULT_TOP_UNITS,
            profile_min_categories: 3,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> BoardResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            BoardError::Config(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> BoardResult<()> {
        self.view.sort_spec()?;
        if self.limits.profile_min_categories == 0 {
            return Err(BoardError::Config(
                "profile_min_categories must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Copies onto `self` only the values the user typed on the command line,
    /// so file values survive clap defaults.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($section:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$section.$field = cli.$section.$field.clone();
                }
            };
        }

        update_if_present!(view.filter);
        update_if_present!(view.sort);
        update_if_present!(view.debounce_ms);

        update_if_present!(limits.top_sources);
        update_if_present!(limits.frequent_sources);
        update_if_present!(limits.category_ranking);
        update_if_present!(limits.profile_categories);
        update_if_present!(limits.top_units);
        update_if_present!(limits.profile_min_categories);
    }
}
