use crate::aggregate::{
    category_frequency, category_options, category_ranking, observed_categories, player_profile,
    ranking_series, score_histogram, score_vs_units, summary_stats, top_by_units,
    top_category_totals, LabeledSeries, SummaryStats,
};
use crate::config::Config;
use crate::debounce::Debouncer;
use crate::error::{BoardError, BoardResult};
use crate::lifecycle::{
    ChartKind, ChartPayload, InstanceManager, RenderOutcome, Series, SlotKey, TablePayload,
    VisualPayload, VisualRenderer,
};
use crate::pipeline::{SortSpec, ViewMemo};
use crate::records::{process, CellValue, Diagnostic, DiagnosticKind, ProcessedRecord};
use crate::schema::{display_name, is_core_column, CoreField};
use crate::scorer::loader::{load_player_rows, load_rules, LoadedTable};
use crate::scorer::Rule;
use crate::state::{StateStore, View};
use crate::status::{KeyTranslator, StatusLevel, StatusSink, TracingStatus, Translator};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;
use tracing::{debug, info, warn};

pub const RANKING_TABLE_SLOT: &str = "ranking-table";
pub const DETAILED_TABLE_SLOT: &str = "detailed-table";
pub const TOP_UNITS_SLOT: &str = "top-units-table";
pub const PLAYER_SLOT: &str = "player-detail";
pub const CATEGORY_SLOT: &str = "analytics-category";
pub const MODAL_SLOT: &str = "modal";

/// Charts shown on both the dashboard and the charts view.
pub const OVERVIEW_CHARTS: [ChartKind; 4] = [
    ChartKind::TopSources,
    ChartKind::ScoreDistribution,
    ChartKind::ScoreVsUnits,
    ChartKind::FrequentSources,
];

pub fn dashboard_slot(kind: ChartKind) -> SlotKey {
    SlotKey::new(format!("dashboard-{}", kind))
}

pub fn charts_slot(kind: ChartKind) -> SlotKey {
    SlotKey::new(format!("charts-{}", kind))
}

#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub players: usize,
    pub rules: usize,
    pub dropped: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl LoadReport {
    pub fn non_numeric(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::NonNumericCategoryValue)
            .count()
    }
}

/// Wires loading, state, projections and the instance manager together.
pub struct Dashboard<R: VisualRenderer> {
    config: Config,
    state: Mutex<StateStore>,
    memo: Mutex<ViewMemo>,
    instances: InstanceManager<R>,
    status: Arc<dyn StatusSink>,
    translator: Arc<dyn Translator>,
    debouncer: Debouncer,
}

impl<R: VisualRenderer> Dashboard<R> {
    pub fn new(renderer: Arc<R>, config: Config) -> BoardResult<Self> {
        Self::with_services(
            renderer,
            config,
            Arc::new(TracingStatus),
            Arc::new(KeyTranslator::default()),
        )
    }

    pub fn with_services(
        renderer: Arc<R>,
        config: Config,
        status: Arc<dyn StatusSink>,
        translator: Arc<dyn Translator>,
    ) -> BoardResult<Self> {
        config.validate()?;
        let mut state = StateStore::new();
        state.set_filter_text(config.view.filter.clone());
        state.set_sort_spec(config.view.sort_spec()?);
        Ok(Self {
            debouncer: Debouncer::new(config.view.debounce()),
            instances: InstanceManager::with_status(renderer, Arc::clone(&status)),
            state: Mutex::new(state),
            memo: Mutex::new(ViewMemo::default()),
            config,
            status,
            translator,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn instances(&self) -> &InstanceManager<R> {
        &self.instances
    }

    fn lock_state(&self) -> MutexGuard<'_, StateStore> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Point-in-time copy of the state. Record batches are shared, not copied.
    pub fn snapshot(&self) -> StateStore {
        self.lock_state().clone()
    }

    pub fn records(&self) -> Arc<[ProcessedRecord]> {
        self.lock_state().dataset()
    }

    // --- Loading ---

    pub fn load_paths<P: AsRef<Path>>(
        &self,
        players: P,
        rules: Option<&Path>,
    ) -> BoardResult<LoadReport> {
        let table = load_player_rows(players)?;
        let rules = match rules {
            Some(path) => load_rules(path)?,
            None => {
                warn!("No score rules given. Every score will be zero.");
                Vec::new()
            }
        };
        self.load(table, rules)
    }

    /// Replaces dataset and rules in one step. Fails only if no player
    /// survives processing; per-row problems land in the report.
    pub fn load(&self, table: LoadedTable, rules: Vec<Rule>) -> BoardResult<LoadReport> {
        let outcome = process(&table.rows, &rules);
        let report = LoadReport {
            players: outcome.records.len(),
            rules: rules.len(),
            dropped: outcome.dropped(),
            diagnostics: outcome.diagnostics,
        };

        if outcome.records.is_empty() {
            self.status
                .report(StatusLevel::Error, "status.noUsableData", "");
            return Err(BoardError::NoUsableData);
        }

        let headers = column_headers(&table.headers);
        {
            let mut state = self.lock_state();
            state.set_rules(rules);
            state.set_dataset(outcome.records);
            state.set_visible_columns(core_columns());
            state.set_column_headers(headers);
            state.set_last_updated(Some(table.last_modified.unwrap_or_else(SystemTime::now)));

            let dataset = state.dataset();
            let stale_player = state
                .selected_record_id()
                .is_some_and(|id| !dataset.iter().any(|r| r.name() == id));
            if stale_player {
                state.set_selected_record_id(None);
            }
            let stale_category = state
                .selected_category()
                .is_some_and(|c| !state.column_headers().iter().any(|h| h == c));
            if stale_category {
                state.set_selected_category(None);
            }
        }
        self.memo
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();

        if report.dropped > 0 {
            self.status.report(
                StatusLevel::Warning,
                "status.rowsDropped",
                &report.dropped.to_string(),
            );
        }
        self.status.report(
            StatusLevel::Success,
            "status.dataLoaded",
            &report.players.to_string(),
        );
        info!(
            "📊 Dashboard loaded: {} players, {} rules.",
            report.players, report.rules
        );
        Ok(report)
    }

    // --- Projections ---

    /// Filtered and sorted records for the table views.
    pub fn current_view(&self) -> Vec<ProcessedRecord> {
        let state = self.lock_state();
        let dataset = state.dataset();
        let mut memo = self.memo.lock().unwrap_or_else(PoisonError::into_inner);
        memo.view(
            state.dataset_version(),
            &dataset,
            state.filter_text(),
            state.sort_spec(),
        )
    }

    pub fn summary(&self) -> SummaryStats {
        summary_stats(&self.records())
    }

    /// Category columns from the loaded headers, or from the records
    /// themselves when the headers name none.
    pub fn category_options(&self) -> Vec<String> {
        let state = self.lock_state();
        let options = category_options(state.column_headers().iter().map(String::as_str));
        if options.is_empty() {
            observed_categories(&state.dataset())
        } else {
            options
        }
    }

    pub fn chart_payload(&self, kind: ChartKind) -> VisualPayload {
        let state = self.lock_state();
        let records = state.dataset();
        let limits = &self.config.limits;
        let title = self.translator.text(chart_title_key(kind));

        let chart = match kind {
            ChartKind::TopSources => {
                let others = self.translator.text("charts.othersCategory");
                ChartPayload::from_series(
                    kind,
                    title,
                    "",
                    top_category_totals(&records, limits.top_sources, &others),
                )
            }
            ChartKind::ScoreDistribution => {
                let histogram = score_histogram(&records);
                ChartPayload {
                    kind,
                    title,
                    category_label: self.translator.text("charts.playerCount"),
                    labels: histogram.labels(),
                    series: Series::Values(histogram.counts()),
                }
            }
            ChartKind::ScoreVsUnits => {
                ChartPayload::from_points(kind, title, "", score_vs_units(&records))
            }
            ChartKind::FrequentSources => ChartPayload::from_series(
                kind,
                title,
                "",
                category_frequency(&records, limits.frequent_sources),
            ),
            ChartKind::PlayerProfile => {
                let selected = state.selected_record_id().unwrap_or_default();
                let series = records
                    .iter()
                    .find(|r| r.name() == selected)
                    .map(|r| player_profile(r, limits.profile_categories))
                    .unwrap_or_default();
                ChartPayload::from_series(kind, title, selected, series)
            }
            ChartKind::CategoryRanking => {
                let selected = state.selected_category().unwrap_or_default();
                let series = if selected.is_empty() {
                    LabeledSeries::default()
                } else {
                    let ranked = category_ranking(&records, selected, limits.category_ranking);
                    ranking_series(&ranked, selected)
                };
                ChartPayload::from_series(kind, title, display_name(selected), series)
            }
        };
        VisualPayload::Chart(chart)
    }

    fn table_payload(&self, slot: &str) -> VisualPayload {
        let (title_key, rows, visible_columns) = match slot {
            TOP_UNITS_SLOT => {
                let records = self.records();
                let rows: Vec<ProcessedRecord> = top_by_units(&records, self.config.limits.top_units)
                    .into_iter()
                    .cloned()
                    .collect();
                ("table.topUnitsTitle", rows, core_columns())
            }
            DETAILED_TABLE_SLOT => {
                let visible = self.lock_state().visible_columns().to_vec();
                ("table.detailTitle", self.current_view(), visible)
            }
            _ => ("table.rankingTitle", self.current_view(), core_columns()),
        };
        VisualPayload::Table(TablePayload {
            title: self.translator.text(title_key),
            rows,
            visible_columns,
        })
    }

    // --- Rendering ---

    async fn render_chart(&self, slot: SlotKey, kind: ChartKind) -> RenderOutcome {
        let payload = self.chart_payload(kind);
        let min_points = match kind {
            ChartKind::PlayerProfile => self.config.limits.profile_min_categories,
            _ => 1,
        };
        self.instances
            .render_checked(slot, payload, move |p| p.data_len() >= min_points)
            .await
    }

    async fn render_table(&self, slot: &str) -> RenderOutcome {
        let payload = self.table_payload(slot);
        self.instances
            .render_checked(slot, payload, |p| p.data_len() > 0)
            .await
    }

    pub async fn render_ranking(&self) -> RenderOutcome {
        self.render_table(RANKING_TABLE_SLOT).await
    }

    pub async fn render_detail_table(&self) -> RenderOutcome {
        self.render_table(DETAILED_TABLE_SLOT).await
    }

    pub async fn render_top_units(&self) -> RenderOutcome {
        self.render_table(TOP_UNITS_SLOT).await
    }

    pub async fn render_dashboard_charts(&self) -> Vec<(SlotKey, RenderOutcome)> {
        let mut results = Vec::with_capacity(OVERVIEW_CHARTS.len());
        for kind in OVERVIEW_CHARTS {
            let slot = dashboard_slot(kind);
            let outcome = self.render_chart(slot.clone(), kind).await;
            results.push((slot, outcome));
        }
        results
    }

    pub async fn render_charts_view(&self) -> Vec<(SlotKey, RenderOutcome)> {
        let mut results = Vec::with_capacity(OVERVIEW_CHARTS.len());
        for kind in OVERVIEW_CHARTS {
            let slot = charts_slot(kind);
            let outcome = self.render_chart(slot.clone(), kind).await;
            results.push((slot, outcome));
        }
        results
    }

    /// Tears down every live visual and renders the ones belonging to `view`.
    pub async fn switch_view(&self, view: View) -> Vec<(SlotKey, RenderOutcome)> {
        self.lock_state().set_current_view(view);
        self.instances.destroy_all();
        debug!("Switched to view '{}'", view);

        match view {
            View::Dashboard => {
                let mut results = self.render_dashboard_charts().await;
                results.push((TOP_UNITS_SLOT.into(), self.render_top_units().await));
                results
            }
            View::Charts => self.render_charts_view().await,
            View::Ranking => vec![(RANKING_TABLE_SLOT.into(), self.render_ranking().await)],
            View::Detailed => vec![(DETAILED_TABLE_SLOT.into(), self.render_detail_table().await)],
            View::Analytics => vec![(
                CATEGORY_SLOT.into(),
                self.render_chart(CATEGORY_SLOT.into(), ChartKind::CategoryRanking)
                    .await,
            )],
        }
    }

    /// Selects a player (or clears the selection) and redraws their profile.
    pub async fn select_player(&self, name: Option<String>) -> RenderOutcome {
        let cleared = name.is_none();
        self.lock_state().set_selected_record_id(name);
        if cleared {
            self.instances.destroy(&PLAYER_SLOT.into());
            return RenderOutcome::NoData;
        }
        self.render_chart(PLAYER_SLOT.into(), ChartKind::PlayerProfile)
            .await
    }

    pub async fn select_category(&self, category: Option<String>) -> RenderOutcome {
        let cleared = category.is_none();
        self.lock_state().set_selected_category(category);
        if cleared {
            self.instances.destroy(&CATEGORY_SLOT.into());
            return RenderOutcome::NoData;
        }
        self.render_chart(CATEGORY_SLOT.into(), ChartKind::CategoryRanking)
            .await
    }

    /// Expanded view of any chart, always in the single modal slot.
    pub async fn open_modal(&self, kind: ChartKind) -> RenderOutcome {
        self.render_chart(MODAL_SLOT.into(), kind).await
    }

    pub fn close_modal(&self) {
        self.instances.destroy(&MODAL_SLOT.into());
    }

    // --- Table interaction ---

    /// Debounced [`Dashboard::apply_filter`]; only the last call in a burst
    /// takes effect.
    pub fn schedule_filter(self: &Arc<Self>, text: impl Into<String>) {
        let text = text.into();
        let this = Arc::clone(self);
        self.debouncer.call(async move {
            this.apply_filter(text).await;
        });
    }

    pub async fn apply_filter(&self, text: String) -> Vec<(SlotKey, RenderOutcome)> {
        debug!("Filter set to '{}'", text);
        self.lock_state().set_filter_text(text);
        self.refresh_tables().await
    }

    /// Header-click sort: same column flips direction, new column starts
    /// descending.
    pub async fn sort_by_column(&self, column: &str) -> SortSpec {
        let sort = {
            let mut state = self.lock_state();
            let next = state.sort_spec().clicked(column);
            state.set_sort_spec(next.clone());
            next
        };
        self.refresh_tables().await;
        sort
    }

    async fn refresh_tables(&self) -> Vec<(SlotKey, RenderOutcome)> {
        let view = self.lock_state().current_view();
        match view {
            View::Ranking => vec![(RANKING_TABLE_SLOT.into(), self.render_ranking().await)],
            View::Detailed => vec![(DETAILED_TABLE_SLOT.into(), self.render_detail_table().await)],
            _ => Vec::new(),
        }
    }

    /// Flips a category column's visibility and returns the new state. Core
    /// columns are always visible; unknown columns are ignored.
    pub fn toggle_column(&self, column: &str) -> bool {
        if is_core_column(column) {
            return true;
        }
        let mut state = self.lock_state();
        if !state.column_headers().iter().any(|h| h == column) {
            warn!("Cannot toggle unknown column '{}'", column);
            return false;
        }

        let mut visible = state.visible_columns().to_vec();
        let now_visible = if visible.iter().any(|c| c == column) {
            visible.retain(|c| c != column);
            false
        } else {
            visible.push(column.to_string());
            true
        };
        // Keep header order
        let ordered = state
            .column_headers()
            .iter()
            .filter(|h| visible.contains(h))
            .cloned()
            .collect();
        state.set_visible_columns(ordered);
        now_visible
    }

    // --- Export ---

    /// Writes the current filtered/sorted view with the visible columns.
    pub fn export_view_csv<W: Write>(&self, writer: W) -> BoardResult<usize> {
        let columns = self.lock_state().visible_columns().to_vec();
        let rows = self.current_view();

        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&columns)?;
        for record in &rows {
            wtr.write_record(columns.iter().map(|c| cell_text(record.value(c))))?;
        }
        wtr.flush()?;
        Ok(rows.len())
    }

    pub fn export_view_to_path<P: AsRef<Path>>(&self, path: P) -> BoardResult<usize> {
        let path = path.as_ref();
        let count = self.export_view_csv(File::create(path)?)?;
        self.status
            .report(StatusLevel::Success, "status.exported", &path.display().to_string());
        Ok(count)
    }

    /// Cancels pending work and releases every live visual.
    pub fn teardown(&self) {
        self.debouncer.cancel();
        self.instances.destroy_all();
    }
}

fn core_columns() -> Vec<String> {
    CoreField::columns().into_iter().map(String::from).collect()
}

/// Core columns first, then file headers in file order.
fn column_headers(file_headers: &[String]) -> Vec<String> {
    let mut headers = core_columns();
    for h in file_headers {
        let h = h.trim();
        if !h.is_empty() && !headers.iter().any(|x| x == h) {
            headers.push(h.to_string());
        }
    }
    headers
}

fn chart_title_key(kind: ChartKind) -> &'static str {
    match kind {
        ChartKind::TopSources => "charts.topSourcesTitle",
        ChartKind::ScoreDistribution => "charts.distributionTitle",
        ChartKind::ScoreVsUnits => "charts.scoreVsUnitsTitle",
        ChartKind::FrequentSources => "charts.frequentSourcesTitle",
        ChartKind::PlayerProfile => "charts.playerProfileTitle",
        ChartKind::CategoryRanking => "charts.categoryRankingTitle",
    }
}

pub fn cell_text(cell: CellValue<'_>) -> String {
    match cell {
        CellValue::Text(s) => s.to_string(),
        CellValue::Number(n) => n.to_string(),
        CellValue::Missing => String::new(),
    }
}
