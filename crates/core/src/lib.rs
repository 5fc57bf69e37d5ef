pub mod config;
pub mod errors;
pub mod format;
pub mod models;
pub mod providers;
pub mod services;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::debug;

use config::DashboardConfig;
use errors::CoreError;
use models::{
    analytics::DashboardSummary,
    chart::ChartSnapshot,
    page::Page,
    position::{PositionRow, PositionSortKey},
    statistics::{CompositionSlice, StatisticsFlag},
    timeframe::Timeframe,
    trade::{TradeHistoryItem, TradeSortKey},
};
use providers::{http::HttpVaultProvider, traits::VaultDataProvider};
use services::{
    analytics_service::{self, AnalyticsService},
    chart_service::ChartService,
    statistics_service::StatisticsService,
    table_service::{self, TableService},
};

/// Main entry point for the vault dashboard core library.
///
/// Owns the backend provider, the services, and the one piece of shared
/// state: the chart currently on screen. That slot is only ever replaced
/// whole, and only by the most recently issued chart request.
#[must_use]
pub struct VaultDashboard {
    config: DashboardConfig,
    provider: Arc<dyn VaultDataProvider>,
    chart_service: ChartService,
    analytics_service: AnalyticsService,
    table_service: TableService,
    statistics_service: StatisticsService,
    /// Sequence number of the most recently issued chart request.
    chart_sequence: AtomicU64,
    current_chart: Mutex<Option<Arc<ChartSnapshot>>>,
}

impl std::fmt::Debug for VaultDashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultDashboard")
            .field("provider", &self.provider.name())
            .field("api_base_url", &self.config.api_base_url)
            .field("tracked_assets", &self.config.tracked_assets.len())
            .field("chart_sequence", &self.chart_sequence.load(Ordering::SeqCst))
            .finish()
    }
}

impl VaultDashboard {
    /// Create a dashboard talking to the HTTP backend named in `config`.
    pub fn new(config: DashboardConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let provider = HttpVaultProvider::with_timeout_secs(
            config.api_base_url.clone(),
            config.request_timeout_secs,
        );
        Ok(Self::build(config, Arc::new(provider)))
    }

    /// Create a dashboard on top of a custom data provider (tests, offline hosts).
    pub fn with_provider(
        config: DashboardConfig,
        provider: Arc<dyn VaultDataProvider>,
    ) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self::build(config, provider))
    }

    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    // ── Chart ───────────────────────────────────────────────────────

    /// Fetch, merge and publish the chart for a timeframe key ("1d", "7d", "30d", "All").
    ///
    /// The request is tagged with a fresh sequence number. When it finishes:
    /// - if a newer request has been issued meanwhile, the result is dropped
    ///   and `CoreError::Superseded` is returned; the current chart is untouched;
    /// - otherwise a success replaces the current chart and a failure clears it.
    ///
    /// An unknown timeframe fails before any network call.
    pub async fn load_chart(&self, timeframe_key: &str) -> Result<Arc<ChartSnapshot>, CoreError> {
        let sequence = self.chart_sequence.fetch_add(1, Ordering::SeqCst) + 1;

        let result = match timeframe_key.parse::<Timeframe>() {
            Ok(timeframe) => self
                .chart_service
                .generate_chart(self.provider.as_ref(), &self.config.tracked_assets, timeframe)
                .await
                .map(|series| {
                    let drawdown = analytics_service::calc_drawdown(&series.vault_series());
                    let pnl = analytics_service::calc_pnl(&series);
                    Arc::new(ChartSnapshot {
                        timeframe,
                        sequence,
                        series,
                        drawdown,
                        pnl,
                    })
                }),
            Err(e) => Err(e),
        };

        self.publish_chart(sequence, result)
    }

    /// The chart currently on screen, if any.
    #[must_use]
    pub fn current_chart(&self) -> Option<Arc<ChartSnapshot>> {
        self.current_chart
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Sequence number of the most recently issued chart request (0 if none).
    #[must_use]
    pub fn latest_chart_sequence(&self) -> u64 {
        self.chart_sequence.load(Ordering::SeqCst)
    }

    // ── Metrics ─────────────────────────────────────────────────────

    /// Metric cards for a timeframe: backend metrics plus P&L and drawdown
    /// from the current chart. P&L and drawdown are 0 unless the current
    /// chart was loaded for the same timeframe.
    pub async fn summary(&self, timeframe_key: &str) -> Result<DashboardSummary, CoreError> {
        let timeframe: Timeframe = timeframe_key.parse()?;
        let metrics = self
            .analytics_service
            .fetch_metrics(
                self.provider.as_ref(),
                &self.config.user_address,
                timeframe.frequency(),
            )
            .await?;

        let (pnl, drawdown) = match self.current_chart() {
            Some(chart) if chart.timeframe == timeframe => (chart.pnl, chart.drawdown),
            _ => (0.0, 0.0),
        };

        Ok(DashboardSummary {
            timeframe,
            metrics,
            pnl,
            drawdown,
        })
    }

    // ── Tables ──────────────────────────────────────────────────────

    /// One page of open positions, sorted by a UI label ("" keeps backend order).
    pub async fn positions_page(
        &self,
        sort_label: &str,
        page: usize,
    ) -> Result<Page<PositionRow>, CoreError> {
        let key: PositionSortKey = sort_label.parse()?;
        let mut rows = self
            .table_service
            .load_positions(self.provider.as_ref(), &self.config.user_address)
            .await?;
        table_service::sort_positions(&mut rows, key);
        Ok(table_service::paginate(&rows, page, self.config.page_size))
    }

    /// One page of trade history, sorted by a UI label ("Time", "Net P&L", …).
    pub async fn trade_history_page(
        &self,
        sort_label: &str,
        page: usize,
    ) -> Result<Page<TradeHistoryItem>, CoreError> {
        let key: TradeSortKey = sort_label.parse()?;
        let mut rows = self
            .table_service
            .load_trade_history(self.provider.as_ref())
            .await;
        table_service::sort_trades(&mut rows, key);
        Ok(table_service::paginate(&rows, page, self.config.page_size))
    }

    // ── Composition ─────────────────────────────────────────────────

    /// Donut slices for a dropdown label ("Net P&L", "Fees", "Volume", "Trades").
    pub async fn composition(&self, flag_label: &str) -> Result<Vec<CompositionSlice>, CoreError> {
        let flag = StatisticsFlag::from_label(flag_label)?;
        Ok(self
            .statistics_service
            .load_composition(self.provider.as_ref(), flag)
            .await)
    }

    // ── Internal ────────────────────────────────────────────────────

    fn publish_chart(
        &self,
        sequence: u64,
        result: Result<Arc<ChartSnapshot>, CoreError>,
    ) -> Result<Arc<ChartSnapshot>, CoreError> {
        let mut slot = self.current_chart.lock().unwrap_or_else(|e| e.into_inner());

        let latest = self.chart_sequence.load(Ordering::SeqCst);
        if sequence != latest {
            if let Err(e) = &result {
                debug!(sequence, latest, error = %e, "stale chart request failed");
            } else {
                debug!(sequence, latest, "discarding stale chart response");
            }
            return Err(CoreError::Superseded { sequence, latest });
        }

        match result {
            Ok(snapshot) => {
                *slot = Some(Arc::clone(&snapshot));
                Ok(snapshot)
            }
            Err(e) => {
                *slot = None;
                Err(e)
            }
        }
    }

    fn build(config: DashboardConfig, provider: Arc<dyn VaultDataProvider>) -> Self {
        Self {
            config,
            provider,
            chart_service: ChartService::new(),
            analytics_service: AnalyticsService::new(),
            table_service: TableService::new(),
            statistics_service: StatisticsService::new(),
            chart_sequence: AtomicU64::new(0),
            current_chart: Mutex::new(None),
        }
    }
}
