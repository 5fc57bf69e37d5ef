use tracing::info;

use crate::errors::CoreError;
use crate::format;
use crate::models::asset::TrackedAsset;
use crate::models::chart::MergedSeries;
use crate::models::timeframe::Timeframe;
use crate::providers::traits::VaultDataProvider;
use crate::services::price_service::PriceService;
use crate::services::series_transform;

/// Number of x-axis labels under the comparative chart.
const AXIS_LABEL_COUNT: usize = 7;

/// Generates the comparative performance chart: fetches every tracked asset
/// and runs the normalization pipeline over the results.
///
/// The core computes all the numbers; the frontend only renders.
pub struct ChartService {
    price_service: PriceService,
}

impl ChartService {
    pub fn new() -> Self {
        Self {
            price_service: PriceService::new(),
        }
    }

    /// Fetch and merge the chart series for one timeframe.
    ///
    /// Succeeds if at least one asset returned data; otherwise fails with
    /// [`CoreError::NoValidData`].
    pub async fn generate_chart(
        &self,
        provider: &dyn VaultDataProvider,
        assets: &[TrackedAsset],
        timeframe: Timeframe,
    ) -> Result<MergedSeries, CoreError> {
        let fetched = self
            .price_service
            .fetch_all(provider, assets, timeframe.frequency())
            .await;

        let series = series_transform::build_chart_series(assets, &fetched)?;

        info!(
            timeframe = %timeframe,
            points = series.len(),
            assets_with_data = fetched.iter().filter(|s| !s.is_empty()).count(),
            "chart series ready"
        );
        Ok(series)
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}

/// Evenly spaced indexes for axis labels: first, last and evenly between,
/// without duplicates.
pub fn axis_label_indexes(len: usize) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }
    let mut indexes = vec![0];
    if len > 1 {
        let span = (len - 1) as f64;
        let steps = (AXIS_LABEL_COUNT - 1) as f64;
        for i in 1..AXIS_LABEL_COUNT - 1 {
            indexes.push((i as f64 * span / steps).round() as usize);
        }
        indexes.push(len - 1);
    }
    indexes.dedup();
    indexes
}

/// X-axis labels: 12-hour times for the 1d window, "DD Mon" otherwise.
pub fn axis_labels(series: &MergedSeries, timeframe: Timeframe) -> Vec<String> {
    let points = series.points();
    axis_label_indexes(points.len())
        .into_iter()
        .map(|i| {
            let instant = points[i].timestamp();
            match timeframe {
                Timeframe::OneDay => format::format_time_12h(instant),
                _ => format::format_date(instant),
            }
        })
        .collect()
}
