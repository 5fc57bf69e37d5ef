use futures::try_join;

use crate::errors::CoreError;
use crate::models::analytics::VaultMetrics;
use crate::models::chart::MergedSeries;
use crate::models::timeframe::Frequency;
use crate::providers::traits::VaultDataProvider;

/// Computes the vault metrics shown on the metric cards.
///
/// TVL, volume, Sharpe ratio and volatility come from the backend.
/// P&L and drawdown are derived client-side from the merged chart series.
pub struct AnalyticsService;

impl AnalyticsService {
    pub fn new() -> Self {
        Self
    }

    /// Fetch TVL, volume, Sharpe and volatility concurrently.
    ///
    /// All four are requested together and succeed or fail together, so the
    /// cards never mix values from different refreshes.
    pub async fn fetch_metrics(
        &self,
        provider: &dyn VaultDataProvider,
        user_address: &str,
        frequency: Frequency,
    ) -> Result<VaultMetrics, CoreError> {
        let (tvl, volume, sharpe, volatility) = try_join!(
            provider.get_tvl(user_address),
            provider.get_volume(user_address, frequency),
            provider.get_sharpe(user_address, frequency),
            provider.get_volatility(user_address, frequency),
        )?;

        Ok(VaultMetrics {
            tvl,
            volume,
            sharpe,
            volatility,
        })
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}

/// Maximum peak-to-trough decline of a percentage series.
///
/// `min over i <= j of (series[j] - max(series[0..=i]))`, computed in one
/// pass with a running peak. Returns 0 for empty or single-element input and
/// never returns a positive value.
pub fn calc_drawdown(series: &[f64]) -> f64 {
    let Some(&first) = series.first() else {
        return 0.0;
    };

    let mut peak = first;
    let mut max_drawdown = 0.0_f64;
    for &value in series {
        if value > peak {
            peak = value;
        }
        let drawdown = value - peak;
        if drawdown < max_drawdown {
            max_drawdown = drawdown;
        }
    }
    max_drawdown
}

/// Vault P&L over the chart window: last vault value minus first.
///
/// 0 when the series has fewer than two points or no vault.
pub fn calc_pnl(series: &MergedSeries) -> f64 {
    let vault = series.vault_series();
    match (vault.first(), vault.last()) {
        (Some(first), Some(last)) if vault.len() > 1 => last - first,
        _ => 0.0,
    }
}
