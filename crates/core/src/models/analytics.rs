use serde::{Deserialize, Serialize};

use crate::format;

use super::timeframe::Timeframe;

/// Backend-computed vault metrics for the metric cards.
///
/// Each field is `None` when the backend omitted or could not produce it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VaultMetrics {
    /// Total value locked, in dollars
    pub tvl: Option<f64>,

    /// Traded volume over the selected window, in dollars
    pub volume: Option<f64>,

    /// Sharpe ratio over the selected window
    pub sharpe: Option<f64>,

    /// Volatility over the selected window
    pub volatility: Option<f64>,
}

impl VaultMetrics {
    /// TVL card text, e.g. "$1,234,567" or "--".
    pub fn tvl_display(&self) -> String {
        format::format_money_floor(self.tvl)
    }

    /// Volume card text, e.g. "$98,765" or "--".
    pub fn volume_display(&self) -> String {
        format::format_money_floor(self.volume)
    }
}

/// Everything the metric cards display for one timeframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub timeframe: Timeframe,

    pub metrics: VaultMetrics,

    /// Vault P&L over the chart window, in percentage points
    pub pnl: f64,

    /// Maximum drawdown of the vault over the chart window (≤ 0)
    pub drawdown: f64,
}
