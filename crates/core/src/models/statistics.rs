use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;

/// Which per-coin statistic the composition donut shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticsFlag {
    TopNetpnl,
    TopNumTrades,
    TopVolume,
    TopFees,
}

impl StatisticsFlag {
    pub const ALL: [StatisticsFlag; 4] = [
        StatisticsFlag::TopNetpnl,
        StatisticsFlag::TopFees,
        StatisticsFlag::TopVolume,
        StatisticsFlag::TopNumTrades,
    ];

    /// Value of the `flag` query parameter.
    #[must_use]
    pub fn as_query(self) -> &'static str {
        match self {
            StatisticsFlag::TopNetpnl => "top_netpnl",
            StatisticsFlag::TopNumTrades => "top_num_trades",
            StatisticsFlag::TopVolume => "top_volume",
            StatisticsFlag::TopFees => "top_fees",
        }
    }

    /// Label shown in the composition dropdown.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            StatisticsFlag::TopNetpnl => "Net P&L",
            StatisticsFlag::TopNumTrades => "Trades",
            StatisticsFlag::TopVolume => "Volume",
            StatisticsFlag::TopFees => "Fees",
        }
    }

    /// Resolve a dropdown label ("Net P&L", "Fees", …).
    pub fn from_label(label: &str) -> Result<Self, CoreError> {
        StatisticsFlag::ALL
            .into_iter()
            .find(|f| f.label() == label)
            .ok_or_else(|| CoreError::ValidationError(format!("Unknown statistics option '{label}'")))
    }
}

impl FromStr for StatisticsFlag {
    type Err = CoreError;

    /// Accepts the query form (`top_fees`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatisticsFlag::ALL
            .into_iter()
            .find(|f| f.as_query() == s)
            .ok_or_else(|| CoreError::ValidationError(format!("Unknown statistics flag '{s}'")))
    }
}

/// One element of the `/positions_statistics` response.
/// Only the field matching the requested flag is guaranteed to be present.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatisticsItem {
    pub coin: String,
    #[serde(rename = "TotalPNL", default, skip_serializing_if = "Option::is_none")]
    pub total_pnl: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_positions: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_value: Option<f64>,
    #[serde(rename = "Fees", default, skip_serializing_if = "Option::is_none")]
    pub fees: Option<f64>,
}

/// One slice of the portfolio composition donut chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionSlice {
    /// Coin ticker
    pub name: String,
    /// Share of the total, in percent
    pub value: f64,
    /// Formatted amount, e.g. "$1200" or "-$3.50"
    pub usd: String,
    /// Hex color
    pub color: String,
    /// Signed metric value (fees are reported negative)
    pub actual_value: f64,
}
