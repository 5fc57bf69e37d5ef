use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;
use crate::format;

use super::price::parse_timestamp;

/// A closed trade as returned by `/positions_history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiTradeHistoryItem {
    pub start_time: String,
    pub end_time: String,
    pub coin: String,
    /// e.g. "Open Long"
    pub direction: String,
    pub total_sz: f64,
    pub avg_entry_price: f64,
    pub total_value: f64,
    #[serde(rename = "PnL")]
    pub pnl: f64,
    #[serde(rename = "Fees")]
    pub fees: f64,
    #[serde(rename = "fundingFee")]
    pub funding_fee: f64,
    #[serde(rename = "TotalPNL")]
    pub total_pnl: f64,
}

/// Date and time columns of a trade-history row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayDateTime {
    /// `"05 Jun 2025"`
    pub date: String,
    /// `"2:05 PM"`
    pub time: String,
}

impl DisplayDateTime {
    fn from_instant(instant: DateTime<Utc>) -> Self {
        Self {
            date: format::format_date_with_year(instant),
            time: format::format_time_12h(instant),
        }
    }
}

/// A trade-history row ready for the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeHistoryItem {
    pub open_time: DisplayDateTime,
    pub close_time: DisplayDateTime,
    pub asset: String,
    /// "Long" / "Short" (the "Open " prefix is stripped)
    pub direction: String,
    pub quantity: String,
    pub entry: String,
    pub trade_value: String,
    pub pnl: f64,
    pub fees: String,
    pub funding: String,
    pub net_pnl: f64,

    /// Close instant, used for time sorting
    pub closed_at: DateTime<Utc>,
    pub trade_value_raw: f64,
    pub fees_raw: f64,
    pub funding_raw: f64,
}

impl TradeHistoryItem {
    /// Format a raw history record. Fails if either timestamp is unparseable.
    pub fn from_api(item: &ApiTradeHistoryItem) -> Result<Self, CoreError> {
        let opened_at = parse_timestamp(&item.start_time)?;
        let closed_at = parse_timestamp(&item.end_time)?;

        Ok(Self {
            open_time: DisplayDateTime::from_instant(opened_at),
            close_time: DisplayDateTime::from_instant(closed_at),
            asset: item.coin.clone(),
            direction: item.direction.replace("Open ", ""),
            quantity: format::format_number(item.total_sz),
            entry: format::format_money(item.avg_entry_price),
            trade_value: format::format_money(item.total_value),
            pnl: item.pnl,
            fees: format::format_money(item.fees),
            funding: format::format_money(item.funding_fee),
            net_pnl: item.total_pnl,
            closed_at,
            trade_value_raw: item.total_value,
            fees_raw: item.fees,
            funding_raw: item.funding_fee,
        })
    }
}

/// Sort options of the trade-history tab. Every option sorts descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TradeSortKey {
    /// Close time, newest first
    #[default]
    Time,
    Value,
    Pnl,
    Fees,
    Funding,
    NetPnl,
}

impl TradeSortKey {
    pub const OPTIONS: [TradeSortKey; 6] = [
        TradeSortKey::Time,
        TradeSortKey::Value,
        TradeSortKey::Pnl,
        TradeSortKey::Fees,
        TradeSortKey::Funding,
        TradeSortKey::NetPnl,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TradeSortKey::Time => "Time",
            TradeSortKey::Value => "Value",
            TradeSortKey::Pnl => "P&L",
            TradeSortKey::Fees => "Fees",
            TradeSortKey::Funding => "Funding",
            TradeSortKey::NetPnl => "Net P&L",
        }
    }
}

impl FromStr for TradeSortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TradeSortKey::OPTIONS
            .into_iter()
            .find(|k| k.label() == s)
            .ok_or_else(|| {
                CoreError::ValidationError(format!("Unknown trade history sort option '{s}'"))
            })
    }
}
