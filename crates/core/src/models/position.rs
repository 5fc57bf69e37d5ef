use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;
use crate::format;

/// An open position as returned by `/positions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub coin: String,
    pub leverage: f64,
    /// Signed size: positive is long, negative is short
    pub size: f64,
    pub entry_px: f64,
    pub position_value: f64,
    pub u_pnl: f64,
    pub liquidation_px: f64,
    pub margin: f64,
    pub funding: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Long => write!(f, "Long"),
            Direction::Short => write!(f, "Short"),
        }
    }
}

/// A positions-table row: display strings plus the numbers they came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRow {
    pub asset: String,
    pub direction: Direction,
    /// Absolute size, four decimals
    pub quantity: String,
    pub entry: String,
    /// Position value
    pub trade: String,
    pub mark: String,
    /// Unrealized P&L, kept numeric for sign coloring
    pub pnl: f64,
    pub liq: String,
    /// Funding, two decimals
    pub funding: String,

    pub position_value: f64,
    pub funding_value: f64,
}

impl PositionRow {
    /// Derive a display row from a raw position.
    ///
    /// Mark price is backed out of the unrealized P&L:
    /// `entry * (1 + uPnl / positionValue)`; with a zero position value the
    /// entry price is shown instead.
    pub fn from_position(position: &Position) -> Self {
        let direction = if position.size > 0.0 {
            Direction::Long
        } else {
            Direction::Short
        };
        let mark_price = if position.position_value != 0.0 {
            position.entry_px * (1.0 + position.u_pnl / position.position_value)
        } else {
            position.entry_px
        };

        Self {
            asset: position.coin.clone(),
            direction,
            quantity: format!("{:.4}", position.size.abs()),
            entry: format!("${}", format::format_number(position.entry_px)),
            trade: format!("${}", format::format_number(position.position_value)),
            mark: format!("${}", format::format_number(mark_price)),
            pnl: position.u_pnl,
            liq: format!("${}", format::format_number(position.liquidation_px)),
            funding: format!("{:.2}", position.funding),
            position_value: position.position_value,
            funding_value: position.funding,
        }
    }
}

/// Sort options of the positions tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PositionSortKey {
    /// Keep the backend's order
    #[default]
    None,
    /// Alphabetical by coin
    Asset,
    /// Position value, largest first
    Value,
    /// Unrealized P&L, largest first
    Pnl,
    /// Funding, largest first
    Funding,
}

impl PositionSortKey {
    pub const OPTIONS: [PositionSortKey; 4] = [
        PositionSortKey::Asset,
        PositionSortKey::Value,
        PositionSortKey::Pnl,
        PositionSortKey::Funding,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PositionSortKey::None => "",
            PositionSortKey::Asset => "Asset",
            PositionSortKey::Value => "Value",
            PositionSortKey::Pnl => "P&L",
            PositionSortKey::Funding => "Funding",
        }
    }
}

impl FromStr for PositionSortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(PositionSortKey::None),
            "Asset" => Ok(PositionSortKey::Asset),
            "Value" => Ok(PositionSortKey::Value),
            "P&L" => Ok(PositionSortKey::Pnl),
            "Funding" => Ok(PositionSortKey::Funding),
            other => Err(CoreError::ValidationError(format!(
                "Unknown positions sort option '{other}'"
            ))),
        }
    }
}
