use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;

/// Chart window selected in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "7d")]
    SevenDays,
    #[serde(rename = "30d")]
    ThirtyDays,
    #[serde(rename = "All")]
    All,
}

/// Sampling interval understood by the backend (`freq` query parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "24h")]
    OneDay,
}

impl Timeframe {
    pub const ALL: [Timeframe; 4] = [
        Timeframe::OneDay,
        Timeframe::SevenDays,
        Timeframe::ThirtyDays,
        Timeframe::All,
    ];

    /// Backend frequency used for this window.
    #[must_use]
    pub fn frequency(self) -> Frequency {
        match self {
            Timeframe::OneDay => Frequency::FifteenMinutes,
            Timeframe::SevenDays => Frequency::OneHour,
            Timeframe::ThirtyDays => Frequency::FourHours,
            Timeframe::All => Frequency::OneDay,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::OneDay => "1d",
            Timeframe::SevenDays => "7d",
            Timeframe::ThirtyDays => "30d",
            Timeframe::All => "All",
        }
    }
}

impl Frequency {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::FifteenMinutes => "15m",
            Frequency::OneHour => "1h",
            Frequency::FourHours => "4h",
            Frequency::OneDay => "24h",
        }
    }
}

impl FromStr for Timeframe {
    type Err = CoreError;

    /// Keys are matched exactly, as the selector sends them.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1d" => Ok(Timeframe::OneDay),
            "7d" => Ok(Timeframe::SevenDays),
            "30d" => Ok(Timeframe::ThirtyDays),
            "All" => Ok(Timeframe::All),
            other => Err(CoreError::InvalidTimeframe(other.to_string())),
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
