use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::CoreError;
use crate::format;

use super::timeframe::Timeframe;

/// One instant of the timestamp union, with the source string it was first seen as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionTimestamp {
    pub instant: DateTime<Utc>,
    pub source_ts: String,
}

/// A single row of the comparative performance chart.
///
/// Immutable once built: carries the instant it stands for, its display
/// fields and one percentage-change value per tracked asset, keyed by the
/// asset's display name. Serializes flat, so each asset is a top-level key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedPoint {
    timestamp: DateTime<Utc>,
    source_ts: String,
    display_date: String,
    display_time: String,
    display_time_12h: String,
    #[serde(flatten)]
    values: BTreeMap<String, f64>,
}

impl MergedPoint {
    /// Build a point; display fields are derived from the instant.
    pub fn new(
        timestamp: DateTime<Utc>,
        source_ts: impl Into<String>,
        values: BTreeMap<String, f64>,
    ) -> Self {
        Self {
            timestamp,
            source_ts: source_ts.into(),
            display_date: format::format_date(timestamp),
            display_time: format::format_time_24h(timestamp),
            display_time_12h: format::format_time_12h(timestamp),
            values,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn source_ts(&self) -> &str {
        &self.source_ts
    }

    /// Day and abbreviated month, e.g. "05 Jun".
    pub fn display_date(&self) -> &str {
        &self.display_date
    }

    /// 24-hour "HH:mm".
    pub fn display_time(&self) -> &str {
        &self.display_time
    }

    /// 12-hour "h:mm AM/PM".
    pub fn display_time_12h(&self) -> &str {
        &self.display_time_12h
    }

    /// Percentage change for one asset at this instant.
    pub fn value(&self, asset: &str) -> Option<f64> {
        self.values.get(asset).copied()
    }

    pub fn values(&self) -> &BTreeMap<String, f64> {
        &self.values
    }
}

/// The full, validated output of the chart pipeline.
///
/// Only obtainable through [`MergedSeries::new`], which guarantees a
/// non-empty sequence, ascending instants and a value for every tracked
/// asset in every point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedSeries {
    assets: Vec<String>,
    vault: Option<String>,
    points: Vec<MergedPoint>,
}

impl MergedSeries {
    /// Validate and freeze a set of merged points.
    ///
    /// `vault` names the asset used for P&L and drawdown, if any.
    pub fn new(
        assets: Vec<String>,
        vault: Option<String>,
        mut points: Vec<MergedPoint>,
    ) -> Result<Self, CoreError> {
        if points.is_empty() {
            return Err(CoreError::NoDataPoints);
        }
        if let Some(v) = &vault {
            if !assets.contains(v) {
                return Err(CoreError::ValidationError(format!(
                    "Vault asset '{v}' is not among the tracked assets"
                )));
            }
        }

        for point in &points {
            if let Some(missing) = assets.iter().find(|a| !point.values.contains_key(*a)) {
                return Err(CoreError::IncompletePoint {
                    timestamp: point.timestamp.to_rfc3339(),
                    asset: missing.clone(),
                });
            }
        }

        points.sort_by_key(|p| p.timestamp);

        Ok(Self {
            assets,
            vault,
            points,
        })
    }

    pub fn points(&self) -> &[MergedPoint] {
        &self.points
    }

    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed series; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&MergedPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&MergedPoint> {
        self.points.last()
    }

    /// The ordered percentage series of one asset, or `None` if not tracked.
    pub fn series_for(&self, asset: &str) -> Option<Vec<f64>> {
        if !self.assets.iter().any(|a| a == asset) {
            return None;
        }
        Some(
            self.points
                .iter()
                .map(|p| p.value(asset).unwrap_or(0.0))
                .collect(),
        )
    }

    /// The vault's percentage series (empty if no vault is tracked).
    pub fn vault_series(&self) -> Vec<f64> {
        self.vault
            .as_deref()
            .and_then(|v| self.series_for(v))
            .unwrap_or_default()
    }

    pub fn vault_name(&self) -> Option<&str> {
        self.vault.as_deref()
    }
}

/// What the dashboard currently displays for the chart and its derived metrics.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSnapshot {
    /// Window this data was fetched for
    pub timeframe: Timeframe,

    /// Sequence number of the request that produced it
    pub sequence: u64,

    pub series: MergedSeries,

    /// Maximum drawdown of the vault series (percentage points, ≤ 0)
    pub drawdown: f64,

    /// `last.vault - first.vault` over the series
    pub pnl: f64,
}
