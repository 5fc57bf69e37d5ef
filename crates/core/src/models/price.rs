use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

use super::asset::TrackedAsset;

/// One element of the `/prices` response, exactly as the backend sends it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiPricePoint {
    pub ts: String,
    pub asset: String,
    pub avg_price: f64,
}

/// A price observation with its timestamp parsed to an instant.
///
/// `ts` keeps the source string so merged points can echo it back;
/// ordering and matching always use `instant`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPoint {
    pub ts: String,
    pub instant: DateTime<Utc>,
    pub price: f64,
}

impl RawPoint {
    pub fn new(ts: impl Into<String>, instant: DateTime<Utc>, price: f64) -> Self {
        Self {
            ts: ts.into(),
            instant,
            price,
        }
    }

    /// Parse a wire point. Fails on an unparseable timestamp.
    pub fn from_api(point: &ApiPricePoint) -> Result<Self, CoreError> {
        let instant = parse_timestamp(&point.ts)?;
        Ok(Self::new(point.ts.clone(), instant, point.avg_price))
    }
}

/// The fetched price history of one tracked asset for one chart request.
///
/// Points are sorted ascending by instant. Created fresh per request.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetSeries {
    pub asset: TrackedAsset,
    pub points: Vec<RawPoint>,
}

impl AssetSeries {
    /// Build a series, sorting the points by instant.
    pub fn new(asset: TrackedAsset, mut points: Vec<RawPoint>) -> Self {
        points.sort_by_key(|p| p.instant);
        Self { asset, points }
    }

    /// A series standing in for a failed or empty fetch.
    pub fn empty(asset: TrackedAsset) -> Self {
        Self {
            asset,
            points: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Price at an exact instant. Uses binary search (O(log n)).
    pub fn price_at(&self, instant: DateTime<Utc>) -> Option<f64> {
        self.points
            .binary_search_by_key(&instant, |p| p.instant)
            .ok()
            .map(|idx| self.points[idx].price)
    }
}

/// Parse an ISO-8601 timestamp from the backend.
///
/// Accepts RFC 3339 (with offset), naive date-times (`T` or space separated,
/// optional fractional seconds) and bare dates. Naive values are read as UTC.
pub fn parse_timestamp(ts: &str) -> Result<DateTime<Utc>, CoreError> {
    let trimmed = ts.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    Err(CoreError::InvalidTimestamp(ts.to_string()))
}
