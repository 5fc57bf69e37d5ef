//! Chart-data normalization pipeline.
//!
//! Raw per-asset series → timestamp union → gap fill (non-trading assets)
//! → percentage normalization → merge → trailing-zero backfill → frozen
//! [`MergedSeries`]. Every step is a pure function over request-scoped values.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::asset::TrackedAsset;
use crate::models::chart::{MergedPoint, MergedSeries, UnionTimestamp};
use crate::models::price::{AssetSeries, RawPoint};

/// Percentage values are rounded to this many decimals.
const PCT_DECIMALS: i32 = 3;

/// One asset's percentage-change series, keyed by the asset's display name.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSeries {
    pub display_name: String,
    pub values: Vec<(DateTime<Utc>, f64)>,
}

/// A chart row while the merge is still in progress.
///
/// Rows are only mutable until [`ChartRow::freeze`] turns them into
/// [`MergedPoint`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRow {
    pub instant: DateTime<Utc>,
    pub source_ts: String,
    pub values: BTreeMap<String, f64>,
}

impl ChartRow {
    pub fn freeze(self) -> MergedPoint {
        MergedPoint::new(self.instant, self.source_ts, self.values)
    }
}

/// Sorted, duplicate-free union of every instant seen in a non-empty series.
///
/// Instants are compared as parsed values, so `...Z` and `...+00:00` for the
/// same moment collapse into one entry; the first source string seen is kept.
pub fn align_timestamps(series: &[AssetSeries]) -> Vec<UnionTimestamp> {
    let mut union: BTreeMap<DateTime<Utc>, String> = BTreeMap::new();
    for s in series.iter().filter(|s| !s.is_empty()) {
        for point in &s.points {
            union
                .entry(point.instant)
                .or_insert_with(|| point.ts.clone());
        }
    }
    union
        .into_iter()
        .map(|(instant, source_ts)| UnionTimestamp { instant, source_ts })
        .collect()
}

/// Forward-fill a series over the timestamp union.
///
/// Returns a new series with one point per union timestamp, starting at the
/// asset's first real point: the real point where one exists, otherwise a
/// synthetic point carrying the last known price strictly before it.
/// Nothing is emitted before the first real point. The input is untouched.
pub fn fill_missing_points(series: &AssetSeries, union: &[UnionTimestamp]) -> AssetSeries {
    let mut filled = Vec::with_capacity(union.len());
    let mut last_known: Option<f64> = None;
    let mut cursor = series.points.iter().peekable();

    for ts in union {
        // Consume anything strictly earlier (only possible if the union was
        // built from other series); it still counts as a known price.
        while let Some(p) = cursor.peek() {
            if p.instant < ts.instant {
                last_known = Some(p.price);
                cursor.next();
            } else {
                break;
            }
        }

        match cursor.peek() {
            Some(p) if p.instant == ts.instant => {
                filled.push((*p).clone());
                last_known = Some(p.price);
                cursor.next();
            }
            _ => {
                if let Some(price) = last_known {
                    filled.push(RawPoint::new(ts.source_ts.clone(), ts.instant, price));
                }
            }
        }
    }

    AssetSeries {
        asset: series.asset.clone(),
        points: filled,
    }
}

fn round_pct(value: f64) -> f64 {
    let factor = 10f64.powi(PCT_DECIMALS);
    let rounded = (value * factor).round() / factor;
    // no negative zero in the output
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Rebase a series to 0% at its first point: `(p - p0) / p0 * 100`, 3 decimals.
///
/// `None` when the series is empty or its baseline is zero (or not finite);
/// such an asset is left out of the chart for this window.
pub fn normalize(series: &AssetSeries) -> Option<NormalizedSeries> {
    let base = series.points.first()?.price;
    if base == 0.0 || !base.is_finite() {
        return None;
    }
    let values = series
        .points
        .iter()
        .map(|p| (p.instant, round_pct((p.price - base) / base * 100.0)))
        .collect();
    Some(NormalizedSeries {
        display_name: series.asset.display_name.clone(),
        values,
    })
}

/// Build one row per union timestamp, seeded with every tracked asset at 0,
/// and write each normalized value into the row with the same instant.
///
/// Series for assets that are not tracked are ignored.
pub fn merge_series(
    assets: &[TrackedAsset],
    union: &[UnionTimestamp],
    normalized: &[NormalizedSeries],
) -> Vec<ChartRow> {
    let seed: BTreeMap<String, f64> = assets
        .iter()
        .map(|a| (a.display_name.clone(), 0.0))
        .collect();

    let mut rows: Vec<ChartRow> = union
        .iter()
        .map(|ts| ChartRow {
            instant: ts.instant,
            source_ts: ts.source_ts.clone(),
            values: seed.clone(),
        })
        .collect();
    rows.sort_by_key(|r| r.instant);

    for series in normalized {
        if !seed.contains_key(&series.display_name) {
            debug!(asset = %series.display_name, "skipping series for untracked asset");
            continue;
        }
        for (instant, pct) in &series.values {
            if let Ok(idx) = rows.binary_search_by_key(instant, |r| r.instant) {
                if let Some(slot) = rows[idx].values.get_mut(&series.display_name) {
                    *slot = *pct;
                }
            }
        }
    }

    rows
}

/// Replace the run of zeros at the very end of one asset's column with the
/// last non-zero value before it. Zeros anywhere else are left alone, and a
/// column that is entirely zero is left alone.
///
/// Returns how many rows were rewritten.
pub fn backfill_trailing_zeros(rows: &mut [ChartRow], asset: &str) -> usize {
    let last_non_zero = rows
        .iter()
        .rev()
        .filter_map(|r| r.values.get(asset).copied())
        .find(|v| *v != 0.0);

    let Some(fill) = last_non_zero else {
        return 0;
    };

    let mut rewritten = 0;
    for row in rows.iter_mut().rev() {
        match row.values.get_mut(asset) {
            Some(v) if *v == 0.0 => {
                *v = fill;
                rewritten += 1;
            }
            _ => break,
        }
    }
    rewritten
}

/// Run the whole pipeline over one request's fetched series.
///
/// Fails with [`CoreError::NoValidData`] when every series is empty and with
/// [`CoreError::NoDataPoints`] when nothing survives processing.
pub fn build_chart_series(
    assets: &[TrackedAsset],
    fetched: &[AssetSeries],
) -> Result<MergedSeries, CoreError> {
    if fetched.iter().all(AssetSeries::is_empty) {
        warn!("no asset returned price data");
        return Err(CoreError::NoValidData);
    }

    let union = align_timestamps(fetched);

    let mut normalized = Vec::new();
    for series in fetched.iter().filter(|s| !s.is_empty()) {
        let filled;
        let processed = if series.asset.non_trading {
            filled = fill_missing_points(series, &union);
            &filled
        } else {
            series
        };

        match normalize(processed) {
            Some(n) => normalized.push(n),
            None => warn!(
                asset = %series.asset.display_name,
                "zero baseline price; asset excluded from this window"
            ),
        }
    }

    let mut rows = merge_series(assets, &union, &normalized);

    for asset in assets.iter().filter(|a| a.trailing_backfill) {
        let rewritten = backfill_trailing_zeros(&mut rows, &asset.display_name);
        if rewritten > 0 {
            debug!(asset = %asset.display_name, rewritten, "backfilled trailing zeros");
        }
    }

    let names = assets.iter().map(|a| a.display_name.clone()).collect();
    let vault = assets
        .iter()
        .find(|a| a.is_vault)
        .map(|a| a.display_name.clone());
    let points = rows.into_iter().map(ChartRow::freeze).collect();

    MergedSeries::new(names, vault, points)
}
