use futures::future::join_all;
use tracing::{debug, warn};

use crate::models::asset::TrackedAsset;
use crate::models::price::{ApiPricePoint, AssetSeries, RawPoint};
use crate::models::timeframe::Frequency;
use crate::providers::traits::VaultDataProvider;

/// Fetches the price series of every tracked asset for one chart request.
///
/// Fetch policy:
/// - All assets are requested concurrently; none waits on another.
/// - A failed asset (network error, non-2xx, malformed body) becomes an
///   empty series and is logged. It never fails the other fetches.
/// - No retries; the caller re-runs the whole request.
pub struct PriceService;

impl PriceService {
    pub fn new() -> Self {
        Self
    }

    /// Fetch all assets concurrently. Output order matches `assets`.
    pub async fn fetch_all(
        &self,
        provider: &dyn VaultDataProvider,
        assets: &[TrackedAsset],
        frequency: Frequency,
    ) -> Vec<AssetSeries> {
        join_all(
            assets
                .iter()
                .map(|asset| self.fetch_asset(provider, asset, frequency)),
        )
        .await
    }

    /// Fetch one asset, converting any failure into an empty series.
    pub async fn fetch_asset(
        &self,
        provider: &dyn VaultDataProvider,
        asset: &TrackedAsset,
        frequency: Frequency,
    ) -> AssetSeries {
        match provider.get_price_series(&asset.api_symbol, frequency).await {
            Ok(points) => {
                let series = AssetSeries::new(asset.clone(), to_raw_points(asset, &points));
                debug!(
                    asset = %asset.display_name,
                    points = series.len(),
                    "fetched price series"
                );
                series
            }
            Err(e) => {
                warn!(
                    asset = %asset.display_name,
                    provider = provider.name(),
                    error = %e,
                    "price fetch failed; asset excluded"
                );
                AssetSeries::empty(asset.clone())
            }
        }
    }
}

impl Default for PriceService {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse wire points, dropping any whose timestamp cannot be read.
pub fn to_raw_points(asset: &TrackedAsset, points: &[ApiPricePoint]) -> Vec<RawPoint> {
    points
        .iter()
        .filter_map(|p| match RawPoint::from_api(p) {
            Ok(raw) => Some(raw),
            Err(e) => {
                warn!(asset = %asset.display_name, error = %e, "dropping price point");
                None
            }
        })
        .collect()
}
