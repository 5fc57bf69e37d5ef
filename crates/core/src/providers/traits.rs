use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::position::Position;
use crate::models::price::ApiPricePoint;
use crate::models::statistics::{StatisticsFlag, StatisticsItem};
use crate::models::timeframe::Frequency;
use crate::models::trade::ApiTradeHistoryItem;

/// Abstraction over the vault analytics backend.
///
/// The HTTP implementation talks to the real API; tests and offline hosts
/// plug in their own. Services only ever see this trait.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait VaultDataProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Price history of one asset at the given sampling frequency.
    async fn get_price_series(
        &self,
        symbol: &str,
        frequency: Frequency,
    ) -> Result<Vec<ApiPricePoint>, CoreError>;

    /// Currently open positions of a vault account.
    async fn get_positions(&self, user_address: &str) -> Result<Vec<Position>, CoreError>;

    /// Closed trades of the vault.
    async fn get_trade_history(&self) -> Result<Vec<ApiTradeHistoryItem>, CoreError>;

    /// Per-coin statistics ranked by the given flag.
    async fn get_statistics(&self, flag: StatisticsFlag)
        -> Result<Vec<StatisticsItem>, CoreError>;

    /// Latest total value locked.
    async fn get_tvl(&self, user_address: &str) -> Result<Option<f64>, CoreError>;

    async fn get_volume(
        &self,
        user_address: &str,
        frequency: Frequency,
    ) -> Result<Option<f64>, CoreError>;

    async fn get_sharpe(
        &self,
        user_address: &str,
        frequency: Frequency,
    ) -> Result<Option<f64>, CoreError>;

    async fn get_volatility(
        &self,
        user_address: &str,
        frequency: Frequency,
    ) -> Result<Option<f64>, CoreError>;
}
