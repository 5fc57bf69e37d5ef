use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::position::Position;
use crate::models::price::ApiPricePoint;
use crate::models::statistics::{StatisticsFlag, StatisticsItem};
use crate::models::timeframe::Frequency;
use crate::models::trade::ApiTradeHistoryItem;
use super::traits::VaultDataProvider;

pub const DEFAULT_BASE_URL: &str = "https://back.axylon.com";

const PROVIDER_NAME: &str = "VaultApi";

/// HTTP client for the vault analytics backend.
///
/// - **Endpoints**: `/prices`, `/positions`, `/positions_history`,
///   `/positions_statistics`, `/last_tvl`, `/volume`, `/sharpe`, `/volatility`
/// - **Format**: plain JSON over HTTPS, no authentication.
///
/// Any non-2xx status is an error; the body is not inspected.
pub struct HttpVaultProvider {
    client: Client,
    base_url: String,
}

impl HttpVaultProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout_secs(base_url, 30)
    }

    /// `timeout_secs` is ignored on wasm32, where the browser owns timeouts.
    pub fn with_timeout_secs(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(timeout_secs));
        #[cfg(target_arch = "wasm32")]
        let _ = timeout_secs;
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of an endpoint path such as `/prices`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, CoreError> {
        let resp = self
            .client
            .get(self.endpoint(path))
            .query(query)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::HttpStatus {
                provider: PROVIDER_NAME.into(),
                status: status.as_u16(),
            });
        }

        resp.json::<T>().await.map_err(|e| CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("Failed to parse response from {path}: {e}"),
        })
    }

    /// Fetch a single-number metric endpoint, reading the first of `fields` present.
    async fn get_metric(
        &self,
        path: &str,
        query: &[(&str, &str)],
        fields: &[&str],
    ) -> Result<Option<f64>, CoreError> {
        let body: Value = self.get_json(path, query).await?;
        Ok(metric_field(&body, fields))
    }
}

impl Default for HttpVaultProvider {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Read the first present field of `fields` as a number.
///
/// The backend sends some metrics as JSON numbers and some as numeric strings.
pub fn metric_field(body: &Value, fields: &[&str]) -> Option<f64> {
    fields
        .iter()
        .find_map(|field| match body.get(*field)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
        .filter(|v| v.is_finite())
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl VaultDataProvider for HttpVaultProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn get_price_series(
        &self,
        symbol: &str,
        frequency: Frequency,
    ) -> Result<Vec<ApiPricePoint>, CoreError> {
        self.get_json("/prices", &[("asset", symbol), ("freq", frequency.as_str())])
            .await
    }

    async fn get_positions(&self, user_address: &str) -> Result<Vec<Position>, CoreError> {
        self.get_json("/positions", &[("user_address", user_address)])
            .await
    }

    async fn get_trade_history(&self) -> Result<Vec<ApiTradeHistoryItem>, CoreError> {
        self.get_json("/positions_history", &[]).await
    }

    async fn get_statistics(
        &self,
        flag: StatisticsFlag,
    ) -> Result<Vec<StatisticsItem>, CoreError> {
        self.get_json("/positions_statistics", &[("flag", flag.as_query())])
            .await
    }

    async fn get_tvl(&self, user_address: &str) -> Result<Option<f64>, CoreError> {
        self.get_metric("/last_tvl", &[("user_address", user_address)], &["tvl"])
            .await
    }

    async fn get_volume(
        &self,
        user_address: &str,
        frequency: Frequency,
    ) -> Result<Option<f64>, CoreError> {
        self.get_metric(
            "/volume",
            &[("user_address", user_address), ("freq", frequency.as_str())],
            &["volume"],
        )
        .await
    }

    async fn get_sharpe(
        &self,
        user_address: &str,
        frequency: Frequency,
    ) -> Result<Option<f64>, CoreError> {
        self.get_metric(
            "/sharpe",
            &[("user_address", user_address), ("freq", frequency.as_str())],
            &["sharpe", "sharpe_ratio"],
        )
        .await
    }

    async fn get_volatility(
        &self,
        user_address: &str,
        frequency: Frequency,
    ) -> Result<Option<f64>, CoreError> {
        self.get_metric(
            "/volatility",
            &[("user_address", user_address), ("freq", frequency.as_str())],
            &["volatility"],
        )
        .await
    }
}
