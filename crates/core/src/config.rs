use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::errors::CoreError;
use crate::models::asset::{default_tracked_assets, TrackedAsset};
use crate::providers::http::DEFAULT_BASE_URL;
use crate::services::table_service::DEFAULT_PAGE_SIZE;

/// Environment variable overriding the API base URL.
pub const ENV_API_URL: &str = "VAULT_API_URL";

/// Environment variable overriding the vault account address.
pub const ENV_USER_ADDRESS: &str = "VAULT_USER_ADDRESS";

pub const DEFAULT_USER_ADDRESS: &str = "0xb3ce8b2e01a0fe858c498a24302bd5dbad48aef2";

/// Everything the dashboard core needs to know, passed in explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Backend base URL, without a trailing slash
    pub api_base_url: String,

    /// Vault account whose positions and metrics are shown
    pub user_address: String,

    /// Rows per page in the positions and trade-history tables
    pub page_size: usize,

    /// HTTP request timeout (native targets only)
    pub request_timeout_secs: u64,

    /// Series on the comparative chart, vault first
    pub tracked_assets: Vec<TrackedAsset>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            user_address: DEFAULT_USER_ADDRESS.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout_secs: 30,
            tracked_assets: default_tracked_assets(),
        }
    }
}

impl DashboardConfig {
    /// Defaults, overlaid with `VAULT_API_URL` / `VAULT_USER_ADDRESS` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(ENV_API_URL) {
            if !url.trim().is_empty() {
                config.api_base_url = url.trim().to_string();
            }
        }
        if let Ok(addr) = std::env::var(ENV_USER_ADDRESS) {
            if !addr.trim().is_empty() {
                config.user_address = addr.trim().to_string();
            }
        }
        config
    }

    /// Parse a JSON config; missing fields fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_user_address(mut self, address: impl Into<String>) -> Self {
        self.user_address = address.into();
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_tracked_assets(mut self, assets: Vec<TrackedAsset>) -> Self {
        self.tracked_assets = assets;
        self
    }

    /// Reject configurations the dashboard cannot run with.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.api_base_url.trim().is_empty() {
            return Err(CoreError::ValidationError("API base URL must not be empty".into()));
        }
        if self.page_size == 0 {
            return Err(CoreError::ValidationError("Page size must be at least 1".into()));
        }
        if self.tracked_assets.is_empty() {
            return Err(CoreError::ValidationError(
                "At least one tracked asset is required".into(),
            ));
        }

        let mut names = HashSet::new();
        for asset in &self.tracked_assets {
            if !names.insert(asset.display_name.as_str()) {
                return Err(CoreError::ValidationError(format!(
                    "Duplicate tracked asset '{}'",
                    asset.display_name
                )));
            }
        }

        match self.tracked_assets.iter().filter(|a| a.is_vault).count() {
            1 => Ok(()),
            0 => Err(CoreError::ValidationError("No vault asset configured".into())),
            n => Err(CoreError::ValidationError(format!(
                "Exactly one vault asset expected, found {n}"
            ))),
        }
    }
}
