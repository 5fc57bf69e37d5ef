use serde::{Deserialize, Serialize};

/// Display name of the vault series in every merged chart point.
pub const VAULT_DISPLAY_NAME: &str = "Axylon's vault";

/// One instrument shown on the comparative performance chart.
///
/// **Equality** is based on `display_name` only: the display name is the key
/// under which the asset's percentage series appears in merged chart points,
/// so two entries with the same display name would collide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedAsset {
    /// Name used as the series key (e.g., "Bitcoin", "Axylon's vault")
    pub display_name: String,

    /// Symbol passed to the prices endpoint (e.g., "BTC", "Axylon")
    pub api_symbol: String,

    /// Instrument without continuous market hours (indices, commodities).
    /// Its series is gap-filled against the full timestamp union.
    #[serde(default)]
    pub non_trading: bool,

    /// Whether trailing zero artifacts at the chart's right edge are patched
    /// with the last non-zero value. Kept as an explicit per-asset allowlist.
    #[serde(default)]
    pub trailing_backfill: bool,

    /// Marks the vault itself (drives P&L and drawdown).
    #[serde(default)]
    pub is_vault: bool,
}

impl PartialEq for TrackedAsset {
    fn eq(&self, other: &Self) -> bool {
        self.display_name == other.display_name
    }
}

impl Eq for TrackedAsset {}

impl TrackedAsset {
    /// A 24/7 benchmark (crypto) with trailing backfill enabled.
    pub fn benchmark(display_name: impl Into<String>, api_symbol: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            api_symbol: api_symbol.into(),
            non_trading: false,
            trailing_backfill: true,
            is_vault: false,
        }
    }

    /// A benchmark with market hours; gap-filled, no trailing backfill.
    pub fn non_trading(display_name: impl Into<String>, api_symbol: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            api_symbol: api_symbol.into(),
            non_trading: true,
            trailing_backfill: false,
            is_vault: false,
        }
    }

    /// The vault series.
    pub fn vault(display_name: impl Into<String>, api_symbol: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            api_symbol: api_symbol.into(),
            non_trading: false,
            trailing_backfill: true,
            is_vault: true,
        }
    }
}

/// The vault plus the five benchmark instruments shown by default.
pub fn default_tracked_assets() -> Vec<TrackedAsset> {
    vec![
        TrackedAsset::vault(VAULT_DISPLAY_NAME, "Axylon"),
        TrackedAsset::benchmark("Bitcoin", "BTC"),
        TrackedAsset::benchmark("Ethereum", "ETH"),
        TrackedAsset::benchmark("Hyperliquid", "HYPE"),
        TrackedAsset::non_trading("SP500", "SP500"),
        TrackedAsset::non_trading("Gold", "GOLD"),
    ]
}
