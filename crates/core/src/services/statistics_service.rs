use tracing::warn;

use crate::models::statistics::{CompositionSlice, StatisticsFlag, StatisticsItem};
use crate::providers::traits::VaultDataProvider;

/// Donut palette. Entries reserved for well-known coins are skipped when
/// assigning colors to everything else.
const PALETTE: [&str; 21] = [
    "#FF8A00", "#9A9A9A", "#00FFA6", "#A259FF", "#F5F5F5", "#FF0080", "#00CFFF",
    "#FFD600", "#1790FF", "#FF5C5C", "#00E676", "#FFB300", "#FF6F00", "#8D33FF",
    "#33FFF3", "#FF33A8", "#33FF57", "#3366FF", "#FF3333", "#B3FF33", "#A15CE7",
];

const CUSTOM_COLORS: [(&str, &str); 4] = [
    ("BTC", "#FF8A00"),
    ("ETH", "#9A9A9A"),
    ("HYPE", "#00FFA6"),
    ("SOL", "#A15CE7"),
];

/// Builds the portfolio composition donut from per-coin statistics.
pub struct StatisticsService;

impl StatisticsService {
    pub fn new() -> Self {
        Self
    }

    /// Fetch and convert statistics for one flag.
    /// A failed fetch yields no slices (logged).
    pub async fn load_composition(
        &self,
        provider: &dyn VaultDataProvider,
        flag: StatisticsFlag,
    ) -> Vec<CompositionSlice> {
        match provider.get_statistics(flag).await {
            Ok(items) => composition_slices(&items, flag),
            Err(e) => {
                warn!(flag = flag.as_query(), error = %e, "statistics fetch failed");
                Vec::new()
            }
        }
    }
}

impl Default for StatisticsService {
    fn default() -> Self {
        Self::new()
    }
}

/// The signed value of the statistic selected by `flag` (missing → 0).
/// Fees are reported as a cost, so their sign is flipped.
pub fn metric_value(item: &StatisticsItem, flag: StatisticsFlag) -> f64 {
    match flag {
        StatisticsFlag::TopNetpnl => item.total_pnl.unwrap_or(0.0),
        StatisticsFlag::TopNumTrades => item.num_positions.unwrap_or(0.0),
        StatisticsFlag::TopVolume => item.total_value.unwrap_or(0.0),
        StatisticsFlag::TopFees => -item.fees.unwrap_or(0.0),
    }
}

/// Color for the slice at `index`: fixed for well-known coins, otherwise
/// taken in order from the rest of the palette.
pub fn slice_color(coin: &str, index: usize) -> String {
    if let Some((_, color)) = CUSTOM_COLORS.iter().find(|(c, _)| *c == coin) {
        return (*color).to_string();
    }
    let free: Vec<&str> = PALETTE
        .iter()
        .copied()
        .filter(|p| !CUSTOM_COLORS.iter().any(|(_, c)| c.eq_ignore_ascii_case(p)))
        .collect();
    free[index % free.len()].to_string()
}

fn format_slice_amount(actual: f64, flag: StatisticsFlag) -> String {
    let formatted = match flag {
        StatisticsFlag::TopNetpnl | StatisticsFlag::TopVolume => format!("${:.0}", actual.abs()),
        StatisticsFlag::TopNumTrades => format!("{}", actual.round() as i64),
        StatisticsFlag::TopFees => format!("${:.2}", actual.abs()),
    };
    if flag != StatisticsFlag::TopNumTrades && actual < 0.0 {
        format!("-{formatted}")
    } else {
        formatted
    }
}

/// Convert statistics into donut slices.
///
/// Each slice's share is `|value| / Σ|value| * 100` (0 when the total is 0).
pub fn composition_slices(items: &[StatisticsItem], flag: StatisticsFlag) -> Vec<CompositionSlice> {
    let total: f64 = items.iter().map(|i| metric_value(i, flag).abs()).sum();

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let actual_value = metric_value(item, flag);
            let value = if total == 0.0 {
                0.0
            } else {
                actual_value.abs() / total * 100.0
            };
            CompositionSlice {
                name: item.coin.clone(),
                value,
                usd: format_slice_amount(actual_value, flag),
                color: slice_color(&item.coin, index),
                actual_value,
            }
        })
        .collect()
}
