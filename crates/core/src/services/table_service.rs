use std::cmp::Ordering;
use tracing::warn;

use crate::errors::CoreError;
use crate::models::page::Page;
use crate::models::position::{PositionRow, PositionSortKey};
use crate::models::trade::{TradeHistoryItem, TradeSortKey};
use crate::providers::traits::VaultDataProvider;

/// Rows per table page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Prepares the positions and trade-history tables: fetch, format, sort, paginate.
pub struct TableService;

impl TableService {
    pub fn new() -> Self {
        Self
    }

    /// Open positions as display rows, in backend order.
    pub async fn load_positions(
        &self,
        provider: &dyn VaultDataProvider,
        user_address: &str,
    ) -> Result<Vec<PositionRow>, CoreError> {
        let positions = provider.get_positions(user_address).await?;
        Ok(positions.iter().map(PositionRow::from_position).collect())
    }

    /// Trade history as display rows.
    ///
    /// A failed fetch yields an empty table (logged); a record with an
    /// unreadable timestamp is dropped (logged).
    pub async fn load_trade_history(
        &self,
        provider: &dyn VaultDataProvider,
    ) -> Vec<TradeHistoryItem> {
        let items = match provider.get_trade_history().await {
            Ok(items) => items,
            Err(e) => {
                warn!(provider = provider.name(), error = %e, "trade history fetch failed");
                return Vec::new();
            }
        };

        items
            .iter()
            .filter_map(|item| match TradeHistoryItem::from_api(item) {
                Ok(row) => Some(row),
                Err(e) => {
                    warn!(coin = %item.coin, error = %e, "dropping trade history record");
                    None
                }
            })
            .collect()
    }
}

impl Default for TableService {
    fn default() -> Self {
        Self::new()
    }
}

fn desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Sort positions in place (stable). `None` keeps the backend's order.
pub fn sort_positions(rows: &mut [PositionRow], key: PositionSortKey) {
    match key {
        PositionSortKey::None => {}
        PositionSortKey::Asset => rows.sort_by(|a, b| a.asset.cmp(&b.asset)),
        PositionSortKey::Value => rows.sort_by(|a, b| desc(a.position_value, b.position_value)),
        PositionSortKey::Pnl => rows.sort_by(|a, b| desc(a.pnl, b.pnl)),
        PositionSortKey::Funding => rows.sort_by(|a, b| desc(a.funding_value, b.funding_value)),
    }
}

/// Sort trade history in place (stable). Every key sorts largest/newest first.
pub fn sort_trades(rows: &mut [TradeHistoryItem], key: TradeSortKey) {
    match key {
        TradeSortKey::Time => rows.sort_by(|a, b| b.closed_at.cmp(&a.closed_at)),
        TradeSortKey::Value => rows.sort_by(|a, b| desc(a.trade_value_raw, b.trade_value_raw)),
        TradeSortKey::Pnl => rows.sort_by(|a, b| desc(a.pnl, b.pnl)),
        TradeSortKey::Fees => rows.sort_by(|a, b| desc(a.fees_raw, b.fees_raw)),
        TradeSortKey::Funding => rows.sort_by(|a, b| desc(a.funding_raw, b.funding_raw)),
        TradeSortKey::NetPnl => rows.sort_by(|a, b| desc(a.net_pnl, b.net_pnl)),
    }
}

/// Slice out one 1-based page. The page number is clamped into range and an
/// empty input yields a single empty page.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);

    let start = ((page - 1) * page_size).min(total_items);
    let end = (start + page_size).min(total_items);

    Page {
        items: items[start..end].to_vec(),
        page,
        total_pages,
        total_items,
        page_size,
    }
}
