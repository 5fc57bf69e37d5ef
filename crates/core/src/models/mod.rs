pub mod analytics;
pub mod asset;
pub mod chart;
pub mod page;
pub mod position;
pub mod price;
pub mod statistics;
pub mod timeframe;
pub mod trade;
