pub mod analytics_service;
pub mod chart_service;
pub mod price_service;
pub mod series_transform;
pub mod statistics_service;
pub mod table_service;
