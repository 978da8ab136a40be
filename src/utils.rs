use chrono::{Duration, NaiveDate, Utc};

/// Get search engine URL from environment variable or use default
pub fn get_search_engine_url() -> String {
    std::env::var("SEARCH_ENGINE_URL").unwrap_or_else(|_| "http://localhost:9200".to_string())
}

/// Get embedding service URL from environment variable or use default
pub fn get_embedding_service_url() -> String {
    std::env::var("EMBEDDING_SERVICE_URL").unwrap_or_else(|_| "http://localhost:11434".to_string())
}

/// Get embedding model name from environment variable or use default
///
/// The default is a Korean sentence-embedding model; any model served by the
/// embedding endpoint works as long as it produces 768-dim vectors.
pub fn get_embedding_model() -> String {
    std::env::var("EMBEDDING_MODEL").unwrap_or_else(|_| "kr-sbert".to_string())
}

/// Get price-history API URL (daily bars and market indices)
pub fn get_price_api_url() -> String {
    std::env::var("PRICE_API_URL").unwrap_or_else(|_| "http://localhost:8510".to_string())
}

/// Get intraday chart API URL (1-minute bars by suffixed ticker)
pub fn get_intraday_api_url() -> String {
    std::env::var("INTRADAY_API_URL")
        .unwrap_or_else(|_| "https://query1.finance.yahoo.com".to_string())
}

/// Get market snapshot API URL (full-market daily OHLCV tables)
pub fn get_snapshot_api_url() -> String {
    std::env::var("MARKET_SNAPSHOT_API_URL").unwrap_or_else(|_| "http://localhost:8511".to_string())
}

/// Get corporate listing download URL for the bulk loader
pub fn get_corp_listing_url() -> String {
    std::env::var("CORP_LISTING_URL")
        .unwrap_or_else(|_| "http://kind.krx.co.kr/corpgeneral/corpList.do?method=download".to_string())
}

/// Format a date as YYYYMMDD (market snapshot API convention)
pub fn format_snapshot_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Start of a calendar-day lookback window ending today
pub fn lookback_start(days: i64) -> NaiveDate {
    (Utc::now() - Duration::days(days)).date_naive()
}
