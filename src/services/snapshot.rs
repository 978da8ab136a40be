//! Full-market daily snapshot boundary
//!
//! One trading day's OHLCV table for a whole market, keyed by date and market
//! scope. The upstream keeps the Korean column names of the exchange data
//! (티커/종가/거래량/등락률); a non-trading day comes back as an empty table.
//! The trait seam exists so the ranking scan-back logic can be exercised
//! without the upstream.

use crate::constants::HTTP_TIMEOUT_SECS;
use crate::error::{AppError, Result};
use crate::utils::{format_snapshot_date, get_snapshot_api_url};
use async_trait::async_trait;
use chrono::NaiveDate;
use isahc::{config::Configurable, prelude::*, HttpClient};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// One row of a full-market snapshot
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotRow {
    #[serde(rename = "티커")]
    pub ticker: String,
    #[serde(rename = "종가")]
    pub close: f64,
    #[serde(rename = "거래량")]
    pub volume: u64,
    #[serde(rename = "등락률")]
    pub change_pct: f64,
}

#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Full-market OHLCV table for one trading date; empty on non-trading days
    async fn market_ohlcv(&self, date: NaiveDate, market: &str) -> Result<Vec<SnapshotRow>>;

    /// Display name for a ticker, if the upstream knows it
    async fn ticker_name(&self, ticker: &str) -> Result<Option<String>>;
}

/// HTTP implementation of the snapshot boundary
pub struct SnapshotClient {
    client: HttpClient,
    base_url: String,
}

impl SnapshotClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(get_snapshot_api_url())
    }

    pub fn with_base_url(base_url: String) -> Result<Self> {
        let client = HttpClient::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        let mut resp = self.client.get_async(url).await?;
        let status = resp.status();
        let text = resp.text().await.map_err(|e| AppError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(AppError::Network(format!(
                "snapshot source returned {}: {}",
                status.as_u16(),
                text
            )));
        }

        serde_json::from_str(&text).map_err(AppError::from)
    }
}

#[async_trait]
impl SnapshotSource for SnapshotClient {
    async fn market_ohlcv(&self, date: NaiveDate, market: &str) -> Result<Vec<SnapshotRow>> {
        let url = format!(
            "{}/market/ohlcv?date={}&market={}",
            self.base_url,
            format_snapshot_date(date),
            market
        );
        debug!("Snapshot request: date={}, market={}", date, market);

        let data = self.get_json(&url).await?;
        let rows = data
            .as_array()
            .ok_or_else(|| AppError::Parse("snapshot response is not a table".to_string()))?;

        rows.iter()
            .map(|row| {
                serde_json::from_value(row.clone())
                    .map_err(|e| AppError::Parse(format!("malformed snapshot row: {}", e)))
            })
            .collect()
    }

    async fn ticker_name(&self, ticker: &str) -> Result<Option<String>> {
        let url = format!("{}/ticker/{}/name", self.base_url, ticker);
        let data = self.get_json(&url).await?;
        Ok(data["종목명"].as_str().map(|s| s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_row_korean_columns() {
        let row: SnapshotRow = serde_json::from_value(serde_json::json!({
            "티커": "005930",
            "시가": 71000,
            "고가": 71800,
            "저가": 70600,
            "종가": 71500.0,
            "거래량": 12000000,
            "등락률": 1.42
        }))
        .unwrap();

        assert_eq!(row.ticker, "005930");
        assert_eq!(row.close, 71500.0);
        assert_eq!(row.volume, 12_000_000);
        assert!((row.change_pct - 1.42).abs() < 1e-9);
    }
}
