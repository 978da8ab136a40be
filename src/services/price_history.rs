//! Daily OHLCV and market-index history client
//!
//! The price-history source serves columnar chart data (parallel t/o/h/l/c/v
//! arrays) for tickers and index symbols alike. An empty column set means the
//! symbol had no data in the window, which is a normal outcome the caller
//! branches on; only transport and malformed-payload problems are errors.

use crate::constants::{HTTP_TIMEOUT_SECS, INDEX_LOOKBACK_DAYS};
use crate::error::{AppError, Result};
use crate::models::{Bar, MarketSegment};
use crate::utils::{get_price_api_url, lookback_start};
use chrono::{DateTime, NaiveDate, Utc};
use isahc::{config::Configurable, prelude::*, HttpClient};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

#[derive(Clone)]
pub struct PriceHistoryClient {
    client: HttpClient,
    base_url: String,
}

impl PriceHistoryClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(get_price_api_url())
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

    /// Daily bars for a symbol between two dates, ascending by time
    pub async fn get_daily(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>> {
        let url = format!("{}/chart/history", self.base_url);
        let payload = json!({
            "symbol": symbol,
            "interval": "1D",
            "from": start.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp(),
            "to": end.and_hms_opt(23, 59, 59).unwrap().and_utc().timestamp(),
        });

        debug!("Price history request: symbol={}, {}..{}", symbol, start, end);

        let response = self.post_json(&url, &payload).await?;
        parse_columnar_bars(&response)
    }

    /// 1-year market index series for a segment
    ///
    /// KONEX maps to the KOSDAQ index symbol (no free KONEX feed).
    pub async fn get_market_index(&self, market: MarketSegment) -> Result<Vec<Bar>> {
        let end = Utc::now().date_naive();
        let start = lookback_start(INDEX_LOOKBACK_DAYS);
        self.get_daily(market.index_symbol(), start, end).await
    }

    async fn post_json(&self, url: &str, payload: &Value) -> Result<Value> {
        let request = isahc::Request::builder()
            .uri(url)
            .method("POST")
            .header("Content-Type", "application/json")
            .header("Accept", "application/json, text/plain, */*")
            .body(serde_json::to_string(payload)?)
            .map_err(|e| AppError::Network(format!("Request build error: {}", e)))?;

        let mut resp = self.client.send_async(request).await?;
        let status = resp.status();
        let text = resp.text().await.map_err(|e| AppError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(AppError::Network(format!(
                "price source returned {}: {}",
                status.as_u16(),
                text
            )));
        }

        serde_json::from_str(&text).map_err(AppError::from)
    }
}

/// Decode parallel t/o/h/l/c/v arrays into bars, sorted ascending
///
/// A null body or empty time column decodes to an empty series.
pub(crate) fn parse_columnar_bars(data: &Value) -> Result<Vec<Bar>> {
    if data.is_null() {
        return Ok(vec![]);
    }

    let times = match data["t"].as_array() {
        Some(t) if !t.is_empty() => t,
        _ => return Ok(vec![]),
    };

    let opens = column(data, "o", times.len())?;
    let highs = column(data, "h", times.len())?;
    let lows = column(data, "l", times.len())?;
    let closes = column(data, "c", times.len())?;
    let volumes = column(data, "v", times.len())?;

    let mut bars = Vec::with_capacity(times.len());
    for i in 0..times.len() {
        let timestamp = times[i]
            .as_i64()
            .ok_or_else(|| AppError::Parse(format!("bad timestamp at index {}", i)))?;
        let time = DateTime::<Utc>::from_timestamp(timestamp, 0)
            .ok_or_else(|| AppError::Parse(format!("timestamp {} out of range", timestamp)))?;

        bars.push(Bar::new(
            time,
            opens[i].as_f64().unwrap_or(0.0),
            highs[i].as_f64().unwrap_or(0.0),
            lows[i].as_f64().unwrap_or(0.0),
            closes[i].as_f64().unwrap_or(0.0),
            volumes[i].as_u64().unwrap_or(0),
        ));
    }

    bars.sort_by_key(|b| b.time);
    Ok(bars)
}

fn column<'a>(data: &'a Value, key: &str, expected_len: usize) -> Result<&'a Vec<Value>> {
    let col = data[key]
        .as_array()
        .ok_or_else(|| AppError::Parse(format!("missing column '{}'", key)))?;
    if col.len() != expected_len {
        return Err(AppError::Parse(format!(
            "column '{}' length {} does not match time column {}",
            key,
            col.len(),
            expected_len
        )));
    }
    Ok(col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_columnar_bars() {
        let data = json!({
            "t": [1767139200, 1767052800], // out of order on purpose
            "o": [71000.0, 70500.0],
            "h": [71800.0, 71200.0],
            "l": [70600.0, 70100.0],
            "c": [71500.0, 71000.0],
            "v": [12_000_000, 9_000_000]
        });

        let bars = parse_columnar_bars(&data).unwrap();
        assert_eq!(bars.len(), 2);
        assert!(bars[0].time < bars[1].time);
        assert_eq!(bars[1].close, 71500.0);
        assert_eq!(bars[1].volume, 12_000_000);
    }

    #[test]
    fn test_empty_series_is_not_an_error() {
        assert!(parse_columnar_bars(&Value::Null).unwrap().is_empty());
        assert!(parse_columnar_bars(&json!({"t": []})).unwrap().is_empty());
        assert!(parse_columnar_bars(&json!({})).unwrap().is_empty());
    }

    #[test]
    fn test_inconsistent_columns_rejected() {
        let data = json!({
            "t": [1767052800, 1767139200],
            "o": [70500.0],
            "h": [71200.0, 71800.0],
            "l": [70100.0, 70600.0],
            "c": [71000.0, 71500.0],
            "v": [1, 2]
        });
        assert!(parse_columnar_bars(&data).is_err());
    }
}
