//! Intraday (1-minute) bar client
//!
//! The intraday source is keyed by ticker plus market suffix (".KS" for the
//! KOSPI main board, ".KQ" otherwise) and serves a nested chart payload:
//! timestamps in one array, quote columns nested one level down. The nesting
//! is flattened here and rows with null quotes are dropped. A market that
//! has not traded in the whole window yields an empty series, not an error.

use crate::constants::HTTP_TIMEOUT_SECS;
use crate::error::{AppError, Result};
use crate::models::{Bar, MarketSegment};
use crate::utils::get_intraday_api_url;
use chrono::{DateTime, Utc};
use isahc::{config::Configurable, prelude::*, HttpClient};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:120.0) Gecko/20100101 Firefox/120.0",
];

#[derive(Clone)]
pub struct IntradayClient {
    client: HttpClient,
    base_url: String,
}

impl IntradayClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(get_intraday_api_url())
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

    /// 7 days of 1-minute bars for a ticker on the given market
    pub async fn get_minute_bars(&self, ticker: &str, market: MarketSegment) -> Result<Vec<Bar>> {
        let symbol = format!("{}{}", ticker, market.ticker_suffix());
        let url = format!(
            "{}/v8/finance/chart/{}?range=7d&interval=1m",
            self.base_url, symbol
        );

        debug!("Intraday request: symbol={}", symbol);

        let user_agent = {
            use rand::seq::SliceRandom;
            USER_AGENTS
                .choose(&mut rand::thread_rng())
                .copied()
                .unwrap_or(USER_AGENTS[0])
        };

        let request = isahc::Request::builder()
            .uri(&url)
            .method("GET")
            .header("Accept", "application/json, text/plain, */*")
            .header("User-Agent", user_agent)
            .body(())
            .map_err(|e| AppError::Network(format!("Request build error: {}", e)))?;

        let mut resp = self.client.send_async(request).await?;
        let status = resp.status();
        let text = resp.text().await.map_err(|e| AppError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(AppError::Network(format!(
                "intraday source returned {}: {}",
                status.as_u16(),
                text
            )));
        }

        let data: Value = serde_json::from_str(&text)?;
        parse_chart_payload(&data)
    }
}

/// Flatten the nested chart payload into bars, skipping null rows
pub(crate) fn parse_chart_payload(data: &Value) -> Result<Vec<Bar>> {
    if let Some(error) = data["chart"]["error"].as_object() {
        return Err(AppError::Network(format!(
            "intraday source error: {}",
            Value::Object(error.clone())
        )));
    }

    let result = match data["chart"]["result"].get(0) {
        Some(r) => r,
        None => return Ok(vec![]),
    };

    let timestamps = match result["timestamp"].as_array() {
        Some(t) if !t.is_empty() => t,
        // No trading in the window: normal empty outcome
        _ => return Ok(vec![]),
    };

    let quote = &result["indicators"]["quote"][0];
    let opens = quote["open"].as_array();
    let highs = quote["high"].as_array();
    let lows = quote["low"].as_array();
    let closes = quote["close"].as_array();
    let volumes = quote["volume"].as_array();

    let (opens, highs, lows, closes, volumes) = match (opens, highs, lows, closes, volumes) {
        (Some(o), Some(h), Some(l), Some(c), Some(v)) => (o, h, l, c, v),
        _ => return Err(AppError::Parse("chart payload is missing quote columns".to_string())),
    };

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.iter().enumerate() {
        let timestamp = match ts.as_i64() {
            Some(t) => t,
            None => continue,
        };
        // Rows with null quotes (halts, empty minutes) are dropped
        let (open, high, low, close) = match (
            opens.get(i).and_then(Value::as_f64),
            highs.get(i).and_then(Value::as_f64),
            lows.get(i).and_then(Value::as_f64),
            closes.get(i).and_then(Value::as_f64),
        ) {
            (Some(o), Some(h), Some(l), Some(c)) => (o, h, l, c),
            _ => continue,
        };
        let volume = volumes.get(i).and_then(Value::as_u64).unwrap_or(0);

        let time = DateTime::<Utc>::from_timestamp(timestamp, 0)
            .ok_or_else(|| AppError::Parse(format!("timestamp {} out of range", timestamp)))?;
        bars.push(Bar::new(time, open, high, low, close, volume));
    }

    bars.sort_by_key(|b| b.time);
    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flattens_nested_quote_columns() {
        let data = json!({
            "chart": {
                "result": [{
                    "timestamp": [1767153600, 1767153660, 1767153720],
                    "indicators": {
                        "quote": [{
                            "open":   [71000.0, null, 71100.0],
                            "high":   [71050.0, null, 71150.0],
                            "low":    [70950.0, null, 71050.0],
                            "close":  [71020.0, null, 71120.0],
                            "volume": [15000, null, 18000]
                        }]
                    }
                }],
                "error": null
            }
        });

        let bars = parse_chart_payload(&data).unwrap();
        // Null row is dropped during flattening
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 71020.0);
        assert_eq!(bars[1].volume, 18000);
    }

    #[test]
    fn test_closed_market_returns_empty_series() {
        // No timestamps at all (market closed for the whole window)
        let data = json!({
            "chart": {"result": [{"timestamp": [], "indicators": {"quote": [{}]}}], "error": null}
        });
        assert!(parse_chart_payload(&data).unwrap().is_empty());

        // Result list empty entirely
        let data = json!({"chart": {"result": [], "error": null}});
        assert!(parse_chart_payload(&data).unwrap().is_empty());
    }

    #[test]
    fn test_upstream_error_is_an_error() {
        let data = json!({
            "chart": {"result": null, "error": {"code": "Not Found", "description": "No data"}}
        });
        assert!(parse_chart_payload(&data).is_err());
    }
}
