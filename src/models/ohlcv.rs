use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single OHLCV bar at any granularity (monthly down to 1-minute)
///
/// Moving averages are filled in after fetching/resampling and stay `None`
/// until their window is covered by the series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Timestamp of the bar (bucket label for resampled granularities)
    #[serde(with = "chrono::serde::ts_seconds")]
    pub time: DateTime<Utc>,

    /// Opening price
    pub open: f64,

    /// Highest price
    pub high: f64,

    /// Lowest price
    pub low: f64,

    /// Closing price
    pub close: f64,

    /// Trading volume
    pub volume: u64,

    /// 5-period simple moving average of close
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ma5: Option<f64>,

    /// 20-period simple moving average of close
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ma20: Option<f64>,

    /// 60-period simple moving average of close
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ma60: Option<f64>,
}

impl Bar {
    /// Create a bar with no indicator values
    pub fn new(
        time: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
            ma5: None,
            ma20: None,
            ma60: None,
        }
    }
}

/// Ordered series of bars for one symbol
pub type PriceSeries = Vec<Bar>;
