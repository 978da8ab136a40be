use serde::{Deserialize, Serialize};

/// One row of a ranking list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedStock {
    /// Resolved display name (falls back to the ticker)
    pub name: String,
    pub ticker: String,
    pub close: f64,
    pub volume: u64,
    /// Percent change against the previous close
    pub change_pct: f64,
}

/// Top-N lists derived from one trading day's full-market snapshot
///
/// All three lists come from the same day. Empty lists mean no trading day
/// with data was found in the lookback window, which is a normal outcome.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankingSnapshot {
    /// Trading day the snapshot was taken from (YYYY-MM-DD), if any
    pub trading_date: Option<String>,
    /// Sorted by volume, descending
    pub volume: Vec<RankedStock>,
    /// Sorted by percent change, descending
    pub gainers: Vec<RankedStock>,
    /// Sorted by percent change, ascending
    pub losers: Vec<RankedStock>,
}

impl RankingSnapshot {
    pub fn is_empty(&self) -> bool {
        self.volume.is_empty() && self.gainers.is_empty() && self.losers.is_empty()
    }
}
