//! Daily market ranking provider
//!
//! Scans backwards from today for the most recent trading day with a
//! non-empty full-market snapshot (weekends and holidays return empty
//! tables), resolves tickers to display names and derives three Top-10
//! lists. The computed snapshot is cached for 10 minutes; callers inside
//! the TTL window see the same snapshot.

use crate::constants::{RANKING_CACHE_TTL_SECS, RANKING_LOOKBACK_DAYS, RANKING_TOP_N};
use crate::error::Result;
use crate::models::{RankedStock, RankingSnapshot};
use crate::services::snapshot::{SnapshotRow, SnapshotSource};
use cached::{Cached, TimedCache};
use chrono::{Duration as ChronoDuration, Utc};
use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Market scope the rankings are computed over
const RANKING_MARKET: &str = "KOSPI";

const CACHE_KEY: &str = "kospi-daily";

pub struct RankingProvider {
    source: Arc<dyn SnapshotSource>,
    cache: RwLock<TimedCache<&'static str, RankingSnapshot>>,
}

impl RankingProvider {
    pub fn new(source: Arc<dyn SnapshotSource>) -> Self {
        Self {
            source,
            cache: RwLock::new(TimedCache::with_lifespan(Duration::from_secs(
                RANKING_CACHE_TTL_SECS,
            ))),
        }
    }

    /// Current ranking snapshot, served from cache within the TTL window
    pub async fn get(&self) -> Result<RankingSnapshot> {
        {
            let mut cache = self.cache.write().await;
            if let Some(snapshot) = cache.cache_get(&CACHE_KEY).cloned() {
                debug!("Ranking cache hit");
                return Ok(snapshot);
            }
        }

        let snapshot = self.compute().await?;

        let mut cache = self.cache.write().await;
        cache.cache_set(CACHE_KEY, snapshot.clone());
        Ok(snapshot)
    }

    async fn compute(&self) -> Result<RankingSnapshot> {
        let today = Utc::now().date_naive();

        let mut rows: Vec<SnapshotRow> = vec![];
        let mut trading_date = None;
        for i in 0..RANKING_LOOKBACK_DAYS {
            let date = today - ChronoDuration::days(i);
            let table = self.source.market_ohlcv(date, RANKING_MARKET).await?;
            if !table.is_empty() {
                debug!("Trading day found: {} ({} rows)", date, table.len());
                rows = table;
                trading_date = Some(date.format("%Y-%m-%d").to_string());
                break;
            }
        }

        if rows.is_empty() {
            // No trading day in the window: three empty lists, not an error
            info!(
                "No market snapshot within the last {} days",
                RANKING_LOOKBACK_DAYS
            );
            return Ok(RankingSnapshot::default());
        }

        let mut ranked = Vec::with_capacity(rows.len());
        for row in rows {
            // A failed name lookup falls back to the raw ticker; the panel
            // should not die over one missing name
            let name = match self.source.ticker_name(&row.ticker).await {
                Ok(Some(name)) => name,
                _ => row.ticker.clone(),
            };
            ranked.push(RankedStock {
                name,
                ticker: row.ticker,
                close: row.close,
                volume: row.volume,
                change_pct: row.change_pct,
            });
        }

        Ok(RankingSnapshot {
            trading_date,
            volume: top_by(&ranked, |a, b| b.volume.cmp(&a.volume)),
            gainers: top_by(&ranked, |a, b| cmp_pct(b.change_pct, a.change_pct)),
            losers: top_by(&ranked, |a, b| cmp_pct(a.change_pct, b.change_pct)),
        })
    }
}

fn cmp_pct(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

fn top_by(
    stocks: &[RankedStock],
    cmp: impl Fn(&RankedStock, &RankedStock) -> Ordering,
) -> Vec<RankedStock> {
    let mut sorted = stocks.to_vec();
    sorted.sort_by(cmp);
    sorted.truncate(RANKING_TOP_N);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    /// Snapshot stub: serves a fixed table on the nth day back, empty before
    struct StubSource {
        table: Vec<SnapshotRow>,
        empty_days: i64,
        fetches: AtomicUsize,
    }

    impl StubSource {
        fn new(table: Vec<SnapshotRow>, empty_days: i64) -> Self {
            Self {
                table,
                empty_days,
                fetches: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SnapshotSource for StubSource {
        async fn market_ohlcv(&self, date: NaiveDate, _market: &str) -> Result<Vec<SnapshotRow>> {
            self.fetches.fetch_add(1, AtomicOrdering::SeqCst);
            let days_back = (Utc::now().date_naive() - date).num_days();
            if days_back < self.empty_days {
                Ok(vec![])
            } else {
                Ok(self.table.clone())
            }
        }

        async fn ticker_name(&self, ticker: &str) -> Result<Option<String>> {
            match ticker {
                "005930" => Ok(Some("삼성전자".to_string())),
                _ => Ok(None),
            }
        }
    }

    fn row(ticker: &str, close: f64, volume: u64, change_pct: f64) -> SnapshotRow {
        serde_json::from_value(serde_json::json!({
            "티커": ticker,
            "종가": close,
            "거래량": volume,
            "등락률": change_pct
        }))
        .unwrap()
    }

    fn sample_table(n: usize) -> Vec<SnapshotRow> {
        (0..n)
            .map(|i| {
                row(
                    &format!("{:06}", i),
                    1000.0 + i as f64,
                    (i as u64 + 1) * 100,
                    i as f64 - (n as f64 / 2.0),
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_lists_sorted_and_capped_at_ten() {
        let provider = RankingProvider::new(Arc::new(StubSource::new(sample_table(25), 0)));
        let snapshot = provider.get().await.unwrap();

        assert_eq!(snapshot.volume.len(), 10);
        assert_eq!(snapshot.gainers.len(), 10);
        assert_eq!(snapshot.losers.len(), 10);

        assert!(snapshot
            .volume
            .windows(2)
            .all(|w| w[0].volume >= w[1].volume));
        assert!(snapshot
            .gainers
            .windows(2)
            .all(|w| w[0].change_pct >= w[1].change_pct));
        assert!(snapshot
            .losers
            .windows(2)
            .all(|w| w[0].change_pct <= w[1].change_pct));
    }

    #[tokio::test]
    async fn test_small_market_lists_below_cap() {
        let provider = RankingProvider::new(Arc::new(StubSource::new(sample_table(4), 0)));
        let snapshot = provider.get().await.unwrap();
        assert_eq!(snapshot.volume.len(), 4);
        assert!(snapshot.trading_date.is_some());
    }

    #[tokio::test]
    async fn test_scan_back_over_non_trading_days() {
        // First two days back are empty (weekend); day 3 has data
        let source = Arc::new(StubSource::new(sample_table(3), 2));
        let provider = RankingProvider::new(source.clone());

        let snapshot = provider.get().await.unwrap();
        assert!(!snapshot.is_empty());
        assert_eq!(source.fetches.load(AtomicOrdering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_five_empty_days_yield_empty_lists() {
        let provider =
            RankingProvider::new(Arc::new(StubSource::new(sample_table(3), RANKING_LOOKBACK_DAYS)));
        let snapshot = provider.get().await.unwrap();
        assert!(snapshot.is_empty());
        assert!(snapshot.trading_date.is_none());
    }

    #[tokio::test]
    async fn test_cached_within_ttl() {
        let source = Arc::new(StubSource::new(sample_table(3), 0));
        let provider = RankingProvider::new(source.clone());

        provider.get().await.unwrap();
        let fetches_after_first = source.fetches.load(AtomicOrdering::SeqCst);
        provider.get().await.unwrap();

        // Second call is served from cache: no further upstream fetches
        assert_eq!(source.fetches.load(AtomicOrdering::SeqCst), fetches_after_first);
    }

    #[tokio::test]
    async fn test_name_resolution_with_fallback() {
        let table = vec![row("005930", 71500.0, 100, 1.0), row("999999", 100.0, 50, -1.0)];
        let provider = RankingProvider::new(Arc::new(StubSource::new(table, 0)));
        let snapshot = provider.get().await.unwrap();

        let names: Vec<&str> = snapshot.volume.iter().map(|s| s.name.as_str()).collect();
        assert!(names.contains(&"삼성전자"));
        assert!(names.contains(&"999999")); // unresolved names fall back to the ticker
    }
}
