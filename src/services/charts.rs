//! Chart assembly per timeframe
//!
//! One entry point per company chart: pick the source (daily history or the
//! intraday feed), resample where the timeframe calls for it, then overlay
//! the 5/20/60 moving averages. Moving averages are computed on the series
//! as charted, after resampling, so the monthly MA5 is a 5-month average.

use crate::error::Result;
use crate::models::indicators::apply_moving_averages;
use crate::models::{ChartTimeframe, MarketSegment, PriceSeries};
use crate::services::intraday::IntradayClient;
use crate::services::price_history::PriceHistoryClient;
use crate::services::resample::Resampler;
use crate::utils::lookback_start;
use chrono::Utc;
use tracing::debug;

#[derive(Clone)]
pub struct ChartService {
    history: PriceHistoryClient,
    intraday: IntradayClient,
}

impl ChartService {
    pub fn new() -> Result<Self> {
        Ok(Self {
            history: PriceHistoryClient::new()?,
            intraday: IntradayClient::new()?,
        })
    }

    pub fn with_clients(history: PriceHistoryClient, intraday: IntradayClient) -> Self {
        Self { history, intraday }
    }

    /// Chart series for a company at the requested granularity
    ///
    /// Returns an empty series when the symbol had no data in the window
    /// (a newly listed company on the monthly chart, a closed market on the
    /// minute chart).
    pub async fn get_chart(
        &self,
        ticker: &str,
        market: MarketSegment,
        timeframe: ChartTimeframe,
    ) -> Result<PriceSeries> {
        let bars = if timeframe.is_intraday() {
            self.intraday.get_minute_bars(ticker, market).await?
        } else {
            let end = Utc::now().date_naive();
            let start = lookback_start(timeframe.lookback_days());
            self.history.get_daily(ticker, start, end).await?
        };

        debug!(
            "Chart {} {}: {} raw bars",
            ticker,
            timeframe,
            bars.len()
        );

        let mut series = match timeframe {
            ChartTimeframe::Monthly => Resampler::monthly(bars),
            ChartTimeframe::Weekly => Resampler::weekly(bars),
            ChartTimeframe::Daily | ChartTimeframe::Minute => bars,
        };

        apply_moving_averages(&mut series);
        Ok(series)
    }

    /// 1-year daily index series for a market segment, no indicator overlay
    pub async fn get_market_index(&self, market: MarketSegment) -> Result<PriceSeries> {
        self.history.get_market_index(market).await
    }
}
