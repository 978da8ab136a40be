mod company;
mod ohlcv;
mod query;
mod ranking;
mod timeframe;
pub mod indicators;

pub use company::{CompanyRecord, MarketSegment, SearchHit};
pub use ohlcv::{Bar, PriceSeries};
pub use query::{SearchField, SearchQuery};
pub use ranking::{RankedStock, RankingSnapshot};
pub use timeframe::ChartTimeframe;
