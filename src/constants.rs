//! Fixed parameters of the search-and-browse pipeline.
//!
//! Result caps, paging geometry and chart lookback windows follow the
//! original dashboard behaviour; index/field names match the document
//! schema produced by the bulk loader.

/// Name of the company search index
pub const SEARCH_INDEX: &str = "stock_info";

/// Dense-vector field holding the 768-dim sentence embedding
pub const EMBEDDING_FIELD: &str = "text_vector";

/// Dimension of the sentence-embedding vectors
pub const EMBEDDING_DIMS: usize = 768;

/// Candidate pool size for approximate kNN queries
pub const KNN_NUM_CANDIDATES: usize = 100;

/// Maximum hits for a keyword search
pub const KEYWORD_RESULT_CAP: usize = 100;

/// Maximum hits for a semantic search
pub const SEMANTIC_RESULT_CAP: usize = 50;

/// Companies shown per result page
pub const PAGE_SIZE: usize = 12;

/// Entries per ranking list (top volume / gainers / losers)
pub const RANKING_TOP_N: usize = 10;

/// How long a computed ranking snapshot stays valid
pub const RANKING_CACHE_TTL_SECS: u64 = 600;

/// Calendar days scanned backwards for the most recent trading day
pub const RANKING_LOOKBACK_DAYS: i64 = 5;

/// Daily-bar history windows per chart timeframe, in calendar days
pub const MONTHLY_LOOKBACK_DAYS: i64 = 365 * 5;
pub const WEEKLY_LOOKBACK_DAYS: i64 = 365 * 2;
pub const DAILY_LOOKBACK_DAYS: i64 = 365;

/// Intraday window: 7 days of 1-minute bars
pub const MINUTE_LOOKBACK_DAYS: i64 = 7;

/// Market index series window
pub const INDEX_LOOKBACK_DAYS: i64 = 365;

/// Simple moving average windows drawn on price charts
pub const MA_PERIODS: [usize; 3] = [5, 20, 60];

/// Connect/read timeout applied to every upstream HTTP client, in seconds
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Default port for the serve command
pub const DEFAULT_SERVER_PORT: u16 = 8311;

/// A session untouched for this long is dropped on the next store access
pub const SESSION_IDLE_TTL_SECS: u64 = 30 * 60;

/// Index symbols served by the price-history source
pub const KOSPI_INDEX_SYMBOL: &str = "KS11";
pub const KOSDAQ_INDEX_SYMBOL: &str = "KQ11";

/// Intraday source ticker suffixes per market segment
pub const KOSPI_TICKER_SUFFIX: &str = ".KS";
pub const KOSDAQ_TICKER_SUFFIX: &str = ".KQ";
