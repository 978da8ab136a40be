pub mod charts;
pub mod corp_listing;
pub mod embedding;
pub mod intraday;
pub mod pager;
pub mod price_history;
pub mod ranking;
pub mod resample;
pub mod search_index;
pub mod session;
pub mod snapshot;

pub use charts::ChartService;
pub use corp_listing::{parse_listing_csv, prepare_record, CorpListingLoader};
pub use embedding::{EmbeddingClient, TextEmbedder};
pub use intraday::IntradayClient;
pub use pager::{page_slice, PageInfo};
pub use price_history::PriceHistoryClient;
pub use ranking::RankingProvider;
pub use resample::Resampler;
pub use search_index::{SearchClient, SearchGateway};
pub use session::{SessionState, SessionStore};
pub use snapshot::{SnapshotClient, SnapshotRow, SnapshotSource};
