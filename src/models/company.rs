use crate::constants::{
    KOSDAQ_INDEX_SYMBOL, KOSDAQ_TICKER_SUFFIX, KOSPI_INDEX_SYMBOL, KOSPI_TICKER_SUFFIX,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Korean market segment a company is listed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketSegment {
    Kospi,
    Kosdaq,
    Konex,
}

impl MarketSegment {
    /// Parse the segment label carried in indexed documents
    ///
    /// The corporate listing uses "유가" (KOSPI main board), "코스닥" and
    /// "코넥스"; some feeds spell out KOSPI/코스피. Unrecognized labels fall
    /// back to KOSDAQ as the original dashboard did.
    pub fn from_label(label: &str) -> Self {
        let upper = label.to_uppercase();
        if label.contains("코넥스") || upper.contains("KONEX") {
            MarketSegment::Konex
        } else if label.contains("유가") || label.contains("코스피") || upper.contains("KOSPI") {
            MarketSegment::Kospi
        } else {
            MarketSegment::Kosdaq
        }
    }

    /// Ticker suffix used by the intraday data source
    pub fn ticker_suffix(&self) -> &'static str {
        match self {
            MarketSegment::Kospi => KOSPI_TICKER_SUFFIX,
            MarketSegment::Kosdaq | MarketSegment::Konex => KOSDAQ_TICKER_SUFFIX,
        }
    }

    /// Market index symbol served by the price-history source
    ///
    /// KONEX has no independently available index and degrades to the KOSDAQ
    /// index.
    pub fn index_symbol(&self) -> &'static str {
        match self {
            MarketSegment::Kospi => KOSPI_INDEX_SYMBOL,
            MarketSegment::Kosdaq | MarketSegment::Konex => KOSDAQ_INDEX_SYMBOL,
        }
    }
}

impl fmt::Display for MarketSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MarketSegment::Kospi => "KOSPI",
            MarketSegment::Kosdaq => "KOSDAQ",
            MarketSegment::Konex => "KONEX",
        };
        write!(f, "{}", s)
    }
}

/// A listed company as stored in the search index
///
/// Field names follow the document schema produced by the bulk loader, which
/// keeps the Korean column names of the public corporate listing. Identity is
/// the 6-digit zero-padded ticker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyRecord {
    /// Company display name
    #[serde(rename = "회사명")]
    pub name: String,

    /// 6-digit fixed-width ticker
    #[serde(rename = "종목코드")]
    pub ticker: String,

    /// Market segment label as listed ("유가", "코스닥", "코넥스")
    #[serde(rename = "시장구분", default)]
    pub market_label: String,

    /// Industry classification
    #[serde(rename = "업종", default)]
    pub industry: String,

    /// Key products description
    #[serde(rename = "주요제품", default)]
    pub key_products: String,

    /// Listing date (YYYY-MM-DD)
    #[serde(rename = "상장일", default)]
    pub listing_date: String,

    /// Industry terms derived by whitespace-splitting the industry field
    #[serde(rename = "업종_리스트", default, skip_serializing_if = "Vec::is_empty")]
    pub industry_terms: Vec<String>,

    /// Product terms derived by splitting key products on "및" and ","
    #[serde(rename = "주요제품_리스트", default, skip_serializing_if = "Vec::is_empty")]
    pub product_terms: Vec<String>,

    /// Concatenated searchable text (name + industry + products)
    #[serde(rename = "통합텍스트", default, skip_serializing_if = "String::is_empty")]
    pub search_text: String,

    /// Optional 768-dim sentence embedding of `search_text`
    #[serde(rename = "text_vector", default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl CompanyRecord {
    /// Market segment parsed from the listing label
    pub fn market_segment(&self) -> MarketSegment {
        MarketSegment::from_label(&self.market_label)
    }
}

/// One search result: an indexed company plus the engine's relevance or
/// similarity score (descending order within a result list)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub score: f64,
    pub company: CompanyRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_segment_from_label() {
        assert_eq!(MarketSegment::from_label("유가"), MarketSegment::Kospi);
        assert_eq!(MarketSegment::from_label("코스피"), MarketSegment::Kospi);
        assert_eq!(MarketSegment::from_label("KOSPI"), MarketSegment::Kospi);
        assert_eq!(MarketSegment::from_label("코스닥"), MarketSegment::Kosdaq);
        assert_eq!(MarketSegment::from_label("코넥스"), MarketSegment::Konex);
        // Unknown labels default to KOSDAQ
        assert_eq!(MarketSegment::from_label("기타"), MarketSegment::Kosdaq);
    }

    #[test]
    fn test_ticker_suffix() {
        assert_eq!(MarketSegment::Kospi.ticker_suffix(), ".KS");
        assert_eq!(MarketSegment::Kosdaq.ticker_suffix(), ".KQ");
        assert_eq!(MarketSegment::Konex.ticker_suffix(), ".KQ");
    }

    #[test]
    fn test_index_symbol_konex_fallback() {
        assert_eq!(MarketSegment::Kospi.index_symbol(), "KS11");
        assert_eq!(MarketSegment::Kosdaq.index_symbol(), "KQ11");
        assert_eq!(MarketSegment::Konex.index_symbol(), "KQ11");
    }

    #[test]
    fn test_company_record_deserializes_korean_attributes() {
        let doc = serde_json::json!({
            "회사명": "삼성전자",
            "종목코드": "005930",
            "시장구분": "유가",
            "업종": "통신 및 방송 장비 제조업",
            "주요제품": "반도체, 스마트폰",
            "상장일": "1975-06-11"
        });
        let record: CompanyRecord = serde_json::from_value(doc).unwrap();
        assert_eq!(record.name, "삼성전자");
        assert_eq!(record.ticker, "005930");
        assert_eq!(record.market_segment(), MarketSegment::Kospi);
        assert!(record.embedding.is_none());
    }
}
