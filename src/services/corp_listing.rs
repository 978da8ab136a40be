//! Corporate listing download and document preparation
//!
//! The public corporate listing is a CSV keyed by Korean column names. Rows
//! become search-index documents: the ticker is zero-padded to 6 digits,
//! industry and product descriptions are split into term lists, and a
//! concatenated text field is built for full-text and semantic matching.
//! Embeddings are optional at load time since the embedding service is slow
//! for a full reload.

use crate::error::{AppError, Result};
use crate::models::CompanyRecord;
use crate::services::embedding::TextEmbedder;
use crate::utils::get_corp_listing_url;
use isahc::{config::Configurable, prelude::*, HttpClient};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct CorpListingLoader {
    client: HttpClient,
    url: String,
}

impl CorpListingLoader {
    pub fn new() -> Result<Self> {
        Self::with_url(get_corp_listing_url())
    }

    pub fn with_url(url: String) -> Result<Self> {
        let client = HttpClient::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self { client, url })
    }

    /// Download the full corporate listing and prepare index documents
    pub async fn fetch_companies(&self) -> Result<Vec<CompanyRecord>> {
        info!("Downloading corporate listing from {}", self.url);

        let mut resp = self.client.get_async(&self.url).await?;
        if !resp.status().is_success() {
            return Err(AppError::Network(format!(
                "Corporate listing download failed: HTTP {}",
                resp.status()
            )));
        }

        let body = resp.text().await?;
        let companies = parse_listing_csv(&body)?;
        info!("Parsed {} listed companies", companies.len());
        Ok(companies)
    }

    /// Attach embeddings to each record's search text
    ///
    /// A company whose text cannot be embedded is kept without a vector so
    /// keyword search still finds it.
    pub async fn embed_companies(
        &self,
        companies: &mut [CompanyRecord],
        embedder: &dyn TextEmbedder,
    ) -> Result<usize> {
        let mut embedded = 0;
        for company in companies.iter_mut() {
            match embedder.embed(&company.search_text).await {
                Ok(vector) => {
                    company.embedding = Some(vector);
                    embedded += 1;
                }
                Err(e) => {
                    warn!("Embedding failed for {}: {}", company.ticker, e);
                }
            }
            if embedded % 500 == 0 && embedded > 0 {
                debug!("Embedded {} companies so far", embedded);
            }
        }
        Ok(embedded)
    }
}

/// Parse the listing CSV into prepared records
///
/// Rows without a name or ticker are skipped. Header order is not assumed.
pub fn parse_listing_csv(body: &str) -> Result<Vec<CompanyRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut companies = vec![];
    for row in reader.deserialize::<HashMap<String, String>>() {
        let row = row?;
        let name = row.get("회사명").map(|s| s.trim()).unwrap_or("");
        let ticker = row.get("종목코드").map(|s| s.trim()).unwrap_or("");
        if name.is_empty() || ticker.is_empty() {
            continue;
        }

        let field = |key: &str| row.get(key).map(|s| s.trim().to_string()).unwrap_or_default();
        let industry = field("업종");
        let key_products = field("주요제품");

        companies.push(prepare_record(CompanyRecord {
            name: name.to_string(),
            ticker: ticker.to_string(),
            market_label: field("시장구분"),
            industry,
            key_products,
            listing_date: field("상장일"),
            industry_terms: vec![],
            product_terms: vec![],
            search_text: String::new(),
            embedding: None,
        }));
    }

    Ok(companies)
}

/// Fill the derived fields of a raw listing record
pub fn prepare_record(mut record: CompanyRecord) -> CompanyRecord {
    record.ticker = pad_ticker(&record.ticker);
    record.industry_terms = split_whitespace_terms(&record.industry);
    record.product_terms = split_product_terms(&record.key_products);
    record.search_text = [
        record.name.as_str(),
        record.industry.as_str(),
        record.key_products.as_str(),
    ]
    .iter()
    .filter(|s| !s.is_empty())
    .cloned()
    .collect::<Vec<_>>()
    .join(" ");
    record
}

/// Zero-pad a numeric ticker to the 6-digit exchange format
fn pad_ticker(raw: &str) -> String {
    format!("{:0>6}", raw.trim())
}

/// Industry cells are short classification phrases; plain whitespace
/// splitting yields the term list.
fn split_whitespace_terms(text: &str) -> Vec<String> {
    text.split_whitespace().map(|t| t.to_string()).collect()
}

/// Product cells are enumerations where "및" (meaning "and") acts as a
/// separator alongside commas; the listing mixes both within one cell.
fn split_product_terms(text: &str) -> Vec<String> {
    text.replace('및', ",")
        .split(',')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}
