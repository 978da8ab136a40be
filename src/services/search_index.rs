//! Company search index client and the mode-dispatching gateway
//!
//! Talks to the search engine over HTTP: multi-field match queries for
//! keyword mode, approximate kNN over the dense-vector field for semantic
//! mode, plus the index administration the bulk loader needs. Requests carry
//! no retry policy; an upstream failure surfaces to the caller unchanged.

use crate::constants::{EMBEDDING_DIMS, EMBEDDING_FIELD, KNN_NUM_CANDIDATES, SEARCH_INDEX};
use crate::error::{AppError, Result};
use crate::models::{SearchField, SearchHit, SearchQuery};
use crate::services::embedding::TextEmbedder;
use crate::utils::get_search_engine_url;
use isahc::{config::Configurable, prelude::*, HttpClient};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Clone)]
pub struct SearchClient {
    client: HttpClient,
    base_url: String,
    index: String,
}

impl SearchClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(get_search_engine_url())
    }

    pub fn with_base_url(base_url: String) -> Result<Self> {
        let client = HttpClient::builder()
            .timeout(Duration::from_secs(crate::constants::HTTP_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            index: SEARCH_INDEX.to_string(),
        })
    }

    /// Multi-field match query, hits ordered by engine relevance score
    pub async fn keyword_search(
        &self,
        field: SearchField,
        text: &str,
        cap: usize,
    ) -> Result<Vec<SearchHit>> {
        let payload = build_keyword_body(field, text, cap);
        let response = self.search_request(&payload).await?;
        parse_hits(&response)
    }

    /// Approximate nearest-neighbor query over the embedding field,
    /// hits ordered by cosine similarity score
    pub async fn knn_search(&self, vector: &[f32], cap: usize) -> Result<Vec<SearchHit>> {
        let payload = build_knn_body(vector, cap);
        let response = self.search_request(&payload).await?;
        parse_hits(&response)
    }

    async fn search_request(&self, payload: &Value) -> Result<Value> {
        let url = format!("{}/{}/_search", self.base_url, self.index);
        self.send_json("POST", &url, Some(payload)).await
    }

    /// Drop and re-create the index with the dense-vector mapping
    ///
    /// A missing index on delete is not an error (first load).
    pub async fn recreate_index(&self) -> Result<()> {
        let url = format!("{}/{}", self.base_url, self.index);

        match self.send_json("DELETE", &url, None).await {
            Ok(_) => debug!("Deleted existing index {}", self.index),
            Err(AppError::NotFound(_)) => debug!("Index {} did not exist", self.index),
            Err(e) => return Err(e),
        }

        let mapping = json!({
            "mappings": {
                "properties": {
                    EMBEDDING_FIELD: {
                        "type": "dense_vector",
                        "dims": EMBEDDING_DIMS,
                        "index": true,
                        "similarity": "cosine"
                    }
                }
            }
        });

        self.send_json("PUT", &url, Some(&mapping)).await?;
        Ok(())
    }

    /// Bulk-index documents via the NDJSON bulk endpoint; returns the number
    /// of items the engine accepted
    pub async fn bulk_index(&self, documents: &[Value]) -> Result<usize> {
        if documents.is_empty() {
            return Ok(0);
        }

        let mut body = String::new();
        for doc in documents {
            body.push_str(&json!({"index": {"_index": self.index}}).to_string());
            body.push('\n');
            body.push_str(&doc.to_string());
            body.push('\n');
        }

        let url = format!("{}/_bulk", self.base_url);
        let request = isahc::Request::builder()
            .uri(&url)
            .method("POST")
            .header("Content-Type", "application/x-ndjson")
            .body(body)
            .map_err(|e| AppError::Search(format!("Request build error: {}", e)))?;

        let mut resp = self.client.send_async(request).await?;
        let status = resp.status();
        let text = resp.text().await.map_err(|e| AppError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(AppError::Search(format!(
                "Bulk indexing failed ({}): {}",
                status.as_u16(),
                text
            )));
        }

        let data: Value = serde_json::from_str(&text)?;
        if data["errors"].as_bool() == Some(true) {
            return Err(AppError::Search("bulk response reported item errors".to_string()));
        }

        Ok(data["items"].as_array().map(|a| a.len()).unwrap_or(0))
    }

    /// Document count of the index, for the status command
    pub async fn doc_count(&self) -> Result<u64> {
        let url = format!("{}/{}/_count", self.base_url, self.index);
        let data = self.send_json("GET", &url, None).await?;
        data["count"]
            .as_u64()
            .ok_or_else(|| AppError::Parse("missing count in response".to_string()))
    }

    /// Liveness check against the engine root
    pub async fn ping(&self) -> Result<()> {
        let url = self.base_url.clone();
        self.send_json("GET", &url, None).await.map(|_| ())
    }

    async fn send_json(&self, method: &str, url: &str, payload: Option<&Value>) -> Result<Value> {
        let body = match payload {
            Some(p) => serde_json::to_string(p)?,
            None => String::new(),
        };

        debug!("Search engine request: {} {} ({} bytes)", method, url, body.len());

        let request = isahc::Request::builder()
            .uri(url)
            .method(method)
            .header("Content-Type", "application/json")
            .body(body)
            .map_err(|e| AppError::Search(format!("Request build error: {}", e)))?;

        let mut resp = self.client.send_async(request).await?;
        let status = resp.status();
        let text = resp.text().await.map_err(|e| AppError::Network(e.to_string()))?;

        if status.as_u16() == 404 {
            return Err(AppError::NotFound(format!("{} {}", method, url)));
        }
        if !status.is_success() {
            return Err(AppError::Search(format!(
                "engine returned {}: {}",
                status.as_u16(),
                text
            )));
        }

        serde_json::from_str(&text).map_err(AppError::from)
    }
}

/// Body of a keyword search: multi_match over the mapped document attributes
///
/// The embedding vector is excluded from hit sources; it is search
/// infrastructure, not display data, and would bloat every result page.
fn build_keyword_body(field: SearchField, text: &str, cap: usize) -> Value {
    json!({
        "query": {
            "multi_match": {
                "query": text,
                "fields": field.document_fields()
            }
        },
        "_source": {"excludes": [EMBEDDING_FIELD]},
        "size": cap
    })
}

/// Body of a semantic search: kNN over the embedding field, cosine similarity,
/// drawn from a fixed candidate pool
fn build_knn_body(vector: &[f32], cap: usize) -> Value {
    json!({
        "knn": {
            "field": EMBEDDING_FIELD,
            "query_vector": vector,
            "k": cap,
            "num_candidates": KNN_NUM_CANDIDATES
        },
        "_source": {"excludes": [EMBEDDING_FIELD]},
        "size": cap
    })
}

/// Extract the uniform {source, score} hit list from an engine response
fn parse_hits(response: &Value) -> Result<Vec<SearchHit>> {
    let hits = response["hits"]["hits"]
        .as_array()
        .ok_or_else(|| AppError::Parse("response has no hits array".to_string()))?;

    let mut results = Vec::with_capacity(hits.len());
    for hit in hits {
        let score = hit["_score"].as_f64().unwrap_or(0.0);
        let company = serde_json::from_value(hit["_source"].clone())
            .map_err(|e| AppError::Parse(format!("malformed hit source: {}", e)))?;
        results.push(SearchHit { score, company });
    }

    Ok(results)
}

/// Dispatches a normalized query to the matching engine operation
///
/// Keyword queries go straight to the index; semantic queries are embedded
/// first and then run as a kNN search. The embedding client is created once
/// and reused across requests.
pub struct SearchGateway {
    index: SearchClient,
    embedder: Arc<dyn TextEmbedder>,
}

impl SearchGateway {
    pub fn new(index: SearchClient, embedder: Arc<dyn TextEmbedder>) -> Self {
        Self { index, embedder }
    }

    pub async fn execute(&self, query: &SearchQuery) -> Result<Vec<SearchHit>> {
        query.validate()?;

        match query {
            SearchQuery::Keyword { field, text } => {
                self.index
                    .keyword_search(*field, text, query.result_cap())
                    .await
            }
            SearchQuery::Semantic { text } => {
                let vector = self.embedder.embed(text).await?;
                self.index.knn_search(&vector, query.result_cap()).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SearchField;

    #[test]
    fn test_keyword_body_shape() {
        let body = build_keyword_body(SearchField::Name, "삼성전자", 100);
        assert_eq!(body["query"]["multi_match"]["query"], "삼성전자");
        assert_eq!(body["query"]["multi_match"]["fields"][0], "회사명");
        assert_eq!(body["size"], 100);
        // Hit sources come back without the embedding vector
        assert_eq!(body["_source"]["excludes"][0], "text_vector");
    }

    #[test]
    fn test_keyword_body_multi_field() {
        let body = build_keyword_body(SearchField::Products, "배터리", 100);
        let fields = body["query"]["multi_match"]["fields"].as_array().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0], "주요제품");
        assert_eq!(fields[1], "주요제품_리스트");
    }

    #[test]
    fn test_knn_body_shape() {
        let vector = vec![0.1_f32; 4];
        let body = build_knn_body(&vector, 50);
        assert_eq!(body["knn"]["field"], "text_vector");
        assert_eq!(body["knn"]["k"], 50);
        assert_eq!(body["knn"]["num_candidates"], 100);
        assert_eq!(body["knn"]["query_vector"].as_array().unwrap().len(), 4);
        assert_eq!(body["_source"]["excludes"][0], "text_vector");
    }

    #[test]
    fn test_parse_hits_ordered_with_source_fields() {
        let response = serde_json::json!({
            "hits": {
                "hits": [
                    {
                        "_score": 0.92,
                        "_source": {
                            "회사명": "에코프로비엠",
                            "종목코드": "247540",
                            "시장구분": "코스닥",
                            "업종": "일차전지 및 축전지 제조업",
                            "주요제품": "양극활물질"
                        }
                    },
                    {
                        "_score": 0.87,
                        "_source": {
                            "회사명": "삼성SDI",
                            "종목코드": "006400",
                            "시장구분": "유가"
                        }
                    }
                ]
            }
        });

        let hits = parse_hits(&response).unwrap();
        assert_eq!(hits.len(), 2);
        // Descending by score, each hit carrying the declared source fields
        assert!(hits[0].score >= hits[1].score);
        assert_eq!(hits[0].company.name, "에코프로비엠");
        assert_eq!(hits[0].company.ticker, "247540");
        assert_eq!(hits[1].company.ticker, "006400");
    }

    #[test]
    fn test_parse_hits_requires_hits_array() {
        let response = serde_json::json!({"error": "index_not_found_exception"});
        assert!(parse_hits(&response).is_err());
    }

    #[test]
    fn test_keyword_scenario_samsung() {
        // The canonical scenario: 삼성전자 by 회사명 must query only that field
        let body = build_keyword_body(SearchField::Name, "삼성전자", 100);
        let response = serde_json::json!({
            "hits": {"hits": [{
                "_score": 14.2,
                "_source": {"회사명": "삼성전자", "종목코드": "005930", "시장구분": "유가"}
            }]}
        });
        let hits = parse_hits(&response).unwrap();
        assert_eq!(body["query"]["multi_match"]["fields"].as_array().unwrap().len(), 1);
        assert!(hits.iter().any(|h| h.company.ticker == "005930"));
    }
}
