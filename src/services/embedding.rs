//! Sentence-embedding boundary for semantic search
//!
//! Query text becomes a fixed 768-dim vector through an external embedding
//! service hosting a Korean sentence-embedding model. The client is built
//! once at startup and reused; a failed embedding is terminal for that
//! search interaction.

use crate::constants::{EMBEDDING_DIMS, HTTP_TIMEOUT_SECS};
use crate::error::{AppError, Result};
use crate::utils::{get_embedding_model, get_embedding_service_url};
use async_trait::async_trait;
use isahc::{config::Configurable, prelude::*, HttpClient};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Encode text into a fixed-dimension vector
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    fn dimensions(&self) -> usize {
        EMBEDDING_DIMS
    }
}

/// HTTP client for the embedding service
pub struct EmbeddingClient {
    client: HttpClient,
    base_url: String,
    model: String,
}

impl EmbeddingClient {
    pub fn new() -> Result<Self> {
        Self::with_options(get_embedding_service_url(), get_embedding_model())
    }

    pub fn with_options(base_url: String, model: String) -> Result<Self> {
        let client = HttpClient::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }
}

#[async_trait]
impl TextEmbedder for EmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url);
        let payload = json!({
            "model": self.model,
            "prompt": text,
        });

        debug!("Embedding request: model={}, text_len={}", self.model, text.len());

        let request = isahc::Request::builder()
            .uri(&url)
            .method("POST")
            .header("Content-Type", "application/json")
            .body(serde_json::to_string(&payload)?)
            .map_err(|e| AppError::Embedding(format!("Request build error: {}", e)))?;

        let mut resp = self
            .client
            .send_async(request)
            .await
            .map_err(|e| AppError::Embedding(format!("HTTP request failed: {}", e)))?;

        let status = resp.status();
        let text_body = resp.text().await.map_err(|e| AppError::Embedding(e.to_string()))?;

        if !status.is_success() {
            return Err(AppError::Embedding(format!(
                "embedding service returned {}: {}",
                status.as_u16(),
                text_body
            )));
        }

        let data: Value = serde_json::from_str(&text_body)
            .map_err(|e| AppError::Embedding(format!("invalid response: {}", e)))?;

        parse_embedding(&data)
    }
}

fn parse_embedding(data: &Value) -> Result<Vec<f32>> {
    let vector: Vec<f32> = data["embedding"]
        .as_array()
        .ok_or_else(|| AppError::Embedding("response has no embedding array".to_string()))?
        .iter()
        .map(|v| v.as_f64().unwrap_or(0.0) as f32)
        .collect();

    if vector.len() != EMBEDDING_DIMS {
        return Err(AppError::Embedding(format!(
            "expected {} dimensions, got {}",
            EMBEDDING_DIMS,
            vector.len()
        )));
    }

    Ok(vector)
}
