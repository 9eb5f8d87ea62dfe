use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::error::{Result, ScentEngineError};
use crate::normalize::SourceRecord;
use crate::providers::{CatalogProvider, MIN_QUERY_LEN};

const API_BASE: &str = "https://api.fragella.com/api/v1";

/// The API rejects page sizes above this
const MAX_PAGE_SIZE: usize = 20;

/// Fragella fragrance API provider
pub struct FragellaProvider {
    client: Client,
    api_key: String,
}

impl FragellaProvider {
    /// Create a new Fragella provider with the given API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(15)).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
        })
    }

    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<SourceRecord>> {
        let url = format!(
            "{}/fragrances?search={}&limit={}",
            API_BASE,
            urlencoding::encode(query),
            limit.min(MAX_PAGE_SIZE)
        );

        let response = self
            .client
            .get(&url)
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| ScentEngineError::Provider {
                provider: "fragella".to_string(),
                message: format!("Search request failed: {}", e),
            })?;

        if !response.status().is_success() {
            return Err(ScentEngineError::Provider {
                provider: "fragella".to_string(),
                message: format!("HTTP {}", response.status()),
            });
        }

        // The API returns a bare JSON array of fragrance objects
        let values: Vec<Value> = response
            .json()
            .await
            .map_err(|e| ScentEngineError::Provider {
                provider: "fragella".to_string(),
                message: format!("Invalid JSON: {}", e),
            })?;

        Ok(values
            .into_iter()
            .filter_map(SourceRecord::from_value)
            .collect())
    }
}

#[async_trait]
impl CatalogProvider for FragellaProvider {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SourceRecord>> {
        let trimmed = query.trim();
        let len = trimmed.chars().count();
        if len < MIN_QUERY_LEN {
            return Err(ScentEngineError::QueryTooShort {
                len,
                min: MIN_QUERY_LEN,
            });
        }
        self.fetch(trimmed, limit).await
    }

    fn name(&self) -> &str {
        "fragella"
    }

    async fn is_available(&self) -> bool {
        self.fetch("rose", 1).await.is_ok()
    }
}
