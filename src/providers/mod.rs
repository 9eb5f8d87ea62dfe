pub mod fragella;

use async_trait::async_trait;

use crate::error::Result;
use crate::normalize::SourceRecord;

pub use fragella::FragellaProvider;

/// Queries shorter than this (in characters, after trimming) are rejected
/// before any network call
pub const MIN_QUERY_LEN: usize = 3;

/// Trait for remote perfume catalog sources.
///
/// Providers return raw [`SourceRecord`]s; normalization into canonical
/// perfumes happens in the engine, never here.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Search for raw perfume records by free-text query
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SourceRecord>>;

    /// Get provider name for ids and logging
    fn name(&self) -> &str;

    /// Check if provider is reachable
    async fn is_available(&self) -> bool;
}
