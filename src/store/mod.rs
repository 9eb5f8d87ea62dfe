pub mod json_file;
pub mod memory;

use async_trait::async_trait;

use crate::core::{InteractionEvent, Perfume};
use crate::error::Result;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// Trait for durable engine state backends.
///
/// State is three independent documents: the catalog, the interaction log
/// and the inventory. Loads must treat missing state as empty rather than
/// failing; saves must report failures so callers know durability is at
/// risk.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the full catalog, empty when nothing was stored yet
    async fn load_catalog(&self) -> Result<Vec<Perfume>>;

    /// Replace the stored catalog
    async fn save_catalog(&self, perfumes: &[Perfume]) -> Result<()>;

    /// Load the full interaction history, oldest first
    async fn load_interactions(&self) -> Result<Vec<InteractionEvent>>;

    /// Replace the stored interaction history
    async fn save_interactions(&self, events: &[InteractionEvent]) -> Result<()>;

    /// Load the inventory id list in insertion order
    async fn load_inventory(&self) -> Result<Vec<String>>;

    /// Replace the stored inventory id list
    async fn save_inventory(&self, ids: &[String]) -> Result<()>;
}
