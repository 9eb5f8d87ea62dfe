//! # Scentify Engine
//!
//! Perfume recommendation engine with:
//! - Remote catalog ingestion (Fragella API) with total normalization
//! - Weighted interaction log driving popularity rankings
//! - Questionnaire profile matching over five preference axes
//! - Note-overlap similarity search
//! - Durable JSON-file state, async/await architecture
//! - Multiple interfaces: Rust library, Python bindings, CLI
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use scentify_engine::{
//!     CatalogFilter, EngineConfig, FragellaProvider, JsonFileStore, ScentEngine,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(JsonFileStore::new("scentify_data").await?);
//!     let mut engine = ScentEngine::new(store, EngineConfig::default()).await?;
//!     engine.add_provider(Arc::new(FragellaProvider::new("api-key")?));
//!
//!     let outcome = engine.search("rose", &CatalogFilter::default()).await?;
//!     for perfume in &outcome.perfumes {
//!         println!("{} ({})", perfume.display_name(), perfume.scent_type);
//!     }
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod core;
pub mod engine;
pub mod error;
pub mod interactions;
pub mod inventory;
pub mod normalize;
pub mod providers;
pub mod ranking;
pub mod store;

// Re-export primary types
pub use catalog::{Catalog, CatalogFilter, UpsertOutcome};
pub use core::{
    Accord, Gender, InteractionEvent, InteractionKind, OccasionProfile, Perfume, ScentProfile,
    ScentType, Seasonality,
};
pub use engine::{EngineConfig, ScentEngine, SearchOutcome, DEFAULT_SEED_TERMS};
pub use error::{Result, ScentEngineError};
pub use interactions::InteractionLog;
pub use inventory::Inventory;
pub use normalize::{normalize, NormalizeWarning, NormalizedRecord, SourceRecord};
pub use providers::{CatalogProvider, FragellaProvider, MIN_QUERY_LEN};
pub use ranking::{ProfileMatch, RankMode, SimilarPerfume};
pub use store::{JsonFileStore, MemoryStore, StateStore};

// Python bindings
#[cfg(feature = "python")]
pub mod python;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
