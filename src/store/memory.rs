use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::{InteractionEvent, Perfume};
use crate::error::Result;
use crate::store::StateStore;

/// In-memory state backend for tests and ephemeral embedding.
/// Nothing survives the process.
#[derive(Default)]
pub struct MemoryStore {
    catalog: Mutex<Vec<Perfume>>,
    interactions: Mutex<Vec<InteractionEvent>>,
    inventory: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn load_catalog(&self) -> Result<Vec<Perfume>> {
        Ok(self.catalog.lock().unwrap().clone())
    }

    async fn save_catalog(&self, perfumes: &[Perfume]) -> Result<()> {
        *self.catalog.lock().unwrap() = perfumes.to_vec();
        Ok(())
    }

    async fn load_interactions(&self) -> Result<Vec<InteractionEvent>> {
        Ok(self.interactions.lock().unwrap().clone())
    }

    async fn save_interactions(&self, events: &[InteractionEvent]) -> Result<()> {
        *self.interactions.lock().unwrap() = events.to_vec();
        Ok(())
    }

    async fn load_inventory(&self) -> Result<Vec<String>> {
        Ok(self.inventory.lock().unwrap().clone())
    }

    async fn save_inventory(&self, ids: &[String]) -> Result<()> {
        *self.inventory.lock().unwrap() = ids.to_vec();
        Ok(())
    }
}
