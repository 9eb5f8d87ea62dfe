use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::core::{InteractionEvent, Perfume};
use crate::error::Result;
use crate::store::StateStore;

const CATALOG_FILE: &str = "catalog.json";
const INTERACTIONS_FILE: &str = "interactions.json";
const INVENTORY_FILE: &str = "inventory.json";

/// JSON-file state backend: one pretty-printed document per state kind
/// inside a single data directory.
///
/// Loads never fail. A missing file is first-run and yields empty state
/// silently; an unreadable or corrupt file yields empty state with a
/// warning, and the next save rewrites it. Saves go through a temp file
/// and rename so a crash cannot leave a half-written document behind.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `dir`, creating the directory if needed
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        debug!("State directory ready at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn load_vec<T: DeserializeOwned>(&self, file: &str) -> Vec<T> {
        let path = self.dir.join(file);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!("Failed to read {}: {} (starting empty)", path.display(), e);
                return Vec::new();
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(values) => values,
            Err(e) => {
                warn!("Failed to parse {}: {} (starting empty)", path.display(), e);
                Vec::new()
            }
        }
    }

    async fn save_value<T: Serialize + ?Sized>(&self, file: &str, value: &T) -> Result<()> {
        let path = self.dir.join(file);
        let tmp = self.dir.join(format!("{}.tmp", file));
        let bytes = serde_json::to_vec_pretty(value)?;
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    async fn load_catalog(&self) -> Result<Vec<Perfume>> {
        Ok(self.load_vec(CATALOG_FILE).await)
    }

    async fn save_catalog(&self, perfumes: &[Perfume]) -> Result<()> {
        self.save_value(CATALOG_FILE, perfumes).await
    }

    async fn load_interactions(&self) -> Result<Vec<InteractionEvent>> {
        Ok(self.load_vec(INTERACTIONS_FILE).await)
    }

    async fn save_interactions(&self, events: &[InteractionEvent]) -> Result<()> {
        self.save_value(INTERACTIONS_FILE, events).await
    }

    async fn load_inventory(&self) -> Result<Vec<String>> {
        Ok(self.load_vec(INVENTORY_FILE).await)
    }

    async fn save_inventory(&self, ids: &[String]) -> Result<()> {
        self.save_value(INVENTORY_FILE, ids).await
    }
}
