use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::catalog::{Catalog, CatalogFilter, UpsertOutcome};
use crate::core::{InteractionEvent, InteractionKind, Perfume, ScentProfile};
use crate::error::{Result, ScentEngineError};
use crate::interactions::InteractionLog;
use crate::inventory::Inventory;
use crate::normalize::{normalize, NormalizedRecord, SourceRecord};
use crate::providers::{CatalogProvider, MIN_QUERY_LEN};
use crate::ranking::{self, ProfileMatch, SimilarPerfume};
use crate::store::StateStore;

/// Brand and note terms used to fill an empty catalog on first run
pub const DEFAULT_SEED_TERMS: [&str; 25] = [
    "Dior",
    "Chanel",
    "Gucci",
    "Versace",
    "Tom Ford",
    "Prada",
    "Armani",
    "Yves Saint Laurent",
    "Givenchy",
    "Burberry",
    "Dolce Gabbana",
    "Calvin Klein",
    "Hugo Boss",
    "Valentino",
    "Hermes",
    "Rose",
    "Oud",
    "Vanilla",
    "Lavender",
    "Jasmine",
    "Citrus",
    "Sandalwood",
    "Amber",
    "Musk",
    "Bergamot",
];

/// Engine tuning knobs
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Most records requested per provider per search
    pub search_limit: usize,
    /// Catalog size a seeding pass aims for
    pub seed_target: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            search_limit: 20,
            seed_target: 100,
        }
    }
}

/// Result of one search pass
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Matching perfumes, most popular first
    pub perfumes: Vec<Perfume>,
    /// Whether remote providers were consulted for this query
    pub remote_queried: bool,
    /// True when every consulted provider failed, so the results come from
    /// the possibly-stale local catalog alone
    pub stale: bool,
}

/// Main recommendation engine orchestrator.
///
/// Owns the in-memory catalog, interaction log and inventory, keeps them
/// mirrored to the injected [`StateStore`] on every mutation, and pulls new
/// perfumes from registered [`CatalogProvider`]s during searches.
pub struct ScentEngine {
    store: Arc<dyn StateStore>,
    providers: Vec<Arc<dyn CatalogProvider>>,
    config: EngineConfig,
    catalog: Catalog,
    log: InteractionLog,
    inventory: Inventory,
}

impl ScentEngine {
    /// Create an engine on the given store, loading whatever state it holds
    pub async fn new(store: Arc<dyn StateStore>, config: EngineConfig) -> Result<Self> {
        let catalog = Catalog::from_perfumes(store.load_catalog().await?);
        let log = InteractionLog::from_events(store.load_interactions().await?);
        let inventory = Inventory::from_ids(store.load_inventory().await?);
        info!(
            "🌸 Scent engine ready: {} perfumes, {} interactions, {} in inventory",
            catalog.len(),
            log.len(),
            inventory.len()
        );
        Ok(Self {
            store,
            providers: Vec::new(),
            config,
            catalog,
            log,
            inventory,
        })
    }

    /// Register a catalog provider
    pub fn add_provider(&mut self, provider: Arc<dyn CatalogProvider>) {
        self.providers.push(provider);
    }

    /// Search the catalog, refreshing it from providers first when the
    /// query is long enough.
    ///
    /// Provider failures never fail the search; the outcome's `stale` flag
    /// is raised instead and the local catalog answers. Queries under
    /// [`MIN_QUERY_LEN`] characters skip the remote fetch entirely.
    ///
    /// The `query` argument always drives the remote fetch. For local
    /// filtering it is used only when `filter.query` is `None`; a filter
    /// that carries its own query takes precedence over the argument.
    pub async fn search(&mut self, query: &str, filter: &CatalogFilter) -> Result<SearchOutcome> {
        let start = Instant::now();
        let trimmed = query.trim();
        let remote_due =
            trimmed.chars().count() >= MIN_QUERY_LEN && !self.providers.is_empty();

        let mut stale = false;
        if remote_due {
            let providers = self.providers.clone();
            let mut failed = 0usize;
            let mut changed = 0usize;
            for provider in &providers {
                match provider.search(trimmed, self.config.search_limit).await {
                    Ok(records) => {
                        debug!(
                            "Provider {} returned {} records for '{}'",
                            provider.name(),
                            records.len(),
                            trimmed
                        );
                        changed += self.ingest(&records, provider.name());
                    }
                    Err(e) => {
                        warn!("Provider {} failed: {}", provider.name(), e);
                        failed += 1;
                    }
                }
            }
            stale = failed > 0 && failed == providers.len();
            if changed > 0 {
                self.persist_catalog().await?;
            }
        }

        // Filter first so ranking and counts reflect the filtered set
        let mut effective = filter.clone();
        if effective.query.is_none() {
            effective.query = Some(trimmed.to_string());
        }
        let matches = self.catalog.filter(&effective);
        let perfumes = ranking::rank_by_popularity(matches, &self.log);

        debug!(
            "Search '{}' matched {} perfumes in {:.1}ms",
            trimmed,
            perfumes.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(SearchOutcome {
            perfumes,
            remote_queried: remote_due,
            stale,
        })
    }

    /// Append one interaction and persist the log.
    ///
    /// Unknown ids are accepted: the UI may hold references to perfumes
    /// that never reached this catalog, and the log is append-only.
    pub async fn record_interaction(
        &mut self,
        perfume_id: &str,
        kind: InteractionKind,
    ) -> Result<()> {
        self.log.record(InteractionEvent::new(perfume_id, kind));
        self.store.save_interactions(self.log.events()).await?;
        debug!("Recorded {} for {}", kind, perfume_id);
        Ok(())
    }

    /// Rank the whole catalog against questionnaire answers, best first
    pub fn submit_questionnaire(&self, answers: [i64; 5]) -> Result<Vec<ProfileMatch>> {
        let profile = ScentProfile::from_answers(answers)?;
        Ok(ranking::match_catalog(&profile, self.catalog.all(), &self.log))
    }

    /// The `k` catalog entries most similar to the given perfume
    pub fn similar_to(&self, perfume_id: &str, k: usize) -> Result<Vec<SimilarPerfume>> {
        let reference = self
            .catalog
            .get(perfume_id)
            .ok_or_else(|| ScentEngineError::UnknownPerfume(perfume_id.to_string()))?;
        Ok(ranking::similar_to(reference, &self.catalog.all(), &self.log, k))
    }

    /// Add a catalog perfume to the inventory; false when already present.
    /// Ids outside the catalog are rejected.
    pub async fn add_to_inventory(&mut self, perfume_id: &str) -> Result<bool> {
        if !self.catalog.contains(perfume_id) {
            return Err(ScentEngineError::UnknownPerfume(perfume_id.to_string()));
        }
        let added = self.inventory.add(perfume_id);
        if added {
            self.store.save_inventory(self.inventory.ids()).await?;
        }
        Ok(added)
    }

    /// Remove a perfume from the inventory; false when it was not there
    pub async fn remove_from_inventory(&mut self, perfume_id: &str) -> Result<bool> {
        let removed = self.inventory.remove(perfume_id);
        if removed {
            self.store.save_inventory(self.inventory.ids()).await?;
        }
        Ok(removed)
    }

    /// Inventory perfumes in insertion order
    pub fn list_inventory(&self) -> Vec<Perfume> {
        self.inventory
            .ids()
            .iter()
            .filter_map(|id| self.catalog.get(id))
            .cloned()
            .collect()
    }

    /// Fill the catalog by searching the given terms until `target` entries
    /// exist. Failing terms are logged and skipped; the pass never fails on
    /// provider errors. Returns the number of perfumes added.
    pub async fn seed_catalog(&mut self, terms: &[&str], target: Option<usize>) -> Result<usize> {
        let target = target.unwrap_or(self.config.seed_target);
        let before = self.catalog.len();
        let providers = self.providers.clone();
        let mut changed = 0usize;

        for term in terms {
            if self.catalog.len() >= target {
                break;
            }
            for provider in &providers {
                match provider.search(term, self.config.search_limit).await {
                    Ok(records) => {
                        changed += self.ingest(&records, provider.name());
                    }
                    Err(e) => {
                        warn!("Seed term '{}' failed on {}: {}", term, provider.name(), e);
                    }
                }
            }
        }

        if changed > 0 {
            self.persist_catalog().await?;
        }
        let added = self.catalog.len() - before;
        info!(
            "🌱 Seeded {} new perfumes ({} total)",
            added,
            self.catalog.len()
        );
        Ok(added)
    }

    pub fn get_perfume(&self, perfume_id: &str) -> Option<&Perfume> {
        self.catalog.get(perfume_id)
    }

    pub fn catalog_len(&self) -> usize {
        self.catalog.len()
    }

    /// Derived popularity score; zero for ids without events
    pub fn popularity_of(&self, perfume_id: &str) -> u32 {
        self.log.score_of(perfume_id)
    }

    /// Normalize and upsert records, returning how many changed the catalog
    fn ingest(&mut self, records: &[SourceRecord], origin: &str) -> usize {
        let mut changed = 0;
        for record in records {
            let NormalizedRecord { perfume, warnings } = normalize(record, origin);
            for warning in &warnings {
                warn!("Normalizing {} from {}: {}", perfume.id, origin, warning);
            }
            match self.catalog.upsert(perfume) {
                UpsertOutcome::Inserted | UpsertOutcome::Updated => changed += 1,
                UpsertOutcome::Unchanged => {}
            }
        }
        changed
    }

    async fn persist_catalog(&self) -> Result<()> {
        self.store.save_catalog(&self.catalog.all()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    async fn engine() -> ScentEngine {
        ScentEngine::new(Arc::new(MemoryStore::new()), EngineConfig::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_engine_creation() {
        let engine = engine().await;
        assert_eq!(engine.catalog_len(), 0);
        assert!(engine.list_inventory().is_empty());
    }

    #[tokio::test]
    async fn test_recording_feeds_popularity() {
        let mut engine = engine().await;
        engine
            .record_interaction("p1", InteractionKind::Favorite)
            .await
            .unwrap();
        assert_eq!(engine.popularity_of("p1"), 3);
        assert_eq!(engine.popularity_of("p2"), 0);
    }

    #[tokio::test]
    async fn test_inventory_rejects_unknown_id() {
        let mut engine = engine().await;
        let err = engine.add_to_inventory("ghost").await.unwrap_err();
        assert!(matches!(err, ScentEngineError::UnknownPerfume(_)));
        assert!(!engine.remove_from_inventory("ghost").await.unwrap());
    }

    #[tokio::test]
    async fn test_similar_rejects_unknown_id() {
        let engine = engine().await;
        let err = engine.similar_to("ghost", 5).unwrap_err();
        assert!(matches!(err, ScentEngineError::UnknownPerfume(_)));
    }

    #[tokio::test]
    async fn test_filter_query_takes_precedence_over_search_argument() {
        let store = Arc::new(MemoryStore::new());
        store
            .save_catalog(&[
                Perfume::new("p1", "Bloom", "Gucci"),
                Perfume::new("p2", "Sauvage", "Dior"),
            ])
            .await
            .unwrap();
        let mut engine = ScentEngine::new(store, EngineConfig::default())
            .await
            .unwrap();

        let filter = CatalogFilter {
            query: Some("dior".to_string()),
            ..CatalogFilter::default()
        };
        let outcome = engine.search("gucci", &filter).await.unwrap();
        let names: Vec<&str> = outcome.perfumes.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Sauvage"]);
    }

    #[tokio::test]
    async fn test_questionnaire_rejects_out_of_range() {
        let engine = engine().await;
        let err = engine.submit_questionnaire([3, 3, 6, 3, 3]).unwrap_err();
        assert!(matches!(err, ScentEngineError::InvalidAnswer { .. }));
    }
}
