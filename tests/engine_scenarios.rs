use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use scentify_engine::{
    Accord, CatalogFilter, CatalogProvider, EngineConfig, Gender, InteractionKind, JsonFileStore,
    MemoryStore, OccasionProfile, Perfume, Result, ScentEngine, ScentEngineError, ScentType,
    SourceRecord, StateStore,
};

/// Provider that replays canned records, so ingestion runs offline
struct ScriptedProvider {
    records: Vec<SourceRecord>,
    fail: bool,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    fn new(records: Vec<serde_json::Value>) -> Arc<Self> {
        Arc::new(Self {
            records: records
                .into_iter()
                .filter_map(SourceRecord::from_value)
                .collect(),
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            records: Vec::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogProvider for ScriptedProvider {
    async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<SourceRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ScentEngineError::Provider {
                provider: "scripted".to_string(),
                message: "scripted failure".to_string(),
            });
        }
        Ok(self.records.clone())
    }

    fn name(&self) -> &str {
        "scripted"
    }

    async fn is_available(&self) -> bool {
        !self.fail
    }
}

fn chanel_record() -> serde_json::Value {
    json!({
        "Name": "No 5",
        "Brand": "Chanel",
        "Price": "$150",
        "Gender": "women",
        "Notes": {
            "Top": ["Aldehydes"],
            "Middle": ["Jasmine"],
            "Base": ["Sandalwood"]
        },
        "Main Accords": ["Floral"]
    })
}

fn fresh_aquatic() -> Perfume {
    let mut perfume = Perfume::new("p_aqua", "Sea Mist", "Acqua");
    perfume.main_accords = vec![
        Accord::new("fresh", 1.0),
        Accord::new("aquatic", 0.9),
        Accord::new("fruity", 0.8),
    ];
    perfume.scent_type = ScentType::Aquatic;
    perfume.gender = Gender::Unisex;
    perfume.occasion = OccasionProfile { day: 5, night: 3 };
    perfume
}

fn intense_oriental() -> Perfume {
    let mut perfume = Perfume::new("p_orient", "Dusk", "Noir");
    perfume.main_accords = vec![
        Accord::new("oriental", 1.0),
        Accord::new("spicy", 0.9),
        Accord::new("woody", 0.8),
        Accord::new("leather", 0.7),
    ];
    perfume.scent_type = ScentType::Oriental;
    perfume.gender = Gender::Female;
    perfume.occasion = OccasionProfile { day: 1, night: 5 };
    perfume
}

async fn engine_with_catalog(perfumes: &[Perfume]) -> ScentEngine {
    let store = Arc::new(MemoryStore::new());
    store.save_catalog(perfumes).await.unwrap();
    ScentEngine::new(store, EngineConfig::default())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_search_ingests_and_normalizes() {
    let mut engine = engine_with_catalog(&[]).await;
    let provider = ScriptedProvider::new(vec![chanel_record()]);
    engine.add_provider(provider.clone());

    let outcome = engine
        .search("chanel", &CatalogFilter::default())
        .await
        .unwrap();

    assert!(outcome.remote_queried);
    assert!(!outcome.stale);
    assert_eq!(provider.calls(), 1);
    assert_eq!(outcome.perfumes.len(), 1);

    let perfume = &outcome.perfumes[0];
    assert_eq!(perfume.id, "scripted_chanel_no_5");
    assert_eq!(perfume.name, "No 5");
    assert_eq!(perfume.brand, "Chanel");
    assert_eq!(perfume.price, 150.0);
    assert_eq!(perfume.gender, Gender::Female);
    assert_eq!(perfume.scent_type, ScentType::Floral);
    assert_eq!(perfume.top_notes, vec!["Aldehydes"]);
}

#[tokio::test]
async fn test_short_query_skips_remote() {
    let mut engine = engine_with_catalog(&[]).await;
    let provider = ScriptedProvider::new(vec![chanel_record()]);
    engine.add_provider(provider.clone());

    engine
        .search("chanel", &CatalogFilter::default())
        .await
        .unwrap();
    assert_eq!(provider.calls(), 1);

    // Two characters: no external fetch, local matches only
    let outcome = engine.search("ch", &CatalogFilter::default()).await.unwrap();
    assert!(!outcome.remote_queried);
    assert!(!outcome.stale);
    assert_eq!(provider.calls(), 1);
    assert_eq!(outcome.perfumes.len(), 1);
    assert_eq!(outcome.perfumes[0].brand, "Chanel");
}

#[tokio::test]
async fn test_weighted_popularity_ordering() {
    let mut engine = engine_with_catalog(&[
        Perfume::new("p_x", "Xtra", "Brand"),
        Perfume::new("p_y", "Yonder", "Brand"),
    ])
    .await;

    engine
        .record_interaction("p_x", InteractionKind::View)
        .await
        .unwrap();
    engine
        .record_interaction("p_x", InteractionKind::View)
        .await
        .unwrap();
    engine
        .record_interaction("p_x", InteractionKind::Click)
        .await
        .unwrap();
    engine
        .record_interaction("p_x", InteractionKind::AddToInventory)
        .await
        .unwrap();
    assert_eq!(engine.popularity_of("p_x"), 9);

    engine
        .record_interaction("p_y", InteractionKind::Favorite)
        .await
        .unwrap();

    let outcome = engine.search("", &CatalogFilter::default()).await.unwrap();
    let ids: Vec<&str> = outcome.perfumes.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p_x", "p_y"]);
    assert!(!outcome.remote_queried);
}

#[tokio::test]
async fn test_questionnaire_ranks_by_profile_distance() {
    let engine = engine_with_catalog(&[fresh_aquatic(), intense_oriental()]).await;

    let matches = engine.submit_questionnaire([2, 1, 3, 1, 3]).unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].perfume.id, "p_aqua");
    assert_eq!(matches[0].distance, 0);
    assert_eq!(matches[1].perfume.id, "p_orient");
    assert_eq!(matches[1].distance, 15);

    // Same profile and catalog: same order
    let again = engine.submit_questionnaire([2, 1, 3, 1, 3]).unwrap();
    let first: Vec<&str> = matches.iter().map(|m| m.perfume.id.as_str()).collect();
    let second: Vec<&str> = again.iter().map(|m| m.perfume.id.as_str()).collect();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_provider_failure_falls_back_to_local_catalog() {
    let mut engine = engine_with_catalog(&[Perfume::new("p1", "Chic", "Carolina")]).await;
    engine.add_provider(ScriptedProvider::failing());

    let outcome = engine.search("chic", &CatalogFilter::default()).await.unwrap();
    assert!(outcome.remote_queried);
    assert!(outcome.stale);
    assert_eq!(outcome.perfumes.len(), 1);
    assert_eq!(outcome.perfumes[0].name, "Chic");
}

#[tokio::test]
async fn test_one_healthy_provider_keeps_results_fresh() {
    let mut engine = engine_with_catalog(&[]).await;
    engine.add_provider(ScriptedProvider::failing());
    engine.add_provider(ScriptedProvider::new(vec![chanel_record()]));

    let outcome = engine
        .search("chanel", &CatalogFilter::default())
        .await
        .unwrap();
    assert!(!outcome.stale);
    assert_eq!(outcome.perfumes.len(), 1);
}

#[tokio::test]
async fn test_state_survives_reload() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = Arc::new(JsonFileStore::new(dir.path()).await.unwrap());
        let mut engine = ScentEngine::new(store, EngineConfig::default()).await.unwrap();
        engine.add_provider(ScriptedProvider::new(vec![json!({
            "Name": "Bloom",
            "Brand": "Gucci",
            "Gender": "women",
            "Main Accords": ["floral"]
        })]));

        engine
            .search("gucci", &CatalogFilter::default())
            .await
            .unwrap();
        engine
            .record_interaction("scripted_gucci_bloom", InteractionKind::Favorite)
            .await
            .unwrap();
        assert!(engine.add_to_inventory("scripted_gucci_bloom").await.unwrap());
    }

    let store = Arc::new(JsonFileStore::new(dir.path()).await.unwrap());
    let engine = ScentEngine::new(store, EngineConfig::default()).await.unwrap();
    assert_eq!(engine.catalog_len(), 1);
    assert_eq!(engine.popularity_of("scripted_gucci_bloom"), 3);

    let inventory = engine.list_inventory();
    assert_eq!(inventory.len(), 1);
    assert_eq!(inventory[0].name, "Bloom");
    assert_eq!(inventory[0].scent_type, ScentType::Floral);
}

#[tokio::test]
async fn test_inventory_flow() {
    let mut engine = engine_with_catalog(&[
        Perfume::new("p1", "First", "Brand"),
        Perfume::new("p2", "Second", "Brand"),
    ])
    .await;

    let err = engine.add_to_inventory("ghost").await.unwrap_err();
    assert!(matches!(err, ScentEngineError::UnknownPerfume(_)));

    assert!(engine.add_to_inventory("p2").await.unwrap());
    assert!(!engine.add_to_inventory("p2").await.unwrap());
    assert!(engine.add_to_inventory("p1").await.unwrap());

    let inventory = engine.list_inventory();
    let names: Vec<&str> = inventory.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Second", "First"]);

    assert!(engine.remove_from_inventory("p2").await.unwrap());
    assert!(!engine.remove_from_inventory("p2").await.unwrap());
    assert_eq!(engine.list_inventory().len(), 1);
}

#[tokio::test]
async fn test_similar_flow() {
    let mut reference = Perfume::new("p_ref", "Reference", "Brand");
    reference.top_notes = vec!["Rose".to_string(), "Oud".to_string()];
    reference.gender = Gender::Female;

    let mut close = Perfume::new("p_close", "Close", "Brand");
    close.top_notes = vec!["Rose".to_string(), "Oud".to_string()];
    close.gender = Gender::Female;

    let mut far = Perfume::new("p_far", "Far", "Brand");
    far.top_notes = vec!["Rose".to_string()];
    far.gender = Gender::Female;

    let mut stranger = Perfume::new("p_none", "Stranger", "Brand");
    stranger.top_notes = vec!["Tar".to_string()];
    stranger.gender = Gender::Male;

    let engine = engine_with_catalog(&[reference, close, far, stranger]).await;

    let err = engine.similar_to("ghost", 5).unwrap_err();
    assert!(matches!(err, ScentEngineError::UnknownPerfume(_)));

    let similar = engine.similar_to("p_ref", 10).unwrap();
    let ids: Vec<&str> = similar.iter().map(|s| s.perfume.id.as_str()).collect();
    assert_eq!(ids, vec!["p_close", "p_far"]);

    let capped = engine.similar_to("p_ref", 1).unwrap();
    assert_eq!(capped.len(), 1);
    assert_eq!(capped[0].perfume.id, "p_close");
}

#[tokio::test]
async fn test_seeding_stops_at_target_and_tolerates_failures() {
    let store = Arc::new(MemoryStore::new());
    let mut engine = ScentEngine::new(store.clone(), EngineConfig::default())
        .await
        .unwrap();

    let healthy = ScriptedProvider::new(vec![
        json!({"Name": "Rose Water", "Brand": "Lush", "Main Accords": ["floral"]}),
        json!({"Name": "Oud Royal", "Brand": "Amouage", "Main Accords": ["oud"]}),
    ]);
    engine.add_provider(healthy.clone());
    engine.add_provider(ScriptedProvider::failing());

    let added = engine
        .seed_catalog(&["rose", "oud", "amber"], Some(1))
        .await
        .unwrap();

    // The first term already met the target; later terms are skipped.
    // A term may overshoot since its whole result page is ingested.
    assert_eq!(healthy.calls(), 1);
    assert_eq!(added, 2);
    assert_eq!(engine.catalog_len(), 2);

    // The seeded catalog was persisted
    assert_eq!(store.load_catalog().await.unwrap().len(), 2);
}
