use clap::{Parser, Subcommand};
use scentify_engine::{
    CatalogFilter, EngineConfig, FragellaProvider, Gender, InteractionKind, JsonFileStore,
    ScentEngine, ScentType, DEFAULT_SEED_TERMS,
};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "scentify-cli")]
#[command(about = "Scentify perfume engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// State directory
    #[arg(short, long, default_value = "scentify_data")]
    data_dir: String,

    /// Fragella API key; without one, searches use the local catalog only
    #[arg(long)]
    api_key: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search perfumes by name or brand
    Search {
        /// Search query
        query: String,

        /// Gender filters (male, female, unisex)
        #[arg(short, long)]
        gender: Vec<String>,

        /// Scent type filters (Floral, Woody, ...)
        #[arg(short, long)]
        scent_type: Vec<String>,

        /// Minimum price
        #[arg(long)]
        min_price: Option<f64>,

        /// Maximum price
        #[arg(long)]
        max_price: Option<f64>,

        /// Maximum rows printed
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Fill the catalog from well-known brand and note terms
    Seed {
        /// Terms to search; defaults to the built-in list
        terms: Vec<String>,

        /// Stop once the catalog holds this many perfumes
        #[arg(short, long)]
        target: Option<usize>,
    },

    /// Record an interaction (view, click, favorite, add_to_inventory)
    Record {
        perfume_id: String,
        kind: String,
    },

    /// Rank the catalog against questionnaire answers
    Quiz {
        /// Five answers, each 1-5: intensity warmth sweetness occasion character
        answers: Vec<i64>,

        /// Maximum rows printed
        #[arg(long, default_value = "8")]
        limit: usize,
    },

    /// Find perfumes similar to one you like
    Similar {
        perfume_id: String,

        /// How many results
        #[arg(short, long, default_value = "5")]
        k: usize,
    },

    /// Add a perfume to your inventory
    AddInventory { perfume_id: String },

    /// Remove a perfume from your inventory
    RemoveInventory { perfume_id: String },

    /// List your inventory
    Inventory,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let store = Arc::new(JsonFileStore::new(&cli.data_dir).await?);
    let mut engine = ScentEngine::new(store, EngineConfig::default()).await?;

    if let Some(api_key) = &cli.api_key {
        engine.add_provider(Arc::new(FragellaProvider::new(api_key.clone())?));
    }

    match cli.command {
        Commands::Search {
            query,
            gender,
            scent_type,
            min_price,
            max_price,
            limit,
        } => {
            println!("🔍 Searching for: {}", query);

            let genders: Vec<Gender> = gender
                .iter()
                .map(|label| label.parse())
                .collect::<Result<_, _>>()?;
            let scent_types: Vec<ScentType> = scent_type
                .iter()
                .map(|label| label.parse())
                .collect::<Result<_, _>>()?;
            let filter = CatalogFilter {
                query: None,
                genders,
                scent_types,
                price: match (min_price, max_price) {
                    (None, None) => None,
                    (min, max) => Some(min.unwrap_or(0.0)..=max.unwrap_or(f64::MAX)),
                },
            };

            let outcome = engine.search(&query, &filter).await?;
            if outcome.stale {
                println!("⚠️ Providers unreachable, showing local catalog only");
            }

            println!("\n✅ {} match(es)", outcome.perfumes.len());
            for (i, perfume) in outcome.perfumes.iter().take(limit).enumerate() {
                println!(
                    "   {}. {} [{} | {}] ${:.2} (popularity {})",
                    i + 1,
                    perfume.display_name(),
                    perfume.scent_type,
                    perfume.gender,
                    perfume.price,
                    engine.popularity_of(&perfume.id)
                );
            }
        }

        Commands::Seed { terms, target } => {
            println!("🌱 Seeding catalog...");

            let term_refs: Vec<&str> = if terms.is_empty() {
                DEFAULT_SEED_TERMS.to_vec()
            } else {
                terms.iter().map(String::as_str).collect()
            };

            let added = engine.seed_catalog(&term_refs, target).await?;
            println!("✅ Added {} perfumes ({} total)", added, engine.catalog_len());
        }

        Commands::Record { perfume_id, kind } => {
            let kind: InteractionKind = kind.parse()?;
            engine.record_interaction(&perfume_id, kind).await?;
            println!(
                "✅ Recorded {} for {} (popularity now {})",
                kind,
                perfume_id,
                engine.popularity_of(&perfume_id)
            );
        }

        Commands::Quiz { answers, limit } => {
            let answers: [i64; 5] = answers.try_into().map_err(|bad: Vec<i64>| {
                anyhow::anyhow!(
                    "expected 5 answers (intensity warmth sweetness occasion character), got {}",
                    bad.len()
                )
            })?;

            let matches = engine.submit_questionnaire(answers)?;
            println!("🎯 Best matches:");
            for (i, matched) in matches.iter().take(limit).enumerate() {
                println!(
                    "   {}. {} (distance {}, score {})",
                    i + 1,
                    matched.perfume.display_name(),
                    matched.distance,
                    matched.score
                );
            }
        }

        Commands::Similar { perfume_id, k } => {
            let similar = engine.similar_to(&perfume_id, k)?;
            if similar.is_empty() {
                println!("🤷 Nothing similar to {} in the catalog yet", perfume_id);
            } else {
                println!("💞 Similar to {}:", perfume_id);
                for (i, candidate) in similar.iter().enumerate() {
                    println!(
                        "   {}. {} (score {})",
                        i + 1,
                        candidate.perfume.display_name(),
                        candidate.score
                    );
                }
            }
        }

        Commands::AddInventory { perfume_id } => {
            let added = engine.add_to_inventory(&perfume_id).await?;
            if added {
                // Owning a perfume also counts as an interaction
                engine
                    .record_interaction(&perfume_id, InteractionKind::AddToInventory)
                    .await?;
                println!("✅ Added {} to inventory", perfume_id);
            } else {
                println!("ℹ️ {} is already in the inventory", perfume_id);
            }
        }

        Commands::RemoveInventory { perfume_id } => {
            if engine.remove_from_inventory(&perfume_id).await? {
                println!("✅ Removed {} from inventory", perfume_id);
            } else {
                println!("ℹ️ {} was not in the inventory", perfume_id);
            }
        }

        Commands::Inventory => {
            let perfumes = engine.list_inventory();
            if perfumes.is_empty() {
                println!("📦 Inventory is empty");
            } else {
                println!("📦 Inventory ({} perfumes):", perfumes.len());
                for (i, perfume) in perfumes.iter().enumerate() {
                    println!(
                        "   {}. {} [{}] ${:.2}",
                        i + 1,
                        perfume.display_name(),
                        perfume.scent_type,
                        perfume.price
                    );
                }
            }
        }
    }

    Ok(())
}
