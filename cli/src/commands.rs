//! Command-line interface and command dispatch.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use dmensions_concept_store::{ConceptStore, DEFAULT_VOCABULARY};
use dmensions_embeddings::{EmbeddingProvider, OllamaProvider, find_top_k};
use dmensions_projection::{TsneConfig, TsneProjector};

use crate::config::DmensionsConfig;
use crate::render::{self, Starfield};

/// Store short concepts and map them onto a semantic starfield.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, propagate_version = true)]
pub struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the concept store.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Embed and store one or more concepts.
    #[command(alias = "a")]
    Add {
        /// Concepts to add.
        #[arg(required = true)]
        concepts: Vec<String>,
    },

    /// List stored concepts.
    #[command(alias = "ls")]
    List,

    /// Remove a concept by id.
    #[command(alias = "rm")]
    Remove { id: i64 },

    /// Rank stored concepts by similarity to a query.
    #[command(alias = "s")]
    Search {
        /// Query text.
        query: String,

        /// Maximum number of results.
        #[arg(short, long, default_value_t = 10)]
        limit: usize,

        /// Drop results scoring below this similarity.
        #[arg(long, default_value_t = -1.0, allow_negative_numbers = true)]
        min_score: f32,
    },

    /// Print projected 2D coordinates for every concept.
    Project {
        #[command(flatten)]
        projection: ProjectionArgs,

        /// Emit JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Draw the starfield in the terminal.
    Sky {
        #[command(flatten)]
        projection: ProjectionArgs,

        /// Canvas width in columns.
        #[arg(long, default_value_t = 100)]
        width: usize,

        /// Canvas height in rows.
        #[arg(long, default_value_t = 32)]
        height: usize,
    },
}

/// Overrides for the configured projection hyperparameters.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ProjectionArgs {
    /// Gradient descent iterations.
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Gradient descent step size.
    #[arg(long)]
    pub learning_rate: Option<f64>,

    /// Seed for a reproducible layout.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Evaluate gradients in parallel.
    #[arg(long)]
    pub parallel: bool,
}

impl ProjectionArgs {
    /// Apply these overrides on top of `base`.
    pub fn apply(&self, base: &TsneConfig) -> TsneConfig {
        let mut config = base.clone();
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(learning_rate) = self.learning_rate {
            config.learning_rate = learning_rate;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        config.parallel |= self.parallel;
        config
    }
}

/// Run a parsed command line.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = DmensionsConfig::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.store.data_dir = Some(data_dir);
    }
    debug!("Effective config: {config:?}");

    let provider: Arc<dyn EmbeddingProvider> =
        Arc::new(OllamaProvider::from_config(&config.embedding));
    let mut store = open_store(&config, provider).await?;

    match cli.command {
        Commands::Add { concepts } => {
            for text in &concepts {
                let concept = store
                    .save_concept(text)
                    .await
                    .with_context(|| format!("failed to add {text:?}"))?;
                println!("{:>5}  {}", concept.id, concept.content);
            }
            println!("{} concepts stored", store.len());
        }
        Commands::List => {
            for concept in store.concepts() {
                println!("{:>5}  {}", concept.id, concept.content);
            }
        }
        Commands::Remove { id } => {
            let concept = store.remove(id).await?;
            println!("removed {}  {}", concept.id, concept.content);
        }
        Commands::Search {
            query,
            limit,
            min_score,
        } => {
            let vector = store
                .embed_query(&query)
                .await
                .context("failed to embed query")?;
            let results = find_top_k(&vector, &store.all_entities(), limit, min_score)?;
            println!("{}", render::search_table(&results));
        }
        Commands::Project { projection, json } => {
            let tsne = projection.apply(&config.projection);
            let placed = project_store(&store, tsne).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&placed)?);
            } else {
                println!("{}", render::projection_table(&placed));
            }
        }
        Commands::Sky {
            projection,
            width,
            height,
        } => {
            let tsne = projection.apply(&config.projection);
            let placed = project_store(&store, tsne).await?;
            println!("{}", Starfield::new(width, height).draw(&placed));
            eprintln!("{} entities active", placed.len());
        }
    }

    Ok(())
}

async fn open_store(
    config: &DmensionsConfig,
    provider: Arc<dyn EmbeddingProvider>,
) -> anyhow::Result<ConceptStore> {
    let data_dir = config.store.resolved_data_dir();
    let mut store = ConceptStore::open(&data_dir, provider)
        .await
        .with_context(|| format!("failed to open store at {}", data_dir.display()))?;

    if store.is_new() && config.store.seed_vocabulary {
        info!("Seeding new store with {} concepts", DEFAULT_VOCABULARY.len());
        store
            .populate(DEFAULT_VOCABULARY)
            .await
            .context("failed to seed starter vocabulary")?;
    }
    Ok(store)
}

/// Project the whole store on a blocking worker.
async fn project_store(
    store: &ConceptStore,
    config: TsneConfig,
) -> anyhow::Result<Vec<render::PlacedConcept>> {
    let corpus = store.all_entities();
    let placed = tokio::task::spawn_blocking(move || {
        let projection = TsneProjector::new(config).project(&corpus)?;
        Ok::<_, dmensions_projection::ProjectionError>(render::placed(&corpus, &projection))
    })
    .await
    .context("projection worker panicked")??;
    Ok(placed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_search() {
        let cli = Cli::parse_from(["dmensions", "search", "big cat", "--limit", "3"]);
        match cli.command {
            Commands::Search {
                query,
                limit,
                min_score,
            } => {
                assert_eq!(query, "big cat");
                assert_eq!(limit, 3);
                assert_eq!(min_score, -1.0);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_negative_min_score() {
        let cli = Cli::parse_from(["dmensions", "search", "owl", "--min-score", "-0.25"]);
        let Commands::Search { min_score, .. } = cli.command else {
            panic!("expected search");
        };
        assert_eq!(min_score, -0.25);
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["dmensions", "list", "--data-dir", "/tmp/stars", "-v"]);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/stars")));
        assert!(cli.verbose);
    }

    #[test]
    fn test_add_requires_concepts() {
        assert!(Cli::try_parse_from(["dmensions", "add"]).is_err());
    }

    #[test]
    fn test_projection_args_override_config() {
        let cli = Cli::parse_from([
            "dmensions",
            "project",
            "--iterations",
            "50",
            "--seed",
            "9",
            "--json",
        ]);
        let Commands::Project { projection, json } = cli.command else {
            panic!("expected project");
        };
        assert!(json);

        let base = TsneConfig::default().with_sigma_squared(1.5);
        let config = projection.apply(&base);
        assert_eq!(config.iterations, 50);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.learning_rate, 20.0);
        assert_eq!(config.sigma_squared, 1.5);
        assert!(!config.parallel);
    }

    #[test]
    fn test_projection_args_default_keeps_config() {
        let base = TsneConfig::new(123, 4.0).with_seed(1).with_parallel(true);
        assert_eq!(ProjectionArgs::default().apply(&base), base);
    }
}
