//! Loads documents from a seed file into the vector store.
//!
//! The target collection is dropped and recreated on every run.

use std::{path::PathBuf, sync::Arc};

use ai_llm_service::LlmServiceProfiles;
use anyhow::Context;
use api::{AppConfig, ConfigSource, telemetry};
use clap::Parser;
use rag_base::{QdrantIndex, seed_from_file};
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "seed", about = "Seed the vector store from a YAML/JSON file")]
struct Args {
    /// Application config file.
    #[arg(long, env = "APP_CONFIG", default_value = "config.yaml")]
    config: PathBuf,

    /// Seed file: a mapping (or list) of {title, body, link} records.
    #[arg(long, env = "SEED_FILE", default_value = "seed.yaml")]
    file: PathBuf,

    /// Override the target collection name.
    #[arg(long)]
    collection: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let (mut cfg, source) = AppConfig::load(&args.config)
        .with_context(|| format!("loading config from {}", args.config.display()))?;
    if let Some(name) = args.collection {
        cfg.rag.qdrant.collection = name;
    }

    let _log_guard = telemetry::init(&cfg.logging).context("initialising logging")?;
    if source == ConfigSource::Defaults {
        info!(path = %args.config.display(), "config file not found, using defaults");
    }

    if let Err(e) = run(&cfg, &args.file).await {
        error!(error = %format!("{e:#}"), "seeding failed");
        return Err(e);
    }
    Ok(())
}

async fn run(cfg: &AppConfig, file: &std::path::Path) -> anyhow::Result<()> {
    let embedder = Arc::new(
        LlmServiceProfiles::new(cfg.llm.chat.clone(), cfg.llm.embedding.clone())
            .context("building LLM clients")?,
    );
    let index = QdrantIndex::connect(&cfg.rag.qdrant).context("connecting to Qdrant")?;

    let stats = seed_from_file(file, &index, embedder.as_ref(), &cfg.rag)
        .await
        .with_context(|| format!("seeding from {}", file.display()))?;

    info!(
        collection = %index.collection(),
        indexed = stats.indexed,
        total = stats.total,
        duration_ms = stats.duration_ms,
        "seeding complete"
    );
    println!(
        "collection '{}' now holds {} documents",
        index.collection(),
        stats.total
    );
    Ok(())
}
