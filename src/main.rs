//! Command-line interface for datagen
//!
//! # Usage Examples
//!
//! ```bash
//! # Generate every collection described in the config file
//! datagen -f datagen.json
//!
//! # Authenticated server, two-letter keys, fixed seed
//! datagen -f datagen.yaml --host 10.0.0.5 --port 27018 -u admin -p secret -s --seed 42
//!
//! # Print one generated document per collection and exit
//! datagen -f datagen.json --sample
//!
//! # Only rebuild the configured indexes
//! datagen -f datagen.json -i
//! ```
//!
//! Logging is controlled with `RUST_LOG` (default: `info`).

use anyhow::Context;
use clap::Parser;
use datagen::{ingest_collection, sample_document, IngestOptions, MongoOpts, TuningOpts};
use datagen_core::CollectionConfig;
use datagen_mongodb::connect;
use datagen_pipeline::{Cancellation, TripCause};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "datagen")]
#[command(version)]
#[command(about = "Generate random documents and bulk-load them into MongoDB")]
#[command(long_about = None)]
struct Cli {
    /// JSON or YAML file describing the collections to generate
    #[arg(short = 'f', long = "file", value_name = "CONFIGFILE")]
    file: PathBuf,

    /// Server connection options
    #[command(flatten)]
    mongo: MongoOpts,

    /// Only rebuild indexes, leave documents untouched
    #[arg(short = 'i', long = "indexonly")]
    index_only: bool,

    /// Reduce every key to its first two characters
    #[arg(short = 's', long = "shortname")]
    short_names: bool,

    /// Seed for deterministic generation (same seed = same data)
    #[arg(long)]
    seed: Option<u64>,

    /// Print one generated document per collection and exit
    #[arg(long)]
    sample: bool,

    /// Pipeline sizing
    #[command(flatten)]
    tuning: TuningOpts,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let collections = CollectionConfig::from_file(&cli.file)
        .with_context(|| format!("Failed to load collection config {}", cli.file.display()))?;

    let options = IngestOptions {
        index_only: cli.index_only,
        short_names: cli.short_names,
        seed: cli.seed,
        tuning: cli.tuning.tuning(),
    };

    if cli.sample {
        for collection in &collections {
            let sample = sample_document(collection, &options)?;
            println!("// {}", collection.namespace());
            println!("{}", serde_json::to_string_pretty(&sample)?);
        }
        return Ok(());
    }

    let client = connect(&cli.mongo.connection_settings())
        .await
        .context("Failed to connect to MongoDB")?;

    let cancellation = Cancellation::new();
    let on_interrupt = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping once in-flight batches are written");
            on_interrupt.try_trip(TripCause::Interrupted);
        }
    });

    for collection in &collections {
        let report = ingest_collection(&client, collection, &options, &cancellation).await?;
        info!("Done with {}", report.namespace);
    }

    info!("Generated {} collections", collections.len());
    Ok(())
}
