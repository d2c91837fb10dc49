//! Per-collection orchestration: create, ingest, index, report.

use crate::progress::LogProgress;
use anyhow::Context;
use datagen_core::CollectionConfig;
use datagen_generator::DataGenerator;
use datagen_mongodb::{
    collection_stats, create_collection, ensure_indexes, CollectionStats, MongoSink,
};
use datagen_pipeline::{Cancellation, Pipeline, PipelineConfig, PipelineMetrics, PipelineTuning};
use mongodb::Client;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::info;

/// Options shared by every collection of a run.
#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    /// Only rebuild indexes, leave documents untouched.
    pub index_only: bool,
    /// Reduce every key to its first two characters.
    pub short_names: bool,
    /// Seed for deterministic generation; random when unset.
    pub seed: Option<u64>,
    /// Pipeline sizing.
    pub tuning: PipelineTuning,
}

/// Outcome of one collection.
#[derive(Debug, Clone)]
pub struct CollectionReport {
    pub namespace: String,
    /// `None` in index-only mode.
    pub metrics: Option<PipelineMetrics>,
    pub stats: CollectionStats,
}

/// Build the random source for a collection.
pub fn random_source(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Build the generator for a collection, applying short names if requested.
pub fn build_generator(
    collection: &CollectionConfig,
    short_names: bool,
) -> anyhow::Result<DataGenerator> {
    DataGenerator::for_collection(collection)
        .with_short_names(short_names)
        .with_context(|| format!("Invalid field names in {}", collection.namespace()))
}

/// Generate one document and render it as JSON.
pub fn sample_document(
    collection: &CollectionConfig,
    options: &IngestOptions,
) -> anyhow::Result<serde_json::Value> {
    let mut generator = build_generator(collection, options.short_names)?;
    let mut rng = random_source(options.seed);
    let document = generator
        .next_document(&mut rng)
        .with_context(|| format!("Failed to generate a sample for {}", collection.namespace()))?;
    Ok(document.to_json())
}

/// Run every step for one collection.
///
/// Unless `index_only` is set the collection is recreated and filled through
/// the pipeline. Indexes are rebuilt and stats are read in both modes.
pub async fn ingest_collection(
    client: &Client,
    collection: &CollectionConfig,
    options: &IngestOptions,
    cancellation: &Cancellation,
) -> anyhow::Result<CollectionReport> {
    let namespace = collection.namespace();
    let mut metrics = None;

    if !options.index_only {
        // Fail on bad field names before touching the server
        let mut generator = build_generator(collection, options.short_names)?;

        create_collection(client, collection)
            .await
            .with_context(|| format!("Failed to create collection {namespace}"))?;

        let config = PipelineConfig::for_target(collection.count, &options.tuning);
        let pipeline = Pipeline::new(config).with_cancellation(cancellation.clone());
        let sink = Arc::new(MongoSink::new(client, collection));
        let mut rng = random_source(options.seed);
        let mut progress = LogProgress::new(namespace.clone(), collection.count);

        let run = pipeline
            .run(&mut generator, &mut rng, sink, &mut progress)
            .await
            .with_context(|| format!("Failed to ingest documents into {namespace}"))?;

        info!(
            "{namespace}: {} documents written in {} batches ({:.0} docs/sec, {:.2}s generating)",
            run.records_written,
            run.batch_count,
            run.records_per_second(),
            run.generation_duration.as_secs_f64()
        );
        metrics = Some(run);
    }

    ensure_indexes(client, collection)
        .await
        .with_context(|| format!("Failed to build indexes on {namespace}"))?;

    let stats = collection_stats(client, collection)
        .await
        .with_context(|| format!("Failed to read stats of {namespace}"))?;

    Ok(CollectionReport {
        namespace,
        metrics,
        stats,
    })
}
