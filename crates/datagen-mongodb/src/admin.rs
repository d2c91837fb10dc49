//! Collection administration: creation, sharding, indexes and stats.

use crate::convert::{json_object_to_bson_doc, json_value_to_bson};
use crate::error::MongoDBDatagenError;
use bson::{doc, Bson, Document};
use datagen_core::{CollectionConfig, IndexConfig, ShardConfig};
use mongodb::Client;
use tracing::{debug, info};

/// Drop the collection and create it again with the configured storage
/// options, then shard it if requested.
pub async fn create_collection(
    client: &Client,
    config: &CollectionConfig,
) -> Result<(), MongoDBDatagenError> {
    if config.shard_config.is_enabled() {
        config.validate_shard_config()?;
    }

    let namespace = config.namespace();
    let database = client.database(&config.database);

    info!("Dropping collection {namespace}");
    if let Err(e) = database.collection::<Document>(&config.name).drop().await {
        debug!("Failed to drop {namespace}, continuing: {e}");
    }

    database
        .run_command(create_command(config))
        .await
        .map_err(|source| MongoDBDatagenError::Command {
            command: "create",
            namespace: namespace.clone(),
            source,
        })?;

    if config.shard_config.is_enabled() {
        shard_collection(client, config).await?;
    }
    Ok(())
}

async fn shard_collection(
    client: &Client,
    config: &CollectionConfig,
) -> Result<(), MongoDBDatagenError> {
    let namespace = config.namespace();
    let shard = &config.shard_config;

    client
        .database(&config.database)
        .run_command(doc! {
            "createIndexes": config.name.as_str(),
            "indexes": [shard_key_index(shard)],
        })
        .await
        .map_err(|source| MongoDBDatagenError::Command {
            command: "createIndexes",
            namespace: namespace.clone(),
            source,
        })?;

    client
        .database("admin")
        .run_command(shard_command(shard))
        .await
        .map_err(|source| MongoDBDatagenError::Command {
            command: "shardCollection",
            namespace: namespace.clone(),
            source,
        })?;

    info!("Sharded {namespace}");
    Ok(())
}

/// Rebuild every configured index. Existing indexes (except `_id`) are
/// dropped first.
pub async fn ensure_indexes(
    client: &Client,
    config: &CollectionConfig,
) -> Result<(), MongoDBDatagenError> {
    let namespace = config.namespace();
    if config.indexes.is_empty() {
        info!("No index to build for {namespace}");
        return Ok(());
    }

    let database = client.database(&config.database);

    info!("Dropping indexes of {namespace}");
    database
        .run_command(doc! { "dropIndexes": config.name.as_str(), "index": "*" })
        .await
        .map_err(|source| MongoDBDatagenError::Command {
            command: "dropIndexes",
            namespace: namespace.clone(),
            source,
        })?;

    info!("Building {} indexes on {namespace}", config.indexes.len());
    let indexes: Vec<Bson> = config
        .indexes
        .iter()
        .map(|index| Bson::Document(index_document(index)))
        .collect();
    database
        .run_command(doc! { "createIndexes": config.name.as_str(), "indexes": indexes })
        .await
        .map_err(|source| MongoDBDatagenError::Command {
            command: "createIndexes",
            namespace: namespace.clone(),
            source,
        })?;

    Ok(())
}

/// Collection statistics in KiB.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionStats {
    pub count: i64,
    pub avg_obj_size: i64,
    pub size_kb: i64,
    pub index_sizes_kb: Vec<(String, i64)>,
}

impl CollectionStats {
    /// Read the interesting fields of a `collStats` reply.
    pub fn from_reply(reply: &Document) -> Self {
        let index_sizes_kb = reply
            .get_document("indexSizes")
            .map(|sizes| {
                sizes
                    .iter()
                    .map(|(name, size)| (name.clone(), bson_number(Some(size))))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            count: bson_number(reply.get("count")),
            avg_obj_size: bson_number(reply.get("avgObjSize")),
            size_kb: bson_number(reply.get("size")),
            index_sizes_kb,
        }
    }
}

/// Fetch and log `collStats` for the collection.
pub async fn collection_stats(
    client: &Client,
    config: &CollectionConfig,
) -> Result<CollectionStats, MongoDBDatagenError> {
    let namespace = config.namespace();
    let reply = client
        .database(&config.database)
        .run_command(doc! { "collStats": config.name.as_str(), "scale": 1024 })
        .await
        .map_err(|source| MongoDBDatagenError::Command {
            command: "collStats",
            namespace: namespace.clone(),
            source,
        })?;

    let stats = CollectionStats::from_reply(&reply);
    info!(
        "{namespace}: {} documents, avg object size {} B, size {} KB",
        stats.count, stats.avg_obj_size, stats.size_kb
    );
    for (name, size) in &stats.index_sizes_kb {
        info!("{namespace}: index {name} {size} KB");
    }
    Ok(stats)
}

fn create_command(config: &CollectionConfig) -> Document {
    let mut command = doc! { "create": config.name.as_str() };
    if let Some(level) = config.compression_level.as_deref().filter(|l| !l.is_empty()) {
        command.insert(
            "storageEngine",
            doc! { "wiredTiger": { "configString": format!("block_compressor={level}") } },
        );
    }
    command
}

fn shard_key_index(shard: &ShardConfig) -> Document {
    doc! {
        "name": "shardKey",
        "key": json_object_to_bson_doc(&shard.key),
    }
}

fn shard_command(shard: &ShardConfig) -> Document {
    let mut command = doc! {
        "shardCollection": shard.shard_collection.as_str(),
        "key": json_object_to_bson_doc(&shard.key),
        "unique": shard.unique,
    };
    if let Some(chunks) = shard.num_initial_chunks {
        command.insert("numInitialChunks", chunks as i64);
    }
    if let Some(collation) = &shard.collation {
        command.insert("collation", json_object_to_bson_doc(collation));
    }
    command
}

fn index_document(index: &IndexConfig) -> Document {
    let mut document = doc! {
        "name": index.name.as_str(),
        "key": json_object_to_bson_doc(&index.key),
    };
    for (option, value) in &index.options {
        document.insert(option.clone(), json_value_to_bson(value));
    }
    document
}

// collStats reports sizes as int32, int64 or double depending on magnitude
fn bson_number(value: Option<&Bson>) -> i64 {
    match value {
        Some(Bson::Int32(i)) => *i as i64,
        Some(Bson::Int64(i)) => *i,
        Some(Bson::Double(f)) => *f as i64,
        _ => 0,
    }
}
