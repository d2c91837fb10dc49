//! Batch sink writing to a MongoDB collection.

use crate::convert::document_to_bson;
use crate::error::MongoDBDatagenError;
use async_trait::async_trait;
use bson::Document;
use datagen_core::{CollectionConfig, GeneratedDocument};
use datagen_pipeline::{Batch, BatchSink};
use mongodb::{Client, Collection};
use tracing::trace;

/// Writes each batch with one unordered `insert_many`.
///
/// Unordered inserts let the server continue past individual failures inside
/// a batch; any failure still fails the whole batch.
#[derive(Clone)]
pub struct MongoSink {
    collection: Collection<Document>,
    namespace: String,
}

impl MongoSink {
    /// Create a sink for the given collection.
    pub fn new(client: &Client, config: &CollectionConfig) -> Self {
        let collection = client
            .database(&config.database)
            .collection::<Document>(&config.name);
        Self {
            collection,
            namespace: config.namespace(),
        }
    }

    /// Full namespace of the target collection.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

#[async_trait]
impl BatchSink for MongoSink {
    type Record = GeneratedDocument;
    type Error = MongoDBDatagenError;

    async fn write(&self, batch: Batch<GeneratedDocument>) -> Result<(), MongoDBDatagenError> {
        if batch.is_empty() {
            return Ok(());
        }

        let documents: Vec<Document> = batch.records().iter().map(document_to_bson).collect();

        self.collection
            .insert_many(documents)
            .ordered(false)
            .await
            .map_err(|source| MongoDBDatagenError::BulkInsert {
                namespace: self.namespace.clone(),
                source,
            })?;

        trace!(
            "Inserted {} documents at offset {} into {}",
            batch.len(),
            batch.offset(),
            self.namespace
        );
        Ok(())
    }
}
