//! Error types for the MongoDB side of datagen.

use datagen_core::ConfigError;
use thiserror::Error;

/// Errors that can occur while talking to MongoDB.
#[derive(Error, Debug)]
pub enum MongoDBDatagenError {
    /// MongoDB connection or command error.
    #[error("MongoDB error: {0}")]
    MongoDB(#[from] mongodb::error::Error),

    /// A batch could not be inserted.
    #[error("insert_many into {namespace} failed: {source}")]
    BulkInsert {
        namespace: String,
        #[source]
        source: mongodb::error::Error,
    },

    /// A command failed on the server side.
    #[error("{command} failed for {namespace}: {source}")]
    Command {
        command: &'static str,
        namespace: String,
        #[source]
        source: mongodb::error::Error,
    },

    /// Invalid collection settings (sharding, names).
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
