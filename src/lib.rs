//! datagen library
//!
//! Generates random documents from a collection config file and loads them
//! into MongoDB as fast as the server accepts them.
//!
//! # Crates
//!
//! - `datagen_core` - collection config and generated value types
//! - `datagen_generator` - document generation from field definitions
//! - `datagen_pipeline` - concurrent batch generation and ingestion
//! - `datagen_mongodb` - MongoDB sink and collection administration
//!
//! # CLI Usage
//!
//! ```bash
//! # Load every collection of the config into a local server
//! datagen -f users.json
//!
//! # Remote server, short keys, reproducible data
//! datagen -f users.yaml --host db.example.com -u admin -p secret -s --seed 42
//!
//! # Rebuild indexes only
//! datagen -f users.json -i
//! ```

use clap::Parser;
use datagen_mongodb::ConnectionSettings;
use datagen_pipeline::config::{
    DEFAULT_BATCH_SIZE, DEFAULT_LOW_VOLUME_THRESHOLD, DEFAULT_QUEUE_DEPTH,
};
use datagen_pipeline::PipelineTuning;

pub mod ingest;
pub mod progress;

pub use ingest::{ingest_collection, sample_document, CollectionReport, IngestOptions};
pub use progress::LogProgress;

#[derive(Parser, Clone, Debug)]
pub struct MongoOpts {
    /// MongoDB host to connect to
    #[arg(long, default_value = "127.0.0.1", env = "MONGODB_HOST")]
    pub host: String,

    /// Server port
    #[arg(long, default_value_t = 27017, env = "MONGODB_PORT")]
    pub port: u16,

    /// Username for authentication
    #[arg(short = 'u', long, env = "MONGODB_USERNAME")]
    pub username: Option<String>,

    /// Password for authentication
    #[arg(short = 'p', long, env = "MONGODB_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

impl MongoOpts {
    pub fn connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            host: self.host.clone(),
            port: self.port,
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

#[derive(Parser, Clone, Debug)]
pub struct TuningOpts {
    /// Documents per batch (one insert_many per batch)
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Number of writer workers (default: available parallelism)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Batches buffered between the generator and the writers
    #[arg(long, default_value_t = DEFAULT_QUEUE_DEPTH)]
    pub queue_depth: usize,

    /// Collections with fewer documents use a single writer and a single buffered batch
    #[arg(long, default_value_t = DEFAULT_LOW_VOLUME_THRESHOLD)]
    pub low_volume_threshold: u64,
}

impl TuningOpts {
    pub fn tuning(&self) -> PipelineTuning {
        PipelineTuning {
            batch_size: self.batch_size,
            queue_depth: self.queue_depth,
            low_volume_threshold: self.low_volume_threshold,
            worker_count: self.workers,
        }
    }
}
