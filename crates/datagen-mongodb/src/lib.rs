//! MongoDB side of datagen.
//!
//! - [`MongoSink`] writes pipeline batches with unordered bulk inserts.
//! - [`admin`] drops, creates and shards collections, rebuilds indexes and
//!   reads collection stats.
//! - [`connection`] builds the client from host, port and credentials.

pub mod admin;
pub mod connection;
pub mod convert;
pub mod error;
pub mod sink;

pub use admin::{collection_stats, create_collection, ensure_indexes, CollectionStats};
pub use connection::{connect, ConnectionSettings};
pub use error::MongoDBDatagenError;
pub use sink::MongoSink;
