//! Core types for the datagen bulk loader.
//!
//! This crate provides the foundational types shared by the generator,
//! the ingestion pipeline and the MongoDB sink:
//!
//! - [`CollectionConfig`] - One collection to generate, loaded from a JSON or YAML file
//! - [`FieldConfig`] / [`GeneratorConfig`] - Per-field generation rules
//! - [`GeneratedValue`] - Raw generated values before BSON conversion
//! - [`GeneratedDocument`] - One generated record with its fields in declaration order
//!
//! # Architecture
//!
//! ```text
//! datagen-core (this crate)
//!    │
//!    ├─── datagen-generator  (turns FieldConfig into GeneratedDocument batches)
//!    │
//!    └─── datagen-mongodb    (turns GeneratedDocument into BSON documents)
//! ```
//!
//! # Example
//!
//! ```rust
//! use datagen_core::CollectionConfig;
//!
//! let collections = CollectionConfig::from_json(r#"[{
//!     "database": "test",
//!     "name": "users",
//!     "count": 2500,
//!     "fields": [
//!         {"name": "email", "generator": {"type": "pattern", "pattern": "user_{index}@example.com"}}
//!     ]
//! }]"#).unwrap();
//!
//! assert_eq!(collections[0].namespace(), "test.users");
//! ```

pub mod config;
pub mod values;

// Re-exports for convenience
pub use config::{
    CollectionConfig, ConfigError, FieldConfig, GeneratorConfig, IndexConfig, ShardConfig,
};
pub use values::{GeneratedDocument, GeneratedValue};
