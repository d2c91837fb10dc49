//! Document generator for the datagen bulk loader.
//!
//! This crate provides the `DataGenerator` which produces documents from a
//! collection's field list. Randomness comes from a caller-supplied RNG, so
//! runs with the same seed and config produce the same documents.
//!
//! `DataGenerator` implements [`datagen_pipeline::BatchGenerator`] with a
//! [`rand::rngs::StdRng`] source and plugs straight into the ingestion
//! pipeline.
//!
//! # Example
//!
//! ```rust
//! use datagen_core::{FieldConfig, GeneratorConfig};
//! use datagen_generator::DataGenerator;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut generator = DataGenerator::new(vec![FieldConfig::new(
//!     "email",
//!     GeneratorConfig::Pattern { pattern: "user_{index}@example.com".to_string() },
//! )]);
//! let mut rng = StdRng::seed_from_u64(42);
//!
//! let docs = generator.documents(3, &mut rng).unwrap();
//! assert_eq!(docs[2].get_field("email").and_then(|v| v.as_str()), Some("user_2@example.com"));
//! ```
//!
//! # Generators
//!
//! - `uuid_v4` - Random UUID v4
//! - `sequential` - Sequential integers
//! - `pattern` - Pattern strings with placeholders (`{index}`, `{uuid}`, `{rand:N}`)
//! - `int_range` / `float_range` / `decimal_range` - Random numbers in a range
//! - `timestamp_range` / `timestamp_now` - Timestamps
//! - `weighted_bool` - Boolean with configurable true probability
//! - `one_of` - Random selection from a list
//! - `sample_array` - Array of random samples from a pool
//! - `object` - Nested document
//! - `static` - Static value
//! - `null` - Null value

pub mod generator;
pub mod generators;

// Re-exports for convenience
pub use generator::{DataGenerator, GeneratorError};
pub use generators::KeyStyle;
