//! Collection configuration loaded from JSON or YAML files.
//!
//! A config file is a list of collections. Each collection names its
//! database, the number of documents to generate, the generation rules for
//! every field and the optional storage settings applied before and after
//! ingestion (compression, sharding, indexes).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error reading config file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing JSON
    #[error("Error in config file, object / array / date badly formatted: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Collection or database name missing
    #[error("collection name and database name can't be empty")]
    MissingName,

    /// Document count of zero
    #[error("for collection {0}, count has to be > 0")]
    ZeroCount(String),

    /// Field-level problem
    #[error("invalid field '{field}' in collection {collection}: {reason}")]
    InvalidField {
        collection: String,
        field: String,
        reason: String,
    },

    /// Sharding settings do not match the collection
    #[error("wrong value for 'shardConfig.{key}': {reason}")]
    InvalidShardConfig { key: &'static str, reason: String },
}

// ============================================================================
// Generator Types
// ============================================================================

/// Generator configuration for a field.
///
/// This enum defines the different types of value generators available
/// for producing documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeneratorConfig {
    /// Generate UUIDs (v4)
    UuidV4,

    /// Generate sequential integers
    Sequential {
        /// Starting value
        #[serde(default)]
        start: i64,
    },

    /// Generate values using a pattern with placeholders
    Pattern {
        /// Pattern string (supports {index}, {uuid}, {rand:N})
        pattern: String,
    },

    /// Generate random integers in a range
    IntRange {
        /// Minimum value (inclusive)
        min: i64,
        /// Maximum value (inclusive)
        max: i64,
    },

    /// Generate random floats in a range
    FloatRange {
        /// Minimum value (inclusive)
        min: f64,
        /// Maximum value (inclusive)
        max: f64,
    },

    /// Generate random decimals in a range
    DecimalRange {
        /// Minimum value (inclusive)
        min: f64,
        /// Maximum value (inclusive)
        max: f64,
    },

    /// Generate timestamps in a range
    TimestampRange {
        /// Start timestamp (RFC 3339 or YYYY-MM-DD)
        start: String,
        /// End timestamp (RFC 3339 or YYYY-MM-DD)
        end: String,
    },

    /// Generate current timestamp at generation time.
    ///
    /// Not deterministic: each generation produces a different value.
    TimestampNow,

    /// Generate weighted boolean values
    WeightedBool {
        /// Weight for true value (0.0 to 1.0)
        true_weight: f64,
    },

    /// Generate random selection from a pool of values
    OneOf {
        /// Pool of values to select from
        values: Vec<Value>,
    },

    /// Generate arrays by sampling from a pool
    SampleArray {
        /// Pool of values to sample from
        pool: Vec<Value>,
        /// Minimum array length
        #[serde(default)]
        min_length: usize,
        /// Maximum array length
        max_length: usize,
    },

    /// Generate a nested object from its own field list
    Object {
        /// Nested field definitions
        fields: Vec<FieldConfig>,
    },

    /// Generate a static value
    Static {
        /// The static value to use
        value: Value,
    },

    /// Generate null values
    Null,
}

/// A named field with its generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Field name
    pub name: String,

    /// Generator configuration for this field
    pub generator: GeneratorConfig,

    /// Percentage (0 to 100) of documents where this field is null
    #[serde(default)]
    pub null_percentage: u8,
}

impl FieldConfig {
    /// Create a field that is never null.
    pub fn new(name: impl Into<String>, generator: GeneratorConfig) -> Self {
        Self {
            name: name.into(),
            generator,
            null_percentage: 0,
        }
    }

    fn validate(&self, collection: &str) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidField {
            collection: collection.to_string(),
            field: self.name.clone(),
            reason,
        };

        if self.name.is_empty() {
            return Err(invalid("field name can't be empty".to_string()));
        }
        if self.null_percentage > 100 {
            return Err(invalid(format!(
                "null_percentage has to be between 0 and 100, found {}",
                self.null_percentage
            )));
        }

        match &self.generator {
            GeneratorConfig::IntRange { min, max } if min > max => {
                Err(invalid(format!("min ({min}) is greater than max ({max})")))
            }
            GeneratorConfig::FloatRange { min, max } | GeneratorConfig::DecimalRange { min, max }
                if !min.is_finite() || !max.is_finite() || !(max - min).is_finite() =>
            {
                Err(invalid(format!(
                    "min and max have to be finite with a finite span, found {min} and {max}"
                )))
            }
            GeneratorConfig::FloatRange { min, max } | GeneratorConfig::DecimalRange { min, max }
                if min > max =>
            {
                Err(invalid(format!("min ({min}) is greater than max ({max})")))
            }
            GeneratorConfig::WeightedBool { true_weight }
                if !(0.0..=1.0).contains(true_weight) =>
            {
                Err(invalid(format!(
                    "true_weight has to be between 0.0 and 1.0, found {true_weight}"
                )))
            }
            GeneratorConfig::SampleArray {
                min_length,
                max_length,
                ..
            } if min_length > max_length => Err(invalid(format!(
                "min_length ({min_length}) is greater than max_length ({max_length})"
            ))),
            GeneratorConfig::Object { fields } => fields
                .iter()
                .try_for_each(|f| f.validate(collection)),
            _ => Ok(()),
        }
    }
}

// ============================================================================
// Storage Settings
// ============================================================================

/// Index to build after ingestion.
///
/// `name` and `key` are required; every other option (`unique`, `sparse`,
/// `expireAfterSeconds`, `partialFilterExpression`, `collation`, ...) is
/// passed through to the `createIndexes` command unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Index name
    pub name: String,

    /// Index key specification, in declaration order
    pub key: Map<String, Value>,

    /// Additional index options
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

/// Sharding information for a sharded collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShardConfig {
    /// Full namespace to shard, `<database>.<collection>`
    #[serde(default)]
    pub shard_collection: String,

    /// Shard key specification
    #[serde(default)]
    pub key: Map<String, Value>,

    /// Whether the shard key is unique
    #[serde(default)]
    pub unique: bool,

    /// Number of chunks to create initially for a hashed shard key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_initial_chunks: Option<u32>,

    /// Collation for the shard key index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collation: Option<Map<String, Value>>,
}

impl ShardConfig {
    /// Whether the collection has to be sharded.
    pub fn is_enabled(&self) -> bool {
        !self.shard_collection.is_empty()
    }
}

// ============================================================================
// Collection
// ============================================================================

/// One collection to generate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionConfig {
    /// Database to use
    pub database: String,

    /// Collection name in the database
    pub name: String,

    /// Number of documents to insert in the collection
    pub count: u64,

    /// Field definitions, in document order
    #[serde(default)]
    pub fields: Vec<FieldConfig>,

    /// WiredTiger block compressor (none|snappy|zlib|zstd)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression_level: Option<String>,

    /// Indexes to build after ingestion
    #[serde(default)]
    pub indexes: Vec<IndexConfig>,

    /// Sharding information
    #[serde(default)]
    pub shard_config: ShardConfig,
}

impl CollectionConfig {
    /// Load collections from a file. Files ending in `.yaml` or `.yml` are
    /// parsed as YAML, everything else as JSON.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Vec<Self>, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            _ => Self::from_json(&content),
        }
    }

    /// Parse and validate collections from a JSON string.
    pub fn from_json(json: &str) -> Result<Vec<Self>, ConfigError> {
        let collections: Vec<Self> = serde_json::from_str(json)?;
        Self::validate_all(collections)
    }

    /// Parse and validate collections from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Vec<Self>, ConfigError> {
        let collections: Vec<Self> = serde_yaml::from_str(yaml)?;
        Self::validate_all(collections)
    }

    fn validate_all(collections: Vec<Self>) -> Result<Vec<Self>, ConfigError> {
        for collection in &collections {
            collection.validate()?;
        }
        Ok(collections)
    }

    /// Check names, count and field definitions.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() || self.database.is_empty() {
            return Err(ConfigError::MissingName);
        }
        if self.count == 0 {
            return Err(ConfigError::ZeroCount(self.name.clone()));
        }
        self.fields.iter().try_for_each(|f| f.validate(&self.name))
    }

    /// Full namespace, `<database>.<collection>`.
    pub fn namespace(&self) -> String {
        format!("{}.{}", self.database, self.name)
    }

    /// Check that the sharding settings target this collection and carry a key.
    pub fn validate_shard_config(&self) -> Result<(), ConfigError> {
        let expected = self.namespace();
        if self.shard_config.shard_collection != expected {
            return Err(ConfigError::InvalidShardConfig {
                key: "shardCollection",
                reason: format!(
                    "should be <database>.<collection>: found {}, expected {expected}",
                    self.shard_config.shard_collection
                ),
            });
        }
        if self.shard_config.key.is_empty() {
            return Err(ConfigError::InvalidShardConfig {
                key: "key",
                reason: "can't be null and must be an object like {'_id': 'hashed'}".to_string(),
            });
        }
        Ok(())
    }
}
