//! Individual value generators for different data types.
//!
//! This module provides the generation logic for each type of value
//! based on the generator configuration from the collection config.

pub mod array;
pub mod numeric;
pub mod pattern;
pub mod static_value;
pub mod timestamp;
pub mod uuid;

use crate::generator::GeneratorError;
use datagen_core::{FieldConfig, GeneratedValue, GeneratorConfig};
use rand::Rng;

/// Generate a value based on the generator configuration.
///
/// Nested objects reuse `keys` so that short names apply at every depth.
pub fn generate_value<R: Rng>(
    config: &GeneratorConfig,
    rng: &mut R,
    index: u64,
    keys: &KeyStyle,
) -> Result<GeneratedValue, GeneratorError> {
    let value = match config {
        GeneratorConfig::UuidV4 => uuid::generate_uuid_v4(rng),

        GeneratorConfig::Sequential { start } => {
            GeneratedValue::Int64(start.wrapping_add(index as i64))
        }

        GeneratorConfig::Pattern { pattern } => pattern::generate_pattern(pattern, rng, index),

        GeneratorConfig::IntRange { min, max } => numeric::generate_int_range(rng, *min, *max),

        GeneratorConfig::FloatRange { min, max } => numeric::generate_float_range(rng, *min, *max),

        GeneratorConfig::DecimalRange { min, max } => {
            numeric::generate_decimal_range(rng, *min, *max)
        }

        GeneratorConfig::TimestampRange { start, end } => {
            timestamp::generate_timestamp_range(rng, start, end)?
        }

        GeneratorConfig::TimestampNow => timestamp::generate_timestamp_now(),

        GeneratorConfig::WeightedBool { true_weight } => {
            GeneratedValue::Bool(rng.gen_bool(*true_weight))
        }

        GeneratorConfig::OneOf { values } => {
            if values.is_empty() {
                GeneratedValue::Null
            } else {
                let idx = rng.gen_range(0..values.len());
                static_value::json_to_generated_value(&values[idx])
            }
        }

        GeneratorConfig::SampleArray {
            pool,
            min_length,
            max_length,
        } => array::generate_sample_array(rng, pool, *min_length, *max_length),

        GeneratorConfig::Object { fields } => {
            GeneratedValue::Object(generate_fields(fields, rng, index, keys)?)
        }

        GeneratorConfig::Static { value } => static_value::json_to_generated_value(value),

        GeneratorConfig::Null => GeneratedValue::Null,
    };
    Ok(value)
}

/// Generate every field of a field list, applying null percentages.
pub fn generate_fields<R: Rng>(
    fields: &[FieldConfig],
    rng: &mut R,
    index: u64,
    keys: &KeyStyle,
) -> Result<Vec<(String, GeneratedValue)>, GeneratorError> {
    fields
        .iter()
        .map(|field| {
            let value = if field.null_percentage > 0
                && rng.gen_range(0..100u8) < field.null_percentage
            {
                GeneratedValue::Null
            } else {
                generate_value(&field.generator, rng, index, keys)?
            };
            Ok((keys.key(&field.name), value))
        })
        .collect()
}

/// How field names are written into generated documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyStyle {
    /// Keep names as configured.
    #[default]
    Full,
    /// Keep only the first two characters (`name` becomes `na`).
    Short,
}

impl KeyStyle {
    /// Apply the style to a field name.
    pub fn key(&self, name: &str) -> String {
        match self {
            Self::Full => name.to_string(),
            Self::Short => name.chars().take(2).collect(),
        }
    }
}
