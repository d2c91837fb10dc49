//! Array value generators.

use super::static_value::json_to_generated_value;
use datagen_core::GeneratedValue;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;

/// Generate an array by sampling from a pool of values (with repetition).
pub fn generate_sample_array<R: Rng>(
    rng: &mut R,
    pool: &[Value],
    min_length: usize,
    max_length: usize,
) -> GeneratedValue {
    if pool.is_empty() || max_length == 0 {
        return GeneratedValue::Array(vec![]);
    }

    let length = rng.gen_range(min_length..=max_length);
    let mut items = Vec::with_capacity(length);
    for _ in 0..length {
        if let Some(item) = pool.choose(&mut *rng) {
            items.push(json_to_generated_value(item));
        }
    }

    GeneratedValue::Array(items)
}
