//! Numeric value generators.

use datagen_core::GeneratedValue;
use rand::Rng;

/// Generate a random integer in the given range (inclusive).
pub fn generate_int_range<R: Rng>(rng: &mut R, min: i64, max: i64) -> GeneratedValue {
    let value = rng.gen_range(min..=max);
    // Keep small ranges as 32-bit so the store sees an int, not a long
    match i32::try_from(value) {
        Ok(v) if i32::try_from(min).is_ok() && i32::try_from(max).is_ok() => {
            GeneratedValue::Int32(v)
        }
        _ => GeneratedValue::Int64(value),
    }
}

/// Generate a random float in the given range (inclusive).
pub fn generate_float_range<R: Rng>(rng: &mut R, min: f64, max: f64) -> GeneratedValue {
    GeneratedValue::Float64(rng.gen_range(min..=max))
}

/// Generate a random decimal in the given range.
///
/// The decimal is stored as a string with 2 decimal places.
pub fn generate_decimal_range<R: Rng>(rng: &mut R, min: f64, max: f64) -> GeneratedValue {
    let value = rng.gen_range(min..=max);
    GeneratedValue::Decimal {
        value: format!("{value:.2}"),
        precision: 10,
        scale: 2,
    }
}
