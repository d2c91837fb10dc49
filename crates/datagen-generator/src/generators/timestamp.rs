//! Timestamp value generators.

use chrono::{DateTime, Utc};
use datagen_core::GeneratedValue;
use rand::Rng;

use crate::generator::GeneratorError;

/// Generate the current UTC timestamp.
///
/// This is NOT deterministic - each call returns the current time.
pub fn generate_timestamp_now() -> GeneratedValue {
    GeneratedValue::DateTime(Utc::now())
}

/// Generate a random timestamp in the given range.
///
/// Bounds are RFC 3339 timestamps or plain `YYYY-MM-DD` dates. A range whose
/// start is not before its end always yields the start.
pub fn generate_timestamp_range<R: Rng>(
    rng: &mut R,
    start: &str,
    end: &str,
) -> Result<GeneratedValue, GeneratorError> {
    let start_dt = parse_timestamp(start)?;
    let end_dt = parse_timestamp(end)?;

    let start_ts = start_dt.timestamp();
    let end_ts = end_dt.timestamp();
    if start_ts >= end_ts {
        return Ok(GeneratedValue::DateTime(start_dt));
    }

    let random_ts = rng.gen_range(start_ts..=end_ts);
    let dt = DateTime::from_timestamp(random_ts, 0).unwrap_or(start_dt);
    Ok(GeneratedValue::DateTime(dt))
}

/// Parse a timestamp string in the supported formats.
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, GeneratorError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| GeneratorError::InvalidTimestamp(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_timestamp_range() {
        let mut rng = StdRng::seed_from_u64(42);

        let value =
            generate_timestamp_range(&mut rng, "2020-01-01T00:00:00Z", "2024-12-31T23:59:59Z")
                .unwrap();

        if let GeneratedValue::DateTime(dt) = value {
            assert!(dt.year() >= 2020 && dt.year() <= 2024);
        } else {
            panic!("Expected DateTime value");
        }
    }

    #[test]
    fn test_generate_timestamp_with_dates_only() {
        let mut rng = StdRng::seed_from_u64(42);

        let value = generate_timestamp_range(&mut rng, "2020-01-01", "2024-12-31").unwrap();

        if let GeneratedValue::DateTime(dt) = value {
            assert!(dt.year() >= 2020 && dt.year() <= 2024);
        } else {
            panic!("Expected DateTime value");
        }
    }

    #[test]
    fn test_reversed_range_yields_start() {
        let mut rng = StdRng::seed_from_u64(42);
        let value = generate_timestamp_range(&mut rng, "2024-01-01", "2020-01-01").unwrap();
        assert_eq!(
            value,
            GeneratedValue::DateTime(parse_timestamp("2024-01-01").unwrap())
        );
    }

    #[test]
    fn test_invalid_timestamp() {
        let mut rng = StdRng::seed_from_u64(42);
        let result = generate_timestamp_range(&mut rng, "yesterday", "2020-01-01");
        assert!(matches!(result, Err(GeneratorError::InvalidTimestamp(s)) if s == "yesterday"));
    }

    #[test]
    fn test_deterministic_generation() {
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);

        let value1 =
            generate_timestamp_range(&mut rng1, "2020-01-01T00:00:00Z", "2024-12-31T23:59:59Z")
                .unwrap();
        let value2 =
            generate_timestamp_range(&mut rng2, "2020-01-01T00:00:00Z", "2024-12-31T23:59:59Z")
                .unwrap();

        assert_eq!(value1, value2);
    }
}
