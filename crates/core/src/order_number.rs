//! Human-facing order numbers of the form `JR-<year>-<NNNNN>`.

use chrono::Datelike;
use rand::Rng;

use crate::types::Timestamp;

pub const ORDER_NUMBER_PREFIX: &str = "JR";

/// Exclusive upper bound of the random suffix.
pub const ORDER_SUFFIX_BOUND: u32 = 99_999;

/// Attempts made before giving up on finding an unused number.
pub const MAX_ORDER_NUMBER_ATTEMPTS: usize = 8;

pub fn format_order_number(year: i32, suffix: u32) -> String {
    format!("{ORDER_NUMBER_PREFIX}-{year}-{suffix:05}")
}

/// Generate a number for an order placed at `now`, using `rng` for the suffix.
pub fn generate_order_number_with<R: Rng + ?Sized>(rng: &mut R, now: Timestamp) -> String {
    let suffix = rng.random_range(0..ORDER_SUFFIX_BOUND);
    format_order_number(now.year(), suffix)
}

pub fn generate_order_number(now: Timestamp) -> String {
    generate_order_number_with(&mut rand::rng(), now)
}

/// Split an order number into `(year, suffix)` if it is well formed.
pub fn parse_order_number(value: &str) -> Option<(i32, u32)> {
    let mut parts = value.splitn(3, '-');
    if parts.next()? != ORDER_NUMBER_PREFIX {
        return None;
    }
    let year = parts.next()?;
    let suffix = parts.next()?;
    if year.len() != 4 || suffix.len() != 5 {
        return None;
    }
    if !year.bytes().chain(suffix.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((year.parse().ok()?, suffix.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn suffix_is_zero_padded() {
        assert_eq!(format_order_number(2024, 42), "JR-2024-00042");
        assert_eq!(format_order_number(2025, 0), "JR-2025-00000");
        assert_eq!(format_order_number(2025, 99_998), "JR-2025-99998");
    }

    #[test]
    fn generated_numbers_parse_back() {
        let now = chrono::Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        for _ in 0..200 {
            let number = generate_order_number(now);
            let (year, suffix) = parse_order_number(&number).unwrap();
            assert_eq!(year, 2024);
            assert!(suffix < ORDER_SUFFIX_BOUND);
        }
    }

    #[test]
    fn malformed_numbers_rejected() {
        assert!(parse_order_number("JR-2024-123").is_none());
        assert!(parse_order_number("XX-2024-00001").is_none());
        assert!(parse_order_number("JR-24-00001").is_none());
        assert!(parse_order_number("JR-2024-0000a").is_none());
    }
}
