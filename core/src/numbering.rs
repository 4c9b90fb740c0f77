//! Guest number allocation.
//!
//! Numbers are allocated by reading the current maximum and adding one. The
//! read and the insert are separate store round-trips: two concurrent
//! creations can read the same maximum and produce the same number. That
//! race is not guarded against.
//!
//! When the maximum cannot be read, a number is synthesised from the clock
//! instead. Uniqueness on that path is only probabilistic and a fallback
//! value can coincide with a sequenced one.

use crate::constants::{FALLBACK_NUMBER_DIGITS, FIRST_GUEST_NUMBER};
use crate::guest::GuestNumber;
use chrono::{DateTime, Utc};

/// Next number in the sequence given the highest assigned one.
///
/// # Examples
///
/// ```
/// use invitation_core::numbering::next_guest_number;
///
/// assert_eq!(next_guest_number(None).as_str(), "1001");
/// assert_eq!(next_guest_number(Some(1009)).as_str(), "1010");
/// ```
#[must_use]
pub fn next_guest_number(current_max: Option<u64>) -> GuestNumber {
    let next = current_max.map_or(FIRST_GUEST_NUMBER, |max| max.saturating_add(1));
    GuestNumber::from_sequence(next)
}

/// Degraded-mode number: the low-order digits of the millisecond timestamp.
#[must_use]
pub fn fallback_guest_number(now: DateTime<Utc>) -> GuestNumber {
    let modulus = 10_i64.pow(FALLBACK_NUMBER_DIGITS);
    let millis = now.timestamp_millis().rem_euclid(modulus);
    GuestNumber::from_sequence(millis.unsigned_abs())
}

/// Highest numeric guest number in a collection.
///
/// Compares as integers, so `"999"` sorts below `"1001"`. Non-numeric
/// numbers are ignored.
pub fn max_sequence<'a>(numbers: impl IntoIterator<Item = &'a GuestNumber>) -> Option<u64> {
    numbers.into_iter().filter_map(GuestNumber::sequence).max()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;

    #[test]
    fn test_first_number_is_1001() {
        assert_eq!(next_guest_number(None).as_str(), "1001");
    }

    #[test]
    fn test_increments_numerically() {
        assert_eq!(next_guest_number(Some(1001)).as_str(), "1002");
        assert_eq!(next_guest_number(Some(9999)).as_str(), "10000");
    }

    #[test]
    fn test_max_uses_integer_semantics() {
        let numbers = [
            GuestNumber::from_sequence(999),
            GuestNumber::from_sequence(1001),
            GuestNumber::from_sequence(1010),
            GuestNumber::parse("not-a-number").unwrap(),
        ];
        // String sort would pick "999".
        assert_eq!(max_sequence(&numbers), Some(1010));
        assert_eq!(max_sequence(std::iter::empty()), None);
    }

    #[test]
    fn test_fallback_keeps_low_order_digits() {
        let now = DateTime::from_timestamp_millis(1_735_689_600_123).unwrap_or_default();
        assert_eq!(fallback_guest_number(now).as_str(), "600123");
    }

    #[test]
    fn test_fallback_is_bounded() {
        let now = DateTime::from_timestamp_millis(1_735_689_999_999).unwrap_or_default();
        let value = fallback_guest_number(now).sequence().unwrap();
        assert!(value < 1_000_000);
    }
}
