//! Interval overlap and calendar sweeps.
//!
//! All rental intervals are half-open `[starts_at, ends_at)`. A rental
//! ending exactly at midnight therefore does not occupy the day it ends on.

use jiff::{Timestamp, civil::Date, tz::TimeZone};
use rustc_hash::FxHashSet;
use uuid::Uuid;

use crate::domain::availability::{errors::AvailabilityServiceError, records::BookedRange};

/// Longest calendar window that will be swept, in days.
pub const MAX_WINDOW_DAYS: u32 = 366;

/// Two half-open intervals overlap iff each starts before the other ends.
#[must_use]
pub fn ranges_overlap(
    a_start: Timestamp,
    a_end: Timestamp,
    b_start: Timestamp,
    b_end: Timestamp,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Count the units booked over `[from, until)`.
///
/// Assigned details are deduplicated by unit: one unit booked twice within
/// the interval is still one busy unit. Unassigned cart details each hold
/// one unit of demand.
#[must_use]
pub fn count_booked_units(booked: &[BookedRange], from: Timestamp, until: Timestamp) -> u64 {
    let mut assigned: FxHashSet<Uuid> = FxHashSet::default();
    let mut unassigned: u64 = 0;

    for range in booked {
        if !ranges_overlap(range.starts_at, range.ends_at, from, until) {
            continue;
        }

        match range.unit_uuid {
            Some(unit) => {
                assigned.insert(unit);
            }
            None => unassigned += 1,
        }
    }

    assigned.len() as u64 + unassigned
}

/// The civil dates within `[start, end]` (inclusive) on which fewer than
/// `quantity` units remain free for the whole day.
///
/// Days are UTC midnights. One range query fetches the booked intervals;
/// the sweep itself is pure arithmetic.
///
/// # Errors
///
/// Returns `InvalidRange` when `end` precedes `start` and `WindowTooLong`
/// past [`MAX_WINDOW_DAYS`].
pub fn disabled_dates_in_window(
    start: Date,
    end: Date,
    pool: u64,
    quantity: u64,
    booked: &[BookedRange],
) -> Result<Vec<Date>, AvailabilityServiceError> {
    if end < start {
        return Err(AvailabilityServiceError::InvalidRange);
    }

    let mut disabled = Vec::new();
    let mut date = start;
    let mut day_start = midnight_utc(date)?;
    let mut swept: u32 = 0;

    while date <= end {
        swept += 1;

        if swept > MAX_WINDOW_DAYS {
            return Err(AvailabilityServiceError::WindowTooLong);
        }

        let next_date = date
            .tomorrow()
            .map_err(|_| AvailabilityServiceError::InvalidRange)?;

        let day_end = midnight_utc(next_date)?;

        let booked_today = count_booked_units(booked, day_start, day_end);

        if pool.saturating_sub(booked_today) < quantity {
            disabled.push(date);
        }

        date = next_date;
        day_start = day_end;
    }

    Ok(disabled)
}

/// UTC midnight at the start of the given civil date.
pub(crate) fn midnight_utc(date: Date) -> Result<Timestamp, AvailabilityServiceError> {
    // Midnight always resolves in UTC; the error arm covers the edges of
    // the representable date range.
    date.to_zoned(TimeZone::UTC)
        .map(|zoned| zoned.timestamp())
        .map_err(|_| AvailabilityServiceError::InvalidRange)
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    fn ts(s: &str) -> Timestamp {
        s.parse().expect("timestamp literal")
    }

    fn range(unit: Option<u8>, starts_at: &str, ends_at: &str) -> BookedRange {
        BookedRange {
            unit_uuid: unit.map(|n| Uuid::from_u128(u128::from(n))),
            starts_at: ts(starts_at),
            ends_at: ts(ends_at),
        }
    }

    #[test]
    fn disjoint_ranges_do_not_overlap() {
        assert!(!ranges_overlap(
            ts("2025-06-01T00:00:00Z"),
            ts("2025-06-02T00:00:00Z"),
            ts("2025-06-03T00:00:00Z"),
            ts("2025-06-04T00:00:00Z"),
        ));
    }

    #[test]
    fn touching_ranges_do_not_overlap() {
        assert!(!ranges_overlap(
            ts("2025-06-01T00:00:00Z"),
            ts("2025-06-02T00:00:00Z"),
            ts("2025-06-02T00:00:00Z"),
            ts("2025-06-03T00:00:00Z"),
        ));
    }

    #[test]
    fn partial_and_contained_ranges_overlap() {
        assert!(ranges_overlap(
            ts("2025-06-01T00:00:00Z"),
            ts("2025-06-03T00:00:00Z"),
            ts("2025-06-02T00:00:00Z"),
            ts("2025-06-04T00:00:00Z"),
        ));

        assert!(ranges_overlap(
            ts("2025-06-01T00:00:00Z"),
            ts("2025-06-10T00:00:00Z"),
            ts("2025-06-04T00:00:00Z"),
            ts("2025-06-05T00:00:00Z"),
        ));
    }

    #[test]
    fn no_demand_leaves_every_date_enabled() {
        let disabled = disabled_dates_in_window(
            date(2025, 6, 1),
            date(2025, 6, 7),
            2,
            1,
            &[],
        )
        .expect("sweep should succeed");

        assert!(disabled.is_empty());
    }

    #[test]
    fn fully_booked_days_are_disabled() {
        let booked = [
            range(Some(1), "2025-06-02T10:00:00Z", "2025-06-04T10:00:00Z"),
            range(Some(2), "2025-06-02T12:00:00Z", "2025-06-03T12:00:00Z"),
        ];

        let disabled = disabled_dates_in_window(
            date(2025, 6, 1),
            date(2025, 6, 5),
            2,
            1,
            &booked,
        )
        .expect("sweep should succeed");

        // Both units are held on the 2nd and 3rd; one remains on the 4th.
        assert_eq!(disabled, [date(2025, 6, 2), date(2025, 6, 3)]);
    }

    #[test]
    fn range_ending_at_midnight_frees_its_end_date() {
        let booked = [range(Some(1), "2025-06-02T00:00:00Z", "2025-06-04T00:00:00Z")];

        let disabled = disabled_dates_in_window(
            date(2025, 6, 1),
            date(2025, 6, 5),
            1,
            1,
            &booked,
        )
        .expect("sweep should succeed");

        assert_eq!(disabled, [date(2025, 6, 2), date(2025, 6, 3)]);
    }

    #[test]
    fn same_unit_booked_twice_in_a_day_counts_once() {
        let booked = [
            range(Some(1), "2025-06-02T09:00:00Z", "2025-06-02T11:00:00Z"),
            range(Some(1), "2025-06-02T14:00:00Z", "2025-06-02T16:00:00Z"),
        ];

        let need_one = disabled_dates_in_window(date(2025, 6, 2), date(2025, 6, 2), 2, 1, &booked)
            .expect("sweep should succeed");

        let need_two = disabled_dates_in_window(date(2025, 6, 2), date(2025, 6, 2), 2, 2, &booked)
            .expect("sweep should succeed");

        assert!(need_one.is_empty(), "one unit is still free");
        assert_eq!(need_two, [date(2025, 6, 2)]);
    }

    #[test]
    fn unassigned_demand_rows_each_hold_a_unit() {
        let booked = [
            range(None, "2025-06-02T00:00:00Z", "2025-06-03T00:00:00Z"),
            range(None, "2025-06-02T00:00:00Z", "2025-06-03T00:00:00Z"),
        ];

        let disabled = disabled_dates_in_window(date(2025, 6, 2), date(2025, 6, 2), 2, 1, &booked)
            .expect("sweep should succeed");

        assert_eq!(disabled, [date(2025, 6, 2)]);
    }

    #[test]
    fn end_before_start_returns_invalid_range() {
        let result = disabled_dates_in_window(date(2025, 6, 5), date(2025, 6, 1), 1, 1, &[]);

        assert!(matches!(result, Err(AvailabilityServiceError::InvalidRange)));
    }

    #[test]
    fn oversized_window_returns_window_too_long() {
        let result = disabled_dates_in_window(date(2025, 1, 1), date(2027, 1, 1), 1, 1, &[]);

        assert!(matches!(
            result,
            Err(AvailabilityServiceError::WindowTooLong)
        ));
    }
}
