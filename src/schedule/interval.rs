//! Date-range comparison helpers.
//!
//! Every comparison here works on whole days. Timestamps coming from the
//! ledger are normalized to their calendar day first; the only exception is
//! [`apply_hour_offset`], which shifts a timestamp that carries an explicit
//! hour-of-day before it is normalized.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Returns the far-future end date marking an assignment as still active.
///
/// # Example
///
/// ```
/// use leave_engine::schedule::interval::open_end;
/// use chrono::NaiveDate;
///
/// assert_eq!(open_end(), NaiveDate::from_ymd_opt(9999, 12, 30).unwrap());
/// ```
pub fn open_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(9999, 12, 30).unwrap_or(NaiveDate::MAX)
}

/// Returns 1970-01-01, the default rotation anchor.
pub fn epoch() -> NaiveDate {
    NaiveDate::default()
}

/// Checks whether two inclusive ranges share at least one day.
///
/// # Example
///
/// ```
/// use leave_engine::schedule::interval::overlaps;
/// use chrono::NaiveDate;
///
/// let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
/// assert!(overlaps(d(1), d(5), d(5), d(9)));
/// assert!(!overlaps(d(1), d(4), d(5), d(9)));
/// ```
pub fn overlaps(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start <= b_end && b_start <= a_end
}

/// Checks whether `date` lies in `[start, end]`.
pub fn contains(start: NaiveDate, end: NaiveDate, date: NaiveDate) -> bool {
    start <= date && date <= end
}

/// Checks whether `date` lies in `[start, end)`.
pub fn contains_half_open(start: NaiveDate, end: NaiveDate, date: NaiveDate) -> bool {
    start <= date && date < end
}

/// Returns the Sunday and Saturday bounding the week that contains `date`.
///
/// # Example
///
/// ```
/// use leave_engine::schedule::interval::week_bounds;
/// use chrono::NaiveDate;
///
/// // 2024-03-06 is a Wednesday
/// let (sunday, saturday) = week_bounds(NaiveDate::from_ymd_opt(2024, 3, 6).unwrap());
/// assert_eq!(sunday, NaiveDate::from_ymd_opt(2024, 3, 3).unwrap());
/// assert_eq!(saturday, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
/// ```
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let back = i64::from(date.weekday().num_days_from_sunday());
    let sunday = date - Duration::days(back);
    (sunday, sunday + Duration::days(6))
}

/// Iterates every day of the inclusive range `[start, end]`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |day| *day <= end)
}

/// Returns midnight at the start of `date`.
pub fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Drops the time-of-day component of a timestamp.
pub fn normalize(stamp: NaiveDateTime) -> NaiveDate {
    stamp.date()
}

/// Shifts a timestamp by `offset` hours when it carries an hour-of-day.
///
/// Midnight timestamps are day-granular records and are returned untouched,
/// as is any stamp the offset would push outside the representable range.
/// Fractional offsets are honoured to the minute.
///
/// # Example
///
/// ```
/// use leave_engine::schedule::interval::apply_hour_offset;
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
///
/// let stamp = NaiveDateTime::parse_from_str("2024-03-04 20:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let shifted = apply_hour_offset(stamp, Decimal::new(55, 1)); // +5.5h
/// assert_eq!(shifted.to_string(), "2024-03-05 01:30:00");
/// ```
pub fn apply_hour_offset(stamp: NaiveDateTime, offset: Decimal) -> NaiveDateTime {
    if stamp.time() == NaiveTime::MIN || offset.is_zero() {
        return stamp;
    }
    offset
        .checked_mul(Decimal::new(60, 0))
        .and_then(|minutes| minutes.round().to_i64())
        .and_then(Duration::try_minutes)
        .and_then(|delta| stamp.checked_add_signed(delta))
        .unwrap_or(stamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn make_datetime(date_str: &str, time_str: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date_str, time_str), "%Y-%m-%d %H:%M:%S")
            .unwrap()
    }

    #[test]
    fn test_overlaps_is_inclusive_on_both_ends() {
        let a_start = make_date("2024-01-01");
        let a_end = make_date("2024-01-31");
        assert!(overlaps(a_start, a_end, a_end, make_date("2024-02-10")));
        assert!(overlaps(make_date("2023-12-01"), a_start, a_start, a_end));
        assert!(!overlaps(a_start, a_end, make_date("2024-02-01"), make_date("2024-02-02")));
    }

    #[test]
    fn test_overlaps_detects_containment() {
        assert!(overlaps(
            make_date("2024-01-01"),
            make_date("2024-12-31"),
            make_date("2024-06-01"),
            make_date("2024-06-02"),
        ));
    }

    #[test]
    fn test_contains_includes_bounds() {
        let start = make_date("2024-03-04");
        let end = make_date("2024-03-08");
        assert!(contains(start, end, start));
        assert!(contains(start, end, end));
        assert!(!contains(start, end, make_date("2024-03-09")));
        assert!(!contains(start, end, make_date("2024-03-03")));
    }

    #[test]
    fn test_contains_half_open_excludes_end() {
        let start = make_date("2024-03-04");
        let end = make_date("2024-03-08");
        assert!(contains_half_open(start, end, start));
        assert!(!contains_half_open(start, end, end));
    }

    #[test]
    fn test_week_bounds_on_sunday_and_saturday() {
        let sunday = make_date("2024-03-03");
        assert_eq!(week_bounds(sunday), (sunday, make_date("2024-03-09")));
        let saturday = make_date("2024-03-09");
        assert_eq!(week_bounds(saturday), (sunday, saturday));
    }

    #[test]
    fn test_days_between_is_inclusive() {
        let days: Vec<_> = days_between(make_date("2024-02-28"), make_date("2024-03-01")).collect();
        assert_eq!(
            days,
            vec![
                make_date("2024-02-28"),
                make_date("2024-02-29"),
                make_date("2024-03-01")
            ]
        );
    }

    #[test]
    fn test_days_between_empty_when_reversed() {
        assert_eq!(
            days_between(make_date("2024-03-02"), make_date("2024-03-01")).count(),
            0
        );
    }

    #[test]
    fn test_offset_ignores_midnight_entries() {
        let stamp = make_datetime("2024-03-04", "00:00:00");
        assert_eq!(apply_hour_offset(stamp, Decimal::new(-6, 0)), stamp);
    }

    #[test]
    fn test_offset_moves_timed_entry_across_midnight() {
        let stamp = make_datetime("2024-03-04", "03:00:00");
        let shifted = apply_hour_offset(stamp, Decimal::new(-6, 0));
        assert_eq!(normalize(shifted), make_date("2024-03-03"));
    }

    #[test]
    fn test_out_of_range_offset_leaves_stamp_alone() {
        let stamp = make_datetime("2024-03-04", "03:00:00");
        assert_eq!(apply_hour_offset(stamp, Decimal::MAX), stamp);
        assert_eq!(apply_hour_offset(stamp, Decimal::new(i64::MAX / 60, 0)), stamp);
        assert_eq!(apply_hour_offset(stamp, Decimal::new(-(i64::MAX / 60), 0)), stamp);
        // Valid delta, but past the last representable year
        assert_eq!(apply_hour_offset(stamp, Decimal::new(24 * 366 * 300_000, 0)), stamp);
    }

    #[test]
    fn test_sentinels() {
        assert_eq!(open_end(), make_date("9999-12-30"));
        assert_eq!(epoch(), make_date("1970-01-01"));
        assert_eq!(midnight(epoch()).time(), NaiveTime::MIN);
    }
}
