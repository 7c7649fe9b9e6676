use chrono::Datelike;
use tracing::debug;

use crate::search_types::{DateRange, DayAvailability};

/// Scan state threaded through the fold over the sorted calendar
#[derive(Debug, Clone, Copy)]
enum ScanState {
    /// No candidate stay is open
    Idle,
    /// A candidate stay is open with `len` available nights seen so far
    Accumulating {
        start: chrono::NaiveDate,
        len: u32,
    },
}

/// Finds every contiguous stretch of `nights` available nights that begins
/// on `start_weekday` (1 = Monday .. 7 = Sunday).
///
/// The input may arrive in any order and is sorted here before scanning.
/// The scan is greedy and non-overlapping: days consumed by a failed or
/// successful attempt are never re-evaluated as fresh starts, and a trailing
/// candidate that runs out of days before reaching `nights` is discarded.
/// This mirrors what the booking flow actually offers and callers depend on
/// it, so it must not be widened into an exhaustive enumerator.
///
/// Impossible parameters (`nights == 0`, weekday outside 1..=7) and empty
/// input yield an empty result rather than an error.
pub fn matching_ranges(
    days: &[DayAvailability],
    start_weekday: u8,
    nights: u32,
) -> Vec<DateRange> {
    if nights == 0 || !(1..=7).contains(&start_weekday) {
        debug!(
            start_weekday,
            nights, "degenerate match parameters, returning no ranges"
        );
        return Vec::new();
    }

    let mut sorted: Vec<DayAvailability> = days.to_vec();
    sorted.sort_by_key(|day| day.date);

    let mut ranges = Vec::new();
    let mut state = ScanState::Idle;

    for day in &sorted {
        state = match state {
            ScanState::Idle => {
                if day.is_available
                    && day.date.weekday().number_from_monday() == u32::from(start_weekday)
                {
                    ScanState::Accumulating {
                        start: day.date,
                        len: 1,
                    }
                } else {
                    ScanState::Idle
                }
            }
            ScanState::Accumulating { start, len } => {
                if len == nights {
                    // The current day closes the range regardless of its own
                    // availability; it is consumed by the attempt.
                    ranges.push(DateRange {
                        start,
                        end: day.date,
                    });
                    ScanState::Idle
                } else if day.is_available {
                    ScanState::Accumulating {
                        start,
                        len: len + 1,
                    }
                } else {
                    // Failed attempt consumes this day even if it sits on the
                    // start weekday.
                    ScanState::Idle
                }
            }
        };
    }

    // A still-open candidate never saw the day after its last night; no
    // partial or trailing matches.
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// All days available across a window; 2024-06-03 is a Monday.
    fn june_window(from: u32, to: u32) -> Vec<DayAvailability> {
        (from..=to)
            .map(|day| DayAvailability::new(d(2024, 6, day), true))
            .collect()
    }

    #[test]
    fn test_exact_length_match() {
        let days = june_window(1, 10);
        let ranges = matching_ranges(&days, 1, 3);

        // Only one Monday fits three nights plus a closing day in this
        // window; the following Monday opens a candidate that is discarded.
        assert_eq!(
            ranges,
            vec![DateRange {
                start: d(2024, 6, 3),
                end: d(2024, 6, 6),
            }]
        );
        assert_eq!((ranges[0].end - ranges[0].start).num_days(), 3);
    }

    #[test]
    fn test_weekday_gating() {
        let days = june_window(1, 30);
        let ranges = matching_ranges(&days, 5, 2);

        assert!(!ranges.is_empty());
        for range in &ranges {
            assert_eq!(range.start.weekday().number_from_monday(), 5);
        }
    }

    #[test]
    fn test_unsorted_input_is_sorted_first() {
        let mut days = june_window(1, 10);
        days.reverse();
        let ranges = matching_ranges(&days, 1, 3);

        assert_eq!(
            ranges,
            vec![DateRange {
                start: d(2024, 6, 3),
                end: d(2024, 6, 6),
            }]
        );
    }

    #[test]
    fn test_greedy_consumption_after_failed_attempt() {
        // Monday 2024-06-03 opens an attempt, Tuesday is unavailable and is
        // consumed by the failure. Monday 2024-06-10 opens the next attempt.
        let mut days = june_window(3, 14);
        days[1].is_available = false; // 2024-06-04

        let ranges = matching_ranges(&days, 1, 3);

        assert_eq!(
            ranges,
            vec![DateRange {
                start: d(2024, 6, 10),
                end: d(2024, 6, 13),
            }]
        );
    }

    #[test]
    fn test_failed_attempt_consumes_start_weekday() {
        // Friday 2024-06-07 opens an attempt; Friday 2024-06-14 falls inside
        // it as an unavailable day, killing the attempt and getting consumed.
        // No range may start on or before the consumed day.
        let mut days = june_window(7, 16);
        days[7].is_available = false; // 2024-06-14, a Friday

        let ranges = matching_ranges(&days, 5, 10);

        assert!(ranges.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(matching_ranges(&[], 1, 3).is_empty());
    }

    #[test]
    fn test_no_availability() {
        let days: Vec<DayAvailability> = (1..=10)
            .map(|day| DayAvailability::new(d(2024, 6, day), false))
            .collect();
        assert!(matching_ranges(&days, 1, 3).is_empty());
    }

    #[test]
    fn test_degenerate_parameters() {
        let days = june_window(1, 10);
        assert!(matching_ranges(&days, 1, 0).is_empty());
        assert!(matching_ranges(&days, 0, 3).is_empty());
        assert!(matching_ranges(&days, 8, 3).is_empty());
    }

    #[test]
    fn test_trailing_candidate_discarded() {
        // Window ends on the third night: the closing day never arrives, so
        // the open candidate is dropped.
        let days = june_window(3, 5);
        assert!(matching_ranges(&days, 1, 3).is_empty());

        // One more day and the range closes.
        let days = june_window(3, 6);
        assert_eq!(
            matching_ranges(&days, 1, 3),
            vec![DateRange {
                start: d(2024, 6, 3),
                end: d(2024, 6, 6),
            }]
        );
    }

    #[test]
    fn test_closing_day_may_be_unavailable() {
        let mut days = june_window(3, 6);
        days[3].is_available = false; // 2024-06-06 closes the range anyway

        assert_eq!(
            matching_ranges(&days, 1, 3),
            vec![DateRange {
                start: d(2024, 6, 3),
                end: d(2024, 6, 6),
            }]
        );
    }

    #[test]
    fn test_multiple_weeks() {
        let days = june_window(1, 30);
        let ranges = matching_ranges(&days, 1, 2);

        assert_eq!(
            ranges.iter().map(|r| r.start).collect::<Vec<_>>(),
            vec![d(2024, 6, 3), d(2024, 6, 10), d(2024, 6, 17), d(2024, 6, 24)]
        );
        for range in &ranges {
            assert_eq!((range.end - range.start).num_days(), 2);
        }
    }
}
