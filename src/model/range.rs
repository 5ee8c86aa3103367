use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// An inclusive calendar-day range. Both ends are midnight-normalized dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimeRange {
    /// Build a range, swapping the ends if they arrive inverted.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self { start: end, end: start }
        }
    }

    /// A range covering a single day.
    pub fn day(date: NaiveDate) -> Self {
        Self { start: date, end: date }
    }

    /// `end - start` in whole days.
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Shift both ends by the same number of days.
    pub fn shifted(&self, days: i64) -> Self {
        Self {
            start: self.start + Duration::days(days),
            end: self.end + Duration::days(days),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Iterate every date in the range, ends included.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

/// Whole days from `earlier.end` to `later.start`. Negative when they overlap.
pub fn gap_days(earlier: &TimeRange, later: &TimeRange) -> i64 {
    (later.start - earlier.end).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    #[test]
    fn new_orders_inverted_ends() {
        let r = TimeRange::new(d(1, 9), d(1, 2));
        assert_eq!(r.start, d(1, 2));
        assert_eq!(r.end, d(1, 9));
    }

    #[test]
    fn gap_is_measured_end_to_start() {
        let a = TimeRange::new(d(1, 1), d(1, 12));
        let b = TimeRange::new(d(1, 13), d(1, 20));
        assert_eq!(gap_days(&a, &b), 1);
        assert_eq!(gap_days(&b, &a), -19);
    }

    #[test]
    fn dates_include_both_ends() {
        let r = TimeRange::new(d(2, 27), d(3, 2));
        assert_eq!(r.dates().count(), 4);
        assert_eq!(r.span_days(), 3);
    }
}
