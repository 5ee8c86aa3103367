use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Controls what the timeline columns represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewMode {
    /// One 52px column per day.
    Days,
    /// One 153px column per week.
    Weeks,
}

/// The visible window of the timeline.
///
/// Mutated only by navigation and by applying an auto-scroll decision; gestures
/// never write to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// The leftmost visible date.
    pub start: NaiveDate,
    /// The rightmost visible date.
    pub end: NaiveDate,
    pub mode: ViewMode,
}

impl Viewport {
    pub fn new(start: NaiveDate, end: NaiveDate, mode: ViewMode) -> Self {
        Self {
            start: start.min(end),
            end: end.max(start),
            mode,
        }
    }

    /// Number of visible days, both ends included.
    pub fn day_count(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Date sitting at pixel 0 of the grid. Week columns always begin on a Monday.
    pub fn grid_origin(&self) -> NaiveDate {
        match self.mode {
            ViewMode::Days => self.start,
            ViewMode::Weeks => week_start(self.start),
        }
    }

    /// Number of days from the grid origin to the viewport end, inclusive.
    pub fn grid_day_count(&self) -> i64 {
        (self.end - self.grid_origin()).num_days() + 1
    }

    /// A copy scrolled by a number of days.
    pub fn scrolled(&self, days: i64) -> Self {
        Self {
            start: self.start + Duration::days(days),
            end: self.end + Duration::days(days),
            mode: self.mode,
        }
    }

    /// Scroll the viewport by a number of days.
    pub fn scroll_days(&mut self, days: i64) {
        *self = self.scrolled(days);
    }

    /// Keep the span but start at `start`.
    pub fn jump_to(&mut self, start: NaiveDate) {
        let span = self.end - self.start;
        self.start = start;
        self.end = start + span;
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weeks_origin_snaps_to_monday() {
        // 2025-01-01 is a Wednesday.
        let vp = Viewport::new(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
            ViewMode::Weeks,
        );
        assert_eq!(vp.grid_origin(), NaiveDate::from_ymd_opt(2024, 12, 30).unwrap());
        assert_eq!(vp.day_count(), 31);
        assert_eq!(vp.grid_day_count(), 33);
    }

    #[test]
    fn scrolled_keeps_span() {
        let vp = Viewport::new(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            ViewMode::Days,
        );
        let moved = vp.scrolled(-3);
        assert_eq!(moved.day_count(), vp.day_count());
        assert_eq!(moved.start, NaiveDate::from_ymd_opt(2024, 12, 29).unwrap());
    }
}
