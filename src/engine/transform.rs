//! Conversions between calendar days and grid pixels.
//!
//! Every function here is the exact inverse of the grid model: pixels are
//! floored into the day slot they are drawn in, never rounded.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};

use super::grid::{self, DAY_COLUMN_WIDTH, WEEK_DAY_WIDTH};
use crate::model::{TimeRange, TimelineItem, ViewMode, Viewport};

/// Horizontal placement of a bar on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarGeometry {
    pub offset_px: i32,
    pub width_px: i32,
}

impl BarGeometry {
    pub fn right(&self) -> i32 {
        self.offset_px + self.width_px
    }
}

/// Result of resolving a pointer position to a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerHit {
    /// Rendered column under the pointer (a week in `Weeks` mode).
    pub column_index: i64,
    /// Days from the grid origin.
    pub day_index: i64,
    pub date: NaiveDate,
    /// False off the rendered grid or over an excluded date.
    pub is_valid: bool,
}

/// Days from the grid origin to `date`.
pub fn day_index_of(date: NaiveDate, viewport: &Viewport) -> i64 {
    (date - viewport.grid_origin()).num_days()
}

/// Date at `day_index` days from the grid origin.
pub fn date_of(day_index: i64, viewport: &Viewport) -> NaiveDate {
    viewport.grid_origin() + Duration::days(day_index)
}

/// Left edge of `date` in grid pixels.
pub fn date_to_px(date: NaiveDate, viewport: &Viewport) -> i32 {
    grid::day_offset(viewport.mode, day_index_of(date, viewport))
}

/// Smallest width a bar is drawn with so empty ranges stay grabbable.
pub fn min_bar_width(mode: ViewMode, percent: i32) -> i32 {
    let slot = match mode {
        ViewMode::Days => DAY_COLUMN_WIDTH,
        ViewMode::Weeks => WEEK_DAY_WIDTH,
    };
    (slot * percent / 100).max(1)
}

/// Place a range on the grid. The width runs from the start line to the end line.
pub fn date_range_to_pixels(range: &TimeRange, viewport: &Viewport, min_width_percent: i32) -> BarGeometry {
    let start = date_to_px(range.start, viewport);
    let end = date_to_px(range.end, viewport);
    BarGeometry {
        offset_px: start,
        width_px: (end - start).max(min_bar_width(viewport.mode, min_width_percent)),
    }
}

/// Place a work item, measuring continuous items to the viewport end.
pub fn item_to_pixels(item: &TimelineItem, viewport: &Viewport, min_width_percent: i32) -> BarGeometry {
    date_range_to_pixels(&item.effective_range(viewport.end), viewport, min_width_percent)
}

/// Resolve a pointer x to the day drawn beneath it.
pub fn pixel_to_date(pointer_px: i32, viewport: &Viewport) -> PointerHit {
    pixel_to_date_excluding(pointer_px, viewport, &HashSet::new())
}

/// Like [`pixel_to_date`], also invalidating hits on `excluded` dates.
pub fn pixel_to_date_excluding(
    pointer_px: i32,
    viewport: &Viewport,
    excluded: &HashSet<NaiveDate>,
) -> PointerHit {
    let day_index = grid::day_index_at(viewport.mode, pointer_px);
    let date = date_of(day_index, viewport);
    let on_grid = pointer_px >= 0 && pointer_px < grid::grid_width(viewport);
    PointerHit {
        column_index: day_index.div_euclid(grid::days_per_column(viewport.mode)),
        day_index,
        date,
        is_valid: on_grid && !excluded.contains(&date),
    }
}

/// Whole days between the slots under two pointer positions.
pub fn day_delta(origin_px: i32, current_px: i32, mode: ViewMode) -> i64 {
    grid::day_index_at(mode, current_px) - grid::day_index_at(mode, origin_px)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    fn days_vp() -> Viewport {
        Viewport::new(d(1, 1), d(1, 31), ViewMode::Days)
    }

    fn weeks_vp() -> Viewport {
        Viewport::new(d(1, 6), d(3, 2), ViewMode::Weeks)
    }

    #[test]
    fn range_geometry_in_days_mode() {
        let g = date_range_to_pixels(&TimeRange::new(d(1, 3), d(1, 5)), &days_vp(), 80);
        assert_eq!(g, BarGeometry { offset_px: 104, width_px: 104 });
    }

    #[test]
    fn empty_range_keeps_minimum_width() {
        let g = date_range_to_pixels(&TimeRange::day(d(1, 2)), &days_vp(), 80);
        assert_eq!(g.width_px, 41);
        let g = date_range_to_pixels(&TimeRange::day(d(1, 7)), &weeks_vp(), 80);
        assert_eq!(g.width_px, 17);
    }

    #[test]
    fn week_geometry_crosses_short_day() {
        // Sunday Jan 12 to Monday Jan 13 spans the 21px day.
        let g = date_range_to_pixels(&TimeRange::new(d(1, 12), d(1, 13)), &weeks_vp(), 80);
        assert_eq!(g.offset_px, 132);
        assert_eq!(g.width_px, 21);
    }

    #[test]
    fn pointer_in_short_day_stays_in_week() {
        let hit = pixel_to_date(150, &weeks_vp());
        assert_eq!(hit.day_index, 6);
        assert_eq!(hit.column_index, 0);
        assert_eq!(hit.date, d(1, 12));
        assert!(hit.is_valid);
    }

    #[test]
    fn pointer_off_grid_is_invalid() {
        assert!(!pixel_to_date(-1, &days_vp()).is_valid);
        assert!(!pixel_to_date(31 * 52, &days_vp()).is_valid);
        assert!(pixel_to_date(31 * 52 - 1, &days_vp()).is_valid);
    }

    #[test]
    fn excluded_dates_are_invalid() {
        let excluded: HashSet<_> = [d(1, 2)].into_iter().collect();
        let hit = pixel_to_date_excluding(60, &days_vp(), &excluded);
        assert_eq!(hit.date, d(1, 2));
        assert!(!hit.is_valid);
    }

    #[test]
    fn delta_floors_to_visual_slot() {
        assert_eq!(day_delta(10, 114, ViewMode::Days), 2);
        assert_eq!(day_delta(10, 51, ViewMode::Days), 0);
        assert_eq!(day_delta(5, -5, ViewMode::Days), -1);
        assert_eq!(day_delta(140, 154, ViewMode::Weeks), 1);
    }
}
