//! Calendar grid model: column anchors and per-day pixel widths.
//!
//! In `Days` mode every day is a 52px column. In `Weeks` mode a column is a
//! week of 153px made of six 22px days followed by one 21px day. Offsets across
//! weeks are whole weeks times 153 plus the offset inside the week, never
//! `index * 22`, or the grid drifts by a pixel per week.

use chrono::{Duration, NaiveDate};

use crate::model::{ViewMode, Viewport};

pub const DAY_COLUMN_WIDTH: i32 = 52;
pub const WEEK_DAY_WIDTH: i32 = 22;
pub const WEEK_LAST_DAY_WIDTH: i32 = 21;
pub const DAYS_PER_WEEK: i64 = 7;
pub const WEEK_COLUMN_WIDTH: i32 = WEEK_DAY_WIDTH * 6 + WEEK_LAST_DAY_WIDTH;

/// Width of each day inside a week column, Monday first.
pub const WEEK_DAY_WIDTHS: [i32; 7] = [
    WEEK_DAY_WIDTH,
    WEEK_DAY_WIDTH,
    WEEK_DAY_WIDTH,
    WEEK_DAY_WIDTH,
    WEEK_DAY_WIDTH,
    WEEK_DAY_WIDTH,
    WEEK_LAST_DAY_WIDTH,
];

/// One rendered column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub index: usize,
    /// First day the column covers.
    pub date: NaiveDate,
    pub pixel_offset: i32,
    pub pixel_width: i32,
}

/// Width of the rendered column for a mode.
pub fn column_width(mode: ViewMode) -> i32 {
    match mode {
        ViewMode::Days => DAY_COLUMN_WIDTH,
        ViewMode::Weeks => WEEK_COLUMN_WIDTH,
    }
}

/// Days covered by one rendered column.
pub fn days_per_column(mode: ViewMode) -> i64 {
    match mode {
        ViewMode::Days => 1,
        ViewMode::Weeks => DAYS_PER_WEEK,
    }
}

/// Pixel width of the day at `day_index` (days from the grid origin).
pub fn day_width(mode: ViewMode, day_index: i64) -> i32 {
    match mode {
        ViewMode::Days => DAY_COLUMN_WIDTH,
        ViewMode::Weeks => WEEK_DAY_WIDTHS[day_index.rem_euclid(DAYS_PER_WEEK) as usize],
    }
}

/// Left edge of the day at `day_index`. Negative indices lie left of the origin.
pub fn day_offset(mode: ViewMode, day_index: i64) -> i32 {
    match mode {
        ViewMode::Days => saturate(day_index.saturating_mul(DAY_COLUMN_WIDTH as i64)),
        ViewMode::Weeks => {
            let week = day_index.div_euclid(DAYS_PER_WEEK);
            let day_in_week = day_index.rem_euclid(DAYS_PER_WEEK);
            saturate(
                week.saturating_mul(WEEK_COLUMN_WIDTH as i64)
                    .saturating_add(day_in_week * WEEK_DAY_WIDTH as i64),
            )
        }
    }
}

/// Pixel offsets past the `i32` range pin to its ends.
fn saturate(px: i64) -> i32 {
    i32::try_from(px).unwrap_or(if px < 0 { i32::MIN } else { i32::MAX })
}

/// Day whose slot contains `px`. Floors toward the slot the pixel is drawn in.
pub fn day_index_at(mode: ViewMode, px: i32) -> i64 {
    let px = px as i64;
    match mode {
        ViewMode::Days => px.div_euclid(DAY_COLUMN_WIDTH as i64),
        ViewMode::Weeks => {
            let week = px.div_euclid(WEEK_COLUMN_WIDTH as i64);
            let within = px.rem_euclid(WEEK_COLUMN_WIDTH as i64);
            let day_in_week = (within / WEEK_DAY_WIDTH as i64).min(DAYS_PER_WEEK - 1);
            week * DAYS_PER_WEEK + day_in_week
        }
    }
}

/// Number of columns the viewport renders.
pub fn column_count(viewport: &Viewport) -> usize {
    let days = viewport.grid_day_count().max(0);
    let per = days_per_column(viewport.mode);
    ((days + per - 1) / per) as usize
}

/// Total pixel width of the rendered grid.
pub fn grid_width(viewport: &Viewport) -> i32 {
    column_count(viewport) as i32 * column_width(viewport.mode)
}

/// Lazily yield the columns of `viewport`. Cloning restarts the sequence.
pub fn build_columns(viewport: &Viewport) -> Columns {
    Columns {
        origin: viewport.grid_origin(),
        mode: viewport.mode,
        next: 0,
        count: column_count(viewport),
    }
}

#[derive(Debug, Clone)]
pub struct Columns {
    origin: NaiveDate,
    mode: ViewMode,
    next: usize,
    count: usize,
}

impl Iterator for Columns {
    type Item = Column;

    fn next(&mut self) -> Option<Column> {
        if self.next >= self.count {
            return None;
        }
        let index = self.next;
        self.next += 1;
        let width = column_width(self.mode);
        Some(Column {
            index,
            date: self.origin + Duration::days(index as i64 * days_per_column(self.mode)),
            pixel_offset: index as i32 * width,
            pixel_width: width,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.count - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Columns {}

#[cfg(test)]
mod tests {
    use super::*;

    fn vp(mode: ViewMode) -> Viewport {
        Viewport::new(
            NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 2).unwrap(),
            mode,
        )
    }

    #[test]
    fn week_column_is_153() {
        assert_eq!(WEEK_COLUMN_WIDTH, 153);
        assert_eq!(WEEK_DAY_WIDTHS.iter().sum::<i32>(), 153);
    }

    #[test]
    fn far_offsets_saturate() {
        assert_eq!(day_offset(ViewMode::Days, 100_000_000), i32::MAX);
        assert_eq!(day_offset(ViewMode::Days, -100_000_000), i32::MIN);
        assert_eq!(day_offset(ViewMode::Weeks, i64::MAX), i32::MAX);
        assert_eq!(day_offset(ViewMode::Weeks, i64::MIN), i32::MIN);
        assert_eq!(day_offset(ViewMode::Weeks, -7), -153);
    }

    #[test]
    fn days_columns_are_uniform() {
        let cols: Vec<_> = build_columns(&vp(ViewMode::Days)).collect();
        assert_eq!(cols.len(), 28);
        assert_eq!(cols[3].pixel_offset, 3 * 52);
        assert_eq!(cols[3].date, NaiveDate::from_ymd_opt(2025, 1, 9).unwrap());
    }

    #[test]
    fn week_columns_anchor_on_mondays() {
        let cols: Vec<_> = build_columns(&vp(ViewMode::Weeks)).collect();
        assert_eq!(cols.len(), 4);
        assert_eq!(cols[2].pixel_offset, 306);
        assert_eq!(cols[2].date, NaiveDate::from_ymd_opt(2025, 1, 20).unwrap());
        assert_eq!(grid_width(&vp(ViewMode::Weeks)), 612);
    }

    #[test]
    fn cross_week_offset_sums_whole_weeks() {
        // Day 10 = week 1, day 3.
        assert_eq!(day_offset(ViewMode::Weeks, 10), 153 + 66);
        assert_ne!(day_offset(ViewMode::Weeks, 10), 10 * 22);
        assert_eq!(day_offset(ViewMode::Weeks, -1), -21);
    }

    #[test]
    fn pixel_150_is_last_day_of_first_week() {
        assert_eq!(day_index_at(ViewMode::Weeks, 150), 6);
        assert_eq!(day_index_at(ViewMode::Weeks, 152), 6);
        assert_eq!(day_index_at(ViewMode::Weeks, 153), 7);
        assert_eq!(day_index_at(ViewMode::Weeks, -1), -1);
    }

    #[test]
    fn columns_restart_when_cloned() {
        let cols = build_columns(&vp(ViewMode::Days));
        let again = cols.clone();
        assert_eq!(cols.count(), again.count());
    }
}
