//! Property-based invariant tests for the calendar grid and the drag engine.
//!
//! 1. Every pixel of a day slot resolves back to that day.
//! 2. A week column is 153px and day offsets repeat every week.
//! 3. The day delta depends only on where the pointer ends up.
//! 4. Resizing never inverts a range; moving keeps its span.
//! 5. The conflict rule does not depend on argument order.
//! 6. A successful resolution clears every conflict it was given.
//! 7. Packed rows never hold two conflicting items.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use uuid::Uuid;

use timeline_planner::config::EngineConfig;
use timeline_planner::engine::conflict::{conflicts, detect_conflicts, resolve, ResolveStrategy, TrackEntry};
use timeline_planner::engine::grid::{self, DAYS_PER_WEEK, WEEK_COLUMN_WIDTH};
use timeline_planner::engine::transform::{date_of, date_to_px, pixel_to_date};
use timeline_planner::engine::{
    arrange_rows, GestureAction, GestureContext, GestureController, GestureTarget, ViewportBounds,
};
use timeline_planner::model::{Schedule, SubjectKind, TimeRange, TimelineItem, ViewMode, Viewport};

// ── Helpers ─────────────────────────────────────────────────────────────

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

fn day(offset: i64) -> NaiveDate {
    base() + Duration::days(offset)
}

fn any_mode() -> impl Strategy<Value = ViewMode> {
    prop_oneof![Just(ViewMode::Days), Just(ViewMode::Weeks)]
}

fn any_action() -> impl Strategy<Value = GestureAction> {
    prop_oneof![
        Just(GestureAction::Move),
        Just(GestureAction::ResizeStart),
        Just(GestureAction::ResizeEnd),
    ]
}

/// A finite range starting within the first 90 days, up to 20 days long.
fn any_range() -> impl Strategy<Value = TimeRange> {
    (0i64..90, 0i64..20).prop_map(|(start, len)| TimeRange::new(day(start), day(start + len)))
}

fn entry(range: TimeRange) -> TrackEntry {
    TrackEntry::new(Uuid::new_v4(), range, false)
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Pixel to date round trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn every_pixel_of_a_slot_maps_to_its_day(
        start in 0i64..400,
        day_index in 0i64..120,
        inset in 0i32..52,
        mode in any_mode(),
    ) {
        let vp = Viewport::new(day(start), day(start + 150), mode);
        let inset = inset % grid::day_width(mode, day_index);
        let date = date_of(day_index, &vp);
        let hit = pixel_to_date(date_to_px(date, &vp) + inset, &vp);
        prop_assert_eq!(hit.date, date, "inset {} in {:?}", inset, mode);
        prop_assert_eq!(hit.day_index, day_index);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Week geometry
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn weeks_are_153px_wide(week in -50i64..50) {
        let widths: i32 = (0..DAYS_PER_WEEK).map(|d| grid::day_width(ViewMode::Weeks, week * 7 + d)).sum();
        prop_assert_eq!(widths, WEEK_COLUMN_WIDTH);
        prop_assert_eq!(WEEK_COLUMN_WIDTH, 153);
        prop_assert_eq!(
            grid::day_offset(ViewMode::Weeks, week * DAYS_PER_WEEK),
            week as i32 * WEEK_COLUMN_WIDTH
        );
    }

    #[test]
    fn week_grid_starts_on_a_monday(start in 0i64..400) {
        use chrono::Datelike;
        let vp = Viewport::new(day(start), day(start + 60), ViewMode::Weeks);
        let origin = vp.grid_origin();
        prop_assert_eq!(origin.weekday(), chrono::Weekday::Mon);
        prop_assert!(origin <= vp.start);
        prop_assert!((vp.start - origin).num_days() < 7);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3-4. Gesture deltas and range integrity
// ═════════════════════════════════════════════════════════════════════════

fn single_item_schedule(range: TimeRange) -> (Schedule, Uuid) {
    let mut schedule = Schedule::new("prop");
    let track = schedule.track_named("Only");
    let item = TimelineItem::new("Subject", track, range.start, range.end);
    let id = item.id;
    schedule.items.push(item);
    (schedule, id)
}

proptest! {
    #[test]
    fn delta_depends_only_on_the_final_pointer(
        path in proptest::collection::vec(0i32..4_000, 0..12),
        last in 0i32..4_000,
        mode in any_mode(),
    ) {
        let (schedule, id) = single_item_schedule(TimeRange::new(day(40), day(45)));
        let vp = Viewport::new(day(0), day(120), mode);
        let config = EngineConfig::default();
        let cx = GestureContext {
            schedule: &schedule,
            viewport: &vp,
            bounds: ViewportBounds { left: 0, right: 100_000 },
            config: &config,
        };
        let target = GestureTarget { id, kind: SubjectKind::Item, action: GestureAction::Move };
        let origin = date_to_px(day(42), &vp) + 3;

        let mut wandering = GestureController::new();
        wandering.pointer_down(target, origin, 0, &cx);
        for (i, px) in path.iter().enumerate() {
            wandering.pointer_move(*px, i as u64 * 16, &cx);
        }
        wandering.pointer_move(last, 1_000, &cx);

        let mut direct = GestureController::new();
        direct.pointer_down(target, origin, 0, &cx);
        direct.pointer_move(last, 1_000, &cx);

        prop_assert_eq!(
            wandering.gesture().map(|g| g.last_day_delta),
            direct.gesture().map(|g| g.last_day_delta)
        );
        prop_assert_eq!(wandering.visual_range_of(id), direct.visual_range_of(id));
    }

    #[test]
    fn live_ranges_never_invert(
        range in any_range(),
        action in any_action(),
        shift_days in -60i64..60,
    ) {
        let (schedule, id) = single_item_schedule(range);
        let vp = Viewport::new(day(-100), day(250), ViewMode::Days);
        let config = EngineConfig::default();
        let cx = GestureContext {
            schedule: &schedule,
            viewport: &vp,
            bounds: ViewportBounds { left: 0, right: 100_000 },
            config: &config,
        };
        let origin = date_to_px(range.start, &vp) + 10;
        let mut c = GestureController::new();
        c.pointer_down(GestureTarget { id, kind: SubjectKind::Item, action }, origin, 0, &cx);
        c.pointer_move(origin + shift_days as i32 * 52, 100, &cx);

        let live = c.visual_range_of(id).expect("gesture is active");
        prop_assert!(live.start <= live.end, "{:?} inverted to {:?}", range, live);
        match action {
            GestureAction::Move => prop_assert_eq!(live.span_days(), range.span_days()),
            GestureAction::ResizeStart => prop_assert_eq!(live.end, range.end),
            GestureAction::ResizeEnd => prop_assert_eq!(live.start, range.start),
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5-7. Conflict rules
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn conflict_is_symmetric(a in any_range(), b in any_range(), gap in 0i64..5) {
        let (a, b) = (entry(a), entry(b));
        prop_assert_eq!(conflicts(&a, &b, gap), conflicts(&b, &a, gap));
    }

    #[test]
    fn resolution_restores_the_gap(
        proposed in any_range(),
        neighbours in proptest::collection::vec(any_range(), 1..5),
        gap in 0i64..4,
    ) {
        let subject = entry(proposed);
        let track: Vec<TrackEntry> = neighbours.into_iter().map(entry).collect();
        let report = detect_conflicts(subject.id, &subject, &track, gap);
        prop_assume!(report.has_conflict);

        if let Ok(res) = resolve(&subject, &report.conflicting, ResolveStrategy::Adjust, gap) {
            prop_assert!(res.final_range.start <= res.final_range.end);
            prop_assert!(res.was_adjusted);
            let placed = TrackEntry::new(subject.id, res.final_range, false);
            for other in &report.conflicting {
                prop_assert!(
                    !conflicts(&placed, other, gap),
                    "{:?} still conflicts with {:?}",
                    res.final_range,
                    other.range
                );
            }
        }
    }

    #[test]
    fn packed_rows_hold_no_conflicts(
        ranges in proptest::collection::vec(any_range(), 0..24),
        gap in 0i64..4,
    ) {
        let track = Uuid::new_v4();
        let items: Vec<TimelineItem> = ranges
            .iter()
            .enumerate()
            .map(|(i, r)| TimelineItem::new(format!("item {i}"), track, r.start, r.end))
            .collect();
        let layout = arrange_rows(&items, gap);

        let placed: usize = layout.rows.iter().map(Vec::len).sum();
        prop_assert_eq!(placed, items.len());
        for row in &layout.rows {
            for (i, a) in row.iter().enumerate() {
                for b in &row[i + 1..] {
                    prop_assert!(
                        !conflicts(&TrackEntry::from(*a), &TrackEntry::from(*b), gap),
                        "{} and {} share a row",
                        a.name,
                        b.name
                    );
                }
            }
        }
    }
}
