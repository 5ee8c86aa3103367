//! Blackout periods: overlap checks against each other and drafting new ones
//! by dragging across free days.
//!
//! Blackouts never collide with work items. When one overlaps another the
//! adjusted range is only ever suggested; the operator confirms before anything
//! is written.

use std::collections::HashSet;
use std::fmt::Write as _;

use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use super::conflict::{self, ResolveStrategy, TrackEntry};
use super::grid;
use super::transform;
use crate::model::{BlackoutPeriod, TimeRange, Viewport};

/// An existing blackout the proposal runs into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlackoutConflict {
    pub id: Uuid,
    pub title: String,
    pub range: TimeRange,
}

/// Result of checking a proposed blackout range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlackoutCheck {
    pub proposed: TimeRange,
    pub has_conflict: bool,
    pub conflicting: Vec<BlackoutConflict>,
    /// Adjusted range to offer the operator. `None` when there is no room at all.
    pub suggestion: Option<TimeRange>,
    /// Human-readable summary of the conflicts and the suggested change.
    pub explanation: String,
}

fn fmt_date(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}

fn fmt_range(range: &TimeRange) -> String {
    if range.start == range.end {
        fmt_date(range.start)
    } else {
        format!("{} to {}", fmt_date(range.start), fmt_date(range.end))
    }
}

/// Check `proposed` against every other blackout.
///
/// `subject_id` is the period being edited, if any; it is skipped.
pub fn check_blackout(
    subject_id: Option<Uuid>,
    proposed: TimeRange,
    blackouts: &[BlackoutPeriod],
    min_gap_days: i64,
) -> BlackoutCheck {
    let subject = TrackEntry::new(subject_id.unwrap_or_else(Uuid::nil), proposed, false);
    let others: Vec<&BlackoutPeriod> = blackouts
        .iter()
        .filter(|b| Some(b.id) != subject_id)
        .filter(|b| conflict::conflicts(&subject, &TrackEntry::from(*b), min_gap_days))
        .collect();

    if others.is_empty() {
        return BlackoutCheck {
            proposed,
            has_conflict: false,
            conflicting: Vec::new(),
            suggestion: None,
            explanation: String::new(),
        };
    }

    let entries: Vec<TrackEntry> = others.iter().map(|b| TrackEntry::from(*b)).collect();
    let suggestion = conflict::resolve(&subject, &entries, ResolveStrategy::Adjust, min_gap_days)
        .ok()
        .map(|r| r.final_range);

    let conflicting: Vec<BlackoutConflict> = others
        .iter()
        .map(|b| BlackoutConflict {
            id: b.id,
            title: b.title.clone(),
            range: b.range,
        })
        .collect();

    BlackoutCheck {
        proposed,
        has_conflict: true,
        explanation: explain(&proposed, &conflicting, suggestion.as_ref()),
        conflicting,
        suggestion,
    }
}

fn explain(proposed: &TimeRange, conflicting: &[BlackoutConflict], suggestion: Option<&TimeRange>) -> String {
    let mut out = String::from("Overlaps existing blackout periods:");
    for c in conflicting {
        let _ = write!(out, "\n  \u{2022} \"{}\" ({})", c.title, fmt_range(&c.range));
    }
    match suggestion {
        Some(s) => {
            let _ = write!(out, "\nSuggested range: {}.", fmt_range(s));
            if s.start != proposed.start {
                let _ = write!(
                    out,
                    " Start moved from {} to {}.",
                    fmt_date(proposed.start),
                    fmt_date(s.start)
                );
            }
            if s.end != proposed.end {
                let _ = write!(
                    out,
                    " End moved from {} to {}.",
                    fmt_date(proposed.end),
                    fmt_date(s.end)
                );
            }
        }
        None => out.push_str("\nThere is no free range left between them."),
    }
    out
}

/// Every date already covered by a blackout, except `skip`.
pub fn occupied_dates(blackouts: &[BlackoutPeriod], skip: Option<Uuid>) -> HashSet<NaiveDate> {
    blackouts
        .iter()
        .filter(|b| Some(b.id) != skip)
        .flat_map(|b| b.range.dates())
        .collect()
}

/// Range swept by a create-by-drag from `anchor_px` to `pointer_px`.
///
/// The anchor must land on a free day of the grid. The sweep stops before the
/// first occupied day in the drag direction and at the grid edges.
pub fn draft_range(
    anchor_px: i32,
    pointer_px: i32,
    viewport: &Viewport,
    occupied: &HashSet<NaiveDate>,
) -> Option<TimeRange> {
    let anchor = transform::pixel_to_date_excluding(anchor_px, viewport, occupied);
    if !anchor.is_valid {
        return None;
    }
    let last_index = (grid::grid_width(viewport) - 1).max(0);
    let target = grid::day_index_at(viewport.mode, pointer_px.clamp(0, last_index));
    let step: i64 = if target >= anchor.day_index { 1 } else { -1 };

    let mut reached = anchor.date;
    let mut index = anchor.day_index;
    while index != target {
        let next = reached + Duration::days(step);
        if occupied.contains(&next) {
            break;
        }
        reached = next;
        index += step;
    }
    Some(TimeRange::new(anchor.date, reached))
}
