//! Overlap detection and gap-restoring adjustment for items sharing a track.

use chrono::Duration;
use log::debug;
use uuid::Uuid;

use crate::error::Rejection;
use crate::model::{gap_days, BlackoutPeriod, TimeRange, TimelineItem};

/// What the resolver needs to know about one placement on a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackEntry {
    pub id: Uuid,
    pub range: TimeRange,
    /// Open-ended: conflicts with everything from its start on.
    pub continuous: bool,
}

impl TrackEntry {
    pub fn new(id: Uuid, range: TimeRange, continuous: bool) -> Self {
        Self { id, range, continuous }
    }
}

impl From<&TimelineItem> for TrackEntry {
    fn from(item: &TimelineItem) -> Self {
        Self::new(item.id, item.range, item.continuous)
    }
}

impl From<&BlackoutPeriod> for TrackEntry {
    fn from(b: &BlackoutPeriod) -> Self {
        Self::new(b.id, b.range, false)
    }
}

/// Outcome of [`detect_conflicts`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConflictReport {
    pub has_conflict: bool,
    pub conflicting: Vec<TrackEntry>,
}

/// How a conflicting placement is reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolveStrategy {
    /// Pull the boundary nearest each conflict back until the gap is restored.
    #[default]
    Adjust,
}

/// Outcome of a successful [`resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub final_range: TimeRange,
    pub was_adjusted: bool,
}

/// Whether two placements are closer than `min_gap_days` end to start.
///
/// Sharing a day is always a conflict, whatever the gap setting. The pair is
/// ordered before measuring so the answer does not depend on argument order.
pub fn conflicts(a: &TrackEntry, b: &TrackEntry, min_gap_days: i64) -> bool {
    let (first, second) = if (a.range.start, a.range.end) <= (b.range.start, b.range.end) {
        (a, b)
    } else {
        (b, a)
    };
    if first.continuous {
        return true;
    }
    let gap = gap_days(&first.range, &second.range);
    gap <= 0 || gap < min_gap_days
}

/// Collect the entries of `track` the proposed placement conflicts with.
/// The subject itself is skipped.
pub fn detect_conflicts(
    subject_id: Uuid,
    proposed: &TrackEntry,
    track: &[TrackEntry],
    min_gap_days: i64,
) -> ConflictReport {
    let conflicting: Vec<TrackEntry> = track
        .iter()
        .filter(|other| other.id != subject_id)
        .filter(|other| conflicts(proposed, other, min_gap_days))
        .copied()
        .collect();
    ConflictReport {
        has_conflict: !conflicting.is_empty(),
        conflicting,
    }
}

enum Side {
    Start,
    End,
}

/// Which boundary of `proposed` a conflict should push.
fn nearer_side(proposed: &TrackEntry, other: &TrackEntry) -> Option<Side> {
    if other.continuous {
        // Nothing past an open-ended item's start can be freed.
        return (other.range.start > proposed.range.start).then_some(Side::End);
    }
    let to_end = (other.range.start - proposed.range.end).num_days().abs();
    let to_start = (proposed.range.start - other.range.end).num_days().abs();
    if to_end <= to_start {
        Some(Side::End)
    } else {
        Some(Side::Start)
    }
}

/// Reconcile `proposed` with every entry in `conflicting`.
///
/// Each conflict pushes the proposed boundary it is nearer to so that exactly
/// `min_gap_days` remain. Fails with `NoRoom` when the pushes from both sides
/// cross, or when an open-ended placement would need a new end.
pub fn resolve(
    proposed: &TrackEntry,
    conflicting: &[TrackEntry],
    strategy: ResolveStrategy,
    min_gap_days: i64,
) -> Result<Resolution, Rejection> {
    match strategy {
        ResolveStrategy::Adjust => adjust(proposed, conflicting, min_gap_days),
    }
}

fn adjust(
    proposed: &TrackEntry,
    conflicting: &[TrackEntry],
    min_gap_days: i64,
) -> Result<Resolution, Rejection> {
    let gap = Duration::days(min_gap_days.max(1));
    let mut start = proposed.range.start;
    let mut end = proposed.range.end;

    for other in conflicting {
        match nearer_side(proposed, other) {
            Some(Side::End) => {
                if proposed.continuous {
                    return Err(Rejection::no_room(
                        "an open-ended item cannot be shortened to make room",
                    ));
                }
                end = end.min(other.range.start - gap);
            }
            Some(Side::Start) => start = start.max(other.range.end + gap),
            None => {
                return Err(Rejection::no_room(format!(
                    "an open-ended item occupies the track from {}",
                    other.range.start.format("%Y-%m-%d")
                )));
            }
        }
    }

    if proposed.continuous {
        end = start;
    }
    if start > end {
        return Err(Rejection::no_room(format!(
            "not enough room between neighbours for a {}-day gap",
            gap.num_days()
        )));
    }

    let final_range = TimeRange { start, end };
    let was_adjusted = final_range != proposed.range;
    if was_adjusted {
        debug!(
            "adjusted {} from {:?} to {:?} against {} conflict(s)",
            proposed.id,
            proposed.range,
            final_range,
            conflicting.len()
        );
    }
    Ok(Resolution {
        final_range,
        was_adjusted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RejectionCode;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    fn entry(start: NaiveDate, end: NaiveDate) -> TrackEntry {
        TrackEntry::new(Uuid::new_v4(), TimeRange::new(start, end), false)
    }

    #[test]
    fn gap_of_one_conflicts_with_min_two() {
        let a = entry(d(1, 1), d(1, 12));
        let b = entry(d(1, 13), d(1, 20));
        assert!(conflicts(&a, &b, 2));
        let a = entry(d(1, 1), d(1, 11));
        assert!(!conflicts(&a, &b, 2));
    }

    #[test]
    fn resolve_pulls_end_back_to_gap() {
        let a = entry(d(1, 1), d(1, 12));
        let b = entry(d(1, 13), d(1, 20));
        let report = detect_conflicts(a.id, &a, &[a, b], 2);
        assert!(report.has_conflict);
        assert_eq!(report.conflicting, vec![b]);

        let res = resolve(&a, &report.conflicting, ResolveStrategy::Adjust, 2).unwrap();
        assert_eq!(res.final_range, TimeRange::new(d(1, 1), d(1, 11)));
        assert!(res.was_adjusted);
    }

    #[test]
    fn resolve_pushes_start_forward() {
        let left = entry(d(1, 1), d(1, 10));
        let moved = entry(d(1, 9), d(1, 25));
        let res = resolve(&moved, &[left], ResolveStrategy::Adjust, 2).unwrap();
        assert_eq!(res.final_range, TimeRange::new(d(1, 12), d(1, 25)));
    }

    #[test]
    fn squeezed_between_neighbours_has_no_room() {
        let left = entry(d(1, 1), d(1, 10));
        let right = entry(d(1, 13), d(1, 20));
        let moved = entry(d(1, 9), d(1, 14));
        let err = resolve(&moved, &[left, right], ResolveStrategy::Adjust, 2).unwrap_err();
        assert_eq!(err.code, RejectionCode::NoRoom);
    }

    #[test]
    fn continuous_item_conflicts_with_everything_after_it() {
        let open = TrackEntry::new(Uuid::new_v4(), TimeRange::day(d(1, 1)), true);
        let later = entry(d(2, 1), d(2, 5));
        let much_later = entry(d(9, 1), d(9, 5));
        assert!(conflicts(&open, &later, 2));
        assert!(conflicts(&much_later, &open, 2));

        let before = entry(d(1, 1) - Duration::days(30), d(1, 1) - Duration::days(5));
        assert!(!conflicts(&open, &before, 2));
    }

    #[test]
    fn item_after_open_ended_item_cannot_be_resolved() {
        let open = TrackEntry::new(Uuid::new_v4(), TimeRange::day(d(1, 1)), true);
        let later = entry(d(2, 1), d(2, 5));
        let err = resolve(&later, &[open], ResolveStrategy::Adjust, 2).unwrap_err();
        assert_eq!(err.code, RejectionCode::NoRoom);
    }

    #[test]
    fn zero_gap_still_rejects_shared_days() {
        let a = entry(d(1, 1), d(1, 5));
        let b = entry(d(1, 5), d(1, 9));
        assert!(conflicts(&a, &b, 0));
        let res = resolve(&a, &[b], ResolveStrategy::Adjust, 0).unwrap();
        assert_eq!(res.final_range.end, d(1, 4));
    }

    #[test]
    fn subject_is_not_its_own_conflict() {
        let a = entry(d(1, 1), d(1, 5));
        let report = detect_conflicts(a.id, &a, &[a], 2);
        assert_eq!(report, ConflictReport::default());
    }
}
