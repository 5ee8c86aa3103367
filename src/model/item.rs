use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::range::TimeRange;

/// Default bar color (steel blue) for work items without an explicit one.
pub const DEFAULT_ITEM_COLOR: [u8; 3] = [70, 130, 180];

/// Colors handed out in turn to new and imported items.
pub const ITEM_PALETTE: [[u8; 3]; 8] = [
    [66, 133, 244],
    [52, 168, 83],
    [171, 71, 188],
    [251, 140, 0],
    [3, 169, 244],
    [229, 57, 53],
    [0, 188, 212],
    [255, 193, 7],
];

/// A work item occupying a track on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineItem {
    pub id: Uuid,
    pub name: String,
    /// Track the item belongs to. Lookup only, the item does not own it.
    pub row_id: Uuid,
    pub range: TimeRange,
    /// No end date. Geometry measures it to the viewport end instead of `range.end`.
    #[serde(default)]
    pub continuous: bool,
    #[serde(default = "default_color")]
    pub color: [u8; 3],
}

fn default_color() -> [u8; 3] {
    DEFAULT_ITEM_COLOR
}

impl TimelineItem {
    /// Create a new item with sensible defaults.
    pub fn new(name: impl Into<String>, row_id: Uuid, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            row_id,
            range: TimeRange::new(start, end),
            continuous: false,
            color: DEFAULT_ITEM_COLOR,
        }
    }

    /// Create an open-ended item.
    pub fn new_continuous(name: impl Into<String>, row_id: Uuid, start: NaiveDate) -> Self {
        Self {
            continuous: true,
            ..Self::new(name, row_id, start, start)
        }
    }

    /// The range used for geometry against a viewport ending at `viewport_end`.
    pub fn effective_range(&self, viewport_end: NaiveDate) -> TimeRange {
        if self.continuous {
            TimeRange::new(self.range.start, viewport_end.max(self.range.start))
        } else {
            self.range
        }
    }
}

/// Which side of a phase a marker bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundaryKind {
    Start,
    End,
}

/// A phase boundary nested inside a work item's span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubPhaseMarker {
    pub id: Uuid,
    pub parent_item_id: Uuid,
    pub name: String,
    pub boundary_date: NaiveDate,
    pub boundary_kind: BoundaryKind,
    /// Coincides with the parent's start; cannot be dragged on its own.
    pub is_first: bool,
    /// Coincides with the parent's end; cannot be dragged on its own.
    pub is_last: bool,
}

impl SubPhaseMarker {
    pub fn new(
        parent_item_id: Uuid,
        name: impl Into<String>,
        boundary_date: NaiveDate,
        boundary_kind: BoundaryKind,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            parent_item_id,
            name: name.into(),
            boundary_date,
            boundary_kind,
            is_first: false,
            is_last: false,
        }
    }

    pub fn range(&self) -> TimeRange {
        TimeRange::day(self.boundary_date)
    }

    pub fn is_locked(&self) -> bool {
        self.is_first || self.is_last
    }
}

/// A calendar range excluded from normal scheduling. Not row-scoped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlackoutPeriod {
    pub id: Uuid,
    pub title: String,
    pub range: TimeRange,
}

impl BlackoutPeriod {
    pub fn new(title: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            range: TimeRange::new(start, end),
        }
    }
}

/// What kind of entity a gesture or commit refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubjectKind {
    Item,
    Marker,
    Blackout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuous_item_extends_to_viewport_end() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let vp_end = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let item = TimelineItem::new_continuous("Retainer", Uuid::nil(), start);
        assert_eq!(item.effective_range(vp_end), TimeRange::new(start, vp_end));
    }

    #[test]
    fn continuous_item_starting_after_viewport_stays_ordered() {
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let vp_end = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let item = TimelineItem::new_continuous("Later", Uuid::nil(), start);
        assert_eq!(item.effective_range(vp_end), TimeRange::day(start));
    }
}
