use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::item::{BlackoutPeriod, BoundaryKind, SubPhaseMarker, SubjectKind, TimelineItem};
use super::range::TimeRange;

/// The final placement of one entity, handed to whoever persists it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub id: Uuid,
    pub kind: SubjectKind,
    pub final_range: TimeRange,
}

/// A named lane that work items are placed on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: Uuid,
    pub name: String,
}

impl Track {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// A timeline document: work items, their phase markers and blackout periods.
///
/// The engine only ever reads this; [`Schedule::apply_commit`] is for the
/// persistence side once a gesture has been committed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub name: String,
    #[serde(default)]
    pub tracks: Vec<Track>,
    pub items: Vec<TimelineItem>,
    #[serde(default)]
    pub markers: Vec<SubPhaseMarker>,
    #[serde(default)]
    pub blackouts: Vec<BlackoutPeriod>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            name: "Untitled Timeline".to_string(),
            tracks: Vec::new(),
            items: Vec::new(),
            markers: Vec::new(),
            blackouts: Vec::new(),
            created: Utc::now(),
            modified: Utc::now(),
        }
    }
}

impl Schedule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Touch the modified timestamp.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }

    pub fn item(&self, id: Uuid) -> Option<&TimelineItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn marker(&self, id: Uuid) -> Option<&SubPhaseMarker> {
        self.markers.iter().find(|m| m.id == id)
    }

    pub fn blackout(&self, id: Uuid) -> Option<&BlackoutPeriod> {
        self.blackouts.iter().find(|b| b.id == id)
    }

    /// Items sharing the given track, in stored order.
    pub fn items_on_track(&self, row_id: Uuid) -> impl Iterator<Item = &TimelineItem> {
        self.items.iter().filter(move |i| i.row_id == row_id)
    }

    /// Markers nested in an item, ordered by boundary date.
    pub fn markers_of(&self, item_id: Uuid) -> Vec<&SubPhaseMarker> {
        let mut markers: Vec<_> = self
            .markers
            .iter()
            .filter(|m| m.parent_item_id == item_id)
            .collect();
        markers.sort_by_key(|m| m.boundary_date);
        markers
    }

    pub fn track(&self, id: Uuid) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    /// Id of the track called `name` (case-insensitive), adding it if missing.
    pub fn track_named(&mut self, name: &str) -> Uuid {
        let name = name.trim();
        if let Some(t) = self.tracks.iter().find(|t| t.name.eq_ignore_ascii_case(name)) {
            return t.id;
        }
        let track = Track::new(name);
        let id = track.id;
        self.tracks.push(track);
        id
    }

    /// Declared tracks first, then any track only referenced by an item.
    pub fn track_ids(&self) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> = self.tracks.iter().map(|t| t.id).collect();
        for item in &self.items {
            if !ids.contains(&item.row_id) {
                ids.push(item.row_id);
            }
        }
        ids
    }

    /// Recompute `is_first`/`is_last` for every marker sequence.
    pub fn refresh_marker_flags(&mut self) {
        let parents: Vec<Uuid> = self.items.iter().map(|i| i.id).collect();
        for parent in parents {
            let mut idx: Vec<usize> = (0..self.markers.len())
                .filter(|&i| self.markers[i].parent_item_id == parent)
                .collect();
            idx.sort_by_key(|&i| self.markers[i].boundary_date);
            let count = idx.len();
            for (pos, &i) in idx.iter().enumerate() {
                self.markers[i].is_first = pos == 0;
                self.markers[i].is_last = pos + 1 == count;
            }
        }
    }

    /// Write a committed range back. Returns false when the id is unknown.
    pub fn apply_commit(&mut self, record: &CommitRecord) -> bool {
        let applied = match record.kind {
            SubjectKind::Item => self
                .items
                .iter_mut()
                .find(|i| i.id == record.id)
                .map(|i| {
                    i.range.start = record.final_range.start;
                    if !i.continuous {
                        i.range.end = record.final_range.end;
                    } else {
                        i.range.end = record.final_range.start;
                    }
                })
                .is_some(),
            SubjectKind::Marker => self
                .markers
                .iter_mut()
                .find(|m| m.id == record.id)
                .map(|m| m.boundary_date = record.final_range.start)
                .is_some(),
            SubjectKind::Blackout => self
                .blackouts
                .iter_mut()
                .find(|b| b.id == record.id)
                .map(|b| b.range = record.final_range)
                .is_some(),
        };
        if applied {
            self.touch();
        }
        applied
    }

    /// Remove an item together with its markers.
    pub fn remove_item(&mut self, id: Uuid) {
        self.items.retain(|i| i.id != id);
        self.markers.retain(|m| m.parent_item_id != id);
        self.touch();
    }

    /// Add a phase marker to an item, clamped into its span. `None` when the
    /// item is unknown.
    pub fn add_marker(&mut self, item_id: Uuid, name: impl Into<String>, date: NaiveDate) -> Option<Uuid> {
        let item = self.item(item_id)?;
        let mut date = date.max(item.range.start);
        if !item.continuous {
            date = date.min(item.range.end);
        }
        let kind = if !item.continuous && date == item.range.end {
            BoundaryKind::End
        } else {
            BoundaryKind::Start
        };
        let marker = SubPhaseMarker::new(item_id, name, date, kind);
        let id = marker.id;
        self.markers.push(marker);
        self.refresh_marker_flags();
        self.touch();
        Some(id)
    }

    pub fn remove_marker(&mut self, id: Uuid) {
        self.markers.retain(|m| m.id != id);
        self.refresh_marker_flags();
        self.touch();
    }

    pub fn remove_blackout(&mut self, id: Uuid) {
        self.blackouts.retain(|b| b.id != id);
        self.touch();
    }

    /// Earliest start and latest end over items and blackouts.
    pub fn bounds(&self) -> Option<TimeRange> {
        let ranges = self
            .items
            .iter()
            .map(|i| i.range)
            .chain(self.blackouts.iter().map(|b| b.range));
        ranges.reduce(|acc, r| TimeRange::new(acc.start.min(r.start), acc.end.max(r.end)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    #[test]
    fn marker_flags_follow_date_order() {
        let mut s = Schedule::new("t");
        let item = TimelineItem::new("Build", Uuid::new_v4(), d(1, 1), d(1, 31));
        let item_id = item.id;
        s.items.push(item);
        s.markers.push(SubPhaseMarker::new(item_id, "b", d(1, 15), BoundaryKind::Start));
        s.markers.push(SubPhaseMarker::new(item_id, "a", d(1, 1), BoundaryKind::Start));
        s.markers.push(SubPhaseMarker::new(item_id, "c", d(1, 31), BoundaryKind::End));
        s.refresh_marker_flags();

        let ordered = s.markers_of(item_id);
        assert!(ordered[0].is_first && !ordered[0].is_last);
        assert!(!ordered[1].is_first && !ordered[1].is_last);
        assert!(ordered[2].is_last);
    }

    #[test]
    fn apply_commit_updates_matching_entity() {
        let mut s = Schedule::new("t");
        let b = BlackoutPeriod::new("Holiday", d(1, 10), d(1, 12));
        let id = b.id;
        s.blackouts.push(b);
        let record = CommitRecord {
            id,
            kind: SubjectKind::Blackout,
            final_range: TimeRange::new(d(1, 9), d(1, 10)),
        };
        assert!(s.apply_commit(&record));
        assert_eq!(s.blackout(id).unwrap().range, record.final_range);
        assert!(!s.apply_commit(&CommitRecord { id: Uuid::nil(), ..record }));
    }

    #[test]
    fn added_markers_are_clamped_and_flagged() {
        let mut s = Schedule::new("t");
        let item = TimelineItem::new("Build", Uuid::new_v4(), d(1, 1), d(1, 31));
        let item_id = item.id;
        s.items.push(item);
        let late = s.add_marker(item_id, "Late", d(3, 1)).unwrap();
        let early = s.add_marker(item_id, "Early", d(1, 5)).unwrap();
        assert_eq!(s.marker(late).unwrap().boundary_date, d(1, 31));
        assert!(s.marker(early).unwrap().is_first);
        assert!(s.marker(late).unwrap().is_last);

        s.remove_marker(late);
        assert!(s.marker(early).unwrap().is_last);
        assert_eq!(s.add_marker(Uuid::nil(), "x", d(1, 1)), None);
    }

    #[test]
    fn tracks_are_found_by_name() {
        let mut s = Schedule::new("t");
        let a = s.track_named("Design");
        let b = s.track_named(" design ");
        assert_eq!(a, b);
        assert_ne!(s.track_named("Build"), a);
        let stray = Uuid::new_v4();
        s.items.push(TimelineItem::new("X", stray, d(1, 1), d(1, 2)));
        assert_eq!(s.track_ids(), vec![a, s.tracks[1].id, stray]);
    }

    #[test]
    fn bounds_cover_items_and_blackouts() {
        let mut s = Schedule::new("t");
        s.items.push(TimelineItem::new("A", Uuid::nil(), d(2, 1), d(2, 10)));
        s.blackouts.push(BlackoutPeriod::new("H", d(1, 20), d(1, 21)));
        assert_eq!(s.bounds(), Some(TimeRange::new(d(1, 20), d(2, 10))));
    }
}
