use std::path::Path;

use log::info;

use crate::error::StoreError;
use crate::model::Schedule;

/// Save a schedule to a pretty-printed JSON file.
pub fn save_schedule(schedule: &Schedule, path: &Path) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(schedule)?;
    std::fs::write(path, json)?;
    info!("saved '{}' to {}", schedule.name, path.display());
    Ok(())
}

/// Load a schedule from a JSON file. Marker first/last flags are recomputed.
pub fn load_schedule(path: &Path) -> Result<Schedule, StoreError> {
    let json = std::fs::read_to_string(path)?;
    let mut schedule: Schedule = serde_json::from_str(&json)?;
    schedule.refresh_marker_flags();
    info!(
        "loaded '{}' from {} ({} items, {} blackouts)",
        schedule.name,
        path.display(),
        schedule.items.len(),
        schedule.blackouts.len()
    );
    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlackoutPeriod, BoundaryKind, SubPhaseMarker, TimelineItem};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    #[test]
    fn schedule_survives_a_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");

        let mut s = Schedule::new("Release plan");
        let track = s.track_named("Platform");
        let item = TimelineItem::new("Build", track, d(3, 1), d(3, 20));
        let item_id = item.id;
        s.items.push(item);
        s.items.push(TimelineItem::new_continuous("Support", track, d(4, 1)));
        s.markers.push(SubPhaseMarker::new(item_id, "Kickoff", d(3, 1), BoundaryKind::Start));
        s.markers.push(SubPhaseMarker::new(item_id, "QA", d(3, 12), BoundaryKind::Start));
        s.blackouts.push(BlackoutPeriod::new("Easter", d(4, 18), d(4, 21)));

        save_schedule(&s, &path).unwrap();
        let loaded = load_schedule(&path).unwrap();
        assert_eq!(loaded.items, s.items);
        assert_eq!(loaded.tracks, s.tracks);
        assert_eq!(loaded.blackouts, s.blackouts);
        let markers = loaded.markers_of(item_id);
        assert!(markers[0].is_first);
        assert!(markers[1].is_last);
    }

    #[test]
    fn garbage_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_schedule(&path), Err(StoreError::Json(_))));
        assert!(matches!(
            load_schedule(&dir.path().join("missing.json")),
            Err(StoreError::Io(_))
        ));
    }
}
