pub mod item;
pub mod range;
pub mod schedule;
pub mod timeline;
pub mod week_overrides;

pub use item::{
    BlackoutPeriod, BoundaryKind, SubPhaseMarker, SubjectKind, TimelineItem, DEFAULT_ITEM_COLOR, ITEM_PALETTE,
};
pub use range::{gap_days, TimeRange};
pub use schedule::{CommitRecord, Schedule, Track};
pub use timeline::{ViewMode, Viewport};
pub use week_overrides::{WeekKey, WeekOverrides};
