//! Calendar geometry and the direct-manipulation engine.
//!
//! Everything here reads a [`Schedule`](crate::model::Schedule) snapshot and
//! returns values; committing and drawing are left to the caller.

pub mod autoscroll;
pub mod blackout;
pub mod conflict;
pub mod gesture;
pub mod grid;
pub mod rows;
pub mod transform;

pub use autoscroll::{AutoScrollDecision, AutoScroller, ScrollDirection, ViewportBounds};
pub use blackout::{check_blackout, BlackoutCheck, BlackoutConflict};
pub use conflict::{detect_conflicts, resolve, ConflictReport, Resolution, ResolveStrategy, TrackEntry};
pub use gesture::{
    transition, CancelReason, CancellationToken, Effect, Gesture, GestureAction, GestureContext, GestureController,
    GestureEvent, GestureState, GestureTarget,
};
pub use grid::{build_columns, Column};
pub use rows::{arrange_rows, RowLayout};
pub use transform::{date_range_to_pixels, item_to_pixels, pixel_to_date, BarGeometry, PointerHit};
