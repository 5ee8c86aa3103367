//! The move/resize gesture state machine.
//!
//! One gesture at a time goes Idle -> Active -> Resolving -> Committed or
//! Cancelled. [`transition`] is a pure step from `(state, event)` to
//! `(state, effects)`; persistence, toasts and repaint requests are returned as
//! [`Effect`] values for the caller to carry out. Nothing here writes to the
//! schedule or the viewport.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{Duration, NaiveDate};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::autoscroll::{AutoScroller, ScrollDirection, ViewportBounds};
use super::blackout::{self, BlackoutCheck};
use super::conflict::{self, ResolveStrategy, TrackEntry};
use super::rows;
use super::transform;
use crate::config::EngineConfig;
use crate::error::{Rejection, RejectionCode};
use crate::model::{CommitRecord, Schedule, SubjectKind, TimeRange, TimelineItem, ViewMode, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureAction {
    /// Both boundaries shift by the same delta.
    Move,
    /// Start shifts, end is pinned.
    ResizeStart,
    /// End shifts, start is pinned.
    ResizeEnd,
}

/// What was grabbed, as the caller sees it on pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureTarget {
    pub id: Uuid,
    pub kind: SubjectKind,
    pub action: GestureAction,
}

/// Kind-specific facts captured once when a gesture starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureSubject {
    Item {
        id: Uuid,
        row_id: Uuid,
        continuous: bool,
    },
    Marker {
        id: Uuid,
        parent_id: Uuid,
        /// Span the boundary must stay strictly inside.
        parent_range: Option<TimeRange>,
    },
    Blackout {
        id: Uuid,
    },
}

impl GestureSubject {
    pub fn id(&self) -> Uuid {
        match self {
            GestureSubject::Item { id, .. }
            | GestureSubject::Marker { id, .. }
            | GestureSubject::Blackout { id } => *id,
        }
    }

    pub fn kind(&self) -> SubjectKind {
        match self {
            GestureSubject::Item { .. } => SubjectKind::Item,
            GestureSubject::Marker { .. } => SubjectKind::Marker,
            GestureSubject::Blackout { .. } => SubjectKind::Blackout,
        }
    }
}

/// Shared flag tying caller-side timers to one gesture.
///
/// Cancelled when the gesture leaves Active, whichever way it leaves.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Rc<Cell<bool>>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// A marker carried along by a gesture on its parent item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependentMarker {
    pub id: Uuid,
    pub original: NaiveDate,
    pub is_first: bool,
    pub is_last: bool,
}

/// The single piece of mutable state for an in-progress manipulation.
#[derive(Debug, Clone)]
pub struct Gesture {
    pub subject: GestureSubject,
    pub action: GestureAction,
    pub original_range: TimeRange,
    pub pointer_origin_px: i32,
    /// Date under the pointer at pointer-down.
    pub pointer_origin_date: NaiveDate,
    pub mode: ViewMode,
    pub last_day_delta: i64,
    pub last_pixel_delta: i32,
    pub started_at_ms: u64,
    pub min_duration_days: i64,
    pub dependents: Vec<DependentMarker>,
    token: CancellationToken,
}

impl Gesture {
    pub fn subject_id(&self) -> Uuid {
        self.subject.id()
    }

    pub fn subject_kind(&self) -> SubjectKind {
        self.subject.kind()
    }

    /// Handle for timers that must stop with this gesture.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Range for the current delta. Never inverts; resizes keep the minimum span.
    pub fn visual_range(&self) -> TimeRange {
        self.range_for_delta(self.last_day_delta)
    }

    fn range_for_delta(&self, delta: i64) -> TimeRange {
        let orig = self.original_range;
        let shift = Duration::days(delta);
        let min_span = Duration::days(self.min_duration_days);
        match &self.subject {
            GestureSubject::Marker { parent_range, .. } => {
                let date = clamp_inside(orig.start + shift, *parent_range).unwrap_or(orig.start);
                TimeRange::day(date)
            }
            _ => match self.action {
                GestureAction::Move => orig.shifted(delta),
                // A range already shorter than the minimum may grow but never
                // shrinks further, so the edge never runs against the pointer.
                GestureAction::ResizeStart => TimeRange {
                    start: (orig.start + shift).min((orig.end - min_span).max(orig.start)),
                    end: orig.end,
                },
                GestureAction::ResizeEnd => TimeRange {
                    start: orig.start,
                    end: (orig.end + shift).max((orig.start + min_span).min(orig.end)),
                },
            },
        }
    }

    /// Visual ranges for the subject and everything positioned by it.
    pub fn visual_updates(&self) -> Vec<VisualUpdate> {
        self.updates_for(self.visual_range())
    }

    fn updates_for(&self, subject_range: TimeRange) -> Vec<VisualUpdate> {
        let mut updates = vec![VisualUpdate {
            id: self.subject_id(),
            kind: self.subject_kind(),
            range: subject_range,
        }];
        updates.extend(self.dependents.iter().map(|m| VisualUpdate {
            id: m.id,
            kind: SubjectKind::Marker,
            range: TimeRange::day(self.dependent_date(m, subject_range)),
        }));
        updates
    }

    /// Where a nested marker lands when its parent takes `range`.
    fn dependent_date(&self, marker: &DependentMarker, range: TimeRange) -> NaiveDate {
        let continuous = matches!(self.subject, GestureSubject::Item { continuous: true, .. });
        let start_shift = range.start - self.original_range.start;
        if continuous {
            return marker.original + start_shift;
        }
        if marker.is_first {
            return range.start;
        }
        if marker.is_last {
            return range.end;
        }
        let date = match self.action {
            GestureAction::Move => marker.original + start_shift,
            GestureAction::ResizeStart | GestureAction::ResizeEnd => marker.original,
        };
        date.max(range.start).min(range.end)
    }
}

/// Keep `date` strictly inside `parent`, if the parent leaves any room.
fn clamp_inside(date: NaiveDate, parent: Option<TimeRange>) -> Option<NaiveDate> {
    let Some(parent) = parent else {
        return Some(date);
    };
    let lo = parent.start + Duration::days(1);
    let hi = parent.end - Duration::days(1);
    (lo <= hi).then(|| date.max(lo).min(hi))
}

/// A live, uncommitted placement for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualUpdate {
    pub id: Uuid,
    pub kind: SubjectKind,
    pub range: TimeRange,
}

/// Advisory conflict state while dragging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictPreview {
    pub subject_id: Uuid,
    pub has_conflict: bool,
    pub conflicting_ids: Vec<Uuid>,
}

/// A blackout edit that collided and waits for the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlackoutConfirmation {
    pub id: Uuid,
    pub original: TimeRange,
    pub check: BlackoutCheck,
}

/// Work for the caller, produced by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Visual(VisualUpdate),
    Preview(ConflictPreview),
    AutoScroll(ScrollDirection),
    Commit(CommitRecord),
    Reject {
        id: Uuid,
        kind: SubjectKind,
        rejection: Rejection,
    },
    ConfirmBlackout(BlackoutConfirmation),
    /// Pointer went down and up in place quickly.
    Click { id: Uuid, kind: SubjectKind },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    NoMovement,
    Explicit,
    Rejected(RejectionCode),
    AwaitingConfirmation,
}

/// The committed subject plus any markers it carried along.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub record: CommitRecord,
    pub dependents: Vec<CommitRecord>,
}

#[derive(Debug, Clone, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Active(Gesture),
    Resolving(Gesture),
    Committed(Commit),
    Cancelled(CancelReason),
}

impl GestureState {
    pub fn name(&self) -> &'static str {
        match self {
            GestureState::Idle => "idle",
            GestureState::Active(_) => "active",
            GestureState::Resolving(_) => "resolving",
            GestureState::Committed(_) => "committed",
            GestureState::Cancelled(_) => "cancelled",
        }
    }

    fn accepts_new_gesture(&self) -> bool {
        matches!(
            self,
            GestureState::Idle | GestureState::Committed(_) | GestureState::Cancelled(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    PointerDown {
        target: GestureTarget,
        pointer_px: i32,
        at_ms: u64,
    },
    PointerMove {
        pointer_px: i32,
        at_ms: u64,
    },
    PointerUp {
        pointer_px: i32,
        at_ms: u64,
    },
    /// Run the binding conflict resolution. Follows `PointerUp`.
    Resolve {
        at_ms: u64,
    },
    Cancel,
}

/// Read-only inputs a transition consults.
#[derive(Debug, Clone, Copy)]
pub struct GestureContext<'a> {
    pub schedule: &'a Schedule,
    pub viewport: &'a Viewport,
    /// Visible content area, for auto-scroll.
    pub bounds: ViewportBounds,
    pub config: &'a EngineConfig,
}

#[derive(Debug, Clone)]
pub struct Transition {
    pub state: GestureState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn stay(state: GestureState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }
}

/// Advance the state machine by one event.
pub fn transition(state: GestureState, event: GestureEvent, ctx: &GestureContext<'_>) -> Transition {
    match (state, event) {
        (state, GestureEvent::PointerDown { target, pointer_px, at_ms }) if state.accepts_new_gesture() => {
            begin(target, pointer_px, at_ms, ctx)
        }
        (GestureState::Active(g), GestureEvent::PointerDown { target, .. }) => {
            debug!("ignoring pointer-down on {} while a gesture is active", target.id);
            Transition::stay(GestureState::Active(g))
        }
        (GestureState::Active(mut g), GestureEvent::PointerMove { pointer_px, .. }) => {
            track_pointer(&mut g, pointer_px, ctx);
            let mut effects: Vec<Effect> = g.visual_updates().into_iter().map(Effect::Visual).collect();
            if let Some(preview) = preview(&g, ctx) {
                effects.push(Effect::Preview(preview));
            }
            let scroll = AutoScroller::new(ctx.config.autoscroll_margin_px).evaluate(pointer_px, ctx.bounds);
            if let (true, Some(direction)) = (scroll.should_scroll, scroll.direction) {
                effects.push(Effect::AutoScroll(direction));
            }
            Transition {
                state: GestureState::Active(g),
                effects,
            }
        }
        (GestureState::Active(mut g), GestureEvent::PointerUp { pointer_px, .. }) => {
            track_pointer(&mut g, pointer_px, ctx);
            g.token.cancel();
            debug!("gesture on {} resolving with delta {}", g.subject_id(), g.last_day_delta);
            Transition::stay(GestureState::Resolving(g))
        }
        (GestureState::Resolving(g), GestureEvent::Resolve { at_ms }) => finish(g, at_ms, ctx),
        (GestureState::Active(g) | GestureState::Resolving(g), GestureEvent::Cancel) => {
            g.token.cancel();
            debug!("gesture on {} cancelled", g.subject_id());
            cancelled(CancelReason::Explicit, restore_effects(&g))
        }
        (state, _) => Transition::stay(state),
    }
}

/// Recompute both deltas from the pointer-down position. Never accumulated.
fn track_pointer(g: &mut Gesture, pointer_px: i32, ctx: &GestureContext<'_>) {
    let date = transform::pixel_to_date(pointer_px, ctx.viewport).date;
    g.last_pixel_delta = pointer_px - g.pointer_origin_px;
    g.last_day_delta = (date - g.pointer_origin_date).num_days();
}

fn begin(target: GestureTarget, pointer_px: i32, at_ms: u64, ctx: &GestureContext<'_>) -> Transition {
    let built = match target.kind {
        SubjectKind::Item => begin_item(target, ctx),
        SubjectKind::Marker => begin_marker(target, ctx),
        SubjectKind::Blackout => ctx.schedule.blackout(target.id).map(|b| {
            Ok((GestureSubject::Blackout { id: b.id }, b.range, Vec::new()))
        }),
    };

    match built {
        None => {
            warn!("pointer-down on unknown {:?} {}", target.kind, target.id);
            Transition::stay(GestureState::Idle)
        }
        Some(Err(rejection)) => {
            info!("gesture on {} refused: {}", target.id, rejection);
            Transition {
                state: GestureState::Idle,
                effects: vec![Effect::Reject {
                    id: target.id,
                    kind: target.kind,
                    rejection,
                }],
            }
        }
        Some(Ok((subject, original_range, dependents))) => {
            let gesture = Gesture {
                subject,
                action: target.action,
                original_range,
                pointer_origin_px: pointer_px,
                pointer_origin_date: transform::pixel_to_date(pointer_px, ctx.viewport).date,
                mode: ctx.viewport.mode,
                last_day_delta: 0,
                last_pixel_delta: 0,
                started_at_ms: at_ms,
                min_duration_days: ctx.config.min_duration_days.max(1),
                dependents,
                token: CancellationToken::new(),
            };
            debug!(
                "gesture {:?} on {:?} {} from {:?}",
                gesture.action,
                gesture.subject_kind(),
                gesture.subject_id(),
                gesture.original_range
            );
            Transition::stay(GestureState::Active(gesture))
        }
    }
}

type Built = Result<(GestureSubject, TimeRange, Vec<DependentMarker>), Rejection>;

fn begin_item(target: GestureTarget, ctx: &GestureContext<'_>) -> Option<Built> {
    let item = ctx.schedule.item(target.id)?;
    if item.continuous {
        match target.action {
            GestureAction::ResizeStart => {
                return Some(Err(Rejection::locked(format!(
                    "the start of open-ended item '{}' cannot be resized",
                    item.name
                ))));
            }
            GestureAction::ResizeEnd => {
                return Some(Err(Rejection::locked(format!(
                    "open-ended item '{}' has no end to resize",
                    item.name
                ))));
            }
            GestureAction::Move => {}
        }
    }
    let original = if item.continuous {
        TimeRange::day(item.range.start)
    } else {
        item.range
    };
    let dependents = ctx
        .schedule
        .markers_of(item.id)
        .into_iter()
        .map(|m| DependentMarker {
            id: m.id,
            original: m.boundary_date,
            is_first: m.is_first,
            is_last: m.is_last,
        })
        .collect();
    Some(Ok((
        GestureSubject::Item {
            id: item.id,
            row_id: item.row_id,
            continuous: item.continuous,
        },
        original,
        dependents,
    )))
}

fn begin_marker(target: GestureTarget, ctx: &GestureContext<'_>) -> Option<Built> {
    let marker = ctx.schedule.marker(target.id)?;
    let locked = match target.action {
        GestureAction::ResizeStart => marker.is_first.then_some("first"),
        GestureAction::ResizeEnd => marker.is_last.then_some("last"),
        GestureAction::Move => marker
            .is_first
            .then_some("first")
            .or(marker.is_last.then_some("last")),
    };
    if let Some(position) = locked {
        return Some(Err(Rejection::locked(format!(
            "'{}' is the {position} phase boundary and follows its item",
            marker.name
        ))));
    }
    let parent_range = ctx.schedule.item(marker.parent_item_id).map(|p| p.range);
    Some(Ok((
        GestureSubject::Marker {
            id: marker.id,
            parent_id: marker.parent_item_id,
            parent_range,
        },
        marker.range(),
        Vec::new(),
    )))
}

/// Items sharing the subject's visual row. Items the layout stacked into
/// other rows of the same track never collide with it.
fn row_entries(g: &Gesture, row_id: Uuid, ctx: &GestureContext<'_>) -> Vec<TrackEntry> {
    let items: Vec<TimelineItem> = ctx.schedule.items_on_track(row_id).cloned().collect();
    let layout = rows::arrange_rows(&items, ctx.config.min_gap_days);
    let id = g.subject_id();
    layout
        .row_mates(id)
        .iter()
        .filter(|i| i.id != id)
        .map(|i| TrackEntry::from(*i))
        .collect()
}

fn preview(g: &Gesture, ctx: &GestureContext<'_>) -> Option<ConflictPreview> {
    let range = g.visual_range();
    let (has_conflict, conflicting_ids) = match g.subject {
        GestureSubject::Item { id, row_id, continuous } => {
            let proposed = TrackEntry::new(id, range, continuous);
            let report = conflict::detect_conflicts(
                id,
                &proposed,
                &row_entries(g, row_id, ctx),
                ctx.config.min_gap_days,
            );
            (report.has_conflict, report.conflicting.iter().map(|e| e.id).collect())
        }
        GestureSubject::Blackout { id } => {
            let check = blackout::check_blackout(
                Some(id),
                range,
                &ctx.schedule.blackouts,
                ctx.config.blackout_min_gap_days,
            );
            (check.has_conflict, check.conflicting.iter().map(|c| c.id).collect())
        }
        GestureSubject::Marker { .. } => return None,
    };
    Some(ConflictPreview {
        subject_id: g.subject_id(),
        has_conflict,
        conflicting_ids,
    })
}

fn cancelled(reason: CancelReason, effects: Vec<Effect>) -> Transition {
    Transition {
        state: GestureState::Cancelled(reason),
        effects,
    }
}

fn finish(g: Gesture, at_ms: u64, ctx: &GestureContext<'_>) -> Transition {
    let id = g.subject_id();
    let kind = g.subject_kind();

    if g.last_day_delta == 0 {
        let quick = at_ms.saturating_sub(g.started_at_ms) < ctx.config.click_max_ms;
        let still = g.last_pixel_delta.abs() < ctx.config.click_max_px;
        let effects = if quick && still {
            vec![Effect::Click { id, kind }]
        } else {
            Vec::new()
        };
        return cancelled(CancelReason::NoMovement, effects);
    }

    let visual = g.visual_range();
    let resolved = match g.subject {
        GestureSubject::Item { row_id, continuous, .. } => resolve_item(&g, visual, row_id, continuous, ctx),
        GestureSubject::Blackout { .. } => {
            let check = blackout::check_blackout(
                Some(id),
                visual,
                &ctx.schedule.blackouts,
                ctx.config.blackout_min_gap_days,
            );
            if check.has_conflict {
                info!("blackout {} overlaps {} period(s), asking for confirmation", id, check.conflicting.len());
                let mut effects = restore_effects(&g);
                effects.push(Effect::ConfirmBlackout(BlackoutConfirmation {
                    id,
                    original: g.original_range,
                    check,
                }));
                return cancelled(CancelReason::AwaitingConfirmation, effects);
            }
            Ok(visual)
        }
        GestureSubject::Marker { .. } => Ok(visual),
    };

    let final_range = match resolved {
        Ok(range) => range,
        Err(rejection) => {
            info!("gesture on {} rejected: {}", id, rejection);
            let code = rejection.code;
            let mut effects = restore_effects(&g);
            effects.push(Effect::Reject { id, kind, rejection });
            return cancelled(CancelReason::Rejected(code), effects);
        }
    };

    if final_range == g.original_range {
        return cancelled(CancelReason::NoMovement, restore_effects(&g));
    }

    let mut effects = Vec::new();
    if final_range != visual {
        // Snap to the resolved placement before handing it over.
        effects.extend(g.updates_for(final_range).into_iter().map(Effect::Visual));
    }

    let record = CommitRecord {
        id,
        kind,
        final_range,
    };
    let dependents: Vec<CommitRecord> = g
        .dependents
        .iter()
        .filter_map(|m| {
            let date = g.dependent_date(m, final_range);
            (date != m.original).then_some(CommitRecord {
                id: m.id,
                kind: SubjectKind::Marker,
                final_range: TimeRange::day(date),
            })
        })
        .collect();

    info!("committed {:?} {} to {:?}", kind, id, final_range);
    effects.push(Effect::Commit(record));
    effects.extend(dependents.iter().copied().map(Effect::Commit));
    Transition {
        state: GestureState::Committed(Commit { record, dependents }),
        effects,
    }
}

fn resolve_item(
    g: &Gesture,
    visual: TimeRange,
    row_id: Uuid,
    continuous: bool,
    ctx: &GestureContext<'_>,
) -> Result<TimeRange, Rejection> {
    let proposed = TrackEntry::new(g.subject_id(), visual, continuous);
    let report = conflict::detect_conflicts(
        g.subject_id(),
        &proposed,
        &row_entries(g, row_id, ctx),
        ctx.config.min_gap_days,
    );
    if !report.has_conflict {
        return Ok(visual);
    }
    let resolution = conflict::resolve(
        &proposed,
        &report.conflicting,
        ResolveStrategy::Adjust,
        ctx.config.min_gap_days,
    )?;
    let span = resolution.final_range.span_days();
    let required = g.min_duration_days.min(g.original_range.span_days());
    if !continuous && resolution.was_adjusted && span < required {
        return Err(Rejection::min_duration(format!(
            "making room would leave {span} day(s), below the {required}-day minimum"
        )));
    }
    Ok(resolution.final_range)
}

fn restore_effects(g: &Gesture) -> Vec<Effect> {
    g.updates_for(g.original_range)
        .into_iter()
        .map(Effect::Visual)
        .collect()
}

/// Owns the current [`GestureState`] and feeds it events.
#[derive(Debug, Default)]
pub struct GestureController {
    state: GestureState,
}

impl GestureController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, GestureState::Active(_))
    }

    /// The active gesture, if any.
    pub fn gesture(&self) -> Option<&Gesture> {
        match &self.state {
            GestureState::Active(g) | GestureState::Resolving(g) => Some(g),
            _ => None,
        }
    }

    /// Live range for `id` while the active gesture moves it.
    pub fn visual_range_of(&self, id: Uuid) -> Option<TimeRange> {
        let g = self.gesture()?;
        g.visual_updates().into_iter().find(|u| u.id == id).map(|u| u.range)
    }

    fn apply(&mut self, event: GestureEvent, ctx: &GestureContext<'_>) -> Vec<Effect> {
        let state = std::mem::take(&mut self.state);
        let from = state.name();
        let Transition { state, effects } = transition(state, event, ctx);
        if from != state.name() {
            debug!("gesture state {} -> {}", from, state.name());
        }
        self.state = state;
        effects
    }

    pub fn pointer_down(
        &mut self,
        target: GestureTarget,
        pointer_px: i32,
        at_ms: u64,
        ctx: &GestureContext<'_>,
    ) -> Vec<Effect> {
        self.apply(GestureEvent::PointerDown { target, pointer_px, at_ms }, ctx)
    }

    pub fn pointer_move(&mut self, pointer_px: i32, at_ms: u64, ctx: &GestureContext<'_>) -> Vec<Effect> {
        self.apply(GestureEvent::PointerMove { pointer_px, at_ms }, ctx)
    }

    /// Release the pointer and run resolution to completion.
    pub fn pointer_up(&mut self, pointer_px: i32, at_ms: u64, ctx: &GestureContext<'_>) -> Vec<Effect> {
        let mut effects = self.apply(GestureEvent::PointerUp { pointer_px, at_ms }, ctx);
        if matches!(self.state, GestureState::Resolving(_)) {
            effects.extend(self.apply(GestureEvent::Resolve { at_ms }, ctx));
        }
        effects
    }

    pub fn cancel(&mut self, ctx: &GestureContext<'_>) -> Vec<Effect> {
        self.apply(GestureEvent::Cancel, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlackoutPeriod, BoundaryKind, SubPhaseMarker};
    use pretty_assertions::assert_eq;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    struct Fixture {
        schedule: Schedule,
        viewport: Viewport,
        config: EngineConfig,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                schedule: Schedule::new("test"),
                viewport: Viewport::new(d(1, 1), d(3, 31), ViewMode::Days),
                config: EngineConfig::default(),
            }
        }

        fn ctx(&self) -> GestureContext<'_> {
            GestureContext {
                schedule: &self.schedule,
                viewport: &self.viewport,
                bounds: ViewportBounds { left: 0, right: 10_000 },
                config: &self.config,
            }
        }
    }

    fn px(date: NaiveDate, vp: &Viewport) -> i32 {
        transform::date_to_px(date, vp) + 10
    }

    fn target(id: Uuid, kind: SubjectKind, action: GestureAction) -> GestureTarget {
        GestureTarget { id, kind, action }
    }

    fn commits(effects: &[Effect]) -> Vec<CommitRecord> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Commit(r) => Some(*r),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn move_by_two_columns() {
        let mut fx = Fixture::new();
        let item = TimelineItem::new("A", Uuid::new_v4(), d(1, 1), d(1, 5));
        let id = item.id;
        fx.schedule.items.push(item);

        let mut c = GestureController::new();
        let ctx = fx.ctx();
        let x = px(d(1, 2), &fx.viewport);
        c.pointer_down(target(id, SubjectKind::Item, GestureAction::Move), x, 0, &ctx);
        let moved = c.pointer_move(x + 104, 50, &ctx);
        assert!(moved.contains(&Effect::Visual(VisualUpdate {
            id,
            kind: SubjectKind::Item,
            range: TimeRange::new(d(1, 3), d(1, 7)),
        })));
        assert_eq!(c.gesture().map(|g| g.last_day_delta), Some(2));

        let done = c.pointer_up(x + 104, 400, &ctx);
        assert_eq!(
            commits(&done),
            vec![CommitRecord {
                id,
                kind: SubjectKind::Item,
                final_range: TimeRange::new(d(1, 3), d(1, 7)),
            }]
        );
        assert!(matches!(c.state(), GestureState::Committed(_)));
    }

    #[test]
    fn resize_end_into_neighbour_snaps_back_to_gap() {
        let mut fx = Fixture::new();
        let row = Uuid::new_v4();
        let a = TimelineItem::new("A", row, d(1, 1), d(1, 10));
        let b = TimelineItem::new("B", row, d(1, 13), d(1, 20));
        let (a_id, b_id) = (a.id, b.id);
        fx.schedule.items.extend([a, b]);

        let mut c = GestureController::new();
        let ctx = fx.ctx();
        let x = px(d(1, 10), &fx.viewport);
        c.pointer_down(target(a_id, SubjectKind::Item, GestureAction::ResizeEnd), x, 0, &ctx);
        let live = c.pointer_move(x + 2 * 52, 20, &ctx);
        assert!(live.contains(&Effect::Preview(ConflictPreview {
            subject_id: a_id,
            has_conflict: true,
            conflicting_ids: vec![b_id],
        })));

        let done = c.pointer_up(x + 2 * 52, 300, &ctx);
        let snapped = TimeRange::new(d(1, 1), d(1, 11));
        assert!(done.contains(&Effect::Visual(VisualUpdate {
            id: a_id,
            kind: SubjectKind::Item,
            range: snapped,
        })));
        assert_eq!(commits(&done)[0].final_range, snapped);
    }

    #[test]
    fn single_day_edges_follow_the_pointer() {
        let mut fx = Fixture::new();
        let item = TimelineItem::new("A", Uuid::new_v4(), d(1, 10), d(1, 10));
        let id = item.id;
        fx.schedule.items.push(item);
        let ctx = fx.ctx();
        let x = px(d(1, 10), &fx.viewport);

        let mut c = GestureController::new();
        c.pointer_down(target(id, SubjectKind::Item, GestureAction::ResizeStart), x, 0, &ctx);
        c.pointer_move(x + 3 * 52, 50, &ctx);
        assert_eq!(c.visual_range_of(id), Some(TimeRange::day(d(1, 10))));
        c.pointer_move(x - 2 * 52, 80, &ctx);
        assert_eq!(c.visual_range_of(id), Some(TimeRange::new(d(1, 8), d(1, 10))));
        c.cancel(&ctx);

        let mut c = GestureController::new();
        c.pointer_down(target(id, SubjectKind::Item, GestureAction::ResizeEnd), x, 0, &ctx);
        c.pointer_move(x - 3 * 52, 50, &ctx);
        assert_eq!(c.visual_range_of(id), Some(TimeRange::day(d(1, 10))));
        c.pointer_move(x + 2 * 52, 80, &ctx);
        assert_eq!(c.visual_range_of(id), Some(TimeRange::new(d(1, 10), d(1, 12))));
    }

    #[test]
    fn resize_never_inverts() {
        let mut fx = Fixture::new();
        let item = TimelineItem::new("A", Uuid::new_v4(), d(1, 10), d(1, 12));
        let id = item.id;
        fx.schedule.items.push(item);

        let mut c = GestureController::new();
        let ctx = fx.ctx();
        let x = px(d(1, 10), &fx.viewport);
        c.pointer_down(target(id, SubjectKind::Item, GestureAction::ResizeStart), x, 0, &ctx);
        c.pointer_move(x + 20 * 52, 10, &ctx);
        let range = c.visual_range_of(id).unwrap();
        assert_eq!(range, TimeRange::new(d(1, 11), d(1, 12)));
    }

    #[test]
    fn first_marker_resize_start_is_locked() {
        let mut fx = Fixture::new();
        let item = TimelineItem::new("A", Uuid::new_v4(), d(1, 1), d(1, 31));
        let mut marker = SubPhaseMarker::new(item.id, "Kickoff", d(1, 1), BoundaryKind::Start);
        marker.is_first = true;
        let marker_id = marker.id;
        fx.schedule.items.push(item);
        fx.schedule.markers.push(marker);

        let mut c = GestureController::new();
        let effects = c.pointer_down(
            target(marker_id, SubjectKind::Marker, GestureAction::ResizeStart),
            10,
            0,
            &fx.ctx(),
        );
        assert!(matches!(c.state(), GestureState::Idle));
        match &effects[..] {
            [Effect::Reject { rejection, .. }] => assert_eq!(rejection.code, RejectionCode::LockedBoundary),
            other => panic!("unexpected effects {other:?}"),
        }
    }

    #[test]
    fn moving_item_carries_markers() {
        let mut fx = Fixture::new();
        let item = TimelineItem::new("A", Uuid::new_v4(), d(1, 1), d(1, 20));
        let item_id = item.id;
        let mid = SubPhaseMarker::new(item_id, "Build", d(1, 8), BoundaryKind::Start);
        let mid_id = mid.id;
        fx.schedule.items.push(item);
        fx.schedule.markers.push(mid);

        let mut c = GestureController::new();
        let ctx = fx.ctx();
        let x = px(d(1, 5), &fx.viewport);
        c.pointer_down(target(item_id, SubjectKind::Item, GestureAction::Move), x, 0, &ctx);
        c.pointer_move(x + 3 * 52, 30, &ctx);
        assert_eq!(c.visual_range_of(mid_id), Some(TimeRange::day(d(1, 11))));
        let done = c.pointer_up(x + 3 * 52, 300, &ctx);
        assert_eq!(commits(&done).len(), 2);
    }

    #[test]
    fn quick_release_in_place_is_a_click() {
        let mut fx = Fixture::new();
        let item = TimelineItem::new("A", Uuid::new_v4(), d(1, 1), d(1, 5));
        let id = item.id;
        fx.schedule.items.push(item);

        let mut c = GestureController::new();
        let ctx = fx.ctx();
        c.pointer_down(target(id, SubjectKind::Item, GestureAction::Move), 30, 1000, &ctx);
        let effects = c.pointer_up(31, 1100, &ctx);
        assert_eq!(effects, vec![Effect::Click { id, kind: SubjectKind::Item }]);
        assert!(matches!(c.state(), GestureState::Cancelled(CancelReason::NoMovement)));
    }

    #[test]
    fn cancel_restores_and_releases_token() {
        let mut fx = Fixture::new();
        let item = TimelineItem::new("A", Uuid::new_v4(), d(1, 1), d(1, 5));
        let id = item.id;
        let original = item.range;
        fx.schedule.items.push(item);

        let mut c = GestureController::new();
        let ctx = fx.ctx();
        c.pointer_down(target(id, SubjectKind::Item, GestureAction::Move), 30, 0, &ctx);
        let token = c.gesture().unwrap().token();
        c.pointer_move(300, 10, &ctx);
        assert!(!token.is_cancelled());
        let effects = c.cancel(&ctx);
        assert!(token.is_cancelled());
        assert_eq!(
            effects,
            vec![Effect::Visual(VisualUpdate { id, kind: SubjectKind::Item, range: original })]
        );
        assert_eq!(c.visual_range_of(id), None);
    }

    #[test]
    fn blackout_overlap_asks_for_confirmation() {
        let mut fx = Fixture::new();
        let fixed = BlackoutPeriod::new("Winter break", d(1, 11), d(1, 13));
        let moving = BlackoutPeriod::new("Offsite", d(1, 5), d(1, 7));
        let moving_id = moving.id;
        fx.schedule.blackouts.extend([fixed, moving]);

        let mut c = GestureController::new();
        let ctx = fx.ctx();
        let x = px(d(1, 5), &fx.viewport);
        c.pointer_down(target(moving_id, SubjectKind::Blackout, GestureAction::Move), x, 0, &ctx);
        let effects = c.pointer_up(x + 5 * 52, 500, &ctx);
        assert!(commits(&effects).is_empty());
        let confirmation = effects
            .iter()
            .find_map(|e| match e {
                Effect::ConfirmBlackout(c) => Some(c.clone()),
                _ => None,
            })
            .expect("confirmation effect");
        assert_eq!(confirmation.check.suggestion, Some(TimeRange::new(d(1, 10), d(1, 10))));
        assert!(matches!(c.state(), GestureState::Cancelled(CancelReason::AwaitingConfirmation)));
    }

    #[test]
    fn pointer_down_while_active_is_ignored() {
        let mut fx = Fixture::new();
        let a = TimelineItem::new("A", Uuid::new_v4(), d(1, 1), d(1, 5));
        let b = TimelineItem::new("B", Uuid::new_v4(), d(2, 1), d(2, 5));
        let (a_id, b_id) = (a.id, b.id);
        fx.schedule.items.extend([a, b]);

        let mut c = GestureController::new();
        let ctx = fx.ctx();
        c.pointer_down(target(a_id, SubjectKind::Item, GestureAction::Move), 30, 0, &ctx);
        let effects = c.pointer_down(target(b_id, SubjectKind::Item, GestureAction::Move), 900, 5, &ctx);
        assert!(effects.is_empty());
        assert_eq!(c.gesture().map(|g| g.subject_id()), Some(a_id));
    }
}
