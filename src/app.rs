use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{Duration, NaiveDate};
use log::{info, warn};
use uuid::Uuid;

use timeline_planner::config::EngineConfig;
use timeline_planner::engine::blackout::{self, BlackoutCheck};
use timeline_planner::engine::gesture::ConflictPreview;
use timeline_planner::engine::{
    arrange_rows, grid, CancellationToken, Effect, GestureContext, GestureController, GestureTarget, ScrollDirection, ViewportBounds,
};
use timeline_planner::io;
use timeline_planner::model::{
    BlackoutPeriod, Schedule, SubjectKind, TimeRange, TimelineItem, ViewMode, Viewport, WeekKey, WeekOverrides,
    ITEM_PALETTE,
};

use crate::ui;

/// Seconds between auto-scroll steps while the pointer rests near an edge.
const AUTOSCROLL_INTERVAL: f64 = 0.12;

/// What the operator has picked on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub id: Uuid,
    pub kind: SubjectKind,
}

/// A blackout waiting for the operator to accept the suggested range.
#[derive(Debug, Clone)]
pub struct PendingBlackout {
    /// `None` for a period that does not exist yet.
    pub id: Option<Uuid>,
    pub title: String,
    pub check: BlackoutCheck,
}

/// Create-by-drag state in the blackout lane.
#[derive(Debug, Clone, Copy)]
pub struct BlackoutDraft {
    pub anchor_px: i32,
    pub range: Option<TimeRange>,
}

#[derive(Debug, Clone)]
struct AutoScrollRepeat {
    direction: ScrollDirection,
    token: CancellationToken,
    last_step: f64,
}

/// Pointer and menu input gathered while drawing the timeline.
#[derive(Debug, Clone)]
pub enum ViewEvent {
    PointerDown { target: GestureTarget, px: i32, at_ms: u64 },
    PointerMove { px: i32, at_ms: u64 },
    PointerUp { px: i32, at_ms: u64 },
    CancelGesture,
    DraftStart { px: i32 },
    DraftMove { px: i32 },
    DraftEnd,
    ToggleWeek(NaiveDate),
    AddMarker { item_id: Uuid, date: NaiveDate },
    Delete(Selection),
    ClearSelection,
    OpenAddItem { track: Option<Uuid>, date: Option<NaiveDate> },
    OpenAddBlackout,
}

/// Form fields of the add dialogs.
pub struct DialogState {
    pub show_add_item: bool,
    pub item_name: String,
    pub item_track: String,
    pub item_start: NaiveDate,
    pub item_end: NaiveDate,
    pub item_continuous: bool,

    pub show_add_blackout: bool,
    pub blackout_title: String,
    pub blackout_start: NaiveDate,
    pub blackout_end: NaiveDate,

    pub show_about: bool,
    pub show_csv_help: bool,
}

impl DialogState {
    fn new(today: NaiveDate) -> Self {
        Self {
            show_add_item: false,
            item_name: String::new(),
            item_track: String::new(),
            item_start: today,
            item_end: today + Duration::days(7),
            item_continuous: false,
            show_add_blackout: false,
            blackout_title: String::new(),
            blackout_start: today,
            blackout_end: today,
            show_about: false,
            show_csv_help: false,
        }
    }
}

/// Main application state.
pub struct TimelineApp {
    pub schedule: Schedule,
    pub viewport: Viewport,
    pub file_path: Option<PathBuf>,
    pub config: EngineConfig,
    pub gestures: GestureController,
    /// Live ranges of whatever the active gesture is moving.
    pub overlay: HashMap<Uuid, TimeRange>,
    pub preview: Option<ConflictPreview>,
    pub highlighted_weeks: WeekOverrides<bool>,
    pub selected: Option<Selection>,
    pub draft: Option<BlackoutDraft>,
    pub pending_blackout: Option<PendingBlackout>,
    pub dialogs: DialogState,
    pub status_message: String,
    autoscroll: Option<AutoScrollRepeat>,
    last_pointer_px: i32,
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl TimelineApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: EngineConfig) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let schedule = Self::sample_schedule();
        let start = schedule.bounds().map(|b| b.start).unwrap_or_else(today) - Duration::days(7);

        Self {
            viewport: Viewport::new(start, start + Duration::days(60), ViewMode::Days),
            schedule,
            file_path: None,
            config,
            gestures: GestureController::new(),
            overlay: HashMap::new(),
            preview: None,
            highlighted_weeks: WeekOverrides::new(),
            selected: None,
            draft: None,
            pending_blackout: None,
            dialogs: DialogState::new(today()),
            status_message: "Ready".to_string(),
            autoscroll: None,
            last_pointer_px: 0,
        }
    }

    /// Generate a sample schedule for demonstration.
    fn sample_schedule() -> Schedule {
        let today = today();
        let days = Duration::days;
        let mut s = Schedule::new("Sample Timeline");

        let platform = s.track_named("Platform");
        let web = s.track_named("Web");
        let ops = s.track_named("Operations");

        let mut design = TimelineItem::new("API design", platform, today - days(4), today + days(6));
        design.color = ITEM_PALETTE[0];
        let mut build = TimelineItem::new("Backend build", platform, today + days(9), today + days(30));
        build.color = ITEM_PALETTE[1];
        let mut ui_work = TimelineItem::new("Frontend", web, today + days(2), today + days(24));
        ui_work.color = ITEM_PALETTE[2];
        let mut support = TimelineItem::new_continuous("On-call rotation", ops, today + days(10));
        support.color = ITEM_PALETTE[3];

        let build_id = build.id;
        s.items = vec![design, build, ui_work, support];
        s.add_marker(build_id, "Kickoff", today + days(9));
        s.add_marker(build_id, "Integration", today + days(18));
        s.add_marker(build_id, "Hardening", today + days(24));
        s.add_marker(build_id, "Done", today + days(30));

        s.blackouts.push(BlackoutPeriod::new("Team offsite", today + days(14), today + days(15)));
        s
    }

    // --- File operations ---

    pub fn new_schedule(&mut self) {
        self.reset_interaction();
        self.schedule = Schedule::default();
        self.file_path = None;
        self.status_message = "New timeline created".to_string();
    }

    pub fn open_schedule(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Timeline", &["timeline.json", "json"])
            .pick_file()
        {
            match io::load_schedule(&path) {
                Ok(schedule) => {
                    self.reset_interaction();
                    self.schedule = schedule;
                    self.file_path = Some(path);
                    self.recalculate_viewport();
                    self.status_message = "Timeline loaded".to_string();
                }
                Err(e) => {
                    warn!("failed to load {}: {e}", path.display());
                    self.status_message = format!("Error loading: {}", e);
                }
            }
        }
    }

    pub fn save_schedule(&mut self) {
        if let Some(path) = self.file_path.clone() {
            self.write_to(&path);
        } else {
            self.save_schedule_as();
        }
    }

    pub fn save_schedule_as(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Timeline", &["timeline.json", "json"])
            .set_file_name(format!("{}.timeline.json", self.schedule.name))
            .save_file()
        {
            self.file_path = Some(path.clone());
            self.write_to(&path);
        }
    }

    fn write_to(&mut self, path: &std::path::Path) {
        self.schedule.touch();
        match io::save_schedule(&self.schedule, path) {
            Ok(()) => self.status_message = "Timeline saved".to_string(),
            Err(e) => {
                warn!("failed to save {}: {e}", path.display());
                self.status_message = format!("Error saving: {}", e);
            }
        }
    }

    pub fn import_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv", "txt"])
            .pick_file()
        else {
            return;
        };
        match io::import_items(&path, &self.schedule.tracks) {
            Ok(import) => {
                let count = import.items.len();
                for track in import.tracks {
                    if self.schedule.track(track.id).is_none() {
                        self.schedule.tracks.push(track);
                    }
                }
                self.schedule.items.extend(import.items);
                self.schedule.touch();
                self.recalculate_viewport();
                self.status_message = if import.skipped > 0 {
                    format!("Imported {} items ({} rows skipped)", count, import.skipped)
                } else {
                    format!("Imported {} items", count)
                };
            }
            Err(e) => {
                warn!("CSV import from {} failed: {e}", path.display());
                self.status_message = format!("CSV import failed: {}", e);
            }
        }
    }

    pub fn export_csv(&mut self) {
        if self.schedule.items.is_empty() {
            self.status_message = "Nothing to export: the timeline has no items".to_string();
            return;
        }
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(format!("{}.csv", self.schedule.name))
            .save_file()
        {
            match io::export_items(&self.schedule, &path) {
                Ok(count) => self.status_message = format!("Exported {} items to CSV", count),
                Err(e) => self.status_message = format!("CSV export failed: {}", e),
            }
        }
    }

    // --- Navigation ---

    pub fn set_mode(&mut self, mode: ViewMode) {
        if self.viewport.mode != mode && !self.gestures.is_active() {
            self.viewport.mode = mode;
        }
    }

    /// Shift the window by whole columns.
    pub fn navigate(&mut self, columns: i64) {
        let step = grid::days_per_column(self.viewport.mode) * columns;
        self.viewport.scroll_days(step);
    }

    pub fn go_to_today(&mut self) {
        self.viewport.jump_to(today() - Duration::days(3));
    }

    /// Size the date window so its columns fill `width_px`.
    pub fn fit_viewport(&mut self, width_px: f32) {
        let columns = (width_px / grid::column_width(self.viewport.mode) as f32).ceil().max(1.0) as i64;
        let days = columns * grid::days_per_column(self.viewport.mode);
        self.viewport.end = self.viewport.grid_origin() + Duration::days(days - 1);
    }

    fn recalculate_viewport(&mut self) {
        if let Some(bounds) = self.schedule.bounds() {
            self.viewport.jump_to(bounds.start - Duration::days(7));
        }
    }

    // --- Editing ---

    pub fn open_add_item(&mut self, track: Option<Uuid>, date: Option<NaiveDate>) {
        let start = date.unwrap_or_else(today);
        self.dialogs.item_name.clear();
        self.dialogs.item_track = track
            .and_then(|t| self.schedule.track(t))
            .map(|t| t.name.clone())
            .unwrap_or_default();
        self.dialogs.item_start = start;
        self.dialogs.item_end = start + Duration::days(7);
        self.dialogs.item_continuous = false;
        self.dialogs.show_add_item = true;
    }

    pub fn open_add_blackout(&mut self, range: Option<TimeRange>) {
        let range = range.unwrap_or_else(|| TimeRange::day(today()));
        self.dialogs.blackout_title.clear();
        self.dialogs.blackout_start = range.start;
        self.dialogs.blackout_end = range.end;
        self.dialogs.show_add_blackout = true;
    }

    /// Add the item described by the dialog. An item that fits no existing
    /// row of its track opens a new one.
    pub fn create_item_from_dialog(&mut self) {
        let d = &self.dialogs;
        let name = if d.item_name.trim().is_empty() {
            "New item".to_string()
        } else {
            d.item_name.trim().to_string()
        };
        let track_name = match d.item_track.trim() {
            "" => io::csv_import::DEFAULT_TRACK_NAME.to_string(),
            t => t.to_string(),
        };
        let (start, end, continuous) = (d.item_start, d.item_end.max(d.item_start), d.item_continuous);

        let row_id = self.schedule.track_named(&track_name);
        let mut item = if continuous {
            TimelineItem::new_continuous(name, row_id, start)
        } else {
            TimelineItem::new(name, row_id, start, end)
        };
        item.color = ITEM_PALETTE[self.schedule.items.len() % ITEM_PALETTE.len()];

        let track_items: Vec<TimelineItem> = self.schedule.items_on_track(row_id).cloned().collect();
        let layout = arrange_rows(&track_items, self.config.min_gap_days);
        self.status_message = match layout.free_row_for(item.range, item.continuous, None) {
            Some(_) => format!("Added '{}'", item.name),
            None if layout.is_empty() => format!("Added '{}'", item.name),
            None => format!("Added '{}' on a new row of '{}'", item.name, track_name),
        };

        info!("added item {} on track '{}'", item.id, track_name);
        self.selected = Some(Selection {
            id: item.id,
            kind: SubjectKind::Item,
        });
        self.schedule.items.push(item);
        self.schedule.touch();
        self.dialogs.show_add_item = false;
    }

    pub fn create_blackout_from_dialog(&mut self) {
        let title = match self.dialogs.blackout_title.trim() {
            "" => "Blackout".to_string(),
            t => t.to_string(),
        };
        let range = TimeRange::new(self.dialogs.blackout_start, self.dialogs.blackout_end);
        self.dialogs.show_add_blackout = false;
        self.place_blackout(None, title, range);
    }

    /// Write a new or edited blackout, or ask first when it overlaps another.
    fn place_blackout(&mut self, id: Option<Uuid>, title: String, range: TimeRange) {
        let check = blackout::check_blackout(id, range, &self.schedule.blackouts, self.config.blackout_min_gap_days);
        if check.has_conflict {
            self.pending_blackout = Some(PendingBlackout { id, title, check });
            return;
        }
        self.write_blackout(id, title, range);
    }

    fn write_blackout(&mut self, id: Option<Uuid>, title: String, range: TimeRange) {
        match id.and_then(|id| self.schedule.blackouts.iter_mut().find(|b| b.id == id)) {
            Some(existing) => {
                existing.range = range;
                self.status_message = format!("Moved blackout '{}' to {}", existing.title, fmt_range(&range));
            }
            None => {
                let period = BlackoutPeriod::new(title, range.start, range.end);
                self.status_message = format!("Added blackout '{}' ({})", period.title, fmt_range(&range));
                self.selected = Some(Selection {
                    id: period.id,
                    kind: SubjectKind::Blackout,
                });
                self.schedule.blackouts.push(period);
            }
        }
        self.schedule.touch();
    }

    pub fn accept_blackout_suggestion(&mut self) {
        if let Some(pending) = self.pending_blackout.take() {
            if let Some(range) = pending.check.suggestion {
                self.write_blackout(pending.id, pending.title, range);
            }
        }
    }

    pub fn discard_blackout(&mut self) {
        if let Some(pending) = self.pending_blackout.take() {
            self.status_message = format!("Kept blackouts unchanged ('{}' discarded)", pending.title);
        }
    }

    pub fn add_marker(&mut self, item_id: Uuid, date: NaiveDate) {
        let n = self.schedule.markers_of(item_id).len() + 1;
        if let Some(id) = self.schedule.add_marker(item_id, format!("Phase {n}"), date) {
            self.selected = Some(Selection {
                id,
                kind: SubjectKind::Marker,
            });
            self.status_message = format!("Added phase marker on {}", date.format("%d %b %Y"));
        }
    }

    pub fn delete(&mut self, sel: Selection) {
        match sel.kind {
            SubjectKind::Item => self.schedule.remove_item(sel.id),
            SubjectKind::Marker => self.schedule.remove_marker(sel.id),
            SubjectKind::Blackout => self.schedule.remove_blackout(sel.id),
        }
        if self.selected == Some(sel) {
            self.selected = None;
        }
        self.status_message = "Deleted".to_string();
    }

    fn reset_interaction(&mut self) {
        self.gestures = GestureController::new();
        self.overlay.clear();
        self.preview = None;
        self.autoscroll = None;
        self.draft = None;
        self.selected = None;
        self.pending_blackout = None;
    }

    // --- Gesture plumbing ---

    /// Feed timeline input through the engine and act on what comes back.
    pub fn handle_view_events(&mut self, events: Vec<ViewEvent>, bounds: ViewportBounds) {
        for event in events {
            let ctx = GestureContext {
                schedule: &self.schedule,
                viewport: &self.viewport,
                bounds,
                config: &self.config,
            };
            let effects = match event {
                ViewEvent::PointerDown { target, px, at_ms } => {
                    self.last_pointer_px = px;
                    self.gestures.pointer_down(target, px, at_ms, &ctx)
                }
                ViewEvent::PointerMove { px, at_ms } => {
                    self.last_pointer_px = px;
                    let effects = self.gestures.pointer_move(px, at_ms, &ctx);
                    if !effects.iter().any(|e| matches!(e, Effect::AutoScroll(_))) {
                        self.autoscroll = None;
                    }
                    effects
                }
                ViewEvent::PointerUp { px, at_ms } => self.gestures.pointer_up(px, at_ms, &ctx),
                ViewEvent::CancelGesture => self.gestures.cancel(&ctx),
                other => {
                    self.handle_view_action(other);
                    Vec::new()
                }
            };
            self.apply_effects(effects);
        }
    }

    fn handle_view_action(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::DraftStart { px } => {
                let occupied = blackout::occupied_dates(&self.schedule.blackouts, None);
                let range = blackout::draft_range(px, px, &self.viewport, &occupied);
                self.draft = range.map(|r| BlackoutDraft {
                    anchor_px: px,
                    range: Some(r),
                });
            }
            ViewEvent::DraftMove { px } => {
                if let Some(draft) = self.draft.as_mut() {
                    let occupied = blackout::occupied_dates(&self.schedule.blackouts, None);
                    draft.range = blackout::draft_range(draft.anchor_px, px, &self.viewport, &occupied);
                }
            }
            ViewEvent::DraftEnd => {
                if let Some(range) = self.draft.take().and_then(|d| d.range) {
                    self.open_add_blackout(Some(range));
                }
            }
            ViewEvent::ToggleWeek(date) => {
                let key = WeekKey::of(date);
                let on = self.highlighted_weeks.toggle(key);
                self.status_message = format!("Week {key} {}", if on { "highlighted" } else { "cleared" });
            }
            ViewEvent::AddMarker { item_id, date } => self.add_marker(item_id, date),
            ViewEvent::Delete(sel) => self.delete(sel),
            ViewEvent::ClearSelection => self.selected = None,
            ViewEvent::OpenAddItem { track, date } => self.open_add_item(track, date),
            ViewEvent::OpenAddBlackout => self.open_add_blackout(None),
            ViewEvent::PointerDown { .. }
            | ViewEvent::PointerMove { .. }
            | ViewEvent::PointerUp { .. }
            | ViewEvent::CancelGesture => {}
        }
    }

    fn apply_effects(&mut self, effects: Vec<Effect>) {
        let mut committed = 0usize;
        for effect in effects {
            match effect {
                Effect::Visual(update) => {
                    self.overlay.insert(update.id, update.range);
                }
                Effect::Preview(preview) => self.preview = Some(preview),
                Effect::AutoScroll(direction) => {
                    let same = self.autoscroll.as_ref().is_some_and(|a| a.direction == direction);
                    if !same {
                        self.autoscroll = self.gestures.gesture().map(|g| AutoScrollRepeat {
                            direction,
                            token: g.token(),
                            last_step: 0.0,
                        });
                    }
                }
                Effect::Commit(record) => {
                    if self.schedule.apply_commit(&record) {
                        committed += 1;
                        if committed == 1 {
                            self.status_message = format!("Updated to {}", fmt_range(&record.final_range));
                        }
                    }
                }
                Effect::Reject { rejection, .. } => {
                    self.status_message = format!("{} ({})", rejection.message, rejection.code.as_str());
                }
                Effect::ConfirmBlackout(confirmation) => {
                    let title = self
                        .schedule
                        .blackout(confirmation.id)
                        .map(|b| b.title.clone())
                        .unwrap_or_default();
                    self.pending_blackout = Some(PendingBlackout {
                        id: Some(confirmation.id),
                        title,
                        check: confirmation.check,
                    });
                }
                Effect::Click { id, kind } => self.selected = Some(Selection { id, kind }),
            }
        }
        if committed > 0 {
            self.schedule.refresh_marker_flags();
        }
        if !self.gestures.is_active() {
            self.overlay.clear();
            self.preview = None;
            self.autoscroll = None;
        }
    }

    /// Step the viewport while a drag rests near an edge.
    pub fn tick_autoscroll(&mut self, ctx: &egui::Context, bounds: ViewportBounds) {
        let now = ctx.input(|i| i.time);
        let Some(repeat) = self.autoscroll.as_mut() else {
            return;
        };
        if repeat.token.is_cancelled() {
            self.autoscroll = None;
            return;
        }
        ctx.request_repaint();
        if now - repeat.last_step < AUTOSCROLL_INTERVAL {
            return;
        }
        repeat.last_step = now;
        let step = grid::days_per_column(self.viewport.mode) * repeat.direction.sign();
        self.viewport.scroll_days(step);

        let at_ms = (now * 1000.0) as u64;
        self.handle_view_events(
            vec![ViewEvent::PointerMove {
                px: self.last_pointer_px,
                at_ms,
            }],
            bounds,
        );
    }
}

pub fn fmt_range(range: &TimeRange) -> String {
    if range.start == range.end {
        range.start.format("%d %b %Y").to_string()
    } else {
        format!("{} → {}", range.start.format("%d %b %Y"), range.end.format("%d %b %Y"))
    }
}

impl eframe::App for TimelineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::theme::apply_theme(ctx);

        // Handle keyboard shortcuts outside closures to avoid borrow issues
        let should_save = ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::S));
        if should_save {
            self.save_schedule();
        }
        let should_delete = ctx.input(|i| i.key_pressed(egui::Key::Delete)) && ctx.memory(|m| m.focused().is_none());
        if should_delete {
            if let Some(sel) = self.selected {
                self.delete(sel);
            }
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::STATUS_BAR_BG)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .font(ui::theme::font_status())
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "Items: {} · Blackouts: {} · {:?}",
                                self.schedule.items.len(),
                                self.schedule.blackouts.len(),
                                self.viewport.mode
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        egui::SidePanel::left("side_panel")
            .default_width(ui::theme::SIDE_PANEL_WIDTH)
            .resizable(true)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_PANEL)
                    .inner_margin(egui::Margin::same(8.0))
                    .stroke(egui::Stroke::new(1.0, ui::theme::BORDER_SUBTLE)),
            )
            .show(ctx, |ui| {
                ui::side_panel::show_side_panel(self, ui);
            });

        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| {
            ui::timeline_view::show_timeline(self, ui);
        });

        if self.dialogs.show_add_item {
            ui::dialogs::show_add_item_dialog(self, ctx);
        }
        if self.dialogs.show_add_blackout {
            ui::dialogs::show_add_blackout_dialog(self, ctx);
        }
        if self.pending_blackout.is_some() {
            ui::dialogs::show_blackout_conflict_dialog(self, ctx);
        }
        if self.dialogs.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
        if self.dialogs.show_csv_help {
            ui::dialogs::show_csv_help_dialog(self, ctx);
        }
    }
}
