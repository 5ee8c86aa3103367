use chrono::{Datelike, NaiveDate};
use egui::{Color32, Id, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};
use uuid::Uuid;

use timeline_planner::engine::grid::{self, Column};
use timeline_planner::engine::transform::{self, BarGeometry};
use timeline_planner::engine::{arrange_rows, build_columns, GestureAction, GestureTarget, ViewportBounds};
use timeline_planner::model::{SubjectKind, TimeRange, TimelineItem, ViewMode, Viewport};

use crate::app::{fmt_range, Selection, TimelineApp, ViewEvent};
use crate::ui::theme;

const ROW_HEIGHT: f32 = theme::ROW_HEIGHT;
const ROW_PADDING: f32 = theme::ROW_GAP;
const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;
const LANE_HEIGHT: f32 = theme::BLACKOUT_LANE_HEIGHT;
const HANDLE_WIDTH: f32 = theme::HANDLE_WIDTH;
const MARKER_GRAB: f32 = 5.0;

/// Something the pointer can land on.
#[derive(Debug, Clone, Copy)]
enum HitKind {
    Subject(GestureTarget),
    Header,
    BlackoutLane,
    Track(Uuid),
}

#[derive(Debug, Clone, Copy)]
struct Hit {
    rect: Rect,
    kind: HitKind,
}

/// Target of the open context menu, kept in egui memory between frames.
#[derive(Debug, Clone, Copy)]
struct ContextTarget {
    kind: HitKind,
    date: NaiveDate,
}

fn context_id() -> Id {
    Id::new("timeline-context")
}

/// Render the timeline (central panel) and route its input through the engine.
pub fn show_timeline(app: &mut TimelineApp, ui: &mut Ui) {
    let available = ui.available_size();
    if !app.gestures.is_active() {
        app.fit_viewport(available.x);
    }
    let bounds = ViewportBounds {
        left: 0,
        right: available.x as i32,
    };
    app.tick_autoscroll(ui.ctx(), bounds);

    let events = egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .drag_to_scroll(false)
        .show(ui, |ui| draw_timeline(app, ui, available))
        .inner;

    app.handle_view_events(events, bounds);
}

fn draw_timeline(app: &TimelineApp, ui: &mut Ui, available: Vec2) -> Vec<ViewEvent> {
    let vp = app.viewport;
    let tracks = track_layouts(app);
    let body_rows: usize = tracks.iter().map(|t| t.rows.len().max(1)).sum();
    let chart_height = HEADER_HEIGHT
        + LANE_HEIGHT
        + tracks.len() as f32 * theme::TRACK_LABEL_HEIGHT
        + body_rows as f32 * (ROW_HEIGHT + ROW_PADDING)
        + 40.0;
    let chart_width = available.x;

    let (response, painter) = ui.allocate_painter(
        Vec2::new(chart_width, chart_height.max(available.y)),
        Sense::click_and_drag(),
    );
    let origin = response.rect.min;
    let x_of = |px: i32| origin.x + px as f32;
    let mut hits: Vec<Hit> = Vec::new();

    painter.rect_filled(response.rect, 0.0, theme::BG_DARK);

    let columns: Vec<Column> = build_columns(&vp).collect();
    draw_column_backgrounds(app, &painter, origin, &columns, response.rect.height());
    draw_timeline_header(&painter, origin, &vp, &columns, chart_width);
    hits.push(Hit {
        rect: Rect::from_min_size(origin, Vec2::new(chart_width, HEADER_HEIGHT)),
        kind: HitKind::Header,
    });

    // Blackout lane
    let lane_top = origin.y + HEADER_HEIGHT;
    let lane_rect = Rect::from_min_size(Pos2::new(origin.x, lane_top), Vec2::new(chart_width, LANE_HEIGHT));
    painter.rect_filled(lane_rect, 0.0, theme::BG_HEADER);
    painter.text(
        Pos2::new(origin.x + 4.0, lane_top + 2.0),
        egui::Align2::LEFT_TOP,
        "Blackouts",
        theme::font_small(),
        theme::TEXT_DIM,
    );
    hits.push(Hit {
        rect: lane_rect,
        kind: HitKind::BlackoutLane,
    });

    for period in &app.schedule.blackouts {
        let range = app.overlay.get(&period.id).copied().unwrap_or(period.range);
        let geo = transform::date_range_to_pixels(&range, &vp, app.config.min_bar_width_percent);
        let band = Rect::from_min_max(
            Pos2::new(x_of(geo.offset_px), lane_top + LANE_HEIGHT),
            Pos2::new(x_of(geo.right()), response.rect.bottom()),
        );
        painter.rect_filled(band, 0.0, theme::BLACKOUT_FILL);

        let bar = Rect::from_min_max(
            Pos2::new(x_of(geo.offset_px), lane_top + 4.0),
            Pos2::new(x_of(geo.right()), lane_top + LANE_HEIGHT - 4.0),
        );
        let conflicting = is_conflicting(app, period.id);
        painter.rect_filled(bar, Rounding::same(3.0), theme::BLACKOUT_BAR);
        if conflicting || app.selected.is_some_and(|s| s.id == period.id) {
            let color = if conflicting { theme::CONFLICT } else { theme::BORDER_ACCENT };
            painter.rect_stroke(bar.expand(1.0), Rounding::same(4.0), Stroke::new(2.0, color));
        }
        painter.with_clip_rect(bar).text(
            Pos2::new(bar.left() + 4.0, bar.center().y),
            egui::Align2::LEFT_CENTER,
            &period.title,
            theme::font_small(),
            theme::TEXT_ON_BAR,
        );
        push_bar_hits(&mut hits, bar, period.id, SubjectKind::Blackout, true);
    }

    if let Some(range) = app.draft.and_then(|d| d.range) {
        let geo = transform::date_range_to_pixels(&range, &vp, app.config.min_bar_width_percent);
        let draft = Rect::from_min_max(
            Pos2::new(x_of(geo.offset_px), lane_top + 4.0),
            Pos2::new(x_of(geo.right()), lane_top + LANE_HEIGHT - 4.0),
        );
        painter.rect_filled(draft, Rounding::same(3.0), theme::BLACKOUT_DRAFT);
    }

    // Tracks and their rows
    let mut y = lane_top + LANE_HEIGHT;
    for (t_idx, track) in tracks.iter().enumerate() {
        let label_rect = Rect::from_min_size(Pos2::new(origin.x, y), Vec2::new(chart_width, theme::TRACK_LABEL_HEIGHT));
        painter.line_segment(
            [label_rect.left_top(), label_rect.right_top()],
            Stroke::new(1.0, theme::BORDER_SUBTLE),
        );
        painter.text(
            Pos2::new(origin.x + 6.0, label_rect.center().y),
            egui::Align2::LEFT_CENTER,
            &track.name,
            theme::font_sub(),
            theme::TEXT_SECONDARY,
        );
        y += theme::TRACK_LABEL_HEIGHT;

        let row_count = track.rows.len().max(1);
        let track_rect = Rect::from_min_size(
            Pos2::new(origin.x, y),
            Vec2::new(chart_width, row_count as f32 * (ROW_HEIGHT + ROW_PADDING)),
        );
        if response.hover_pos().is_some_and(|p| track_rect.contains(p)) {
            painter.rect_filled(track_rect, 0.0, theme::BG_ROW_HOVER);
        } else if t_idx % 2 == 0 {
            painter.rect_filled(track_rect, 0.0, theme::BG_ROW_EVEN);
        }
        hits.push(Hit {
            rect: track_rect,
            kind: HitKind::Track(track.id),
        });

        for row in &track.rows {
            let row_y = y + ROW_PADDING;
            for item in row {
                draw_item(app, &painter, origin, item, row_y, &mut hits);
            }
            y += ROW_HEIGHT + ROW_PADDING;
        }
        if track.rows.is_empty() {
            y += ROW_HEIGHT + ROW_PADDING;
        }
    }

    draw_today_line(&painter, origin, &vp, response.rect.height());

    let events = collect_pointer_events(app, ui, &response, origin, &hits);
    hover_feedback(app, ui, &response, &hits);
    show_context_menu(app, ui, &response, origin, &hits, events)
}

struct TrackLayout {
    id: Uuid,
    name: String,
    rows: Vec<Vec<TimelineItem>>,
}

/// Rows per track. Placement uses committed ranges so rows do not jump mid-drag.
fn track_layouts(app: &TimelineApp) -> Vec<TrackLayout> {
    app.schedule
        .track_ids()
        .into_iter()
        .map(|id| {
            let items: Vec<TimelineItem> = app.schedule.items_on_track(id).cloned().collect();
            let layout = arrange_rows(&items, app.config.min_gap_days);
            let rows = layout
                .rows
                .iter()
                .map(|row| row.iter().map(|i| (*i).clone()).collect())
                .collect();
            TrackLayout {
                id,
                name: app
                    .schedule
                    .track(id)
                    .map(|t| t.name.clone())
                    .unwrap_or_else(|| "Unassigned".to_string()),
                rows,
            }
        })
        .collect()
}

fn is_conflicting(app: &TimelineApp, id: Uuid) -> bool {
    app.preview
        .as_ref()
        .is_some_and(|p| p.has_conflict && (p.subject_id == id || p.conflicting_ids.contains(&id)))
}

/// Register the body and edge handles of a bar, handles last so they win.
fn push_bar_hits(hits: &mut Vec<Hit>, bar: Rect, id: Uuid, kind: SubjectKind, resizable: bool) {
    let target = |action| GestureTarget { id, kind, action };
    hits.push(Hit {
        rect: bar,
        kind: HitKind::Subject(target(GestureAction::Move)),
    });
    if !resizable {
        return;
    }
    let left = Rect::from_min_max(
        Pos2::new(bar.left() - HANDLE_WIDTH * 0.5, bar.top()),
        Pos2::new(bar.left() + HANDLE_WIDTH * 0.5, bar.bottom()),
    );
    let right = Rect::from_min_max(
        Pos2::new(bar.right() - HANDLE_WIDTH * 0.5, bar.top()),
        Pos2::new(bar.right() + HANDLE_WIDTH * 0.5, bar.bottom()),
    );
    hits.push(Hit {
        rect: left.expand(2.0),
        kind: HitKind::Subject(target(GestureAction::ResizeStart)),
    });
    hits.push(Hit {
        rect: right.expand(2.0),
        kind: HitKind::Subject(target(GestureAction::ResizeEnd)),
    });
}

fn draw_item(app: &TimelineApp, painter: &egui::Painter, origin: Pos2, item: &TimelineItem, y: f32, hits: &mut Vec<Hit>) {
    let vp = &app.viewport;
    let geo = match app.overlay.get(&item.id) {
        Some(live) if item.continuous => {
            let open = TimeRange::new(live.start, vp.end.max(live.start));
            transform::date_range_to_pixels(&open, vp, app.config.min_bar_width_percent)
        }
        Some(live) => transform::date_range_to_pixels(live, vp, app.config.min_bar_width_percent),
        None => transform::item_to_pixels(item, vp, app.config.min_bar_width_percent),
    };
    let is_selected = app.selected.is_some_and(|s| s.id == item.id);
    let bar_rect = draw_item_bar(painter, origin, item, &geo, y, is_selected, is_conflicting(app, item.id));
    push_bar_hits(hits, bar_rect, item.id, SubjectKind::Item, !item.continuous);

    for marker in app.schedule.markers_of(item.id) {
        let date = app
            .overlay
            .get(&marker.id)
            .map(|r| r.start)
            .unwrap_or(marker.boundary_date);
        let x = origin.x + transform::date_to_px(date, vp) as f32;
        let color = if marker.is_locked() {
            theme::MARKER_LOCKED
        } else {
            theme::MARKER_COLOR
        };
        painter.line_segment(
            [Pos2::new(x, bar_rect.top() - 2.0), Pos2::new(x, bar_rect.bottom() + 2.0)],
            Stroke::new(2.0, color),
        );
        let tip = vec![
            Pos2::new(x - 4.0, bar_rect.top() - 4.0),
            Pos2::new(x + 4.0, bar_rect.top() - 4.0),
            Pos2::new(x, bar_rect.top() + 2.0),
        ];
        painter.add(egui::Shape::convex_polygon(tip, color, Stroke::NONE));
        if app.selected.is_some_and(|s| s.id == marker.id) {
            painter.circle_stroke(Pos2::new(x, bar_rect.top() - 2.0), 6.0, Stroke::new(1.5, theme::BORDER_ACCENT));
        }
        hits.push(Hit {
            rect: Rect::from_min_max(
                Pos2::new(x - MARKER_GRAB, bar_rect.top() - 6.0),
                Pos2::new(x + MARKER_GRAB, bar_rect.bottom() + 2.0),
            ),
            kind: HitKind::Subject(GestureTarget {
                id: marker.id,
                kind: SubjectKind::Marker,
                action: GestureAction::Move,
            }),
        });
    }
}

fn collect_pointer_events(
    app: &TimelineApp,
    ui: &Ui,
    response: &egui::Response,
    origin: Pos2,
    hits: &[Hit],
) -> Vec<ViewEvent> {
    let mut events = Vec::new();
    let (pos, pressed, released, moved, time, escape) = ui.input(|i| {
        (
            i.pointer.interact_pos(),
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
            i.pointer.delta() != Vec2::ZERO,
            i.time,
            i.key_pressed(egui::Key::Escape),
        )
    });
    let at_ms = (time * 1000.0) as u64;
    let Some(pos) = pos else {
        return events;
    };
    let px = (pos.x - origin.x).floor() as i32;
    let mut gesture_live = app.gestures.is_active();
    let mut drafting = app.draft.is_some();

    if pressed && response.hovered() {
        match hits.iter().rev().find(|h| h.rect.contains(pos)).map(|h| h.kind) {
            Some(HitKind::Subject(target)) => {
                events.push(ViewEvent::PointerDown { target, px, at_ms });
                gesture_live = true;
            }
            Some(HitKind::Header) => {
                events.push(ViewEvent::ToggleWeek(transform::pixel_to_date(px, &app.viewport).date));
            }
            Some(HitKind::BlackoutLane) => {
                events.push(ViewEvent::DraftStart { px });
                drafting = true;
            }
            Some(HitKind::Track(_)) | None => events.push(ViewEvent::ClearSelection),
        }
    } else if moved && gesture_live {
        events.push(ViewEvent::PointerMove { px, at_ms });
    } else if moved && drafting {
        events.push(ViewEvent::DraftMove { px });
    }

    if released {
        if gesture_live {
            events.push(ViewEvent::PointerUp { px, at_ms });
        } else if drafting {
            events.push(ViewEvent::DraftMove { px });
            events.push(ViewEvent::DraftEnd);
        }
    }
    if escape && gesture_live {
        events.push(ViewEvent::CancelGesture);
    }
    events
}

fn hover_feedback(app: &TimelineApp, ui: &Ui, response: &egui::Response, hits: &[Hit]) {
    if let Some(g) = app.gestures.gesture() {
        let icon = match g.action {
            GestureAction::Move => egui::CursorIcon::Grabbing,
            GestureAction::ResizeStart | GestureAction::ResizeEnd => egui::CursorIcon::ResizeHorizontal,
        };
        ui.ctx().set_cursor_icon(icon);
        return;
    }
    let Some(pos) = response.hover_pos() else {
        return;
    };
    let Some(HitKind::Subject(target)) = hits.iter().rev().find(|h| h.rect.contains(pos)).map(|h| h.kind) else {
        return;
    };
    ui.ctx().set_cursor_icon(match target.action {
        GestureAction::Move => egui::CursorIcon::Grab,
        _ => egui::CursorIcon::ResizeHorizontal,
    });

    let (title, range) = match target.kind {
        SubjectKind::Item => match app.schedule.item(target.id) {
            Some(i) if i.continuous => (i.name.clone(), format!("from {} (open-ended)", i.range.start.format("%d %b %Y"))),
            Some(i) => (i.name.clone(), fmt_range(&i.range)),
            None => return,
        },
        SubjectKind::Marker => match app.schedule.marker(target.id) {
            Some(m) => (m.name.clone(), fmt_range(&m.range())),
            None => return,
        },
        SubjectKind::Blackout => match app.schedule.blackout(target.id) {
            Some(b) => (b.title.clone(), fmt_range(&b.range)),
            None => return,
        },
    };
    egui::show_tooltip_at_pointer(ui.ctx(), ui.layer_id(), Id::new(("timeline-tip", target.id)), |ui| {
        ui.strong(title);
        ui.label(range);
    });
}

fn show_context_menu(
    app: &TimelineApp,
    ui: &Ui,
    response: &egui::Response,
    origin: Pos2,
    hits: &[Hit],
    mut events: Vec<ViewEvent>,
) -> Vec<ViewEvent> {
    if response.secondary_clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            let px = (pos.x - origin.x).floor() as i32;
            let target = ContextTarget {
                kind: hits
                    .iter()
                    .rev()
                    .find(|h| h.rect.contains(pos))
                    .map(|h| h.kind)
                    .unwrap_or(HitKind::Header),
                date: transform::pixel_to_date(px, &app.viewport).date,
            };
            ui.ctx().data_mut(|data| data.insert_temp(context_id(), target));
        }
    }

    response.context_menu(|ui| {
        let Some(target) = ui.ctx().data(|data| data.get_temp::<ContextTarget>(context_id())) else {
            ui.close_menu();
            return;
        };
        let mut pick = |ui: &mut Ui, label: &str, event: ViewEvent| {
            if ui.button(label).clicked() {
                events.push(event);
                ui.close_menu();
            }
        };
        match target.kind {
            HitKind::Subject(t) => {
                let sel = Selection { id: t.id, kind: t.kind };
                if t.kind == SubjectKind::Item {
                    pick(
                        ui,
                        &format!("{}  Add phase marker here", egui_phosphor::regular::FLAG),
                        ViewEvent::AddMarker {
                            item_id: t.id,
                            date: target.date,
                        },
                    );
                }
                pick(ui, &format!("{}  Delete", egui_phosphor::regular::TRASH), ViewEvent::Delete(sel));
            }
            HitKind::Track(track) => {
                pick(
                    ui,
                    &format!("{}  Add work item here…", egui_phosphor::regular::PLUS),
                    ViewEvent::OpenAddItem {
                        track: Some(track),
                        date: Some(target.date),
                    },
                );
            }
            HitKind::Header | HitKind::BlackoutLane => {
                pick(
                    ui,
                    &format!("{}  Add work item…", egui_phosphor::regular::PLUS),
                    ViewEvent::OpenAddItem {
                        track: None,
                        date: Some(target.date),
                    },
                );
                pick(
                    ui,
                    &format!("{}  Add blackout…", egui_phosphor::regular::PROHIBIT),
                    ViewEvent::OpenAddBlackout,
                );
            }
        }
    });
    events
}

fn draw_column_backgrounds(app: &TimelineApp, painter: &egui::Painter, origin: Pos2, columns: &[Column], height: f32) {
    let vp = &app.viewport;
    for col in columns {
        let x = origin.x + col.pixel_offset as f32;
        let rect = Rect::from_min_size(
            Pos2::new(x, origin.y + HEADER_HEIGHT),
            Vec2::new(col.pixel_width as f32, height - HEADER_HEIGHT),
        );
        if vp.mode == ViewMode::Days && col.date.weekday().num_days_from_monday() >= 5 {
            painter.rect_filled(rect, 0.0, theme::WEEKEND_SHADE);
        }
        if app.highlighted_weeks.get_for(col.date).copied().unwrap_or(false) {
            painter.rect_filled(rect, 0.0, theme::WEEK_HIGHLIGHT);
        }
        painter.line_segment(
            [Pos2::new(x, origin.y + HEADER_HEIGHT), Pos2::new(x, origin.y + height)],
            Stroke::new(0.5, theme::GRID_LINE),
        );
    }
}

fn draw_timeline_header(painter: &egui::Painter, origin: Pos2, vp: &Viewport, columns: &[Column], width: f32) {
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(width, HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );
    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + HEADER_HEIGHT),
            Pos2::new(origin.x + width, origin.y + HEADER_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    for col in columns {
        let x = origin.x + col.pixel_offset as f32;
        painter.line_segment(
            [Pos2::new(x, origin.y + 18.0), Pos2::new(x, origin.y + HEADER_HEIGHT)],
            Stroke::new(0.5, theme::GRID_LINE),
        );
        match vp.mode {
            ViewMode::Days => {
                let is_weekend = col.date.weekday().num_days_from_monday() >= 5;
                let day_color = if is_weekend {
                    theme::TEXT_DIM
                } else {
                    theme::TEXT_SECONDARY
                };
                painter.text(
                    Pos2::new(x + 3.0, origin.y + 30.0),
                    egui::Align2::LEFT_CENTER,
                    col.date.format("%a %d").to_string(),
                    theme::font_sub(),
                    day_color,
                );
                if col.date.day() == 1 || col.index == 0 {
                    draw_month_label(painter, Pos2::new(x + 3.0, origin.y + 10.0), col.date);
                }
            }
            ViewMode::Weeks => {
                painter.text(
                    Pos2::new(x + 3.0, origin.y + 30.0),
                    egui::Align2::LEFT_CENTER,
                    format!("W{:02} · {}", col.date.iso_week().week(), col.date.format("%d")),
                    theme::font_sub(),
                    theme::TEXT_SECONDARY,
                );
                // Faint day ticks inside the week.
                for day in 1..grid::DAYS_PER_WEEK {
                    let tick = x + grid::day_offset(ViewMode::Weeks, day) as f32;
                    painter.line_segment(
                        [Pos2::new(tick, origin.y + HEADER_HEIGHT - 5.0), Pos2::new(tick, origin.y + HEADER_HEIGHT)],
                        Stroke::new(0.5, theme::GRID_LINE),
                    );
                }
                if col.date.day() <= 7 || col.index == 0 {
                    draw_month_label(painter, Pos2::new(x + 3.0, origin.y + 10.0), col.date);
                }
            }
        }
    }
}

fn draw_month_label(painter: &egui::Painter, pos: Pos2, date: NaiveDate) {
    painter.text(
        pos,
        egui::Align2::LEFT_CENTER,
        date.format("%b %Y").to_string(),
        theme::font_header(),
        theme::TEXT_PRIMARY,
    );
}

fn draw_today_line(painter: &egui::Painter, origin: Pos2, vp: &Viewport, height: f32) {
    let today = chrono::Local::now().date_naive();
    if today < vp.grid_origin() || today > vp.end {
        return;
    }
    let x = origin.x + transform::date_to_px(today, vp) as f32;

    painter.line_segment(
        [Pos2::new(x, origin.y + HEADER_HEIGHT), Pos2::new(x, origin.y + height)],
        Stroke::new(1.5, theme::TODAY_LINE),
    );

    let badge_w = 42.0;
    let badge_rect = Rect::from_min_size(
        Pos2::new(x - badge_w / 2.0, origin.y + HEADER_HEIGHT - 1.0),
        Vec2::new(badge_w, 14.0),
    );
    painter.rect_filled(badge_rect, Rounding::same(3.0), theme::TODAY_LINE);
    painter.text(
        badge_rect.center(),
        egui::Align2::CENTER_CENTER,
        "Today",
        theme::font_small(),
        Color32::WHITE,
    );
}

fn draw_item_bar(
    painter: &egui::Painter,
    origin: Pos2,
    item: &TimelineItem,
    geo: &BarGeometry,
    y: f32,
    is_selected: bool,
    is_conflicting: bool,
) -> Rect {
    let inset = theme::BAR_INSET;
    let bar_rect = Rect::from_min_size(
        Pos2::new(origin.x + geo.offset_px as f32, y + inset),
        Vec2::new(geo.width_px as f32, ROW_HEIGHT - inset * 2.0),
    );
    let rounding = Rounding::same(theme::BAR_ROUNDING);

    // Soft shadow
    painter.rect_filled(bar_rect.translate(Vec2::new(1.0, 2.0)), rounding, Color32::from_black_alpha(35));

    painter.rect_filled(bar_rect, rounding, theme::item_color(item.color));
    let highlight_rect = Rect::from_min_size(
        bar_rect.min,
        Vec2::new(bar_rect.width(), (bar_rect.height() * 0.45).max(4.0)),
    );
    painter.rect_filled(
        highlight_rect,
        Rounding {
            nw: theme::BAR_ROUNDING,
            ne: theme::BAR_ROUNDING,
            sw: 0.0,
            se: 0.0,
        },
        Color32::from_white_alpha(25),
    );

    // Open-ended items fade out toward the viewport end
    if item.continuous {
        let fade = Rect::from_min_max(
            Pos2::new(bar_rect.right() - 24.0, bar_rect.top()),
            bar_rect.right_bottom(),
        );
        painter.rect_filled(fade, Rounding::ZERO, Color32::from_black_alpha(60));
    }

    if is_conflicting {
        painter.rect_stroke(
            bar_rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::CONFLICT),
        );
    } else if is_selected {
        painter.rect_stroke(
            bar_rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
    }

    if is_selected && !item.continuous && bar_rect.width() > HANDLE_WIDTH * 3.0 {
        for x in [bar_rect.left() + 3.0, bar_rect.right() - 3.0] {
            painter.line_segment(
                [Pos2::new(x, bar_rect.top() + 5.0), Pos2::new(x, bar_rect.bottom() - 5.0)],
                Stroke::new(2.0, theme::HANDLE_COLOR.gamma_multiply(0.7)),
            );
        }
    }

    if bar_rect.width() > 30.0 {
        let galley = painter.layout_no_wrap(item.name.clone(), theme::font_bar(), theme::TEXT_ON_BAR);
        let clipped = painter.with_clip_rect(bar_rect);
        let text_y = bar_rect.top() + (bar_rect.height() - galley.size().y) / 2.0;
        clipped.galley(Pos2::new(bar_rect.left() + 6.0, text_y), galley, Color32::TRANSPARENT);
    }

    bar_rect
}
