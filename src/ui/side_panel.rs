use egui::{Color32, Id, RichText, Ui};
use uuid::Uuid;

use timeline_planner::model::SubjectKind;

use crate::app::{fmt_range, Selection, TimelineApp};
use crate::ui::theme;

/// Actions the side panel can request.
enum PanelAction {
    None,
    Select(Selection),
    Delete(Selection),
    AddItem(Option<Uuid>),
    AddTrack(String),
    Changed,
}

fn new_track_id() -> Id {
    Id::new("side-panel-new-track")
}

/// Render the left panel: tracks with their items, then the selection editor.
pub fn show_side_panel(app: &mut TimelineApp, ui: &mut Ui) {
    let mut action = PanelAction::None;

    ui.add_space(2.0);
    ui.horizontal(|ui| {
        ui.label(RichText::new("Tracks").strong().size(15.0).color(theme::TEXT_PRIMARY));
        ui.add_space(4.0);
        ui.label(
            RichText::new(format!("({})", app.schedule.track_ids().len()))
                .size(11.0)
                .color(theme::TEXT_DIM),
        );
    });
    ui.add_space(4.0);

    let btn = egui::Button::new(
        RichText::new(format!("{}  Add Item", egui_phosphor::regular::PLUS))
            .color(Color32::WHITE)
            .size(12.0),
    )
    .fill(theme::ACCENT)
    .rounding(egui::Rounding::same(5.0));
    if ui.add_sized([ui.available_width(), 30.0], btn).clicked() {
        action = PanelAction::AddItem(None);
    }

    ui.add_space(6.0);
    ui.separator();

    let list_height = (ui.available_height() * 0.55).max(120.0);
    egui::ScrollArea::vertical()
        .id_salt("track-list")
        .max_height(list_height)
        .auto_shrink([false, true])
        .show(ui, |ui| {
            for track_id in app.schedule.track_ids() {
                let name = app
                    .schedule
                    .track(track_id)
                    .map(|t| t.name.clone())
                    .unwrap_or_else(|| "Unassigned".to_string());
                let items: Vec<_> = app.schedule.items_on_track(track_id).collect();

                egui::CollapsingHeader::new(
                    RichText::new(format!("{}  ({})", name, items.len())).color(theme::TEXT_SECONDARY),
                )
                .id_salt(track_id)
                .default_open(true)
                .show(ui, |ui| {
                    for item in items {
                        let sel = Selection {
                            id: item.id,
                            kind: SubjectKind::Item,
                        };
                        let is_selected = app.selected == Some(sel);
                        ui.horizontal(|ui| {
                            let (dot, _) = ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
                            ui.painter()
                                .circle_filled(dot.center(), 4.0, theme::item_color(item.color));
                            let text = if is_selected {
                                RichText::new(&item.name).color(theme::TEXT_PRIMARY).strong()
                            } else {
                                RichText::new(&item.name).color(theme::TEXT_SECONDARY)
                            };
                            if ui.selectable_label(is_selected, text).clicked() {
                                action = PanelAction::Select(sel);
                            }
                        });
                    }
                    if ui
                        .small_button(RichText::new(format!("{} item here", egui_phosphor::regular::PLUS)).size(10.0))
                        .clicked()
                    {
                        action = PanelAction::AddItem(Some(track_id));
                    }
                });
            }

            ui.add_space(4.0);
            let mut draft: String = ui.ctx().data_mut(|d| d.get_temp(new_track_id()).unwrap_or_default());
            ui.horizontal(|ui| {
                let edit = ui.add(
                    egui::TextEdit::singleline(&mut draft)
                        .hint_text("New track…")
                        .desired_width(ui.available_width() - 30.0),
                );
                let submit = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if (ui.button(egui_phosphor::regular::PLUS).clicked() || submit) && !draft.trim().is_empty() {
                    action = PanelAction::AddTrack(draft.trim().to_string());
                    draft.clear();
                }
            });
            ui.ctx().data_mut(|d| d.insert_temp(new_track_id(), draft));
        });

    ui.separator();

    if let Some(sel) = app.selected {
        let edited = show_selection_editor(app, sel, ui);
        if matches!(action, PanelAction::None) {
            action = edited;
        }
    } else {
        ui.add_space(8.0);
        ui.label(
            RichText::new("Click a bar, marker or blackout to inspect it.\nRight-click the timeline for more.")
                .size(11.0)
                .color(theme::TEXT_DIM),
        );
    }

    match action {
        PanelAction::None => {}
        PanelAction::Select(sel) => app.selected = Some(sel),
        PanelAction::Delete(sel) => app.delete(sel),
        PanelAction::AddItem(track) => app.open_add_item(track, None),
        PanelAction::AddTrack(name) => {
            app.schedule.track_named(&name);
            app.schedule.touch();
            app.status_message = format!("Track '{}' ready", name);
        }
        PanelAction::Changed => app.schedule.touch(),
    }
}

/// Editable details of the selected subject. Dates change only by dragging.
fn show_selection_editor(app: &mut TimelineApp, sel: Selection, ui: &mut Ui) -> PanelAction {
    let mut action = PanelAction::None;
    let locked_edit = app.gestures.is_active();

    ui.add_space(6.0);
    let frame = egui::Frame {
        fill: theme::BG_DARK,
        rounding: egui::Rounding::same(6.0),
        inner_margin: egui::Margin::same(8.0),
        outer_margin: egui::Margin::ZERO,
        stroke: egui::Stroke::new(1.0, theme::BORDER_SUBTLE),
        ..Default::default()
    };

    frame.show(ui, |ui| {
        ui.add_enabled_ui(!locked_edit, |ui| match sel.kind {
            SubjectKind::Item => {
                let Some(item) = app.schedule.items.iter_mut().find(|i| i.id == sel.id) else {
                    return;
                };
                section_title(ui, "Work item");
                if ui.text_edit_singleline(&mut item.name).changed() {
                    action = PanelAction::Changed;
                }
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Color").color(theme::TEXT_SECONDARY));
                    if ui.color_edit_button_srgb(&mut item.color).changed() {
                        action = PanelAction::Changed;
                    }
                });
                let dates = if item.continuous {
                    format!("from {} (open-ended)", item.range.start.format("%d %b %Y"))
                } else {
                    format!("{}  ·  {} days", fmt_range(&item.range), item.range.span_days() + 1)
                };
                ui.label(RichText::new(dates).size(11.0).color(theme::TEXT_DIM));
            }
            SubjectKind::Marker => {
                let Some(marker) = app.schedule.markers.iter_mut().find(|m| m.id == sel.id) else {
                    return;
                };
                section_title(ui, "Phase marker");
                if ui.text_edit_singleline(&mut marker.name).changed() {
                    action = PanelAction::Changed;
                }
                ui.label(
                    RichText::new(marker.boundary_date.format("%d %b %Y").to_string())
                        .size(11.0)
                        .color(theme::TEXT_DIM),
                );
                if marker.is_locked() {
                    ui.label(
                        RichText::new(format!(
                            "{} Pinned to the item edge",
                            egui_phosphor::regular::LOCK_SIMPLE
                        ))
                        .size(11.0)
                        .color(theme::MARKER_LOCKED),
                    );
                }
            }
            SubjectKind::Blackout => {
                let Some(period) = app.schedule.blackouts.iter_mut().find(|b| b.id == sel.id) else {
                    return;
                };
                section_title(ui, "Blackout");
                if ui.text_edit_singleline(&mut period.title).changed() {
                    action = PanelAction::Changed;
                }
                ui.label(
                    RichText::new(format!("{}  ·  {} days", fmt_range(&period.range), period.range.span_days() + 1))
                        .size(11.0)
                        .color(theme::TEXT_DIM),
                );
            }
        });

        ui.add_space(6.0);
        let delete = egui::Button::new(
            RichText::new(format!("{}  Delete", egui_phosphor::regular::TRASH)).color(theme::TODAY_LINE),
        );
        if ui.add_enabled(!locked_edit, delete).clicked() {
            action = PanelAction::Delete(sel);
        }
    });

    action
}

fn section_title(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).strong().size(13.0).color(theme::TEXT_PRIMARY));
    ui.add_space(2.0);
}
