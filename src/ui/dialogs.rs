use egui::{Color32, Context, RichText, Window};

use crate::app::{fmt_range, TimelineApp};
use crate::ui::theme;

fn dialog_visuals(ui: &mut egui::Ui) {
    ui.visuals_mut().extreme_bg_color = theme::BG_DARK;
    ui.visuals_mut().faint_bg_color = Color32::TRANSPARENT;
    ui.visuals_mut().striped = false;
}

fn accent_button(label: &str) -> egui::Button<'_> {
    egui::Button::new(RichText::new(label).color(Color32::WHITE))
        .fill(theme::ACCENT)
        .rounding(egui::Rounding::same(4.0))
}

/// Render the "Add Work Item" dialog.
pub fn show_add_item_dialog(app: &mut TimelineApp, ctx: &Context) {
    let mut create = false;
    let mut close = false;
    let track_names: Vec<String> = app.schedule.tracks.iter().map(|t| t.name.clone()).collect();

    Window::new(RichText::new("Add Work Item").strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([theme::DIALOG_WIDTH, 0.0])
        .show(ctx, |ui| {
            dialog_visuals(ui);
            ui.add_space(4.0);
            let d = &mut app.dialogs;

            egui::Grid::new("add_item_grid")
                .num_columns(2)
                .striped(false)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("Name").color(theme::TEXT_SECONDARY));
                    ui.add_sized(
                        [200.0, 24.0],
                        egui::TextEdit::singleline(&mut d.item_name)
                            .hint_text("Item name...")
                            .text_color(theme::TEXT_PRIMARY),
                    );
                    ui.end_row();

                    ui.label(RichText::new("Track").color(theme::TEXT_SECONDARY));
                    ui.horizontal(|ui| {
                        ui.add_sized(
                            [160.0, 24.0],
                            egui::TextEdit::singleline(&mut d.item_track).hint_text("General"),
                        );
                        egui::ComboBox::from_id_salt("dlg_track_pick")
                            .width(24.0)
                            .selected_text("")
                            .show_ui(ui, |ui| {
                                for name in &track_names {
                                    if ui.selectable_label(d.item_track == *name, name.as_str()).clicked() {
                                        d.item_track = name.clone();
                                    }
                                }
                            });
                    });
                    ui.end_row();

                    ui.label(RichText::new("Start").color(theme::TEXT_SECONDARY));
                    ui.add(egui_extras::DatePickerButton::new(&mut d.item_start).id_salt("dlg_item_start"));
                    ui.end_row();

                    ui.label(RichText::new("End").color(theme::TEXT_SECONDARY));
                    ui.add_enabled_ui(!d.item_continuous, |ui| {
                        ui.add(egui_extras::DatePickerButton::new(&mut d.item_end).id_salt("dlg_item_end"));
                    });
                    ui.end_row();

                    ui.label("");
                    ui.checkbox(&mut d.item_continuous, "Open-ended (no end date)");
                    ui.end_row();
                });

            if !d.item_continuous && d.item_end < d.item_start {
                ui.label(
                    RichText::new("End is before start; the item will be one day long.")
                        .size(11.0)
                        .color(theme::CONFLICT),
                );
            }

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                if ui.add_sized([80.0, 28.0], accent_button("Create")).clicked() {
                    create = true;
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    close = true;
                }
            });
            ui.add_space(2.0);
        });

    if create {
        app.create_item_from_dialog();
    }
    if close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.dialogs.show_add_item = false;
    }
}

/// Render the "Add Blackout" dialog.
pub fn show_add_blackout_dialog(app: &mut TimelineApp, ctx: &Context) {
    let mut create = false;
    let mut close = false;

    Window::new(RichText::new("Add Blackout").strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([theme::DIALOG_WIDTH, 0.0])
        .show(ctx, |ui| {
            dialog_visuals(ui);
            ui.add_space(4.0);
            let d = &mut app.dialogs;

            egui::Grid::new("add_blackout_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("Title").color(theme::TEXT_SECONDARY));
                    ui.add_sized(
                        [200.0, 24.0],
                        egui::TextEdit::singleline(&mut d.blackout_title)
                            .hint_text("Holiday, freeze...")
                            .text_color(theme::TEXT_PRIMARY),
                    );
                    ui.end_row();

                    ui.label(RichText::new("From").color(theme::TEXT_SECONDARY));
                    ui.add(egui_extras::DatePickerButton::new(&mut d.blackout_start).id_salt("dlg_bo_start"));
                    ui.end_row();

                    ui.label(RichText::new("To").color(theme::TEXT_SECONDARY));
                    ui.add(egui_extras::DatePickerButton::new(&mut d.blackout_end).id_salt("dlg_bo_end"));
                    ui.end_row();
                });

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                if ui.add_sized([80.0, 28.0], accent_button("Create")).clicked() {
                    create = true;
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    close = true;
                }
            });
            ui.add_space(2.0);
        });

    if create {
        app.create_blackout_from_dialog();
    }
    if close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.dialogs.show_add_blackout = false;
    }
}

/// Ask what to do with a blackout that collided with another one.
pub fn show_blackout_conflict_dialog(app: &mut TimelineApp, ctx: &Context) {
    let Some(pending) = app.pending_blackout.as_ref() else {
        return;
    };
    let mut accept = false;
    let mut discard = false;

    Window::new(RichText::new("Blackout overlaps").strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([theme::DIALOG_WIDTH + 60.0, 0.0])
        .show(ctx, |ui| {
            dialog_visuals(ui);
            ui.add_space(4.0);
            ui.label(RichText::new(format!("'{}'", pending.title)).strong().color(theme::TEXT_PRIMARY));
            ui.label(
                RichText::new(format!("Requested: {}", fmt_range(&pending.check.proposed)))
                    .size(11.0)
                    .color(theme::TEXT_SECONDARY),
            );
            ui.add_space(4.0);
            for other in &pending.check.conflicting {
                ui.label(
                    RichText::new(format!(
                        "{} {} ({})",
                        egui_phosphor::regular::WARNING,
                        other.title,
                        fmt_range(&other.range)
                    ))
                    .size(11.0)
                    .color(theme::CONFLICT),
                );
            }
            ui.add_space(6.0);
            ui.label(RichText::new(&pending.check.explanation).color(theme::TEXT_SECONDARY));

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                if let Some(suggestion) = pending.check.suggestion {
                    let label = format!("Use {}", fmt_range(&suggestion));
                    if ui.add(accent_button(&label)).clicked() {
                        accept = true;
                    }
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Discard")).clicked() {
                    discard = true;
                }
            });
            ui.add_space(2.0);
        });

    if accept {
        app.accept_blackout_suggestion();
    } else if discard || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.discard_blackout();
    }
}

/// Render the "About" dialog.
pub fn show_about_dialog(app: &mut TimelineApp, ctx: &Context) {
    let mut should_close = false;
    Window::new("About")
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([theme::DIALOG_WIDTH, 180.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading(RichText::new("Timeline Planner").strong());
                ui.add_space(2.0);
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION"))).color(theme::TEXT_SECONDARY),
                );
                ui.add_space(10.0);
                ui.label("Drag bars, phase markers and blackouts");
                ui.label("across a calendar grid.");
                ui.add_space(14.0);
                if ui.add_sized([100.0, 28.0], egui::Button::new("Close")).clicked() {
                    should_close = true;
                }
            });
        });
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.dialogs.show_about = false;
    }
}

/// Render the "CSV Import Format" help dialog.
pub fn show_csv_help_dialog(app: &mut TimelineApp, ctx: &Context) {
    let mut should_close = false;

    Window::new(RichText::new("CSV Import Format").strong().size(14.0))
        .resizable(true)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .default_size([540.0, 460.0])
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(4.0);

                ui.label(RichText::new("Delimiters").strong());
                ui.label("The delimiter is auto-detected: comma (,), semicolon (;), or tab.");
                ui.add_space(8.0);

                ui.label(RichText::new("Columns").strong());
                ui.add_space(2.0);
                egui::Grid::new("csv_columns")
                    .num_columns(3)
                    .striped(true)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("Column").underline());
                        ui.label(RichText::new("Accepted headers (case-insensitive)").underline());
                        ui.label(RichText::new("Required").underline());
                        ui.end_row();

                        for (column, headers, required) in [
                            ("Name", "Name, Item, Task, Label, Title, Activity", "yes"),
                            ("Start Date", "Start, Start Date, From, Begin", "yes"),
                            ("End Date", "End, End Date, To, Finish, Due", "yes (blank when open-ended)"),
                            ("Track", "Track, Row, Lane, Team, Resource", "no (defaults to General)"),
                            ("Continuous", "Continuous, Open Ended, Ongoing", "no (true / yes / 1)"),
                        ] {
                            ui.label(RichText::new(column).strong());
                            ui.label(headers);
                            ui.label(required);
                            ui.end_row();
                        }
                    });
                ui.add_space(8.0);

                ui.label(RichText::new("Supported Date Formats").strong());
                ui.add_space(2.0);
                for fmt in &[
                    "YYYY-MM-DD   (e.g. 2025-06-15)",
                    "DD/MM/YYYY   (e.g. 15/06/2025)",
                    "MM/DD/YYYY   (e.g. 06/15/2025)",
                    "DD-MM-YYYY   (e.g. 15-06-2025)",
                    "DD.MM.YYYY   (e.g. 15.06.2025)",
                    "YYYY/MM/DD   (e.g. 2025/06/15)",
                ] {
                    ui.label(RichText::new(*fmt).monospace().size(11.0));
                }
                ui.add_space(8.0);

                ui.label(RichText::new("Notes").strong());
                ui.add_space(2.0);
                for note in &[
                    "• Header matching ignores case, spaces, hyphens and underscores.",
                    "• Tracks are matched by name; unknown names create a new track.",
                    "• An end date before the start is raised to the start date.",
                    "• Rows with a missing name or an invalid date are skipped and logged.",
                    "• Imported items are not moved apart; overlaps show up when dragged.",
                ] {
                    ui.label(RichText::new(*note).small());
                }
                ui.add_space(10.0);

                ui.label(RichText::new("Example (semicolon-delimited)").strong());
                ui.add_space(2.0);
                let example = "Name;Start Date;End Date;Track;Continuous\n\
                               API design;01/01/2025;31/01/2025;Platform;\n\
                               Backend build;10/02/2025;28/03/2025;Platform;\n\
                               On-call;01/01/2025;;Operations;yes";
                egui::Frame::dark_canvas(ui.style()).show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::multiline(&mut example.to_string())
                            .font(egui::TextStyle::Monospace)
                            .desired_width(f32::INFINITY)
                            .interactive(false),
                    );
                });
                ui.add_space(8.0);
            });

            ui.separator();
            ui.add_space(4.0);
            if ui.add_sized([80.0, 28.0], egui::Button::new("Close")).clicked() {
                should_close = true;
            }
            ui.add_space(2.0);
        });

    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.dialogs.show_csv_help = false;
    }
}
