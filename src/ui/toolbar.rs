use egui::{menu, RichText, Ui};
use egui_phosphor::regular as icons;

use timeline_planner::model::ViewMode;

use crate::app::TimelineApp;
use crate::ui::theme;

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut TimelineApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_menu()), |ui| {
            if ui.button("  New Timeline").clicked() {
                app.new_schedule();
                ui.close_menu();
            }
            if ui.button("  Open...").clicked() {
                app.open_schedule();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Save          Ctrl+S").clicked() {
                app.save_schedule();
                ui.close_menu();
            }
            if ui.button("  Save As...").clicked() {
                app.save_schedule_as();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Import CSV...").clicked() {
                app.import_csv();
                ui.close_menu();
            }
            if ui.button("  Export CSV...").clicked() {
                app.export_csv();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  View  ").font(theme::font_menu()), |ui| {
            ui.label(RichText::new("Grid").small().weak());
            let mut mode = app.viewport.mode;
            let busy = app.gestures.is_active();
            ui.add_enabled_ui(!busy, |ui| {
                let days = ui.radio_value(&mut mode, ViewMode::Days, "Days").clicked();
                let weeks = ui.radio_value(&mut mode, ViewMode::Weeks, "Weeks").clicked();
                if days || weeks {
                    ui.close_menu();
                }
            });
            app.set_mode(mode);
            ui.separator();
            if ui.button("  Go to Today").clicked() {
                app.go_to_today();
                ui.close_menu();
            }
            if ui
                .add_enabled(!app.highlighted_weeks.is_empty(), egui::Button::new("  Clear Week Highlights"))
                .clicked()
            {
                app.highlighted_weeks.clear_all();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Insert  ").font(theme::font_menu()), |ui| {
            if ui.button(format!("{}  Work Item...", icons::PLUS)).clicked() {
                app.open_add_item(None, None);
                ui.close_menu();
            }
            if ui.button(format!("{}  Blackout...", icons::PROHIBIT)).clicked() {
                app.open_add_blackout(None);
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::font_menu()), |ui| {
            if ui.button("CSV Format").clicked() {
                app.dialogs.show_csv_help = true;
                ui.close_menu();
            }
            if ui.button("About").clicked() {
                app.dialogs.show_about = true;
                ui.close_menu();
            }
        });

        ui.separator();
        if ui.button(icons::CARET_LEFT).on_hover_text("Previous column").clicked() {
            app.navigate(-1);
        }
        if ui
            .button(format!("{} Today", icons::CALENDAR_BLANK))
            .on_hover_text("Jump to today")
            .clicked()
        {
            app.go_to_today();
        }
        if ui.button(icons::CARET_RIGHT).on_hover_text("Next column").clicked() {
            app.navigate(1);
        }
        ui.label(
            RichText::new(app.viewport.start.format("%b %Y").to_string())
                .size(11.0)
                .color(theme::TEXT_SECONDARY),
        );

        // Right-aligned schedule name
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let modified = if app.file_path.is_some() { "" } else { " (unsaved)" };
            ui.label(
                RichText::new(format!("{}{}", app.schedule.name, modified))
                    .size(11.0)
                    .weak(),
            );
        });
    });
}
