use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::chart::{AxisScale, ChartKind};
use crate::color::status_color;
use crate::data::model::{ComplianceStatus, REPORT_HEADER};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – input form and report
// ---------------------------------------------------------------------------

/// Render the measurement form, the Evaluate button and the last report.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Measurements");
    ui.separator();

    let mut submit = false;

    ScrollArea::vertical()
        .id_salt("inputs")
        .max_height(ui.available_height() * 0.55)
        .auto_shrink([false, true])
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("input_grid")
                .num_columns(2)
                .striped(true)
                .show(ui, |ui: &mut Ui| {
                    for (standard, input) in state.table.iter().zip(state.inputs.iter_mut()) {
                        ui.label(format!("{} ({}):", standard.name, standard.unit));
                        let response =
                            ui.add(egui::TextEdit::singleline(input).desired_width(90.0));
                        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                            submit = true;
                        }
                        ui.end_row();
                    }
                });
        });

    ui.add_space(6.0);
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Evaluate").clicked() {
            submit = true;
        }
        if ui.small_button("Reset").clicked() {
            state.reset_inputs();
        }
    });

    if submit {
        // Failures are reflected in `report_text`.
        let _ = state.evaluate();
    }

    ui.separator();
    report_view(ui, state);
}

fn report_view(ui: &mut Ui, state: &AppState) {
    ScrollArea::vertical()
        .id_salt("report")
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if let Some(report) = &state.report {
                ui.strong(REPORT_HEADER);
                ui.horizontal(|ui: &mut Ui| {
                    for status in ComplianceStatus::ALL {
                        let count = report.count(status);
                        let text = format!("{} {status}: {count}", status.marker());
                        ui.label(RichText::new(text).color(status_color(status)));
                    }
                });
                ui.add_space(4.0);
                for r in &report.results {
                    ui.label(RichText::new(&r.message).color(status_color(r.status)));
                }
            } else if !state.report_text.is_empty() {
                ui.label(RichText::new(&state.report_text).color(Color32::RED));
            } else {
                ui.weak("Enter values and press Evaluate.");
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Import measurements…").clicked() {
                import_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reset to examples").clicked() {
                state.reset_inputs();
                ui.close_menu();
            }
        });

        ui.separator();

        for kind in ChartKind::ALL {
            if ui
                .selectable_label(state.chart_kind == kind, kind.name())
                .clicked()
            {
                state.select_chart(kind);
            }
        }

        if state.chart_kind.has_axes() {
            ui.separator();
            for scale in [AxisScale::Linear, AxisScale::Logarithmic] {
                if ui.selectable_label(state.scale == scale, scale.name()).clicked() {
                    state.set_scale(scale);
                }
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn import_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Import measurements")
        .add_filter("Supported files", &["json", "csv"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    let Some(path) = file else {
        return;
    };

    match crate::data::loader::load_measurements(&path, &state.table) {
        Ok(raw) => {
            log::info!("Imported {} values from {}", raw.len(), path.display());
            state.apply_raw(&raw);
            if let Err(e) = state.evaluate() {
                state.status_message = Some(format!("Imported values rejected: {e}"));
            }
        }
        Err(e) => {
            log::error!("Failed to import measurements: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
