use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::status_color;
use crate::state::AppState;

/// Reference thresholds, with the last evaluated value and status per row.
pub fn threshold_table(ui: &mut Ui, state: &AppState) {
    let report = state.report.as_ref();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(200.0))
        .columns(Column::auto().at_least(70.0), 4)
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in ["Pollutant", "WHO", "Peru", "Unit", "Measured", "Status"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for standard in state.table.iter() {
                let result = report.and_then(|r| r.get(standard.id));
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(standard.name);
                    });
                    row.col(|ui| {
                        ui.label(standard.guideline.to_string());
                    });
                    row.col(|ui| {
                        ui.label(standard.national.to_string());
                    });
                    row.col(|ui| {
                        ui.label(standard.unit);
                    });
                    row.col(|ui| {
                        if let Some(r) = result {
                            ui.label(r.measured.to_string());
                        }
                    });
                    row.col(|ui| {
                        if let Some(r) = result {
                            let text = format!("{} {}", r.status.marker(), r.status);
                            ui.label(RichText::new(text).color(status_color(r.status)));
                        }
                    });
                });
            }
        });
}
