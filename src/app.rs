use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AirCompareApp {
    pub state: AppState,
}

impl eframe::App for AirCompareApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar and chart selector ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: input form and report ----
        egui::SidePanel::left("input_panel")
            .default_width(380.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: reference thresholds ----
        egui::TopBottomPanel::bottom("threshold_table")
            .default_height(250.0)
            .resizable(true)
            .show(ctx, |ui| {
                table::threshold_table(ui, &self.state);
            });

        // ---- Central panel: chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::compliance_chart(ui, &self.state);
        });
    }
}
