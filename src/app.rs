use eframe::egui;

use crate::state::AppState;
use crate::ui::{charts, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct SalesApp {
    pub state: AppState,
}

impl eframe::App for SalesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, raw data, charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.dataset.is_none() {
                ui.centered_and_justified(|ui: &mut egui::Ui| {
                    ui.heading("Open a sales table to explore it  (File → Open…)");
                });
                return;
            }

            panels::metrics_row(ui, &self.state);
            ui.separator();

            egui::CollapsingHeader::new("View raw filtered data")
                .default_open(false)
                .show(ui, |ui| {
                    table::raw_data_table(ui, &self.state);
                });
            ui.separator();

            charts::chart_tabs(ui, &mut self.state);
        });
    }
}
