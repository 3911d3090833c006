use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Raw filtered data table
// ---------------------------------------------------------------------------

/// Virtualized table of the records passing the current filters, in source
/// order.
pub fn raw_data_table(ui: &mut Ui, state: &AppState) {
    let (Some(dataset), Some(snapshot)) = (&state.dataset, &state.snapshot) else {
        return;
    };

    if snapshot.matching.is_empty() {
        ui.label("No data for selected filters.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(90.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::remainder())
        .max_scroll_height(260.0)
        .header(20.0, |mut header| {
            for title in ["Date", "Region", "Product", "Sales"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, snapshot.matching.len(), |mut row| {
                let rec = &dataset.records[snapshot.matching[row.index()]];
                row.col(|ui| {
                    ui.label(rec.date.format("%Y-%m-%d").to_string());
                });
                row.col(|ui| {
                    ui.label(rec.region.as_str());
                });
                row.col(|ui| {
                    ui.label(rec.product.as_str());
                });
                row.col(|ui| {
                    ui.label(format!("{:.2}", rec.sales));
                });
            });
        });
}
