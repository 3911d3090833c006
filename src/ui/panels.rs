use std::sync::Arc;

use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::DatePickerButton;

use crate::data::filter::CategoryFilter;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => Arc::clone(ds),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    let mut changed = false;

    // ---- Date range ----
    ui.strong("Date range");
    ui.horizontal(|ui: &mut Ui| {
        ui.label("From");
        changed |= ui
            .add(DatePickerButton::new(&mut state.criteria.start_date).id_salt("start_date"))
            .changed();
    });
    ui.horizontal(|ui: &mut Ui| {
        ui.label("To");
        changed |= ui
            .add(DatePickerButton::new(&mut state.criteria.end_date).id_salt("end_date"))
            .changed();
    });
    ui.separator();

    // ---- Category filters ----
    ui.strong("Region");
    changed |= category_combo(ui, "region_filter", &dataset.regions, &mut state.criteria.region);
    ui.add_space(4.0);

    ui.strong("Product");
    changed |= category_combo(
        ui,
        "product_filter",
        &dataset.products,
        &mut state.criteria.product,
    );
    ui.separator();

    if ui.button("Reset filters").clicked() {
        state.reset_filters();
    }

    // Recompute the snapshot after any widget change.
    if changed {
        state.refresh();
    }
}

/// "All" plus one entry per known category value.
fn category_combo(ui: &mut Ui, id: &str, values: &[String], filter: &mut CategoryFilter) -> bool {
    let mut changed = false;
    egui::ComboBox::from_id_salt(id)
        .selected_text(filter.label().to_string())
        .show_ui(ui, |ui: &mut Ui| {
            if ui
                .selectable_label(*filter == CategoryFilter::All, "All")
                .clicked()
            {
                *filter = CategoryFilter::All;
                changed = true;
            }
            for value in values {
                let selected = matches!(filter, CategoryFilter::Only(v) if v == value);
                if ui.selectable_label(selected, value.as_str()).clicked() {
                    *filter = CategoryFilter::Only(value.clone());
                    changed = true;
                }
            }
        });
    changed
}

// ---------------------------------------------------------------------------
// Metric cards
// ---------------------------------------------------------------------------

/// The four headline metric cards across the top of the central panel.
pub fn metrics_row(ui: &mut Ui, state: &AppState) {
    let Some(snapshot) = &state.snapshot else {
        return;
    };
    let summary = &snapshot.summary;

    let average = summary
        .average
        .map(|v| format_usd(v, 2))
        .unwrap_or_else(|| "N/A".to_string());

    ui.columns(4, |cols: &mut [Ui]| {
        metric_card(&mut cols[0], "Total Sales", &format_usd(summary.total, 0));
        metric_card(&mut cols[1], "Average Sale", &average);
        metric_card(
            &mut cols[2],
            "Top Product",
            summary.top_product.as_deref().unwrap_or("N/A"),
        );
        metric_card(
            &mut cols[3],
            "Top Region",
            summary.top_region.as_deref().unwrap_or("N/A"),
        );
    });
}

fn metric_card(ui: &mut Ui, label: &str, value: &str) {
    ui.group(|ui: &mut Ui| {
        ui.label(RichText::new(label).small());
        ui.heading(value);
    });
}

/// Format a dollar amount with thousands separators: 1234.5 → "$1,234.50".
fn format_usd(amount: f64, decimals: usize) -> String {
    let formatted = format!("{amount:.decimals$}");
    let (int_part, frac) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::new();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    match frac {
        Some(f) => format!("${grouped}.{f}"),
        None => format!("${grouped}"),
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.source.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(snapshot)) = (&state.dataset, &state.snapshot) {
            ui.label(format!(
                "{} rows loaded, {} matching filters",
                ds.len(),
                snapshot.matching.len()
            ));
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

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sales data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

#[cfg(test)]
mod tests {
    use super::format_usd;

    #[test]
    fn formats_dollar_amounts_with_separators() {
        assert_eq!(format_usd(0.0, 0), "$0");
        assert_eq!(format_usd(950.0, 0), "$950");
        assert_eq!(format_usd(1234.0, 0), "$1,234");
        assert_eq!(format_usd(1234567.0, 0), "$1,234,567");
        assert_eq!(format_usd(1234.5, 2), "$1,234.50");
    }
}
