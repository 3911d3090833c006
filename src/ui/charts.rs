use chrono::{Datelike, NaiveDate};
use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

use crate::color::CategoryColors;
use crate::data::aggregate::{CategoryTotal, DailyTotal};
use crate::state::{AppState, ChartTab};

// ---------------------------------------------------------------------------
// Tabbed charts (central panel)
// ---------------------------------------------------------------------------

/// Tab strip plus the selected aggregate chart.
pub fn chart_tabs(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        for tab in ChartTab::ALL {
            if ui
                .selectable_label(state.selected_tab == tab, tab.label())
                .clicked()
            {
                state.selected_tab = tab;
            }
        }
    });
    ui.separator();

    let Some(snapshot) = &state.snapshot else {
        return;
    };

    match state.selected_tab {
        ChartTab::OverTime => sales_over_time(ui, &snapshot.sales_over_time),
        ChartTab::ByRegion => {
            category_bars(ui, "region_chart", &snapshot.sales_by_region, &state.region_colors)
        }
        ChartTab::ByProduct => category_bars(
            ui,
            "product_chart",
            &snapshot.sales_by_product,
            &state.product_colors,
        ),
    }
}

// ---------------------------------------------------------------------------
// Sales over time – line chart
// ---------------------------------------------------------------------------

fn sales_over_time(ui: &mut Ui, series: &[DailyTotal]) {
    if series.is_empty() {
        no_data(ui);
        return;
    }

    // Dates map onto the x axis as days of the common era, so grid marks
    // convert back to calendar labels without extra lookup state.
    let points: PlotPoints = series
        .iter()
        .map(|row| [row.date.num_days_from_ce() as f64, row.total])
        .collect();

    let line = Line::new(points).name("Sales").width(1.5);

    Plot::new("time_chart")
        .legend(Legend::default())
        .x_axis_label("Date")
        .y_axis_label("Sales")
        .x_axis_formatter(|mark, _range| date_label(mark.value))
        .show(ui, |plot_ui| {
            plot_ui.line(line);
        });
}

fn date_label(value: f64) -> String {
    let days = value.round();
    if (value - days).abs() > 0.25 {
        return String::new();
    }
    NaiveDate::from_num_days_from_ce_opt(days as i32)
        .map(|d| d.format("%b %d").to_string())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Sales by category – bar chart
// ---------------------------------------------------------------------------

fn category_bars(ui: &mut Ui, id: &str, series: &[CategoryTotal], colors: &CategoryColors) {
    if series.is_empty() {
        no_data(ui);
        return;
    }

    let bars: Vec<Bar> = series
        .iter()
        .enumerate()
        .map(|(i, row)| {
            Bar::new(i as f64, row.total)
                .name(&row.category)
                .fill(colors.color_for(&row.category))
        })
        .collect();
    let chart = BarChart::new(bars).width(0.6);

    let labels: Vec<String> = series.iter().map(|r| r.category.clone()).collect();

    Plot::new(id)
        .y_axis_label("Sales")
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
        });
}

fn category_label(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 0.25 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

fn no_data(ui: &mut Ui) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.label("No data for selected filters.");
    });
}
