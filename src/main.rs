use eframe::egui;

use sales_insights::app::SalesApp;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sales Insights Dashboard",
        options,
        Box::new(|_cc| {
            let mut app = SalesApp::default();
            // Pick up sales_data.csv from the working directory when present.
            app.state.load_default_dataset();
            Ok(Box::new(app))
        }),
    )
}
