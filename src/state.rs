use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::color::CategoryColors;
use crate::data::filter::FilterCriteria;
use crate::data::loader::{DatasetCache, DEFAULT_DATASET};
use crate::data::model::SalesDataset;
use crate::data::pipeline::{self, DashboardSnapshot};

// ---------------------------------------------------------------------------
// Chart tabs
// ---------------------------------------------------------------------------

/// Which aggregate chart the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartTab {
    #[default]
    OverTime,
    ByRegion,
    ByProduct,
}

impl ChartTab {
    pub const ALL: [ChartTab; 3] = [ChartTab::OverTime, ChartTab::ByRegion, ChartTab::ByProduct];

    pub fn label(self) -> &'static str {
        match self {
            ChartTab::OverTime => "Sales over Time",
            ChartTab::ByRegion => "Sales by Region",
            ChartTab::ByProduct => "Sales by Product",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Debug, Default)]
pub struct AppState {
    /// Per-source dataset cache; populated at most once per path per process.
    pub cache: DatasetCache,

    /// Path the current dataset came from.
    pub source: Option<PathBuf>,

    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<Arc<SalesDataset>>,

    /// Current filter criteria; rebuilt to cover the whole dataset on load.
    pub criteria: FilterCriteria,

    /// Result of the last pipeline run for `criteria` (cached between
    /// interactions, recomputed via [`AppState::refresh`]).
    pub snapshot: Option<DashboardSnapshot>,

    /// Bar colours for the two category charts.
    pub region_colors: CategoryColors,
    pub product_colors: CategoryColors,

    pub selected_tab: ChartTab,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    /// Load `sales_data.csv` from the working directory if it exists.
    pub fn load_default_dataset(&mut self) {
        let path = Path::new(DEFAULT_DATASET);
        if path.exists() {
            self.load_path(path);
        } else {
            log::info!("no {DEFAULT_DATASET} in the working directory, waiting for File → Open");
        }
    }

    /// Load a dataset through the cache; failures land in `status_message`.
    pub fn load_path(&mut self, path: &Path) {
        match self.cache.load(path) {
            Ok(dataset) => {
                self.source = Some(path.to_path_buf());
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Ingest a loaded dataset: reset filters to the full span, rebuild the
    /// chart colours, and compute the first snapshot.
    pub fn set_dataset(&mut self, dataset: Arc<SalesDataset>) {
        self.criteria = FilterCriteria::covering(&dataset);
        self.region_colors = CategoryColors::new(&dataset.regions);
        self.product_colors = CategoryColors::new(&dataset.products);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refresh();
    }

    /// Recompute the snapshot after a criteria change. The whole pipeline
    /// re-runs from the cached dataset; nothing incremental.
    pub fn refresh(&mut self) {
        if let Some(ds) = &self.dataset {
            self.snapshot = Some(pipeline::run(ds, &self.criteria));
        }
    }

    /// Restore the widest criteria for the current dataset.
    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            self.criteria = FilterCriteria::covering(ds);
        }
        self.refresh();
    }

    /// Drop the cache entry for the current source and load it again.
    pub fn reload(&mut self) {
        if let Some(path) = self.source.clone() {
            self.cache.invalidate(&path);
            self.load_path(&path);
        }
    }
}
