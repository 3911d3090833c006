use super::aggregate::{self, CategoryTotal, DailyTotal, SalesSummary};
use super::filter::{filtered_indices, FilterCriteria};
use super::model::SalesDataset;

// ---------------------------------------------------------------------------
// Per-interaction pipeline
// ---------------------------------------------------------------------------

/// Everything the dashboard renders for one set of filter criteria.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    /// Indices of records passing the filters, in source order. Drives the
    /// raw-data table and the row count in the top bar.
    pub matching: Vec<usize>,
    pub summary: SalesSummary,
    pub sales_over_time: Vec<DailyTotal>,
    pub sales_by_region: Vec<CategoryTotal>,
    pub sales_by_product: Vec<CategoryTotal>,
}

/// Run the whole filter-and-aggregate pipeline for one interaction.
///
/// Pure function of (dataset, criteria); the UI re-invokes it whenever the
/// criteria change and caches the snapshot in between.
pub fn run(dataset: &SalesDataset, criteria: &FilterCriteria) -> DashboardSnapshot {
    let matching = filtered_indices(dataset, criteria);
    let summary = aggregate::summarize(dataset, &matching);
    let sales_over_time = aggregate::by_time(dataset, &matching);
    let sales_by_region = aggregate::by_region(dataset, &matching);
    let sales_by_product = aggregate::by_product(dataset, &matching);

    DashboardSnapshot {
        matching,
        summary,
        sales_over_time,
        sales_by_region,
        sales_by_product,
    }
}
