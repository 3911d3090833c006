use chrono::NaiveDate;

use super::model::SalesDataset;

// ---------------------------------------------------------------------------
// Filter criteria: date range plus two optional category constraints
// ---------------------------------------------------------------------------

/// Constraint on a categorical column.
///
/// The default is [`CategoryFilter::All`], so an unset filter means
/// "no constraint" rather than "match nothing".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    /// No constraint: every value passes.
    #[default]
    All,
    /// Exact match on one category value.
    Only(String),
}

impl CategoryFilter {
    /// Whether the given category value passes this filter.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == value,
        }
    }

    /// Label for UI display ("All" or the selected value).
    pub fn label(&self) -> &str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Only(v) => v,
        }
    }
}

/// The complete filter state for one interaction.
///
/// Derived fresh on every user interaction and never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// Inclusive lower bound on the transaction date.
    pub start_date: NaiveDate,
    /// Inclusive upper bound on the transaction date.
    pub end_date: NaiveDate,
    pub region: CategoryFilter,
    pub product: CategoryFilter,
}

impl FilterCriteria {
    /// The widest criteria for a dataset: full date span, no category
    /// constraints. This is the initial UI state after a load.
    pub fn covering(dataset: &SalesDataset) -> Self {
        let (start_date, end_date) = dataset.date_span.unwrap_or_default();
        FilterCriteria {
            start_date,
            end_date,
            region: CategoryFilter::All,
            product: CategoryFilter::All,
        }
    }
}

/// Return indices of records that pass all active filters, in source order.
///
/// A record passes when:
/// * `start_date <= record.date <= end_date` (inclusive both ends), and
/// * its region passes the region filter, and
/// * its product passes the product filter.
///
/// An inverted range (`start_date > end_date`) matches nothing; that is a
/// degenerate empty range, not an error.
pub fn filtered_indices(dataset: &SalesDataset, criteria: &FilterCriteria) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            rec.date >= criteria.start_date
                && rec.date <= criteria.end_date
                && criteria.region.matches(&rec.region)
                && criteria.product.matches(&rec.product)
        })
        .map(|(i, _)| i)
        .collect()
}
