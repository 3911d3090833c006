use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::model::{SalesDataset, SalesRecord};

// ---------------------------------------------------------------------------
// Aggregate outputs
// ---------------------------------------------------------------------------

/// Headline metrics over a filtered subset.
///
/// `average` and the top categories are `None` on an empty subset; the UI
/// renders those as "N/A". Aggregation never fails.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesSummary {
    /// Sum of sales over the subset; 0 when the subset is empty.
    pub total: f64,
    /// Arithmetic mean of sales; `None` when the subset is empty.
    pub average: Option<f64>,
    /// Region with the highest summed sales.
    pub top_region: Option<String>,
    /// Product with the highest summed sales.
    pub top_product: Option<String>,
}

/// Summed sales for one calendar date.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total: f64,
}

/// Summed sales for one category value (region or product).
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Compute the headline metrics for the given subset of record indices.
pub fn summarize(dataset: &SalesDataset, subset: &[usize]) -> SalesSummary {
    if subset.is_empty() {
        return SalesSummary {
            total: 0.0,
            average: None,
            top_region: None,
            top_product: None,
        };
    }

    let total: f64 = records(dataset, subset).map(|r| r.sales).sum();
    let average = Some(total / subset.len() as f64);
    let top_region = top_category(&category_totals(dataset, subset, |r| &r.region));
    let top_product = top_category(&category_totals(dataset, subset, |r| &r.product));

    SalesSummary {
        total,
        average,
        top_region,
        top_product,
    }
}

// ---------------------------------------------------------------------------
// Series
// ---------------------------------------------------------------------------

/// Sales summed per date, ascending by date. Empty subset → empty series.
pub fn by_time(dataset: &SalesDataset, subset: &[usize]) -> Vec<DailyTotal> {
    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for rec in records(dataset, subset) {
        *totals.entry(rec.date).or_default() += rec.sales;
    }
    // BTreeMap iterates in ascending date order.
    totals
        .into_iter()
        .map(|(date, total)| DailyTotal { date, total })
        .collect()
}

/// Sales summed per region, descending by total. Empty subset → empty series.
pub fn by_region(dataset: &SalesDataset, subset: &[usize]) -> Vec<CategoryTotal> {
    descending_totals(category_totals(dataset, subset, |r| &r.region))
}

/// Sales summed per product, descending by total. Empty subset → empty series.
pub fn by_product(dataset: &SalesDataset, subset: &[usize]) -> Vec<CategoryTotal> {
    descending_totals(category_totals(dataset, subset, |r| &r.product))
}

// ---------------------------------------------------------------------------
// Grouping helpers
// ---------------------------------------------------------------------------

fn records<'a>(
    dataset: &'a SalesDataset,
    subset: &'a [usize],
) -> impl Iterator<Item = &'a SalesRecord> {
    subset.iter().map(|&i| &dataset.records[i])
}

fn category_totals<'a>(
    dataset: &'a SalesDataset,
    subset: &'a [usize],
    key: impl Fn(&'a SalesRecord) -> &'a str,
) -> BTreeMap<&'a str, f64> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for rec in records(dataset, subset) {
        *totals.entry(key(rec)).or_default() += rec.sales;
    }
    totals
}

/// Category with the highest total. Ties resolve to the lexicographically
/// first category: groups are scanned in key order and the best is replaced
/// only on a strictly greater total.
fn top_category(totals: &BTreeMap<&str, f64>) -> Option<String> {
    let mut best: Option<(&str, f64)> = None;
    for (cat, &total) in totals {
        let better = match best {
            None => true,
            Some((_, best_total)) => total > best_total,
        };
        if better {
            best = Some((cat, total));
        }
    }
    best.map(|(cat, _)| cat.to_string())
}

/// Descending by total; equal totals order ascending by category name, the
/// same tie rule as [`top_category`].
fn descending_totals(totals: BTreeMap<&str, f64>) -> Vec<CategoryTotal> {
    let mut rows: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });
    rows
}
