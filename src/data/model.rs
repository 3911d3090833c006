use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// SalesRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single sales transaction (one row of the source table).
///
/// Serialized column names match the required input header exactly, which
/// lets the sample generator write files the loader accepts back.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SalesRecord {
    /// Transaction date.
    pub date: NaiveDate,
    /// Sales region, e.g. "East".
    pub region: String,
    /// Product name, e.g. "Widget".
    pub product: String,
    /// Sale amount in dollars. Non-negative and finite once loaded.
    pub sales: f64,
}

// ---------------------------------------------------------------------------
// SalesDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed category indices.
#[derive(Debug, Clone, Default)]
pub struct SalesDataset {
    /// All transactions in source order.
    pub records: Vec<SalesRecord>,
    /// Sorted unique region names.
    pub regions: Vec<String>,
    /// Sorted unique product names.
    pub products: Vec<String>,
    /// Earliest and latest transaction dates; `None` for an empty dataset.
    pub date_span: Option<(NaiveDate, NaiveDate)>,
}

impl SalesDataset {
    /// Build category indices and the date span from the loaded records.
    pub fn from_records(records: Vec<SalesRecord>) -> Self {
        let mut regions: BTreeSet<&str> = BTreeSet::new();
        let mut products: BTreeSet<&str> = BTreeSet::new();
        let mut date_span: Option<(NaiveDate, NaiveDate)> = None;

        for rec in &records {
            regions.insert(&rec.region);
            products.insert(&rec.product);
            date_span = Some(match date_span {
                None => (rec.date, rec.date),
                Some((min, max)) => (min.min(rec.date), max.max(rec.date)),
            });
        }

        let regions = regions.into_iter().map(str::to_string).collect();
        let products = products.into_iter().map(str::to_string).collect();
        SalesDataset {
            records,
            regions,
            products,
            date_span,
        }
    }

    /// Number of transactions.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(date: &str, region: &str, product: &str, sales: f64) -> SalesRecord {
        SalesRecord {
            date: date.parse().unwrap(),
            region: region.to_string(),
            product: product.to_string(),
            sales,
        }
    }

    #[test]
    fn from_records_builds_sorted_unique_categories() {
        let ds = SalesDataset::from_records(vec![
            rec("2024-03-01", "West", "Gadget", 10.0),
            rec("2024-01-05", "East", "Widget", 20.0),
            rec("2024-02-10", "West", "Widget", 30.0),
        ]);

        assert_eq!(ds.regions, vec!["East", "West"]);
        assert_eq!(ds.products, vec!["Gadget", "Widget"]);
        assert_eq!(
            ds.date_span,
            Some(("2024-01-05".parse().unwrap(), "2024-03-01".parse().unwrap()))
        );
        assert_eq!(ds.len(), 3);
    }

    #[test]
    fn empty_dataset_has_no_span() {
        let ds = SalesDataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert!(ds.date_span.is_none());
        assert!(ds.regions.is_empty());
        assert!(ds.products.is_empty());
    }
}
