use std::path::Path;
use std::sync::Arc;

use sales_insights::data::filter::{CategoryFilter, FilterCriteria};
use sales_insights::data::loader::{load_file, DatasetCache};
use sales_insights::data::pipeline;

const FIXTURE: &str = "tests/fixtures/sales_sample.csv";

#[test]
fn loads_the_fixture() {
    let ds = load_file(Path::new(FIXTURE)).expect("Failed to load fixture");

    assert_eq!(ds.len(), 8);
    assert_eq!(ds.regions, vec!["East", "North", "West"]);
    assert_eq!(ds.products, vec!["Gadget", "Gizmo", "Widget"]);
    assert_eq!(
        ds.date_span,
        Some((
            "2024-01-01".parse().unwrap(),
            "2024-01-05".parse().unwrap()
        ))
    );
}

#[test]
fn full_range_pipeline() {
    let ds = load_file(Path::new(FIXTURE)).expect("Failed to load fixture");
    let snapshot = pipeline::run(&ds, &FilterCriteria::covering(&ds));

    assert_eq!(snapshot.matching.len(), 8);
    assert_eq!(snapshot.summary.total, 1400.0);
    assert_eq!(snapshot.summary.average, Some(175.0));
    assert_eq!(snapshot.summary.top_region.as_deref(), Some("West"));
    // Widget and Gadget both sum to 650; the tie resolves to the
    // lexicographically first product.
    assert_eq!(snapshot.summary.top_product.as_deref(), Some("Gadget"));

    let dates: Vec<String> = snapshot
        .sales_over_time
        .iter()
        .map(|row| row.date.to_string())
        .collect();
    assert_eq!(
        dates,
        vec!["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04", "2024-01-05"]
    );
    assert_eq!(snapshot.sales_over_time[0].total, 350.0);

    let regions: Vec<(&str, f64)> = snapshot
        .sales_by_region
        .iter()
        .map(|row| (row.category.as_str(), row.total))
        .collect();
    assert_eq!(
        regions,
        vec![("West", 800.0), ("East", 450.0), ("North", 150.0)]
    );

    // Per-group totals always add back up to the headline total.
    let product_sum: f64 = snapshot.sales_by_product.iter().map(|r| r.total).sum();
    assert_eq!(product_sum, snapshot.summary.total);
}

#[test]
fn region_filter_pipeline() {
    let ds = load_file(Path::new(FIXTURE)).expect("Failed to load fixture");
    let criteria = FilterCriteria {
        region: CategoryFilter::Only("East".to_string()),
        ..FilterCriteria::covering(&ds)
    };
    let snapshot = pipeline::run(&ds, &criteria);

    assert_eq!(snapshot.matching, vec![0, 2, 5]);
    assert_eq!(snapshot.summary.total, 450.0);
    assert_eq!(snapshot.summary.average, Some(150.0));
    assert_eq!(snapshot.summary.top_region.as_deref(), Some("East"));
    assert_eq!(snapshot.summary.top_product.as_deref(), Some("Widget"));
}

#[test]
fn excluding_range_pipeline_degrades_to_sentinels() {
    let ds = load_file(Path::new(FIXTURE)).expect("Failed to load fixture");
    let criteria = FilterCriteria {
        start_date: "2023-01-01".parse().unwrap(),
        end_date: "2023-12-31".parse().unwrap(),
        ..FilterCriteria::covering(&ds)
    };
    let snapshot = pipeline::run(&ds, &criteria);

    assert!(snapshot.matching.is_empty());
    assert_eq!(snapshot.summary.total, 0.0);
    assert_eq!(snapshot.summary.average, None);
    assert_eq!(snapshot.summary.top_region, None);
    assert_eq!(snapshot.summary.top_product, None);
    assert!(snapshot.sales_over_time.is_empty());
    assert!(snapshot.sales_by_region.is_empty());
    assert!(snapshot.sales_by_product.is_empty());
}

#[test]
fn cache_serves_the_same_dataset_across_runs() {
    let mut cache = DatasetCache::default();
    let first = cache.load(Path::new(FIXTURE)).expect("Failed to load fixture");
    let second = cache.load(Path::new(FIXTURE)).expect("Failed to load fixture");
    assert!(Arc::ptr_eq(&first, &second));
}
