/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → SalesDataset (cached per source path)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ SalesDataset  │  Vec<SalesRecord>, unique regions/products, date span
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply date/region/product criteria → matching indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │  aggregate    │  totals, averages, top categories, grouped series
///   └──────────────┘
/// ```
///
/// `pipeline::run` strings the last two stages together as one pure function
/// from (dataset, criteria) to everything the dashboard renders.

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;
