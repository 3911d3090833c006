use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{SalesDataset, SalesRecord};

/// Dataset picked up automatically from the working directory at startup.
pub const DEFAULT_DATASET: &str = "sales_data.csv";

/// Date formats accepted in CSV/JSON sources and Utf8 Parquet columns.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a sales table could not be loaded. Fatal to the run that hit it;
/// the UI surfaces the message and no retry is attempted.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("row {row}: {message}")]
    BadRecord { row: usize, message: String },
    #[error(transparent)]
    Malformed(#[from] anyhow::Error),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> DataLoadError + '_ {
    move |source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn malformed<E>(context: &'static str) -> impl FnOnce(E) -> DataLoadError
where
    E: std::error::Error + Send + Sync + 'static,
{
    move |e| DataLoadError::Malformed(anyhow::Error::new(e).context(context))
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a sales table from a file. Dispatch by extension.
///
/// Supported formats, all with required columns `Date`, `Region`, `Product`,
/// `Sales` matched by exact name:
/// * `.csv`     – header row plus one transaction per record (primary)
/// * `.json`    – `[{ "Date": "...", "Region": "...", ... }, ...]`
/// * `.parquet` – flat schema; `Date` as Utf8 strings or Date32
pub fn load_file(path: &Path) -> Result<SalesDataset, DataLoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DataLoadError::UnsupportedExtension(other.to_string())),
    }
}

/// Memoizes loaded datasets per source path for the lifetime of the process.
///
/// Owned by the application state and passed where loading happens, so the
/// caching stays explicit instead of living in a global. Repeated loads of
/// the same path return the same `Arc` without touching the file again;
/// [`DatasetCache::invalidate`] forces the next load to re-read.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, Arc<SalesDataset>>,
}

impl DatasetCache {
    pub fn load(&mut self, path: &Path) -> Result<Arc<SalesDataset>, DataLoadError> {
        if let Some(cached) = self.entries.get(path) {
            log::debug!("dataset cache hit for {}", path.display());
            return Ok(Arc::clone(cached));
        }
        let dataset = Arc::new(load_file(path)?);
        log::info!(
            "loaded {} rows from {}",
            dataset.len(),
            path.display()
        );
        self.entries.insert(path.to_path_buf(), Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Drop the cached entry for one source so the next load re-reads it.
    pub fn invalidate(&mut self, path: &Path) {
        self.entries.remove(path);
    }
}

// ---------------------------------------------------------------------------
// Field parsing shared across formats
// ---------------------------------------------------------------------------

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

fn date_field(raw: &str, row: usize) -> Result<NaiveDate, DataLoadError> {
    parse_date(raw).ok_or_else(|| DataLoadError::BadRecord {
        row,
        message: format!("'{raw}' is not a recognised date (expected e.g. 2024-01-31)"),
    })
}

/// Sales amounts must be non-negative and finite; anything else would poison
/// every aggregate downstream.
fn sales_field(value: f64, row: usize) -> Result<f64, DataLoadError> {
    if !value.is_finite() || value < 0.0 {
        return Err(DataLoadError::BadRecord {
            row,
            message: format!("invalid sales amount {value}"),
        });
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with exact column names, one transaction per row:
///
/// ```csv
/// Date,Region,Product,Sales
/// 2024-01-15,East,Widget,420.0
/// ```
fn load_csv(path: &Path) -> Result<SalesDataset, DataLoadError> {
    let file = File::open(path).map_err(io_error(path))?;
    let mut reader = csv::Reader::from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(malformed("reading CSV header"))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let date_idx = column_index(&headers, "Date")?;
    let region_idx = column_index(&headers, "Region")?;
    let product_idx = column_index(&headers, "Product")?;
    let sales_idx = column_index(&headers, "Sales")?;

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| DataLoadError::BadRecord {
            row: row_no,
            message: e.to_string(),
        })?;

        let date = date_field(record.get(date_idx).unwrap_or(""), row_no)?;
        let raw_sales = record.get(sales_idx).unwrap_or("").trim();
        let sales = raw_sales
            .parse::<f64>()
            .map_err(|_| DataLoadError::BadRecord {
                row: row_no,
                message: format!("'{raw_sales}' is not a number"),
            })?;

        records.push(SalesRecord {
            date,
            region: record.get(region_idx).unwrap_or("").to_string(),
            product: record.get(product_idx).unwrap_or("").to_string(),
            sales: sales_field(sales, row_no)?,
        });
    }

    Ok(SalesDataset::from_records(records))
}

fn column_index(headers: &[String], name: &'static str) -> Result<usize, DataLoadError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or(DataLoadError::MissingColumn(name))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "Date": "2024-01-15", "Region": "East", "Product": "Widget", "Sales": 420.0 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<SalesDataset, DataLoadError> {
    let text = std::fs::read_to_string(path).map_err(io_error(path))?;
    let root: JsonValue = serde_json::from_str(&text).map_err(malformed("parsing JSON"))?;

    let rows = root
        .as_array()
        .ok_or_else(|| DataLoadError::Malformed(anyhow::anyhow!("expected a top-level JSON array of records")))?;

    let mut records = Vec::with_capacity(rows.len());

    for (row_no, rec) in rows.iter().enumerate() {
        let obj = rec.as_object().ok_or_else(|| DataLoadError::BadRecord {
            row: row_no,
            message: "not a JSON object".to_string(),
        })?;

        let date_raw = json_field(obj, "Date")?
            .as_str()
            .ok_or_else(|| DataLoadError::BadRecord {
                row: row_no,
                message: "'Date' is not a string".to_string(),
            })?;
        let sales = json_field(obj, "Sales")?
            .as_f64()
            .ok_or_else(|| DataLoadError::BadRecord {
                row: row_no,
                message: "'Sales' is not a number".to_string(),
            })?;

        records.push(SalesRecord {
            date: date_field(date_raw, row_no)?,
            region: json_string(obj, "Region", row_no)?,
            product: json_string(obj, "Product", row_no)?,
            sales: sales_field(sales, row_no)?,
        });
    }

    Ok(SalesDataset::from_records(records))
}

fn json_field<'a>(
    obj: &'a serde_json::Map<String, JsonValue>,
    name: &'static str,
) -> Result<&'a JsonValue, DataLoadError> {
    obj.get(name).ok_or(DataLoadError::MissingColumn(name))
}

fn json_string(
    obj: &serde_json::Map<String, JsonValue>,
    name: &'static str,
    row: usize,
) -> Result<String, DataLoadError> {
    json_field(obj, name)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| DataLoadError::BadRecord {
            row,
            message: format!("'{name}' is not a string"),
        })
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with a flat sales schema.
///
/// Expected columns:
/// - `Date`: Utf8 date strings or Date32
/// - `Region`, `Product`: Utf8
/// - `Sales`: Float64 or Int64
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<SalesDataset, DataLoadError> {
    let file = File::open(path).map_err(io_error(path))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(malformed("reading parquet metadata"))?;
    let reader = builder.build().map_err(malformed("building parquet reader"))?;

    let mut records = Vec::new();
    let mut row_base = 0usize;

    for batch_result in reader {
        let batch = batch_result.map_err(malformed("reading parquet record batch"))?;
        let schema = batch.schema();

        let date_col = batch.column(parquet_column(&schema, "Date")?);
        let region_col = batch.column(parquet_column(&schema, "Region")?);
        let product_col = batch.column(parquet_column(&schema, "Product")?);
        let sales_col = batch.column(parquet_column(&schema, "Sales")?);

        for row in 0..batch.num_rows() {
            let row_no = row_base + row;
            let bad = |message: String| DataLoadError::BadRecord { row: row_no, message };

            let date = date_from_arrow(date_col, row).map_err(bad)?;
            let region = string_from_arrow(region_col, row, "Region").map_err(bad)?;
            let product = string_from_arrow(product_col, row, "Product").map_err(bad)?;
            let sales = f64_from_arrow(sales_col, row).map_err(bad)?;

            records.push(SalesRecord {
                date,
                region,
                product,
                sales: sales_field(sales, row_no)?,
            });
        }

        row_base += batch.num_rows();
    }

    Ok(SalesDataset::from_records(records))
}

fn parquet_column(
    schema: &arrow::datatypes::Schema,
    name: &'static str,
) -> Result<usize, DataLoadError> {
    schema
        .index_of(name)
        .map_err(|_| DataLoadError::MissingColumn(name))
}

// -- Arrow helpers --

fn date_from_arrow(col: &ArrayRef, row: usize) -> Result<NaiveDate, String> {
    if col.is_null(row) {
        return Err("null 'Date' value".to_string());
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or("expected StringArray for 'Date'")?;
            let raw = arr.value(row);
            parse_date(raw).ok_or_else(|| format!("'{raw}' is not a recognised date"))
        }
        DataType::Date32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Date32Array>()
                .ok_or("expected Date32Array for 'Date'")?;
            // Date32 is days since the Unix epoch; 1970-01-01 is day 719_163
            // of the common era.
            NaiveDate::from_num_days_from_ce_opt(arr.value(row) + 719_163)
                .ok_or_else(|| format!("Date32 value {} out of range", arr.value(row)))
        }
        other => Err(format!("'Date' column has type {other:?}, expected Utf8 or Date32")),
    }
}

fn string_from_arrow(col: &ArrayRef, row: usize, name: &str) -> Result<String, String> {
    if col.is_null(row) {
        return Err(format!("null '{name}' value"));
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| format!("expected StringArray for '{name}'"))?;
            Ok(arr.value(row).to_string())
        }
        other => Err(format!("'{name}' column has type {other:?}, expected Utf8")),
    }
}

fn f64_from_arrow(col: &ArrayRef, row: usize) -> Result<f64, String> {
    if col.is_null(row) {
        return Err("null 'Sales' value".to_string());
    }
    match col.data_type() {
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or("expected Float64Array for 'Sales'")?;
            Ok(arr.value(row))
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .ok_or("expected Int64Array for 'Sales'")?;
            Ok(arr.value(row) as f64)
        }
        other => Err(format!("'Sales' column has type {other:?}, expected Float64 or Int64")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_csv() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "sales.csv",
            "Date,Region,Product,Sales\n2024-01-01,East,A,100\n2024-01-02,West,B,200.5\n",
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].date, "2024-01-01".parse().unwrap());
        assert_eq!(ds.records[0].region, "East");
        assert_eq!(ds.records[1].sales, 200.5);
        assert_eq!(ds.regions, vec!["East", "West"]);
    }

    #[test]
    fn csv_column_order_does_not_matter_but_names_do() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "sales.csv",
            "Sales,Product,Region,Date\n42,A,East,2024-03-01\n",
        );
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.records[0].sales, 42.0);
        assert_eq!(ds.records[0].product, "A");
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "sales.csv", "Date,Region,Sales\n2024-01-01,East,1\n");

        match load_file(&path) {
            Err(DataLoadError::MissingColumn("Product")) => {}
            other => panic!("expected MissingColumn(\"Product\"), got {other:?}"),
        }
    }

    #[test]
    fn unparsable_date_is_a_bad_record() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "sales.csv",
            "Date,Region,Product,Sales\nyesterday,East,A,1\n",
        );

        match load_file(&path) {
            Err(DataLoadError::BadRecord { row: 0, .. }) => {}
            other => panic!("expected BadRecord, got {other:?}"),
        }
    }

    #[test]
    fn negative_sales_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "sales.csv",
            "Date,Region,Product,Sales\n2024-01-01,East,A,-5\n",
        );
        assert!(matches!(
            load_file(&path),
            Err(DataLoadError::BadRecord { row: 0, .. })
        ));
    }

    #[test]
    fn unsupported_extension() {
        assert!(matches!(
            load_file(Path::new("sales.xlsx")),
            Err(DataLoadError::UnsupportedExtension(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            load_file(&dir.path().join("nope.csv")),
            Err(DataLoadError::Io { .. })
        ));
    }

    #[test]
    fn loads_json_records() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "sales.json",
            r#"[
                { "Date": "2024-01-01", "Region": "East", "Product": "A", "Sales": 100 },
                { "Date": "2024/01/02", "Region": "West", "Product": "B", "Sales": 200 }
            ]"#,
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[1].date, "2024-01-02".parse().unwrap());
        assert_eq!(ds.records[1].sales, 200.0);
    }

    #[test]
    fn loads_parquet_with_utf8_dates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sales.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("Date", DataType::Utf8, false),
            Field::new("Region", DataType::Utf8, false),
            Field::new("Product", DataType::Utf8, false),
            Field::new("Sales", DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["2024-01-01", "2024-01-02"])),
                Arc::new(StringArray::from(vec!["East", "West"])),
                Arc::new(StringArray::from(vec!["A", "B"])),
                Arc::new(Float64Array::from(vec![100.0, 200.0])),
            ],
        )
        .unwrap();

        let file = File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].region, "East");
        assert_eq!(ds.records[1].date, "2024-01-02".parse().unwrap());
    }

    #[test]
    fn date32_days_convert_to_calendar_dates() {
        // 19_723 days after 1970-01-01 is 2024-01-01.
        let col: ArrayRef = Arc::new(Date32Array::from(vec![19_723]));
        assert_eq!(
            date_from_arrow(&col, 0).unwrap(),
            "2024-01-01".parse::<NaiveDate>().unwrap()
        );
    }

    #[test]
    fn accepts_multiple_date_formats() {
        assert_eq!(parse_date("2024-01-31"), parse_date("2024/01/31"));
        assert_eq!(parse_date("2024-01-31"), parse_date("01/31/2024"));
        assert_eq!(parse_date("not a date"), None);
    }

    #[test]
    fn cache_returns_the_same_dataset_without_rereading() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "sales.csv",
            "Date,Region,Product,Sales\n2024-01-01,East,A,100\n",
        );

        let mut cache = DatasetCache::default();
        let first = cache.load(&path).unwrap();

        // Even if the file changes on disk, the cached object is served.
        write_file(&dir, "sales.csv", "Date,Region,Product,Sales\n");
        let second = cache.load(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 1);

        // Explicit invalidation re-reads the source.
        cache.invalidate(&path);
        let third = cache.load(&path).unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(third.len(), 0);
    }
}
