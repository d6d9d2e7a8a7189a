use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DataError;
use super::model::{CellValue, JobDataset, SkillColumns};

/// Raw header names (pre-normalization) plus row-major cells.
type RawTable = (Vec<String>, Vec<Vec<CellValue>>);

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a postings dataset from a local path or an `http(s)://` URL.
///
/// Local files dispatch by extension:
/// * `.parquet` – flat Parquet table, one posting per row
/// * `.json`    – `[{ "Company Name": "...", "Python": 1, ... }, ...]`
/// * anything else – delimiter-separated text with a header row
///
/// Remote sources are fetched with a blocking GET and parsed as JSON or CSV
/// depending on the URL path. Header names are normalized and the skill
/// configuration is validated before the dataset is returned.
pub fn load_source(source: &str, skills: &SkillColumns) -> Result<JobDataset, DataError> {
    let (raw_columns, rows) = if is_url(source) {
        fetch_remote(source)?
    } else {
        read_local(Path::new(source))?
    };

    let dataset = JobDataset::from_parts(raw_columns, rows, skills)?;
    log::info!(
        "Loaded {} postings with {} columns ({} skill columns) from {source}",
        dataset.len(),
        dataset.columns.len(),
        dataset.skill_indices().len(),
    );
    Ok(dataset)
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

// ---------------------------------------------------------------------------
// Local files
// ---------------------------------------------------------------------------

fn read_local(path: &Path) -> Result<RawTable, DataError> {
    let file = std::fs::File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataError::NotFound(path.display().to_string()),
        _ => DataError::Parse(format!("opening {}: {e}", path.display())),
    })?;

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => parse_parquet(file).map_err(DataError::parse),
        "json" => {
            let text = std::io::read_to_string(file)
                .map_err(|e| DataError::Parse(format!("reading {}: {e}", path.display())))?;
            parse_json(&text).map_err(DataError::parse)
        }
        // Delimiter-separated text is the expected default for everything else.
        _ => parse_csv(file).map_err(DataError::parse),
    }
}

// ---------------------------------------------------------------------------
// Remote sources
// ---------------------------------------------------------------------------

fn fetch_remote(url: &str) -> Result<RawTable, DataError> {
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| DataError::NotFound(format!("{url}: {e}")))?;

    let text = response
        .text()
        .map_err(|e| DataError::Parse(format!("reading body of {url}: {e}")))?;

    let parsed = if url_names_json(url) {
        parse_json(&text)
    } else {
        parse_csv(text.as_bytes())
    };
    parsed.map_err(DataError::parse)
}

/// Whether the URL path (query string stripped) names a JSON document.
fn url_names_json(url: &str) -> bool {
    url.split(['?', '#'])
        .next()
        .is_some_and(|path| path.to_ascii_lowercase().ends_with(".json"))
}

// ---------------------------------------------------------------------------
// CSV parser
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one posting per row. Cell
/// types are guessed per value; empty cells become `Null`.
fn parse_csv(input: impl std::io::Read) -> Result<RawTable> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(guess_cell_type).collect());
    }

    Ok((headers, rows))
}

fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON parser
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Company Name": "TechMahindra", "Designation": "Team Lead", "Python": 1 },
///   ...
/// ]
/// ```
///
/// Column order follows first appearance across the records; keys missing
/// from a record become `Null` cells.
fn parse_json(text: &str) -> Result<RawTable> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    let mut objects = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let rows = objects
        .iter()
        .map(|obj| {
            columns
                .iter()
                .map(|col| obj.get(col).map_or(CellValue::Null, json_to_cell))
                .collect()
        })
        .collect();

    Ok((columns, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet parser
// ---------------------------------------------------------------------------

/// Load a flat Parquet table: every column is a scalar column (strings,
/// ints, floats, bools). Works with files written by both **Pandas**
/// (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn parse_parquet(file: std::fs::File) -> Result<RawTable> {
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        if batch.num_columns() != columns.len() {
            bail!(
                "record batch has {} columns, schema has {}",
                batch.num_columns(),
                columns.len()
            );
        }
        for row in 0..batch.num_rows() {
            let cells = (0..batch.num_columns())
                .map(|col| extract_cell(batch.column(col), row))
                .collect();
            rows.push(cells);
        }
    }

    Ok((columns, rows))
}

/// Extract a single scalar value from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => {
            if let Some(s) = col.as_any().downcast_ref::<StringArray>() {
                CellValue::String(s.value(row).to_string())
            } else {
                // LargeStringArray
                let s = col.as_string::<i64>();
                CellValue::String(s.value(row).to_string())
            }
        }
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().unwrap();
            CellValue::Integer(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().unwrap();
            CellValue::Integer(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col.as_any().downcast_ref::<Float32Array>().unwrap();
            CellValue::Float(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>().unwrap();
            CellValue::Float(arr.value(row))
        }
        DataType::Boolean => {
            let arr = col.as_any().downcast_ref::<BooleanArray>().unwrap();
            CellValue::Bool(arr.value(row))
        }
        _ => CellValue::String(format!("{:?}", col.data_type())),
    }
}
