use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{ChainTable, Column};
use crate::error::LoadError;

/// Parquet footer key naming the table a file holds.
pub const TABLE_METADATA_KEY: &str = "table";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the table named `table` from `path`.  Dispatch by extension.
///
/// Supported sources:
/// * `.parquet` / `.pq` – flat table of numeric columns; if the footer carries
///   a `table` key it must match `table`
/// * `.json`  – `{ "<table>": { "<column>": [...], ... }, ... }`
/// * `.csv`   – header row plus numeric rows; the file is the table
/// * a directory – `<dir>/<table>.parquet`, else `<dir>/<table>.csv`
pub fn load_table(path: &Path, table: &str) -> Result<ChainTable, LoadError> {
    if path.is_dir() {
        return load_from_dir(path, table);
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let loaded = match ext.as_str() {
        "parquet" | "pq" => read_parquet(open(path)?, table),
        "json" => read_json(open(path)?, table),
        "csv" => read_csv(open(path)?).map(Some),
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    let columns = loaded
        .map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?
        .ok_or_else(|| LoadError::MissingTable {
            path: path.to_path_buf(),
            table: table.to_string(),
        })?;

    log::debug!(
        "{}: read {} numeric columns",
        path.display(),
        columns.len()
    );

    Ok(ChainTable {
        source: path.to_path_buf(),
        columns,
    })
}

fn load_from_dir(dir: &Path, table: &str) -> Result<ChainTable, LoadError> {
    let candidate = ["parquet", "csv"]
        .iter()
        .map(|ext| dir.join(format!("{table}.{ext}")))
        .find(|p| p.is_file());

    match candidate {
        Some(file) => load_table(&file, table),
        None => Err(LoadError::MissingTable {
            path: dir.to_path_buf(),
            table: table.to_string(),
        }),
    }
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Open {
        path: PathBuf::from(path),
        source,
    })
}

/// Reject columns of differing length; a ragged table has no row order.
fn check_lengths(columns: &[Column]) -> Result<()> {
    if let Some(first) = columns.first() {
        for col in columns {
            if col.values.len() != first.values.len() {
                bail!(
                    "column '{}' has {} values but '{}' has {}",
                    col.name,
                    col.values.len(),
                    first.name,
                    first.values.len()
                );
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (one object per table, columns as arrays):
///
/// ```json
/// {
///   "posteriors": {
///     "step":  [0, 1, 2, ...],
///     "theta": [0.12, 0.14, ...]
///   }
/// }
/// ```
///
/// `null` entries become `NaN`. Columns holding anything else are skipped.
fn read_json(file: File, table: &str) -> Result<Option<Vec<Column>>> {
    let root: JsonValue =
        serde_json::from_reader(std::io::BufReader::new(file)).context("parsing JSON")?;
    let tables = root
        .as_object()
        .context("Expected top-level JSON object of tables")?;

    let Some(obj) = tables.get(table) else {
        return Ok(None);
    };
    let obj = obj
        .as_object()
        .with_context(|| format!("Table '{table}' is not a JSON object of columns"))?;

    let mut columns = Vec::with_capacity(obj.len());
    for (name, val) in obj {
        let arr = val
            .as_array()
            .with_context(|| format!("Column '{name}' is not an array"))?;
        match json_array_to_f64(arr) {
            Some(values) => columns.push(Column::new(name.clone(), values)),
            None => log::warn!("Skipping non-numeric column '{name}'"),
        }
    }

    check_lengths(&columns)?;
    Ok(Some(columns))
}

fn json_array_to_f64(arr: &[JsonValue]) -> Option<Vec<f64>> {
    arr.iter()
        .map(|v| match v {
            JsonValue::Null => Some(f64::NAN),
            other => other.as_f64(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one sample per row.
/// Empty cells become `NaN`. A column with any non-numeric cell is skipped.
fn read_csv(file: File) -> Result<Vec<Column>> {
    let mut reader = csv::Reader::from_reader(file);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut values: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];
    let mut numeric = vec![true; headers.len()];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        for (col_idx, cell) in record.iter().enumerate().take(headers.len()) {
            if !numeric[col_idx] {
                continue;
            }
            let cell = cell.trim();
            if cell.is_empty() {
                values[col_idx].push(f64::NAN);
                continue;
            }
            match cell.parse::<f64>() {
                Ok(v) => values[col_idx].push(v),
                Err(_) => numeric[col_idx] = false,
            }
        }
    }

    let columns: Vec<Column> = headers
        .into_iter()
        .zip(values)
        .zip(numeric)
        .filter_map(|((name, vals), is_numeric)| {
            if is_numeric {
                Some(Column::new(name, vals))
            } else {
                log::warn!("Skipping non-numeric column '{name}'");
                None
            }
        })
        .collect();

    check_lengths(&columns)?;
    Ok(columns)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding one chain table.
///
/// Expected schema: flat numeric columns (any integer or float width), one of
/// them `step`. Other column types are skipped.
///
/// Works with files written by **Pandas** (`df.to_parquet()`), **Polars**
/// (`df.write_parquet()`) and `arrow`'s `ArrowWriter`.
fn read_parquet(file: File, table: &str) -> Result<Option<Vec<Column>>> {
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let stored_name = builder
        .metadata()
        .file_metadata()
        .key_value_metadata()
        .and_then(|kv| kv.iter().find(|e| e.key == TABLE_METADATA_KEY))
        .and_then(|e| e.value.clone());
    if let Some(name) = stored_name {
        if name != table {
            return Ok(None);
        }
    }

    // Collect numeric column indices (everything else is skipped)
    let schema = builder.schema().clone();
    let numeric_cols: Vec<(usize, String)> = schema
        .fields()
        .iter()
        .enumerate()
        .filter_map(|(i, f)| {
            if is_numeric(f.data_type()) {
                Some((i, f.name().clone()))
            } else {
                log::warn!(
                    "Skipping column '{}' of type {:?}",
                    f.name(),
                    f.data_type()
                );
                None
            }
        })
        .collect();

    let mut columns: Vec<Column> = numeric_cols
        .iter()
        .map(|(_, name)| Column::new(name.clone(), Vec::new()))
        .collect();

    let reader = builder.build().context("building parquet reader")?;
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for ((col_idx, name), column) in numeric_cols.iter().zip(columns.iter_mut()) {
            let as_f64 = cast(batch.column(*col_idx), &DataType::Float64)
                .with_context(|| format!("casting column '{name}' to f64"))?;
            let arr = as_f64.as_primitive::<Float64Type>();
            column
                .values
                .extend(arr.iter().map(|v| v.unwrap_or(f64::NAN)));
        }
    }

    Ok(Some(columns))
}

fn is_numeric(dt: &DataType) -> bool {
    matches!(
        dt,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float16
            | DataType::Float32
            | DataType::Float64
    )
}
