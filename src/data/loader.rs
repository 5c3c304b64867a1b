//! Accident Record Loader Module
//! Reads `.csv.bz2` files into an [`AccidentTable`] using Polars.

use crate::data::record::AccidentRecord;
use crate::error::{FarsError, Result};
use bzip2::read::MultiBzDecoder;
use polars::prelude::*;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;
use tracing::debug;

pub const STATE_COL: &str = "STATE";
pub const MONTH_COL: &str = "MONTH";
pub const LONGITUDE_COL: &str = "LONGITUD";
pub const LATITUDE_COL: &str = "LATITUDE";

/// One year's accident file: every column as read, plus the typed view.
#[derive(Debug, Clone)]
pub struct AccidentTable {
    df: DataFrame,
    records: Vec<AccidentRecord>,
}

impl AccidentTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[AccidentRecord] {
        &self.records
    }

    /// Distinct STATE codes, ascending.
    pub fn distinct_states(&self) -> BTreeSet<u8> {
        self.records.iter().map(|r| r.state).collect()
    }

    /// Get list of column names from the underlying DataFrame.
    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn into_dataframe(self) -> DataFrame {
        self.df
    }
}

/// Load and parse one compressed accident file.
///
/// Existence is checked before the file is opened, so a missing file never
/// reaches the decompressor. Either the whole file parses or the call fails.
pub fn load_records(path: impl AsRef<Path>) -> Result<AccidentTable> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(FarsError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = decompress(path)?;
    debug!(path = %path.display(), bytes = bytes.len(), "decompressed");

    let opts = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(10000));
    let df = opts
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(|source| FarsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let records = typed_records(&df, path)?;
    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded accident table"
    );

    Ok(AccidentTable { df, records })
}

fn decompress(path: &Path) -> Result<Vec<u8>> {
    let wrap = |source| FarsError::Decompress {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(wrap)?;
    let mut bytes = Vec::new();
    // concatenated streams (pbzip2, joined chunks) must all be read
    MultiBzDecoder::new(file).read_to_end(&mut bytes).map_err(wrap)?;
    Ok(bytes)
}

fn typed_records(df: &DataFrame, path: &Path) -> Result<Vec<AccidentRecord>> {
    let states = code_column(df, path, STATE_COL)?;
    let months = code_column(df, path, MONTH_COL)?;
    let longitudes = coordinate_column(df, path, LONGITUDE_COL)?;
    let latitudes = coordinate_column(df, path, LATITUDE_COL)?;

    if let Some(row) = months.iter().position(|m| !(1..=12).contains(m)) {
        return Err(FarsError::InvalidValue {
            path: path.to_path_buf(),
            column: MONTH_COL,
            row,
        });
    }

    Ok(states
        .into_iter()
        .zip(months)
        .zip(longitudes.into_iter().zip(latitudes))
        .map(|((state, month), (longitude, latitude))| AccidentRecord {
            state,
            month,
            longitude,
            latitude,
        })
        .collect())
}

fn required_column<'a>(df: &'a DataFrame, path: &Path, name: &'static str) -> Result<&'a Column> {
    df.column(name).map_err(|_| FarsError::MissingColumn {
        path: path.to_path_buf(),
        column: name,
    })
}

/// Small non-null integer codes (STATE, MONTH).
fn code_column(df: &DataFrame, path: &Path, name: &'static str) -> Result<Vec<u8>> {
    let as_i64 = required_column(df, path, name)?.cast(&DataType::Int64)?;
    as_i64
        .i64()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.and_then(|v| u8::try_from(v).ok())
                .ok_or_else(|| FarsError::InvalidValue {
                    path: path.to_path_buf(),
                    column: name,
                    row,
                })
        })
        .collect()
}

fn coordinate_column(df: &DataFrame, path: &Path, name: &'static str) -> Result<Vec<Option<f64>>> {
    let as_f64 = required_column(df, path, name)?.cast(&DataType::Float64)?;
    Ok(as_f64.f64()?.into_iter().collect())
}
