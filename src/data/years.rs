//! Multi-year loading with per-year failure isolation.

use crate::data::filename::{build_filename, IntoYear};
use crate::data::loader::{load_records, AccidentTable, MONTH_COL};
use crate::data::record::MonthYear;
use crate::error::{FarsError, Result};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const YEAR_COL: &str = "year";

/// A directory holding `accident_<year>.csv.bz2` files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FarsDataset {
    data_dir: PathBuf,
}

/// A year that could not be loaded, and why.
#[derive(Debug)]
pub struct YearFailure {
    pub year: i32,
    pub error: FarsError,
}

pub type YearLoad = std::result::Result<YearTaggedTable, YearFailure>;

/// The `MONTH` + `year` projection of one year's file.
#[derive(Debug, Clone, PartialEq)]
pub struct YearTaggedTable {
    pub year: i32,
    pub rows: Vec<MonthYear>,
}

impl YearTaggedTable {
    fn from_table(year: i32, table: &AccidentTable) -> Self {
        let rows = table
            .records()
            .iter()
            .map(|r| MonthYear {
                month: r.month,
                year,
            })
            .collect();
        Self { year, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Two-column frame: `MONTH` (Int64) and `year` (Int32).
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let months: Vec<i64> = self.rows.iter().map(|r| i64::from(r.month)).collect();
        let years: Vec<i32> = self.rows.iter().map(|r| r.year).collect();
        let df = DataFrame::new(vec![
            Column::new(MONTH_COL.into(), months),
            Column::new(YEAR_COL.into(), years),
        ])?;
        Ok(df)
    }
}

impl FarsDataset {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Full path of a year's data file.
    pub fn year_path<Y: IntoYear>(&self, year: Y) -> PathBuf {
        self.data_dir.join(build_filename(year))
    }

    /// Load every column of one year's file.
    pub fn load_year<Y: IntoYear>(&self, year: Y) -> Result<AccidentTable> {
        load_records(self.year_path(year))
    }

    /// One outcome per requested year, in request order.
    pub fn try_load_years(&self, years: &[i32]) -> Vec<YearLoad> {
        years
            .iter()
            .map(|&year| {
                self.load_year(year)
                    .map(|table| YearTaggedTable::from_table(year, &table))
                    .map_err(|error| YearFailure { year, error })
            })
            .collect()
    }

    /// Like [`try_load_years`](Self::try_load_years), but failures become a
    /// warning and a `None` slot.
    pub fn load_years(&self, years: &[i32]) -> Vec<Option<YearTaggedTable>> {
        self.try_load_years(years)
            .into_iter()
            .map(|outcome| match outcome {
                Ok(table) => Some(table),
                Err(failure) => {
                    warn_invalid_year(&failure);
                    None
                }
            })
            .collect()
    }
}

fn warn_invalid_year(failure: &YearFailure) {
    warn!(year = failure.year, error = %failure.error, "invalid year: {}", failure.year);
}
