//! Monthly Accident Summary Module
//! Counts accidents per (year, month) and pivots years into columns.

use crate::data::{FarsDataset, MONTH_COL, YEAR_COL};
use crate::error::Result;
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

const COUNT_COL: &str = "n";

/// One month row of the pivot; `counts` is aligned with [`SummaryPivot::years`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PivotRow {
    pub month: u8,
    pub counts: Vec<Option<u64>>,
}

/// Months as rows, years as columns, accident counts in the cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryPivot {
    /// Loaded years, ascending.
    pub years: Vec<i32>,
    /// Months present in any loaded year, ascending.
    pub rows: Vec<PivotRow>,
    /// Requested years that failed to load, in request order.
    pub skipped_years: Vec<i32>,
}

impl SummaryPivot {
    /// Every loaded year gets a column, even one whose file had no data rows.
    fn from_counts(
        counts: &BTreeMap<(i32, u8), u64>,
        loaded_years: &[i32],
        skipped_years: Vec<i32>,
    ) -> Self {
        let years: Vec<i32> = counts
            .keys()
            .map(|&(year, _)| year)
            .chain(loaded_years.iter().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let months: BTreeSet<u8> = counts.keys().map(|&(_, month)| month).collect();

        let rows = months
            .into_iter()
            .map(|month| PivotRow {
                month,
                counts: years
                    .iter()
                    .map(|&year| counts.get(&(year, month)).copied())
                    .collect(),
            })
            .collect();

        Self {
            years,
            rows,
            skipped_years,
        }
    }

    /// True when no year produced any rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn count(&self, year: i32, month: u8) -> Option<u64> {
        let col = self.years.iter().position(|&y| y == year)?;
        self.rows
            .iter()
            .find(|r| r.month == month)
            .and_then(|r| r.counts[col])
    }

    /// Sum of all cells.
    pub fn total(&self) -> u64 {
        self.rows
            .iter()
            .flat_map(|r| r.counts.iter().flatten())
            .sum()
    }

    /// `MONTH` followed by one nullable count column per year.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.years.len() + 1);
        let months: Vec<i64> = self.rows.iter().map(|r| i64::from(r.month)).collect();
        columns.push(Column::new(MONTH_COL.into(), months));

        for (idx, year) in self.years.iter().enumerate() {
            let cells: Vec<Option<i64>> = self
                .rows
                .iter()
                .map(|r| r.counts[idx].map(|n| n as i64))
                .collect();
            columns.push(Column::new(year.to_string().into(), cells));
        }

        Ok(DataFrame::new(columns)?)
    }
}

impl fmt::Display for SummaryPivot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>5}", MONTH_COL)?;
        for year in &self.years {
            write!(f, " {:>7}", year)?;
        }
        writeln!(f)?;
        for row in &self.rows {
            write!(f, "{:>5}", row.month)?;
            for cell in &row.counts {
                match cell {
                    Some(n) => write!(f, " {:>7}", n)?,
                    None => write!(f, " {:>7}", "NA")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Count accidents per month for each requested year.
///
/// Years that fail to load are warned about and left out; if none load the
/// pivot has no rows.
pub fn summarize(dataset: &FarsDataset, years: &[i32]) -> Result<SummaryPivot> {
    let mut frames = Vec::new();
    let mut loaded = Vec::new();
    let mut skipped = Vec::new();
    for (&year, slot) in years.iter().zip(dataset.load_years(years)) {
        match slot {
            Some(table) => {
                loaded.push(year);
                frames.push(table.to_dataframe()?.lazy());
            }
            None => skipped.push(year),
        }
    }

    if frames.is_empty() {
        return Ok(SummaryPivot::from_counts(&BTreeMap::new(), &loaded, skipped));
    }

    let grouped = concat(frames, UnionArgs::default())?
        .group_by([col(YEAR_COL), col(MONTH_COL)])
        .agg([len().alias(COUNT_COL)])
        .collect()?;

    let year_col = grouped.column(YEAR_COL)?.cast(&DataType::Int64)?;
    let month_col = grouped.column(MONTH_COL)?.cast(&DataType::Int64)?;
    let count_col = grouped.column(COUNT_COL)?.cast(&DataType::UInt64)?;

    let mut counts = BTreeMap::new();
    for ((year, month), n) in year_col
        .i64()?
        .into_iter()
        .zip(month_col.i64()?.into_iter())
        .zip(count_col.u64()?.into_iter())
    {
        if let (Some(year), Some(month), Some(n)) = (year, month, n) {
            counts.insert((year as i32, month as u8), n);
        }
    }

    Ok(SummaryPivot::from_counts(&counts, &loaded, skipped))
}
