//! Data module - file naming, loading and multi-year aggregation

mod filename;
mod loader;
mod record;
mod years;

pub use filename::{build_filename, IntoYear};
pub use loader::{
    load_records, AccidentTable, LATITUDE_COL, LONGITUDE_COL, MONTH_COL, STATE_COL,
};
pub use record::{AccidentRecord, GeoPoint, MonthYear, LATITUDE_SENTINEL, LONGITUDE_SENTINEL};
pub use years::{FarsDataset, YearFailure, YearLoad, YearTaggedTable, YEAR_COL};

#[cfg(test)]
pub(crate) use loader::tests::write_bz2;
