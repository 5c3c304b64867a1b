//! FARS Map - accident loading, monthly summaries & state scatter maps
//!
//! Reads `accident_<year>.csv.bz2` files from the Fatality Analysis Reporting
//! System, counts accidents per month across years, and plots one state's
//! accident locations for a year.

pub mod charts;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod stats;

pub use charts::{plot_state, MapSink, PlotOutcome, PngMapRenderer};
pub use config::FarsConfig;
pub use data::{build_filename, load_records, AccidentTable, FarsDataset, YearTaggedTable};
pub use error::{FarsError, Result};
pub use stats::{summarize, SummaryPivot};
