//! Stats module - monthly accident summaries

mod summary;

pub use summary::{summarize, PivotRow, SummaryPivot};
