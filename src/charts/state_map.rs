//! State Map Plotter
//! Selects one state's accidents for a year and hands the scene to a sink.

use crate::data::{AccidentRecord, FarsDataset, GeoPoint};
use crate::error::{FarsError, Result};
use tracing::{debug, info};

/// Longitude/latitude extent of the plotted points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub min_longitude: f64,
    pub max_longitude: f64,
    pub min_latitude: f64,
    pub max_latitude: f64,
}

impl MapBounds {
    /// `None` when there are no points.
    pub fn from_points(points: &[GeoPoint]) -> Option<Self> {
        let first = points.first()?;
        let init = Self {
            min_longitude: first.longitude,
            max_longitude: first.longitude,
            min_latitude: first.latitude,
            max_latitude: first.latitude,
        };
        Some(points.iter().skip(1).fold(init, |b, p| Self {
            min_longitude: b.min_longitude.min(p.longitude),
            max_longitude: b.max_longitude.max(p.longitude),
            min_latitude: b.min_latitude.min(p.latitude),
            max_latitude: b.max_latitude.max(p.latitude),
        }))
    }

    /// Widen a zero-width extent so it can be drawn.
    pub fn padded(&self, min_span: f64) -> Self {
        let widen = |lo: f64, hi: f64| {
            let missing = (min_span - (hi - lo)).max(0.0) / 2.0;
            (lo - missing, hi + missing)
        };
        let (min_longitude, max_longitude) = widen(self.min_longitude, self.max_longitude);
        let (min_latitude, max_latitude) = widen(self.min_latitude, self.max_latitude);
        Self {
            min_longitude,
            max_longitude,
            min_latitude,
            max_latitude,
        }
    }
}

/// Everything a sink needs to draw one state's map.
#[derive(Debug, Clone, PartialEq)]
pub struct StateMap {
    pub state: u8,
    pub year: i32,
    pub bounds: MapBounds,
    pub points: Vec<GeoPoint>,
}

/// Where rendered maps go.
pub trait MapSink {
    fn render(&mut self, map: &StateMap) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotOutcome {
    /// The state had no plottable accidents; nothing was drawn.
    NoAccidents,
    Rendered { points: usize },
}

/// Build the scene for `state_id` from already loaded records.
///
/// Fails with [`FarsError::InvalidState`] when the state never occurs.
/// Returns `Ok(None)` when the state occurs but no valid coordinates remain.
pub fn select_state(records: &[AccidentRecord], state_id: u8, year: i32) -> Result<Option<StateMap>> {
    if !records.iter().any(|r| r.state == state_id) {
        return Err(FarsError::InvalidState {
            state: i64::from(state_id),
            year,
        });
    }

    let points: Vec<GeoPoint> = records
        .iter()
        .filter(|r| r.state == state_id)
        .filter_map(AccidentRecord::location)
        .collect();

    Ok(MapBounds::from_points(&points).map(|bounds| StateMap {
        state: state_id,
        year,
        bounds,
        points,
    }))
}

/// Plot every accident in `state_id` during `year`.
///
/// The year's file is checked before the state, so a missing file wins over
/// an out-of-range state code.
pub fn plot_state(
    dataset: &FarsDataset,
    state_id: i64,
    year: i32,
    sink: &mut dyn MapSink,
) -> Result<PlotOutcome> {
    let table = dataset.load_year(year)?;
    let state_id = u8::try_from(state_id).map_err(|_| FarsError::InvalidState {
        state: state_id,
        year,
    })?;

    match select_state(table.records(), state_id, year)? {
        None => {
            info!(state = state_id, year, "no accidents to plot");
            Ok(PlotOutcome::NoAccidents)
        }
        Some(map) => {
            debug!(
                state = state_id,
                year,
                points = map.points.len(),
                "rendering state map"
            );
            sink.render(&map)?;
            Ok(PlotOutcome::Rendered {
                points: map.points.len(),
            })
        }
    }
}
