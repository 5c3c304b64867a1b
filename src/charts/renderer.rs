//! Static Map Renderer
//! Draws a state map to PNG with plotters.
//!
//! Layout:
//! 1. Optional title: "STATE {code} accidents, {year}"
//! 2. Base map: lat/long graticule under the state outline, or under the
//!    points' convex hull when no outline is known
//! 3. One small marker per accident

use crate::charts::boundaries::{hull_outline, BaseMap};
use crate::charts::state_map::{MapBounds, MapSink, StateMap};
use crate::error::{FarsError, Result};
use geo::{LineString, MultiPolygon};
use plotters::prelude::*;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

// Colors
const POINT_COLOR: RGBColor = RGBColor(237, 125, 49);
const OUTLINE_COLOR: RGBColor = RGBColor(91, 155, 213);
const LAND_COLOR: RGBColor = RGBColor(242, 242, 242);
const GRID_COLOR: RGBColor = RGBColor(200, 200, 200);

/// Smallest extent (degrees) drawn on either axis.
const MIN_SPAN: f64 = 0.5;
const GRATICULE_STEPS: usize = 6;

/// Writes each map to `<output_dir>/state_<state>_<year>.png`.
pub struct PngMapRenderer {
    output_dir: PathBuf,
    width: u32,
    height: u32,
    annotate: bool,
    base_map: BaseMap,
    written: Vec<PathBuf>,
}

impl PngMapRenderer {
    pub fn new(output_dir: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            output_dir: output_dir.into(),
            width,
            height,
            annotate: true,
            base_map: BaseMap::default(),
            written: Vec::new(),
        }
    }

    pub fn with_base_map(mut self, base_map: BaseMap) -> Self {
        self.base_map = base_map;
        self
    }

    /// Title and axis labels need a system font; turn them off on headless hosts.
    pub fn with_annotations(mut self, annotate: bool) -> Self {
        self.annotate = annotate;
        self
    }

    pub fn output_path(&self, state: u8, year: i32) -> PathBuf {
        self.output_dir
            .join(format!("state_{}_{}.png", state, year))
    }

    /// Files written so far, in render order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// The configured outline for the state, else the hull of its points.
    pub fn base_layer(&self, map: &StateMap) -> MultiPolygon<f64> {
        self.base_map
            .outline(map.state)
            .cloned()
            .unwrap_or_else(|| hull_outline(&map.points))
    }

    fn draw(&self, map: &StateMap, path: &Path) -> std::result::Result<(), Box<dyn Error>> {
        let bounds = map.bounds.padded(MIN_SPAN);
        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut builder = ChartBuilder::on(&root);
        builder.margin(10);
        if self.annotate {
            builder
                .caption(
                    format!("STATE {} accidents, {}", map.state, map.year),
                    ("sans-serif", 20),
                )
                .x_label_area_size(30)
                .y_label_area_size(40);
        }
        let mut chart = builder.build_cartesian_2d(
            bounds.min_longitude..bounds.max_longitude,
            bounds.min_latitude..bounds.max_latitude,
        )?;

        if self.annotate {
            chart
                .configure_mesh()
                .disable_mesh()
                .x_desc("Longitude")
                .y_desc("Latitude")
                .draw()?;
        }

        for line in graticule(&bounds) {
            chart.draw_series(LineSeries::new(line, &GRID_COLOR))?;
        }

        let base = self.base_layer(map);
        for polygon in &base.0 {
            chart.draw_series(std::iter::once(Polygon::new(
                ring_points(polygon.exterior()),
                LAND_COLOR.filled(),
            )))?;
            for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
                chart.draw_series(LineSeries::new(ring_points(ring), &OUTLINE_COLOR))?;
            }
        }

        chart.draw_series(
            map.points
                .iter()
                .map(|p| Circle::new((p.longitude, p.latitude), 2, POINT_COLOR.filled())),
        )?;

        root.present()?;
        Ok(())
    }
}

impl MapSink for PngMapRenderer {
    fn render(&mut self, map: &StateMap) -> Result<()> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_path(map.state, map.year);
        self.draw(map, &path)
            .map_err(|e| FarsError::Render(e.to_string()))?;
        info!(path = %path.display(), points = map.points.len(), "wrote state map");
        self.written.push(path);
        Ok(())
    }
}

fn ring_points(ring: &LineString<f64>) -> Vec<(f64, f64)> {
    ring.coords().map(|c| (c.x, c.y)).collect()
}

/// Meridians and parallels at a round spacing inside `bounds`.
fn graticule(bounds: &MapBounds) -> Vec<[(f64, f64); 2]> {
    let mut lines = Vec::new();

    let step = nice_step(bounds.max_longitude - bounds.min_longitude, GRATICULE_STEPS);
    let mut lon = (bounds.min_longitude / step).ceil() * step;
    while lon <= bounds.max_longitude {
        lines.push([(lon, bounds.min_latitude), (lon, bounds.max_latitude)]);
        lon += step;
    }

    let step = nice_step(bounds.max_latitude - bounds.min_latitude, GRATICULE_STEPS);
    let mut lat = (bounds.min_latitude / step).ceil() * step;
    while lat <= bounds.max_latitude {
        lines.push([(bounds.min_longitude, lat), (bounds.max_longitude, lat)]);
        lat += step;
    }

    lines
}

fn nice_step(range: f64, target_steps: usize) -> f64 {
    let raw_step = range / target_steps as f64;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let normalized = raw_step / magnitude;

    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };

    nice * magnitude
}
