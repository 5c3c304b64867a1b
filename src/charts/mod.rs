//! Charts module - state accident maps

mod boundaries;
mod renderer;
mod state_map;

pub use boundaries::{hull_outline, BaseMap};
pub use renderer::PngMapRenderer;
pub use state_map::{plot_state, select_state, MapBounds, MapSink, PlotOutcome, StateMap};
