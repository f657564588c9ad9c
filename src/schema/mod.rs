//! Schema module - Configuration, dimensions and display types for the visualization.

mod config;
mod display;
mod grid;

pub use config::*;
pub use display::*;
pub use grid::*;
