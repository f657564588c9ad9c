//! Conv Viz - Interactive visualization of a 3-channel 2D convolution.
//!
//! This crate provides the numeric core behind a first-layer CNN
//! visualization: three 8x8 input channels, a 3x3x3 kernel and the 6x6
//! output grid it produces. A kernel position can be moved by hand, reset,
//! or swept automatically, and every move recomputes the output cell, the
//! highlighted cells and the step-by-step calculation together.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Dimensions, configuration and display types
//! - `compute`: Numeric model, convolution engine, position controller and session
//!
//! Rendering is left to the host. The terminal binary and the WebAssembly
//! bindings both drive a [`Session`] and draw what it reports.
//!
//! # Example
//!
//! ```rust,no_run
//! use conv_viz::{Session, VisualizationConfig};
//!
//! let config = VisualizationConfig {
//!     random_seed: Some(42),
//!     ..Default::default()
//! };
//! let mut session = Session::new(&config)?;
//!
//! let update = session.set_position(4, 1)?;
//! for line in update.trace.lines() {
//!     println!("{line}");
//! }
//! println!("{}", update.trace.result_line());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod compute;
pub mod schema;

// WebAssembly bindings (only for wasm32 target)
#[cfg(target_arch = "wasm32")]
pub mod wasm;

// Re-export commonly used types
pub use compute::{ConvolutionEngine, NumericModel, PositionController, Session, StepTrace};
pub use schema::{KernelPosition, VisualizationConfig};
