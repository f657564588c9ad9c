//! Compute module - Numeric core of the convolution visualization.

mod controller;
mod convolution;
mod error;
mod model;
mod session;
mod sweep;

pub use controller::*;
pub use convolution::*;
pub use error::*;
pub use model::*;
pub use session::*;
pub use sweep::*;
