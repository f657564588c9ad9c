//! Errors raised by the numeric core.

use crate::schema::{ConfigError, OUTPUT_SIZE};

/// Precondition violations. Both abort only the triggering call and leave
/// all grids and the kernel position untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConvolutionError {
    #[error("Cell ({x}, {y}) on channel {channel} is out of range")]
    IndexOutOfRange { channel: usize, x: usize, y: usize },
    #[error("Kernel position ({x}, {y}) must lie within [0, {max}]", max = OUTPUT_SIZE - 1)]
    PositionOutOfRange { x: usize, y: usize },
}

/// Errors creating a session.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Convolution(#[from] ConvolutionError),
}
