//! Configuration types for the convolution visualization session.

use serde::{Deserialize, Serialize};

use super::{DEFAULT_POSITION, OUTPUT_SIZE};

fn default_start_position() -> (usize, usize) {
    (DEFAULT_POSITION.x, DEFAULT_POSITION.y)
}

fn default_animation_speed() -> f32 {
    0.02
}

fn default_highlight_visible() -> bool {
    true
}

/// Top-level session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizationConfig {
    /// Seed for input values and kernel weights. `None` draws from entropy.
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Kernel position shown after startup.
    #[serde(default = "default_start_position")]
    pub start_position: (usize, usize),
    /// Sweep time added per animation frame. One position lasts `1 / speed` frames.
    #[serde(default = "default_animation_speed")]
    pub animation_speed: f32,
    /// Whether the kernel area is highlighted on startup.
    #[serde(default = "default_highlight_visible")]
    pub highlight_visible: bool,
    /// Whether the automatic sweep starts running.
    #[serde(default)]
    pub auto_sweep: bool,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            random_seed: None,
            start_position: default_start_position(),
            animation_speed: default_animation_speed(),
            highlight_visible: default_highlight_visible(),
            auto_sweep: false,
        }
    }
}

impl VisualizationConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (x, y) = self.start_position;
        if x >= OUTPUT_SIZE || y >= OUTPUT_SIZE {
            return Err(ConfigError::InvalidStartPosition { x, y });
        }
        if !self.animation_speed.is_finite() || self.animation_speed <= 0.0 {
            return Err(ConfigError::InvalidAnimationSpeed(self.animation_speed));
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Start position ({x}, {y}) must lie within [0, {max}]", max = OUTPUT_SIZE - 1)]
    InvalidStartPosition { x: usize, y: usize },
    #[error("Animation speed must be finite and positive, got {0}")]
    InvalidAnimationSpeed(f32),
}
