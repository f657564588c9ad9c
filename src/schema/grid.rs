//! Fixed grid dimensions and coordinate types.

use serde::{Deserialize, Serialize};

/// Number of input channels (RGB).
pub const CHANNELS: usize = 3;

/// Width and height of each input channel grid.
pub const INPUT_SIZE: usize = 8;

/// Width and height of each kernel slice.
pub const KERNEL_SIZE: usize = 3;

/// Width and height of the output grid (valid convolution, no padding).
pub const OUTPUT_SIZE: usize = INPUT_SIZE - KERNEL_SIZE + 1;

/// Number of distinct kernel positions visited by a full sweep.
pub const SWEEP_POSITIONS: usize = OUTPUT_SIZE * OUTPUT_SIZE;

/// Kernel position used on startup and after a reset.
pub const DEFAULT_POSITION: KernelPosition = KernelPosition { x: 2, y: 2 };

/// Input channel of the first convolution layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    /// All channels in index order.
    pub const ALL: [Channel; CHANNELS] = [Channel::Red, Channel::Green, Channel::Blue];

    /// Channel for a raw index, if valid.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Index of this channel into per-channel arrays.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            Channel::Red => "Red",
            Channel::Green => "Green",
            Channel::Blue => "Blue",
        }
    }
}

/// Top-left corner of the kernel over the input grids.
///
/// Also the coordinate of the single output cell the kernel produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KernelPosition {
    pub x: usize,
    pub y: usize,
}

impl KernelPosition {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates lie inside the output grid.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.x < OUTPUT_SIZE && self.y < OUTPUT_SIZE
    }

    /// Position visited by the sweep at the given step, row-major with x fastest.
    pub fn from_sweep_index(index: usize) -> Self {
        let index = index % SWEEP_POSITIONS;
        Self {
            x: index % OUTPUT_SIZE,
            y: index / OUTPUT_SIZE,
        }
    }
}

impl Default for KernelPosition {
    fn default() -> Self {
        DEFAULT_POSITION
    }
}

impl From<(usize, usize)> for KernelPosition {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for KernelPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}
