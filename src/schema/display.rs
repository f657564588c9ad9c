//! Display types shared with the rendering front ends.
//!
//! The numeric core never touches meshes or widgets. It describes what should
//! be drawn through these plain values and the renderer maps them onto its
//! own materials and text.

use serde::{Deserialize, Serialize};

use super::{CHANNELS, INPUT_SIZE, KERNEL_SIZE, KernelPosition, OUTPUT_SIZE};

/// Visual state of a single cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CellStyle {
    /// Channel colour (inputs) or grey (outputs).
    #[default]
    Base,
    /// Covered by the kernel at the current position.
    Highlighted,
}

/// Cells covered by the kernel at one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveCells {
    /// Per-channel input coordinates `(x, y)` under the kernel.
    pub inputs: [Vec<(usize, usize)>; CHANNELS],
    /// Output cell produced at this position.
    pub output: KernelPosition,
}

impl ActiveCells {
    /// Whether the given input cell is covered on the given channel.
    pub fn contains_input(&self, channel: usize, x: usize, y: usize) -> bool {
        self.inputs
            .get(channel)
            .is_some_and(|cells| cells.contains(&(x, y)))
    }

    /// Total number of highlighted input cells across channels.
    pub fn input_count(&self) -> usize {
        self.inputs.iter().map(Vec::len).sum()
    }
}

/// Format a real value the way cube labels and traces show it.
#[inline]
pub fn format_value(value: f32) -> String {
    format!("{value:.1}")
}

/// Complete snapshot of what a renderer should currently show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayFrame {
    /// Current kernel position (mirrors the X/Y sliders).
    pub position: KernelPosition,
    pub highlight_visible: bool,
    pub auto_sweep: bool,
    /// Per-channel input styles, indexed `[channel][y * INPUT_SIZE + x]`.
    pub input_styles: Vec<Vec<CellStyle>>,
    /// Output styles, indexed `[y * OUTPUT_SIZE + x]`.
    pub output_styles: Vec<CellStyle>,
    /// Per-channel input labels, same layout as `input_styles`.
    pub input_labels: Vec<Vec<String>>,
    /// Per-channel kernel labels, indexed `[channel][ky * KERNEL_SIZE + kx]`.
    pub kernel_labels: Vec<Vec<String>>,
    /// Output labels, same layout as `output_styles`.
    pub output_labels: Vec<String>,
    /// Step-by-step calculation for the current position.
    pub trace_lines: Vec<String>,
    pub result_line: String,
    pub summary: String,
}

impl DisplayFrame {
    /// Style of an input cube.
    pub fn input_style(&self, channel: usize, x: usize, y: usize) -> CellStyle {
        self.input_styles[channel][y * INPUT_SIZE + x]
    }

    /// Style of an output cube.
    pub fn output_style(&self, x: usize, y: usize) -> CellStyle {
        self.output_styles[y * OUTPUT_SIZE + x]
    }

    /// Label of an output cube.
    pub fn output_label(&self, x: usize, y: usize) -> &str {
        &self.output_labels[y * OUTPUT_SIZE + x]
    }

    /// Label of a kernel cube.
    pub fn kernel_label(&self, channel: usize, kx: usize, ky: usize) -> &str {
        &self.kernel_labels[channel][ky * KERNEL_SIZE + kx]
    }

    /// Number of highlighted cubes, inputs and outputs together.
    pub fn highlighted_count(&self) -> usize {
        self.input_styles
            .iter()
            .flatten()
            .chain(self.output_styles.iter())
            .filter(|&&s| s == CellStyle::Highlighted)
            .count()
    }
}
