//! Kernel position controller.
//!
//! Holds the single authoritative [`KernelPosition`]. Every change goes
//! through [`PositionController::set_position`], which recomputes the output
//! cell and step trace before the new position becomes visible.

use super::{ConvolutionEngine, ConvolutionError, NumericModel, StepTrace};
use crate::schema::{
    ActiveCells, CHANNELS, DEFAULT_POSITION, INPUT_SIZE, KERNEL_SIZE, KernelPosition,
    SWEEP_POSITIONS,
};

/// Result of a position change, ready to push to the display.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionUpdate {
    pub position: KernelPosition,
    /// Recomputed output value at `position`.
    pub value: f32,
    pub trace: StepTrace,
}

/// Position visited by the sweep at time `tick`.
///
/// `floor(tick) mod 36` mapped row-major with x fastest. Negative ticks wrap.
pub fn sweep_position(tick: f64) -> KernelPosition {
    let step = (tick.floor() as i64).rem_euclid(SWEEP_POSITIONS as i64);
    KernelPosition::from_sweep_index(step as usize)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionController {
    position: KernelPosition,
}

impl Default for PositionController {
    fn default() -> Self {
        Self {
            position: DEFAULT_POSITION,
        }
    }
}

impl PositionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current kernel position.
    #[inline]
    pub fn position(&self) -> KernelPosition {
        self.position
    }

    /// Move the kernel and recompute the output cell under it.
    ///
    /// On error the position and output grid are left unchanged.
    pub fn set_position(
        &mut self,
        engine: &mut ConvolutionEngine,
        model: &NumericModel,
        x: usize,
        y: usize,
    ) -> Result<PositionUpdate, ConvolutionError> {
        let position = KernelPosition::new(x, y);
        if !position.is_valid() {
            log::warn!("Rejected kernel position {}", position);
            return Err(ConvolutionError::PositionOutOfRange { x, y });
        }

        let trace = engine.compute_at(model, position)?;
        self.position = position;
        log::debug!("Kernel moved to {}, output {:.3}", position, trace.result);

        Ok(PositionUpdate {
            position,
            value: trace.result,
            trace,
        })
    }

    /// Move the kernel back to the default position.
    pub fn reset_position(
        &mut self,
        engine: &mut ConvolutionEngine,
        model: &NumericModel,
    ) -> Result<PositionUpdate, ConvolutionError> {
        self.set_position(engine, model, DEFAULT_POSITION.x, DEFAULT_POSITION.y)
    }

    /// Move the kernel to the sweep position for time `tick`.
    pub fn advance(
        &mut self,
        engine: &mut ConvolutionEngine,
        model: &NumericModel,
        tick: f64,
    ) -> Result<PositionUpdate, ConvolutionError> {
        let position = sweep_position(tick);
        self.set_position(engine, model, position.x, position.y)
    }

    /// Input cells under the kernel, per channel, clipped to the input grid.
    pub fn active_input_cells(&self) -> [Vec<(usize, usize)>; CHANNELS] {
        let KernelPosition { x: px, y: py } = self.position;
        let window: Vec<(usize, usize)> = (px..(px + KERNEL_SIZE).min(INPUT_SIZE))
            .flat_map(|x| (py..(py + KERNEL_SIZE).min(INPUT_SIZE)).map(move |y| (x, y)))
            .collect();
        std::array::from_fn(|_| window.clone())
    }

    /// Output cell produced at the current position.
    #[inline]
    pub fn active_output_cell(&self) -> KernelPosition {
        self.position
    }

    /// Input and output cells to highlight.
    pub fn active_cells(&self) -> ActiveCells {
        ActiveCells {
            inputs: self.active_input_cells(),
            output: self.active_output_cell(),
        }
    }
}
