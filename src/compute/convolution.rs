//! Valid 3-channel convolution and per-position step traces.
//!
//! Each output cell `(x, y)` is the sum over channels and kernel offsets
//! `(kx, ky)` of `input[c][x + kx][y + ky] * weight[c][kx][ky]`. Output size
//! is chosen so the window never leaves the input, but terms that would fall
//! outside are skipped rather than indexed.

use serde::{Deserialize, Serialize};

use super::{ConvolutionError, NumericModel};
use crate::schema::{Channel, KERNEL_SIZE, KernelPosition, OUTPUT_SIZE, format_value};

/// One multiply-accumulate term of an output value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceTerm {
    pub channel: Channel,
    /// Input cell read by this term.
    pub input_x: usize,
    pub input_y: usize,
    /// Kernel offset of the weight.
    pub kx: usize,
    pub ky: usize,
    pub input: u8,
    pub weight: f32,
    pub product: f32,
}

impl TraceTerm {
    /// `"  7 × 0.4 = 2.8"`
    pub fn line(&self) -> String {
        format!(
            "  {} × {} = {}",
            self.input,
            format_value(self.weight),
            format_value(self.product)
        )
    }
}

/// Breakdown of every term contributing to the output at one position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepTrace {
    pub position: KernelPosition,
    /// Terms in channel order, then `kx`, then `ky`.
    pub terms: Vec<TraceTerm>,
    /// Full precision sum of all products.
    pub result: f32,
}

impl StepTrace {
    /// Human readable lines: a label per channel, one line per term, then a blank separator.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.terms.len() + 2 * Channel::ALL.len());
        for channel in Channel::ALL {
            lines.push(format!("{} Channel:", channel.label()));
            lines.extend(
                self.terms
                    .iter()
                    .filter(|t| t.channel == channel)
                    .map(TraceTerm::line),
            );
            lines.push(String::new());
        }
        lines
    }

    /// `"Result: 12.3"`
    pub fn result_line(&self) -> String {
        format!("Result: {}", format_value(self.result))
    }

    /// Sum of products on a single channel.
    pub fn channel_sum(&self, channel: Channel) -> f32 {
        self.terms
            .iter()
            .filter(|t| t.channel == channel)
            .map(|t| t.product)
            .sum()
    }
}

/// Sum the window at `position`, handing each term to `visit`.
fn window_sum(
    model: &NumericModel,
    position: KernelPosition,
    mut visit: impl FnMut(TraceTerm),
) -> f32 {
    let mut sum = 0.0f32;

    for channel in Channel::ALL {
        for kx in 0..KERNEL_SIZE {
            for ky in 0..KERNEL_SIZE {
                let input_x = position.x + kx;
                let input_y = position.y + ky;

                let (Some(input), Some(weight)) = (
                    model.input_at(channel, input_x, input_y),
                    model.weight_at(channel, kx, ky),
                ) else {
                    continue;
                };

                let product = input as f32 * weight;
                sum += product;
                visit(TraceTerm {
                    channel,
                    input_x,
                    input_y,
                    kx,
                    ky,
                    input,
                    weight,
                    product,
                });
            }
        }
    }

    sum
}

/// Owns the output grid derived from a [`NumericModel`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConvolutionEngine {
    /// Output values, row-major `[y * OUTPUT_SIZE + x]`.
    output: Vec<f32>,
}

impl Default for ConvolutionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ConvolutionEngine {
    /// Create an engine with a zeroed output grid.
    pub fn new() -> Self {
        Self {
            output: vec![0.0; OUTPUT_SIZE * OUTPUT_SIZE],
        }
    }

    /// Create an engine and immediately fill the whole output grid.
    pub fn from_model(model: &NumericModel) -> Self {
        let mut engine = Self::new();
        engine.compute_all(model);
        engine
    }

    /// Recompute every output cell.
    pub fn compute_all(&mut self, model: &NumericModel) {
        for y in 0..OUTPUT_SIZE {
            for x in 0..OUTPUT_SIZE {
                self.output[y * OUTPUT_SIZE + x] =
                    window_sum(model, KernelPosition::new(x, y), |_| {});
            }
        }
        log::debug!("Computed {}x{} output grid", OUTPUT_SIZE, OUTPUT_SIZE);
    }

    /// Recompute the cell at `position` and return its step trace.
    ///
    /// The recomputed value is written back; it always equals what
    /// [`compute_all`](Self::compute_all) produced for the same model.
    pub fn compute_at(
        &mut self,
        model: &NumericModel,
        position: KernelPosition,
    ) -> Result<StepTrace, ConvolutionError> {
        if !position.is_valid() {
            return Err(ConvolutionError::PositionOutOfRange {
                x: position.x,
                y: position.y,
            });
        }

        let mut terms = Vec::with_capacity(Channel::ALL.len() * KERNEL_SIZE * KERNEL_SIZE);
        let result = window_sum(model, position, |term| terms.push(term));

        let idx = position.y * OUTPUT_SIZE + position.x;
        if self.output[idx] != result {
            log::debug!(
                "Output at {} updated from {} to {}",
                position,
                self.output[idx],
                result
            );
        }
        self.output[idx] = result;

        Ok(StepTrace {
            position,
            terms,
            result,
        })
    }

    /// Stored output value at `(x, y)`.
    pub fn output_value(&self, x: usize, y: usize) -> Result<f32, ConvolutionError> {
        if x >= OUTPUT_SIZE || y >= OUTPUT_SIZE {
            return Err(ConvolutionError::PositionOutOfRange { x, y });
        }
        Ok(self.output[y * OUTPUT_SIZE + x])
    }

    /// Whole output grid, row-major.
    pub fn output(&self) -> &[f32] {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::ModelRng;
    use crate::schema::{CHANNELS, INPUT_SIZE};
    use proptest::prelude::*;

    fn zero_inputs() -> Vec<Vec<u8>> {
        vec![vec![0; INPUT_SIZE * INPUT_SIZE]; CHANNELS]
    }

    fn zero_weights() -> Vec<Vec<f32>> {
        vec![vec![0.0; KERNEL_SIZE * KERNEL_SIZE]; CHANNELS]
    }

    /// Reference sum using the public, bounds-checked accessors.
    fn reference_sum(model: &NumericModel, x: usize, y: usize) -> f32 {
        let mut sum = 0.0f32;
        for c in 0..CHANNELS {
            for kx in 0..KERNEL_SIZE {
                for ky in 0..KERNEL_SIZE {
                    let input = model.input_value(c, x + kx, y + ky).unwrap();
                    let weight = model.kernel_weight(c, kx, ky).unwrap();
                    sum += input as f32 * weight;
                }
            }
        }
        sum
    }

    #[test]
    fn test_single_slice_contribution() {
        // Channel 0: inputs 1, 2, 3 along kx at y = 0, weights 0.5 along kx at ky = 0
        let mut inputs = zero_inputs();
        inputs[0][0] = 1;
        inputs[0][1] = 2;
        inputs[0][2] = 3;
        let mut weights = zero_weights();
        weights[0][0] = 0.5;
        weights[0][1] = 0.5;
        weights[0][2] = 0.5;
        let model = NumericModel::with_values(inputs, weights);

        let mut engine = ConvolutionEngine::from_model(&model);
        let trace = engine.compute_at(&model, KernelPosition::new(0, 0)).unwrap();

        assert!((trace.result - 3.0).abs() < 1e-6);
        assert!((trace.channel_sum(Channel::Red) - 3.0).abs() < 1e-6);
        assert_eq!(trace.channel_sum(Channel::Green), 0.0);
        assert!((engine.output_value(0, 0).unwrap() - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_full_window_sum() {
        let model = NumericModel::generate(&mut ModelRng::new(3));
        let mut engine = ConvolutionEngine::from_model(&model);

        let trace = engine.compute_at(&model, KernelPosition::new(0, 0)).unwrap();
        assert_eq!(trace.terms.len(), 27);
        let expected = reference_sum(&model, 0, 0);
        assert!((trace.result - expected).abs() < 1e-4);
    }

    #[test]
    fn test_trace_lines_layout() {
        let mut inputs = zero_inputs();
        inputs[1][0] = 7;
        let mut weights = zero_weights();
        weights[1][0] = 0.4;
        let model = NumericModel::with_values(inputs, weights);
        let mut engine = ConvolutionEngine::new();

        let trace = engine.compute_at(&model, KernelPosition::new(0, 0)).unwrap();
        let lines = trace.lines();

        // 3 labels + 27 terms + 3 separators
        assert_eq!(lines.len(), 33);
        assert_eq!(lines[0], "Red Channel:");
        assert_eq!(lines[10], "");
        assert_eq!(lines[11], "Green Channel:");
        assert_eq!(lines[12], "  7 × 0.4 = 2.8");
        assert_eq!(lines[22], "Blue Channel:");
        assert_eq!(lines[32], "");
        assert_eq!(trace.result_line(), "Result: 2.8");
    }

    #[test]
    fn test_term_order_kx_then_ky() {
        let model = NumericModel::generate(&mut ModelRng::new(11));
        let mut engine = ConvolutionEngine::new();
        let trace = engine.compute_at(&model, KernelPosition::new(4, 1)).unwrap();

        let first = &trace.terms[0];
        assert_eq!((first.kx, first.ky), (0, 0));
        assert_eq!((first.input_x, first.input_y), (4, 1));
        let second = &trace.terms[1];
        assert_eq!((second.kx, second.ky), (0, 1));
        let last = &trace.terms[26];
        assert_eq!(last.channel, Channel::Blue);
        assert_eq!((last.input_x, last.input_y), (6, 3));
    }

    #[test]
    fn test_compute_at_rejects_out_of_range() {
        let model = NumericModel::generate(&mut ModelRng::new(5));
        let mut engine = ConvolutionEngine::from_model(&model);
        let before = engine.clone();

        assert_eq!(
            engine.compute_at(&model, KernelPosition::new(6, 0)),
            Err(ConvolutionError::PositionOutOfRange { x: 6, y: 0 })
        );
        assert!(engine.compute_at(&model, KernelPosition::new(0, 9)).is_err());
        assert_eq!(engine, before);
        assert!(engine.output_value(6, 6).is_err());
    }

    #[test]
    fn test_uniform_model_gives_uniform_output() {
        let inputs = vec![vec![2; INPUT_SIZE * INPUT_SIZE]; CHANNELS];
        let weights = vec![vec![0.5; KERNEL_SIZE * KERNEL_SIZE]; CHANNELS];
        let model = NumericModel::with_values(inputs, weights);
        let engine = ConvolutionEngine::from_model(&model);

        // 27 terms of 2 * 0.5
        for &v in engine.output() {
            assert!((v - 27.0).abs() < 1e-5);
        }
    }

    proptest! {
        #[test]
        fn prop_compute_at_matches_compute_all(
            seed in any::<u64>(),
            x in 0..OUTPUT_SIZE,
            y in 0..OUTPUT_SIZE,
        ) {
            let model = NumericModel::generate(&mut ModelRng::new(seed));
            let mut engine = ConvolutionEngine::from_model(&model);
            let bulk = engine.output_value(x, y).unwrap();

            let trace = engine.compute_at(&model, KernelPosition::new(x, y)).unwrap();
            prop_assert!((trace.result - bulk).abs() < 1e-4);
            prop_assert!((trace.result - reference_sum(&model, x, y)).abs() < 1e-4);
        }

        #[test]
        fn prop_compute_at_is_idempotent(
            seed in any::<u64>(),
            x in 0..OUTPUT_SIZE,
            y in 0..OUTPUT_SIZE,
        ) {
            let model = NumericModel::generate(&mut ModelRng::new(seed));
            let mut engine = ConvolutionEngine::from_model(&model);
            let position = KernelPosition::new(x, y);

            let first = engine.compute_at(&model, position).unwrap();
            let stored = engine.output_value(x, y).unwrap();
            let second = engine.compute_at(&model, position).unwrap();

            prop_assert_eq!(&first, &second);
            prop_assert_eq!(stored, engine.output_value(x, y).unwrap());
        }

        #[test]
        fn prop_output_bounded(seed in any::<u64>()) {
            let model = NumericModel::generate(&mut ModelRng::new(seed));
            let engine = ConvolutionEngine::from_model(&model);
            for &v in engine.output() {
                prop_assert!((0.0..=243.0).contains(&v));
            }
        }
    }
}
