//! Numeric model - input values and kernel weights.
//!
//! Inputs are integers in `0..=9`, weights are one-decimal reals in
//! `[0.0, 1.0]`. Both are drawn once from an injectable [`ValueSource`] so
//! tests can script exact values.

use rand::prelude::*;

use super::ConvolutionError;
use crate::schema::{CHANNELS, Channel, INPUT_SIZE, KERNEL_SIZE};

/// Source of uniform draws in `[0, 1)`.
pub trait ValueSource {
    fn next_unit(&mut self) -> f64;
}

/// Seedable random source backed by `StdRng`.
pub struct ModelRng {
    rng: StdRng,
}

impl ModelRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with random seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl ValueSource for ModelRng {
    #[inline]
    fn next_unit(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }
}

/// Map a unit draw to an input value in `0..=9`.
#[inline]
fn quantize_input(u: f64) -> u8 {
    ((u * 10.0).floor() as u8).min(9)
}

/// Map a unit draw to a weight in `{0.0, 0.1, ..., 1.0}`.
#[inline]
fn quantize_weight(u: f64) -> f32 {
    ((u * 10.0).round() / 10.0) as f32
}

/// Input grids and kernel weights for all channels.
///
/// Stored flat per channel with row-major indexing `[y * size + x]`.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericModel {
    inputs: Vec<Vec<u8>>,
    weights: Vec<Vec<f32>>,
}

impl NumericModel {
    /// Create a model with every input and weight zeroed.
    pub fn zeroed() -> Self {
        Self {
            inputs: vec![vec![0; INPUT_SIZE * INPUT_SIZE]; CHANNELS],
            weights: vec![vec![0.0; KERNEL_SIZE * KERNEL_SIZE]; CHANNELS],
        }
    }

    /// Create a model filled from the given source.
    pub fn generate(source: &mut impl ValueSource) -> Self {
        let mut model = Self::zeroed();
        model.fill(source);
        model
    }

    /// Fill inputs then weights, channel by channel, in row-major order.
    pub fn fill(&mut self, source: &mut impl ValueSource) {
        for channel in &mut self.inputs {
            for cell in channel.iter_mut() {
                *cell = quantize_input(source.next_unit());
            }
        }
        for channel in &mut self.weights {
            for cell in channel.iter_mut() {
                *cell = quantize_weight(source.next_unit());
            }
        }
        log::debug!(
            "Generated {} input values and {} kernel weights",
            CHANNELS * INPUT_SIZE * INPUT_SIZE,
            CHANNELS * KERNEL_SIZE * KERNEL_SIZE
        );
    }

    /// Input value at `(x, y)` on a channel.
    pub fn input_value(&self, channel: usize, x: usize, y: usize) -> Result<u8, ConvolutionError> {
        Channel::from_index(channel)
            .and_then(|c| self.input_at(c, x, y))
            .ok_or(ConvolutionError::IndexOutOfRange { channel, x, y })
    }

    /// Kernel weight at `(x, y)` on a channel.
    pub fn kernel_weight(
        &self,
        channel: usize,
        x: usize,
        y: usize,
    ) -> Result<f32, ConvolutionError> {
        Channel::from_index(channel)
            .and_then(|c| self.weight_at(c, x, y))
            .ok_or(ConvolutionError::IndexOutOfRange { channel, x, y })
    }

    /// Input value, or `None` outside the input grid.
    #[inline]
    pub fn input_at(&self, channel: Channel, x: usize, y: usize) -> Option<u8> {
        if x >= INPUT_SIZE || y >= INPUT_SIZE {
            return None;
        }
        Some(self.inputs[channel.index()][y * INPUT_SIZE + x])
    }

    /// Kernel weight, or `None` outside the kernel.
    #[inline]
    pub fn weight_at(&self, channel: Channel, x: usize, y: usize) -> Option<f32> {
        if x >= KERNEL_SIZE || y >= KERNEL_SIZE {
            return None;
        }
        Some(self.weights[channel.index()][y * KERNEL_SIZE + x])
    }

    /// Build a model from explicit per-channel grids.
    #[cfg(test)]
    pub(crate) fn with_values(inputs: Vec<Vec<u8>>, weights: Vec<Vec<f32>>) -> Self {
        assert_eq!(inputs.len(), CHANNELS);
        assert_eq!(weights.len(), CHANNELS);
        Self { inputs, weights }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Replays a fixed list of draws, cycling when exhausted.
    pub(crate) struct ScriptedSource {
        values: Vec<f64>,
        cursor: usize,
    }

    impl ScriptedSource {
        pub(crate) fn new(values: Vec<f64>) -> Self {
            Self { values, cursor: 0 }
        }
    }

    impl ValueSource for ScriptedSource {
        fn next_unit(&mut self) -> f64 {
            let value = self.values[self.cursor % self.values.len()];
            self.cursor += 1;
            value
        }
    }

    #[test]
    fn test_quantization() {
        assert_eq!(quantize_input(0.0), 0);
        assert_eq!(quantize_input(0.55), 5);
        assert_eq!(quantize_input(0.999_999), 9);
        assert_eq!(quantize_input(1.0), 9);

        assert_eq!(quantize_weight(0.0), 0.0);
        assert_eq!(quantize_weight(0.04), 0.0);
        assert!((quantize_weight(0.26) - 0.3).abs() < 1e-6);
        assert_eq!(quantize_weight(0.97), 1.0);
    }

    #[test]
    fn test_generate_ranges() {
        let mut rng = ModelRng::new(42);
        let model = NumericModel::generate(&mut rng);

        for c in 0..CHANNELS {
            for y in 0..INPUT_SIZE {
                for x in 0..INPUT_SIZE {
                    assert!(model.input_value(c, x, y).unwrap() <= 9);
                }
            }
            for y in 0..KERNEL_SIZE {
                for x in 0..KERNEL_SIZE {
                    let w = model.kernel_weight(c, x, y).unwrap();
                    assert!((0.0..=1.0).contains(&w));
                    // One decimal digit
                    assert!((w * 10.0 - (w * 10.0).round()).abs() < 1e-5);
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_model() {
        let a = NumericModel::generate(&mut ModelRng::new(7));
        let b = NumericModel::generate(&mut ModelRng::new(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_fill_order_inputs_then_weights() {
        // 192 input draws followed by 27 weight draws
        let mut values = vec![0.35; CHANNELS * INPUT_SIZE * INPUT_SIZE];
        values.extend(std::iter::repeat_n(0.5, CHANNELS * KERNEL_SIZE * KERNEL_SIZE));
        let model = NumericModel::generate(&mut ScriptedSource::new(values));

        assert_eq!(model.input_value(2, 7, 7).unwrap(), 3);
        assert_eq!(model.kernel_weight(0, 0, 0).unwrap(), 0.5);
        assert_eq!(model.kernel_weight(2, 2, 2).unwrap(), 0.5);
    }

    #[test]
    fn test_accessors_reject_out_of_range() {
        let model = NumericModel::zeroed();
        assert_eq!(
            model.input_value(3, 0, 0),
            Err(ConvolutionError::IndexOutOfRange { channel: 3, x: 0, y: 0 })
        );
        assert!(model.input_value(0, 8, 0).is_err());
        assert!(model.input_value(0, 0, 8).is_err());
        assert!(model.kernel_weight(0, 3, 0).is_err());
        assert!(model.kernel_weight(0, 0, 3).is_err());
        assert!(model.kernel_weight(0, 2, 2).is_ok());
    }
}
