//! Visualization session - the explicit owner of all visualization state.
//!
//! A [`Session`] is built once by the host (terminal or browser). It
//! generates the model, fills the output grid, and exposes the logical UI
//! surface: kernel X/Y, reset, auto-sweep and highlight toggles, and one
//! animation frame at a time. Renderers receive changes through a
//! [`DisplaySink`] or pull a full [`DisplayFrame`].

use super::{
    AutoSweep, ConvolutionEngine, ConvolutionError, ModelRng, NumericModel, PositionController,
    PositionUpdate, SessionError, StepTrace, ValueSource,
};
use crate::schema::{
    ActiveCells, CHANNELS, CellStyle, DisplayFrame, INPUT_SIZE, KERNEL_SIZE, KernelPosition,
    OUTPUT_SIZE, VisualizationConfig, format_value,
};

/// Receiver of display updates pushed by [`Session::notify`].
pub trait DisplaySink {
    /// Restore every cube to its base style, then highlight `active` if given.
    fn apply_highlight(&mut self, active: Option<&ActiveCells>);

    /// Replace the text on one output cube.
    fn set_output_label(&mut self, position: KernelPosition, label: &str);

    /// Show the calculation breakdown for the current position.
    fn show_calculation(&mut self, trace: &StepTrace, summary: &str);

    /// Mirror the position onto the X/Y sliders.
    fn sync_sliders(&mut self, _position: KernelPosition) {}
}

/// `"Position (2,2): Processing 27 input values (9 from each RGB layer) to produce 1 output value."`
pub fn operation_summary(position: KernelPosition) -> String {
    let per_channel = KERNEL_SIZE * KERNEL_SIZE;
    format!(
        "Position {}: Processing {} input values ({} from each RGB layer) to produce 1 output value.",
        position,
        CHANNELS * per_channel,
        per_channel
    )
}

/// Live visualization state.
#[derive(Debug, Clone)]
pub struct Session {
    model: NumericModel,
    engine: ConvolutionEngine,
    controller: PositionController,
    sweep: AutoSweep,
    highlight_visible: bool,
    /// Trace for the current position.
    trace: StepTrace,
}

impl Session {
    /// Create a session, drawing values from the configured seed or from entropy.
    pub fn new(config: &VisualizationConfig) -> Result<Self, SessionError> {
        let mut rng = match config.random_seed {
            Some(seed) => ModelRng::new(seed),
            None => ModelRng::random(),
        };
        Self::with_source(config, &mut rng)
    }

    /// Create a session drawing values from `source`.
    pub fn with_source(
        config: &VisualizationConfig,
        source: &mut impl ValueSource,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        let model = NumericModel::generate(source);
        Self::from_model(config, model)
    }

    /// Create a session around an existing model.
    pub fn from_model(
        config: &VisualizationConfig,
        model: NumericModel,
    ) -> Result<Self, SessionError> {
        config.validate()?;

        let mut engine = ConvolutionEngine::from_model(&model);
        let mut controller = PositionController::new();
        let (x, y) = config.start_position;
        let update = controller.set_position(&mut engine, &model, x, y)?;

        log::info!(
            "Session started at {} (sweep {}, highlight {})",
            update.position,
            if config.auto_sweep { "on" } else { "off" },
            if config.highlight_visible { "on" } else { "off" }
        );

        Ok(Self {
            model,
            engine,
            controller,
            sweep: AutoSweep::new(config.animation_speed as f64, config.auto_sweep),
            highlight_visible: config.highlight_visible,
            trace: update.trace,
        })
    }

    pub fn model(&self) -> &NumericModel {
        &self.model
    }

    pub fn engine(&self) -> &ConvolutionEngine {
        &self.engine
    }

    /// Current kernel position.
    pub fn position(&self) -> KernelPosition {
        self.controller.position()
    }

    /// Step trace for the current position.
    pub fn trace(&self) -> &StepTrace {
        &self.trace
    }

    pub fn is_highlight_visible(&self) -> bool {
        self.highlight_visible
    }

    pub fn is_sweeping(&self) -> bool {
        self.sweep.is_running()
    }

    fn record(&mut self, update: PositionUpdate) -> PositionUpdate {
        self.trace = update.trace.clone();
        update
    }

    /// Move the kernel to `(x, y)`.
    pub fn set_position(&mut self, x: usize, y: usize) -> Result<PositionUpdate, ConvolutionError> {
        let update = self
            .controller
            .set_position(&mut self.engine, &self.model, x, y)?;
        Ok(self.record(update))
    }

    /// Move the kernel horizontally, keeping its row.
    pub fn set_kernel_x(&mut self, x: usize) -> Result<PositionUpdate, ConvolutionError> {
        let y = self.position().y;
        self.set_position(x, y)
    }

    /// Move the kernel vertically, keeping its column.
    pub fn set_kernel_y(&mut self, y: usize) -> Result<PositionUpdate, ConvolutionError> {
        let x = self.position().x;
        self.set_position(x, y)
    }

    /// Move the kernel back to the default position.
    pub fn reset_position(&mut self) -> Result<PositionUpdate, ConvolutionError> {
        let update = self
            .controller
            .reset_position(&mut self.engine, &self.model)?;
        Ok(self.record(update))
    }

    /// Move the kernel to the sweep position for time `tick`.
    pub fn advance(&mut self, tick: f64) -> Result<PositionUpdate, ConvolutionError> {
        let update = self
            .controller
            .advance(&mut self.engine, &self.model, tick)?;
        Ok(self.record(update))
    }

    /// Run one animation frame. Moves the kernel only while the sweep is running.
    pub fn frame(&mut self) -> Result<Option<PositionUpdate>, ConvolutionError> {
        match self.sweep.tick() {
            Some(tick) => self.advance(tick).map(Some),
            None => Ok(None),
        }
    }

    /// Flip the automatic sweep and return whether it is now running.
    pub fn toggle_auto_sweep(&mut self) -> bool {
        let running = self.sweep.toggle();
        log::info!("Auto sweep {}", if running { "started" } else { "stopped" });
        running
    }

    /// Start or stop the automatic sweep. Repeating a request is a no-op.
    pub fn set_auto_sweep(&mut self, running: bool) {
        let changed = if running {
            self.sweep.start()
        } else {
            self.sweep.stop()
        };
        if changed {
            log::info!("Auto sweep {}", if running { "started" } else { "stopped" });
        }
    }

    /// Flip highlight visibility and return whether it is now visible.
    ///
    /// Showing the highlight again re-runs the update for the current
    /// position so labels and trace match what is drawn.
    pub fn toggle_highlight(&mut self) -> Result<bool, ConvolutionError> {
        self.highlight_visible = !self.highlight_visible;
        if self.highlight_visible {
            let KernelPosition { x, y } = self.position();
            self.set_position(x, y)?;
        }
        log::debug!("Highlight visible: {}", self.highlight_visible);
        Ok(self.highlight_visible)
    }

    /// Cells covered by the kernel, regardless of visibility.
    pub fn active_cells(&self) -> ActiveCells {
        self.controller.active_cells()
    }

    /// Cells to draw highlighted, or `None` while the highlight is hidden.
    pub fn visible_highlight(&self) -> Option<ActiveCells> {
        self.highlight_visible.then(|| self.active_cells())
    }

    /// Explanation line for the current position.
    pub fn summary(&self) -> String {
        operation_summary(self.position())
    }

    /// Push the current state to a renderer.
    pub fn notify(&self, sink: &mut impl DisplaySink) {
        let position = self.position();
        sink.apply_highlight(self.visible_highlight().as_ref());
        sink.set_output_label(position, &format_value(self.trace.result));
        sink.show_calculation(&self.trace, &self.summary());
        sink.sync_sliders(position);
    }

    /// Full snapshot of what should be drawn.
    pub fn display_frame(&self) -> DisplayFrame {
        let highlight = self.visible_highlight();

        let input_styles = (0..CHANNELS)
            .map(|c| {
                (0..INPUT_SIZE * INPUT_SIZE)
                    .map(|i| {
                        let (x, y) = (i % INPUT_SIZE, i / INPUT_SIZE);
                        match &highlight {
                            Some(active) if active.contains_input(c, x, y) => {
                                CellStyle::Highlighted
                            }
                            _ => CellStyle::Base,
                        }
                    })
                    .collect()
            })
            .collect();

        let output_styles = (0..OUTPUT_SIZE * OUTPUT_SIZE)
            .map(|i| {
                let cell = KernelPosition::new(i % OUTPUT_SIZE, i / OUTPUT_SIZE);
                match &highlight {
                    Some(active) if active.output == cell => CellStyle::Highlighted,
                    _ => CellStyle::Base,
                }
            })
            .collect();

        let input_labels = (0..CHANNELS)
            .map(|c| {
                (0..INPUT_SIZE * INPUT_SIZE)
                    .map(|i| {
                        self.model
                            .input_value(c, i % INPUT_SIZE, i / INPUT_SIZE)
                            .map(|v| v.to_string())
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        let kernel_labels = (0..CHANNELS)
            .map(|c| {
                (0..KERNEL_SIZE * KERNEL_SIZE)
                    .map(|i| {
                        self.model
                            .kernel_weight(c, i % KERNEL_SIZE, i / KERNEL_SIZE)
                            .map(format_value)
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        let output_labels = self.engine.output().iter().copied().map(format_value).collect();

        DisplayFrame {
            position: self.position(),
            highlight_visible: self.highlight_visible,
            auto_sweep: self.sweep.is_running(),
            input_styles,
            output_styles,
            input_labels,
            kernel_labels,
            output_labels,
            trace_lines: self.trace.lines(),
            result_line: self.trace.result_line(),
            summary: self.summary(),
        }
    }
}
