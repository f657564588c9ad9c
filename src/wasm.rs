//! WebAssembly bindings for Conv Viz.
//!
//! Provides a thin wrapper around [`Session`] for a browser renderer. The
//! renderer owns the scene, the cubes and the DOM controls; it calls these
//! methods from its slider, button and animation callbacks and redraws from
//! the returned display frame.

use wasm_bindgen::prelude::*;

use crate::{
    compute::{ConvolutionError, PositionUpdate, Session},
    schema::VisualizationConfig,
};

/// Initialize WASM module with panic hook and logging.
#[wasm_bindgen(start)]
pub fn init() {
    // Set panic hook for better error messages in browser
    console_error_panic_hook::set_once();

    // Initialize WASM logger
    wasm_logger::init(wasm_logger::Config::default());
}

fn to_js_error(e: ConvolutionError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// WebAssembly wrapper for a visualization session.
#[wasm_bindgen]
pub struct WasmVisualization {
    session: Session,
}

#[wasm_bindgen]
impl WasmVisualization {
    /// Create a new session from JSON configuration.
    ///
    /// An empty string uses the default configuration. Without a configured
    /// seed, one is drawn from `Math.random`.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WasmVisualization, JsValue> {
        let mut config: VisualizationConfig = if config_json.trim().is_empty() {
            VisualizationConfig::default()
        } else {
            serde_json::from_str(config_json)
                .map_err(|e| JsValue::from_str(&format!("Invalid config JSON: {e}")))?
        };

        if config.random_seed.is_none() {
            config.random_seed = Some((js_sys::Math::random() * u64::MAX as f64) as u64);
        }

        let session = Session::new(&config)
            .map_err(|e| JsValue::from_str(&format!("Session creation failed: {e}")))?;

        Ok(WasmVisualization { session })
    }

    /// Set kernel X (slider input). Returns the new output value.
    #[wasm_bindgen(js_name = setKernelX)]
    pub fn set_kernel_x(&mut self, x: usize) -> Result<f32, JsValue> {
        self.session
            .set_kernel_x(x)
            .map(|u| u.value)
            .map_err(to_js_error)
    }

    /// Set kernel Y (slider input). Returns the new output value.
    #[wasm_bindgen(js_name = setKernelY)]
    pub fn set_kernel_y(&mut self, y: usize) -> Result<f32, JsValue> {
        self.session
            .set_kernel_y(y)
            .map(|u| u.value)
            .map_err(to_js_error)
    }

    /// Move the kernel back to the default position.
    #[wasm_bindgen]
    pub fn reset(&mut self) -> Result<f32, JsValue> {
        self.session
            .reset_position()
            .map(|u| u.value)
            .map_err(to_js_error)
    }

    /// Toggle the automatic sweep. Returns whether it is now running.
    #[wasm_bindgen(js_name = toggleAutoSweep)]
    pub fn toggle_auto_sweep(&mut self) -> bool {
        self.session.toggle_auto_sweep()
    }

    /// Toggle the kernel area highlight. Returns whether it is now visible.
    #[wasm_bindgen(js_name = toggleHighlight)]
    pub fn toggle_highlight(&mut self) -> Result<bool, JsValue> {
        self.session.toggle_highlight().map_err(to_js_error)
    }

    /// Run one animation frame. Returns whether the kernel was moved.
    #[wasm_bindgen]
    pub fn frame(&mut self) -> Result<bool, JsValue> {
        self.session
            .frame()
            .map(|u: Option<PositionUpdate>| u.is_some())
            .map_err(to_js_error)
    }

    /// Get the full display frame as a JS object.
    #[wasm_bindgen(js_name = getFrame)]
    pub fn get_frame(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.session.display_frame())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// Get the active cells as a JS object, or `null` while hidden.
    #[wasm_bindgen(js_name = getHighlight)]
    pub fn get_highlight(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.session.visible_highlight())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// Output grid values, row-major.
    #[wasm_bindgen(js_name = outputValues)]
    pub fn output_values(&self) -> Vec<f32> {
        self.session.engine().output().to_vec()
    }

    /// Current kernel X.
    #[wasm_bindgen(js_name = kernelX)]
    pub fn kernel_x(&self) -> usize {
        self.session.position().x
    }

    /// Current kernel Y.
    #[wasm_bindgen(js_name = kernelY)]
    pub fn kernel_y(&self) -> usize {
        self.session.position().y
    }

    /// Whether the automatic sweep is running.
    #[wasm_bindgen(js_name = isSweeping)]
    pub fn is_sweeping(&self) -> bool {
        self.session.is_sweeping()
    }
}
