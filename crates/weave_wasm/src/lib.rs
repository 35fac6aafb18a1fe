use serde::Serialize;
use wasm_bindgen::prelude::*;

use weave_core::commentary::summarize;
use weave_core::constants::FRAME_MS;
use weave_core::engine::PhysicsEngine;
use weave_core::state::{Point2, SimulationState};

pub mod feed;

/// The engine behind a canvas render loop. The front end calls `advance`
/// (or `advance_millis` with raw frame timestamps) once per repaint,
/// passing the current pointer-drag state, then reads back positions and
/// metrics for drawing.
#[wasm_bindgen]
pub struct WasmSimulation {
    engine: PhysicsEngine<f64>,
}

/// Scalar metrics bundle the dashboard polls in one call per frame.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub time_dilation: f64,
    pub entropy: f64,
    pub expansion_rate: f64,
    pub total_mass: f64,
    pub total_charge: f64,
    pub stability_ratio: f64,
}

#[wasm_bindgen]
impl WasmSimulation {
    /// Starts a run from the fixed initial configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmSimulation {
        console_error_panic_hook::set_once();
        WasmSimulation {
            engine: PhysicsEngine::new(SimulationState::proton_electron()),
        }
    }

    /// Advances by `dt` simulation time units and returns the full state as
    /// a plain JS object. Pass `dt = 0` with a pointer and dragged id for a
    /// pure drag update.
    pub fn advance(
        &mut self,
        dt: f64,
        pointer_x: Option<f64>,
        pointer_y: Option<f64>,
        dragged_id: Option<String>,
    ) -> Result<JsValue, JsValue> {
        let state = self.advance_inner(dt, pointer_x, pointer_y, dragged_id.as_deref());
        serde_wasm_bindgen::to_value(state).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Like `advance`, taking elapsed wall-clock milliseconds and
    /// normalizing them so a nominal 60 Hz frame is one time unit.
    pub fn advance_millis(
        &mut self,
        elapsed_ms: f64,
        pointer_x: Option<f64>,
        pointer_y: Option<f64>,
        dragged_id: Option<String>,
    ) -> Result<JsValue, JsValue> {
        self.advance(elapsed_ms / FRAME_MS, pointer_x, pointer_y, dragged_id)
    }

    /// The derived metrics as a plain JS object, without the knot and
    /// string arrays.
    pub fn dashboard(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.dashboard_view())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn set_profile_a(&mut self, value: f64) {
        self.engine.profiles_mut().set_a(value);
    }

    pub fn set_profile_b(&mut self, value: f64) {
        self.engine.profiles_mut().set_b(value);
    }

    pub fn set_profile_c(&mut self, value: f64) {
        self.engine.profiles_mut().set_c(value);
    }

    /// Sets or clears a knot's pinned flag; false if the id is unknown.
    pub fn set_pinned(&mut self, id: &str, pinned: bool) -> bool {
        self.engine.set_pinned(id, pinned)
    }

    /// Knot ids in stable iteration order.
    pub fn knot_ids(&self) -> Vec<String> {
        self.engine.state().knots.iter().map(|k| k.id.clone()).collect()
    }

    /// Flat `[x0, y0, x1, y1, ..]` in the same order as `knot_ids`, for
    /// cheap per-frame reads without serializing the whole state.
    pub fn knot_positions(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.engine.state().knots.len() * 2);
        for k in &self.engine.state().knots {
            out.push(k.x);
            out.push(k.y);
        }
        out
    }

    pub fn stability_ratio(&self) -> f64 {
        self.engine.state().stability_ratio
    }

    pub fn time_dilation(&self) -> f64 {
        self.engine.state().time_dilation
    }

    pub fn entropy(&self) -> f64 {
        self.engine.state().entropy
    }

    pub fn expansion_rate(&self) -> f64 {
        self.engine.state().expansion_rate
    }

    pub fn total_mass(&self) -> f64 {
        self.engine.state().total_mass
    }

    pub fn total_charge(&self) -> f64 {
        self.engine.state().total_charge
    }

    /// The free-text summary handed to the commentary service.
    pub fn summary(&self) -> String {
        summarize(self.engine.state(), self.engine.profiles())
    }
}

impl WasmSimulation {
    /// Pointer assembly plus the engine tick; a drag needs both pointer
    /// coordinates, anything less is treated as no pointer.
    fn advance_inner(
        &mut self,
        dt: f64,
        pointer_x: Option<f64>,
        pointer_y: Option<f64>,
        dragged: Option<&str>,
    ) -> &SimulationState<f64> {
        let pointer = match (pointer_x, pointer_y) {
            (Some(x), Some(y)) => Some(Point2 { x, y }),
            _ => None,
        };
        self.engine.advance(dt, pointer, dragged)
    }

    fn dashboard_view(&self) -> DashboardView {
        let state = self.engine.state();
        DashboardView {
            time_dilation: state.time_dilation,
            entropy: state.entropy,
            expansion_rate: state.expansion_rate,
            total_mass: state.total_mass,
            total_charge: state.total_charge,
            stability_ratio: state.stability_ratio,
        }
    }
}

impl Default for WasmSimulation {
    fn default() -> Self {
        Self::new()
    }
}
