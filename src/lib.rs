// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Threat Index Engine

pub mod types;
pub mod params;
pub mod random_walk;
pub mod window;
pub mod oscillator;
pub mod projection;
pub mod ledger;
pub mod clock;
pub mod scheduler;
pub mod simulation;

pub use types::*;
pub use params::{ConfigError, EngineParams};
pub use simulation::{EngineError, SubscriptionId, ThreatEngine};

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

// ─── WASM Interface ──────────────────────────────────────────────────────────

#[wasm_bindgen]
impl ThreatEngine {
    /// `params_json` may override any subset of the engine parameters.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32, params_json: Option<String>) -> Result<ThreatEngine, JsError> {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        let params = match params_json {
            Some(raw) => EngineParams::from_json(&raw)?,
            None => EngineParams::default(),
        };
        Ok(ThreatEngine::with_params(params, seed as u64)?)
    }

    /// Begin ticking; `now` is `Date.now()`.
    pub fn start(&mut self, now: f64) {
        self.start_at(now as u64);
        log(&format!("threat feed running every {} ms", self.params.tick_period_ms));
    }

    pub fn stop(&mut self) {
        self.stop_feed();
    }

    pub fn is_running(&self) -> bool {
        self.running()
    }

    /// Call from a timer or animation frame. Returns the tick result when a
    /// tick fired, `null` otherwise.
    pub fn poll(&mut self, now: f64) -> Result<JsValue, JsError> {
        match self.poll_at(now as u64)? {
            Some(result) => Ok(serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)),
            None => Ok(JsValue::NULL),
        }
    }

    pub fn tick(&mut self) -> Result<JsValue, JsError> {
        let result = self.tick_core()?;
        Ok(serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL))
    }

    /// `vote` is `"escalate"` or `"deescalate"`.
    pub fn cast_vote(&mut self, vote: &str) -> Result<JsValue, JsError> {
        let vote = Vote::parse(vote)
            .ok_or_else(|| JsError::new(&format!("unknown vote: {}", vote)))?;
        let outcome = self.cast(vote);
        Ok(serde_wasm_bindgen::to_value(&outcome).unwrap_or(JsValue::NULL))
    }

    pub fn get_window(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.window.to_vec()).unwrap_or(JsValue::NULL)
    }

    pub fn get_price(&self) -> f64 {
        self.price
    }

    pub fn get_index(&self) -> f64 {
        self.index()
    }

    pub fn get_ledger(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.ledger.tally()).unwrap_or(JsValue::NULL)
    }

    pub fn get_current_vote(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.ledger.current_vote()).unwrap_or(JsValue::NULL)
    }

    pub fn get_snapshot(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.snapshot()).unwrap_or(JsValue::NULL)
    }

    pub fn get_chart_path(&self, width: f64, height: f64) -> Result<JsValue, JsError> {
        let path = self.chart_path_in(projection::Viewport { width, height })?;
        Ok(serde_wasm_bindgen::to_value(&path).unwrap_or(JsValue::NULL))
    }

    /// SVG `points` string for the configured chart viewport.
    pub fn get_polyline(&self) -> Result<String, JsError> {
        Ok(self.chart_path()?.polyline_points())
    }

    pub fn get_area_path(&self) -> Result<String, JsError> {
        Ok(self.chart_path()?.area_path())
    }

    /// Register a callback invoked with every tick and vote event.
    pub fn on_event(&mut self, callback: js_sys::Function) -> u32 {
        let id = self.subscribe(Box::new(move |event| {
            let payload = serde_wasm_bindgen::to_value(event).unwrap_or(JsValue::NULL);
            if let Err(err) = callback.call1(&JsValue::NULL, &payload) {
                log(&format!("threat feed subscriber threw: {:?}", err));
            }
        }));
        id.raw() as u32
    }

    pub fn off_event(&mut self, id: u32) -> bool {
        self.unsubscribe(SubscriptionId::from_raw(id as u64))
    }
}
