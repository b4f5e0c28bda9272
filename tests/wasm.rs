#![cfg(target_arch = "wasm32")]

use threat_index_engine::ThreatEngine;
use wasm_bindgen_test::*;

fn engine() -> ThreatEngine {
    match ThreatEngine::new(7, None) {
        Ok(engine) => engine,
        Err(_) => panic!("default constructor rejected"),
    }
}

#[wasm_bindgen_test]
fn test_constructor_and_vote_roundtrip() {
    let mut engine = engine();
    assert_eq!(engine.get_price(), 0.0042069);
    assert!(engine.cast_vote("escalate").is_ok());
    assert!(engine.cast_vote("surrender").is_err());
    assert_eq!(engine.get_current_vote().as_string().as_deref(), Some("escalate"));
}

#[wasm_bindgen_test]
fn test_param_override_rejected() {
    assert!(ThreatEngine::new(7, Some(r#"{"window_size": 1}"#.to_string())).is_err());
}

#[wasm_bindgen_test]
fn test_poll_before_start_is_null() {
    let mut engine = engine();
    assert!(engine.poll(1.0e12).ok().map_or(false, |v| v.is_null()));
    engine.start(1.0e12);
    assert!(engine.is_running());
    assert!(engine.poll(1.0e12 + 2000.0).ok().map_or(false, |v| v.is_object()));
    let points = engine.get_polyline().ok().unwrap_or_default();
    assert_eq!(points.split(' ').count(), 50);
}
