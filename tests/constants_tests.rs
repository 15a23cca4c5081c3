// Host-side tests for tuning constants, presets and their relationships.

#![allow(dead_code)]
use pointer_fx_core::constants::*;
use pointer_fx_core::{preset, preset_or_default, ConfigError, Falloff, PRESETS};
use std::collections::HashSet;

#[test]
#[allow(clippy::assertions_on_constants)]
fn constants_are_within_reasonable_bounds() {
    // Scheduling
    assert!(FRAME_INTERVAL_MS > 0.0 && FRAME_INTERVAL_MS < 50.0);
    assert!(POINTER_THROTTLE_MS > 0.0 && POINTER_THROTTLE_MS <= 50.0);
    assert!(INITIAL_SETTLE_DELAY_MS > FRAME_INTERVAL_MS);
    assert!(VISIBILITY_ROOT_MARGIN_PX >= 0.0);

    // Magnetic smoothing eases out slower than it snaps in
    assert!(MAGNETIC_ATTACK_TAU_SEC > 0.0);
    assert!(MAGNETIC_RELEASE_TAU_SEC > MAGNETIC_ATTACK_TAU_SEC);
    assert!(DEFAULT_MAGNETIC_STRENGTH >= 1.0);
    assert!(MAGNETIC_REST_EPSILON > 0.0 && MAGNETIC_REST_EPSILON < 1.0);

    // Drag selection
    assert!(DRAG_OFFSET_THRESHOLD > 0.0);
    assert!(DRAG_VELOCITY_THRESHOLD > 0.0);
    assert!(SETTLE_DAMPING_RATIO > 0.0 && SETTLE_DAMPING_RATIO <= 1.0);
    // Semi-implicit Euler stays stable while omega * h < 2.
    assert!(SETTLE_OMEGA * SETTLE_MAX_STEP_SEC < 2.0);
    // A single tick covers only a handful of sub-steps.
    assert!(SETTLE_MAX_DT_SEC >= SETTLE_MAX_STEP_SEC);
    assert!(SETTLE_MAX_DT_SEC / SETTLE_MAX_STEP_SEC <= 16.0);
}

#[test]
fn preset_names_are_unique() {
    let names: HashSet<_> = PRESETS.iter().map(|p| p.name).collect();
    assert_eq!(names.len(), PRESETS.len());
}

#[test]
fn presets_resolve_by_name() {
    let grid = preset("dot-grid").expect("dot-grid");
    assert_eq!(grid.falloff, Falloff::Gaussian);
    assert_eq!(grid.cell_count(), 24 * 12);

    let glow = preset("cursor-glow").expect("cursor-glow");
    assert!(glow.radius > grid.radius);

    let button = preset("magnetic-button").expect("magnetic-button");
    let magnetic = button.magnetic();
    assert_eq!(magnetic.padding, DEFAULT_MAGNETIC_PADDING);
    assert_eq!(magnetic.strength, DEFAULT_MAGNETIC_STRENGTH);
}

#[test]
fn unknown_preset_is_an_error_or_the_default() {
    assert_eq!(
        preset("confetti"),
        Err(ConfigError::UnknownPreset("confetti".to_string()))
    );
    assert_eq!(preset_or_default("confetti").name, PRESETS[0].name);
}

#[test]
fn response_curve_takes_preset_radius_and_falloff() {
    let glow = preset("cursor-glow").expect("cursor-glow");
    let curve = glow.response_curve(&[(0.0, 1.0), (0.5, 0.8)]);
    assert_eq!(curve.radius, glow.radius);
    assert_eq!(curve.falloff, glow.falloff);
    assert_eq!(curve.axes.len(), 2);
    assert_eq!(curve.rest_values().as_slice(), &[0.0, 0.5]);
}

#[test]
fn every_preset_has_sane_timing() {
    for p in PRESETS {
        assert!(p.timing.throttle_ms > 0.0, "{}", p.name);
        assert!(p.timing.settle_delay_ms >= 0.0, "{}", p.name);
        assert!(
            p.timing.release_tau_sec >= p.timing.attack_tau_sec,
            "{}",
            p.name
        );
        assert!(p.radius >= 0.0, "{}", p.name);
    }
}
