// Host-side tests for distance falloff and the proximity interpolator.

#![allow(dead_code)]
use glam::Vec2;
use pointer_fx_core::{
    ConfigError, Falloff, GeometryCache, ParameterSink, PointerSample, ProximityInterpolator,
    Rect, ResponseCurveConfig, TargetId,
};

#[derive(Default)]
struct RecordingSink {
    proximity: Vec<(TargetId, f32, Vec<f32>)>,
}

impl ParameterSink for RecordingSink {
    fn proximity(&mut self, id: TargetId, falloff: f32, values: &[f32]) {
        self.proximity.push((id, falloff, values.to_vec()));
    }

    fn magnetic(&mut self, _id: TargetId, _offset: Vec2, _active: bool) {}
}

const ALL: [Falloff; 3] = [Falloff::Linear, Falloff::Exponential, Falloff::Gaussian];

fn sample(x: f32, y: f32, changed: bool) -> Option<PointerSample> {
    Some(PointerSample {
        position: Vec2::new(x, y),
        timestamp_ms: 0.0,
        changed,
    })
}

// One target centered on (100, 100).
fn measured_cache(id: TargetId) -> GeometryCache {
    let mut cache = GeometryCache::new();
    cache.track(id);
    cache.refresh(id, &|_: TargetId| Some(Rect::new(80.0, 80.0, 40.0, 40.0)));
    cache
}

#[test]
fn every_falloff_is_exactly_zero_at_and_beyond_radius() {
    for f in ALL {
        assert_eq!(f.sample(120.0, 120.0), 0.0, "{:?} at radius", f);
        assert_eq!(f.sample(500.0, 120.0), 0.0, "{:?} beyond radius", f);
        assert_eq!(f.sample(10.0, 0.0), 0.0, "{:?} zero radius", f);
        assert_eq!(f.sample(10.0, f32::NAN), 0.0, "{:?} NaN radius", f);
        assert!((f.sample(0.0, 120.0) - 1.0).abs() < 1e-6, "{:?} at center", f);
    }
}

#[test]
fn falloff_never_increases_with_distance() {
    for f in ALL {
        let mut prev = f.sample(0.0, 120.0);
        for step in 1..=130 {
            let v = f.sample(step as f32, 120.0);
            assert!(v <= prev + 1e-6, "{:?} rose at d={}", f, step);
            assert!((0.0..=1.0).contains(&v));
            prev = v;
        }
    }
}

#[test]
fn exponential_is_steeper_than_linear() {
    let lin = Falloff::Linear.sample(60.0, 120.0);
    let exp = Falloff::Exponential.sample(60.0, 120.0);
    assert!((lin - 0.5).abs() < 1e-6);
    assert!((exp - 0.25).abs() < 1e-6);
}

#[test]
fn half_radius_gives_the_midpoint_value() {
    let id = TargetId(1);
    let cache = measured_cache(id);
    let mut interp = ProximityInterpolator::new();
    interp.register(
        id,
        ResponseCurveConfig::new(120.0, Falloff::Linear)
            .axis(0.0, 10.0)
            .axis(1.0, 3.0),
    );
    let mut sink = RecordingSink::default();
    assert_eq!(interp.tick(sample(160.0, 100.0, true), &cache, &mut sink), 1);

    let (_, falloff, values) = &sink.proximity[0];
    assert!((falloff - 0.5).abs() < 1e-6);
    assert!((values[0] - 5.0).abs() < 1e-5);
    assert!((values[1] - 2.0).abs() < 1e-5);
    assert_eq!(interp.values(id).map(|v| v.len()), Some(2));
}

#[test]
fn out_of_range_pointer_yields_exact_rest_values() {
    let id = TargetId(1);
    let cache = measured_cache(id);
    let mut interp = ProximityInterpolator::new();
    interp.register(
        id,
        ResponseCurveConfig::new(120.0, Falloff::Gaussian)
            .axis(0.3, 0.9)
            .axis(-2.5, 7.0),
    );
    let mut sink = RecordingSink::default();
    interp.tick(sample(100.0, 220.0, true), &cache, &mut sink);
    assert_eq!(interp.values(id), Some(&[0.3, -2.5][..]));
    assert_eq!(interp.falloff(id), Some(0.0));
}

#[test]
fn unchanged_pointer_and_geometry_skip_the_pass() {
    let id = TargetId(1);
    let mut cache = measured_cache(id);
    let mut interp = ProximityInterpolator::new();
    interp.register(id, ResponseCurveConfig::new(120.0, Falloff::Linear).axis(0.0, 1.0));
    let mut sink = RecordingSink::default();

    assert_eq!(interp.tick(sample(130.0, 100.0, true), &cache, &mut sink), 1);
    assert_eq!(interp.tick(sample(130.0, 100.0, false), &cache, &mut sink), 0);
    assert_eq!(sink.proximity.len(), 1);

    // The element moved under a resting pointer: recompute.
    cache.refresh(id, &|_: TargetId| Some(Rect::new(60.0, 80.0, 40.0, 40.0)));
    assert_eq!(interp.tick(sample(130.0, 100.0, false), &cache, &mut sink), 1);
    assert!(sink.proximity[1].1 < sink.proximity[0].1);
}

#[test]
fn moving_pointer_with_same_falloff_writes_nothing() {
    let id = TargetId(1);
    let cache = measured_cache(id);
    let mut interp = ProximityInterpolator::new();
    interp.register(id, ResponseCurveConfig::new(50.0, Falloff::Linear).axis(0.0, 1.0));
    let mut sink = RecordingSink::default();

    interp.tick(sample(400.0, 400.0, true), &cache, &mut sink);
    assert_eq!(interp.tick(sample(450.0, 400.0, true), &cache, &mut sink), 0);
    assert_eq!(sink.proximity.len(), 1);
}

#[test]
fn unmeasured_target_has_no_effect() {
    let id = TargetId(7);
    let mut cache = GeometryCache::new();
    cache.track(id);
    let mut interp = ProximityInterpolator::new();
    interp.register(id, ResponseCurveConfig::new(120.0, Falloff::Linear).axis(4.0, 8.0));
    let mut sink = RecordingSink::default();

    // The zero box sits at the origin, right under this pointer.
    interp.tick(sample(0.0, 0.0, true), &cache, &mut sink);
    assert_eq!(sink.proximity, vec![(id, 0.0, vec![4.0])]);
}

#[test]
fn pointer_leaving_relaxes_targets_once() {
    let id = TargetId(1);
    let cache = measured_cache(id);
    let mut interp = ProximityInterpolator::new();
    interp.register(id, ResponseCurveConfig::new(120.0, Falloff::Linear).axis(1.0, 2.0));
    let mut sink = RecordingSink::default();

    interp.tick(sample(100.0, 100.0, true), &cache, &mut sink);
    assert_eq!(interp.values(id), Some(&[2.0][..]));
    assert_eq!(interp.tick(None, &cache, &mut sink), 1);
    assert_eq!(interp.values(id), Some(&[1.0][..]));
    assert_eq!(interp.tick(None, &cache, &mut sink), 0);
}

#[test]
fn re_registering_replaces_the_curve() {
    let id = TargetId(1);
    let cache = measured_cache(id);
    let mut interp = ProximityInterpolator::new();
    interp.register(id, ResponseCurveConfig::new(120.0, Falloff::Linear).axis(0.0, 1.0));
    interp.register(
        id,
        ResponseCurveConfig::new(120.0, Falloff::Linear)
            .axis(0.0, 1.0)
            .axis(0.0, 1.0),
    );
    assert_eq!(interp.len(), 1);
    let mut sink = RecordingSink::default();
    // A fresh registration forces a pass even for an unchanged pointer.
    assert_eq!(interp.tick(sample(100.0, 100.0, false), &cache, &mut sink), 1);
    assert_eq!(sink.proximity[0].2.len(), 2);
    assert!(interp.unregister(id));
    assert!(!interp.unregister(id));
    assert!(interp.is_empty());
}

#[test]
fn falloff_names_parse_leniently() {
    assert_eq!("Gaussian".parse::<Falloff>(), Ok(Falloff::Gaussian));
    assert_eq!(" exp ".parse::<Falloff>(), Ok(Falloff::Exponential));
    assert_eq!(
        "wobbly".parse::<Falloff>(),
        Err(ConfigError::UnknownFalloff("wobbly".to_string()))
    );
    assert_eq!(Falloff::parse_or_linear("wobbly"), Falloff::Linear);
    for f in ALL {
        assert_eq!(f.name().parse::<Falloff>(), Ok(f));
    }
}

#[test]
fn invalid_radius_is_sanitized() {
    assert_eq!(ResponseCurveConfig::new(-10.0, Falloff::Linear).radius, 0.0);
    assert_eq!(ResponseCurveConfig::new(f32::INFINITY, Falloff::Linear).radius, 0.0);
}
