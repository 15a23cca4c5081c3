// Host-side tests for magnetic hover offsets and their smoothing.

#![allow(dead_code)]
use glam::Vec2;
use pointer_fx_core::constants::{MAGNETIC_ATTACK_TAU_SEC, MAGNETIC_RELEASE_TAU_SEC};
use pointer_fx_core::{
    magnetic_offset, GeometryCache, MagneticConfig, MagneticField, ParameterSink, Rect, TargetId,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Default)]
struct RecordingSink {
    magnetic: Vec<(TargetId, Vec2, bool)>,
}

impl ParameterSink for RecordingSink {
    fn proximity(&mut self, _id: TargetId, _falloff: f32, _values: &[f32]) {}

    fn magnetic(&mut self, id: TargetId, offset: Vec2, active: bool) {
        self.magnetic.push((id, offset, active));
    }
}

// Button centered on (100, 100), 40x40.
fn button() -> Rect {
    Rect::new(80.0, 80.0, 40.0, 40.0)
}

fn cache_with(id: TargetId) -> GeometryCache {
    let mut cache = GeometryCache::new();
    cache.track(id);
    cache.refresh(id, &|_: TargetId| Some(button()));
    cache
}

#[test]
fn offset_is_pointer_delta_over_strength_inside_padding() {
    let m = magnetic_offset(Vec2::new(130.0, 90.0), button(), 40.0, 4.0);
    assert!(m.active);
    assert_eq!(m.offset, Vec2::new(7.5, -2.5));
}

#[test]
fn hit_region_edge_is_exclusive() {
    // half extent 20 + padding 40 = 60 from the center
    let edge = magnetic_offset(Vec2::new(160.0, 100.0), button(), 40.0, 4.0);
    assert!(!edge.active);
    assert_eq!(edge.offset, Vec2::ZERO);
    let inside = magnetic_offset(Vec2::new(159.0, 100.0), button(), 40.0, 4.0);
    assert!(inside.active);
}

#[test]
fn non_positive_strength_counts_as_one() {
    let m = magnetic_offset(Vec2::new(110.0, 100.0), button(), 0.0, 0.0);
    assert_eq!(m.offset, Vec2::new(10.0, 0.0));
    let m = magnetic_offset(Vec2::new(110.0, 100.0), button(), 0.0, -3.0);
    assert_eq!(m.offset, Vec2::new(10.0, 0.0));
}

#[test]
fn offset_stays_within_the_scaled_hit_region() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..2000 {
        let w = rng.gen_range(1.0..300.0f32);
        let h = rng.gen_range(1.0..300.0f32);
        let rect = Rect::new(rng.gen_range(-500.0..500.0), rng.gen_range(-500.0..500.0), w, h);
        let padding = rng.gen_range(0.0..80.0f32);
        let strength = rng.gen_range(1.0..10.0f32);
        let pointer = rect.center()
            + Vec2::new(rng.gen_range(-400.0..400.0), rng.gen_range(-400.0..400.0));

        let m = magnetic_offset(pointer, rect, padding, strength);
        let bound = (rect.half_extent() + Vec2::splat(padding)) / strength;
        if m.active {
            assert!(m.offset.x.abs() <= bound.x + 1e-3);
            assert!(m.offset.y.abs() <= bound.y + 1e-3);
        } else {
            assert_eq!(m.offset, Vec2::ZERO);
        }
    }
}

#[test]
fn config_sanitizing_restores_defaults() {
    let cfg = MagneticConfig {
        padding: -5.0,
        strength: f32::NAN,
        attack_tau_sec: 0.0,
        release_tau_sec: -1.0,
    }
    .sanitized();
    let d = MagneticConfig::default();
    assert_eq!(cfg.padding, 0.0);
    assert_eq!(cfg.strength, d.strength);
    assert_eq!(cfg.attack_tau_sec, d.attack_tau_sec);
    assert_eq!(cfg.release_tau_sec, d.release_tau_sec);
}

#[test]
fn attack_is_faster_than_release() {
    assert!(MAGNETIC_ATTACK_TAU_SEC < MAGNETIC_RELEASE_TAU_SEC);

    let id = TargetId(1);
    let cache = cache_with(id);
    let mut field = MagneticField::new();
    field.register(id, MagneticConfig::default());
    let mut sink = RecordingSink::default();
    let pointer = Some(Vec2::new(130.0, 90.0));
    let goal = Vec2::new(7.5, -2.5);

    field.tick(pointer, &cache, 0.016, &mut sink);
    let attack_fraction = field.offset(id).map_or(0.0, |m| m.offset.length()) / goal.length();

    for _ in 0..60 {
        field.tick(pointer, &cache, 0.016, &mut sink);
    }
    assert_eq!(field.offset(id).map(|m| m.offset), Some(goal));

    field.tick(None, &cache, 0.016, &mut sink);
    let remaining = field.offset(id).map_or(0.0, |m| m.offset.length()) / goal.length();
    let release_fraction = 1.0 - remaining;

    assert!(attack_fraction > 0.0 && release_fraction > 0.0);
    assert!(
        attack_fraction > release_fraction,
        "attack {} release {}",
        attack_fraction,
        release_fraction
    );
}

#[test]
fn released_element_comes_to_rest_and_goes_quiet() {
    let id = TargetId(1);
    let cache = cache_with(id);
    let mut field = MagneticField::new();
    field.register(id, MagneticConfig::default());
    let mut sink = RecordingSink::default();

    for _ in 0..30 {
        field.tick(Some(Vec2::new(120.0, 120.0)), &cache, 0.016, &mut sink);
    }
    assert!(field.is_animating());
    assert_eq!(sink.magnetic.last().map(|m| m.2), Some(true));

    for _ in 0..300 {
        field.tick(None, &cache, 0.016, &mut sink);
    }
    assert_eq!(field.offset(id).map(|m| m.offset), Some(Vec2::ZERO));
    assert!(!field.is_animating());
    assert_eq!(sink.magnetic.last().map(|m| m.2), Some(false));

    let before = sink.magnetic.len();
    assert_eq!(field.tick(None, &cache, 0.016, &mut sink), 0);
    assert_eq!(sink.magnetic.len(), before);
}

#[test]
fn element_without_geometry_stays_at_rest() {
    let id = TargetId(2);
    let mut cache = GeometryCache::new();
    cache.track(id);
    let mut field = MagneticField::new();
    field.register(id, MagneticConfig::default());
    let mut sink = RecordingSink::default();
    assert_eq!(field.tick(Some(Vec2::ZERO), &cache, 0.016, &mut sink), 0);
    assert!(sink.magnetic.is_empty());
}

#[test]
fn zero_dt_does_not_move_anything() {
    let id = TargetId(1);
    let cache = cache_with(id);
    let mut field = MagneticField::new();
    field.register(id, MagneticConfig::default());
    let mut sink = RecordingSink::default();
    // Engagement is reported even though nothing moved yet.
    assert_eq!(field.tick(Some(Vec2::new(110.0, 100.0)), &cache, 0.0, &mut sink), 1);
    assert_eq!(sink.magnetic[0], (id, Vec2::ZERO, true));
}
