//! Magnetic hover: elements lean toward a nearby pointer.

use crate::constants::{
    DEFAULT_MAGNETIC_PADDING, DEFAULT_MAGNETIC_STRENGTH, MAGNETIC_ATTACK_TAU_SEC,
    MAGNETIC_RELEASE_TAU_SEC, MAGNETIC_REST_EPSILON,
};
use crate::engine::ParameterSink;
use crate::geometry::{GeometryCache, Rect, TargetId};
use glam::Vec2;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MagneticOffset {
    pub offset: Vec2,
    pub active: bool,
}

/// Raw displacement for one pointer position.
///
/// Active while the pointer is inside the box grown by `padding` on every
/// side; the offset is then the pointer's distance from the center divided
/// by `strength`. A non-positive `strength` counts as 1.
#[inline]
pub fn magnetic_offset(pointer: Vec2, rect: Rect, padding: f32, strength: f32) -> MagneticOffset {
    let strength = if strength > 0.0 && strength.is_finite() {
        strength
    } else {
        1.0
    };
    let delta = pointer - rect.center();
    let reach = rect.half_extent() + Vec2::splat(padding.max(0.0));
    if delta.x.abs() < reach.x && delta.y.abs() < reach.y {
        MagneticOffset {
            offset: delta / strength,
            active: true,
        }
    } else {
        MagneticOffset::default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MagneticConfig {
    pub padding: f32,
    pub strength: f32,
    /// Smoothing time constant while the pointer is inside the hit-region.
    pub attack_tau_sec: f32,
    /// Time constant while easing back to rest; longer than attack.
    pub release_tau_sec: f32,
}

impl Default for MagneticConfig {
    fn default() -> Self {
        Self {
            padding: DEFAULT_MAGNETIC_PADDING,
            strength: DEFAULT_MAGNETIC_STRENGTH,
            attack_tau_sec: MAGNETIC_ATTACK_TAU_SEC,
            release_tau_sec: MAGNETIC_RELEASE_TAU_SEC,
        }
    }
}

impl MagneticConfig {
    /// Replace nonsensical values with defaults.
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        let positive = |v: f32, fallback: f32| {
            if v > 0.0 && v.is_finite() {
                v
            } else {
                fallback
            }
        };
        Self {
            padding: if self.padding.is_finite() {
                self.padding.max(0.0)
            } else {
                d.padding
            },
            strength: positive(self.strength, d.strength),
            attack_tau_sec: positive(self.attack_tau_sec, d.attack_tau_sec),
            release_tau_sec: positive(self.release_tau_sec, d.release_tau_sec),
        }
    }
}

#[derive(Debug)]
struct MagneticTarget {
    id: TargetId,
    config: MagneticConfig,
    current: Vec2,
    active: bool,
}

/// Smoothed magnetic offsets for every registered element.
#[derive(Debug, Default)]
pub struct MagneticField {
    targets: Vec<MagneticTarget>,
}

impl MagneticField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: TargetId, config: MagneticConfig) {
        let target = MagneticTarget {
            id,
            config: config.sanitized(),
            current: Vec2::ZERO,
            active: false,
        };
        match self.targets.iter_mut().find(|t| t.id == id) {
            Some(existing) => *existing = target,
            None => self.targets.push(target),
        }
    }

    pub fn unregister(&mut self, id: TargetId) -> bool {
        let before = self.targets.len();
        self.targets.retain(|t| t.id != id);
        self.targets.len() != before
    }

    pub fn contains(&self, id: TargetId) -> bool {
        self.targets.iter().any(|t| t.id == id)
    }

    pub fn offset(&self, id: TargetId) -> Option<MagneticOffset> {
        self.targets
            .iter()
            .find(|t| t.id == id)
            .map(|t| MagneticOffset {
                offset: t.current,
                active: t.active,
            })
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// True while any element is away from its goal or engaged.
    pub fn is_animating(&self) -> bool {
        self.targets
            .iter()
            .any(|t| t.active || t.current != Vec2::ZERO)
    }

    /// Step each element toward its raw offset. Elements with no geometry or
    /// no pointer relax to rest. Only moving elements reach `sink`.
    pub fn tick(
        &mut self,
        pointer: Option<Vec2>,
        cache: &GeometryCache,
        dt_sec: f32,
        sink: &mut dyn ParameterSink,
    ) -> usize {
        let dt_sec = if dt_sec.is_finite() { dt_sec.max(0.0) } else { 0.0 };
        let mut written = 0;
        for target in &mut self.targets {
            let goal = match (pointer, cache.entry(target.id)) {
                (Some(p), Some(geom)) if geom.measured => magnetic_offset(
                    p,
                    geom.rect,
                    target.config.padding,
                    target.config.strength,
                ),
                _ => MagneticOffset::default(),
            };
            let tau = if goal.active {
                target.config.attack_tau_sec
            } else {
                target.config.release_tau_sec
            };
            let alpha = 1.0 - (-dt_sec / tau).exp();
            let previous = target.current;
            let mut next = previous + (goal.offset - previous) * alpha;
            if (goal.offset - next).length() < MAGNETIC_REST_EPSILON {
                next = goal.offset;
            }
            let engaged_changed = goal.active != target.active;
            target.current = next;
            target.active = goal.active;
            if next != previous || engaged_changed {
                sink.magnetic(target.id, next, goal.active);
                written += 1;
            }
        }
        written
    }
}
