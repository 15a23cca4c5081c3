//! Distance-driven interpolation of per-target visual parameters.

use crate::engine::ParameterSink;
use crate::geometry::{GeometryCache, TargetId};
use crate::pointer::PointerSample;
use crate::presets::ConfigError;
use smallvec::SmallVec;
use std::str::FromStr;

/// Shape of the influence curve between the target center and `radius`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Falloff {
    #[default]
    Linear,
    Exponential,
    Gaussian,
}

impl Falloff {
    /// Influence in `[0, 1]` at `distance`. Exactly `0.0` at or beyond
    /// `radius`, and for a radius that is not a positive finite number.
    #[inline]
    pub fn sample(self, distance: f32, radius: f32) -> f32 {
        if !(radius > 0.0 && radius.is_finite()) || !(distance < radius) {
            return 0.0;
        }
        let d = distance.max(0.0);
        let linear = (1.0 - d / radius).clamp(0.0, 1.0);
        match self {
            Falloff::Linear => linear,
            Falloff::Exponential => linear * linear,
            Falloff::Gaussian => {
                let s = d / (radius * 0.5);
                (-(s * s) * 0.5).exp()
            }
        }
    }

    /// Lenient parse for values coming from markup: unknown names fall back
    /// to linear.
    pub fn parse_or_linear(name: &str) -> Self {
        name.parse::<Falloff>().unwrap_or_else(|e| {
            log::warn!("[config] {}; using linear", e);
            Falloff::Linear
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Falloff::Linear => "linear",
            Falloff::Exponential => "exponential",
            Falloff::Gaussian => "gaussian",
        }
    }
}

impl FromStr for Falloff {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Falloff::Linear),
            "exponential" | "exp" | "quadratic" => Ok(Falloff::Exponential),
            "gaussian" | "gauss" => Ok(Falloff::Gaussian),
            _ => Err(ConfigError::UnknownFalloff(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisRange {
    pub from: f32,
    pub to: f32,
}

impl AxisRange {
    #[inline]
    pub fn at(&self, falloff: f32) -> f32 {
        if falloff <= 0.0 {
            // Exact rest value, no rounding through the lerp.
            return self.from;
        }
        self.from + (self.to - self.from) * falloff
    }
}

/// Per-effect curve. Immutable once handed to [`ProximityInterpolator::register`].
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseCurveConfig {
    pub radius: f32,
    pub falloff: Falloff,
    pub axes: SmallVec<[AxisRange; 4]>,
}

impl ResponseCurveConfig {
    pub fn new(radius: f32, falloff: Falloff) -> Self {
        Self {
            radius: if radius.is_finite() { radius.max(0.0) } else { 0.0 },
            falloff,
            axes: SmallVec::new(),
        }
    }

    pub fn axis(mut self, from: f32, to: f32) -> Self {
        self.axes.push(AxisRange { from, to });
        self
    }

    pub fn rest_values(&self) -> SmallVec<[f32; 4]> {
        self.axes.iter().map(|a| a.from).collect()
    }
}

#[derive(Debug)]
struct ProximityTarget {
    id: TargetId,
    config: ResponseCurveConfig,
    falloff: f32,
    values: SmallVec<[f32; 4]>,
    written: bool,
}

/// Turns the latest pointer sample into per-target values every tick.
#[derive(Debug, Default)]
pub struct ProximityInterpolator {
    targets: Vec<ProximityTarget>,
    last_generation: Option<u64>,
    needs_pass: bool,
    released: bool,
}

impl ProximityInterpolator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value buffers are sized here once; ticks only overwrite them.
    pub fn register(&mut self, id: TargetId, config: ResponseCurveConfig) {
        let values = config.rest_values();
        let target = ProximityTarget {
            id,
            config,
            falloff: 0.0,
            values,
            written: false,
        };
        match self.targets.iter_mut().find(|t| t.id == id) {
            Some(existing) => *existing = target,
            None => self.targets.push(target),
        }
        self.needs_pass = true;
    }

    pub fn unregister(&mut self, id: TargetId) -> bool {
        let before = self.targets.len();
        self.targets.retain(|t| t.id != id);
        self.targets.len() != before
    }

    pub fn contains(&self, id: TargetId) -> bool {
        self.targets.iter().any(|t| t.id == id)
    }

    pub fn values(&self, id: TargetId) -> Option<&[f32]> {
        self.targets
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.values.as_slice())
    }

    pub fn falloff(&self, id: TargetId) -> Option<f32> {
        self.targets.iter().find(|t| t.id == id).map(|t| t.falloff)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Recompute every target against `sample` and push the ones whose value
    /// changed to `sink`. Returns how many were written.
    ///
    /// The whole pass is skipped when the pointer has not moved (rounded)
    /// and no geometry changed since the previous pass. With no sample at
    /// all, targets relax to their rest values once.
    pub fn tick(
        &mut self,
        sample: Option<PointerSample>,
        cache: &GeometryCache,
        sink: &mut dyn ParameterSink,
    ) -> usize {
        let Some(sample) = sample else {
            return self.release(sink);
        };
        let generation = cache.generation();
        if !sample.changed && !self.needs_pass && self.last_generation == Some(generation) {
            return 0;
        }
        self.last_generation = Some(generation);
        self.needs_pass = false;
        self.released = false;

        let pointer = sample.position;
        let mut written = 0;
        for target in &mut self.targets {
            let falloff = match cache.entry(target.id) {
                Some(geom) if geom.measured => target
                    .config
                    .falloff
                    .sample(pointer.distance(geom.center), target.config.radius),
                _ => 0.0,
            };
            if target.written && falloff == target.falloff {
                continue;
            }
            target.falloff = falloff;
            for (value, axis) in target.values.iter_mut().zip(target.config.axes.iter()) {
                *value = axis.at(falloff);
            }
            target.written = true;
            sink.proximity(target.id, falloff, &target.values);
            written += 1;
        }
        log::trace!("[proximity] wrote {} of {}", written, self.targets.len());
        written
    }

    fn release(&mut self, sink: &mut dyn ParameterSink) -> usize {
        if self.released {
            return 0;
        }
        self.released = true;
        self.last_generation = None;
        let mut written = 0;
        for target in &mut self.targets {
            if target.written && target.falloff == 0.0 {
                continue;
            }
            target.falloff = 0.0;
            for (value, axis) in target.values.iter_mut().zip(target.config.axes.iter()) {
                *value = axis.from;
            }
            target.written = true;
            sink.proximity(target.id, 0.0, &target.values);
            written += 1;
        }
        written
    }
}
