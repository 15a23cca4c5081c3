//! Per-tick orchestration of the hover effects.
//!
//! The engine is the single writer of the geometry cache. Structural events
//! mark targets dirty, [`Engine::flush_geometry`] measures them, and
//! [`Engine::tick`] only ever reads the cache.

use crate::frame_loop::FrameTick;
use crate::geometry::{GeometryCache, Measure, RefreshTrigger, TargetId};
use crate::magnetic::{MagneticConfig, MagneticField};
use crate::pointer::PointerTracker;
use crate::proximity::{ProximityInterpolator, ResponseCurveConfig};
use glam::Vec2;

/// Receiver of per-tick parameter updates (the presentation layer).
pub trait ParameterSink {
    fn proximity(&mut self, id: TargetId, falloff: f32, values: &[f32]);
    fn magnetic(&mut self, id: TargetId, offset: Vec2, active: bool);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub proximity_writes: usize,
    pub magnetic_writes: usize,
}

#[derive(Debug, Default)]
pub struct Engine {
    geometry: GeometryCache,
    pointer: PointerTracker,
    proximity: ProximityInterpolator,
    magnetic: MagneticField,
    next_id: u32,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> TargetId {
        self.next_id += 1;
        let id = TargetId(self.next_id);
        self.geometry.track(id);
        self.geometry.request_refresh(id, RefreshTrigger::InitialSettle);
        id
    }

    pub fn register_proximity(&mut self, config: ResponseCurveConfig) -> TargetId {
        let id = self.allocate();
        self.proximity.register(id, config);
        log::debug!("[engine] proximity target {:?}", id);
        id
    }

    pub fn register_magnetic(&mut self, config: MagneticConfig) -> TargetId {
        let id = self.allocate();
        self.magnetic.register(id, config);
        log::debug!("[engine] magnetic target {:?}", id);
        id
    }

    /// Forget `id` everywhere. Unknown ids are ignored.
    pub fn unregister(&mut self, id: TargetId) -> bool {
        let p = self.proximity.unregister(id);
        let m = self.magnetic.unregister(id);
        let g = self.geometry.untrack(id);
        p || m || g
    }

    pub fn record_pointer(&mut self, position: Vec2, timestamp_ms: f64) {
        self.pointer.record(position, timestamp_ms);
    }

    pub fn clear_pointer(&mut self) {
        self.pointer.clear();
    }

    pub fn request_refresh(&mut self, id: TargetId, trigger: RefreshTrigger) -> bool {
        self.geometry.request_refresh(id, trigger)
    }

    pub fn request_refresh_all(&mut self, trigger: RefreshTrigger) {
        self.geometry.request_refresh_all(trigger);
    }

    pub fn has_pending_geometry(&self) -> bool {
        self.geometry.has_pending()
    }

    pub fn flush_geometry(&mut self, measurer: &impl Measure) -> usize {
        self.geometry.flush(measurer)
    }

    pub fn tick(&mut self, tick: FrameTick, sink: &mut dyn ParameterSink) -> TickReport {
        let sample = self.pointer.sample_for_tick();
        let proximity_writes = self.proximity.tick(sample, &self.geometry, sink);
        let magnetic_writes = self.magnetic.tick(
            sample.map(|s| s.position),
            &self.geometry,
            tick.dt_sec(),
            sink,
        );
        TickReport {
            proximity_writes,
            magnetic_writes,
        }
    }

    pub fn geometry(&self) -> &GeometryCache {
        &self.geometry
    }

    pub fn proximity(&self) -> &ProximityInterpolator {
        &self.proximity
    }

    pub fn magnetic(&self) -> &MagneticField {
        &self.magnetic
    }

    pub fn target_count(&self) -> usize {
        self.geometry.len()
    }
}
