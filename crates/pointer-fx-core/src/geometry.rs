//! Cached element geometry.
//!
//! Layout reads are the expensive part of every pointer effect, so they only
//! happen here and only for structural reasons (see [`RefreshTrigger`]).
//! The per-frame hot path takes `&GeometryCache` and never measures.

use fnv::{FnvHashMap, FnvHashSet};
use glam::Vec2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u32);

/// Axis-aligned box in viewport units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(width.max(0.0), height.max(0.0)),
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    #[inline]
    pub fn half_extent(&self) -> Vec2 {
        self.size * 0.5
    }

    pub fn is_empty(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }
}

/// Why a refresh was requested. Pointer movement is deliberately absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshTrigger {
    Resize,
    Scroll,
    Mutation,
    InitialSettle,
}

/// Source of layout measurements, e.g. `getBoundingClientRect`.
pub trait Measure {
    /// `None` when the element cannot be measured right now; the previous
    /// snapshot is kept.
    fn measure(&self, id: TargetId) -> Option<Rect>;
}

impl<F> Measure for F
where
    F: Fn(TargetId) -> Option<Rect>,
{
    fn measure(&self, id: TargetId) -> Option<Rect> {
        self(id)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CachedGeometry {
    pub rect: Rect,
    pub center: Vec2,
    pub measured: bool,
}

#[derive(Debug, Default)]
pub struct GeometryCache {
    entries: FnvHashMap<TargetId, CachedGeometry>,
    dirty: FnvHashSet<TargetId>,
    generation: u64,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `id` with an unmeasured (zero) box.
    pub fn track(&mut self, id: TargetId) {
        self.entries.entry(id).or_default();
    }

    pub fn untrack(&mut self, id: TargetId) -> bool {
        self.dirty.remove(&id);
        self.entries.remove(&id).is_some()
    }

    pub fn is_tracked(&self, id: TargetId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Mark `id` for re-measurement on the next [`flush`](Self::flush).
    /// Repeated requests before the flush collapse into one measurement.
    pub fn request_refresh(&mut self, id: TargetId, trigger: RefreshTrigger) -> bool {
        if !self.entries.contains_key(&id) {
            return false;
        }
        if self.dirty.insert(id) {
            log::trace!("[geometry] {:?} dirty ({:?})", id, trigger);
        }
        true
    }

    pub fn request_refresh_all(&mut self, trigger: RefreshTrigger) {
        self.dirty.extend(self.entries.keys().copied());
        log::trace!(
            "[geometry] all {} targets dirty ({:?})",
            self.entries.len(),
            trigger
        );
    }

    pub fn has_pending(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Measure every dirty target exactly once. Returns how many stored boxes
    /// changed.
    pub fn flush(&mut self, measurer: &impl Measure) -> usize {
        let mut changed = 0;
        for id in self.dirty.drain() {
            if let Some(entry) = self.entries.get_mut(&id) {
                if store(entry, measurer.measure(id)) {
                    changed += 1;
                }
            }
        }
        if changed > 0 {
            self.generation += 1;
            log::debug!(
                "[geometry] refreshed {} targets (gen {})",
                changed,
                self.generation
            );
        }
        changed
    }

    /// Measure one target immediately, clearing any pending request for it.
    pub fn refresh(&mut self, id: TargetId, measurer: &impl Measure) -> bool {
        self.dirty.remove(&id);
        let Some(entry) = self.entries.get_mut(&id) else {
            return false;
        };
        let changed = store(entry, measurer.measure(id));
        if changed {
            self.generation += 1;
        }
        changed
    }

    /// Last snapshot for `id`; a zero box if it was never measured.
    pub fn get(&self, id: TargetId) -> Rect {
        self.entries.get(&id).map(|e| e.rect).unwrap_or_default()
    }

    pub fn entry(&self, id: TargetId) -> Option<&CachedGeometry> {
        self.entries.get(&id)
    }

    pub fn is_measured(&self, id: TargetId) -> bool {
        self.entries.get(&id).is_some_and(|e| e.measured)
    }

    /// Bumped whenever a refresh changes any stored box.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn store(entry: &mut CachedGeometry, measured: Option<Rect>) -> bool {
    let Some(rect) = measured else {
        return false;
    };
    if entry.measured && entry.rect == rect {
        return false;
    }
    entry.rect = rect;
    entry.center = rect.center();
    entry.measured = true;
    true
}
