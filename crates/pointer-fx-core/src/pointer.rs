use glam::Vec2;

/// A sample older than this at release time contributes no fling velocity.
pub const VELOCITY_STALE_MS: f64 = 100.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerSample {
    pub position: Vec2,
    pub timestamp_ms: f64,
    /// Set when the rounded position differs from the one seen last tick.
    pub changed: bool,
}

/// Latest-value cell for throttled pointer input, read once per tick.
#[derive(Debug, Default)]
pub struct PointerTracker {
    latest: Option<PointerSample>,
    last_ticked: Option<(i32, i32)>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, position: Vec2, timestamp_ms: f64) {
        if !position.is_finite() {
            return;
        }
        self.latest = Some(PointerSample {
            position,
            timestamp_ms,
            changed: true,
        });
    }

    /// The pointer left the page; effects should relax.
    pub fn clear(&mut self) {
        self.latest = None;
        self.last_ticked = None;
    }

    pub fn latest(&self) -> Option<PointerSample> {
        self.latest
    }

    /// Hand the latest sample to a tick, flagging whether it moved (at whole
    /// unit resolution) since the previous tick.
    pub fn sample_for_tick(&mut self) -> Option<PointerSample> {
        let mut sample = self.latest?;
        let rounded = rounded(sample.position);
        sample.changed = self.last_ticked != Some(rounded);
        self.last_ticked = Some(rounded);
        Some(sample)
    }
}

#[inline]
fn rounded(p: Vec2) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}

/// Units-per-second velocity from consecutive pointer samples.
#[derive(Debug, Default, Clone, Copy)]
pub struct VelocitySampler {
    prev: Option<(Vec2, f64)>,
    velocity: Vec2,
}

impl VelocitySampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Samples with a non-increasing timestamp move the reference point but
    /// keep the previous velocity.
    pub fn push(&mut self, position: Vec2, timestamp_ms: f64) -> Vec2 {
        if let Some((prev_pos, prev_ts)) = self.prev {
            let dt_ms = timestamp_ms - prev_ts;
            if dt_ms > 0.0 {
                self.velocity = (position - prev_pos) * (1000.0 / dt_ms as f32);
            }
        }
        self.prev = Some((position, timestamp_ms));
        self.velocity
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Velocity as seen at `now_ms`: zero if the pointer has rested longer
    /// than [`VELOCITY_STALE_MS`].
    pub fn velocity_at(&self, now_ms: f64) -> Vec2 {
        match self.prev {
            Some((_, ts)) if now_ms - ts <= VELOCITY_STALE_MS => self.velocity,
            _ => Vec2::ZERO,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
