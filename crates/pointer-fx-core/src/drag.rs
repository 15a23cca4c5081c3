//! Drag-released carousel selection with spring-back.
//!
//! A gesture moves the carousel by at most one slot. On release, travel past
//! `offset_threshold` or a fling faster than `velocity_threshold` picks the
//! neighbour; anything less snaps back. The visual displacement then returns
//! to rest on a damped spring, which a new drag interrupts.

use crate::constants::{
    DRAG_OFFSET_THRESHOLD, DRAG_VELOCITY_THRESHOLD, SETTLE_DAMPING_RATIO, SETTLE_MAX_DT_SEC,
    SETTLE_MAX_STEP_SEC, SETTLE_OMEGA, SETTLE_REST_EPSILON,
};
use crate::pointer::VelocitySampler;
use glam::Vec2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragAxis {
    #[default]
    Horizontal,
    Vertical,
}

impl DragAxis {
    #[inline]
    pub fn project(self, v: Vec2) -> f32 {
        match self {
            DragAxis::Horizontal => v.x,
            DragAxis::Vertical => v.y,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragConfig {
    pub axis: DragAxis,
    pub offset_threshold: f32,
    /// Units per second.
    pub velocity_threshold: f32,
    /// Width of one slot along `axis`. When non-zero the displacement is
    /// rebased on an index change so the content does not jump.
    pub item_extent: f32,
    pub omega: f32,
    pub damping_ratio: f32,
    pub rest_epsilon: f32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            axis: DragAxis::Horizontal,
            offset_threshold: DRAG_OFFSET_THRESHOLD,
            velocity_threshold: DRAG_VELOCITY_THRESHOLD,
            item_extent: 0.0,
            omega: SETTLE_OMEGA,
            damping_ratio: SETTLE_DAMPING_RATIO,
            rest_epsilon: SETTLE_REST_EPSILON,
        }
    }
}

/// Index chosen for a released gesture, clamped to `[0, count - 1]`.
///
/// The "advance" rule (dragged or flung toward negative) is checked first,
/// so a gesture satisfying both rules advances.
pub fn select_index(
    current: usize,
    count: usize,
    offset: f32,
    velocity: f32,
    config: &DragConfig,
) -> usize {
    if count == 0 {
        return 0;
    }
    let last = count - 1;
    let current = current.min(last);
    if offset < -config.offset_threshold || velocity < -config.velocity_threshold {
        (current + 1).min(last)
    } else if offset > config.offset_threshold || velocity > config.velocity_threshold {
        current.saturating_sub(1)
    } else {
        current
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Dragging,
    Settling,
}

#[derive(Clone, Copy, Debug)]
pub struct DragSession {
    /// Displacement already present when the drag began (an interrupted settle).
    pub start_offset: f32,
    /// Pointer travel along the axis since the drag began.
    pub current_offset: f32,
    pub velocity: f32,
    pub active_index: usize,
    pub candidate_index: usize,
    origin: Vec2,
    sampler: VelocitySampler,
}

#[derive(Debug)]
pub struct DragSelector {
    config: DragConfig,
    count: usize,
    index: usize,
    phase: DragPhase,
    session: Option<DragSession>,
    displacement: f32,
    spring_velocity: f32,
}

impl DragSelector {
    pub fn new(count: usize, config: DragConfig) -> Self {
        Self {
            config,
            count,
            index: 0,
            phase: DragPhase::Idle,
            session: None,
            displacement: 0.0,
            spring_velocity: 0.0,
        }
    }

    pub fn begin(&mut self, now_ms: f64, position: Vec2) {
        if self.phase == DragPhase::Settling {
            log::debug!("[drag] settle interrupted at {:.1}", self.displacement);
        }
        // Only one animation may own the displacement: the spring stops here.
        self.spring_velocity = 0.0;
        let mut sampler = VelocitySampler::new();
        sampler.push(position, now_ms);
        self.session = Some(DragSession {
            start_offset: self.displacement,
            current_offset: 0.0,
            velocity: 0.0,
            active_index: self.index,
            candidate_index: self.index,
            origin: position,
            sampler,
        });
        self.phase = DragPhase::Dragging;
    }

    /// Track the pointer; returns the displacement to render.
    pub fn update(&mut self, now_ms: f64, position: Vec2) -> f32 {
        if self.phase != DragPhase::Dragging {
            return self.displacement;
        }
        let axis = self.config.axis;
        if let Some(session) = self.session.as_mut() {
            session.current_offset = axis.project(position - session.origin);
            session.velocity = axis.project(session.sampler.push(position, now_ms));
            self.displacement = session.start_offset + session.current_offset;
        }
        self.displacement
    }

    /// Finish the gesture and start settling. Returns the new index.
    pub fn end(&mut self, now_ms: f64) -> usize {
        if self.phase != DragPhase::Dragging {
            return self.index;
        }
        let axis = self.config.axis;
        let Some(session) = self.session.as_mut() else {
            self.phase = DragPhase::Idle;
            return self.index;
        };
        let velocity = axis.project(session.sampler.velocity_at(now_ms));
        session.velocity = velocity;
        let candidate = select_index(
            self.index,
            self.count,
            session.current_offset,
            velocity,
            &self.config,
        );
        session.candidate_index = candidate;

        let from = self.index;
        // Moving to the next slot shifts the rest position by one extent the
        // other way; keep the content where it is on screen.
        let shift = candidate as f32 - from as f32;
        self.displacement += shift * self.config.item_extent;
        self.index = candidate;
        self.spring_velocity = velocity;
        self.phase = DragPhase::Settling;
        log::info!(
            "[drag] release offset={:.1} vel={:.0} index {} -> {}",
            session.current_offset,
            velocity,
            from,
            candidate
        );
        self.finish_if_rested();
        self.index
    }

    /// The platform took the gesture over (e.g. `pointercancel`): spring back
    /// from wherever the drag left off without choosing a new index.
    pub fn abort(&mut self) -> usize {
        if self.phase != DragPhase::Dragging {
            return self.index;
        }
        self.spring_velocity = 0.0;
        self.phase = DragPhase::Settling;
        log::debug!("[drag] gesture aborted at {:.1}", self.displacement);
        self.finish_if_rested();
        self.index
    }

    /// Advance the spring-back by `dt_sec`; returns the displacement to render.
    pub fn tick(&mut self, dt_sec: f32) -> f32 {
        if self.phase != DragPhase::Settling || !dt_sec.is_finite() || dt_sec <= 0.0 {
            return self.displacement;
        }
        // Bounds the sub-step count per call.
        let dt_sec = dt_sec.min(SETTLE_MAX_DT_SEC);
        let omega = self.config.omega.max(f32::EPSILON);
        let k = omega * omega;
        let c = 2.0 * omega * self.config.damping_ratio.max(0.0);
        let mut remaining = dt_sec;
        while remaining > 0.0 {
            let h = remaining.min(SETTLE_MAX_STEP_SEC);
            let accel = -k * self.displacement - c * self.spring_velocity;
            self.spring_velocity += accel * h;
            self.displacement += self.spring_velocity * h;
            remaining -= h;
        }
        self.finish_if_rested();
        self.displacement
    }

    /// Drop any gesture or settle and snap to rest.
    pub fn cancel(&mut self) {
        self.session = None;
        self.phase = DragPhase::Idle;
        self.displacement = 0.0;
        self.spring_velocity = 0.0;
    }

    /// Change the number of slots, keeping the index in range.
    pub fn set_count(&mut self, count: usize) {
        self.count = count;
        self.index = self.clamped(self.index);
    }

    /// Jump to `index` (clamped) without a gesture, e.g. from pager dots.
    pub fn set_index(&mut self, index: usize) {
        self.index = self.clamped(index);
    }

    pub fn set_item_extent(&mut self, extent: f32) {
        self.config.item_extent = if extent.is_finite() { extent.max(0.0) } else { 0.0 };
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn displacement(&self) -> f32 {
        self.displacement
    }

    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    pub fn is_animating(&self) -> bool {
        self.phase == DragPhase::Settling
    }

    fn clamped(&self, index: usize) -> usize {
        index.min(self.count.saturating_sub(1))
    }

    fn finish_if_rested(&mut self) {
        let eps = self.config.rest_epsilon;
        if self.displacement.abs() < eps && self.spring_velocity.abs() < eps {
            self.displacement = 0.0;
            self.spring_velocity = 0.0;
            self.session = None;
            self.phase = DragPhase::Idle;
            log::debug!("[drag] settled at index {}", self.index);
        }
    }
}
