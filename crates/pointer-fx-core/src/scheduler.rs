//! Deferred-execution seams.
//!
//! The engine never talks to a platform timer directly. Timers and frame
//! callbacks are requested through these traits; the web frontend backs them
//! with `setTimeout` / `requestAnimationFrame`, and [`VirtualClock`] backs
//! them with virtual time for hosts without a display and for tests.

use crate::constants::FRAME_INTERVAL_MS;
use std::cell::RefCell;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

pub trait TimerScheduler {
    /// Monotonic milliseconds.
    fn now_ms(&self) -> f64;
    fn set_timeout(&self, delay_ms: f64, callback: Box<dyn FnOnce()>) -> TimerHandle;
    /// Unknown or already-fired handles are ignored.
    fn clear_timeout(&self, handle: TimerHandle);
}

pub trait FrameScheduler {
    /// The callback receives the frame timestamp in milliseconds.
    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) -> FrameHandle;
    fn cancel_frame(&self, handle: FrameHandle);
}

struct PendingTimer {
    id: u64,
    deadline: f64,
    callback: Box<dyn FnOnce()>,
}

struct PendingFrame {
    id: u64,
    callback: Box<dyn FnOnce(f64)>,
}

#[derive(Default)]
struct ClockState {
    now: f64,
    next_id: u64,
    timers: Vec<PendingTimer>,
    frames: Vec<PendingFrame>,
}

/// Manually advanced time source implementing both scheduler traits.
///
/// Callbacks always run with no internal borrow held, so they may schedule or
/// cancel further work on the same clock.
#[derive(Default)]
pub struct VirtualClock {
    state: RefCell<ClockState>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.state.borrow().now
    }

    /// Run every timer due within the next `ms` milliseconds, in deadline
    /// order, then leave the clock at `now + ms`.
    pub fn advance(&self, ms: f64) {
        let target = self.now() + ms.max(0.0);
        self.advance_to(target);
    }

    pub fn advance_to(&self, target: f64) {
        loop {
            let due = {
                let mut st = self.state.borrow_mut();
                let next = st
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.deadline <= target)
                    .min_by(|(_, a), (_, b)| {
                        a.deadline.total_cmp(&b.deadline).then(a.id.cmp(&b.id))
                    })
                    .map(|(i, _)| i);
                match next {
                    Some(i) => {
                        let timer = st.timers.remove(i);
                        st.now = st.now.max(timer.deadline);
                        Some(timer.callback)
                    }
                    None => None,
                }
            };
            match due {
                Some(callback) => callback(),
                None => break,
            }
        }
        let mut st = self.state.borrow_mut();
        st.now = st.now.max(target);
    }

    /// Deliver every frame callback requested so far, stamped with the
    /// current time. Frames requested from inside a callback wait for the
    /// next delivery.
    pub fn fire_frames(&self) {
        let (frames, now) = {
            let mut st = self.state.borrow_mut();
            (std::mem::take(&mut st.frames), st.now)
        };
        for frame in frames {
            (frame.callback)(now);
        }
    }

    /// One nominal display refresh: advance time by a frame interval, then
    /// deliver pending frames.
    pub fn frame(&self) {
        self.advance(FRAME_INTERVAL_MS);
        self.fire_frames();
    }

    pub fn pending_timers(&self) -> usize {
        self.state.borrow().timers.len()
    }

    pub fn pending_frames(&self) -> usize {
        self.state.borrow().frames.len()
    }

    fn next_id(st: &mut ClockState) -> u64 {
        st.next_id += 1;
        st.next_id
    }
}

impl TimerScheduler for VirtualClock {
    fn now_ms(&self) -> f64 {
        self.now()
    }

    fn set_timeout(&self, delay_ms: f64, callback: Box<dyn FnOnce()>) -> TimerHandle {
        let mut st = self.state.borrow_mut();
        let id = Self::next_id(&mut st);
        let deadline = st.now + delay_ms.max(0.0);
        st.timers.push(PendingTimer {
            id,
            deadline,
            callback,
        });
        TimerHandle(id)
    }

    fn clear_timeout(&self, handle: TimerHandle) {
        self.state.borrow_mut().timers.retain(|t| t.id != handle.0);
    }
}

impl FrameScheduler for VirtualClock {
    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) -> FrameHandle {
        let mut st = self.state.borrow_mut();
        let id = Self::next_id(&mut st);
        st.frames.push(PendingFrame { id, callback });
        FrameHandle(id)
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.state.borrow_mut().frames.retain(|f| f.id != handle.0);
    }
}
