//! Display-refresh loop gated by visibility.
//!
//! The loop is Running only while a callback is registered and the gate is
//! active. While Stopped there is no outstanding frame request at all, so an
//! off-screen or backgrounded page costs nothing.

use crate::scheduler::{FrameHandle, FrameScheduler};
use crate::visibility::{Subscription, VisibilityTracker};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTick {
    pub timestamp_ms: f64,
    /// Zero on the first tick after a (re)start.
    pub dt_ms: f64,
}

impl FrameTick {
    #[inline]
    pub fn dt_sec(&self) -> f32 {
        (self.dt_ms / 1000.0) as f32
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

struct LoopInner {
    active: bool,
    has_callback: bool,
    disposed: bool,
    pending: Option<FrameHandle>,
    in_flight: bool,
    last_ts: Option<f64>,
    ticks: u64,
    dropped: u64,
    binding: Option<Subscription>,
}

impl LoopInner {
    fn running(&self) -> bool {
        self.has_callback && self.active && !self.disposed
    }
}

struct LoopShared {
    scheduler: Rc<dyn FrameScheduler>,
    inner: RefCell<LoopInner>,
    callback: RefCell<Option<Box<dyn FnMut(FrameTick)>>>,
}

#[derive(Clone)]
pub struct FrameLoop {
    shared: Rc<LoopShared>,
}

impl FrameLoop {
    /// A new loop is inactive until [`set_active`](Self::set_active) or
    /// [`bind_visibility`](Self::bind_visibility) opens the gate.
    pub fn new(scheduler: Rc<dyn FrameScheduler>) -> Self {
        Self {
            shared: Rc::new(LoopShared {
                scheduler,
                inner: RefCell::new(LoopInner {
                    active: false,
                    has_callback: false,
                    disposed: false,
                    pending: None,
                    in_flight: false,
                    last_ts: None,
                    ticks: 0,
                    dropped: 0,
                    binding: None,
                }),
                callback: RefCell::new(None),
            }),
        }
    }

    pub fn start(&self, callback: impl FnMut(FrameTick) + 'static) {
        if self.shared.inner.borrow().disposed {
            log::warn!("[frame] start after dispose ignored");
            return;
        }
        match self.shared.callback.try_borrow_mut() {
            Ok(mut slot) => *slot = Some(Box::new(callback)),
            Err(_) => {
                log::warn!("[frame] start from inside a tick ignored");
                return;
            }
        }
        self.shared.inner.borrow_mut().has_callback = true;
        LoopShared::reconcile(&self.shared);
    }

    /// Unregister the callback. The loop stays stopped until the next `start`.
    pub fn stop(&self) {
        self.shared.inner.borrow_mut().has_callback = false;
        // Inside a tick the callback is borrowed; it is released once the tick returns.
        if let Ok(mut slot) = self.shared.callback.try_borrow_mut() {
            *slot = None;
        }
        LoopShared::reconcile(&self.shared);
    }

    pub fn set_active(&self, active: bool) {
        self.shared.inner.borrow_mut().active = active;
        LoopShared::reconcile(&self.shared);
    }

    /// Follow `tracker` from now on, replacing any previous binding.
    pub fn bind_visibility(&self, tracker: &VisibilityTracker) {
        let weak: Weak<LoopShared> = Rc::downgrade(&self.shared);
        let subscription = tracker.subscribe(move |active| {
            if let Some(shared) = weak.upgrade() {
                shared.inner.borrow_mut().active = active;
                LoopShared::reconcile(&shared);
            }
        });
        let previous = self.shared.inner.borrow_mut().binding.replace(subscription);
        drop(previous);
        self.set_active(tracker.active());
    }

    /// Stop, drop the callback and the visibility binding. Safe to repeat.
    pub fn dispose(&self) {
        let (pending, binding) = {
            let mut inner = self.shared.inner.borrow_mut();
            if inner.disposed {
                return;
            }
            inner.disposed = true;
            inner.has_callback = false;
            (inner.pending.take(), inner.binding.take())
        };
        if let Some(handle) = pending {
            self.shared.scheduler.cancel_frame(handle);
        }
        drop(binding);
        if let Ok(mut slot) = self.shared.callback.try_borrow_mut() {
            *slot = None;
        }
        log::debug!("[frame] disposed");
    }

    pub fn state(&self) -> LoopState {
        if self.shared.inner.borrow().running() {
            LoopState::Running
        } else {
            LoopState::Stopped
        }
    }

    pub fn tick_count(&self) -> u64 {
        self.shared.inner.borrow().ticks
    }

    /// Frames delivered but skipped because they overlapped a tick or
    /// carried a stale timestamp.
    pub fn dropped_count(&self) -> u64 {
        self.shared.inner.borrow().dropped
    }
}

impl LoopShared {
    fn reconcile(this: &Rc<Self>) {
        let cancel = {
            let mut inner = this.inner.borrow_mut();
            if inner.running() {
                if inner.pending.is_some() || inner.in_flight {
                    return;
                }
                None
            } else {
                inner.last_ts = None;
                inner.pending.take()
            }
        };
        match cancel {
            Some(handle) => {
                this.scheduler.cancel_frame(handle);
                log::debug!("[frame] stopped");
            }
            None if this.inner.borrow().running() => Self::request(this),
            None => {}
        }
    }

    fn request(this: &Rc<Self>) {
        let weak = Rc::downgrade(this);
        let handle = this.scheduler.request_frame(Box::new(move |ts| {
            if let Some(shared) = weak.upgrade() {
                LoopShared::on_frame(&shared, ts);
            }
        }));
        this.inner.borrow_mut().pending = Some(handle);
    }

    fn on_frame(this: &Rc<Self>, timestamp_ms: f64) {
        let tick = {
            let mut inner = this.inner.borrow_mut();
            inner.pending = None;
            if !inner.running() {
                return;
            }
            if inner.in_flight {
                inner.dropped += 1;
                return;
            }
            let stale = inner.last_ts.is_some_and(|last| timestamp_ms <= last);
            if stale {
                inner.dropped += 1;
                drop(inner);
                Self::reconcile(this);
                return;
            }
            let dt_ms = inner.last_ts.map(|last| timestamp_ms - last).unwrap_or(0.0);
            inner.last_ts = Some(timestamp_ms);
            inner.in_flight = true;
            inner.ticks += 1;
            FrameTick {
                timestamp_ms,
                dt_ms,
            }
        };

        if let Ok(mut slot) = this.callback.try_borrow_mut() {
            if let Some(cb) = slot.as_mut() {
                cb(tick);
            }
        }

        let release = {
            let mut inner = this.inner.borrow_mut();
            inner.in_flight = false;
            !inner.has_callback
        };
        if release {
            if let Ok(mut slot) = this.callback.try_borrow_mut() {
                *slot = None;
            }
        }
        Self::reconcile(this);
    }
}
