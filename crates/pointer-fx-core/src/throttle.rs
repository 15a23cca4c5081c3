//! Leading-edge throttle with a single coalescing trailing call.

use crate::scheduler::{TimerHandle, TimerScheduler};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

struct ThrottleState<A> {
    interval_ms: f64,
    last_invoke_ms: Option<f64>,
    pending: Option<TimerHandle>,
    pending_args: Option<A>,
    disposed: bool,
}

struct ThrottleShared<A> {
    scheduler: Rc<dyn TimerScheduler>,
    state: RefCell<ThrottleState<A>>,
    callback: RefCell<Box<dyn FnMut(A)>>,
}

impl<A> ThrottleShared<A> {
    fn invoke(&self, args: A) {
        match self.callback.try_borrow_mut() {
            Ok(mut cb) => cb(args),
            Err(_) => log::warn!("[throttle] reentrant call dropped"),
        }
    }

    fn fire_trailing(&self) {
        let args = {
            let mut st = self.state.borrow_mut();
            st.pending = None;
            if st.disposed {
                return;
            }
            let Some(args) = st.pending_args.take() else {
                return;
            };
            // Window restarts from when the call actually ran, not when it was due.
            st.last_invoke_ms = Some(self.scheduler.now_ms());
            args
        };
        self.invoke(args);
    }
}

/// Wraps a callback so it runs at most once per `interval_ms`.
///
/// The first call in a quiet period runs immediately. Calls landing inside
/// the window park their arguments and arm one trailing timer at the window
/// boundary; later calls only replace the parked arguments. Dropping the
/// throttle disposes it.
pub struct Throttle<A: 'static> {
    shared: Rc<ThrottleShared<A>>,
}

impl<A: 'static> Throttle<A> {
    pub fn new(
        scheduler: Rc<dyn TimerScheduler>,
        interval_ms: f64,
        callback: impl FnMut(A) + 'static,
    ) -> Self {
        let interval_ms = if interval_ms.is_finite() {
            interval_ms.max(0.0)
        } else {
            0.0
        };
        Self {
            shared: Rc::new(ThrottleShared {
                scheduler,
                state: RefCell::new(ThrottleState {
                    interval_ms,
                    last_invoke_ms: None,
                    pending: None,
                    pending_args: None,
                    disposed: false,
                }),
                callback: RefCell::new(Box::new(callback)),
            }),
        }
    }

    pub fn call(&self, args: A) {
        let now = self.shared.scheduler.now_ms();
        let delay = {
            let mut st = self.shared.state.borrow_mut();
            if st.disposed {
                return;
            }
            if st.pending.is_some() {
                st.pending_args = Some(args);
                return;
            }
            let interval = st.interval_ms;
            let elapsed = st.last_invoke_ms.map(|last| now - last);
            match elapsed {
                Some(elapsed) if elapsed < interval => {
                    st.pending_args = Some(args);
                    interval - elapsed
                }
                _ => {
                    st.last_invoke_ms = Some(now);
                    drop(st);
                    self.shared.invoke(args);
                    return;
                }
            }
        };

        let weak: Weak<ThrottleShared<A>> = Rc::downgrade(&self.shared);
        let handle = self.shared.scheduler.set_timeout(
            delay,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.fire_trailing();
                }
            }),
        );
        self.shared.state.borrow_mut().pending = Some(handle);
    }

    /// Cancel the trailing call, if any, and ignore every later call.
    pub fn dispose(&self) {
        let pending = {
            let mut st = self.shared.state.borrow_mut();
            if st.disposed {
                return;
            }
            st.disposed = true;
            st.pending_args = None;
            st.pending.take()
        };
        if let Some(handle) = pending {
            self.shared.scheduler.clear_timeout(handle);
        }
        log::debug!("[throttle] disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.state.borrow().disposed
    }

    pub fn has_pending(&self) -> bool {
        self.shared.state.borrow().pending.is_some()
    }

    pub fn interval_ms(&self) -> f64 {
        self.shared.state.borrow().interval_ms
    }
}

impl<A: 'static> Drop for Throttle<A> {
    fn drop(&mut self) {
        self.dispose();
    }
}
