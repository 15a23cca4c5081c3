//! "Is this worth animating right now": on-screen AND host focused.

use crate::constants::VISIBILITY_ROOT_MARGIN_PX;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibilityState {
    pub intersecting: bool,
    pub host_focused: bool,
}

impl VisibilityState {
    #[inline]
    pub fn active(&self) -> bool {
        self.intersecting && self.host_focused
    }
}

type Listener = Rc<dyn Fn(bool)>;

struct Shared {
    state: VisibilityState,
    root_margin_px: f32,
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Push-based visibility signal. Listeners hear about transitions of
/// `active` only, never repeated values.
#[derive(Clone)]
pub struct VisibilityTracker {
    shared: Rc<RefCell<Shared>>,
}

impl Default for VisibilityTracker {
    fn default() -> Self {
        Self::new(VISIBILITY_ROOT_MARGIN_PX)
    }
}

impl VisibilityTracker {
    /// Starts off-screen and focused; the first intersection report decides.
    pub fn new(root_margin_px: f32) -> Self {
        Self {
            shared: Rc::new(RefCell::new(Shared {
                state: VisibilityState {
                    intersecting: false,
                    host_focused: true,
                },
                root_margin_px: root_margin_px.max(0.0),
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    pub fn state(&self) -> VisibilityState {
        self.shared.borrow().state
    }

    pub fn active(&self) -> bool {
        self.state().active()
    }

    /// Margin around the viewport that still counts as on-screen.
    pub fn root_margin_px(&self) -> f32 {
        self.shared.borrow().root_margin_px
    }

    pub fn set_intersecting(&self, intersecting: bool) {
        self.update(|s| s.intersecting = intersecting);
    }

    pub fn set_host_focused(&self, focused: bool) {
        self.update(|s| s.host_focused = focused);
    }

    /// `listener` is not called with the current value, only on change.
    pub fn subscribe(&self, listener: impl Fn(bool) + 'static) -> Subscription {
        let mut sh = self.shared.borrow_mut();
        sh.next_id += 1;
        let id = sh.next_id;
        sh.listeners.push((id, Rc::new(listener)));
        Subscription {
            id,
            shared: Rc::downgrade(&self.shared),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.shared.borrow().listeners.len()
    }

    fn update(&self, apply: impl FnOnce(&mut VisibilityState)) {
        let (active, listeners) = {
            let mut sh = self.shared.borrow_mut();
            let before = sh.state.active();
            apply(&mut sh.state);
            let after = sh.state.active();
            if before == after {
                return;
            }
            let listeners: SmallVec<[Listener; 4]> =
                sh.listeners.iter().map(|(_, l)| l.clone()).collect();
            (after, listeners)
        };
        log::debug!("[visibility] active={}", active);
        for listener in listeners {
            listener(active);
        }
    }
}

/// Keeps a listener registered; cancelling or dropping removes it.
pub struct Subscription {
    id: u64,
    shared: Weak<RefCell<Shared>>,
}

impl Subscription {
    pub fn cancel(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.borrow_mut().listeners.retain(|(id, _)| *id != self.id);
        }
        self.shared = Weak::new();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}
