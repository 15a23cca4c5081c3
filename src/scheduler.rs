//! `setTimeout` / `requestAnimationFrame` behind the core scheduler traits.

use fnv::FnvHashMap;
use pointer_fx_core::{FrameHandle, FrameScheduler, TimerHandle, TimerScheduler};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

// A closure cannot be dropped while it runs, so entries are flagged once
// their callback has returned and get swept on the next schedule call.
struct Slot<F: ?Sized> {
    closure: Closure<F>,
    fired: Rc<Cell<bool>>,
}

#[derive(Default)]
pub struct WebScheduler {
    timers: RefCell<FnvHashMap<i32, Slot<dyn FnMut()>>>,
    frames: RefCell<FnvHashMap<i32, Slot<dyn FnMut(f64)>>>,
}

impl WebScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn sweep(&self) {
        self.timers.borrow_mut().retain(|_, s| !s.fired.get());
        self.frames.borrow_mut().retain(|_, s| !s.fired.get());
    }
}

impl TimerScheduler for WebScheduler {
    fn now_ms(&self) -> f64 {
        instant::now()
    }

    fn set_timeout(&self, delay_ms: f64, callback: Box<dyn FnOnce()>) -> TimerHandle {
        self.sweep();
        let fired = Rc::new(Cell::new(false));
        let fired_in = fired.clone();
        let mut callback = Some(callback);
        let closure = Closure::wrap(Box::new(move || {
            if let Some(cb) = callback.take() {
                cb();
            }
            fired_in.set(true);
        }) as Box<dyn FnMut()>);
        let handle = web::window()
            .and_then(|w| {
                w.set_timeout_with_callback_and_timeout_and_arguments_0(
                    closure.as_ref().unchecked_ref(),
                    delay_ms.max(0.0).round() as i32,
                )
                .ok()
            })
            .unwrap_or_else(|| {
                log::error!("[scheduler] setTimeout unavailable");
                -1
            });
        if handle >= 0 {
            self.timers
                .borrow_mut()
                .insert(handle, Slot { closure, fired });
        }
        TimerHandle(handle as u64)
    }

    fn clear_timeout(&self, handle: TimerHandle) {
        let id = handle.0 as i32;
        if let Some(w) = web::window() {
            w.clear_timeout_with_handle(id);
        }
        self.timers.borrow_mut().remove(&id);
    }
}

impl FrameScheduler for WebScheduler {
    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) -> FrameHandle {
        self.sweep();
        let fired = Rc::new(Cell::new(false));
        let fired_in = fired.clone();
        let mut callback = Some(callback);
        let closure = Closure::wrap(Box::new(move |ts: f64| {
            if let Some(cb) = callback.take() {
                cb(ts);
            }
            fired_in.set(true);
        }) as Box<dyn FnMut(f64)>);
        let handle = web::window()
            .and_then(|w| {
                w.request_animation_frame(closure.as_ref().unchecked_ref())
                    .ok()
            })
            .unwrap_or_else(|| {
                log::error!("[scheduler] requestAnimationFrame unavailable");
                -1
            });
        if handle >= 0 {
            self.frames
                .borrow_mut()
                .insert(handle, Slot { closure, fired });
        }
        FrameHandle(handle as u64)
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        let id = handle.0 as i32;
        if let Some(w) = web::window() {
            _ = w.cancel_animation_frame(id);
        }
        self.frames.borrow_mut().remove(&id);
    }
}

impl Drop for WebScheduler {
    fn drop(&mut self) {
        // The browser must not call into closures freed below.
        if let Some(w) = web::window() {
            for id in self.timers.get_mut().keys() {
                w.clear_timeout_with_handle(*id);
            }
            for id in self.frames.get_mut().keys() {
                _ = w.cancel_animation_frame(*id);
            }
        }
    }
}
