//! Drag-to-select carousel track.

use crate::dom::{self, Listener};
use crate::events::{self, IntersectionWatch};
use crate::scheduler::WebScheduler;
use glam::Vec2;
use pointer_fx_core::{
    preset_or_default, DragConfig, DragSelector, FrameLoop, FrameTick, StyleBuffer, Throttle,
    TimerScheduler, VisibilityTracker,
};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use web_sys as web;

pub const OFFSET_VAR: &str = "--carousel-offset";
pub const INDEX_VAR: &str = "--carousel-index";

pub struct CarouselInner {
    track: web::HtmlElement,
    scheduler: Rc<WebScheduler>,
    selector: RefCell<DragSelector>,
    frame_loop: FrameLoop,
    visibility: VisibilityTracker,
    moves: Throttle<(Vec2, f64)>,
    listeners: RefCell<Vec<Listener>>,
    intersection: RefCell<Option<IntersectionWatch>>,
    style: RefCell<StyleBuffer>,
    pointer_id: Cell<Option<i32>>,
    on_change: RefCell<Option<js_sys::Function>>,
    disposed: Cell<bool>,
}

impl CarouselInner {
    fn build(track: web::HtmlElement, count: usize) -> anyhow::Result<Rc<Self>> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| anyhow::anyhow!("no document"))?;

        let preset = preset_or_default("carousel");
        let scheduler = Rc::new(WebScheduler::new());
        let visibility = VisibilityTracker::default();
        // The loop only has a callback while settling; visibility pauses it.
        let frame_loop = FrameLoop::new(scheduler.clone());
        frame_loop.bind_visibility(&visibility);

        let inner = Rc::new_cyclic(|weak: &Weak<CarouselInner>| {
            let w = weak.clone();
            let moves = Throttle::new(
                scheduler.clone(),
                preset.timing.throttle_ms,
                move |(pos, ts): (Vec2, f64)| {
                    if let Some(inner) = w.upgrade() {
                        inner.apply_move(pos, ts);
                    }
                },
            );
            CarouselInner {
                track,
                scheduler: scheduler.clone(),
                selector: RefCell::new(DragSelector::new(count, DragConfig::default())),
                frame_loop,
                visibility,
                moves,
                listeners: RefCell::new(Vec::new()),
                intersection: RefCell::new(None),
                style: RefCell::new(StyleBuffer::new()),
                pointer_id: Cell::new(None),
                on_change: RefCell::new(None),
                disposed: Cell::new(false),
            }
        });

        let mut listeners = events::wire_carousel_handlers(&inner)?;
        listeners.extend(events::wire_focus_handlers(
            &inner.visibility,
            &window,
            &document,
        )?);
        *inner.listeners.borrow_mut() = listeners;
        let intersection = IntersectionWatch::new(inner.track.as_ref(), &inner.visibility)?;
        *inner.intersection.borrow_mut() = Some(intersection);
        inner.render();
        log::info!("[carousel] ready with {} slides", count);
        Ok(inner)
    }

    pub fn track(&self) -> &web::HtmlElement {
        &self.track
    }

    pub fn on_drag_start(self: &Rc<Self>, pointer_id: i32, pos: Vec2) {
        if self.disposed.get() {
            return;
        }
        self.pointer_id.set(Some(pointer_id));
        _ = self.track.set_pointer_capture(pointer_id);
        // The settle animation gives up the offset to the new gesture.
        self.frame_loop.stop();
        self.selector.borrow_mut().begin(self.scheduler.now_ms(), pos);
        self.render();
    }

    pub fn on_drag_move(&self, pointer_id: i32, pos: Vec2) {
        if self.disposed.get() || self.pointer_id.get() != Some(pointer_id) {
            return;
        }
        self.moves.call((pos, self.scheduler.now_ms()));
    }

    pub fn on_drag_end(self: &Rc<Self>, pointer_id: i32, pos: Option<Vec2>) {
        if self.disposed.get() || self.pointer_id.get() != Some(pointer_id) {
            return;
        }
        self.pointer_id.set(None);
        _ = self.track.release_pointer_capture(pointer_id);
        let now = self.scheduler.now_ms();
        let (before, after, animating) = {
            let mut selector = self.selector.borrow_mut();
            let before = selector.index();
            if let Some(p) = pos {
                selector.update(now, p);
            }
            let after = selector.end(now);
            (before, after, selector.is_animating())
        };
        self.render();
        if before != after {
            self.notify(after);
        }
        if animating {
            self.start_settle();
        }
    }

    /// The browser took the gesture over; spring back without switching.
    pub fn on_drag_cancel(self: &Rc<Self>, pointer_id: i32) {
        if self.disposed.get() || self.pointer_id.get() != Some(pointer_id) {
            return;
        }
        self.pointer_id.set(None);
        _ = self.track.release_pointer_capture(pointer_id);
        let animating = {
            let mut selector = self.selector.borrow_mut();
            selector.abort();
            selector.is_animating()
        };
        self.render();
        if animating {
            self.start_settle();
        }
    }

    fn start_settle(self: &Rc<Self>) {
        let w = Rc::downgrade(self);
        self.frame_loop.start(move |tick| {
            if let Some(inner) = w.upgrade() {
                inner.on_frame(tick);
            }
        });
    }

    fn apply_move(&self, pos: Vec2, ts: f64) {
        if self.disposed.get() {
            return;
        }
        self.selector.borrow_mut().update(ts, pos);
        self.render();
    }

    fn on_frame(&self, tick: FrameTick) {
        if self.disposed.get() {
            return;
        }
        let animating = {
            let mut selector = self.selector.borrow_mut();
            selector.tick(tick.dt_sec());
            selector.is_animating()
        };
        self.render();
        if !animating {
            self.frame_loop.stop();
        }
    }

    fn render(&self) {
        let selector = self.selector.borrow();
        let mut style = self.style.borrow_mut();
        dom::set_style(&self.track, OFFSET_VAR, style.px(selector.displacement()));
        dom::set_style(&self.track, INDEX_VAR, style.integer(selector.index()));
    }

    fn notify(&self, index: usize) {
        let callback = self.on_change.borrow().clone();
        if let Some(f) = callback {
            if let Err(e) = f.call1(&JsValue::NULL, &JsValue::from(index as u32)) {
                log::error!("[carousel] change callback threw: {:?}", e);
            }
        }
    }

    fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        self.frame_loop.dispose();
        self.moves.dispose();
        if let Some(id) = self.pointer_id.take() {
            _ = self.track.release_pointer_capture(id);
        }
        self.listeners.borrow_mut().clear();
        drop(self.intersection.borrow_mut().take());
        self.on_change.borrow_mut().take();
        self.selector.borrow_mut().cancel();
        dom::clear_style(&self.track, OFFSET_VAR);
        log::info!("[carousel] disposed");
    }
}

/// JS handle for a drag-released carousel. Slide layout is left to CSS,
/// which reads `--carousel-index` and `--carousel-offset` from the track.
#[wasm_bindgen]
pub struct Carousel {
    inner: Option<Rc<CarouselInner>>,
}

#[wasm_bindgen]
impl Carousel {
    #[wasm_bindgen(constructor)]
    pub fn new(track: web::HtmlElement, count: u32) -> Carousel {
        let inner = match CarouselInner::build(track, count as usize) {
            Ok(inner) => Some(inner),
            Err(e) => {
                log::error!("[carousel] init error: {:?}", e);
                None
            }
        };
        Carousel { inner }
    }

    #[wasm_bindgen(getter)]
    pub fn index(&self) -> u32 {
        self.inner
            .as_ref()
            .map_or(0, |inner| inner.selector.borrow().index() as u32)
    }

    #[wasm_bindgen(getter)]
    pub fn count(&self) -> u32 {
        self.inner
            .as_ref()
            .map_or(0, |inner| inner.selector.borrow().count() as u32)
    }

    pub fn set_count(&self, count: u32) {
        if let Some(inner) = self.live() {
            inner.selector.borrow_mut().set_count(count as usize);
            inner.render();
        }
    }

    /// Jump without a gesture, e.g. from pager dots.
    pub fn set_index(&self, index: u32) {
        if let Some(inner) = self.live() {
            inner.selector.borrow_mut().set_index(index as usize);
            inner.render();
        }
    }

    /// Slide width in pixels, used to keep the track still when a release
    /// changes the index mid-drag.
    pub fn set_item_extent(&self, extent: f32) {
        if let Some(inner) = self.live() {
            inner.selector.borrow_mut().set_item_extent(extent);
        }
    }

    /// `callback(index)` runs whenever a gesture changes the index.
    pub fn set_on_change(&self, callback: js_sys::Function) {
        if let Some(inner) = self.live() {
            *inner.on_change.borrow_mut() = Some(callback);
        }
    }

    pub fn dispose(&mut self) {
        if let Some(inner) = self.inner.take() {
            inner.dispose();
        }
    }
}

impl Carousel {
    fn live(&self) -> Option<&Rc<CarouselInner>> {
        self.inner.as_ref().filter(|inner| !inner.disposed.get())
    }
}

impl Drop for Carousel {
    fn drop(&mut self) {
        self.dispose();
    }
}
