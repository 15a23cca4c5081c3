//! Hover effects bound to a page section: proximity parameters and
//! magnetic displacement.

use crate::dom::{self, Listener};
use crate::events::{self, IntersectionWatch, MutationWatch, ResizeWatch};
use crate::frame::{self, StyleSink};
use crate::scheduler::WebScheduler;
use fnv::FnvHashMap;
use glam::Vec2;
use pointer_fx_core::constants::FRAME_INTERVAL_MS;
use pointer_fx_core::{
    preset_or_default, Engine, Falloff, FrameLoop, FrameTick, MagneticConfig, Preset,
    RefreshTrigger, StyleBuffer, TargetId, Throttle, TimerHandle, TimerScheduler,
    VisibilityTracker,
};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use web_sys as web;

// Held only so that dropping it tears every listener and observer down.
struct Wiring {
    _listeners: Vec<Listener>,
    resize: ResizeWatch,
    _mutation: MutationWatch,
    _intersection: IntersectionWatch,
}

pub struct FxInner {
    preset: &'static Preset,
    scheduler: Rc<WebScheduler>,
    engine: RefCell<Engine>,
    elements: RefCell<FnvHashMap<TargetId, web::HtmlElement>>,
    style: RefCell<StyleBuffer>,
    visibility: VisibilityTracker,
    frame_loop: FrameLoop,
    pointer: Throttle<Option<Vec2>>,
    refresh: Throttle<RefreshTrigger>,
    settle_timer: Cell<Option<TimerHandle>>,
    wiring: RefCell<Option<Wiring>>,
    disposed: Cell<bool>,
}

impl FxInner {
    fn build(root: &web::HtmlElement, preset: &'static Preset) -> anyhow::Result<Rc<Self>> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| anyhow::anyhow!("no document"))?;

        let scheduler = Rc::new(WebScheduler::new());
        let visibility = VisibilityTracker::default();
        let frame_loop = FrameLoop::new(scheduler.clone());

        let inner = Rc::new_cyclic(|weak: &Weak<FxInner>| {
            let w = weak.clone();
            let pointer = Throttle::new(
                scheduler.clone(),
                preset.timing.throttle_ms,
                move |pos: Option<Vec2>| {
                    if let Some(inner) = w.upgrade() {
                        inner.record_pointer(pos);
                    }
                },
            );
            let w = weak.clone();
            let refresh = Throttle::new(
                scheduler.clone(),
                FRAME_INTERVAL_MS,
                move |trigger: RefreshTrigger| {
                    if let Some(inner) = w.upgrade() {
                        inner.flush_geometry(trigger);
                    }
                },
            );
            FxInner {
                preset,
                scheduler: scheduler.clone(),
                engine: RefCell::new(Engine::new()),
                elements: RefCell::new(FnvHashMap::default()),
                style: RefCell::new(StyleBuffer::new()),
                visibility,
                frame_loop,
                pointer,
                refresh,
                settle_timer: Cell::new(None),
                wiring: RefCell::new(None),
                disposed: Cell::new(false),
            }
        });

        let mut listeners = events::wire_hover_handlers(&inner, &window, &document)?;
        listeners.extend(events::wire_viewport_handlers(&inner, &window)?);
        listeners.extend(events::wire_focus_handlers(
            &inner.visibility,
            &window,
            &document,
        )?);
        let wiring = Wiring {
            _listeners: listeners,
            resize: ResizeWatch::new(&inner)?,
            _mutation: MutationWatch::new(&inner, root.as_ref())?,
            _intersection: IntersectionWatch::new(root.as_ref(), &inner.visibility)?,
        };
        *inner.wiring.borrow_mut() = Some(wiring);

        inner.frame_loop.bind_visibility(&inner.visibility);
        let w = Rc::downgrade(&inner);
        inner.frame_loop.start(move |tick| {
            if let Some(inner) = w.upgrade() {
                inner.on_frame(tick);
            }
        });
        log::info!("[fx] ready with preset `{}`", preset.name);
        Ok(inner)
    }

    pub fn on_pointer_move(&self, pos: Vec2) {
        if self.disposed.get() {
            return;
        }
        self.pointer.call(Some(pos));
    }

    pub fn on_pointer_leave(&self) {
        if self.disposed.get() {
            return;
        }
        self.pointer.call(None);
    }

    pub fn on_structural_change(&self, trigger: RefreshTrigger) {
        if self.disposed.get() {
            return;
        }
        self.engine.borrow_mut().request_refresh_all(trigger);
        self.refresh.call(trigger);
    }

    fn record_pointer(&self, pos: Option<Vec2>) {
        if self.disposed.get() {
            return;
        }
        let mut engine = self.engine.borrow_mut();
        match pos {
            Some(p) => engine.record_pointer(p, self.scheduler.now_ms()),
            None => engine.clear_pointer(),
        }
    }

    fn flush_geometry(&self, trigger: RefreshTrigger) {
        if self.disposed.get() {
            return;
        }
        let elements = self.elements.borrow();
        let measure = |id: TargetId| elements.get(&id).and_then(dom::element_rect);
        let changed = self.engine.borrow_mut().flush_geometry(&measure);
        log::debug!("[fx] geometry flush ({:?}): {} changed", trigger, changed);
    }

    fn on_frame(&self, tick: FrameTick) {
        if self.disposed.get() {
            return;
        }
        let elements = self.elements.borrow();
        let mut style = self.style.borrow_mut();
        let mut sink = StyleSink::new(&elements, &mut style);
        let report = self.engine.borrow_mut().tick(tick, &mut sink);
        log::trace!("[fx] tick {:?}", report);
    }

    /// (Re)arm the one deferred measurement that follows mounting, so layout
    /// has settled (fonts, images) before the first read.
    fn schedule_settle(self: &Rc<Self>) {
        if let Some(handle) = self.settle_timer.take() {
            self.scheduler.clear_timeout(handle);
        }
        let w = Rc::downgrade(self);
        let handle = self.scheduler.set_timeout(
            self.preset.timing.settle_delay_ms,
            Box::new(move || {
                if let Some(inner) = w.upgrade() {
                    inner.settle_timer.set(None);
                    if inner.disposed.get() {
                        return;
                    }
                    inner
                        .engine
                        .borrow_mut()
                        .request_refresh_all(RefreshTrigger::InitialSettle);
                    inner.flush_geometry(RefreshTrigger::InitialSettle);
                }
            }),
        );
        self.settle_timer.set(Some(handle));
    }

    fn adopt(self: &Rc<Self>, id: TargetId, element: web::HtmlElement) -> u32 {
        if let Some(wiring) = self.wiring.borrow().as_ref() {
            wiring.resize.observe(element.as_ref());
        }
        self.elements.borrow_mut().insert(id, element);
        self.schedule_settle();
        id.0
    }

    fn track_proximity(
        self: &Rc<Self>,
        element: web::HtmlElement,
        radius: f32,
        falloff: Falloff,
        axes: &[f32],
    ) -> u32 {
        if self.disposed.get() {
            return 0;
        }
        if axes.len() % 2 != 0 {
            log::warn!("[fx] odd axis list; trailing value ignored");
        }
        let ranges: Vec<(f32, f32)> = axes.chunks_exact(2).map(|p| (p[0], p[1])).collect();
        let config = Preset {
            radius,
            falloff,
            ..*self.preset
        }
        .response_curve(&ranges);
        let id = self.engine.borrow_mut().register_proximity(config);
        self.adopt(id, element)
    }

    fn track_magnetic(
        self: &Rc<Self>,
        element: web::HtmlElement,
        config: MagneticConfig,
    ) -> u32 {
        if self.disposed.get() {
            return 0;
        }
        let id = self.engine.borrow_mut().register_magnetic(config);
        self.adopt(id, element)
    }

    fn untrack(&self, id: TargetId) -> bool {
        if self.disposed.get() {
            return false;
        }
        let axes = self.axis_count(id);
        let removed = self.engine.borrow_mut().unregister(id);
        if let Some(element) = self.elements.borrow_mut().remove(&id) {
            if let Some(wiring) = self.wiring.borrow().as_ref() {
                wiring.resize.unobserve(element.as_ref());
            }
            frame::reset_element(&element, axes);
        }
        removed
    }

    fn axis_count(&self, id: TargetId) -> usize {
        self.engine
            .borrow()
            .proximity()
            .values(id)
            .map_or(0, |v| v.len())
    }

    fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        self.frame_loop.dispose();
        self.pointer.dispose();
        self.refresh.dispose();
        if let Some(handle) = self.settle_timer.take() {
            self.scheduler.clear_timeout(handle);
        }
        drop(self.wiring.borrow_mut().take());
        let elements: Vec<_> = self.elements.borrow_mut().drain().collect();
        for (id, element) in elements {
            frame::reset_element(&element, self.axis_count(id));
        }
        log::info!("[fx] disposed");
    }
}

/// JS handle for the hover effects of one page section.
///
/// A handle whose setup failed is inert: every method is a no-op and
/// tracking returns id 0.
#[wasm_bindgen]
pub struct PointerFx {
    inner: Option<Rc<FxInner>>,
}

#[wasm_bindgen]
impl PointerFx {
    #[wasm_bindgen(constructor)]
    pub fn new(root: web::HtmlElement, preset: &str) -> PointerFx {
        let inner = match FxInner::build(&root, preset_or_default(preset)) {
            Ok(inner) => Some(inner),
            Err(e) => {
                log::error!("[fx] init error: {:?}", e);
                None
            }
        };
        PointerFx { inner }
    }

    /// Track `element` with the preset's radius and falloff. `axes` is a
    /// flat list of `from, to` pairs, one pair per CSS variable `--fx-N`.
    pub fn track_proximity(&self, element: web::HtmlElement, axes: &[f32]) -> u32 {
        match &self.inner {
            Some(inner) => {
                inner.track_proximity(element, inner.preset.radius, inner.preset.falloff, axes)
            }
            None => 0,
        }
    }

    /// Like `track_proximity` with an explicit radius and falloff name.
    /// Unknown falloff names fall back to linear.
    pub fn track_proximity_with(
        &self,
        element: web::HtmlElement,
        radius: f32,
        falloff: &str,
        axes: &[f32],
    ) -> u32 {
        match &self.inner {
            Some(inner) => {
                inner.track_proximity(element, radius, Falloff::parse_or_linear(falloff), axes)
            }
            None => 0,
        }
    }

    pub fn track_magnetic(&self, element: web::HtmlElement) -> u32 {
        match &self.inner {
            Some(inner) => inner.track_magnetic(element, inner.preset.magnetic()),
            None => 0,
        }
    }

    /// Magnetic tracking with an explicit hit-region padding and strength
    /// divisor; the preset keeps the smoothing constants.
    pub fn track_magnetic_with(
        &self,
        element: web::HtmlElement,
        padding: f32,
        strength: f32,
    ) -> u32 {
        match &self.inner {
            Some(inner) => {
                let config = MagneticConfig {
                    padding,
                    strength,
                    ..inner.preset.magnetic()
                };
                inner.track_magnetic(element, config)
            }
            None => 0,
        }
    }

    pub fn untrack(&self, id: u32) -> bool {
        self.inner
            .as_ref()
            .is_some_and(|inner| inner.untrack(TargetId(id)))
    }

    /// Content changed in a way observers cannot see (e.g. a CSS class swap).
    pub fn refresh(&self) {
        if let Some(inner) = &self.inner {
            inner.on_structural_change(RefreshTrigger::Mutation);
        }
    }

    #[wasm_bindgen(getter)]
    pub fn active(&self) -> bool {
        self.inner
            .as_ref()
            .is_some_and(|inner| !inner.disposed.get() && inner.visibility.active())
    }

    #[wasm_bindgen(getter)]
    pub fn grid_columns(&self) -> u32 {
        self.inner.as_ref().map_or(0, |inner| inner.preset.grid.0)
    }

    #[wasm_bindgen(getter)]
    pub fn grid_rows(&self) -> u32 {
        self.inner.as_ref().map_or(0, |inner| inner.preset.grid.1)
    }

    pub fn dispose(&mut self) {
        if let Some(inner) = self.inner.take() {
            inner.dispose();
        }
    }
}

impl Drop for PointerFx {
    fn drop(&mut self) {
        self.dispose();
    }
}
