//! Structural change sources for the geometry cache: scroll, window resize,
//! element resize and DOM mutation. Pointer movement never lands here.

use crate::dom::Listener;
use crate::fx::FxInner;
use pointer_fx_core::RefreshTrigger;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn wire_viewport_handlers(
    inner: &Rc<FxInner>,
    window: &web::Window,
) -> anyhow::Result<Vec<Listener>> {
    let mut listeners = Vec::with_capacity(2);

    let w = Rc::downgrade(inner);
    // Capture so scrolling inside nested containers is seen as well.
    listeners.push(Listener::passive_capture(window.as_ref(), "scroll", move |_ev| {
        if let Some(inner) = w.upgrade() {
            inner.on_structural_change(RefreshTrigger::Scroll);
        }
    })?);

    let w = Rc::downgrade(inner);
    listeners.push(Listener::new(window.as_ref(), "resize", move |_ev| {
        if let Some(inner) = w.upgrade() {
            inner.on_structural_change(RefreshTrigger::Resize);
        }
    })?);

    Ok(listeners)
}

/// `ResizeObserver` over tracked elements; disconnected on drop.
pub struct ResizeWatch {
    observer: web::ResizeObserver,
    _closure: Closure<dyn FnMut()>,
}

impl ResizeWatch {
    pub fn new(inner: &Rc<FxInner>) -> anyhow::Result<Self> {
        let w = Rc::downgrade(inner);
        let closure = Closure::wrap(Box::new(move || {
            if let Some(inner) = w.upgrade() {
                inner.on_structural_change(RefreshTrigger::Resize);
            }
        }) as Box<dyn FnMut()>);
        let observer = web::ResizeObserver::new(closure.as_ref().unchecked_ref())
            .map_err(|e| anyhow::anyhow!("ResizeObserver: {:?}", e))?;
        Ok(Self {
            observer,
            _closure: closure,
        })
    }

    pub fn observe(&self, el: &web::Element) {
        self.observer.observe(el);
    }

    pub fn unobserve(&self, el: &web::Element) {
        self.observer.unobserve(el);
    }
}

impl Drop for ResizeWatch {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// `MutationObserver` on the effect root's subtree; disconnected on drop.
pub struct MutationWatch {
    observer: web::MutationObserver,
    _closure: Closure<dyn FnMut()>,
}

impl MutationWatch {
    pub fn new(inner: &Rc<FxInner>, root: &web::Node) -> anyhow::Result<Self> {
        let w = Rc::downgrade(inner);
        let closure = Closure::wrap(Box::new(move || {
            if let Some(inner) = w.upgrade() {
                inner.on_structural_change(RefreshTrigger::Mutation);
            }
        }) as Box<dyn FnMut()>);
        let observer = web::MutationObserver::new(closure.as_ref().unchecked_ref())
            .map_err(|e| anyhow::anyhow!("MutationObserver: {:?}", e))?;
        let init = web::MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        observer
            .observe_with_options(root, &init)
            .map_err(|e| anyhow::anyhow!("MutationObserver.observe: {:?}", e))?;
        Ok(Self {
            observer,
            _closure: closure,
        })
    }
}

impl Drop for MutationWatch {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
