use crate::carousel::CarouselInner;
use crate::dom::{self, Listener};
use crate::fx::FxInner;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Pointer input for hover effects. Moves go through the engine's throttle;
/// leaving the page relaxes every effect.
pub fn wire_hover_handlers(
    inner: &Rc<FxInner>,
    window: &web::Window,
    document: &web::Document,
) -> anyhow::Result<Vec<Listener>> {
    let mut listeners = Vec::with_capacity(2);

    let w = Rc::downgrade(inner);
    listeners.push(Listener::new(window.as_ref(), "pointermove", move |ev| {
        let Some(inner) = w.upgrade() else {
            return;
        };
        if let Some(pos) = dom::pointer_client_pos(&ev) {
            inner.on_pointer_move(pos);
        }
    })?);

    if let Some(html) = document.document_element() {
        let w = Rc::downgrade(inner);
        listeners.push(Listener::new(html.as_ref(), "pointerleave", move |_ev| {
            if let Some(inner) = w.upgrade() {
                inner.on_pointer_leave();
            }
        })?);
    }

    Ok(listeners)
}

/// Drag gestures on a carousel track. Capture keeps the gesture alive when
/// the pointer leaves the track.
pub fn wire_carousel_handlers(inner: &Rc<CarouselInner>) -> anyhow::Result<Vec<Listener>> {
    let track: web::EventTarget = inner.track().clone().into();
    let mut listeners = Vec::with_capacity(4);

    let w = Rc::downgrade(inner);
    listeners.push(Listener::new(&track, "pointerdown", move |ev| {
        let Some(inner) = w.upgrade() else {
            return;
        };
        let Some(pe) = ev.dyn_ref::<web::PointerEvent>() else {
            return;
        };
        if !pe.is_primary() {
            return;
        }
        if let Some(pos) = dom::pointer_client_pos(&ev) {
            inner.on_drag_start(pe.pointer_id(), pos);
        }
    })?);

    let w = Rc::downgrade(inner);
    listeners.push(Listener::new(&track, "pointermove", move |ev| {
        let Some(inner) = w.upgrade() else {
            return;
        };
        let Some(pe) = ev.dyn_ref::<web::PointerEvent>() else {
            return;
        };
        if let Some(pos) = dom::pointer_client_pos(&ev) {
            inner.on_drag_move(pe.pointer_id(), pos);
        }
    })?);

    let w = Rc::downgrade(inner);
    listeners.push(Listener::new(&track, "pointerup", move |ev| {
        let Some(inner) = w.upgrade() else {
            return;
        };
        let Some(pe) = ev.dyn_ref::<web::PointerEvent>() else {
            return;
        };
        let pos = dom::pointer_client_pos(&ev);
        inner.on_drag_end(pe.pointer_id(), pos);
    })?);

    // A cancelled gesture was never released by the user; it must not pick a slide.
    let w = Rc::downgrade(inner);
    listeners.push(Listener::new(&track, "pointercancel", move |ev| {
        let Some(inner) = w.upgrade() else {
            return;
        };
        if let Some(pe) = ev.dyn_ref::<web::PointerEvent>() {
            inner.on_drag_cancel(pe.pointer_id());
        }
    })?);

    Ok(listeners)
}
