use pointer_fx_core::Rect;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Layout read for the geometry cache. Detached elements are not measured.
#[inline]
pub fn element_rect(el: &web::HtmlElement) -> Option<Rect> {
    if !el.is_connected() {
        return None;
    }
    let r = el.get_bounding_client_rect();
    Some(Rect::new(
        r.left() as f32,
        r.top() as f32,
        r.width() as f32,
        r.height() as f32,
    ))
}

#[inline]
pub fn set_style(el: &web::HtmlElement, name: &str, value: &str) {
    _ = el.style().set_property(name, value);
}

#[inline]
pub fn clear_style(el: &web::HtmlElement, name: &str) {
    _ = el.style().remove_property(name);
}

/// An event listener that is removed again when dropped.
pub struct Listener {
    target: web::EventTarget,
    event: &'static str,
    capture: bool,
    closure: Closure<dyn FnMut(web::Event)>,
}

impl Listener {
    pub fn new(
        target: &web::EventTarget,
        event: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) -> anyhow::Result<Self> {
        Self::with_options(target, event, false, false, handler)
    }

    /// Passive capture listener, used for scroll on every scroll container.
    pub fn passive_capture(
        target: &web::EventTarget,
        event: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) -> anyhow::Result<Self> {
        Self::with_options(target, event, true, true, handler)
    }

    fn with_options(
        target: &web::EventTarget,
        event: &'static str,
        capture: bool,
        passive: bool,
        handler: impl FnMut(web::Event) + 'static,
    ) -> anyhow::Result<Self> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        let options = web::AddEventListenerOptions::new();
        options.set_capture(capture);
        options.set_passive(passive);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                event,
                closure.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(|e| anyhow::anyhow!("add {} listener: {:?}", event, e))?;
        Ok(Self {
            target: target.clone(),
            event,
            capture,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        _ = self.target.remove_event_listener_with_callback_and_bool(
            self.event,
            self.closure.as_ref().unchecked_ref(),
            self.capture,
        );
    }
}

/// Pointer-event coordinates in viewport units, matching `element_rect`.
#[inline]
pub fn pointer_client_pos(ev: &web::Event) -> Option<glam::Vec2> {
    let ev = ev.dyn_ref::<web::PointerEvent>()?;
    Some(glam::Vec2::new(ev.client_x() as f32, ev.client_y() as f32))
}
