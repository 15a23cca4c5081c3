use crate::dom::Listener;
use pointer_fx_core::VisibilityTracker;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Feeds `IntersectionObserver` reports for the effect root into a tracker.
pub struct IntersectionWatch {
    observer: web::IntersectionObserver,
    _closure: Closure<dyn FnMut(js_sys::Array)>,
}

impl IntersectionWatch {
    pub fn new(root: &web::Element, tracker: &VisibilityTracker) -> anyhow::Result<Self> {
        let tracker_in = tracker.clone();
        let closure = Closure::wrap(Box::new(move |entries: js_sys::Array| {
            // Entries arrive oldest first; the last one is current.
            let latest = entries
                .iter()
                .filter_map(|e| e.dyn_into::<web::IntersectionObserverEntry>().ok())
                .last();
            if let Some(entry) = latest {
                tracker_in.set_intersecting(entry.is_intersecting());
            }
        }) as Box<dyn FnMut(js_sys::Array)>);

        let init = web::IntersectionObserverInit::new();
        init.set_root_margin(&format!("{}px", tracker.root_margin_px()));
        let observer =
            web::IntersectionObserver::new_with_options(closure.as_ref().unchecked_ref(), &init)
                .map_err(|e| anyhow::anyhow!("IntersectionObserver: {:?}", e))?;
        observer.observe(root);
        Ok(Self {
            observer,
            _closure: closure,
        })
    }
}

impl Drop for IntersectionWatch {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Window focus and tab visibility drive the host-focused half of the gate.
pub fn wire_focus_handlers(
    tracker: &VisibilityTracker,
    window: &web::Window,
    document: &web::Document,
) -> anyhow::Result<Vec<Listener>> {
    let mut listeners = Vec::with_capacity(3);

    let t = tracker.clone();
    listeners.push(Listener::new(window.as_ref(), "focus", move |_ev| {
        t.set_host_focused(true);
    })?);

    let t = tracker.clone();
    listeners.push(Listener::new(window.as_ref(), "blur", move |_ev| {
        t.set_host_focused(false);
    })?);

    let t = tracker.clone();
    let doc = document.clone();
    listeners.push(Listener::new(document.as_ref(), "visibilitychange", move |_ev| {
        t.set_host_focused(!doc.hidden());
    })?);

    tracker.set_host_focused(!document.hidden());
    Ok(listeners)
}
