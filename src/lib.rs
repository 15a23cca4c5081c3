#![cfg(target_arch = "wasm32")]
use pointer_fx_core::PRESETS;
use wasm_bindgen::prelude::*;

mod carousel;
mod dom;
mod events;
mod frame;
mod fx;
mod scheduler;

pub use carousel::Carousel;
pub use fx::PointerFx;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("pointer-fx starting");
    Ok(())
}

/// Names accepted by the `PointerFx` constructor, in lookup order.
#[wasm_bindgen]
pub fn preset_names() -> js_sys::Array {
    PRESETS.iter().map(|p| JsValue::from_str(p.name)).collect()
}
