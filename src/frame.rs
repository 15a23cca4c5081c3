//! Per-frame DOM writes.
//!
//! Only targets the engine reports as changed are touched, so a resting
//! page produces no style writes at all.

use crate::dom;
use fnv::FnvHashMap;
use glam::Vec2;
use pointer_fx_core::{ParameterSink, StyleBuffer, TargetId};
use web_sys as web;

pub const FALLOFF_VAR: &str = "--fx-falloff";
pub const MAGNETIC_ATTR: &str = "data-magnetic-active";

pub struct StyleSink<'a> {
    elements: &'a FnvHashMap<TargetId, web::HtmlElement>,
    buffer: &'a mut StyleBuffer,
}

impl<'a> StyleSink<'a> {
    pub fn new(
        elements: &'a FnvHashMap<TargetId, web::HtmlElement>,
        buffer: &'a mut StyleBuffer,
    ) -> Self {
        Self { elements, buffer }
    }
}

impl ParameterSink for StyleSink<'_> {
    fn proximity(&mut self, id: TargetId, falloff: f32, values: &[f32]) {
        let Some(el) = self.elements.get(&id) else {
            return;
        };
        dom::set_style(el, FALLOFF_VAR, self.buffer.number(falloff));
        for (i, v) in values.iter().enumerate() {
            let (name, value) = self.buffer.axis(i, *v);
            dom::set_style(el, name, value);
        }
    }

    fn magnetic(&mut self, id: TargetId, offset: Vec2, active: bool) {
        let Some(el) = self.elements.get(&id) else {
            return;
        };
        dom::set_style(el, "transform", self.buffer.translate(offset));
        if active {
            _ = el.set_attribute(MAGNETIC_ATTR, "");
        } else {
            _ = el.remove_attribute(MAGNETIC_ATTR);
        }
    }
}

/// Drop everything the sink may have written to `el`.
pub fn reset_element(el: &web::HtmlElement, axes: usize) {
    dom::clear_style(el, FALLOFF_VAR);
    dom::clear_style(el, "transform");
    let mut buffer = StyleBuffer::new();
    for i in 0..axes {
        dom::clear_style(el, buffer.axis_name(i));
    }
    _ = el.remove_attribute(MAGNETIC_ATTR);
}
