//! Reusable text buffers for style values.
//!
//! Style properties are strings, and they are written every frame for every
//! changed target. Formatting into buffers kept across frames means a warm
//! frame does not allocate.

use glam::Vec2;
use std::fmt::Write;

/// Names beyond this many axes are formatted on demand.
const AXIS_NAMES: [&str; 4] = ["--fx-0", "--fx-1", "--fx-2", "--fx-3"];

#[derive(Debug, Default)]
pub struct StyleBuffer {
    name: String,
    value: String,
}

impl StyleBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Property name for axis `index`.
    pub fn axis_name(&mut self, index: usize) -> &str {
        if let Some(name) = AXIS_NAMES.get(index) {
            return name;
        }
        self.name.clear();
        _ = write!(self.name, "--fx-{}", index);
        &self.name
    }

    /// Property name and value for one axis in one go.
    pub fn axis(&mut self, index: usize, value: f32) -> (&str, &str) {
        self.value.clear();
        _ = write!(self.value, "{:.4}", value);
        let name = match AXIS_NAMES.get(index) {
            Some(name) => *name,
            None => {
                self.name.clear();
                _ = write!(self.name, "--fx-{}", index);
                self.name.as_str()
            }
        };
        (name, &self.value)
    }

    pub fn number(&mut self, v: f32) -> &str {
        self.value.clear();
        _ = write!(self.value, "{:.4}", v);
        &self.value
    }

    pub fn px(&mut self, v: f32) -> &str {
        self.value.clear();
        _ = write!(self.value, "{:.2}px", v);
        &self.value
    }

    pub fn integer(&mut self, v: usize) -> &str {
        self.value.clear();
        _ = write!(self.value, "{}", v);
        &self.value
    }

    pub fn translate(&mut self, offset: Vec2) -> &str {
        self.value.clear();
        _ = write!(
            self.value,
            "translate3d({:.2}px, {:.2}px, 0)",
            offset.x, offset.y
        );
        &self.value
    }
}
