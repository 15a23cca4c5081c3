pub mod pointer;
pub mod viewport;
pub mod visibility;

pub use pointer::{wire_carousel_handlers, wire_hover_handlers};
pub use viewport::{wire_viewport_handlers, MutationWatch, ResizeWatch};
pub use visibility::{wire_focus_handlers, IntersectionWatch};
