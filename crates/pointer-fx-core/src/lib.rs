//! Platform-free core of the pointer-feedback engine.
//!
//! Everything here is single-threaded and callback driven. Time and frame
//! delivery come in through the [`TimerScheduler`] and [`FrameScheduler`]
//! traits so the same code runs against the browser and against
//! [`VirtualClock`] on the host.

pub mod constants;
pub mod drag;
pub mod engine;
pub mod frame_loop;
pub mod geometry;
pub mod magnetic;
pub mod pointer;
pub mod presets;
pub mod proximity;
pub mod scheduler;
pub mod style;
pub mod throttle;
pub mod visibility;

pub use drag::*;
pub use engine::*;
pub use frame_loop::*;
pub use geometry::*;
pub use magnetic::*;
pub use pointer::*;
pub use presets::*;
pub use proximity::*;
pub use scheduler::*;
pub use style::*;
pub use throttle::*;
pub use visibility::*;
