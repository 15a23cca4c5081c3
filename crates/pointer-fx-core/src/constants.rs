// Tuning defaults shared by the core and the web frontend.
// Presets in `presets.rs` override these per effect.

// Scheduling
pub const FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0; // nominal display refresh
pub const POINTER_THROTTLE_MS: f64 = 16.0; // pointer sampling window
pub const INITIAL_SETTLE_DELAY_MS: f64 = 300.0; // first geometry read after mount

// Visibility
pub const VISIBILITY_ROOT_MARGIN_PX: f32 = 100.0; // pre-activate slightly before on-screen

// Proximity
pub const DEFAULT_PROXIMITY_RADIUS: f32 = 120.0;

// Magnetic hover
pub const DEFAULT_MAGNETIC_PADDING: f32 = 40.0; // hit-region grows by this on every side
pub const DEFAULT_MAGNETIC_STRENGTH: f32 = 4.0; // divisor on pointer offset
pub const MAGNETIC_ATTACK_TAU_SEC: f32 = 0.08; // snap-in smoothing
pub const MAGNETIC_RELEASE_TAU_SEC: f32 = 0.25; // slower let-go smoothing
pub const MAGNETIC_REST_EPSILON: f32 = 0.01; // below this the offset counts as settled

// Drag-release selection
pub const DRAG_OFFSET_THRESHOLD: f32 = 50.0;
pub const DRAG_VELOCITY_THRESHOLD: f32 = 500.0; // units per second
pub const SETTLE_OMEGA: f32 = 18.0; // spring natural frequency (rad/s)
pub const SETTLE_DAMPING_RATIO: f32 = 0.9; // slightly under-damped spring-back
pub const SETTLE_REST_EPSILON: f32 = 0.5; // displacement and speed below this end settling
pub const SETTLE_MAX_STEP_SEC: f32 = 1.0 / 30.0; // integrate long frames in sub-steps
pub const SETTLE_MAX_DT_SEC: f32 = 0.25; // longer gaps (backgrounded tab) count as this much
