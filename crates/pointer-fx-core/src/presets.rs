//! Named effect presets, read once when an effect is registered.

use crate::constants::*;
use crate::magnetic::MagneticConfig;
use crate::proximity::{Falloff, ResponseCurveConfig};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown falloff kind `{0}`")]
    UnknownFalloff(String),
    #[error("unknown preset `{0}`")]
    UnknownPreset(String),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timing {
    pub throttle_ms: f64,
    pub settle_delay_ms: f64,
    pub attack_tau_sec: f32,
    pub release_tau_sec: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Preset {
    pub name: &'static str,
    /// Columns x rows for grid effects; (1, 1) otherwise.
    pub grid: (u32, u32),
    pub falloff: Falloff,
    pub radius: f32,
    pub strength: f32,
    pub padding: f32,
    pub timing: Timing,
}

const DEFAULT_TIMING: Timing = Timing {
    throttle_ms: POINTER_THROTTLE_MS,
    settle_delay_ms: INITIAL_SETTLE_DELAY_MS,
    attack_tau_sec: MAGNETIC_ATTACK_TAU_SEC,
    release_tau_sec: MAGNETIC_RELEASE_TAU_SEC,
};

pub const PRESETS: &[Preset] = &[
    // Hero background of dots that swell under the cursor
    Preset {
        name: "dot-grid",
        grid: (24, 12),
        falloff: Falloff::Gaussian,
        radius: DEFAULT_PROXIMITY_RADIUS,
        strength: 1.0,
        padding: 0.0,
        timing: DEFAULT_TIMING,
    },
    // Soft highlight following the pointer across feature cards
    Preset {
        name: "cursor-glow",
        grid: (1, 1),
        falloff: Falloff::Exponential,
        radius: 320.0,
        strength: 1.0,
        padding: 0.0,
        timing: Timing {
            throttle_ms: 32.0,
            ..DEFAULT_TIMING
        },
    },
    Preset {
        name: "magnetic-button",
        grid: (1, 1),
        falloff: Falloff::Linear,
        radius: DEFAULT_PROXIMITY_RADIUS,
        strength: DEFAULT_MAGNETIC_STRENGTH,
        padding: DEFAULT_MAGNETIC_PADDING,
        timing: DEFAULT_TIMING,
    },
    // Testimonials / pricing carousel
    Preset {
        name: "carousel",
        grid: (1, 1),
        falloff: Falloff::Linear,
        radius: 0.0,
        strength: 1.0,
        padding: 0.0,
        timing: Timing {
            throttle_ms: 8.0,
            ..DEFAULT_TIMING
        },
    },
];

pub fn preset(name: &str) -> Result<&'static Preset, ConfigError> {
    PRESETS
        .iter()
        .find(|p| p.name == name)
        .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))
}

/// Unknown names log a warning and resolve to the first preset.
pub fn preset_or_default(name: &str) -> &'static Preset {
    preset(name).unwrap_or_else(|e| {
        log::warn!("[config] {}; using `{}`", e, PRESETS[0].name);
        &PRESETS[0]
    })
}

impl Preset {
    /// Curve with this preset's radius and falloff and the given axes.
    pub fn response_curve(&self, axes: &[(f32, f32)]) -> ResponseCurveConfig {
        axes.iter()
            .fold(ResponseCurveConfig::new(self.radius, self.falloff), |cfg, &(from, to)| {
                cfg.axis(from, to)
            })
    }

    pub fn magnetic(&self) -> MagneticConfig {
        MagneticConfig {
            padding: self.padding,
            strength: self.strength,
            attack_tau_sec: self.timing.attack_tau_sec,
            release_tau_sec: self.timing.release_tau_sec,
        }
        .sanitized()
    }

    /// Number of cells for grid presets.
    pub fn cell_count(&self) -> usize {
        (self.grid.0 as usize) * (self.grid.1 as usize)
    }
}
