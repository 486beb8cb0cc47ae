#![forbid(unsafe_code)]

//! Easing curves used by sheet transitions.

use std::f64::consts::PI;

/// Easing function mapping linear progress to eased progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Linear interpolation.
    #[default]
    Linear,
    /// Exponential ease-out: `1 - 2^(-10t)`. Fast start, long settle.
    ExpoOut,
    /// Damped sinusoidal overshoot (elastic ease-out). Bouncy settle.
    Spring,
}

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0).
    ///
    /// Input is clamped. Endpoints are exact: `apply(0) == 0`, `apply(1) == 1`.
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        if t == 0.0 || t == 1.0 {
            return t;
        }
        match self {
            Self::Linear => t,
            Self::ExpoOut => 1.0 - 2f64.powf(-10.0 * t),
            Self::Spring => {
                let c4 = (2.0 * PI) / 3.0;
                2f64.powf(-10.0 * t) * ((10.0 * t - 0.75) * c4).sin() + 1.0
            }
        }
    }

    /// Check if this easing can produce values outside 0.0-1.0.
    pub fn can_overshoot(self) -> bool {
        matches!(self, Self::Spring)
    }
}
