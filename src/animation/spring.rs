//! Damped harmonic oscillator step response, used for "pop" scale animations.

use crate::foundation::{
    core::Fps,
    error::{FramewiseError, FramewiseResult},
};

/// Physical spring parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpringConfig {
    /// Damping coefficient (`> 0`).
    pub damping: f64,
    /// Spring stiffness (`> 0`).
    pub stiffness: f64,
    /// Attached mass (`> 0`).
    #[serde(default = "default_mass")]
    pub mass: f64,
}

fn default_mass() -> f64 {
    1.0
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            damping: 10.0,
            stiffness: 100.0,
            mass: 1.0,
        }
    }
}

impl SpringConfig {
    /// Spring with the default mass of 1.
    pub fn new(damping: f64, stiffness: f64) -> Self {
        Self {
            damping,
            stiffness,
            mass: default_mass(),
        }
    }

    /// Reject non-finite or non-positive parameters.
    pub fn validate(&self) -> FramewiseResult<()> {
        for (name, v) in [
            ("damping", self.damping),
            ("stiffness", self.stiffness),
            ("mass", self.mass),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(FramewiseError::animation(format!(
                    "spring {name} must be finite and > 0"
                )));
            }
        }
        Ok(())
    }

    /// Damping ratio `c / (2 * sqrt(k * m))`.
    pub fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt()).max(1e-9)
    }

    /// `damping^2 < 4 * stiffness * mass`: the response overshoots its target.
    pub fn is_underdamped(&self) -> bool {
        self.damping * self.damping < 4.0 * self.stiffness * self.mass
    }
}

/// Spring position at `frame` frames after the spring starts, moving from 0 toward 1.
///
/// Returns 0 for negative frames (the spring has not started yet).
pub fn spring(frame: f64, fps: Fps, config: SpringConfig) -> f64 {
    if frame.is_nan() || frame <= 0.0 {
        return 0.0;
    }
    step_response(frame / fps.as_f64(), config)
}

/// [`spring`] remapped onto `from -> to`.
pub fn spring_between(frame: f64, fps: Fps, config: SpringConfig, from: f64, to: f64) -> f64 {
    from + (to - from) * spring(frame, fps, config)
}

// x(0) = 0, v(0) = 0, target 1; `t` in seconds.
fn step_response(t: f64, config: SpringConfig) -> f64 {
    let k = config.stiffness.max(0.0);
    let m = config.mass.max(1e-9);

    let w0 = (k / m).sqrt();
    if w0 == 0.0 {
        return 1.0;
    }
    let zeta = config.damping_ratio().max(0.0);

    if (zeta - 1.0).abs() < 1e-6 {
        // Critically damped.
        let e = (-w0 * t).exp();
        1.0 - e * (1.0 + w0 * t)
    } else if zeta < 1.0 {
        let wd = w0 * (1.0 - zeta * zeta).sqrt();
        let e = (-zeta * w0 * t).exp();
        let ratio = zeta / (1.0 - zeta * zeta).sqrt();
        1.0 - e * ((wd * t).cos() + ratio * (wd * t).sin())
    } else {
        let z2 = (zeta * zeta - 1.0).sqrt();
        let r1 = -w0 * (zeta - z2);
        let r2 = -w0 * (zeta + z2);
        let c2 = (zeta + z2) / (2.0 * z2);
        let c1 = (zeta - z2) / (2.0 * z2);
        1.0 - (c2 * (r1 * t).exp() - c1 * (r2 * t).exp())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/spring.rs"]
mod tests;
