//! Inertia layered on top of raw scroll progress.
//!
//! The mapper reports exactly where the page is. When playback should glide instead of snapping,
//! a [`ProgressSmoother`] chases that value with exponential damping. Each tick moves the current
//! value a fixed fraction of the remaining distance per second, so the result does not depend on
//! the tick rate.

/// Exponentially damped follower of a target progress value.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ProgressSmoother {
    /// Damping rate per second; larger settles faster.
    pub rate: f64,
    /// Distance below which the value snaps onto the target.
    pub epsilon: f64,
    #[serde(skip)]
    current: f64,
    #[serde(skip)]
    target: f64,
}

impl Default for ProgressSmoother {
    fn default() -> Self {
        Self::new(10.0)
    }
}

impl ProgressSmoother {
    pub fn new(rate: f64) -> Self {
        Self {
            rate: if rate.is_finite() { rate.max(0.0) } else { 0.0 },
            epsilon: 1e-4,
            current: 0.0,
            target: 0.0,
        }
    }

    pub fn set_target(&mut self, target: f64) {
        self.target = crate::foundation::math::clamp01(target);
    }

    /// Jump straight to `value` with no motion left.
    pub fn reset(&mut self, value: f64) {
        self.set_target(value);
        self.current = self.target;
    }

    /// Advance by `dt_secs` and return the smoothed value.
    pub fn tick(&mut self, dt_secs: f64) -> f64 {
        if self.rate <= 0.0 {
            self.current = self.target;
            return self.current;
        }
        let dt = dt_secs.max(0.0);
        let alpha = 1.0 - (-self.rate * dt).exp();
        self.current += (self.target - self.current) * alpha;
        if (self.target - self.current).abs() < self.epsilon {
            self.current = self.target;
        }
        self.current
    }

    pub fn value(&self) -> f64 {
        self.current
    }

    pub fn is_animating(&self) -> bool {
        self.current != self.target
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/smooth.rs"]
mod tests;
