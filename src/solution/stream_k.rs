use serde::{Deserialize, Serialize};

/// Returned by [`StreamKProfile::cost_metric`] when a kernel is not
/// comparable for a problem.
pub const NOT_COMPARABLE: f64 = -1.0;

/// Stream-K tuning profile of a kernel: the arithmetic intensity it was
/// tuned for and the smallest bound size it supports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StreamKProfile {
    pub enabled: bool,
    pub target_intensity: f64,
    pub min_bound_size: u64,
}

impl StreamKProfile {
    pub fn new(target_intensity: f64, min_bound_size: u64) -> Self {
        Self {
            enabled: true,
            target_intensity,
            min_bound_size,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            target_intensity: 0.0,
            min_bound_size: 0,
        }
    }

    /// Distance between the problem's intensity and the tuned one.
    /// Smaller is a better fit; [`NOT_COMPARABLE`] if the kernel cannot
    /// be ranked for this problem at all.
    pub fn cost_metric(&self, intensity: f64, bound_size: u64) -> f64 {
        if !self.enabled || !intensity.is_finite() || bound_size < self.min_bound_size {
            return NOT_COMPARABLE;
        }
        (intensity - self.target_intensity).abs()
    }
}
