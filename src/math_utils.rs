// src/math_utils.rs
use crate::context::Element;

/// Floor added to denominators that may be exactly zero
pub const EPSILON: f64 = 1e-8;

/// `num / (den + EPSILON)`
///
/// Used wherever the conditional mean can vanish. The floor is a numerical
/// guard only; it biases results slightly when `den` is near zero.
#[inline]
pub fn safe_div<T: Element>(num: T, den: T) -> T {
    num / (den + T::constant(EPSILON))
}

pub struct Timer {
    start_time: std::time::Instant,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    pub fn new() -> Timer {
        Timer {
            start_time: std::time::Instant::now(),
        }
    }

    pub fn start(&mut self) {
        self.start_time = std::time::Instant::now();
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64() * 1000.0
    }
}
