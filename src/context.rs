// src/context.rs
//! Numeric execution context
//!
//! Every array handed to the path generator shares one element type and one
//! execution mode. The element type is the `T: Element` type parameter
//! (`f32` or `f64`); the execution mode decides whether the per-path
//! arithmetic inside a time step runs on the calling thread or on the rayon
//! pool.

use num_traits::Float;
use rand::distributions::{Distribution, Standard};
use rand::Rng;
use rand_distr::StandardNormal;
use std::fmt::{Debug, Display};

/// Floating-point precision a path grid can be simulated in
pub trait Element: Float + Debug + Display + Send + Sync + 'static {
    /// Convert an `f64` constant into this precision
    fn constant(value: f64) -> Self;

    /// Widen to `f64` (for validation and diagnostics)
    fn as_f64(self) -> f64;

    /// Draw from N(0, 1)
    fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> Self;

    /// Draw from Uniform[0, 1)
    fn sample_uniform<R: Rng + ?Sized>(rng: &mut R) -> Self;
}

macro_rules! impl_element {
    ($t:ty) => {
        impl Element for $t {
            #[inline]
            fn constant(value: f64) -> Self {
                value as $t
            }

            #[inline]
            fn as_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> Self {
                <StandardNormal as Distribution<$t>>::sample(&StandardNormal, rng)
            }

            #[inline]
            fn sample_uniform<R: Rng + ?Sized>(rng: &mut R) -> Self {
                <Standard as Distribution<$t>>::sample(&Standard, rng)
            }
        }
    };
}

impl_element!(f32);
impl_element!(f64);

/// Where the per-step, cross-path arithmetic runs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Execution {
    /// Single thread, path by path
    #[default]
    Sequential,
    /// Rayon data-parallel across the path dimension
    Parallel,
}

impl Execution {
    pub fn name(&self) -> &'static str {
        match self {
            Execution::Sequential => "sequential",
            Execution::Parallel => "parallel",
        }
    }
}

/// Execution settings shared by every array of one simulation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NumericContext {
    pub execution: Execution,
    /// Reject κ ≤ 0, negative θ/σ/X₀, non-positive Δt and non-finite inputs
    /// instead of letting them propagate into the grid.
    pub strict: bool,
}

impl NumericContext {
    pub fn new(execution: Execution) -> Self {
        NumericContext {
            execution,
            strict: false,
        }
    }

    pub fn sequential() -> Self {
        Self::new(Execution::Sequential)
    }

    pub fn parallel() -> Self {
        Self::new(Execution::Parallel)
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}
