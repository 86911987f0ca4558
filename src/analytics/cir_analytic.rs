// src/analytics/cir_analytic.rs
//! Closed-form moments of the Cox-Ingersoll-Ross process
//!
//! # Mathematical Foundation
//!
//! The CIR process
//! ```text
//! dX_t = κ(θ - X_t) dt + σ √X_t dW_t
//! ```
//! has a scaled non-central chi-square transition law. Its first two
//! conditional moments over a horizon `t` are
//! ```text
//! E[X_t | X_0]   = θ + (X_0 - θ) e^(-κt)
//! Var[X_t | X_0] = X_0 σ² e^(-κt)(1 - e^(-κt))/κ + θ σ² (1 - e^(-κt))² / (2κ)
//! ```
//! The QE-M scheme matches exactly these two moments on every step, which is
//! what makes them useful as a reference for simulated paths.

use crate::context::Element;

/// Conditional mean E[X_t | X_0]
pub fn conditional_mean<T: Element>(x0: T, kappa: T, theta: T, t: T) -> T {
    let exp_term = (-kappa * t).exp();
    theta + (x0 - theta) * exp_term
}

/// Conditional variance Var[X_t | X_0]
///
/// Undefined for κ = 0.
pub fn conditional_variance<T: Element>(x0: T, kappa: T, theta: T, sigma: T, t: T) -> T {
    let one = T::one();
    let two = T::constant(2.0);
    let exp_term = (-kappa * t).exp();
    let sigma2 = sigma * sigma;

    x0 * sigma2 * exp_term * (one - exp_term) / kappa
        + theta * sigma2 * (one - exp_term) * (one - exp_term) / (two * kappa)
}

/// Long-run variance θσ²/(2κ)
pub fn stationary_variance<T: Element>(kappa: T, theta: T, sigma: T) -> T {
    theta * sigma * sigma / (T::constant(2.0) * kappa)
}

/// Feller condition 2κθ > σ²
///
/// When it fails the exact process can reach zero and simulated paths spend
/// more time in the exponential regime with its point mass at zero.
pub fn feller_condition_holds<T: Element>(kappa: T, theta: T, sigma: T) -> bool {
    T::constant(2.0) * kappa * theta > sigma * sigma
}
