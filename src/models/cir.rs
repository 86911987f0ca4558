// src/models/cir.rs
//! Cox-Ingersoll-Ross Path Generation (Andersen QE-M)
//!
//! # Mathematical Framework
//!
//! The CIR process is a mean-reverting square-root diffusion:
//! ```text
//! dX_t = κ(θ - X_t) dt + σ √X_t dW_t
//! ```
//!
//! Where:
//! - X_t: Instantaneous rate or variance (non-negative)
//! - κ: Mean reversion speed
//! - θ: Long-run mean
//! - σ: Volatility of the square-root diffusion
//!
//! # Quadratic-Exponential Scheme
//!
//! An Euler step of the square-root diffusion regularly goes negative. The QE
//! scheme instead matches the exact conditional mean and variance of each
//! step and samples from one of two simple laws with those moments:
//!
//! ```text
//! m   = θ + (v - θ)e^(-κΔt)
//! s²  = v σ² e^(-κΔt)(1 - e^(-κΔt))/κ + θ σ² (1 - e^(-κΔt))²/(2κ)
//! ψ   = s² / (m² + ε)
//! ```
//!
//! - ψ ≤ ψ_c: quadratic law `a (b + Z)²`, Z ~ N(0,1)
//! - ψ > ψ_c: exponential law with a point mass at zero, sampled by
//!   inverting its CDF at U ~ Uniform[0,1)
//!
//! Both candidates are evaluated for every cell and the regime tag of the
//! cell picks one. Paths are advanced one column at a time; inside a column
//! every path is independent, so the column can be filled in parallel.
//!
//! # Reference
//!
//! Andersen, L., "Efficient Simulation of the Heston Stochastic Volatility
//! Model" (2007), sections 3.2.3–3.2.4.

use crate::analytics::cir_analytic::feller_condition_holds;
use crate::context::{Element, Execution, NumericContext};
use crate::error::{validation::*, SdeResult};
use crate::math_utils::safe_div;
use crate::params::{CirParams, InitState, ParamValue, PathParams};
use crate::rng::{RandomDraws, RandomSource};
use ndarray::{s, Array1, Array2, Zip};
use tracing::{debug, trace, warn};

/// Critical ψ separating the two regimes (Andersen allows [1, 2])
pub const PSI_CRIT: f64 = 1.5;

/// Sampling law used for one cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Regime {
    /// ψ ≤ ψ_c: squared shifted Gaussian
    Quadratic,
    /// ψ > ψ_c (or ψ is NaN): exponential tail with point mass at zero
    Exponential,
}

impl Regime {
    #[inline]
    pub fn classify<T: Element>(psi: T) -> Self {
        if psi <= T::constant(PSI_CRIT) {
            Regime::Quadratic
        } else {
            Regime::Exponential
        }
    }
}

/// Conditional moments of one step of one path
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QeMoments<T> {
    pub mean: T,
    pub variance: T,
    pub psi: T,
}

impl<T: Element> QeMoments<T> {
    /// Moments of X(t + Δt) given X(t) = `v`
    #[inline]
    pub fn compute(v: T, p: &PathParams<T>) -> Self {
        let one = T::one();
        let two = T::constant(2.0);

        let exp_term = (-p.kappa * p.dt).exp();
        let one_minus_exp = one - exp_term;
        let sigma2 = p.sigma * p.sigma;

        let mean = p.theta + (v - p.theta) * exp_term;
        let variance = v * sigma2 * exp_term * one_minus_exp / p.kappa
            + p.theta * sigma2 * (one_minus_exp * one_minus_exp) / (two * p.kappa);
        let psi = safe_div(variance, mean * mean);

        QeMoments {
            mean,
            variance,
            psi,
        }
    }

    #[inline]
    pub fn regime(&self) -> Regime {
        Regime::classify(self.psi)
    }

    /// Quadratic law `a (b + z)²`
    ///
    /// Whenever ψ = 0 (σ = 0, or θ = 0 with v = 0) `b²` overflows and the
    /// product would be `0 · ∞`; the law then collapses onto its mean, which
    /// is returned.
    #[inline]
    pub fn quadratic_sample(&self, z: T) -> T {
        let one = T::one();
        let two_over_psi = T::constant(2.0) / self.psi;

        let b2 = two_over_psi - one + two_over_psi.sqrt() * (two_over_psi - one).sqrt();
        if b2.is_infinite() {
            return self.mean;
        }
        let b = b2.sqrt();
        let a = self.mean / (one + b * b);
        a * (b + z) * (b + z)
    }

    /// Inverse CDF of the exponential law with mass `p` at zero
    #[inline]
    pub fn exponential_sample(&self, u: T) -> T {
        let one = T::one();

        let p = (self.psi - one) / (self.psi + one);
        let beta = safe_div(one - p, self.mean);
        let pinv = safe_div(one - p, one - u).ln() / beta;

        if u > p {
            pinv
        } else {
            T::zero()
        }
    }

    /// X(t + Δt) for the standard-normal draw `z` and uniform draw `u`
    #[inline]
    pub fn sample(&self, z: T, u: T) -> T {
        let quadratic = self.quadratic_sample(z);
        let exponential = self.exponential_sample(u);

        match self.regime() {
            Regime::Quadratic => quadratic,
            Regime::Exponential => exponential,
        }
    }
}

/// One QE-M transition of a single path
#[inline]
pub fn qe_step<T: Element>(v: T, params: &PathParams<T>, z: T, u: T) -> T {
    QeMoments::compute(v, params).sample(z, u)
}

/// Batched CIR path generator
#[derive(Clone, Debug)]
pub struct CirPathGenerator<T> {
    pub params: CirParams<T>,
    pub context: NumericContext,
}

impl<T: Element> Default for CirPathGenerator<T> {
    fn default() -> Self {
        Self::new(CirParams::default())
    }
}

impl<T: Element> CirPathGenerator<T> {
    pub fn new(params: CirParams<T>) -> Self {
        CirPathGenerator {
            params,
            context: NumericContext::default(),
        }
    }

    pub fn with_context(mut self, context: NumericContext) -> Self {
        self.context = context;
        self
    }

    /// Simulate `n_paths` × `n_steps`, drawing randomness from `source`
    ///
    /// With `n_steps == 1` the source is never called.
    ///
    /// # Errors
    ///
    /// - `InvalidConfiguration` for zero paths or steps
    /// - `ShapeMismatch` when a parameter does not broadcast to `n_paths`
    /// - `InvalidParameters` under strict validation only
    pub fn generate<S>(
        &self,
        n_paths: usize,
        n_steps: usize,
        init_state: impl Into<InitState<T>>,
        source: &mut S,
    ) -> SdeResult<Array2<T>>
    where
        S: RandomSource<T> + ?Sized,
    {
        let (mut output, path_params) = self.prepare(n_paths, n_steps, &init_state.into())?;
        if n_steps > 1 {
            let draws = RandomDraws::draw(source, n_paths, n_steps);
            draws.check_shape(n_paths, n_steps)?;
            self.advance(&mut output, &path_params, &draws);
        }
        Ok(output)
    }

    /// Simulate with caller-supplied draws
    ///
    /// Both grids must be exactly `n_paths` × `n_steps`; the last column is
    /// never read.
    pub fn generate_with_draws(
        &self,
        n_paths: usize,
        n_steps: usize,
        init_state: impl Into<InitState<T>>,
        draws: &RandomDraws<T>,
    ) -> SdeResult<Array2<T>> {
        let (mut output, path_params) = self.prepare(n_paths, n_steps, &init_state.into())?;
        draws.check_shape(n_paths, n_steps)?;
        self.advance(&mut output, &path_params, draws);
        Ok(output)
    }

    /// Validate, broadcast, and allocate the grid with its initial column
    fn prepare(
        &self,
        n_paths: usize,
        n_steps: usize,
        init_state: &InitState<T>,
    ) -> SdeResult<(Array2<T>, Array1<PathParams<T>>)> {
        validate_paths(n_paths)?;
        validate_steps(n_steps)?;

        let x0 = init_state.broadcast(n_paths)?;
        let path_params = self.params.broadcast(n_paths)?;

        if self.context.strict {
            for (x, p) in x0.iter().zip(path_params.iter()) {
                validate_non_negative("init_state", x.as_f64())?;
                p.validate()?;
            }
        }

        let violations = path_params
            .iter()
            .filter(|p| !feller_condition_holds(p.kappa, p.theta, p.sigma))
            .count();
        if violations > 0 {
            warn!(
                violations,
                n_paths, "Feller condition violated (2κθ ≤ σ²); paths may hit zero"
            );
        }

        debug!(
            n_paths,
            n_steps,
            execution = self.context.execution.name(),
            "generating CIR paths"
        );

        let mut output = Array2::from_elem((n_paths, n_steps), T::zero());
        output.column_mut(0).assign(&x0);
        Ok((output, path_params))
    }

    /// Fill columns 1..n_steps, one time step at a time
    fn advance(
        &self,
        output: &mut Array2<T>,
        path_params: &Array1<PathParams<T>>,
        draws: &RandomDraws<T>,
    ) {
        let n_steps = output.ncols();

        for step in 0..n_steps.saturating_sub(1) {
            let (current, next) = output.multi_slice_mut((s![.., step], s![.., step + 1]));
            let zip = Zip::from(next)
                .and(&current)
                .and(path_params)
                .and(draws.normal.column(step))
                .and(draws.uniform.column(step));

            match self.context.execution {
                Execution::Sequential => zip.for_each(|next, &v, p, &z, &u| {
                    *next = qe_step(v, p, z, u);
                }),
                Execution::Parallel => zip.par_for_each(|next, &v, p, &z, &u| {
                    *next = qe_step(v, p, z, u);
                }),
            }

            trace!(step, "advanced CIR column");
        }
    }
}

/// Generate CIR paths from loosely specified parameters
///
/// Each of `kappa`, `theta`, `sigma`, `dt` and `init_state` is either a
/// scalar or one value per path.
///
/// # Example
///
/// ```rust
/// use fast_cir::context::NumericContext;
/// use fast_cir::models::cir::generate_cir;
/// use fast_cir::rng::SeededSource;
///
/// let mut source = SeededSource::new(42);
/// let paths = generate_cir(
///     2, 5, (0.04_f64,), 1.0, 0.04, 0.2, 1.0 / 250.0,
///     &NumericContext::default(), &mut source,
/// ).expect("valid parameters");
/// assert_eq!(paths.dim(), (2, 5));
/// assert_eq!(paths[[1, 0]], 0.04);
/// ```
#[allow(clippy::too_many_arguments)]
pub fn generate_cir<T, S>(
    n_paths: usize,
    n_steps: usize,
    init_state: impl Into<InitState<T>>,
    kappa: impl Into<ParamValue<T>>,
    theta: impl Into<ParamValue<T>>,
    sigma: impl Into<ParamValue<T>>,
    dt: impl Into<ParamValue<T>>,
    context: &NumericContext,
    source: &mut S,
) -> SdeResult<Array2<T>>
where
    T: Element,
    S: RandomSource<T> + ?Sized,
{
    CirPathGenerator::new(CirParams::new(kappa, theta, sigma, dt))
        .with_context(*context)
        .generate(n_paths, n_steps, init_state, source)
}
