// src/params.rs
//! Simulation parameters and their broadcasting rules
//!
//! κ, θ, σ, Δt and X₀ each accept either a single scalar or one value per
//! path. Scalars (and per-path arrays of length one) broadcast to every path;
//! arrays of any other length must match the number of paths exactly.
//! Parameters are time-invariant: a per-path value is reused at every step.

use crate::context::Element;
use crate::error::{validation::*, SdeError, SdeResult};
use ndarray::Array1;

/// A scalar or a per-path parameter
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue<T> {
    Scalar(T),
    PerPath(Array1<T>),
}

impl<T: Element> ParamValue<T> {
    /// Broadcast to one value per path
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` when a per-path array has neither 1 nor `n_paths` values.
    pub fn broadcast(&self, name: &str, n_paths: usize) -> SdeResult<Array1<T>> {
        match self {
            ParamValue::Scalar(value) => Ok(Array1::from_elem(n_paths, *value)),
            ParamValue::PerPath(values) if values.len() == n_paths => Ok(values.clone()),
            ParamValue::PerPath(values) if values.len() == 1 => {
                Ok(Array1::from_elem(n_paths, values[0]))
            }
            ParamValue::PerPath(values) => Err(SdeError::ShapeMismatch {
                parameter: name.to_string(),
                expected: format!("a scalar, 1 value or {} values", n_paths),
                found: format!("{} values", values.len()),
            }),
        }
    }
}

macro_rules! impl_scalar_param {
    ($t:ty) => {
        impl From<$t> for ParamValue<$t> {
            fn from(value: $t) -> Self {
                ParamValue::Scalar(value)
            }
        }

        impl From<$t> for InitState<$t> {
            fn from(value: $t) -> Self {
                InitState(ParamValue::Scalar(value))
            }
        }

        impl From<($t,)> for InitState<$t> {
            fn from(state: ($t,)) -> Self {
                InitState(ParamValue::Scalar(state.0))
            }
        }
    };
}

impl<T> From<Array1<T>> for ParamValue<T> {
    fn from(values: Array1<T>) -> Self {
        ParamValue::PerPath(values)
    }
}

impl<T> From<Vec<T>> for ParamValue<T> {
    fn from(values: Vec<T>) -> Self {
        ParamValue::PerPath(Array1::from(values))
    }
}

/// Initial value X₀ of every path
///
/// Mirrors the `(X0,)` state tuple: the process has a single state variable.
#[derive(Clone, Debug, PartialEq)]
pub struct InitState<T>(pub ParamValue<T>);

impl<T: Element> InitState<T> {
    pub fn broadcast(&self, n_paths: usize) -> SdeResult<Array1<T>> {
        self.0.broadcast("init_state", n_paths)
    }
}

impl<T: Element> Default for InitState<T> {
    fn default() -> Self {
        InitState(ParamValue::Scalar(T::constant(0.04)))
    }
}

impl<T> From<ParamValue<T>> for InitState<T> {
    fn from(value: ParamValue<T>) -> Self {
        InitState(value)
    }
}

impl<T> From<Array1<T>> for InitState<T> {
    fn from(values: Array1<T>) -> Self {
        InitState(ParamValue::PerPath(values))
    }
}

impl<T> From<(Array1<T>,)> for InitState<T> {
    fn from(state: (Array1<T>,)) -> Self {
        InitState(ParamValue::PerPath(state.0))
    }
}

impl<T> From<Vec<T>> for InitState<T> {
    fn from(values: Vec<T>) -> Self {
        InitState(ParamValue::PerPath(Array1::from(values)))
    }
}

impl_scalar_param!(f32);
impl_scalar_param!(f64);

/// CIR parameters for one path after broadcasting
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathParams<T> {
    pub kappa: T, // Mean reversion speed
    pub theta: T, // Long-run mean
    pub sigma: T, // Volatility of the square-root diffusion
    pub dt: T,    // Step size
}

/// CIR parameters, each scalar or per-path
#[derive(Clone, Debug, PartialEq)]
pub struct CirParams<T> {
    pub kappa: ParamValue<T>,
    pub theta: ParamValue<T>,
    pub sigma: ParamValue<T>,
    pub dt: ParamValue<T>,
}

impl<T: Element> Default for CirParams<T> {
    fn default() -> Self {
        CirParams {
            kappa: ParamValue::Scalar(T::constant(1.0)),
            theta: ParamValue::Scalar(T::constant(0.04)),
            sigma: ParamValue::Scalar(T::constant(0.2)),
            dt: ParamValue::Scalar(T::constant(1.0 / 250.0)),
        }
    }
}

impl<T: Element> CirParams<T> {
    pub fn new(
        kappa: impl Into<ParamValue<T>>,
        theta: impl Into<ParamValue<T>>,
        sigma: impl Into<ParamValue<T>>,
        dt: impl Into<ParamValue<T>>,
    ) -> Self {
        CirParams {
            kappa: kappa.into(),
            theta: theta.into(),
            sigma: sigma.into(),
            dt: dt.into(),
        }
    }

    pub fn with_kappa(mut self, kappa: impl Into<ParamValue<T>>) -> Self {
        self.kappa = kappa.into();
        self
    }

    pub fn with_theta(mut self, theta: impl Into<ParamValue<T>>) -> Self {
        self.theta = theta.into();
        self
    }

    pub fn with_sigma(mut self, sigma: impl Into<ParamValue<T>>) -> Self {
        self.sigma = sigma.into();
        self
    }

    pub fn with_dt(mut self, dt: impl Into<ParamValue<T>>) -> Self {
        self.dt = dt.into();
        self
    }

    /// Broadcast all four parameters to `n_paths` per-path tuples
    pub fn broadcast(&self, n_paths: usize) -> SdeResult<Array1<PathParams<T>>> {
        let kappa = self.kappa.broadcast("kappa", n_paths)?;
        let theta = self.theta.broadcast("theta", n_paths)?;
        let sigma = self.sigma.broadcast("sigma", n_paths)?;
        let dt = self.dt.broadcast("dt", n_paths)?;

        Ok((0..n_paths)
            .map(|i| PathParams {
                kappa: kappa[i],
                theta: theta[i],
                sigma: sigma[i],
                dt: dt[i],
            })
            .collect())
    }
}

impl<T: Element> PathParams<T> {
    /// Strict checks; the kernel itself never calls these
    pub fn validate(&self) -> SdeResult<()> {
        validate_positive("kappa", self.kappa.as_f64())?;
        validate_non_negative("theta", self.theta.as_f64())?;
        validate_non_negative("sigma", self.sigma.as_f64())?;
        validate_positive("dt", self.dt.as_f64())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_scalar_broadcast() {
        let value = ParamValue::from(0.5_f64);
        assert_eq!(value.broadcast("kappa", 3).unwrap(), array![0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_per_path_broadcast() {
        let value = ParamValue::from(vec![0.1, 0.2, 0.3]);
        assert_eq!(value.broadcast("theta", 3).unwrap(), array![0.1, 0.2, 0.3]);

        let single = ParamValue::from(array![0.7]);
        assert_eq!(single.broadcast("theta", 2).unwrap(), array![0.7, 0.7]);
    }

    #[test]
    fn test_shape_mismatch() {
        let value = ParamValue::from(vec![0.1, 0.2]);
        match value.broadcast("sigma", 3) {
            Err(SdeError::ShapeMismatch {
                parameter, found, ..
            }) => {
                assert_eq!(parameter, "sigma");
                assert_eq!(found, "2 values");
            }
            other => panic!("expected ShapeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_init_state_forms() {
        let tuple: InitState<f64> = (0.04_f64,).into();
        let scalar: InitState<f64> = 0.04_f64.into();
        assert_eq!(tuple, scalar);
        assert_eq!(InitState::<f64>::default(), scalar);

        let per_path: InitState<f32> = vec![0.01f32, 0.02].into();
        assert_eq!(per_path.broadcast(2).unwrap(), array![0.01f32, 0.02]);
        assert!(per_path.broadcast(3).is_err());
    }

    #[test]
    fn test_default_params() {
        let params = CirParams::<f64>::default();
        let broadcast = params.broadcast(2).unwrap();
        assert_eq!(broadcast.len(), 2);
        assert_eq!(
            broadcast[1],
            PathParams {
                kappa: 1.0,
                theta: 0.04,
                sigma: 0.2,
                dt: 1.0 / 250.0,
            }
        );
    }

    #[test]
    fn test_mixed_broadcast_keeps_per_path_values() {
        let params = CirParams::<f64>::default()
            .with_kappa(vec![1.0, 2.0, 3.0])
            .with_sigma(array![0.3]);
        let broadcast = params.broadcast(3).unwrap();
        assert_eq!(broadcast[2].kappa, 3.0);
        assert_eq!(broadcast[0].sigma, 0.3);
        assert_eq!(broadcast[2].sigma, 0.3);

        let bad = params.with_dt(vec![0.1, 0.2]);
        assert!(matches!(
            bad.broadcast(3),
            Err(SdeError::ShapeMismatch { ref parameter, .. }) if parameter == "dt"
        ));
    }

    #[test]
    fn test_path_params_validation() {
        let mut p = PathParams {
            kappa: 1.0,
            theta: 0.04,
            sigma: 0.2,
            dt: 0.01,
        };
        assert!(p.validate().is_ok());
        p.kappa = 0.0;
        assert!(p.validate().is_err());
        p.kappa = 1.0;
        p.sigma = 0.0;
        assert!(p.validate().is_ok());
        p.dt = 0.0;
        assert!(p.validate().is_err());
    }
}
