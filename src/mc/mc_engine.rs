// src/mc/mc_engine.rs
use crate::context::{Execution, NumericContext};
use crate::error::{validation::*, SdeError, SdeResult};
use crate::models::cir::CirPathGenerator;
use crate::params::CirParams;
use crate::rng::PathSeededSource;
use ndarray::{Array2, Axis};
use statrs::statistics::Statistics;
use tracing::info;

/// Monte Carlo configuration for a batch of CIR paths
#[derive(Clone, Debug)]
pub struct CirConfig {
    pub paths: usize,
    pub steps: usize,
    pub x0: f64,
    pub kappa: f64,
    pub theta: f64,
    pub sigma: f64,
    pub dt: f64,
    pub seed: u64,
    pub execution: Execution,
    pub strict: bool,
}

impl CirConfig {
    /// Validate the Monte Carlo configuration
    pub fn validate(&self) -> SdeResult<()> {
        validate_paths(self.paths)?;
        validate_steps(self.steps)?;
        validate_non_negative("x0", self.x0)?;
        validate_positive("kappa", self.kappa)?;
        validate_non_negative("theta", self.theta)?;
        validate_non_negative("sigma", self.sigma)?;
        validate_positive("dt", self.dt)?;

        if self.paths.checked_mul(self.steps).is_none() {
            return Err(SdeError::InvalidConfiguration {
                field: "paths".to_string(),
                reason: format!("{} x {} grid overflows usize", self.paths, self.steps),
            });
        }

        Ok(())
    }

    /// Time of the last column
    pub fn horizon(&self) -> f64 {
        self.dt * (self.steps - 1) as f64
    }

    pub fn params(&self) -> CirParams<f64> {
        CirParams::new(self.kappa, self.theta, self.sigma, self.dt)
    }

    pub fn context(&self) -> NumericContext {
        NumericContext::new(self.execution).strict(self.strict)
    }
}

impl Default for CirConfig {
    fn default() -> Self {
        CirConfig {
            paths: 10_000,
            steps: 250,
            x0: 0.04,
            kappa: 1.0,
            theta: 0.04,
            sigma: 0.2,
            dt: 1.0 / 250.0,
            seed: 12345,
            execution: Execution::Sequential,
            strict: false,
        }
    }
}

/// Simulate `cfg.paths` × `cfg.steps` CIR paths from `cfg.seed`
///
/// Randomness comes from per-path seeded streams, so the grid is identical
/// for sequential and parallel execution.
///
/// # Errors
///
/// Returns `SdeError` for invalid configuration parameters.
pub fn simulate_cir_paths(cfg: &CirConfig) -> SdeResult<Array2<f64>> {
    cfg.validate()?;

    let generator = CirPathGenerator::new(cfg.params()).with_context(cfg.context());
    let mut source = PathSeededSource::new(cfg.seed);
    let paths = generator.generate(cfg.paths, cfg.steps, cfg.x0, &mut source)?;

    info!(
        paths = cfg.paths,
        steps = cfg.steps,
        seed = cfg.seed,
        "simulated CIR paths"
    );
    Ok(paths)
}

/// Cross-sectional statistics of one column of a path grid
#[derive(Clone, Debug, PartialEq)]
pub struct StepStatistics {
    pub step: usize,
    pub time: f64,
    pub mean: f64,
    /// Sample variance (N - 1 denominator); NaN for a single path
    pub variance: f64,
    pub min: f64,
    pub max: f64,
    /// Fraction of paths sitting exactly at zero
    pub zero_fraction: f64,
}

/// Per-step statistics across paths, for a grid with step size `dt`
pub fn path_statistics(grid: &Array2<f64>, dt: f64) -> Vec<StepStatistics> {
    let n_paths = grid.nrows() as f64;

    grid.axis_iter(Axis(1))
        .enumerate()
        .map(|(step, column)| {
            let zeros = column.iter().filter(|&&x| x == 0.0).count();
            StepStatistics {
                step,
                time: step as f64 * dt,
                mean: column.iter().mean(),
                variance: column.iter().variance(),
                min: column.iter().fold(f64::INFINITY, |acc, &x| acc.min(x)),
                max: column.iter().fold(f64::NEG_INFINITY, |acc, &x| acc.max(x)),
                zero_fraction: zeros as f64 / n_paths,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = CirConfig::default();
        assert!(cfg.validate().is_ok());
        assert_relative_eq!(cfg.horizon(), 249.0 / 250.0);
    }

    #[test]
    fn test_invalid_config() {
        let cfg = CirConfig {
            kappa: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(SdeError::InvalidParameters { ref parameter, .. }) if parameter == "kappa"
        ));

        let cfg = CirConfig {
            paths: 0,
            ..Default::default()
        };
        assert!(simulate_cir_paths(&cfg).is_err());

        let cfg = CirConfig {
            x0: -0.01,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_simulation_is_reproducible_across_execution_modes() {
        let cfg = CirConfig {
            paths: 257,
            steps: 20,
            seed: 99,
            ..Default::default()
        };
        let sequential = simulate_cir_paths(&cfg).unwrap();
        let parallel = simulate_cir_paths(&CirConfig {
            execution: Execution::Parallel,
            ..cfg.clone()
        })
        .unwrap();

        assert_eq!(sequential.dim(), (257, 20));
        assert_eq!(sequential, parallel);
        assert_eq!(sequential, simulate_cir_paths(&cfg).unwrap());
    }

    #[test]
    fn test_path_statistics() {
        let grid = array![[0.04, 0.0, 0.02], [0.04, 0.06, 0.04]];
        let stats = path_statistics(&grid, 0.5);

        assert_eq!(stats.len(), 3);
        assert_eq!(stats[0].step, 0);
        assert_relative_eq!(stats[0].mean, 0.04);
        assert_relative_eq!(stats[0].variance, 0.0);
        assert_relative_eq!(stats[1].time, 0.5);
        assert_relative_eq!(stats[1].mean, 0.03);
        assert_relative_eq!(stats[1].variance, 0.0018, max_relative = 1e-12);
        assert_eq!(stats[1].min, 0.0);
        assert_eq!(stats[1].max, 0.06);
        assert_relative_eq!(stats[1].zero_fraction, 0.5);
        assert_relative_eq!(stats[2].zero_fraction, 0.0);
    }
}
