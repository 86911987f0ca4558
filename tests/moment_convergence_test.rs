// tests/moment_convergence_test.rs
use fast_cir::analytics::cir_analytic::{conditional_mean, conditional_variance};
use fast_cir::context::Execution;
use fast_cir::mc::mc_engine::{path_statistics, simulate_cir_paths, CirConfig};

fn check_terminal_moments(cfg: &CirConfig, mean_tol: f64, variance_rel_tol: f64) {
    let paths = simulate_cir_paths(cfg).expect("Valid configuration");
    let stats = path_statistics(&paths, cfg.dt);
    let terminal = stats.last().expect("at least one step");

    let t = cfg.horizon();
    let exact_mean = conditional_mean(cfg.x0, cfg.kappa, cfg.theta, t);
    let exact_variance = conditional_variance(cfg.x0, cfg.kappa, cfg.theta, cfg.sigma, t);

    println!(
        "\nσ = {}: mean {:.6} (exact {:.6}), variance {:.6e} (exact {:.6e}), P(X=0) = {:.4}",
        cfg.sigma, terminal.mean, exact_mean, terminal.variance, exact_variance, terminal.zero_fraction
    );

    assert!(
        (terminal.mean - exact_mean).abs() < mean_tol,
        "terminal mean {} too far from exact {}",
        terminal.mean,
        exact_mean
    );
    assert!(
        ((terminal.variance - exact_variance) / exact_variance).abs() < variance_rel_tol,
        "terminal variance {} too far from exact {}",
        terminal.variance,
        exact_variance
    );
    assert!(terminal.min >= -1e-6, "negative terminal value {}", terminal.min);
}

#[test]
fn test_moments_feller_satisfied() {
    // 2κθ = 0.08 > σ² = 0.04; the quadratic regime dominates
    let cfg = CirConfig {
        paths: 100_000,
        steps: 51,
        x0: 0.06,
        kappa: 1.0,
        theta: 0.04,
        sigma: 0.2,
        dt: 0.02,
        seed: 42,
        execution: Execution::Parallel,
        ..Default::default()
    };
    check_terminal_moments(&cfg, 5e-4, 0.05);
}

#[test]
fn test_moments_feller_violated() {
    // σ² = 1 ≫ 2κθ; many cells fall in the exponential regime and hit zero
    let cfg = CirConfig {
        paths: 100_000,
        steps: 51,
        x0: 0.04,
        kappa: 1.0,
        theta: 0.04,
        sigma: 1.0,
        dt: 0.02,
        seed: 7,
        execution: Execution::Parallel,
        ..Default::default()
    };
    check_terminal_moments(&cfg, 2.5e-3, 0.08);

    let paths = simulate_cir_paths(&cfg).expect("Valid configuration");
    let stats = path_statistics(&paths, cfg.dt);
    assert!(stats.iter().any(|s| s.zero_fraction > 0.0));
}

#[test]
fn test_mean_along_the_path() {
    let cfg = CirConfig {
        paths: 50_000,
        steps: 101,
        x0: 0.01,
        kappa: 2.0,
        theta: 0.05,
        sigma: 0.3,
        dt: 0.01,
        seed: 3,
        ..Default::default()
    };
    let paths = simulate_cir_paths(&cfg).expect("Valid configuration");

    for s in path_statistics(&paths, cfg.dt).iter().step_by(10) {
        let exact = conditional_mean(cfg.x0, cfg.kappa, cfg.theta, s.time);
        assert!(
            (s.mean - exact).abs() < 5e-4,
            "step {}: mean {} vs exact {}",
            s.step,
            s.mean,
            exact
        );
    }
}
