// demos/demo.rs
use fast_cir::analytics::cir_analytic;
use fast_cir::context::{Execution, NumericContext};
use fast_cir::math_utils::Timer;
use fast_cir::mc::mc_engine::{path_statistics, simulate_cir_paths, CirConfig};
use fast_cir::models::cir::generate_cir;
use fast_cir::output;
use fast_cir::rng::SeededSource;

fn main() {
    println!("Running fast-cir QE-M Demo\n");

    // Small batch with the default parameters
    let mut source = SeededSource::new(42);
    let small = generate_cir(
        2,
        5,
        (0.04_f64,),
        1.0,
        0.04,
        0.2,
        1.0 / 250.0,
        &NumericContext::default(),
        &mut source,
    )
    .expect("Valid parameters");
    println!("Two paths, five steps:\n{:.4}\n", small);

    let cfg = CirConfig {
        paths: 100_000,
        steps: 251,
        x0: 0.02,
        kappa: 1.5,
        theta: 0.04,
        sigma: 0.5,
        dt: 1.0 / 250.0,
        seed: 2024,
        execution: Execution::Parallel,
        ..Default::default()
    };

    println!(
        "Feller condition 2κθ > σ²: {}",
        cir_analytic::feller_condition_holds(cfg.kappa, cfg.theta, cfg.sigma)
    );

    let mut timer = Timer::new();
    timer.start();
    let paths = simulate_cir_paths(&cfg).expect("Valid configuration");
    let elapsed = timer.elapsed_ms();
    println!(
        "Simulated {} x {} grid in {:.2} ms ({:.0} paths/s)",
        cfg.paths,
        cfg.steps,
        elapsed,
        cfg.paths as f64 / (elapsed / 1000.0)
    );

    let stats = path_statistics(&paths, cfg.dt);
    println!(
        "\n{:>6} {:>8} {:>12} {:>12} {:>12} {:>12} {:>8}",
        "step", "time", "mean", "exact mean", "variance", "exact var", "P(X=0)"
    );
    for s in stats.iter().step_by(50) {
        println!(
            "{:>6} {:>8.3} {:>12.6} {:>12.6} {:>12.4e} {:>12.4e} {:>8.4}",
            s.step,
            s.time,
            s.mean,
            cir_analytic::conditional_mean(cfg.x0, cfg.kappa, cfg.theta, s.time),
            s.variance,
            cir_analytic::conditional_variance(cfg.x0, cfg.kappa, cfg.theta, cfg.sigma, s.time),
            s.zero_fraction
        );
    }

    std::fs::create_dir_all("results").expect("Could not create results directory");
    output::write_statistics_to_csv("results/cir_statistics.csv", &stats)
        .expect("Could not write statistics");

    let sample = paths.slice(ndarray::s![..10, ..]).to_owned();
    output::write_paths_to_csv("results/cir_paths.csv", &sample).expect("Could not write paths");

    let elapsed_str = format!("{:.2}", elapsed);
    let paths_str = cfg.paths.to_string();
    output::write_summary_to_csv(
        "results/cir_summary.csv",
        &[("paths", paths_str.as_str()), ("elapsed_ms", elapsed_str.as_str())],
    )
    .expect("Could not write summary");

    println!("\nResults written to results/");
}
