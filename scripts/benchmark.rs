// scripts/benchmark.rs
use fast_cir::analytics::cir_analytic;
use fast_cir::context::Execution;
use fast_cir::math_utils::Timer;
use fast_cir::mc::mc_engine::{path_statistics, simulate_cir_paths, CirConfig};
use std::env;
use std::fs::File;
use std::io::Write;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct SystemInfo {
    os: String,
    cpu_model: String,
    cpu_cores: usize,
    rayon_threads: usize,
}

impl SystemInfo {
    fn gather() -> Self {
        Self {
            os: env::consts::OS.to_string(),
            cpu_model: Self::get_cpu_model(),
            cpu_cores: num_cpus::get(),
            rayon_threads: rayon::current_num_threads(),
        }
    }

    fn get_cpu_model() -> String {
        #[cfg(target_os = "linux")]
        {
            std::fs::read_to_string("/proc/cpuinfo")
                .ok()
                .and_then(|content| {
                    content
                        .lines()
                        .find(|line| line.starts_with("model name"))
                        .and_then(|line| line.split(':').nth(1))
                        .map(|s| s.trim().to_string())
                })
                .unwrap_or_else(|| "Unknown CPU".to_string())
        }

        #[cfg(not(target_os = "linux"))]
        {
            "Unknown CPU".to_string()
        }
    }
}

#[derive(Debug)]
struct BenchmarkResult {
    name: String,
    paths: usize,
    steps: usize,
    time_ms: f64,
    throughput_cells_per_sec: f64,
    terminal_mean: f64,
    analytic_mean: f64,
    zero_fraction: f64,
}

fn run_cir_benchmarks() -> Vec<BenchmarkResult> {
    let mut results = Vec::new();

    let scenarios = [
        ("Feller satisfied", 0.2),
        ("Feller violated", 1.0),
    ];
    let sizes = [(10_000, 252), (100_000, 252)];

    for (label, sigma) in scenarios {
        for (paths, steps) in sizes {
            for execution in [Execution::Sequential, Execution::Parallel] {
                let cfg = CirConfig {
                    paths,
                    steps,
                    sigma,
                    seed: 42,
                    execution,
                    ..Default::default()
                };

                let mut timer = Timer::new();
                timer.start();
                let grid = match simulate_cir_paths(&cfg) {
                    Ok(grid) => grid,
                    Err(e) => {
                        eprintln!("  {} skipped: {}", label, e);
                        continue;
                    }
                };
                let time_ms = timer.elapsed_ms();

                let stats = path_statistics(&grid, cfg.dt);
                let Some(terminal) = stats.last() else {
                    continue;
                };

                results.push(BenchmarkResult {
                    name: format!("{} ({})", label, execution.name()),
                    paths,
                    steps,
                    time_ms,
                    throughput_cells_per_sec: (paths * steps) as f64 / (time_ms / 1000.0),
                    terminal_mean: terminal.mean,
                    analytic_mean: cir_analytic::conditional_mean(
                        cfg.x0,
                        cfg.kappa,
                        cfg.theta,
                        cfg.horizon(),
                    ),
                    zero_fraction: terminal.zero_fraction,
                });
            }
        }
    }

    results
}

fn write_results_to_csv(
    results: &[BenchmarkResult],
    system_info: &SystemInfo,
    filename: &str,
) -> std::io::Result<()> {
    let mut file = File::create(filename)?;

    // Write system information as comments
    writeln!(file, "# System Information")?;
    writeln!(file, "# OS: {}", system_info.os)?;
    writeln!(file, "# CPU: {}", system_info.cpu_model)?;
    writeln!(file, "# CPU Cores: {}", system_info.cpu_cores)?;
    writeln!(file, "# Rayon Threads: {}", system_info.rayon_threads)?;
    writeln!(
        file,
        "# Benchmark Date: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(file, "#")?;

    writeln!(
        file,
        "Benchmark,Paths,Steps,Time_ms,Throughput_cells_per_sec,Terminal_Mean,Analytic_Mean,Zero_Fraction"
    )?;
    for r in results {
        writeln!(
            file,
            "{},{},{},{:.2},{:.0},{:.6},{:.6},{:.4}",
            r.name,
            r.paths,
            r.steps,
            r.time_ms,
            r.throughput_cells_per_sec,
            r.terminal_mean,
            r.analytic_mean,
            r.zero_fraction
        )?;
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("fast-cir Benchmark Suite");
    println!("========================\n");

    let system_info = SystemInfo::gather();
    println!("System Information:");
    println!("  OS: {}", system_info.os);
    println!("  CPU: {}", system_info.cpu_model);
    println!("  CPU Cores: {}", system_info.cpu_cores);
    println!("  Rayon Threads: {}", system_info.rayon_threads);
    println!();

    println!("Running CIR QE-M benchmarks...");
    let results = run_cir_benchmarks();

    println!("\n{:=<100}", "");
    println!(
        "{:<36} {:>8} {:>6} {:>12} {:>15} {:>10} {:>10} {:>8}",
        "Benchmark", "Paths", "Steps", "Time (ms)", "Cells/s", "Mean", "Analytic", "P(X=0)"
    );
    println!("{:-<100}", "");
    for r in &results {
        println!(
            "{:<36} {:>8} {:>6} {:>12.2} {:>15.0} {:>10.6} {:>10.6} {:>8.4}",
            r.name,
            r.paths,
            r.steps,
            r.time_ms,
            r.throughput_cells_per_sec,
            r.terminal_mean,
            r.analytic_mean,
            r.zero_fraction
        );
    }
    println!("{:=<100}", "");

    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let filename = format!("benchmark_results_{}.csv", timestamp);
    match write_results_to_csv(&results, &system_info, &filename) {
        Ok(()) => println!("\nResults saved to: {}", filename),
        Err(e) => eprintln!("\nCould not write {}: {}", filename, e),
    }
}
