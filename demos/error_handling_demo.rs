// demos/error_handling_demo.rs
use fast_cir::context::NumericContext;
use fast_cir::error::SdeError;
use fast_cir::models::cir::CirPathGenerator;
use fast_cir::params::CirParams;
use fast_cir::rng::SeededSource;

fn main() {
    println!("Error Handling Demo for fast-cir");
    println!("================================\n");

    let mut source = SeededSource::new(1);

    // Test 1: per-path parameter of the wrong length
    println!("1. Testing a per-path kappa that does not match the batch...");
    let generator = CirPathGenerator::new(CirParams::<f64>::default().with_kappa(vec![1.0, 2.0]));
    match generator.generate(3, 10, 0.04, &mut source) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e @ SdeError::ShapeMismatch { .. }) => println!("   ✓ Caught error: {}", e),
        Err(e) => println!("   Unexpected error: {}", e),
    }

    // Test 2: empty batch
    println!("\n2. Testing zero paths...");
    match CirPathGenerator::<f64>::default().generate(0, 10, 0.04, &mut source) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 3: κ = 0 passes through by default and is rejected in strict mode
    println!("\n3. Testing kappa = 0...");
    let params = CirParams::<f64>::default().with_kappa(0.0);
    match CirPathGenerator::new(params.clone()).generate(2, 3, 0.04, &mut source) {
        Ok(paths) => println!("   Default context returns a degenerate grid:\n{}", paths),
        Err(e) => println!("   Unexpected error: {}", e),
    }
    match CirPathGenerator::new(params)
        .with_context(NumericContext::default().strict(true))
        .generate(2, 3, 0.04, &mut source)
    {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Strict context caught error: {}", e),
    }

    // Test 4: Feller violation only warns
    println!("\n4. Testing parameters that violate the Feller condition...");
    let wild = CirPathGenerator::new(CirParams::<f64>::default().with_sigma(1.0));
    match wild.generate(1_000, 250, 0.04, &mut source) {
        Ok(paths) => {
            let zeros = paths.iter().filter(|&&x| x == 0.0).count();
            println!("   ✓ Simulated anyway; {} cells sit at zero", zeros);
        }
        Err(e) => println!("   Unexpected error: {}", e),
    }
}
