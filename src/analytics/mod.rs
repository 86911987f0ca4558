pub mod cir_analytic;
