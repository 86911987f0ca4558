pub mod mc_engine;
