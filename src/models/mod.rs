pub mod cir;
