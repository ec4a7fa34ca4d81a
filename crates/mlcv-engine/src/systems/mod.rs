pub mod rng;
pub mod spawn;
