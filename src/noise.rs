use std::f32::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Noise source for random phases in unvoiced synthesis.
#[derive(Clone, Debug)]
pub struct Noise(StdRng);

impl Noise {
    pub fn new() -> Noise {
        Noise(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Noise {
        Noise(StdRng::seed_from_u64(seed))
    }

    pub fn next_phase(&mut self) -> f32 {
        self.0.gen_range(-PI..PI)
    }
}
