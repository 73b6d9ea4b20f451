//! RNG abstraction for procedural pipe placement
//!
//! Lets the spawner draw from any `rand::Rng` (seeded Xoshiro in the
//! evaluator, thread RNG in tools) or from a scripted source in tests.

/// Random source for pipe placement
pub trait SpawnRng {
    /// Uniform f32 in `[min, max)`; returns `min` when the range is empty
    fn gen_range_f32(&mut self, min: f32, max: f32) -> f32;
}

impl<T: rand::Rng> SpawnRng for T {
    fn gen_range_f32(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        rand::Rng::random_range(self, min..max)
    }
}
