//! Injectable source of randomness for wave shuffling and critical rolls.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Uniform random source consumed by the simulation.
///
/// Every random decision in the simulation flows through this trait so tests
/// can substitute a scripted implementation.
pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn next_unit(&mut self) -> f32;

    /// Uniform index in `0..bound`. `bound` must be non-zero.
    fn next_index(&mut self, bound: usize) -> usize;

    /// Shuffles `items` in place with a Fisher-Yates pass.
    fn shuffle<T>(&mut self, items: &mut [T])
    where
        Self: Sized,
    {
        for index in (1..items.len()).rev() {
            let swap_index = self.next_index(index + 1);
            items.swap(index, swap_index);
        }
    }
}

/// Deterministic random source backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
}

impl SeededRandom {
    /// Creates a source that replays the same sequence for the same seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    fn next_index(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0, "next_index requires a non-zero bound");
        if bound <= 1 {
            return 0;
        }
        self.rng.gen_range(0..bound)
    }
}
