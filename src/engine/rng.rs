// Injectable randomness for the movement heuristic and the population manager.

use rand::seq::SliceRandom;
use rand::Rng;

use super::direction::Direction;

/// Source of every random draw the engine makes.
///
/// Any `rand::Rng` is a `RandomSource`, so production code passes a
/// `StdRng`/`ThreadRng` and tests can pass a seeded generator or a scripted
/// implementation that returns fixed values.
pub trait RandomSource {
    /// Uniform integer in `[min, max]`, both inclusive.
    fn between(&mut self, min: u32, max: u32) -> u32;

    /// Put the turn candidates in random order.
    fn shuffle(&mut self, candidates: &mut [Direction]);
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn between(&mut self, min: u32, max: u32) -> u32 {
        self.gen_range(min..=max)
    }

    fn shuffle(&mut self, candidates: &mut [Direction]) {
        candidates.shuffle(self);
    }
}
