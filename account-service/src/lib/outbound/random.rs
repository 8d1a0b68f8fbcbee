use rand::Rng;

use crate::user::ports::RandomSource;

/// Thread-local CSPRNG from `rand`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_index(&self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..upper)
    }
}
