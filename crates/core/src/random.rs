//! Random selection used by the assignment tie-break.

use std::fmt;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform selection among `len` candidates.
pub trait RandomSource: Send + Sync + fmt::Debug {
    /// Returns an index in `0..len`. Callers never pass `len == 0`.
    fn pick(&self, len: usize) -> usize;
}

/// Thread-local generator seeded from OS entropy.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Deterministic generator for reproducible tie-breaks.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn pick(&self, len: usize) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen_range(0..len)
    }
}

/// Build the configured source: seeded when a seed is given, OS entropy otherwise.
pub fn random_source_from_seed(seed: Option<u64>) -> Box<dyn RandomSource> {
    match seed {
        Some(seed) => Box::new(SeededRandom::new(seed)),
        None => Box::new(ThreadRandom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_random_stays_in_range() {
        for _ in 0..200 {
            assert!(ThreadRandom.pick(3) < 3);
        }
        assert_eq!(ThreadRandom.pick(1), 0);
    }

    #[test]
    fn test_seeded_random_is_reproducible() {
        let a = SeededRandom::new(42);
        let b = SeededRandom::new(42);
        let seq_a: Vec<usize> = (0..32).map(|_| a.pick(5)).collect();
        let seq_b: Vec<usize> = (0..32).map(|_| b.pick(5)).collect();
        assert_eq!(seq_a, seq_b);
        assert!(seq_a.iter().all(|&i| i < 5));
    }

    #[test]
    fn test_random_source_from_seed() {
        let seeded = random_source_from_seed(Some(9));
        let reference = SeededRandom::new(9);
        assert_eq!(seeded.pick(100), reference.pick(100));

        let unseeded = random_source_from_seed(None);
        assert!(unseeded.pick(4) < 4);
    }
}
