//! Deterministic random number generation.
//!
//! Random general draws and shuffled card lists must be reproducible from the
//! engine seed so that two servers given the same config deal the same game.
//! Each room forks its own stream from the engine RNG; forks never disturb the
//! parent's sequence beyond bumping its fork counter.
//!
//! ```
//! use rust_hegemony::core::GameRng;
//!
//! let mut engine = GameRng::new(42);
//! let mut room_a = engine.fork();
//! let mut room_b = engine.fork();
//!
//! // Independent streams per room.
//! assert_ne!(room_a.gen_range(0..1000), room_b.gen_range(0..1000));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hash::{Hash, Hasher};

/// Deterministic ChaCha8 RNG with forking and named sub-streams.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// The seed this stream was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fork an independent stream (one per room).
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self
            .seed
            .wrapping_add(self.fork_counter.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        Self::new(fork_seed)
    }

    /// Derive a named stream, e.g. `"generals"` vs `"draw_pile"`.
    ///
    /// The same name always yields the same stream from the same seed.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        let mut hasher = rustc_hash::FxHasher::default();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Random integer in `range`.
    pub fn gen_range(&mut self, range: std::ops::Range<i32>) -> i32 {
        self.inner.gen_range(range)
    }

    /// Random index in `range`.
    pub fn gen_index(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.gen_range(0..1000), rng2.gen_range(0..1000));
        }
    }

    #[test]
    fn test_fork_is_deterministic() {
        let mut rng1 = GameRng::new(7);
        let mut rng2 = GameRng::new(7);

        let mut a = rng1.fork();
        let mut b = rng2.fork();
        assert_eq!(a.seed(), b.seed());
        assert_eq!(a.gen_range(0..1000), b.gen_range(0..1000));
    }

    #[test]
    fn test_forks_differ_from_each_other() {
        let mut rng = GameRng::new(42);
        let mut first = rng.fork();
        let mut second = rng.fork();

        let seq1: Vec<_> = (0..10).map(|_| first.gen_range(0..1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| second.gen_range(0..1000)).collect();
        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_context_streams() {
        let rng = GameRng::new(42);
        let mut generals = rng.for_context("generals");
        let mut generals_again = rng.for_context("generals");
        let mut pile = rng.for_context("draw_pile");

        let a: Vec<_> = (0..10).map(|_| generals.gen_range(0..1000)).collect();
        let b: Vec<_> = (0..10).map(|_| generals_again.gen_range(0..1000)).collect();
        let c: Vec<_> = (0..10).map(|_| pile.gen_range(0..1000)).collect();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let mut rng = GameRng::new(42);
        let mut data: Vec<u32> = (0..20).collect();
        rng.shuffle(&mut data);

        assert_ne!(data, (0..20).collect::<Vec<_>>());
        data.sort_unstable();
        assert_eq!(data, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_choose() {
        let mut rng = GameRng::new(3);
        let items = [1, 2, 3];
        assert!(items.contains(rng.choose(&items).unwrap()));

        let empty: [i32; 0] = [];
        assert!(rng.choose(&empty).is_none());
        assert!(rng.gen_index(0..3) < 3);
    }
}
