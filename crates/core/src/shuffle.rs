use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of randomness for question and option ordering.
///
/// Mirrors the clock abstraction: production code draws from OS entropy,
/// tests and reproducible runs pin a seed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RandomSource {
    #[default]
    Entropy,
    Seeded(u64),
}

impl RandomSource {
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::Seeded(seed)
    }

    /// Build a generator for this source.
    #[must_use]
    pub fn rng(&self) -> StdRng {
        match self {
            RandomSource::Entropy => StdRng::from_os_rng(),
            RandomSource::Seeded(seed) => StdRng::seed_from_u64(*seed),
        }
    }

    #[must_use]
    pub fn is_seeded(&self) -> bool {
        matches!(self, RandomSource::Seeded(_))
    }
}

/// Returns a uniformly shuffled copy of `items` (Fisher-Yates).
///
/// Walks `i` from the last index down to 1, swapping with a uniform `j` in
/// `0..=i`. The input slice is never modified.
pub fn shuffle<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    for i in (1..out.len()).rev() {
        let j = rng.random_range(0..=i);
        out.swap(i, j);
    }
    out
}
