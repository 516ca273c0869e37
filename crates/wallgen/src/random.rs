//! Seeded pseudo-random numbers for reproducible layouts.
//!
//! [`SeededRandom`] is the Park–Miller "minimal standard" generator
//! (`state = state * 16807 mod 2^31 - 1`). The sequence for a given seed is part
//! of the output contract: every shuffle, jitter and size sample in a layout is
//! drawn from it, so the same seed always reproduces the same wallpaper.
//!
//! The helpers ([`random_range`], [`random_int`], [`shuffle`], [`pick_random`])
//! take any [`RandomSource`] so tests can drive them with fixed values.

/// Modulus of the generator, the Mersenne prime `2^31 - 1`.
pub const MODULUS: u64 = 2_147_483_647;

/// Multiplier of the generator, a primitive root modulo [`MODULUS`].
pub const MULTIPLIER: u64 = 16_807;

/// Source of uniformly distributed floats in `[0, 1)`.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

/// Deterministic generator seeded from an optional integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRandom {
    seed: u64,
    state: u64,
}

impl SeededRandom {
    /// Create a generator. `None` draws a fresh seed from system entropy; the
    /// chosen value is available through [`SeededRandom::seed`].
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::from_entropy(),
        }
    }

    /// Create a generator whose sequence is a pure function of `seed`.
    pub fn from_seed(seed: u64) -> Self {
        // Reducing up front keeps `state * MULTIPLIER` inside u64 and leaves the
        // sequence unchanged. Zero is a fixed point of the recurrence.
        let state = match seed % MODULUS {
            0 => MODULUS - 1,
            residue => residue,
        };
        Self { seed, state }
    }

    /// Create a generator from a seed picked at random, in `[1, MODULUS)`.
    pub fn from_entropy() -> Self {
        let seed = 1 + rand::random::<u64>() % (MODULUS - 1);
        Self::from_seed(seed)
    }

    /// The seed this generator was created from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Advance the state and return the next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state * MULTIPLIER % MODULUS;
        (self.state - 1) as f64 / (MODULUS - 1) as f64
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        SeededRandom::next_f64(self)
    }
}

/// Map the next value linearly into `[min, max)`.
#[inline]
pub fn random_range<R: RandomSource + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    min + rng.next_f64() * (max - min)
}

/// Random integer in `[min, max]`, both ends inclusive.
#[inline]
pub fn random_int<R: RandomSource + ?Sized>(rng: &mut R, min: i64, max: i64) -> i64 {
    random_range(rng, min as f64, max as f64 + 1.0).floor() as i64
}

/// Fisher–Yates shuffle from the last index down, returning a new vector.
///
/// For each `i` from `len - 1` down to 1, `j = floor(next * (i + 1))` and
/// elements `i` and `j` are swapped. The input slice is left untouched.
pub fn shuffle<T: Clone, R: RandomSource + ?Sized>(rng: &mut R, items: &[T]) -> Vec<T> {
    let mut out = items.to_vec();
    for i in (1..out.len()).rev() {
        let j = (rng.next_f64() * (i + 1) as f64).floor() as usize;
        out.swap(i, j);
    }
    out
}

/// Pick one element uniformly; `None` for an empty slice.
pub fn pick_random<'a, T, R: RandomSource + ?Sized>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let index = (rng.next_f64() * items.len() as f64).floor() as usize;
    items.get(index)
}
