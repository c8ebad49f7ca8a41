use std::{
    fmt,
    str::FromStr,
    sync::{PoisonError, RwLock},
};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform, Uniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{ParseSeedError, Tetromino};

/// An infinite, deterministic sequence addressed by index.
///
/// `get(i)` returns the same value for the same `i` no matter how often, in
/// which order or from which thread it is called. Any `Fn(usize) -> T` is a
/// generator, which is handy for scripted sequences.
///
/// # Example
///
/// ```
/// use tinustris_engine::{Generator, Tetromino};
///
/// let alternating = |i: usize| if i % 2 == 0 { Tetromino::I } else { Tetromino::O };
/// assert_eq!(alternating.get(3), Tetromino::O);
/// ```
pub trait Generator<T>: Send + Sync {
    fn get(&self, index: usize) -> T;
}

impl<T, F> Generator<T> for F
where
    F: Fn(usize) -> T + Send + Sync,
{
    fn get(&self, index: usize) -> T {
        self(index)
    }
}

/// Seed for a [`RandomGenerator`].
///
/// Serialized as a 16-character lowercase hex string. Two generators built
/// from the same seed produce the same sequence.
///
/// # Example
///
/// ```
/// use rand::Rng as _;
/// use tinustris_engine::{Generator as _, GeneratorSeed, TetrominoGenerator};
///
/// let seed: GeneratorSeed = rand::rng().random();
/// let a = TetrominoGenerator::with_seed(seed);
/// let b = TetrominoGenerator::with_seed(seed.to_string().parse().unwrap());
/// assert_eq!(a.get(10), b.get(10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeneratorSeed(u64);

impl GeneratorSeed {
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for GeneratorSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl FromStr for GeneratorSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || ParseSeedError {
            input: s.to_owned(),
        };
        if s.len() != 16 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(error());
        }
        u64::from_str_radix(s, 16).map(Self).map_err(|_| error())
    }
}

impl Serialize for GeneratorSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GeneratorSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows drawing seeds with `rng.random()`.
impl Distribution<GeneratorSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> GeneratorSeed {
        GeneratorSeed(rng.random())
    }
}

/// A memoizing generator drawing values from a seeded pseudo-random stream.
///
/// The first request for an index draws every not yet drawn index up to it, in
/// order, and keeps them. Already drawn indices are served under a shared read
/// lock; only new draws take the write lock.
#[derive(Debug)]
pub struct RandomGenerator<T, D = StandardUniform> {
    seed: GeneratorSeed,
    distr: D,
    draws: RwLock<Draws<T>>,
}

#[derive(Debug)]
struct Draws<T> {
    rng: Pcg32,
    values: Vec<T>,
}

impl<T, D> RandomGenerator<T, D>
where
    D: Distribution<T>,
{
    #[must_use]
    pub fn with_distribution(seed: GeneratorSeed, distr: D) -> Self {
        Self {
            seed,
            distr,
            draws: RwLock::new(Draws {
                rng: Pcg32::seed_from_u64(seed.0),
                values: vec![],
            }),
        }
    }

    #[must_use]
    pub fn seed(&self) -> GeneratorSeed {
        self.seed
    }

    /// Number of values drawn so far.
    #[must_use]
    pub fn drawn(&self) -> usize {
        self.draws
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values
            .len()
    }
}

impl<T, D> Generator<T> for RandomGenerator<T, D>
where
    T: Copy + Send + Sync,
    D: Distribution<T> + Send + Sync,
{
    fn get(&self, index: usize) -> T {
        {
            let draws = self.draws.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(value) = draws.values.get(index) {
                return *value;
            }
        }

        let mut draws = self.draws.write().unwrap_or_else(PoisonError::into_inner);
        let Draws { rng, values } = &mut *draws;
        // Another thread may have drawn past `index` while we waited.
        while values.len() <= index {
            values.push(self.distr.sample(rng));
        }
        values[index]
    }
}

/// Uniformly random tetrominoes.
pub type TetrominoGenerator = RandomGenerator<Tetromino>;

impl RandomGenerator<Tetromino> {
    /// Creates a generator seeded from system entropy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: GeneratorSeed) -> Self {
        Self::with_distribution(seed, StandardUniform)
    }
}

impl Default for RandomGenerator<Tetromino> {
    fn default() -> Self {
        Self::new()
    }
}

/// Uniformly random garbage gap columns in `0..width`.
pub type GapGenerator = RandomGenerator<usize, Uniform<usize>>;

impl RandomGenerator<usize, Uniform<usize>> {
    /// Creates a generator seeded from system entropy.
    ///
    /// # Panics
    ///
    /// Panics if `width` is zero.
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self::with_seed(rand::rng().random(), width)
    }

    /// # Panics
    ///
    /// Panics if `width` is zero.
    #[must_use]
    pub fn with_seed(seed: GeneratorSeed, width: usize) -> Self {
        assert!(width > 0, "gap generator needs a positive width");
        let distr = Uniform::new(0, width).expect("range is non-empty");
        Self::with_distribution(seed, distr)
    }
}
