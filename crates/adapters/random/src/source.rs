//! Where the coin flips come from.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// A source of uniformly distributed bits.
pub trait BitSource: Send {
    fn next_bit(&mut self) -> bool;
}

/// [`BitSource`] over any `rand` generator.
///
/// The default is a [`SmallRng`] seeded from the OS: fast, not
/// cryptographically secure. Tests pass a seeded `StdRng` instead.
#[derive(Debug, Clone)]
pub struct RngBitSource<R>(R);

impl<R: Rng + Send> RngBitSource<R> {
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self(rng)
    }
}

impl RngBitSource<SmallRng> {
    #[must_use]
    pub fn from_entropy() -> Self {
        Self(SmallRng::from_entropy())
    }
}

impl Default for RngBitSource<SmallRng> {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl<R: Rng + Send> BitSource for RngBitSource<R> {
    fn next_bit(&mut self) -> bool {
        self.0.gen_bool(0.5)
    }
}
