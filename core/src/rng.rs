//! Randomness as an injected capability.
//!
//! RULE: Nothing in the simulation may call any platform RNG.
//! The tick engine and the entity factories only ever draw from a
//! `RandomSource` handed to them by the caller, so tests can supply
//! scripted sequences and production wiring supplies a seeded PCG.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// The randomness capability: a stream of uniform reals in [0, 1).
///
/// Everything else (ranges, Bernoulli trials, item selection) is derived
/// from `next_f64`, so a scripted test source only has one knob.
pub trait RandomSource {
    /// Roll a float in [0.0, 1.0).
    fn next_f64(&mut self) -> f64;

    /// Uniform real in [min, max).
    fn in_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Bernoulli trial: returns true with probability p.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform index in [0, len). len must be > 0.
    fn pick_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "pick_index on empty set");
        let idx = (self.next_f64() * len as f64) as usize;
        idx.min(len - 1)
    }
}

/// Uniform selection from a finite set.
pub fn pick<'a, T, R: RandomSource + ?Sized>(rng: &mut R, items: &'a [T]) -> &'a T {
    &items[rng.pick_index(items.len())]
}

/// Production randomness: a PCG stream seeded from a master seed.
pub struct PcgSource {
    inner: Pcg64Mcg,
}

impl PcgSource {
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Seed from OS entropy. Used by hosts that do not care about replay.
    pub fn from_entropy() -> Self {
        Self {
            inner: Pcg64Mcg::from_entropy(),
        }
    }
}

impl RandomSource for PcgSource {
    fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}
