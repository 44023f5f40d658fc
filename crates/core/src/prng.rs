//! Seedable Xorshift64 generator used for particle placement.
//!
//! Headless runs pass an explicit seed so frames are reproducible; the browser
//! binding seeds from `Math.random()` via [`Xorshift64::from_unit`].

use serde::{Deserialize, Serialize};

/// Xorshift64 PRNG with shifts (13, 7, 17).
///
/// A seed of 0 is a fixed point of the algorithm and is replaced with a
/// non-zero fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    /// Creates a generator from `seed`, substituting the fallback for 0.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Creates a generator from a host-provided uniform value in [0, 1).
    ///
    /// Values outside the unit interval (or NaN) fall back to the fixed seed.
    pub fn from_unit(u: f64) -> Self {
        if !(0.0..1.0).contains(&u) {
            return Self::new(0);
        }
        Self::new((u * (1u64 << 53) as f64) as u64)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Uniform f64 in [0, 1) from the upper 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform f64 in [min, min + span).
    pub fn next_span(&mut self, min: f64, span: f64) -> f64 {
        self.next_f64() * span + min
    }

    /// Uniform f64 in [-span / 2, span / 2), i.e. `(u - 0.5) * span`.
    pub fn next_centered(&mut self, span: f64) -> f64 {
        (self.next_f64() - 0.5) * span
    }
}
