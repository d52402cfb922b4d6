//! Deterministic pseudo-random generator used for every exploration draw.
//!
//! One linear congruential step followed by an IEEE-754 bit trick:
//!
//! ```text
//! state' = A * state + C            (mod 2^64)
//! bits   = ((state' >> 25) & 0x7FFFFF) | (127 << 23)
//! u      = f32::from_bits(bits) - 1.0        in [0, 1)
//! ```
//!
//! The constants and the bit layout are a conformance contract: every implementation
//! of the scheme must produce the same float for the same seed.

use rand::{RngCore, SeedableRng};

const LCG_A: u64 = 0xeece_66d5_deec_e66d;
const LCG_C: u64 = 2_147_483_647;
const EXPONENT_BIAS: u32 = 127 << 23;
const MANTISSA_MASK: u64 = 0x7F_FFFF;

/// Uniform float in `[0, 1)` for `seed`: the first value of [`Prg::new`]`(seed)`.
///
/// ```rust
/// use mwt_explore::uniform;
///
/// let u = uniform(42);
/// assert!((0.0..1.0).contains(&u));
/// assert_eq!(u.to_bits(), uniform(42).to_bits());
/// ```
#[must_use]
pub fn uniform(seed: u64) -> f32 {
    Prg::new(seed).uniform_unit_interval()
}

/// Seeded generator stream over the merand48 step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prg {
    state: u64,
}

impl Prg {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Current LCG state (the seed before any draw).
    pub fn state(&self) -> u64 {
        self.state
    }

    #[inline]
    fn step(&mut self) -> u64 {
        self.state = LCG_A.wrapping_mul(self.state).wrapping_add(LCG_C);
        self.state
    }

    /// Next float in `[0, 1)`.
    pub fn uniform_unit_interval(&mut self) -> f32 {
        let s = self.step();
        let bits = ((s >> 25) & MANTISSA_MASK) as u32 | EXPONENT_BIAS;
        f32::from_bits(bits) - 1.0
    }

    /// Next integer in `[low, high]` (inclusive): `low + ((state >> 25) % width)`.
    ///
    /// A reversed range returns `low` after still consuming one step.
    pub fn uniform_int(&mut self, low: u32, high: u32) -> u32 {
        let s = self.step();
        if high < low {
            return low;
        }
        let width = u64::from(high - low) + 1;
        // (s >> 25) % width < width <= 2^32, and low + that <= high.
        low + ((s >> 25) % width) as u32
    }
}

impl RngCore for Prg {
    fn next_u32(&mut self) -> u32 {
        (self.step() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let hi = u64::from(self.next_u32());
        let lo = u64::from(self.next_u32());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

impl SeedableRng for Prg {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}
