//! A small pseudo-random generator encapsulated in the solver instance.
//!
//! The design notes call out the source's reliance on a process-wide PRNG
//! and ask for it to be encapsulated per-instance instead, to enable
//! deterministic and parallel testing. This is a direct, self-contained
//! generalization of the teacher's own hand-rolled multiplicative
//! congruential `drand`, turned into the `flip`/`uniform` primitives the
//! search driver needs, without reaching for an external RNG crate: the
//! algorithm itself (and its specific anti-modulo-bias rejection sampling)
//! is part of the specification, not an ambient concern.

use std::time::{SystemTime, UNIX_EPOCH};

/// Upper bound (inclusive) of the raw generator, matching the classic 31-bit
/// `RAND_MAX` the WalkSAT/MiniSat lineage is built around.
const RAND_MAX: u64 = 0x7fff_ffff;

/// Multiplier of the Park-Miller minimal-standard generator (mod `2^31 - 1`).
const MULTIPLIER: u64 = 48271;

#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    /// Creates a generator from `seed`. A seed of `0` is replaced by a
    /// wall-clock-derived seed, per the search driver's `seed` parameter.
    pub fn new(seed: u64) -> Self {
        let seed = if seed == 0 { Self::time_seed() } else { seed };
        // The modulus is prime and 0 is not a valid LCG state.
        Rng {
            state: (seed % RAND_MAX).max(1),
        }
    }

    fn time_seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(1)
    }

    /// Advances the generator, returning a value in `[1, RAND_MAX]`.
    fn next_u31(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(MULTIPLIER) % RAND_MAX;
        if self.state == 0 {
            self.state = 1;
        }
        self.state
    }

    /// Draws a uniform variate in `[0, 1]` and returns true iff it is `<= p`.
    pub fn flip(&mut self, p: f64) -> bool {
        let r = (self.next_u31() - 1) as f64 / (RAND_MAX as f64 - 1.0);
        r <= p
    }

    /// Returns a uniform integer in `[0, n)`. Panics if `n` is zero.
    ///
    /// Avoids modulo bias by bucketing the raw generator's range into `n`
    /// equal-width bands and discarding and redrawing any value that falls
    /// into the short, partial band left over at the top of the range.
    pub fn uniform(&mut self, n: u32) -> u32 {
        assert!(n > 0, "uniform(0) has no valid result");
        let band = (RAND_MAX + 1) / u64::from(n);
        loop {
            let r = self.next_u31() - 1;
            let v = r / band;
            if v < u64::from(n) {
                return v as u32;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_zero_and_one_are_deterministic() {
        let mut rng = Rng::new(1);
        for _ in 0..100 {
            assert!(!rng.flip(0.0));
        }
        for _ in 0..100 {
            assert!(rng.flip(1.0));
        }
    }

    #[test]
    fn uniform_stays_in_range() {
        let mut rng = Rng::new(42);
        for n in 1..50 {
            for _ in 0..200 {
                assert!(rng.uniform(n) < n);
            }
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Rng::new(1234);
        let mut b = Rng::new(1234);
        for _ in 0..1000 {
            assert_eq!(a.uniform(97), b.uniform(97));
        }
    }

    #[test]
    fn zero_seed_does_not_panic() {
        // Exercises the wall-clock fallback; just checks it produces usable draws.
        let mut rng = Rng::new(0);
        assert!(rng.uniform(10) < 10);
    }
}
