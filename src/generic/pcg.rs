//! A simple pseudorandom number generator.
//!
//! Specifically, a translation of the *really* minimal C PCG32 implementation from <https://www.pcg-random.org/> implemented to satisfy the [RngCore](rand_core::RngCore) trait.
//!
//! PCG(32) was chosen as the default source of (pseudo)random numbers as it is simple, fast, and has some nice supporting documentation.
//!
//! The [solver](crate::context::GenericSolver) is parameterised to anything which satisfies [Rng](rand::Rng), with [Pcg32] fixed as the default.
//! Revising or parameterising the solver is all that's needed for a different source of rng.

use rand::SeedableRng;
use rand_core::{impls, RngCore};

/// State and increment.
pub struct Pcg32 {
    state: u64,
    inc: u64,
}

/// Entirely unmotivated.
const INCREMENT: u64 = 3215534235932367344;

impl Default for Pcg32 {
    fn default() -> Self {
        Pcg32::from_seed(91648253_u64.to_le_bytes())
    }
}

impl RngCore for Pcg32 {
    fn next_u32(&mut self) -> u32 {
        let old_state = self.state;

        self.state = old_state
            .wrapping_mul(6364136223846793005_u64)
            .wrapping_add(self.inc);

        let xorshifted = (((old_state >> 18) ^ old_state) >> 27) as u32;
        let rot = (old_state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }
}

impl SeedableRng for Pcg32 {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self {
            state: u64::from_le_bytes(seed).wrapping_add(INCREMENT),
            inc: INCREMENT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_across_instances() {
        let mut a = Pcg32::from_seed(2_u64.to_le_bytes());
        let mut b = Pcg32::from_seed(2_u64.to_le_bytes());
        for _ in 0..32 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn seeds_diverge() {
        let mut a = Pcg32::from_seed(2_u64.to_le_bytes());
        let mut b = Pcg32::from_seed(73_u64.to_le_bytes());
        let a_run: Vec<u32> = (0..8).map(|_| a.next_u32()).collect();
        let b_run: Vec<u32> = (0..8).map(|_| b.next_u32()).collect();
        assert_ne!(a_run, b_run);
    }
}
