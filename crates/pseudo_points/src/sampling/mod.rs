//! Random offsets and the constrained pseudo-point sampler.
//!
//! This module holds the low-level random helpers shared by the sampler and the
//! batch driver, and re-exports the sampler API from [`pseudo_point`].
use std::f64::consts::TAU;

use glam::DVec2;
use rand::RngCore;

pub mod pseudo_point;

pub use pseudo_point::{
    sample, PseudoPointSampler, Rejection, RejectionStats, SampleOutcome, SampleResult, SamplerConfig,
    DEFAULT_MAX_ATTEMPTS, SENTINEL_POINT,
};

/// Generate a random float in the range [0, 1).
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f64 {
    // 53 high bits fill the mantissa exactly.
    (rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Map two uniform numbers in [0, 1) to an offset uniformly distributed over a disk.
///
/// The radius is `max_radius * sqrt(u)` so that area, not radius, is uniform.
#[inline]
pub fn disk_offset(max_radius: f64, u: f64, v: f64) -> DVec2 {
    let w = max_radius * u.sqrt();
    let t = TAU * v;
    DVec2::new(w * t.cos(), w * t.sin())
}

#[cfg(test)]
pub(crate) mod test_rng {
    use rand::RngCore;

    /// Deterministic generator returning the same word forever.
    pub struct FixedRng {
        pub value: u64,
    }

    impl RngCore for FixedRng {
        fn next_u32(&mut self) -> u32 {
            (self.value >> 32) as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.value
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            let bytes = self.value.to_le_bytes();
            for (i, b) in dest.iter_mut().enumerate() {
                *b = bytes[i % 8];
            }
        }
    }
}
