//! Constrained pseudo-point sampling around a seed location.
//!
//! Candidates are drawn uniformly over the disk of radius `max_offset` around the
//! seed and rejected until one satisfies every active constraint:
//! - inner exclusion: closer than `min_offset` to the seed;
//! - regions: outside the [`crate::constraints::RegionConstraints`] policy;
//! - proximity: closer than the configured distance to references or accepted points.
//!
//! The loop is bounded by `max_attempts`; running out is reported as
//! [`SampleOutcome::Exhausted`], never as an error.
use std::time::{Duration, Instant};

use glam::DVec2;
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constraints::{Constraints, ProximitySource};
use crate::error::{Error, Result};
use crate::registry::AcceptedRegistry;
use crate::sampling::{disk_offset, rand01};

/// Retry bound used when none is configured.
pub const DEFAULT_MAX_ATTEMPTS: u64 = 100_000;

/// Point reported for exhausted samples; never a legitimate projected coordinate.
pub const SENTINEL_POINT: DVec2 = DVec2::new(-9999.0, -9999.0);

/// Configuration for [`PseudoPointSampler`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerConfig {
    /// Outer radius of the sampling disk in world units.
    pub max_offset: f64,
    /// Maximum number of candidates drawn per call.
    pub max_attempts: u64,
    /// Inner exclusion radius around the seed; `0` disables the check.
    pub min_offset: f64,
}

impl SamplerConfig {
    /// Creates a config with the given outer radius and default settings otherwise.
    pub fn new(max_offset: f64) -> Self {
        Self {
            max_offset,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            min_offset: 0.0,
        }
    }

    /// Sets the inner exclusion radius.
    pub fn with_min_offset(mut self, min_offset: f64) -> Self {
        self.min_offset = min_offset;
        self
    }

    /// Sets the retry bound.
    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !self.max_offset.is_finite() || self.max_offset <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "max_offset must be finite and > 0, got {}",
                self.max_offset
            )));
        }
        if !self.min_offset.is_finite() || self.min_offset < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "min_offset must be finite and >= 0, got {}",
                self.min_offset
            )));
        }
        if self.min_offset >= self.max_offset {
            return Err(Error::InvalidConfig(format!(
                "min_offset ({}) must be < max_offset ({})",
                self.min_offset, self.max_offset
            )));
        }
        if self.max_attempts == 0 {
            return Err(Error::InvalidConfig("max_attempts must be >= 1".into()));
        }
        Ok(())
    }
}

/// Why a candidate was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    TooCloseToSeed,
    OutsideRegion,
    TooCloseToReference,
    TooCloseToAccepted,
}

/// Per-reason rejection counters of one sampling call.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RejectionStats {
    pub too_close_to_seed: u64,
    pub outside_region: u64,
    pub too_close_to_reference: u64,
    pub too_close_to_accepted: u64,
}

impl RejectionStats {
    fn record(&mut self, rejection: Rejection) {
        match rejection {
            Rejection::TooCloseToSeed => self.too_close_to_seed += 1,
            Rejection::OutsideRegion => self.outside_region += 1,
            Rejection::TooCloseToReference => self.too_close_to_reference += 1,
            Rejection::TooCloseToAccepted => self.too_close_to_accepted += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.too_close_to_seed
            + self.outside_region
            + self.too_close_to_reference
            + self.too_close_to_accepted
    }
}

/// Outcome of a sampling call.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleOutcome {
    /// A candidate satisfied every constraint.
    Accepted(DVec2),
    /// `max_attempts` candidates were drawn without success.
    Exhausted,
}

/// Result of a sampling call, with diagnostics.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SampleResult {
    pub outcome: SampleOutcome,
    /// Attempt counter at exit: in `1..=max_attempts` when accepted, `max_attempts + 1` when exhausted.
    pub attempts: u64,
    /// Wall-clock time spent in the call.
    pub elapsed: Duration,
    pub rejections: RejectionStats,
}

impl SampleResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self.outcome, SampleOutcome::Accepted(_))
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self.outcome, SampleOutcome::Exhausted)
    }

    /// The accepted point, if any.
    pub fn accepted_point(&self) -> Option<DVec2> {
        match self.outcome {
            SampleOutcome::Accepted(p) => Some(p),
            SampleOutcome::Exhausted => None,
        }
    }

    /// The accepted point, or [`SENTINEL_POINT`] when exhausted.
    pub fn point(&self) -> DVec2 {
        self.accepted_point().unwrap_or(SENTINEL_POINT)
    }
}

/// Rejection sampler producing one constrained point per call.
#[derive(Debug, Clone)]
pub struct PseudoPointSampler {
    config: SamplerConfig,
}

impl PseudoPointSampler {
    pub fn try_new(config: SamplerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn new(config: SamplerConfig) -> Self {
        debug_assert!(
            config.validate().is_ok(),
            "invalid sampler config: {config:?}"
        );
        Self { config }
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Draws candidates around `seed` until one satisfies `constraints` or the
    /// attempt bound is reached.
    ///
    /// When a registry is supplied, an accepted point is appended to it before
    /// returning, so the next call observes it. Registry proximity constraints
    /// without a registry see no accepted points.
    pub fn sample<R: RngCore>(
        &self,
        seed: DVec2,
        constraints: &Constraints,
        mut registry: Option<&mut AcceptedRegistry>,
        rng: &mut R,
    ) -> SampleResult {
        let start = Instant::now();
        let mut rejections = RejectionStats::default();

        if registry.is_none() && constraints.uses_registry() {
            warn!("Registry proximity constraint configured without a registry; treating it as empty.");
        }

        let mut attempts = 0u64;
        loop {
            attempts += 1;
            if attempts > self.config.max_attempts {
                debug!(
                    "Seed ({}, {}) exhausted after {} attempts: {:?}.",
                    seed.x, seed.y, self.config.max_attempts, rejections
                );
                return SampleResult {
                    outcome: SampleOutcome::Exhausted,
                    attempts,
                    elapsed: start.elapsed(),
                    rejections,
                };
            }

            let u = rand01(rng);
            let v = rand01(rng);
            let candidate = seed + disk_offset(self.config.max_offset, u, v);

            if let Some(rejection) =
                self.check_candidate(seed, candidate, constraints, registry.as_deref())
            {
                rejections.record(rejection);
                continue;
            }

            if let Some(reg) = registry.as_deref_mut() {
                reg.push(candidate);
            }
            debug!(
                "Seed ({}, {}) accepted ({}, {}) after {} attempts.",
                seed.x, seed.y, candidate.x, candidate.y, attempts
            );
            return SampleResult {
                outcome: SampleOutcome::Accepted(candidate),
                attempts,
                elapsed: start.elapsed(),
                rejections,
            };
        }
    }

    fn check_candidate(
        &self,
        seed: DVec2,
        candidate: DVec2,
        constraints: &Constraints,
        registry: Option<&AcceptedRegistry>,
    ) -> Option<Rejection> {
        if self.config.min_offset > 0.0 && candidate.distance(seed) < self.config.min_offset {
            return Some(Rejection::TooCloseToSeed);
        }

        if !constraints.regions.admits(candidate) {
            return Some(Rejection::OutsideRegion);
        }

        constraints
            .proximity
            .iter()
            .find(|c| c.is_violated_by(candidate, registry))
            .map(|c| match c.source() {
                ProximitySource::References(_) => Rejection::TooCloseToReference,
                ProximitySource::Registry => Rejection::TooCloseToAccepted,
            })
    }
}

/// Single-call interface: validates `config` and `seed`, then samples once.
pub fn sample<R: RngCore>(
    seed: DVec2,
    config: &SamplerConfig,
    constraints: &Constraints,
    registry: Option<&mut AcceptedRegistry>,
    rng: &mut R,
) -> Result<SampleResult> {
    if !seed.is_finite() {
        return Err(Error::InvalidInput(format!(
            "seed coordinates must be finite, got {seed}"
        )));
    }
    let sampler = PseudoPointSampler::try_new(config.clone())?;
    Ok(sampler.sample(seed, constraints, registry, rng))
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::constraints::{ProximityConstraint, RegionConstraints, RegionPolicy};
    use crate::geometry::{Circle, Polygon, RasterMask};
    use crate::sampling::test_rng::FixedRng;

    fn sampler(max_offset: f64, min_offset: f64, max_attempts: u64) -> PseudoPointSampler {
        PseudoPointSampler::try_new(
            SamplerConfig::new(max_offset)
                .with_min_offset(min_offset)
                .with_max_attempts(max_attempts),
        )
        .expect("valid config")
    }

    #[test]
    fn config_defaults() {
        let config = SamplerConfig::new(5.0);
        assert_eq!(config.max_attempts, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(config.min_offset, 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let bad = [
            SamplerConfig::new(0.0),
            SamplerConfig::new(-1.0),
            SamplerConfig::new(f64::NAN),
            SamplerConfig::new(f64::INFINITY),
            SamplerConfig::new(5.0).with_min_offset(-0.1),
            SamplerConfig::new(5.0).with_min_offset(5.0),
            SamplerConfig::new(5.0).with_max_attempts(0),
        ];
        for config in bad {
            assert!(
                matches!(
                    PseudoPointSampler::try_new(config.clone()),
                    Err(Error::InvalidConfig(_))
                ),
                "{config:?} should be rejected"
            );
        }
    }

    #[test]
    fn unconstrained_sample_is_accepted_on_first_attempt() {
        let s = sampler(10.0, 0.0, 100);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..500 {
            let result = s.sample(DVec2::ZERO, &Constraints::new(), None, &mut rng);
            assert!(result.is_accepted());
            assert_eq!(result.attempts, 1);
            assert!(result.point().length() <= 10.0);
            assert_eq!(result.rejections.total(), 0);
        }
    }

    #[test]
    fn disjoint_region_exhausts_with_sentinel() {
        let s = sampler(10.0, 0.0, 50);
        let far = Polygon::rectangle(DVec2::new(1000.0, 1000.0), DVec2::new(1010.0, 1010.0));
        let constraints = Constraints::new().with_region(far);
        let mut rng = StdRng::seed_from_u64(3);

        let result = s.sample(DVec2::ZERO, &constraints, None, &mut rng);
        assert!(result.is_exhausted());
        assert_eq!(result.attempts, 51);
        assert_eq!(result.point(), SENTINEL_POINT);
        assert_eq!(result.accepted_point(), None);
        assert_eq!(result.rejections.outside_region, 50);
    }

    #[test]
    fn registry_excludes_later_candidates() {
        let s = sampler(1.0, 0.0, 200);
        let constraints =
            Constraints::new().with_proximity(ProximityConstraint::from_registry(5.0).expect("valid"));
        let mut registry = AcceptedRegistry::new();
        let mut rng = StdRng::seed_from_u64(11);

        let first = s.sample(DVec2::ZERO, &constraints, Some(&mut registry), &mut rng);
        assert!(first.is_accepted());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.last(), first.accepted_point());

        // Every candidate around (1, 0) lies within 3 units of the first point.
        let second = s.sample(DVec2::new(1.0, 0.0), &constraints, Some(&mut registry), &mut rng);
        assert!(second.is_exhausted());
        assert_eq!(second.rejections.too_close_to_accepted, 200);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn registry_constraint_without_registry_sees_nothing() {
        let s = sampler(1.0, 0.0, 10);
        let constraints =
            Constraints::new().with_proximity(ProximityConstraint::from_registry(5.0).expect("valid"));
        let mut rng = StdRng::seed_from_u64(5);
        let a = s.sample(DVec2::ZERO, &constraints, None, &mut rng);
        let b = s.sample(DVec2::ZERO, &constraints, None, &mut rng);
        assert!(a.is_accepted() && b.is_accepted());
    }

    #[test]
    fn accepted_points_lie_in_the_ring() {
        let s = sampler(10.0, 4.0, 10_000);
        let seed = DVec2::new(500_000.0, 4_200_000.0);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let result = s.sample(seed, &Constraints::new(), None, &mut rng);
            let d = result.point().distance(seed);
            assert!(result.is_accepted());
            assert!((4.0..=10.0).contains(&d), "distance {d} outside ring");
            assert_eq!(result.rejections.too_close_to_seed, result.attempts - 1);
        }
    }

    #[test]
    fn zero_draws_hit_the_seed_and_min_offset_rejects_them() {
        let s = sampler(10.0, 1.0, 25);
        let mut rng = FixedRng { value: 0 };
        let result = s.sample(DVec2::new(3.0, 3.0), &Constraints::new(), None, &mut rng);
        assert!(result.is_exhausted());
        assert_eq!(result.attempts, 26);
        assert_eq!(result.rejections.too_close_to_seed, 25);

        let open = sampler(10.0, 0.0, 25);
        let result = open.sample(DVec2::new(3.0, 3.0), &Constraints::new(), None, &mut rng);
        assert_eq!(result.point(), DVec2::new(3.0, 3.0));
        assert_eq!(result.attempts, 1);
    }

    #[test]
    fn accepted_points_satisfy_every_region() {
        let s = sampler(10.0, 0.0, 10_000);
        let regions = RegionConstraints::new()
            .with_region(Polygon::rectangle(DVec2::new(0.0, -10.0), DVec2::new(10.0, 10.0)))
            .with_region(Circle::new(DVec2::new(0.0, 5.0), 5.0).expect("circle"));
        let constraints = Constraints::new().with_regions(regions.clone());
        let mut rng = StdRng::seed_from_u64(8);

        for _ in 0..300 {
            let result = s.sample(DVec2::ZERO, &constraints, None, &mut rng);
            let p = result.point();
            assert!(result.is_accepted());
            assert!(p.x >= 0.0);
            assert!(p.distance(DVec2::new(0.0, 5.0)) <= 5.0);
            assert!(regions.admits(p));
        }
    }

    #[test]
    fn accepted_points_fall_on_set_mask_cells() {
        let s = sampler(10.0, 0.0, 10_000);
        // 20x20 unit cells centred on the seed; only the western half is usable.
        let cells: Vec<bool> = (0..20).flat_map(|_| (0..20).map(|ix| ix < 10)).collect();
        let mask = RasterMask::from_cells(DVec2::splat(-10.0), 1.0, 20, 20, cells).expect("mask");
        let constraints = Constraints::new().with_region(mask);
        let mut rng = StdRng::seed_from_u64(31);

        let mut outside = 0;
        for _ in 0..300 {
            let result = s.sample(DVec2::ZERO, &constraints, None, &mut rng);
            assert!(result.is_accepted());
            assert!(result.point().x < 0.0, "accepted {}", result.point());
            outside += result.rejections.outside_region;
        }
        assert!(outside > 0);

        let empty = RasterMask::new(DVec2::splat(-10.0), 1.0, 20, 20, false).expect("mask");
        let result = s.sample(
            DVec2::ZERO,
            &Constraints::new().with_region(empty),
            None,
            &mut StdRng::seed_from_u64(32),
        );
        assert!(result.is_exhausted());
        assert_eq!(result.rejections.outside_region, 10_000);
    }

    #[test]
    fn any_policy_accepts_either_region() {
        let s = sampler(10.0, 0.0, 10_000);
        let west = Circle::new(DVec2::new(-6.0, 0.0), 2.0).expect("circle");
        let east = Circle::new(DVec2::new(6.0, 0.0), 2.0).expect("circle");
        let any = Constraints::new().with_regions(
            RegionConstraints::new()
                .with_region(west)
                .with_region(east)
                .with_policy(RegionPolicy::Any),
        );
        let mut rng = StdRng::seed_from_u64(12);

        let (mut west_hits, mut east_hits) = (0, 0);
        for _ in 0..300 {
            let result = s.sample(DVec2::ZERO, &any, None, &mut rng);
            assert!(result.is_accepted());
            let p = result.point();
            if west.contains(p) {
                west_hits += 1;
            } else {
                assert!(east.contains(p), "accepted {p} outside both circles");
                east_hits += 1;
            }
        }
        assert!(west_hits > 0 && east_hits > 0);

        // The same disjoint circles under the default policy admit nothing.
        let all = Constraints::new().with_region(west).with_region(east);
        let result = sampler(10.0, 0.0, 200).sample(DVec2::ZERO, &all, None, &mut rng);
        assert!(result.is_exhausted());
        assert_eq!(result.attempts, 201);
    }

    #[test]
    fn accepted_points_keep_distance_from_references() {
        let s = sampler(10.0, 0.0, 10_000);
        let refs = vec![DVec2::new(2.0, 2.0), DVec2::new(-3.0, 0.0), DVec2::new(0.0, -4.0)];
        let constraints = Constraints::new()
            .with_proximity(ProximityConstraint::from_references(2.5, refs.clone()).expect("valid"));
        let mut rng = StdRng::seed_from_u64(77);

        for _ in 0..300 {
            let result = s.sample(DVec2::ZERO, &constraints, None, &mut rng);
            assert!(result.is_accepted());
            for r in &refs {
                assert!(result.point().distance(*r) >= 2.5);
            }
        }
    }

    #[test]
    fn attempts_stay_within_bounds() {
        let s = sampler(10.0, 0.0, 20);
        let constraints = Constraints::new()
            .with_region(Circle::new(DVec2::new(8.0, 0.0), 2.0).expect("circle"));
        let mut rng = StdRng::seed_from_u64(99);
        let mut seen_exhausted = false;
        for _ in 0..200 {
            let result = s.sample(DVec2::ZERO, &constraints, None, &mut rng);
            assert!((1..=21).contains(&result.attempts));
            if result.attempts == 21 {
                assert!(result.is_exhausted());
                seen_exhausted = true;
            } else {
                assert!(result.is_accepted());
            }
        }
        assert!(seen_exhausted);
    }

    #[test]
    fn determinism_for_same_seed() {
        let s = sampler(10.0, 2.0, 500);
        let constraints = Constraints::new()
            .with_region(Polygon::rectangle(DVec2::new(-10.0, 0.0), DVec2::new(10.0, 10.0)))
            .with_proximity(ProximityConstraint::from_registry(3.0).expect("valid"));
        let seeds: Vec<DVec2> = (0..20).map(|i| DVec2::new(i as f64, 0.0)).collect();

        let run = |rng_seed: u64| {
            let mut rng = StdRng::seed_from_u64(rng_seed);
            let mut registry = AcceptedRegistry::new();
            seeds
                .iter()
                .map(|seed| {
                    let r = s.sample(*seed, &constraints, Some(&mut registry), &mut rng);
                    (r.outcome, r.attempts)
                })
                .collect::<Vec<_>>()
        };

        assert_eq!(run(123), run(123));
        assert_ne!(run(123), run(456));
    }

    #[test]
    fn registry_grows_once_per_acceptance_and_keeps_spacing() {
        let s = sampler(10.0, 0.0, 10_000);
        let constraints =
            Constraints::new().with_proximity(ProximityConstraint::from_registry(2.0).expect("valid"));
        let mut registry = AcceptedRegistry::new();
        let mut rng = StdRng::seed_from_u64(2026);

        let mut accepted = 0;
        for i in 0..30 {
            let seed = DVec2::new(3.0 * i as f64, 0.0);
            if s.sample(seed, &constraints, Some(&mut registry), &mut rng)
                .is_accepted()
            {
                accepted += 1;
            }
        }

        assert_eq!(accepted, 30);
        assert_eq!(registry.len(), accepted);
        let pts = registry.points();
        for i in 0..pts.len() {
            for j in (i + 1)..pts.len() {
                assert!(pts[i].distance(pts[j]) >= 2.0);
            }
        }
    }

    #[test]
    fn free_function_validates_inputs() {
        let mut rng = StdRng::seed_from_u64(0);
        let constraints = Constraints::new();

        let err = sample(
            DVec2::new(f64::NAN, 0.0),
            &SamplerConfig::new(1.0),
            &constraints,
            None,
            &mut rng,
        );
        assert!(matches!(err, Err(Error::InvalidInput(_))));

        let err = sample(DVec2::ZERO, &SamplerConfig::new(-1.0), &constraints, None, &mut rng);
        assert!(matches!(err, Err(Error::InvalidConfig(_))));

        let ok = sample(DVec2::ZERO, &SamplerConfig::new(1.0), &constraints, None, &mut rng)
            .expect("valid inputs");
        assert!(ok.is_accepted());
    }
}
