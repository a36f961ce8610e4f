//! Constraint sets evaluated against every candidate point.
//!
//! A [`Constraints`] value bundles:
//! - [`RegionConstraints`]: areas the candidate must fall within, combined by a [`RegionPolicy`];
//! - [`ProximityConstraint`]s: minimum distances to fixed [`Reference`] geometries or to the
//!   points already accepted into an [`AcceptedRegistry`].
use std::fmt;
use std::sync::Arc;

use glam::DVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{Reference, Region};
use crate::registry::AcceptedRegistry;

/// How multiple regions are combined.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RegionPolicy {
    /// The point must lie within every region.
    #[default]
    All,
    /// The point must lie within at least one region.
    Any,
}

/// Regions a candidate must lie within.
#[derive(Clone, Default)]
pub struct RegionConstraints {
    regions: Vec<Arc<dyn Region>>,
    policy: RegionPolicy,
}

impl RegionConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a region (builder-style).
    pub fn with_region<R: Region + 'static>(mut self, region: R) -> Self {
        self.regions.push(Arc::new(region));
        self
    }

    /// Add a region that is shared with other constraint sets.
    pub fn with_shared_region(mut self, region: Arc<dyn Region>) -> Self {
        self.regions.push(region);
        self
    }

    pub fn with_policy(mut self, policy: RegionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn push<R: Region + 'static>(&mut self, region: R) {
        self.regions.push(Arc::new(region));
    }

    pub fn policy(&self) -> RegionPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Whether `point` satisfies the configured policy. Always true without regions.
    pub fn admits(&self, point: DVec2) -> bool {
        if self.regions.is_empty() {
            return true;
        }
        match self.policy {
            RegionPolicy::All => self.regions.iter().all(|r| r.contains(point)),
            RegionPolicy::Any => self.regions.iter().any(|r| r.contains(point)),
        }
    }
}

impl fmt::Debug for RegionConstraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegionConstraints")
            .field("regions", &self.regions.len())
            .field("policy", &self.policy)
            .finish()
    }
}

/// What a proximity constraint measures distance against.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub enum ProximitySource {
    /// A fixed set of external reference geometries.
    References(Vec<Reference>),
    /// Every point accepted so far in the shared registry.
    Registry,
}

/// Minimum distance a candidate must keep from a [`ProximitySource`].
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "ProximityConstraintData")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct ProximityConstraint {
    min_distance: f64,
    source: ProximitySource,
}

/// Unchecked wire form of [`ProximityConstraint`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct ProximityConstraintData {
    min_distance: f64,
    source: ProximitySource,
}

#[cfg(feature = "serde")]
impl TryFrom<ProximityConstraintData> for ProximityConstraint {
    type Error = Error;

    fn try_from(data: ProximityConstraintData) -> Result<Self> {
        ProximityConstraint::new(data.min_distance, data.source)
    }
}

impl ProximityConstraint {
    /// Create a constraint; `min_distance` must be finite and `>= 0`.
    ///
    /// A distance of zero disables the check.
    pub fn new(min_distance: f64, source: ProximitySource) -> Result<Self> {
        if !min_distance.is_finite() || min_distance < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "min_distance must be finite and >= 0, got {min_distance}"
            )));
        }
        Ok(Self {
            min_distance,
            source,
        })
    }

    /// Keep `min_distance` away from fixed reference geometries.
    pub fn from_references<I, R>(min_distance: f64, references: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: Into<Reference>,
    {
        Self::new(
            min_distance,
            ProximitySource::References(references.into_iter().map(Into::into).collect()),
        )
    }

    /// Keep `min_distance` away from every previously accepted point.
    pub fn from_registry(min_distance: f64) -> Result<Self> {
        Self::new(min_distance, ProximitySource::Registry)
    }

    pub fn min_distance(&self) -> f64 {
        self.min_distance
    }

    pub fn source(&self) -> &ProximitySource {
        &self.source
    }

    pub fn uses_registry(&self) -> bool {
        matches!(self.source, ProximitySource::Registry)
    }

    /// Whether `point` is strictly closer than `min_distance` to the source.
    ///
    /// A missing registry behaves like an empty one.
    pub fn is_violated_by(&self, point: DVec2, registry: Option<&AcceptedRegistry>) -> bool {
        if self.min_distance <= 0.0 {
            return false;
        }
        match &self.source {
            ProximitySource::References(refs) => refs
                .iter()
                .any(|r| r.distance_to(point) < self.min_distance),
            ProximitySource::Registry => {
                registry.is_some_and(|reg| reg.any_within(point, self.min_distance))
            }
        }
    }
}

/// The full constraint set of a sampling call.
#[derive(Clone, Debug, Default)]
pub struct Constraints {
    pub regions: RegionConstraints,
    pub proximity: Vec<ProximityConstraint>,
}

impl Constraints {
    /// An empty constraint set: every candidate inside the sampling ring is accepted.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_regions(mut self, regions: RegionConstraints) -> Self {
        self.regions = regions;
        self
    }

    pub fn with_region<R: Region + 'static>(mut self, region: R) -> Self {
        self.regions.push(region);
        self
    }

    pub fn with_proximity(mut self, constraint: ProximityConstraint) -> Self {
        self.proximity.push(constraint);
        self
    }

    /// Whether any proximity constraint reads the shared registry.
    pub fn uses_registry(&self) -> bool {
        self.proximity.iter().any(ProximityConstraint::uses_registry)
    }
}
