//! Planar geometry used to express sampling constraints.
//!
//! Coordinates are projected `f64` pairs ([`glam::DVec2`]); every distance is plain
//! two-dimensional Euclidean distance with no projection correction.
//!
//! - [`Region`]: containment predicate used by region constraints.
//! - [`Reference`]: geometry a generated point must keep its distance from.
use glam::DVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod circle;
pub mod mask;
pub mod polygon;

pub use circle::Circle;
pub use mask::RasterMask;
pub use polygon::{BoundingBox, Polygon};

/// Tolerance for treating a point as lying on a ring edge.
pub(crate) const BOUNDARY_EPSILON: f64 = 1e-9;

/// A closed area that can answer point containment.
///
/// Implemented for [`Polygon`], [`BoundingBox`], [`Circle`] and [`RasterMask`].
pub trait Region: Send + Sync {
    fn contains(&self, point: DVec2) -> bool;
}

/// A reference geometry for minimum-proximity checks.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub enum Reference {
    Point(DVec2),
    Polygon(Polygon),
    Circle(Circle),
}

impl Reference {
    /// Euclidean distance from `point` to this geometry; zero when `point` lies inside an area.
    pub fn distance_to(&self, point: DVec2) -> f64 {
        match self {
            Reference::Point(p) => p.distance(point),
            Reference::Polygon(polygon) => polygon.distance_to(point),
            Reference::Circle(circle) => circle.distance_to(point),
        }
    }
}

impl From<DVec2> for Reference {
    fn from(value: DVec2) -> Self {
        Reference::Point(value)
    }
}

impl From<Polygon> for Reference {
    fn from(value: Polygon) -> Self {
        Reference::Polygon(value)
    }
}

impl From<Circle> for Reference {
    fn from(value: Circle) -> Self {
        Reference::Circle(value)
    }
}

/// Squared distance from `p` to the segment `a`-`b`.
#[inline]
pub(crate) fn segment_distance_squared(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 == 0.0 {
        return p.distance_squared(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance_squared(a + ab * t)
}
