//! Circular regions.
use glam::DVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::Region;

/// A closed disk.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "CircleData")
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    center: DVec2,
    radius: f64,
}

/// Unchecked wire form of [`Circle`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct CircleData {
    center: DVec2,
    radius: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<CircleData> for Circle {
    type Error = Error;

    fn try_from(data: CircleData) -> Result<Self> {
        Circle::new(data.center, data.radius)
    }
}

impl Circle {
    pub fn new(center: DVec2, radius: f64) -> Result<Self> {
        if !center.is_finite() {
            return Err(Error::InvalidGeometry(format!(
                "circle center must be finite, got {center}"
            )));
        }
        if !radius.is_finite() || radius < 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "circle radius must be finite and >= 0, got {radius}"
            )));
        }
        Ok(Self { center, radius })
    }

    pub fn center(&self) -> DVec2 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn contains(&self, point: DVec2) -> bool {
        self.center.distance_squared(point) <= self.radius * self.radius
    }

    /// Distance from `point` to the disk; zero inside.
    pub fn distance_to(&self, point: DVec2) -> f64 {
        (self.center.distance(point) - self.radius).max(0.0)
    }
}

impl Region for Circle {
    fn contains(&self, point: DVec2) -> bool {
        Circle::contains(self, point)
    }
}
