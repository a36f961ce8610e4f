//! Polygons with holes and axis-aligned bounding boxes.
use glam::DVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{segment_distance_squared, Region, BOUNDARY_EPSILON};

/// Axis-aligned rectangle, inclusive on all edges.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: DVec2,
    pub max: DVec2,
}

impl BoundingBox {
    /// Create a box spanning the two corners in any order.
    pub fn new(a: DVec2, b: DVec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = DVec2>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Some(Self { min, max })
    }

    pub fn contains(&self, point: DVec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Distance from `point` to the box; zero inside.
    pub fn distance_to(&self, point: DVec2) -> f64 {
        let dx = (self.min.x - point.x).max(0.0).max(point.x - self.max.x);
        let dy = (self.min.y - point.y).max(0.0).max(point.y - self.max.y);
        DVec2::new(dx, dy).length()
    }

    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    /// Grow the box by `margin` on every side.
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            min: self.min - DVec2::splat(margin),
            max: self.max + DVec2::splat(margin),
        }
    }
}

impl Region for BoundingBox {
    fn contains(&self, point: DVec2) -> bool {
        BoundingBox::contains(self, point)
    }
}

/// A simple polygon with optional holes.
///
/// Rings are stored open (the closing vertex is dropped if supplied). Containment
/// uses the even-odd rule; points on any ring edge count as inside the polygon.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "PolygonData")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    exterior: Vec<DVec2>,
    holes: Vec<Vec<DVec2>>,
    #[cfg_attr(feature = "serde", serde(skip_serializing))]
    bounds: BoundingBox,
}

/// Wire form of [`Polygon`]; bounds are always recomputed from the rings.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct PolygonData {
    exterior: Vec<DVec2>,
    #[serde(default)]
    holes: Vec<Vec<DVec2>>,
}

#[cfg(feature = "serde")]
impl TryFrom<PolygonData> for Polygon {
    type Error = Error;

    fn try_from(data: PolygonData) -> Result<Self> {
        Polygon::new(data.exterior, data.holes)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RingPosition {
    Inside,
    Boundary,
    Outside,
}

impl Polygon {
    /// Create a polygon from an exterior ring and zero or more hole rings.
    pub fn new(exterior: Vec<DVec2>, holes: Vec<Vec<DVec2>>) -> Result<Self> {
        let exterior = normalize_ring(exterior, "exterior")?;
        let holes = holes
            .into_iter()
            .enumerate()
            .map(|(i, ring)| normalize_ring(ring, &format!("hole {i}")))
            .collect::<Result<Vec<_>>>()?;
        let bounds = BoundingBox::from_points(exterior.iter().copied())
            .ok_or_else(|| Error::InvalidGeometry("exterior ring is empty".into()))?;

        Ok(Self {
            exterior,
            holes,
            bounds,
        })
    }

    /// Create a polygon without holes.
    pub fn from_exterior(exterior: Vec<DVec2>) -> Result<Self> {
        Self::new(exterior, Vec::new())
    }

    /// Axis-aligned rectangle as a polygon.
    pub fn rectangle(a: DVec2, b: DVec2) -> Self {
        let bounds = BoundingBox::new(a, b);
        Self {
            exterior: vec![
                bounds.min,
                DVec2::new(bounds.max.x, bounds.min.y),
                bounds.max,
                DVec2::new(bounds.min.x, bounds.max.y),
            ],
            holes: Vec::new(),
            bounds,
        }
    }

    pub fn exterior(&self) -> &[DVec2] {
        &self.exterior
    }

    pub fn holes(&self) -> &[Vec<DVec2>] {
        &self.holes
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bounds
    }

    /// Planar area of the exterior minus the holes.
    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(|h| ring_area(h)).sum();
        (ring_area(&self.exterior) - holes).max(0.0)
    }

    pub fn contains(&self, point: DVec2) -> bool {
        if !self.bounds.contains(point) {
            return false;
        }

        match ring_position(&self.exterior, point) {
            RingPosition::Outside => false,
            RingPosition::Boundary => true,
            RingPosition::Inside => {
                for hole in &self.holes {
                    match ring_position(hole, point) {
                        RingPosition::Inside => return false,
                        RingPosition::Boundary => return true,
                        RingPosition::Outside => {}
                    }
                }
                true
            }
        }
    }

    /// Distance from `point` to the polygon; zero inside or on the boundary.
    pub fn distance_to(&self, point: DVec2) -> f64 {
        if self.contains(point) {
            return 0.0;
        }

        std::iter::once(&self.exterior)
            .chain(self.holes.iter())
            .flat_map(|ring| ring_edges(ring))
            .map(|(a, b)| segment_distance_squared(point, a, b))
            .fold(f64::INFINITY, f64::min)
            .sqrt()
    }
}

impl Region for Polygon {
    fn contains(&self, point: DVec2) -> bool {
        Polygon::contains(self, point)
    }
}

fn normalize_ring(mut ring: Vec<DVec2>, name: &str) -> Result<Vec<DVec2>> {
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    if ring.len() < 3 {
        return Err(Error::InvalidGeometry(format!(
            "{name} ring needs at least 3 distinct vertices, got {}",
            ring.len()
        )));
    }
    if let Some(bad) = ring.iter().find(|p| !p.is_finite()) {
        return Err(Error::InvalidGeometry(format!(
            "{name} ring has non-finite vertex {bad}"
        )));
    }
    Ok(ring)
}

fn ring_edges(ring: &[DVec2]) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
    let n = ring.len();
    (0..n).map(move |i| (ring[i], ring[(i + 1) % n]))
}

fn ring_position(ring: &[DVec2], point: DVec2) -> RingPosition {
    let eps2 = BOUNDARY_EPSILON * BOUNDARY_EPSILON;
    let mut inside = false;

    for (a, b) in ring_edges(ring) {
        if segment_distance_squared(point, a, b) <= eps2 {
            return RingPosition::Boundary;
        }
        if (a.y > point.y) != (b.y > point.y) {
            let x = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if point.x < x {
                inside = !inside;
            }
        }
    }

    if inside {
        RingPosition::Inside
    } else {
        RingPosition::Outside
    }
}

fn ring_area(ring: &[DVec2]) -> f64 {
    let twice: f64 = ring_edges(ring).map(|(a, b)| a.perp_dot(b)).sum();
    (twice * 0.5).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(min: f64, max: f64) -> Vec<DVec2> {
        vec![
            DVec2::new(min, min),
            DVec2::new(max, min),
            DVec2::new(max, max),
            DVec2::new(min, max),
        ]
    }

    #[test]
    fn closing_vertex_is_dropped() {
        let mut ring = square(0.0, 1.0);
        ring.push(ring[0]);
        let poly = Polygon::from_exterior(ring).expect("valid polygon");
        assert_eq!(poly.exterior().len(), 4);
    }

    #[test]
    fn rejects_degenerate_and_non_finite_rings() {
        let two = vec![DVec2::ZERO, DVec2::X];
        assert!(matches!(
            Polygon::from_exterior(two),
            Err(Error::InvalidGeometry(_))
        ));

        let nan = vec![DVec2::ZERO, DVec2::X, DVec2::new(f64::NAN, 1.0)];
        assert!(matches!(
            Polygon::from_exterior(nan),
            Err(Error::InvalidGeometry(_))
        ));

        let bad_hole = Polygon::new(square(0.0, 10.0), vec![vec![DVec2::ONE]]);
        assert!(matches!(bad_hole, Err(Error::InvalidGeometry(msg)) if msg.contains("hole 0")));
    }

    #[test]
    fn contains_interior_and_boundary_but_not_exterior() {
        let poly = Polygon::from_exterior(square(0.0, 10.0)).expect("valid polygon");
        assert!(poly.contains(DVec2::new(5.0, 5.0)));
        assert!(poly.contains(DVec2::new(0.0, 5.0)));
        assert!(poly.contains(DVec2::new(10.0, 10.0)));
        assert!(!poly.contains(DVec2::new(10.5, 5.0)));
        assert!(!poly.contains(DVec2::new(-1.0, -1.0)));
    }

    #[test]
    fn holes_are_excluded() {
        let poly = Polygon::new(square(0.0, 10.0), vec![square(4.0, 6.0)]).expect("valid polygon");
        assert!(!poly.contains(DVec2::new(5.0, 5.0)));
        assert!(poly.contains(DVec2::new(4.0, 5.0)));
        assert!(poly.contains(DVec2::new(2.0, 2.0)));
        assert!((poly.area() - 96.0).abs() < 1e-12);
    }

    #[test]
    fn concave_polygon_uses_even_odd_rule() {
        // U shape opening upwards
        let poly = Polygon::from_exterior(vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(6.0, 0.0),
            DVec2::new(6.0, 6.0),
            DVec2::new(4.0, 6.0),
            DVec2::new(4.0, 2.0),
            DVec2::new(2.0, 2.0),
            DVec2::new(2.0, 6.0),
            DVec2::new(0.0, 6.0),
        ])
        .expect("valid polygon");
        assert!(poly.contains(DVec2::new(1.0, 5.0)));
        assert!(poly.contains(DVec2::new(5.0, 5.0)));
        assert!(!poly.contains(DVec2::new(3.0, 5.0)));
        assert!(poly.contains(DVec2::new(3.0, 1.0)));
    }

    #[test]
    fn distance_is_zero_inside_and_edge_distance_outside() {
        let poly = Polygon::new(square(0.0, 10.0), vec![square(4.0, 6.0)]).expect("valid polygon");
        assert_eq!(poly.distance_to(DVec2::new(1.0, 1.0)), 0.0);
        assert!((poly.distance_to(DVec2::new(13.0, 14.0)) - 5.0).abs() < 1e-12);
        assert!((poly.distance_to(DVec2::new(5.0, 5.0)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn bounding_box_helpers() {
        let bb = BoundingBox::new(DVec2::new(4.0, -1.0), DVec2::new(-2.0, 3.0));
        assert_eq!(bb.min, DVec2::new(-2.0, -1.0));
        assert_eq!(bb.size(), DVec2::new(6.0, 4.0));
        assert_eq!(bb.center(), DVec2::new(1.0, 1.0));
        assert!(bb.contains(DVec2::new(4.0, 3.0)));
        assert_eq!(bb.distance_to(DVec2::new(7.0, 7.0)), 5.0);
        assert_eq!(bb.expanded(1.0).min, DVec2::new(-3.0, -2.0));
        assert!(BoundingBox::from_points(Vec::new()).is_none());
    }

    #[test]
    fn rectangle_matches_bounding_box() {
        let rect = Polygon::rectangle(DVec2::new(10.0, 10.0), DVec2::new(0.0, 0.0));
        assert_eq!(rect.bounding_box().min, DVec2::ZERO);
        assert!((rect.area() - 100.0).abs() < 1e-12);
        assert!(rect.contains(DVec2::new(9.0, 1.0)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_recomputes_bounds_and_validates_rings() {
        let json = r#"{"exterior":[[0.0,0.0],[4.0,0.0],[4.0,4.0],[0.0,4.0]],
                       "bounds":{"min":[0.0,0.0],"max":[1.0,1.0]}}"#;
        let poly: Polygon = serde_json::from_str(json).expect("valid polygon");
        assert_eq!(poly.bounding_box().max, DVec2::new(4.0, 4.0));
        assert!(poly.contains(DVec2::new(3.0, 3.0)));

        let degenerate = r#"{"exterior":[[0.0,0.0],[1.0,0.0]]}"#;
        assert!(serde_json::from_str::<Polygon>(degenerate).is_err());

        let round_trip = serde_json::to_string(&poly).expect("serializable");
        assert!(!round_trip.contains("bounds"));
        assert_eq!(serde_json::from_str::<Polygon>(&round_trip).expect("valid polygon"), poly);
    }
}
