//! Registry of accepted points shared across the calls of one batch.
//!
//! The registry is append-only from the outside: only the sampler adds points, and
//! only after a candidate has passed every constraint of its call. Passing it by
//! `&mut` keeps calls against the same registry strictly sequential.
use glam::DVec2;

/// Ordered, append-only record of previously accepted points.
#[derive(Clone, Debug, Default)]
pub struct AcceptedRegistry {
    points: Vec<DVec2>,
}

impl AcceptedRegistry {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            points: Vec::with_capacity(cap),
        }
    }

    pub(crate) fn push(&mut self, point: DVec2) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Accepted points in acceptance order.
    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &DVec2> {
        self.points.iter()
    }

    pub fn last(&self) -> Option<DVec2> {
        self.points.last().copied()
    }

    /// Distance from `point` to the nearest accepted point, `None` if empty.
    pub fn min_distance_to(&self, point: DVec2) -> Option<f64> {
        self.points
            .iter()
            .map(|p| p.distance_squared(point))
            .min_by(f64::total_cmp)
            .map(f64::sqrt)
    }

    /// Whether any accepted point lies strictly closer than `distance` to `point`.
    pub fn any_within(&self, point: DVec2, distance: f64) -> bool {
        let d2 = distance * distance;
        self.points.iter().any(|p| p.distance_squared(point) < d2)
    }

    /// Forget all accepted points, e.g. before reusing the registry for another batch.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn into_inner(self) -> Vec<DVec2> {
        self.points
    }
}
