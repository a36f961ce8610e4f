#![allow(dead_code)]

use std::time::Duration;

use criterion::{Criterion, Throughput};
use glam::DVec2;
use pseudo_points::batch::SeedPoint;
use rand::rngs::StdRng;
use rand::SeedableRng;

const SAMPLE_SIZE: usize = 20;
const WARM_UP: Duration = Duration::from_secs(1);
const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

// Golden angle in radians.
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

/// One sampler call or one seed per element.
pub fn seeds_throughput(seeds: usize) -> Throughput {
    Throughput::Elements(seeds.max(1) as u64)
}

/// Generator keyed by bench group and parameter so runs are reproducible.
pub fn bench_rng(group: u64, param: u64) -> StdRng {
    StdRng::seed_from_u64(group ^ param.rotate_left(17))
}

/// `count` seeds on a square grid with `spacing` between neighbors.
pub fn seed_grid(count: usize, spacing: f64) -> Vec<SeedPoint> {
    let side = (count as f64).sqrt().ceil().max(1.0) as usize;
    (0..count)
        .map(|i| {
            SeedPoint::new(
                format!("s{i}"),
                [(i % side) as f64 * spacing, (i / side) as f64 * spacing],
            )
        })
        .collect()
}

/// `count` points on a sunflower spiral around the origin, roughly `spacing` apart.
pub fn spiral_points(count: usize, spacing: f64) -> Vec<DVec2> {
    (0..count)
        .map(|i| {
            let t = i as f64 * GOLDEN_ANGLE;
            DVec2::new(t.cos(), t.sin()) * (i as f64).sqrt() * spacing
        })
        .collect()
}
