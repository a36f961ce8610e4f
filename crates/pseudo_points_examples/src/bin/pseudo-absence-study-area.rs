use glam::DVec2;
use pseudo_points::prelude::*;
use pseudo_points_examples::{init_tracing, render_batch_to_png, write_records_csv, RenderConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Study area with a lake cut out of it.
    let study_area = Polygon::new(
        vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(100.0, 0.0),
            DVec2::new(100.0, 70.0),
            DVec2::new(60.0, 100.0),
            DVec2::new(0.0, 100.0),
        ],
        vec![vec![
            DVec2::new(35.0, 35.0),
            DVec2::new(65.0, 35.0),
            DVec2::new(65.0, 60.0),
            DVec2::new(35.0, 60.0),
        ]],
    )?;

    let mut rng = StdRng::seed_from_u64(7);
    let presences: Vec<SeedPoint> = (0..60)
        .map(|i| {
            let p = DVec2::new(rng.random_range(-10.0..110.0), rng.random_range(-10.0..110.0));
            SeedPoint::new(format!("presence-{i}"), p)
        })
        .collect();
    let references: Vec<DVec2> = presences.iter().map(|s| s.position).collect();

    let config = BatchConfig::new(
        SamplerConfig::new(15.0)
            .with_min_offset(2.0)
            .with_max_attempts(5_000),
    )
    .with_seed_filter(true);

    let constraints = Constraints::new()
        .with_region(study_area)
        .with_proximity(ProximityConstraint::from_references(3.0, references.clone())?);

    let runner = BatchRunner::try_new(config, constraints)?;
    let result = runner.run(&presences, &mut rng);

    let summary = result.summary();
    tracing::info!(
        "{} seeds: {} solved, {} exhausted, {} outside the study area.",
        summary.seeds,
        summary.solved,
        summary.exhausted,
        summary.skipped
    );

    write_records_csv("pseudo-absence-study-area.csv", &result.records)?;

    let bounds = BoundingBox::new(DVec2::new(-15.0, -15.0), DVec2::new(115.0, 115.0));
    render_batch_to_png(
        "pseudo-absence-study-area.png",
        &RenderConfig::new(bounds, 800),
        &runner.constraints.regions,
        &references,
        &result,
    )?;
    Ok(())
}
