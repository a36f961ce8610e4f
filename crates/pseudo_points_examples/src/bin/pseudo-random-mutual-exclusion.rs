use glam::DVec2;
use pseudo_points::prelude::*;
use pseudo_points_examples::{init_tracing, render_batch_to_png, write_records_csv, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Habitat mask of 2-unit cells: every other 20-unit vertical band is usable.
    let (width, height) = (50, 50);
    let cells: Vec<bool> = (0..height)
        .flat_map(|_| (0..width).map(|x| (x / 10) % 2 == 0))
        .collect();
    let habitat = RasterMask::from_cells(DVec2::ZERO, 2.0, width, height, cells)?;
    let reserve = Circle::new(DVec2::new(50.0, 50.0), 48.0)?;

    let seeds: Vec<SeedPoint> = (0..12)
        .flat_map(|j| (0..12).map(move |i| (i, j)))
        .map(|(i, j)| {
            SeedPoint::new(
                format!("cell-{i}-{j}"),
                [8.0 * i as f64 + 6.0, 8.0 * j as f64 + 6.0],
            )
        })
        .collect();

    let config = BatchConfig::new(SamplerConfig::new(12.0).with_max_attempts(2_000));
    let constraints = Constraints::new()
        .with_region(habitat)
        .with_region(reserve)
        .with_proximity(ProximityConstraint::from_registry(4.0)?);

    let runner = BatchRunner::try_new(config, constraints)?;
    let mut rng = StdRng::seed_from_u64(42);

    let mut exhausted = Vec::new();
    let mut sink = TeeSink::new(
        FilterSink::new(
            FnSink(|event: BatchEvent| {
                if let Some(record) = event.record() {
                    exhausted.push(record.seed_id.clone());
                }
            }),
            [BatchEventKind::PointExhausted],
        ),
        FilterSink::new(CollectSink::new(), [BatchEventKind::RunFinished]),
    );
    let mut result = runner.run_with_events(&seeds, &mut rng, &mut sink);
    let (_, finished) = sink.into_parts();
    if let Some(BatchEvent::RunFinished { summary }) = finished.into_inner().events().first() {
        tracing::info!("First pass: {summary:?}.");
    }

    // Second pass over the same seeds, keeping clear of everything accepted so far.
    let (records, _) = runner.run_continuing(&seeds, &mut result.registry, &mut rng, &mut ());
    result.records.extend(records);

    tracing::info!(
        "{} points accepted over two passes; {} seeds exhausted in the first pass.",
        result.registry.len(),
        exhausted.len()
    );

    write_records_csv("pseudo-random-mutual-exclusion.csv", &result.records)?;

    let bounds = BoundingBox::new(DVec2::ZERO, DVec2::new(100.0, 100.0));
    render_batch_to_png(
        "pseudo-random-mutual-exclusion.png",
        &RenderConfig::new(bounds, 800),
        &runner.constraints.regions,
        &[],
        &result,
    )?;
    Ok(())
}
