//! Sequential batch driver generating one pseudo point per seed.
//!
//! A batch owns one [`AcceptedRegistry`] for its whole run and calls the sampler
//! once per seed, strictly in input order, so every call observes the points
//! accepted before it. Each call produces a [`PseudoPointRecord`], returned in the
//! [`BatchResult`] and forwarded to an optional [`EventSink`].
use std::time::Duration;

use glam::DVec2;
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::constraints::Constraints;
use crate::error::Result;
use crate::events::{BatchEvent, BatchEventKind, EventSink};
use crate::registry::AcceptedRegistry;
use crate::sampling::{PseudoPointSampler, SampleResult, SamplerConfig};

/// A seed location with the identifier of the feature it came from.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SeedPoint {
    pub id: String,
    pub position: DVec2,
}

impl SeedPoint {
    /// Accepts anything convertible to [`DVec2`], including `mint::Point2<f64>` and `[f64; 2]`.
    pub fn new(id: impl Into<String>, position: impl Into<DVec2>) -> Self {
        Self {
            id: id.into(),
            position: position.into(),
        }
    }
}

/// Final status of a seed's sampling call.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    Solved,
    MaxAttemptsReached,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Solved => "solved",
            RecordStatus::MaxAttemptsReached => "maximum iterations reached",
        }
    }
}

/// Per-seed output row: `(seed_id, seed_xy, result_xy, attempts, elapsed, status)`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PseudoPointRecord {
    pub seed_id: String,
    pub seed: DVec2,
    /// Accepted point, or the sentinel when exhausted.
    pub point: DVec2,
    pub attempts: u64,
    pub elapsed: Duration,
    pub status: RecordStatus,
}

impl PseudoPointRecord {
    pub fn from_result(seed: &SeedPoint, result: &SampleResult) -> Self {
        Self {
            seed_id: seed.id.clone(),
            seed: seed.position,
            point: result.point(),
            attempts: result.attempts,
            elapsed: result.elapsed,
            status: if result.is_accepted() {
                RecordStatus::Solved
            } else {
                RecordStatus::MaxAttemptsReached
            },
        }
    }

    pub fn is_solved(&self) -> bool {
        self.status == RecordStatus::Solved
    }

    /// Seed coordinates as `"x, y"`.
    pub fn xy_orig(&self) -> String {
        format_xy(self.seed)
    }

    /// Generated coordinates as `"x, y"`.
    pub fn xy_pseudo(&self) -> String {
        format_xy(self.point)
    }
}

/// Formats a coordinate pair as `"x, y"`.
pub fn format_xy(p: DVec2) -> String {
    format!("{}, {}", p.x, p.y)
}

/// Configuration for a batch run.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    /// Sampler settings applied to every seed.
    pub sampler: SamplerConfig,
    /// Skip seeds that themselves fall outside the region constraints.
    pub filter_seeds_by_region: bool,
}

impl BatchConfig {
    pub fn new(sampler: SamplerConfig) -> Self {
        Self {
            sampler,
            filter_seeds_by_region: false,
        }
    }

    /// Sets whether seeds outside the regions are skipped.
    pub fn with_seed_filter(mut self, filter: bool) -> Self {
        self.filter_seeds_by_region = filter;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.sampler.validate()
    }
}

/// Counts for a finished batch.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub seeds: usize,
    pub solved: usize,
    pub exhausted: usize,
    pub skipped: usize,
}

/// Result of a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    /// One record per sampled seed, in input order.
    pub records: Vec<PseudoPointRecord>,
    /// Seeds that were not sampled.
    pub skipped: Vec<SeedPoint>,
    /// Points accepted during the run, in acceptance order.
    pub registry: AcceptedRegistry,
}

impl BatchResult {
    pub fn solved(&self) -> usize {
        self.records.iter().filter(|r| r.is_solved()).count()
    }

    pub fn exhausted(&self) -> usize {
        self.records.len() - self.solved()
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            seeds: self.records.len() + self.skipped.len(),
            solved: self.solved(),
            exhausted: self.exhausted(),
            skipped: self.skipped.len(),
        }
    }
}

/// Runs the sampler over a sequence of seeds with one shared registry per run.
pub struct BatchRunner {
    /// Batch configuration applied to this runner.
    pub config: BatchConfig,
    /// Constraints applied to every seed.
    pub constraints: Constraints,
    sampler: PseudoPointSampler,
}

impl BatchRunner {
    pub fn try_new(config: BatchConfig, constraints: Constraints) -> Result<Self> {
        let sampler = PseudoPointSampler::try_new(config.sampler.clone())?;
        Ok(Self {
            config,
            constraints,
            sampler,
        })
    }

    /// Runs the batch, returning the result.
    pub fn run(&self, seeds: &[SeedPoint], rng: &mut impl RngCore) -> BatchResult {
        self.run_with_events(seeds, rng, &mut ())
    }

    pub fn run_with_events(
        &self,
        seeds: &[SeedPoint],
        rng: &mut impl RngCore,
        sink: &mut dyn EventSink,
    ) -> BatchResult {
        let mut registry = AcceptedRegistry::with_capacity(seeds.len());
        let (records, skipped) = self.run_into(seeds, &mut registry, rng, sink);
        BatchResult {
            records,
            skipped,
            registry,
        }
    }

    /// Runs the batch against an existing registry, e.g. to extend a previous run.
    pub fn run_continuing(
        &self,
        seeds: &[SeedPoint],
        registry: &mut AcceptedRegistry,
        rng: &mut impl RngCore,
        sink: &mut dyn EventSink,
    ) -> (Vec<PseudoPointRecord>, Vec<SeedPoint>) {
        self.run_into(seeds, registry, rng, sink)
    }

    fn run_into<R: RngCore>(
        &self,
        seeds: &[SeedPoint],
        registry: &mut AcceptedRegistry,
        rng: &mut R,
        sink: &mut dyn EventSink,
    ) -> (Vec<PseudoPointRecord>, Vec<SeedPoint>) {
        if sink.wants(BatchEventKind::RunStarted) {
            sink.send(BatchEvent::RunStarted {
                config: self.config.clone(),
                seed_count: seeds.len(),
            });
        }

        if seeds.is_empty() {
            warn!("Batch has no seeds.");
            if sink.wants(BatchEventKind::Warning) {
                sink.send(BatchEvent::Warning {
                    context: "batch".into(),
                    message: "Batch has no seeds".into(),
                });
            }
        }

        info!(
            "Generating pseudo-points for {} seeds | regions: {} | proximity constraints: {}.",
            seeds.len(),
            self.constraints.regions.len(),
            self.constraints.proximity.len(),
        );

        let mut records = Vec::with_capacity(seeds.len());
        let mut skipped = Vec::new();

        for (index, seed) in seeds.iter().enumerate() {
            if let Some(reason) = self.skip_reason(seed) {
                warn!("Seed '{}' skipped: {}.", seed.id, reason);
                if sink.wants(BatchEventKind::SeedSkipped) {
                    sink.send(BatchEvent::SeedSkipped {
                        index,
                        seed: seed.clone(),
                        reason: reason.into(),
                    });
                }
                skipped.push(seed.clone());
                continue;
            }

            let result =
                self.sampler
                    .sample(seed.position, &self.constraints, Some(&mut *registry), rng);
            let record = PseudoPointRecord::from_result(seed, &result);

            if record.is_solved() {
                info!(
                    "{} of {}: Point {} Coords {} Pseudo-point {} : took {} iterations, {:?}.",
                    index + 1,
                    seeds.len(),
                    record.seed_id,
                    record.xy_orig(),
                    record.xy_pseudo(),
                    record.attempts,
                    record.elapsed,
                );
                if sink.wants(BatchEventKind::PointAccepted) {
                    sink.send(BatchEvent::PointAccepted {
                        index,
                        record: record.clone(),
                    });
                }
            } else {
                warn!(
                    "{} of {}: Point {} Coords {}: {} after {:?} ({:?}).",
                    index + 1,
                    seeds.len(),
                    record.seed_id,
                    record.xy_orig(),
                    record.status.as_str(),
                    record.elapsed,
                    result.rejections,
                );
                if sink.wants(BatchEventKind::PointExhausted) {
                    sink.send(BatchEvent::PointExhausted {
                        index,
                        record: record.clone(),
                    });
                }
            }

            records.push(record);
        }

        let solved = records.iter().filter(|r| r.is_solved()).count();
        let summary = BatchSummary {
            seeds: seeds.len(),
            solved,
            exhausted: records.len() - solved,
            skipped: skipped.len(),
        };
        info!(
            "Batch finished: {} solved, {} exhausted, {} skipped.",
            summary.solved, summary.exhausted, summary.skipped
        );
        if sink.wants(BatchEventKind::RunFinished) {
            sink.send(BatchEvent::RunFinished { summary });
        }

        (records, skipped)
    }

    fn skip_reason(&self, seed: &SeedPoint) -> Option<&'static str> {
        if !seed.position.is_finite() {
            return Some("seed coordinates are not finite");
        }
        if self.config.filter_seeds_by_region && !self.constraints.regions.admits(seed.position) {
            return Some("seed lies outside the region constraints");
        }
        None
    }
}

/// Validates the configuration and runs one batch.
pub fn run_batch<R: RngCore>(
    seeds: &[SeedPoint],
    config: BatchConfig,
    constraints: Constraints,
    rng: &mut R,
) -> Result<BatchResult> {
    Ok(BatchRunner::try_new(config, constraints)?.run(seeds, rng))
}

/// Like [`run_batch`], forwarding events to `sink`.
pub fn run_batch_with_events<R: RngCore>(
    seeds: &[SeedPoint],
    config: BatchConfig,
    constraints: Constraints,
    rng: &mut R,
    sink: &mut dyn EventSink,
) -> Result<BatchResult> {
    Ok(BatchRunner::try_new(config, constraints)?.run_with_events(seeds, rng, sink))
}
