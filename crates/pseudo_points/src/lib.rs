#![forbid(unsafe_code)]
//! pseudo_points: Constrained pseudo-point generation around seed locations.
//!
//! Modules:
//! - geometry: polygons, circles, bounding boxes and raster masks used as constraints
//! - constraints: region containment and minimum-proximity rules
//! - sampling: bounded rejection sampler drawing one point per seed
//! - registry: accepted points shared across the calls of a batch
//! - batch: sequential driver producing one record per seed, with events
//!
//! For examples and docs, see README and the `pseudo_points_examples` crate.
pub mod batch;
pub mod constraints;
pub mod error;
pub mod events;
pub mod geometry;
pub mod registry;
pub mod sampling;

/// Convenient re-exports for common types. Import with `use pseudo_points::prelude::*;`.
pub mod prelude {
    pub use crate::batch::{
        format_xy, run_batch, run_batch_with_events, BatchConfig, BatchResult, BatchRunner,
        BatchSummary, PseudoPointRecord, RecordStatus, SeedPoint,
    };
    pub use crate::constraints::{
        Constraints, ProximityConstraint, ProximitySource, RegionConstraints, RegionPolicy,
    };
    pub use crate::error::{Error, Result};
    pub use crate::events::{
        BatchEvent, BatchEventKind, CollectSink, EventSink, FilterSink, FnSink, TeeSink,
    };
    pub use crate::geometry::{BoundingBox, Circle, Polygon, RasterMask, Reference, Region};
    pub use crate::registry::AcceptedRegistry;
    pub use crate::sampling::{
        sample, PseudoPointSampler, Rejection, RejectionStats, SampleOutcome, SampleResult,
        SamplerConfig, DEFAULT_MAX_ATTEMPTS, SENTINEL_POINT,
    };
}
