//! Event types and sinks for observing batch runs.
//!
//! This module defines [`BatchEvent`] and a set of sinks and adapters to emit,
//! collect, or forward events while executing a batch via
//! [`crate::batch::BatchRunner`] or [`crate::batch::run_batch_with_events`].
//! A sink is also the hand-off point for persisting records to an external store.
use crate::batch::{BatchConfig, BatchSummary, PseudoPointRecord, SeedPoint};

/// Describes events emitted by batch runs.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum BatchEvent {
    /// Emitted when a run starts.
    RunStarted {
        /// The batch configuration used.
        config: BatchConfig,
        /// Number of seeds handed to the run.
        seed_count: usize,
    },

    /// Emitted when a seed is not sampled at all.
    SeedSkipped {
        /// Position of the seed in the input.
        index: usize,
        /// The skipped seed.
        seed: SeedPoint,
        /// Human-readable reason.
        reason: String,
    },

    /// Emitted when a pseudo point was accepted for a seed.
    PointAccepted {
        /// Position of the seed in the input.
        index: usize,
        /// The persisted record.
        record: PseudoPointRecord,
    },

    /// Emitted when a seed ran out of attempts.
    PointExhausted {
        /// Position of the seed in the input.
        index: usize,
        /// The persisted record, carrying the sentinel point.
        record: PseudoPointRecord,
    },

    /// Emitted when the run finishes.
    RunFinished {
        /// Counts for the whole run.
        summary: BatchSummary,
    },

    /// Non-fatal warning generated during the run.
    Warning {
        /// Context string (e.g. seed id).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`BatchEvent`], used to filter what a sink receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchEventKind {
    RunStarted,
    SeedSkipped,
    PointAccepted,
    PointExhausted,
    RunFinished,
    Warning,
}

impl BatchEvent {
    pub fn kind(&self) -> BatchEventKind {
        match self {
            BatchEvent::RunStarted { .. } => BatchEventKind::RunStarted,
            BatchEvent::SeedSkipped { .. } => BatchEventKind::SeedSkipped,
            BatchEvent::PointAccepted { .. } => BatchEventKind::PointAccepted,
            BatchEvent::PointExhausted { .. } => BatchEventKind::PointExhausted,
            BatchEvent::RunFinished { .. } => BatchEventKind::RunFinished,
            BatchEvent::Warning { .. } => BatchEventKind::Warning,
        }
    }

    /// The record carried by accepted/exhausted events.
    pub fn record(&self) -> Option<&PseudoPointRecord> {
        match self {
            BatchEvent::PointAccepted { record, .. } | BatchEvent::PointExhausted { record, .. } => {
                Some(record)
            }
            _ => None,
        }
    }
}

/// Receiver of [`BatchEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: BatchEvent);

    /// Whether the sink wants events of this kind; lets the runner skip building them.
    fn wants(&self, _kind: BatchEventKind) -> bool {
        true
    }
}

/// Discards everything.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: BatchEvent) {}

    #[inline]
    fn wants(&self, _kind: BatchEventKind) -> bool {
        false
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    #[inline]
    fn send(&mut self, event: BatchEvent) {
        (**self).send(event);
    }

    #[inline]
    fn wants(&self, kind: BatchEventKind) -> bool {
        (**self).wants(kind)
    }
}

/// Forwards every event to a closure.
pub struct FnSink<F: FnMut(BatchEvent)>(pub F);

impl<F: FnMut(BatchEvent)> EventSink for FnSink<F> {
    #[inline]
    fn send(&mut self, event: BatchEvent) {
        (self.0)(event);
    }
}

/// Keeps every event in memory, in emission order.
#[derive(Debug, Default)]
pub struct CollectSink {
    events: Vec<BatchEvent>,
}

impl CollectSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[BatchEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<BatchEvent> {
        self.events
    }

    /// Records carried by accepted and exhausted events.
    pub fn records(&self) -> impl Iterator<Item = &PseudoPointRecord> {
        self.events.iter().filter_map(BatchEvent::record)
    }

    /// Number of collected events of `kind`.
    pub fn count(&self, kind: BatchEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for CollectSink {
    #[inline]
    fn send(&mut self, event: BatchEvent) {
        self.events.push(event);
    }
}

/// Sends each event to two sinks, e.g. a persistent store and a progress reporter.
pub struct TeeSink<A: EventSink, B: EventSink> {
    pub first: A,
    pub second: B,
}

impl<A: EventSink, B: EventSink> TeeSink<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    pub fn into_parts(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<A: EventSink, B: EventSink> EventSink for TeeSink<A, B> {
    fn send(&mut self, event: BatchEvent) {
        let kind = event.kind();
        match (self.first.wants(kind), self.second.wants(kind)) {
            (true, true) => {
                self.first.send(event.clone());
                self.second.send(event);
            }
            (true, false) => self.first.send(event),
            (false, true) => self.second.send(event),
            (false, false) => {}
        }
    }

    fn wants(&self, kind: BatchEventKind) -> bool {
        self.first.wants(kind) || self.second.wants(kind)
    }
}

/// Forwards only the listed event kinds to an inner sink.
pub struct FilterSink<S: EventSink> {
    inner: S,
    kinds: Vec<BatchEventKind>,
}

impl<S: EventSink> FilterSink<S> {
    pub fn new(inner: S, kinds: impl IntoIterator<Item = BatchEventKind>) -> Self {
        Self {
            inner,
            kinds: kinds.into_iter().collect(),
        }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: EventSink> EventSink for FilterSink<S> {
    fn send(&mut self, event: BatchEvent) {
        if self.wants(event.kind()) {
            self.inner.send(event);
        }
    }

    fn wants(&self, kind: BatchEventKind) -> bool {
        self.kinds.contains(&kind) && self.inner.wants(kind)
    }
}
