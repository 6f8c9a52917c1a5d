//! Call statistics shared by the tracked services.
//!
//! A [`StatsTracker`] keeps its counters behind one mutex so that a
//! `record` (increment + add) and a `reset` never interleave. Averages are
//! derived on read and never stored.

use std::{
    sync::{Mutex, MutexGuard},
    time::Instant,
};

/// Domain-specific counters accumulated alongside call count and latency.
pub trait Accumulate: Default + Clone + Send {
    fn accumulate(&mut self, other: &Self);
}

/// No extra counters.
impl Accumulate for () {
    fn accumulate(&mut self, _other: &Self) {}
}

/// Extra counters kept by the palindrome service.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PairCounters {
    pub pairs_found: u64,
    pub words_processed: u64,
}

impl Accumulate for PairCounters {
    fn accumulate(&mut self, other: &Self) {
        self.pairs_found += other.pairs_found;
        self.words_processed += other.words_processed;
    }
}

/// Point-in-time copy of a tracker's counters.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StatsSnapshot<X> {
    pub total_calls: u64,
    pub total_execution_time_ms: f64,
    pub extra: X,
}

impl<X> StatsSnapshot<X> {
    pub fn average_execution_time_ms(&self) -> f64 {
        self.per_call(self.total_execution_time_ms)
    }

    /// `total / total_calls`, or 0 when nothing has been recorded.
    pub fn per_call(&self, total: f64) -> f64 {
        if self.total_calls > 0 {
            total / self.total_calls as f64
        } else {
            0.0
        }
    }
}

#[derive(Debug, Default)]
pub struct StatsTracker<X> {
    inner: Mutex<StatsSnapshot<X>>,
}

impl<X: Accumulate> StatsTracker<X> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StatsSnapshot::default()),
        }
    }

    pub fn record(&self, duration_ms: f64, extra: X) {
        let mut guard = self.lock();
        guard.total_calls += 1;
        guard.total_execution_time_ms += duration_ms;
        guard.extra.accumulate(&extra);
    }

    pub fn snapshot(&self) -> StatsSnapshot<X> {
        self.lock().clone()
    }

    pub fn reset(&self) {
        *self.lock() = StatsSnapshot::default();
    }

    // A panic while holding the lock cannot leave the counters half-updated,
    // so a poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, StatsSnapshot<X>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Monotonic stopwatch reporting milliseconds.
pub struct Stopwatch(Instant);

impl Stopwatch {
    pub fn start() -> Self {
        Self(Instant::now())
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.0.elapsed().as_secs_f64() * 1000.0
    }
}

/// Rounds to `places` decimal places for reporting.
/// Values too large to scale are returned unchanged.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}
