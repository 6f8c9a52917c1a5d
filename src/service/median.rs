use std::sync::Arc;

use log::{error, info, warn};

use super::{
    dto::{MedianRequest, MedianResponse, MedianServiceStatistics},
    metrics::ServiceMetrics,
    stats::{round_to, StatsTracker, Stopwatch},
};
use crate::{
    core::{AlgoError, AlgoResult},
    engine::median::find_median_sorted,
};

pub const SERVICE_NAME: &str = "median";

/// Tracked wrapper around the median engine.
///
/// Only successful calls reach the statistics; a rejected input leaves the
/// counters untouched.
pub struct MedianService {
    stats: StatsTracker<()>,
    metrics: Arc<ServiceMetrics>,
}

impl MedianService {
    pub fn new(metrics: Arc<ServiceMetrics>) -> Self {
        info!("MedianService initialized");
        Self {
            stats: StatsTracker::new(),
            metrics,
        }
    }

    pub fn calculate_median(&self, request: &MedianRequest) -> AlgoResult<MedianResponse> {
        let (size1, size2) = (request.nums1.len(), request.nums2.len());
        info!("Starting median calculation for arrays of size {size1} and {size2}");

        let stopwatch = Stopwatch::start();
        let median = match find_median_sorted(&request.nums1, &request.nums2) {
            Ok(median) => median,
            Err(e) => {
                error!("Array operation error during median calculation: {e}");
                self.metrics.observe_error(SERVICE_NAME);
                return Err(e);
            }
        };
        let elapsed_ms = stopwatch.elapsed_ms();

        self.stats.record(elapsed_ms, ());
        self.metrics.observe_success(SERVICE_NAME, elapsed_ms);

        info!(
            "Median calculation completed successfully. Result: {median}, Execution time: {elapsed_ms:.3}ms"
        );

        Ok(MedianResponse {
            median,
            array1_size: size1,
            array2_size: size2,
            total_elements: size1 + size2,
            execution_time_ms: round_to(elapsed_ms, 3),
        })
    }

    /// Counts a request rejected before it reached the engine.
    pub fn reject(&self, err: AlgoError) -> AlgoError {
        warn!("Median request rejected: {err}");
        self.metrics.observe_error(SERVICE_NAME);
        err
    }

    pub fn get_statistics(&self) -> MedianServiceStatistics {
        let snap = self.stats.snapshot();
        MedianServiceStatistics {
            total_calls: snap.total_calls,
            total_execution_time_ms: round_to(snap.total_execution_time_ms, 3),
            average_execution_time_ms: round_to(snap.average_execution_time_ms(), 3),
            service_status: "active",
        }
    }

    pub fn reset_statistics(&self) {
        self.stats.reset();
        info!("Median service statistics reset");
    }
}
