//! Service container
//!
//! Builds every service once at startup and hands out shared handles, so
//! request handlers receive their collaborators explicitly instead of
//! reaching for process-wide singletons.

use std::sync::Arc;

use super::{
    health::{HealthService, ServiceStats, StatusReport},
    median::MedianService,
    metrics::ServiceMetrics,
    palindrome::PalindromeService,
};
use crate::{
    config::Limits,
    core::{AlgoResult, Readiness},
};

pub struct ServiceContainer {
    median: Arc<MedianService>,
    palindrome: Arc<PalindromeService>,
    health: Arc<HealthService>,
    metrics: Arc<ServiceMetrics>,
    readiness: Arc<Readiness>,
    limits: Limits,
}

impl ServiceContainer {
    pub fn new(limits: Limits) -> AlgoResult<Self> {
        let metrics = Arc::new(ServiceMetrics::new()?);
        let readiness = Arc::new(Readiness::new());
        Ok(Self {
            median: Arc::new(MedianService::new(metrics.clone())),
            palindrome: Arc::new(PalindromeService::new(metrics.clone())),
            health: Arc::new(HealthService::new(readiness.clone())),
            metrics,
            readiness,
            limits,
        })
    }

    pub fn median(&self) -> &MedianService {
        &self.median
    }

    pub fn palindrome(&self) -> &PalindromeService {
        &self.palindrome
    }

    pub fn health(&self) -> &HealthService {
        &self.health
    }

    pub fn metrics(&self) -> &ServiceMetrics {
        &self.metrics
    }

    pub fn readiness(&self) -> &Readiness {
        &self.readiness
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Health plus dependency states plus both services' statistics.
    pub fn status_report(&self) -> StatusReport {
        StatusReport {
            health: self.health.health_status(),
            dependencies: self.health.check_dependencies(),
            service_stats: ServiceStats {
                median: self.median.get_statistics(),
                palindrome: self.palindrome.get_statistics(),
            },
        }
    }
}
