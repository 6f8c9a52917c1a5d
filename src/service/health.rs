use std::{collections::BTreeMap, sync::Arc, time::Instant};

use chrono::{SecondsFormat, Utc};
use log::{error, info};
use serde::Serialize;

use super::{
    dto::{MedianServiceStatistics, PalindromeServiceStatistics},
    stats::round_to,
};
use crate::{
    core::{AlgoError, AlgoResult, Readiness},
    engine::median::find_median_sorted,
};

const READY_STATES: &[&str] = &["available", "active", "loaded"];

#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub timestamp: String,
    pub version: &'static str,
    pub uptime_seconds: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    #[serde(flatten)]
    pub health: HealthStatus,
    pub dependencies: BTreeMap<&'static str, &'static str>,
    pub service_stats: ServiceStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceStats {
    pub median: MedianServiceStatistics,
    pub palindrome: PalindromeServiceStatistics,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProbeResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<BTreeMap<&'static str, &'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Health, readiness and liveness checks.
pub struct HealthService {
    started: Instant,
    readiness: Arc<Readiness>,
}

impl HealthService {
    pub fn new(readiness: Arc<Readiness>) -> Self {
        info!("HealthService initialized");
        Self {
            started: Instant::now(),
            readiness,
        }
    }

    pub fn health_status(&self) -> HealthStatus {
        HealthStatus {
            status: "healthy",
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            version: env!("CARGO_PKG_VERSION"),
            uptime_seconds: round_to(self.started.elapsed().as_secs_f64(), 1),
        }
    }

    pub fn check_dependencies(&self) -> BTreeMap<&'static str, &'static str> {
        let configuration = if self.readiness.is_ready() {
            "loaded"
        } else {
            "loading"
        };
        BTreeMap::from([
            ("array_operations_util", "available"),
            ("palindrome_operations_util", "available"),
            ("logging_system", "active"),
            ("configuration", configuration),
        ])
    }

    /// `Ok` when every dependency reports a ready state.
    pub fn readiness(&self) -> Result<ProbeResponse, ProbeResponse> {
        let dependencies = self.check_dependencies();
        if dependencies.values().all(|s| READY_STATES.contains(s)) {
            Ok(ProbeResponse {
                status: "ready",
                dependencies: None,
                error: None,
            })
        } else {
            Err(ProbeResponse {
                status: "not_ready",
                dependencies: Some(dependencies),
                error: None,
            })
        }
    }

    /// Runs a known median through the engine.
    pub fn liveness(&self) -> Result<ProbeResponse, ProbeResponse> {
        match self_test() {
            Ok(()) => Ok(ProbeResponse {
                status: "alive",
                dependencies: None,
                error: None,
            }),
            Err(e) => {
                error!("Liveness check failed: {e}");
                Err(ProbeResponse {
                    status: "not_alive",
                    dependencies: None,
                    error: Some(e.message()),
                })
            }
        }
    }
}

/// Basic functionality test, also run once before the server starts.
pub fn self_test() -> AlgoResult<()> {
    let median = find_median_sorted(&[1.0, 2.0], &[3.0, 4.0])?;
    if median == 2.5 {
        Ok(())
    } else {
        Err(AlgoError::Internal(
            "Basic functionality test failed".to_string(),
        ))
    }
}
