//! Health endpoints, enabled with `ENABLE_HEALTH_CHECK`.
//!
//! Besides liveness they report the state of the last frontend build, so an
//! orchestrator can wait until the bundle is actually servable.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStatus {
    /// No build has run yet
    Idle,
    Building,
    Success,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub status: BuildStatus,
    pub total: u64,
    pub failures: u64,
    pub last_finished_at: Option<DateTime<Utc>>,
    pub last_duration_ms: Option<u128>,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub uptime_secs: u64,
    pub timestamp: DateTime<Utc>,
    pub build: BuildReport,
}

pub struct HealthState {
    started: Instant,
    build: RwLock<BuildReport>,
}

impl HealthState {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            build: RwLock::new(BuildReport {
                status: BuildStatus::Idle,
                total: 0,
                failures: 0,
                last_finished_at: None,
                last_duration_ms: None,
                last_error: None,
            }),
        }
    }

    pub fn build_started(&self) {
        if let Ok(mut build) = self.build.write() {
            build.status = BuildStatus::Building;
        }
    }

    pub fn build_finished(&self, result: &Result<(), String>, duration: Duration) {
        if let Ok(mut build) = self.build.write() {
            build.total += 1;
            build.last_finished_at = Some(Utc::now());
            build.last_duration_ms = Some(duration.as_millis());
            match result {
                Ok(()) => {
                    build.status = BuildStatus::Success;
                    build.last_error = None;
                }
                Err(message) => {
                    build.status = BuildStatus::Failed;
                    build.failures += 1;
                    build.last_error = Some(message.clone());
                }
            }
        }
    }

    pub fn build_report(&self) -> BuildReport {
        match self.build.read() {
            Ok(build) => build.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Ready unless the last build failed.
    pub fn is_ready(&self) -> bool {
        self.build_report().status != BuildStatus::Failed
    }

    pub fn report(&self) -> HealthReport {
        let build = self.build_report();
        HealthReport {
            status: if build.status == BuildStatus::Failed {
                "degraded"
            } else {
                "healthy"
            },
            uptime_secs: self.started.elapsed().as_secs(),
            timestamp: Utc::now(),
            build,
        }
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.health.report())
}

/// GET /health/simple
pub async fn simple() -> &'static str {
    "OK"
}

/// GET /health/ready
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let build = state.health.build_report();
    if state.health.is_ready() {
        (
            StatusCode::OK,
            Json(json!({ "ready": true, "build": build.status })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "ready": false, "build": build.status, "error": build.last_error })),
        )
    }
}

/// GET /health/live
pub async fn live() -> Json<Value> {
    Json(json!({ "status": "alive" }))
}
