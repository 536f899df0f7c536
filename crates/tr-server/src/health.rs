//! Health endpoints
//!
//! `/health/live` only proves the process answers. `/health/ready` probes
//! the storage backend and caches the verdict for a few seconds.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tr_db::Database;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    /// Serving, but without persistence
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    pub fn http_status(self) -> StatusCode {
        match self {
            Self::Healthy | Self::Degraded => StatusCode::OK,
            Self::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Outcome of probing the storage backend
#[derive(Debug, Clone, Serialize)]
pub struct StorageHealth {
    pub backend: &'static str,
    pub status: HealthStatus,
    pub message: String,
    pub probe_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_connections: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub storage: StorageHealth,
    pub checked_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct HealthConfig {
    pub probe_timeout: Duration,
    /// How long a report is reused before probing again
    pub cache_for: Duration,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_secs(5),
            cache_for: Duration::from_secs(10),
        }
    }
}

pub struct HealthChecker {
    config: HealthConfig,
    started: Instant,
    database: Option<Database>,
    last: RwLock<Option<(Instant, HealthReport)>>,
}

impl HealthChecker {
    pub fn new(config: HealthConfig) -> Self {
        Self {
            config,
            started: Instant::now(),
            database: None,
            last: RwLock::new(None),
        }
    }

    pub fn with_database(self, database: Database) -> Self {
        Self {
            database: Some(database),
            ..self
        }
    }

    pub async fn check(&self) -> HealthReport {
        if let Some((at, report)) = self.last.read().await.as_ref() {
            if at.elapsed() < self.config.cache_for {
                debug!("Reusing cached health report");
                return report.clone();
            }
        }

        let storage = match &self.database {
            Some(database) => self.probe_postgres(database).await,
            None => StorageHealth {
                backend: "memory",
                status: HealthStatus::Degraded,
                message: "In-memory storage, data is lost on restart".to_string(),
                probe_ms: 0,
                pool_size: None,
                idle_connections: None,
            },
        };

        let report = HealthReport {
            status: storage.status,
            version: env!("CARGO_PKG_VERSION"),
            uptime_seconds: self.started.elapsed().as_secs(),
            storage,
            checked_at: Utc::now(),
        };

        *self.last.write().await = Some((Instant::now(), report.clone()));
        report
    }

    async fn probe_postgres(&self, database: &Database) -> StorageHealth {
        let started = Instant::now();
        let outcome = tokio::time::timeout(self.config.probe_timeout, database.ping()).await;

        let (status, message) = match outcome {
            Ok(Ok(())) => (HealthStatus::Healthy, "Connected".to_string()),
            Ok(Err(err)) => {
                warn!(error = %err, "Database ping failed");
                (HealthStatus::Unhealthy, err.to_string())
            }
            Err(_) => {
                warn!(timeout = ?self.config.probe_timeout, "Database ping timed out");
                (HealthStatus::Unhealthy, "Ping timed out".to_string())
            }
        };
        let stats = database.stats();

        StorageHealth {
            backend: "postgresql",
            status,
            message,
            probe_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            pool_size: Some(stats.size),
            idle_connections: Some(stats.idle),
        }
    }
}

pub async fn liveness() -> &'static str {
    "OK"
}

pub async fn readiness(
    State(checker): State<Arc<HealthChecker>>,
) -> (StatusCode, Json<HealthReport>) {
    let report = checker.check().await;
    (report.status.http_status(), Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage_is_degraded_but_ready() {
        let report = HealthChecker::new(HealthConfig::default()).check().await;

        assert_eq!(report.status, HealthStatus::Degraded);
        assert_eq!(report.status.http_status(), StatusCode::OK);
        assert_eq!(report.storage.backend, "memory");
        assert!(report.storage.pool_size.is_none());
    }

    #[tokio::test]
    async fn test_report_is_cached() {
        let checker = HealthChecker::new(HealthConfig {
            cache_for: Duration::from_secs(60),
            ..Default::default()
        });

        let first = checker.check().await;
        let second = checker.check().await;
        assert_eq!(first.checked_at, second.checked_at);
    }

    #[tokio::test]
    async fn test_zero_cache_probes_again() {
        let checker = HealthChecker::new(HealthConfig {
            cache_for: Duration::ZERO,
            ..Default::default()
        });

        let first = checker.check().await;
        tokio::time::sleep(Duration::from_millis(2)).await;
        let second = checker.check().await;
        assert!(second.checked_at > first.checked_at);
    }

    #[test]
    fn test_unhealthy_is_unavailable() {
        assert_eq!(
            HealthStatus::Unhealthy.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
