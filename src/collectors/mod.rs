//! Source collectors.
//!
//! One collector per data source. Each fetches (or mocks) the metrics
//! for a period and settles with either a [`SourceResult`] or a
//! [`CollectError`]. Collectors are independent of each other.

pub mod mock;
pub mod sources;

use crate::config::CollectorsConfig;
use crate::models::{Period, SourceResult};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

pub use mock::MockCollector;
pub use sources::SourceId;

/// A collector failed to produce a result.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{source_name}: {message}")]
pub struct CollectError {
    pub source_name: String,
    pub message: String,
}

impl CollectError {
    pub fn new(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}

/// A data source that can be asked for the metrics of a period.
pub trait Collector: Send + Sync {
    /// Human-readable source name, used in error entries.
    fn name(&self) -> &str;

    /// Fetch metrics for `period`.
    fn fetch<'a>(&'a self, period: &'a Period) -> BoxFuture<'a, Result<SourceResult, CollectError>>;
}

/// Serves a pre-fetched `SourceResult` stored as JSON on disk.
pub struct FixtureCollector {
    source: SourceId,
    path: PathBuf,
}

impl FixtureCollector {
    pub fn new(source: SourceId, path: PathBuf) -> Self {
        Self { source, path }
    }
}

impl Collector for FixtureCollector {
    fn name(&self) -> &str {
        self.source.label()
    }

    fn fetch<'a>(&'a self, _period: &'a Period) -> BoxFuture<'a, Result<SourceResult, CollectError>> {
        async move {
            info!("Loading {} from {}", self.name(), self.path.display());
            let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
                CollectError::new(
                    self.name(),
                    format!("failed to read {}: {}", self.path.display(), e),
                )
            })?;
            serde_json::from_str(&content).map_err(|e| {
                CollectError::new(
                    self.name(),
                    format!("invalid fixture {}: {}", self.path.display(), e),
                )
            })
        }
        .boxed()
    }
}

/// Always fails. Stands in for a source that is down.
pub struct FailingCollector {
    source: SourceId,
    message: String,
}

impl FailingCollector {
    pub fn new(source: SourceId, message: impl Into<String>) -> Self {
        Self {
            source,
            message: message.into(),
        }
    }
}

impl Collector for FailingCollector {
    fn name(&self) -> &str {
        self.source.label()
    }

    fn fetch<'a>(&'a self, _period: &'a Period) -> BoxFuture<'a, Result<SourceResult, CollectError>> {
        let err = CollectError::new(self.name(), self.message.clone());
        async move { Err(err) }.boxed()
    }
}

/// Bounds how long the wrapped collector may take before it counts as failed.
pub struct Timeout<C> {
    inner: C,
    limit: Duration,
}

impl<C: Collector> Timeout<C> {
    pub fn new(inner: C, limit: Duration) -> Self {
        Self { inner, limit }
    }
}

impl<C: Collector> Collector for Timeout<C> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn fetch<'a>(&'a self, period: &'a Period) -> BoxFuture<'a, Result<SourceResult, CollectError>> {
        async move {
            match tokio::time::timeout(self.limit, self.inner.fetch(period)).await {
                Ok(result) => result,
                Err(_) => Err(CollectError::new(
                    self.inner.name(),
                    format!("timed out after {}s", self.limit.as_secs_f64()),
                )),
            }
        }
        .boxed()
    }
}

/// Build the configured collectors, each wrapped in the configured timeout.
///
/// Precedence per source: simulated failure, then a fixture file in
/// `fixtures_dir`, then the built-in mock data.
pub fn build_collectors(config: &CollectorsConfig) -> Vec<Box<dyn Collector>> {
    let limit = Duration::from_secs(config.timeout_seconds);

    config
        .sources
        .iter()
        .map(|&source| -> Box<dyn Collector> {
            if config.simulate_failures.contains(&source) {
                debug!("{} configured to fail", source.label());
                return Box::new(Timeout::new(
                    FailingCollector::new(source, "simulated outage"),
                    limit,
                ));
            }

            if let Some(path) = fixture_path(config.fixtures_dir.as_deref(), source) {
                return Box::new(Timeout::new(FixtureCollector::new(source, path), limit));
            }

            Box::new(Timeout::new(MockCollector::new(source), limit))
        })
        .collect()
}

fn fixture_path(dir: Option<&Path>, source: SourceId) -> Option<PathBuf> {
    let path = dir?.join(format!("{}.json", source.key()));
    path.exists().then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn period() -> Period {
        Period::ending_at(Utc.with_ymd_and_hms(2026, 10, 14, 9, 0, 0).unwrap(), 1)
    }

    struct Stalled;

    impl Collector for Stalled {
        fn name(&self) -> &str {
            "Stalled"
        }

        fn fetch<'a>(&'a self, _period: &'a Period) -> BoxFuture<'a, Result<SourceResult, CollectError>> {
            futures::future::pending().boxed()
        }
    }

    #[tokio::test]
    async fn test_timeout_converts_stall_into_failure() {
        let collector = Timeout::new(Stalled, Duration::from_millis(20));
        let err = collector.fetch(&period()).await.unwrap_err();
        assert_eq!(err.source_name, "Stalled");
        assert!(err.message.contains("timed out"));
    }

    #[test]
    fn test_failing_collector_reports_source() {
        let collector = FailingCollector::new(SourceId::Twitter, "rate limited");
        let err = tokio_test::block_on(collector.fetch(&period())).unwrap_err();
        assert_eq!(err.to_string(), "Twitter: rate limited");
    }

    #[tokio::test]
    async fn test_fixture_collector_reads_prefetched_result() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("linkedin.json");
        std::fs::write(
            &path,
            r#"{"kind":"engagement","platform":"linkedin","metrics":{"engagements":42,"engagementRate":3.0}}"#,
        )
        .unwrap();

        let collector = FixtureCollector::new(SourceId::LinkedIn, path);
        match collector.fetch(&period()).await.unwrap() {
            SourceResult::Engagement { metrics, .. } => assert_eq!(metrics.engagements, 42),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fixture_collector_rejects_bad_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("facebook.json");
        std::fs::write(&path, "not json").unwrap();

        let err = FixtureCollector::new(SourceId::Facebook, path)
            .fetch(&period())
            .await
            .unwrap_err();
        assert!(err.message.contains("invalid fixture"));
    }

    #[test]
    fn test_build_collectors_prefers_simulated_failure_then_fixture() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("twitter.json"), "{}").unwrap();

        let config = CollectorsConfig {
            timeout_seconds: 5,
            sources: vec![SourceId::Twitter, SourceId::Facebook],
            fixtures_dir: Some(dir.path().to_path_buf()),
            simulate_failures: vec![SourceId::Facebook],
        };

        let collectors = build_collectors(&config);
        assert_eq!(collectors.len(), 2);
        assert_eq!(collectors[0].name(), "Twitter");

        let err = tokio_test::block_on(collectors[1].fetch(&period())).unwrap_err();
        assert_eq!(err.message, "simulated outage");
    }
}
