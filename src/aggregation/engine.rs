//! Settle-all aggregation over the registered collectors.
//!
//! Every collector is polled concurrently with the same period. The engine
//! waits for all of them to settle, then merges successes into the dataset
//! and records each failure as an error entry. One source failing never
//! prevents the others from being merged, and a cycle where every source
//! fails still yields a valid (zero-valued) dataset.

use crate::collectors::Collector;
use crate::models::{AggregatedDataset, Period, SourceError};
use futures::future::join_all;
use tracing::{info, warn};

/// Runs all registered collectors and merges their results.
pub struct AggregationEngine {
    collectors: Vec<Box<dyn Collector>>,
}

impl AggregationEngine {
    pub fn new(collectors: Vec<Box<dyn Collector>>) -> Self {
        Self { collectors }
    }

    /// Collect every source for `period`.
    pub async fn collect(&self, period: Period) -> AggregatedDataset {
        info!(
            "Collecting data from {} to {} ({} sources)",
            period.start.to_rfc3339(),
            period.end.to_rfc3339(),
            self.collectors.len()
        );

        let outcomes = join_all(self.collectors.iter().map(|c| c.fetch(&period))).await;

        let mut dataset = AggregatedDataset::empty(period);
        for (collector, outcome) in self.collectors.iter().zip(outcomes) {
            match outcome {
                Ok(result) => dataset.merge(result),
                Err(e) => {
                    warn!("{} collection failed: {}", collector.name(), e.message);
                    dataset.errors.push(SourceError {
                        source: e.source_name,
                        error: e.message,
                    });
                }
            }
        }

        info!(
            "Collected {} of {} sources",
            self.collectors.len() - dataset.errors.len(),
            self.collectors.len()
        );

        dataset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::{CollectError, FailingCollector, MockCollector, SourceId};
    use crate::models::{Platform, SourceResult};
    use chrono::{TimeZone, Utc};
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use std::time::Duration;

    fn period() -> Period {
        Period::ending_at(Utc.with_ymd_and_hms(2026, 10, 14, 9, 0, 0).unwrap(), 7)
    }

    /// Settles after a delay, so completion order differs from registration order.
    struct Slow(SourceId, u64);

    impl Collector for Slow {
        fn name(&self) -> &str {
            self.0.label()
        }

        fn fetch<'a>(&'a self, _period: &'a Period) -> BoxFuture<'a, Result<SourceResult, CollectError>> {
            async move {
                tokio::time::sleep(Duration::from_millis(self.1)).await;
                Ok(crate::collectors::mock::mock_result(self.0))
            }
            .boxed()
        }
    }

    fn engine_with_failures(failing: &[SourceId]) -> AggregationEngine {
        let collectors = SourceId::ALL
            .into_iter()
            .map(|source| -> Box<dyn Collector> {
                if failing.contains(&source) {
                    Box::new(FailingCollector::new(source, "unavailable"))
                } else {
                    Box::new(MockCollector::new(source))
                }
            })
            .collect();
        AggregationEngine::new(collectors)
    }

    #[tokio::test]
    async fn test_all_sources_succeed() {
        let dataset = engine_with_failures(&[]).collect(period()).await;

        assert!(dataset.errors.is_empty());
        assert_eq!(dataset.engagement.len(), 3);
        assert_eq!(dataset.referrals.total_clicks, 2585);
        assert_eq!(dataset.user_behavior.page_views, 8934);
        assert!(dataset.community.is_some());
        assert_eq!(dataset.period, period());
    }

    #[tokio::test]
    async fn test_error_count_matches_failed_collectors() {
        let cases: Vec<Vec<SourceId>> = vec![
            vec![SourceId::Twitter],
            vec![SourceId::GoogleAnalyticsReferrals, SourceId::Facebook],
            vec![SourceId::ErifyDashboard, SourceId::LinkedIn, SourceId::Twitter],
        ];

        for failing in cases {
            let dataset = engine_with_failures(&failing).collect(period()).await;
            assert_eq!(dataset.errors.len(), failing.len());

            for source in SourceId::ALL {
                let errored = dataset.errors.iter().any(|e| e.source == source.label());
                assert_eq!(errored, failing.contains(&source), "{}", source);
            }

            let platforms_failed = failing
                .iter()
                .filter(|s| matches!(s, SourceId::Twitter | SourceId::LinkedIn | SourceId::Facebook))
                .count();
            assert_eq!(dataset.engagement.len(), 3 - platforms_failed);
        }
    }

    #[tokio::test]
    async fn test_all_failing_yields_zeroed_dataset() {
        let dataset = engine_with_failures(&SourceId::ALL).collect(period()).await;

        assert_eq!(dataset.errors.len(), SourceId::ALL.len());
        assert!(dataset.engagement.is_empty());
        assert_eq!(dataset.referrals.total_clicks, 0);
        assert_eq!(dataset.user_behavior.bounce_rate, 0.0);
        assert!(dataset.community.is_none());
    }

    #[tokio::test]
    async fn test_errors_keep_registration_order() {
        let engine = AggregationEngine::new(vec![
            Box::new(FailingCollector::new(SourceId::Facebook, "first")),
            Box::new(Slow(SourceId::Twitter, 30)),
            Box::new(FailingCollector::new(SourceId::LinkedIn, "second")),
            Box::new(Slow(SourceId::GoogleAnalyticsBehavior, 5)),
        ]);

        let dataset = engine.collect(period()).await;

        let sources: Vec<_> = dataset.errors.iter().map(|e| e.source.as_str()).collect();
        assert_eq!(sources, vec!["Facebook", "LinkedIn"]);
        assert!(dataset.engagement.contains_key(&Platform::Twitter));
        assert_eq!(dataset.user_behavior.page_views, 8934);
    }
}
