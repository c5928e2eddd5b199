//! One report cycle and one snapshot sync, end to end.
//!
//! A cycle collects every configured source, summarizes the dataset,
//! renders the report, writes the report files and hands the result to the
//! notifier. Weekly cycles compare against the latest earlier week on
//! record and then record their own totals.

use crate::aggregation::AggregationEngine;
use crate::analysis::{summarize, Baseline, BaselineHistory, SummaryOptions};
use crate::catalog::{parse_catalog, SAMPLE_CATALOG};
use crate::collectors::build_collectors;
use crate::config::Config;
use crate::distribution::{
    DeliveryId, LogTransport, Notifier, OutboxTransport, Recipients, Transport,
};
use crate::models::{Period, Report, ReportKind};
use crate::report::generator::ReportFiles;
use crate::report::{write_report_files, ReportRenderer};
use crate::snapshot::{AnalyticsSnapshot, SnapshotStore, VideoSnapshot};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Days covered by the analytics snapshot.
pub const SNAPSHOT_WINDOW_DAYS: i64 = 30;

/// How a cycle delivers its report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Queue messages in the outbox.
    Send,
    /// Log messages only.
    DryRun,
    /// Write report files, deliver nothing.
    NoSend,
}

/// What one report cycle produced.
#[derive(Debug)]
pub struct CycleOutcome {
    pub report: Report,
    pub files: ReportFiles,
    pub delivered: Vec<DeliveryId>,
}

/// What one snapshot sync produced.
#[derive(Debug)]
pub struct SyncOutcome {
    pub analytics: PathBuf,
    pub videos: PathBuf,
    pub total_videos: usize,
}

/// Build the notifier for `mode`, `None` for [`DeliveryMode::NoSend`].
pub fn build_notifier(config: &Config, mode: DeliveryMode) -> Option<Notifier> {
    let transport: Box<dyn Transport> = match mode {
        DeliveryMode::Send => Box::new(OutboxTransport::new(&config.distribution.outbox_dir)),
        DeliveryMode::DryRun => Box::new(LogTransport::default()),
        DeliveryMode::NoSend => return None,
    };

    Some(notifier_with(config, transport))
}

/// Notifier over an arbitrary transport, using the configured recipients.
pub fn notifier_with(config: &Config, transport: Box<dyn Transport>) -> Notifier {
    Notifier::new(
        transport,
        ReportRenderer::new(&config.general.brand_name),
        &config.distribution.sender,
        Recipients {
            team: config.distribution.team_recipients.clone(),
            stakeholders: config.distribution.stakeholder_recipients.clone(),
        },
    )
}

/// Run one report cycle ending at `now`.
pub async fn run_cycle(
    config: &Config,
    kind: ReportKind,
    notifier: Option<&Notifier>,
    now: DateTime<Utc>,
) -> Result<CycleOutcome> {
    info!("Starting {} report cycle", kind);

    let engine = AggregationEngine::new(build_collectors(&config.collectors));
    let dataset = engine
        .collect(Period::ending_at(now, kind.window_days()))
        .await;

    let period_label = now.format("%Y-%m-%d").to_string();
    let store = SnapshotStore::new(&config.snapshots.dir);
    let mut history = match kind {
        ReportKind::Weekly => read_baselines(&store, &config.snapshots.baseline_file),
        ReportKind::Daily => BaselineHistory::default(),
    };
    let baseline = history.comparison_for(&period_label).cloned();
    if kind == ReportKind::Weekly {
        match &baseline {
            Some(b) => info!("Comparing against week ending {}", b.week_ending),
            None => info!("No earlier weekly baseline on record, growth will be n/a"),
        }
    }

    let report = summarize(
        &dataset,
        &SummaryOptions {
            kind,
            period_label: period_label.clone(),
            brand_strategy: config.general.brand_strategy.clone(),
            baseline,
        },
    );

    let renderer = ReportRenderer::new(&config.general.brand_name);
    let rendered = renderer.render_full(&report);
    let files = write_report_files(&report, &rendered, &config.general.output_dir)?;
    info!("Report files written to {}", config.general.output_dir.display());

    let delivered = match notifier {
        Some(notifier) => notifier
            .send_report(&report, &rendered)
            .await
            .with_context(|| format!("Failed to distribute {} report", kind))?,
        None => Vec::new(),
    };

    if kind == ReportKind::Weekly {
        history.record(Baseline::from_dataset(&dataset, period_label));
        store.write(&config.snapshots.baseline_file, &history)?;
    }

    info!(
        "{} report cycle finished ({} source errors, {} messages)",
        kind,
        report.errors.len(),
        delivered.len()
    );

    Ok(CycleOutcome {
        report,
        files,
        delivered,
    })
}

/// Run a cycle and alert the team when it fails.
///
/// The cycle error is returned after the alert. A failing alert is logged
/// and otherwise ignored.
pub async fn run_and_notify(
    config: &Config,
    kind: ReportKind,
    notifier: Option<&Notifier>,
) -> Result<CycleOutcome> {
    let result = run_cycle(config, kind, notifier, Utc::now()).await;

    if let Err(ref e) = result {
        error!("{} report cycle failed: {:#}", kind, e);

        if let Some(notifier) = notifier {
            let title = format!("{} Report Generation Failed", kind);
            match notifier
                .send_failure_alert(&title, &format!("{:#}", e), Utc::now())
                .await
            {
                Ok(Some(id)) => info!("Failure alert sent ({})", id),
                Ok(None) => warn!("No team recipients configured for the failure alert"),
                Err(alert_err) => error!("Failed to send failure alert: {}", alert_err),
            }
        }
    }

    result
}

/// Refresh the analytics and video snapshots.
///
/// A sample catalog is written first when the video source does not exist.
pub async fn sync(config: &Config, now: DateTime<Utc>) -> Result<SyncOutcome> {
    let store = SnapshotStore::new(&config.snapshots.dir);

    let source = &config.snapshots.video_source;
    if !source.exists() {
        if let Some(parent) = source.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(source, SAMPLE_CATALOG)
            .with_context(|| format!("Failed to write sample catalog: {}", source.display()))?;
        info!("Created sample video catalog at {}", source.display());
    }

    let content = std::fs::read_to_string(source)
        .with_context(|| format!("Failed to read video catalog: {}", source.display()))?;
    let videos = VideoSnapshot::from_videos(parse_catalog(&content, now), now);
    let total_videos = videos.total_videos;

    let engine = AggregationEngine::new(build_collectors(&config.collectors));
    let dataset = engine
        .collect(Period::ending_at(now, SNAPSHOT_WINDOW_DAYS))
        .await;
    let previous = match store.read::<AnalyticsSnapshot>(&config.snapshots.analytics_file) {
        Ok(previous) => previous,
        Err(e) => {
            warn!("Ignoring previous analytics snapshot: {:#}", e);
            None
        }
    };
    let analytics = AnalyticsSnapshot::from_dataset(&dataset, previous.as_ref(), now);

    let analytics_path = store.write(&config.snapshots.analytics_file, &analytics)?;
    let videos_path = store.write(&config.snapshots.videos_file, &videos)?;
    info!(
        "Snapshots updated: {} and {} ({} videos)",
        analytics_path.display(),
        videos_path.display(),
        total_videos
    );

    Ok(SyncOutcome {
        analytics: analytics_path,
        videos: videos_path,
        total_videos,
    })
}

fn read_baselines(store: &SnapshotStore, name: &str) -> BaselineHistory {
    match store.read::<BaselineHistory>(name) {
        Ok(history) => history.unwrap_or_default(),
        Err(e) => {
            warn!("Ignoring weekly baselines: {:#}", e);
            BaselineHistory::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::SourceId;
    use crate::distribution::tests::RecordingTransport;
    use crate::models::AlertSeverity;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.general.output_dir = dir.path().join("reports");
        config.snapshots.dir = dir.path().join("public");
        config.snapshots.video_source = dir.path().join("docs").join("video-previews.md");
        config.distribution.outbox_dir = dir.path().join("outbox");
        config.distribution.team_recipients = vec!["team@erify.com".to_string()];
        config.distribution.stakeholder_recipients = vec!["ceo@erify.com".to_string()];
        config
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, 9, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_daily_cycle_writes_files_and_sends() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        let transport = RecordingTransport::default();
        let notifier = notifier_with(&config, Box::new(transport.clone()));

        let outcome = run_cycle(&config, ReportKind::Daily, Some(&notifier), now())
            .await
            .unwrap();

        assert_eq!(outcome.report.period_label, "2026-10-14");
        assert!(outcome.report.errors.is_empty());
        assert!(outcome.files.html.exists());
        assert!(outcome.files.text.exists());
        assert!(outcome.files.json.exists());
        assert_eq!(outcome.delivered.len(), 2);

        let sent = transport.sent.lock().unwrap();
        assert!(sent[0].subject.starts_with("[TEAM]"));
        assert!(sent[1].subject.starts_with("[UPDATE]"));
        assert!(!config.snapshots.dir.join("weekly-baseline.json").exists());
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, day, hour, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_weekly_cycle_uses_previous_baseline() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        let store = SnapshotStore::new(&config.snapshots.dir);
        store
            .write(
                "weekly-baseline.json",
                &Baseline {
                    week_ending: "2026-10-12".to_string(),
                    total_engagements: 4000,
                    total_conversions: 150,
                    new_followers: 100,
                },
            )
            .unwrap();

        let first = run_cycle(&config, ReportKind::Weekly, None, at(19, 9)).await.unwrap();
        let growth = first.report.summary.weekly_growth.unwrap();
        assert_eq!(growth.engagements.to_string(), "+24.1%");
        assert_eq!(growth.conversions.to_string(), "+19.3%");
        assert_eq!(growth.new_followers.to_string(), "-55.0%");

        let history: BaselineHistory = store.read("weekly-baseline.json").unwrap().unwrap();
        let weeks: Vec<&str> = history.weeks.iter().map(|b| b.week_ending.as_str()).collect();
        assert_eq!(weeks, vec!["2026-10-12", "2026-10-19"]);
        assert_eq!(history.weeks[1].total_conversions, 179);

        // A rerun of the same week still compares against the week before.
        let rerun = run_cycle(&config, ReportKind::Weekly, None, at(19, 11)).await.unwrap();
        assert_eq!(rerun.report.summary.weekly_growth, Some(growth));
        assert_eq!(rerun.report.trends, first.report.trends);

        let next = run_cycle(&config, ReportKind::Weekly, None, at(26, 9)).await.unwrap();
        let growth = next.report.summary.weekly_growth.unwrap();
        assert_eq!(growth.engagements.to_string(), "+0.0%");
        assert_eq!(growth.conversions.to_string(), "+0.0%");
    }

    #[tokio::test]
    async fn test_first_weekly_cycle_has_no_growth() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);

        for hour in [9, 11] {
            let outcome = run_cycle(&config, ReportKind::Weekly, None, at(14, hour)).await.unwrap();
            let growth = outcome.report.summary.weekly_growth.unwrap();
            assert_eq!(growth.engagements.to_string(), "n/a");
            assert_eq!(growth.conversions.to_string(), "n/a");
        }

        let history: BaselineHistory = SnapshotStore::new(&config.snapshots.dir)
            .read("weekly-baseline.json")
            .unwrap()
            .unwrap();
        assert_eq!(history.weeks.len(), 1);
        assert_eq!(history.weeks[0].week_ending, "2026-10-14");
    }

    #[tokio::test]
    async fn test_failed_sources_still_produce_a_report() {
        let dir = TempDir::new().unwrap();
        let mut config = config(&dir);
        config.collectors.simulate_failures = vec![SourceId::Twitter, SourceId::LinkedIn];

        let outcome = run_cycle(&config, ReportKind::Daily, None, now()).await.unwrap();

        assert_eq!(outcome.report.errors.len(), 2);
        let text = std::fs::read_to_string(&outcome.files.text).unwrap();
        assert!(text.contains("simulated outage"));
    }

    #[tokio::test]
    async fn test_fixture_week_raises_alerts() {
        let dir = TempDir::new().unwrap();
        let mut config = config(&dir);
        config.collectors.fixtures_dir = Some(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures"));

        let outcome = run_cycle(&config, ReportKind::Daily, None, now()).await.unwrap();
        let report = outcome.report;

        assert!(report.errors.is_empty());
        assert_eq!(report.summary.total_engagements, 1200 + 890 + 654);
        assert_eq!(report.summary.conversion_rate, 0.0);
        assert_eq!(
            report.alerts.last().map(|a| a.severity),
            Some(AlertSeverity::Alert)
        );
    }

    #[tokio::test]
    async fn test_failed_cycle_alerts_the_team() {
        let dir = TempDir::new().unwrap();
        let mut config = config(&dir);
        // A file where the output directory should be.
        std::fs::write(dir.path().join("blocked"), "").unwrap();
        config.general.output_dir = dir.path().join("blocked");

        let transport = RecordingTransport::default();
        let notifier = notifier_with(&config, Box::new(transport.clone()));

        let result = run_and_notify(&config, ReportKind::Daily, Some(&notifier)).await;
        assert!(result.is_err());

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, vec!["team@erify.com"]);
        assert!(sent[0].subject.contains("Daily Report Generation Failed"));
    }

    #[tokio::test]
    async fn test_failed_alert_is_swallowed() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        let transport = RecordingTransport {
            fail: true,
            ..Default::default()
        };
        let notifier = notifier_with(&config, Box::new(transport.clone()));

        let result = run_and_notify(&config, ReportKind::Daily, Some(&notifier)).await;

        assert!(result.is_err());
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_send_mode_has_no_notifier() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        assert!(build_notifier(&config, DeliveryMode::NoSend).is_none());
        assert!(build_notifier(&config, DeliveryMode::DryRun).is_some());
    }

    #[tokio::test]
    async fn test_sync_creates_sample_catalog_and_snapshots() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);

        let outcome = sync(&config, now()).await.unwrap();

        assert!(config.snapshots.video_source.exists());
        assert_eq!(outcome.total_videos, 5);

        let store = SnapshotStore::new(&config.snapshots.dir);
        let videos: VideoSnapshot = store.read("latest-videos.json").unwrap().unwrap();
        assert_eq!(videos.total_videos, 5);
        assert!(videos.featured_video.is_some());

        let analytics: AnalyticsSnapshot = store.read("analytics.json").unwrap().unwrap();
        assert_eq!(analytics.custom_events.video_clicks.weekly_growth, "n/a");
        assert_eq!(analytics.last_updated, now());
    }

    #[tokio::test]
    async fn test_second_sync_compares_custom_events() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);

        sync(&config, now()).await.unwrap();
        sync(&config, now()).await.unwrap();

        let analytics: AnalyticsSnapshot = SnapshotStore::new(&config.snapshots.dir)
            .read("analytics.json")
            .unwrap()
            .unwrap();
        assert_eq!(analytics.custom_events.app_opens.weekly_growth, "+0.0%");
    }
}
