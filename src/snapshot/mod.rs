//! JSON snapshot files read by the dashboard API.
//!
//! Snapshots are replaced whole: each write goes to a temporary sibling file
//! which is then renamed over the target.

use crate::catalog::{categories, featured_video, VideoEntry};
use crate::models::{AggregatedDataset, GrowthDelta, PageStat};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A directory of JSON snapshot files.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Read a snapshot, `None` when the file does not exist.
    pub fn read<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        let path = self.path(name);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()))
            }
        };

        let value = serde_json::from_str(&content)
            .with_context(|| format!("Invalid snapshot JSON in {}", path.display()))?;
        Ok(Some(value))
    }

    /// Replace a snapshot with `value`.
    pub fn write<T: Serialize>(&self, name: &str, value: &T) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create snapshot directory: {}", self.dir.display()))?;

        let path = self.path(name);
        let tmp = self.path(&format!(".{}.tmp", name));
        let json = serde_json::to_string_pretty(value).context("Failed to serialize snapshot")?;

        write_then_rename(&tmp, &path, json.as_bytes())?;
        debug!("Wrote snapshot {}", path.display());

        Ok(path)
    }
}

fn write_then_rename(tmp: &Path, path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(tmp, bytes).with_context(|| format!("Failed to write {}", tmp.display()))?;
    std::fs::rename(tmp, path)
        .with_context(|| format!("Failed to move snapshot into place: {}", path.display()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSet {
    pub users: u64,
    pub sessions: u64,
    pub conversions: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodMetrics {
    pub daily: MetricSet,
    pub weekly: MetricSet,
    pub monthly: MetricSet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomEvent {
    pub total: u64,
    pub daily: u64,
    /// e.g. "+12.5%", "n/a" without a previous snapshot.
    pub weekly_growth: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomEvents {
    pub video_clicks: CustomEvent,
    pub app_opens: CustomEvent,
    pub referral_clicks: CustomEvent,
}

/// The dashboard's analytics snapshot, built from a 30-day dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub users: u64,
    pub sessions: u64,
    pub conversions: u64,
    pub video_clicks: u64,
    pub app_opens: u64,
    pub page_views: u64,
    pub bounce_rate: f64,
    pub session_duration: String,
    pub last_updated: DateTime<Utc>,
    pub metrics: PeriodMetrics,
    pub custom_events: CustomEvents,
    pub top_pages: Vec<PageStat>,
}

/// `x · percent / 100`, rounded down.
fn share(x: u64, percent: u64) -> u64 {
    x * percent / 100
}

fn per_day(monthly: u64) -> u64 {
    monthly / 30
}

/// A month is counted as 4.3 weeks.
fn per_week(monthly: u64) -> u64 {
    monthly * 10 / 43
}

fn scaled(monthly: MetricSet, f: fn(u64) -> u64) -> MetricSet {
    MetricSet {
        users: f(monthly.users),
        sessions: f(monthly.sessions),
        conversions: f(monthly.conversions),
    }
}

fn custom_event(users: u64, percent: u64, previous: Option<u64>) -> CustomEvent {
    let total = share(users, percent);
    let weekly_growth = match previous {
        Some(previous) => GrowthDelta::between(previous, total),
        None => GrowthDelta(None),
    };
    CustomEvent {
        total,
        daily: users * percent / 3000,
        weekly_growth: weekly_growth.to_string(),
    }
}

impl AnalyticsSnapshot {
    /// Build the snapshot from a 30-day dataset.
    ///
    /// Custom-event growth compares against `previous` when given.
    pub fn from_dataset(
        dataset: &AggregatedDataset,
        previous: Option<&AnalyticsSnapshot>,
        now: DateTime<Utc>,
    ) -> Self {
        let behavior = &dataset.user_behavior;
        let users = behavior.unique_visitors;
        let monthly = MetricSet {
            users,
            sessions: behavior.sessions,
            conversions: dataset.referrals.total_conversions,
        };
        let previous = previous.map(|p| &p.custom_events);

        Self {
            users,
            sessions: behavior.sessions,
            conversions: dataset.referrals.total_conversions,
            video_clicks: share(users, 21),
            app_opens: share(users, 10),
            page_views: behavior.page_views,
            bounce_rate: behavior.bounce_rate,
            session_duration: behavior.average_session_duration.clone(),
            last_updated: now,
            metrics: PeriodMetrics {
                daily: scaled(monthly, per_day),
                weekly: scaled(monthly, per_week),
                monthly,
            },
            custom_events: CustomEvents {
                video_clicks: custom_event(users, 21, previous.map(|e| e.video_clicks.total)),
                app_opens: custom_event(users, 10, previous.map(|e| e.app_opens.total)),
                referral_clicks: custom_event(
                    users,
                    19,
                    previous.map(|e| e.referral_clicks.total),
                ),
            },
            top_pages: behavior.top_pages.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturedVideo {
    pub id: String,
    pub reason: String,
}

/// The dashboard's video snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnapshot {
    pub videos: Vec<VideoEntry>,
    pub last_updated: DateTime<Utc>,
    pub total_videos: usize,
    pub total_views: u64,
    pub categories: Vec<String>,
    pub featured_video: Option<FeaturedVideo>,
}

impl VideoSnapshot {
    pub fn from_videos(videos: Vec<VideoEntry>, now: DateTime<Utc>) -> Self {
        let featured = featured_video(&videos).map(|v| FeaturedVideo {
            id: v.id.clone(),
            reason: "Most viewed this week".to_string(),
        });

        Self {
            total_videos: videos.len(),
            total_views: videos.iter().map(|v| v.views).sum(),
            categories: categories(&videos),
            featured_video: featured,
            last_updated: now,
            videos,
        }
    }
}
