//! Configuration file handling.
//!
//! This module handles loading configuration from `.campaign-pulse.toml`
//! files and merging it with command-line overrides.

use crate::collectors::SourceId;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = ".campaign-pulse.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Data source settings.
    #[serde(default)]
    pub collectors: CollectorsConfig,

    /// Report schedule.
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Recipients and delivery.
    #[serde(default)]
    pub distribution: DistributionConfig,

    /// Dashboard snapshot files.
    #[serde(default)]
    pub snapshots: SnapshotsConfig,

    /// HTTP read surface.
    #[serde(default)]
    pub server: ServerConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Brand shown in report titles and footers.
    #[serde(default = "default_brand_name")]
    pub brand_name: String,

    /// Directory for the HTML, text and JSON report files.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Recommendation lines appended to every weekly report.
    #[serde(default = "default_brand_strategy")]
    pub brand_strategy: Vec<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            brand_name: default_brand_name(),
            output_dir: default_output_dir(),
            brand_strategy: default_brand_strategy(),
        }
    }
}

fn default_brand_name() -> String {
    "ERIFY™".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("reports")
}

fn default_brand_strategy() -> Vec<String> {
    vec![
        "Continue focusing on luxury fintech messaging".to_string(),
        "Expand Supreme 4 branding across all channels".to_string(),
    ]
}

/// Collector settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorsConfig {
    /// Per-collector timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Enabled sources, in registration order.
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceId>,

    /// Directory of pre-fetched `<source>.json` results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixtures_dir: Option<PathBuf>,

    /// Sources forced to fail.
    #[serde(default)]
    pub simulate_failures: Vec<SourceId>,
}

impl Default for CollectorsConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            sources: default_sources(),
            fixtures_dir: None,
            simulate_failures: Vec::new(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}

fn default_sources() -> Vec<SourceId> {
    SourceId::ALL.to_vec()
}

/// When scheduled reports fire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Daily report time, `HH:MM`.
    #[serde(default = "default_time")]
    pub daily_time: String,

    /// Weekday of the weekly report.
    #[serde(default = "default_weekly_day")]
    pub weekly_day: String,

    /// Weekly report time, `HH:MM`.
    #[serde(default = "default_time")]
    pub weekly_time: String,

    /// `UTC` or a fixed offset such as `+05:30`.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default = "default_true")]
    pub daily_enabled: bool,

    #[serde(default = "default_true")]
    pub weekly_enabled: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            daily_time: default_time(),
            weekly_day: default_weekly_day(),
            weekly_time: default_time(),
            timezone: default_timezone(),
            daily_enabled: true,
            weekly_enabled: true,
        }
    }
}

fn default_time() -> String {
    "09:00".to_string()
}

fn default_weekly_day() -> String {
    "monday".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_true() -> bool {
    true
}

/// Recipients and delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionConfig {
    /// Receive the full report and failure alerts.
    #[serde(default)]
    pub team_recipients: Vec<String>,

    /// Receive the stakeholder or executive summary.
    #[serde(default)]
    pub stakeholder_recipients: Vec<String>,

    #[serde(default = "default_sender")]
    pub sender: String,

    /// Where outgoing messages are written.
    #[serde(default = "default_outbox_dir")]
    pub outbox_dir: PathBuf,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            team_recipients: Vec::new(),
            stakeholder_recipients: Vec::new(),
            sender: default_sender(),
            outbox_dir: default_outbox_dir(),
        }
    }
}

fn default_sender() -> String {
    "reports@erify.com".to_string()
}

fn default_outbox_dir() -> PathBuf {
    PathBuf::from("outbox")
}

/// Snapshot file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotsConfig {
    #[serde(default = "default_snapshot_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_analytics_file")]
    pub analytics_file: String,

    #[serde(default = "default_videos_file")]
    pub videos_file: String,

    /// Markdown video catalog.
    #[serde(default = "default_video_source")]
    pub video_source: PathBuf,

    /// The latest weekly totals on record, used for weekly growth.
    #[serde(default = "default_baseline_file")]
    pub baseline_file: String,
}

impl Default for SnapshotsConfig {
    fn default() -> Self {
        Self {
            dir: default_snapshot_dir(),
            analytics_file: default_analytics_file(),
            videos_file: default_videos_file(),
            video_source: default_video_source(),
            baseline_file: default_baseline_file(),
        }
    }
}

fn default_snapshot_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_analytics_file() -> String {
    "analytics.json".to_string()
}

fn default_videos_file() -> String {
    "latest-videos.json".to_string()
}

fn default_video_source() -> PathBuf {
    PathBuf::from("docs/video-previews.md")
}

fn default_baseline_file() -> String {
    "weekly-baseline.json".to_string()
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Built dashboard assets served for every other route.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("dist")
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Recipient lists given on the command line (or through `TEAM_EMAILS` /
    /// `STAKEHOLDER_EMAILS`) replace the configured ones.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref team) = args.team_emails {
            self.distribution.team_recipients = crate::distribution::parse_recipients(team);
        }
        if let Some(ref stakeholders) = args.stakeholder_emails {
            self.distribution.stakeholder_recipients =
                crate::distribution::parse_recipients(stakeholders);
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
