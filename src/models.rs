//! Data models for campaign reporting.
//!
//! This module contains the core data structures used throughout
//! the application: the per-source metric records, the aggregated
//! dataset built once per report cycle, and the summarized report
//! consumed by the renderers.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The time window a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Whole days between start and end, rounded, never negative.
    pub duration_days: i64,
}

impl Period {
    /// Creates a period from explicit bounds.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let seconds = (end - start).num_seconds().max(0);
        let duration_days = (seconds as f64 / 86_400.0).round() as i64;
        Self {
            start,
            end,
            duration_days,
        }
    }

    /// The `days` days ending at `end`.
    pub fn ending_at(end: DateTime<Utc>, days: i64) -> Self {
        Self::new(end - Duration::days(days), end)
    }
}

/// Social platform an engagement record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    LinkedIn,
    Facebook,
}

impl Platform {
    /// All platforms in report order.
    pub const ALL: [Platform; 3] = [Platform::Twitter, Platform::LinkedIn, Platform::Facebook];
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Twitter => write!(f, "Twitter"),
            Platform::LinkedIn => write!(f, "LinkedIn"),
            Platform::Facebook => write!(f, "Facebook"),
        }
    }
}

/// Engagement numbers reported by one social platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngagementMetrics {
    pub posts: u64,
    pub impressions: u64,
    pub reach: u64,
    pub engagements: u64,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    /// Interactions per impression (or reach), as a percentage.
    pub engagement_rate: f64,
    pub follower_growth: u64,
}

/// Clicks and conversions attributed to one UTM campaign.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignStats {
    pub name: String,
    pub clicks: u64,
    pub conversions: u64,
}

impl CampaignStats {
    pub fn new(name: impl Into<String>, clicks: u64, conversions: u64) -> Self {
        Self {
            name: name.into(),
            clicks,
            conversions,
        }
    }
}

/// Referral traffic: the campaign map (insertion ordered) plus totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReferralMetrics {
    pub campaigns: Vec<CampaignStats>,
    pub total_clicks: u64,
    pub total_conversions: u64,
    /// Reported conversion rate as a percentage.
    pub conversion_rate: f64,
}

impl ReferralMetrics {
    /// Builds totals and the conversion rate from a campaign list.
    pub fn from_campaigns(campaigns: Vec<CampaignStats>) -> Self {
        let total_clicks = campaigns.iter().map(|c| c.clicks).sum();
        let total_conversions = campaigns.iter().map(|c| c.conversions).sum();
        let conversion_rate = rate(total_conversions, total_clicks);
        Self {
            campaigns,
            total_clicks,
            total_conversions,
            conversion_rate,
        }
    }

    /// Conversion rate safe for display: 0 when there were no clicks.
    pub fn effective_conversion_rate(&self) -> f64 {
        if self.total_clicks == 0 || !self.conversion_rate.is_finite() {
            0.0
        } else {
            self.conversion_rate
        }
    }
}

/// `part / whole` as a percentage rounded to two decimals, 0 for an empty whole.
pub fn rate(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let pct = part as f64 / whole as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

/// Views of a single page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageStat {
    pub path: String,
    pub views: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Website behaviour metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BehaviorMetrics {
    pub page_views: u64,
    pub unique_visitors: u64,
    pub sessions: u64,
    /// Pre-formatted, e.g. "4m 12s". Passed through to output unchanged.
    pub average_session_duration: String,
    /// Session duration in seconds, used for the session-quality rating.
    pub average_session_seconds: u64,
    pub bounce_rate: f64,
    pub top_pages: Vec<PageStat>,
}

/// A named counter reported by the internal dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counter {
    pub name: String,
    pub value: u64,
}

/// Community and campaign counters from the internal dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommunityMetrics {
    pub posts: u64,
    pub interactions: u64,
    pub new_members: u64,
    pub campaign_counters: Vec<Counter>,
}

/// What a collector produced for one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SourceResult {
    Engagement {
        platform: Platform,
        metrics: EngagementMetrics,
    },
    Referral(ReferralMetrics),
    Behavior(BehaviorMetrics),
    Community(CommunityMetrics),
}

/// A failed source, carried from the dataset into the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceError {
    pub source: String,
    pub error: String,
}

/// Everything collected for one report cycle.
///
/// Absent sources stay zero-valued so summarization never has to
/// distinguish "missing" from "zero".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedDataset {
    pub period: Period,
    pub engagement: std::collections::BTreeMap<Platform, EngagementMetrics>,
    pub referrals: ReferralMetrics,
    pub user_behavior: BehaviorMetrics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community: Option<CommunityMetrics>,
    pub errors: Vec<SourceError>,
}

impl AggregatedDataset {
    /// An empty dataset for `period`.
    pub fn empty(period: Period) -> Self {
        Self {
            period,
            engagement: Default::default(),
            referrals: ReferralMetrics::default(),
            user_behavior: BehaviorMetrics::default(),
            community: None,
            errors: Vec::new(),
        }
    }

    /// Writes one source result into its field.
    pub fn merge(&mut self, result: SourceResult) {
        match result {
            SourceResult::Engagement { platform, metrics } => {
                self.engagement.insert(platform, metrics);
            }
            SourceResult::Referral(referrals) => self.referrals = referrals,
            SourceResult::Behavior(behavior) => self.user_behavior = behavior,
            SourceResult::Community(community) => self.community = Some(community),
        }
    }

    /// Engagement metrics for a platform, zero-valued when absent.
    pub fn platform(&self, platform: Platform) -> EngagementMetrics {
        self.engagement.get(&platform).cloned().unwrap_or_default()
    }
}

/// Daily or weekly report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Daily,
    Weekly,
}

impl ReportKind {
    /// Days covered by one report of this kind.
    pub fn window_days(&self) -> i64 {
        match self {
            ReportKind::Daily => 1,
            ReportKind::Weekly => 7,
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::Daily => write!(f, "Daily"),
            ReportKind::Weekly => write!(f, "Weekly"),
        }
    }
}

/// Severity of a report alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Warning,
    /// Higher than a warning.
    Alert,
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertSeverity::Warning => write!(f, "WARNING"),
            AlertSeverity::Alert => write!(f, "ALERT"),
        }
    }
}

/// A threshold breach surfaced in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: AlertSeverity,
    pub message: String,
    /// The offending percentage, when there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

/// Week-over-week change of a headline number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthDelta(pub Option<f64>);

impl GrowthDelta {
    /// Percent change from `previous` to `current`; unknown for a zero baseline.
    pub fn between(previous: u64, current: u64) -> Self {
        if previous == 0 {
            return Self(None);
        }
        let pct = (current as f64 - previous as f64) / previous as f64 * 100.0;
        let rounded = (pct * 10.0).round() / 10.0;
        // A change that rounds away must not keep the sign of -0.0.
        Self(Some(if rounded == 0.0 { 0.0 } else { rounded }))
    }
}

impl fmt::Display for GrowthDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(pct) if pct >= 0.0 => write!(f, "+{:.1}%", pct),
            Some(pct) => write!(f, "{:.1}%", pct),
            None => write!(f, "n/a"),
        }
    }
}

/// Week-over-week growth of the three headline numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyGrowth {
    pub engagements: GrowthDelta,
    pub conversions: GrowthDelta,
    pub new_followers: GrowthDelta,
}

/// Headline numbers of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_engagements: u64,
    pub total_conversions: u64,
    pub conversion_rate: f64,
    pub key_highlight: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_growth: Option<WeeklyGrowth>,
}

/// One platform row of the engagement breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformBreakdown {
    pub platform: Platform,
    pub engagements: u64,
    /// Impressions when the platform reports them, reach otherwise.
    pub audience: u64,
    pub audience_label: String,
    pub engagement_rate: f64,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementBreakdown {
    pub platforms: Vec<PlatformBreakdown>,
    pub total_engagements: u64,
    pub average_engagement_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralBreakdown {
    pub campaigns: Vec<CampaignStats>,
    pub total_clicks: u64,
    pub total_conversions: u64,
    pub conversion_rate: f64,
    /// Best three campaigns by conversions.
    pub top_performers: Vec<CampaignStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserJourney {
    pub average_pageviews: u64,
    pub session_quality: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorBreakdown {
    pub page_views: u64,
    pub unique_visitors: u64,
    pub average_session_duration: String,
    pub bounce_rate: f64,
    pub top_pages: Vec<PageStat>,
    pub user_journey: UserJourney,
}

/// Direction of a week-over-week change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Stable,
    Decreasing,
    Unknown,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Increasing => write!(f, "increasing"),
            Trend::Stable => write!(f, "stable"),
            Trend::Decreasing => write!(f, "decreasing"),
            Trend::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trends {
    pub engagement_trend: Trend,
    pub conversion_trend: Trend,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_growth_platform: Option<Platform>,
    pub insights: Vec<String>,
}

/// The summarized report. Derived from one dataset, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub kind: ReportKind,
    /// Date string shown in headers, e.g. "2026-10-14".
    pub period_label: String,
    pub period: Period,
    pub summary: Summary,
    pub engagement: EngagementBreakdown,
    pub referrals: ReferralBreakdown,
    pub behavior: BehaviorBreakdown,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community: Option<CommunityMetrics>,
    pub alerts: Vec<Alert>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trends: Option<Trends>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<String>>,
    pub errors: Vec<SourceError>,
}

impl Report {
    /// Header line under the title, e.g. "Week ending 2026-10-14".
    pub fn period_heading(&self) -> String {
        match self.kind {
            ReportKind::Daily => format!("Date: {}", self.period_label),
            ReportKind::Weekly => format!("Week ending {}", self.period_label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_period_duration_rounds_and_clamps() {
        let end = Utc.with_ymd_and_hms(2026, 10, 14, 9, 0, 0).unwrap();
        assert_eq!(Period::ending_at(end, 7).duration_days, 7);
        assert_eq!(Period::new(end, end - Duration::hours(5)).duration_days, 0);
        assert_eq!(
            Period::new(end - Duration::hours(36), end).duration_days,
            2
        );
    }

    #[test]
    fn test_conversion_rate_zero_without_clicks() {
        let referrals = ReferralMetrics {
            campaigns: vec![],
            total_clicks: 0,
            total_conversions: 12,
            conversion_rate: f64::NAN,
        };
        assert_eq!(referrals.effective_conversion_rate(), 0.0);
        assert_eq!(ReferralMetrics::from_campaigns(vec![]).conversion_rate, 0.0);
    }

    #[test]
    fn test_referrals_from_campaigns() {
        let referrals = ReferralMetrics::from_campaigns(vec![
            CampaignStats::new("a", 300, 30),
            CampaignStats::new("b", 100, 10),
        ]);
        assert_eq!(referrals.total_clicks, 400);
        assert_eq!(referrals.total_conversions, 40);
        assert_eq!(referrals.conversion_rate, 10.0);
    }

    #[test]
    fn test_merge_routes_by_variant() {
        let end = Utc.with_ymd_and_hms(2026, 10, 14, 9, 0, 0).unwrap();
        let mut dataset = AggregatedDataset::empty(Period::ending_at(end, 1));
        dataset.merge(SourceResult::Engagement {
            platform: Platform::LinkedIn,
            metrics: EngagementMetrics {
                engagements: 10,
                ..Default::default()
            },
        });
        dataset.merge(SourceResult::Behavior(BehaviorMetrics {
            bounce_rate: 12.5,
            ..Default::default()
        }));

        assert_eq!(dataset.platform(Platform::LinkedIn).engagements, 10);
        assert_eq!(dataset.platform(Platform::Twitter), EngagementMetrics::default());
        assert_eq!(dataset.user_behavior.bounce_rate, 12.5);
        assert!(dataset.community.is_none());
    }

    #[test]
    fn test_growth_delta_display() {
        assert_eq!(GrowthDelta::between(200, 225).to_string(), "+12.5%");
        assert_eq!(GrowthDelta::between(100, 97).to_string(), "-3.0%");
        assert_eq!(GrowthDelta::between(0, 50).to_string(), "n/a");
    }

    #[test]
    fn test_growth_delta_tiny_decrease_is_zero() {
        let delta = GrowthDelta::between(10_000, 9_999);
        assert_eq!(delta, GrowthDelta(Some(0.0)));
        assert!(delta.0.unwrap().is_sign_positive());
        assert_eq!(delta.to_string(), "+0.0%");
        assert_eq!(GrowthDelta::between(10_000, 10_001).to_string(), "+0.0%");
    }

    #[test]
    fn test_source_result_json_shape() {
        let json = r#"{"kind":"engagement","platform":"twitter","metrics":{"engagements":5,"engagementRate":2.5}}"#;
        let parsed: SourceResult = serde_json::from_str(json).unwrap();
        match parsed {
            SourceResult::Engagement { platform, metrics } => {
                assert_eq!(platform, Platform::Twitter);
                assert_eq!(metrics.engagements, 5);
                assert_eq!(metrics.engagement_rate, 2.5);
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }
}
