//! Derivation of a [`Report`] from an [`AggregatedDataset`].
//!
//! Everything here is a pure function of its inputs. The caller supplies
//! the report kind, the date label and (for weekly reports) the previous
//! week's baseline; nothing reads the clock or the filesystem.

use crate::models::{
    AggregatedDataset, Alert, AlertSeverity, BehaviorBreakdown, BehaviorMetrics, CampaignStats,
    EngagementBreakdown, GrowthDelta, Platform, PlatformBreakdown, ReferralBreakdown, Report,
    ReportKind, Summary, Trend, Trends, UserJourney, WeeklyGrowth,
};
use crate::report::format::{campaign_title, percent, thousands};
use serde::{Deserialize, Serialize};

/// Total engagements above which the highlight praises engagement.
pub const HIGHLIGHT_ENGAGEMENTS: u64 = 5000;
/// Total conversions above which the highlight praises conversions.
pub const HIGHLIGHT_CONVERSIONS: u64 = 100;
/// Average engagement rate (%) below which a warning is raised.
pub const MIN_ENGAGEMENT_RATE: f64 = 5.0;
/// Bounce rate (%) above which a warning is raised.
pub const MAX_BOUNCE_RATE: f64 = 40.0;
/// Referral conversion rate (%) below which an alert is raised.
pub const MIN_CONVERSION_RATE: f64 = 5.0;
/// Average engagement rate (%) below which more posting is recommended.
pub const POST_FREQUENCY_RATE: f64 = 7.0;
/// Bounce rate (%) above which landing page work is recommended.
pub const LANDING_PAGE_BOUNCE_RATE: f64 = 30.0;
/// Week-over-week change (%) inside which a trend counts as stable.
pub const STABLE_TREND_BAND: f64 = 2.0;
/// Number of campaigns listed as top performers.
pub const TOP_PERFORMERS: usize = 3;
/// Sessions longer than this (seconds) rate as high quality.
pub const HIGH_QUALITY_SESSION_SECS: u64 = 180;

/// Headline totals of a finished week, kept to compute the next week's growth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Baseline {
    pub week_ending: String,
    pub total_engagements: u64,
    pub total_conversions: u64,
    pub new_followers: u64,
}

impl Baseline {
    /// Baseline of the week a dataset covers.
    pub fn from_dataset(dataset: &AggregatedDataset, week_ending: impl Into<String>) -> Self {
        Self {
            week_ending: week_ending.into(),
            total_engagements: total_engagements(dataset),
            total_conversions: dataset.referrals.total_conversions,
            new_followers: new_followers(dataset),
        }
    }
}

/// Number of weekly baselines kept on record.
pub const KEPT_BASELINES: usize = 2;

/// The most recent weekly baselines, oldest first.
///
/// Keeping the week before the latest lets a rerun of the same week compare
/// against the prior week instead of itself. A file holding a single
/// [`Baseline`] object is read as a one-week history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredBaselines")]
pub struct BaselineHistory {
    pub weeks: Vec<Baseline>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredBaselines {
    History { weeks: Vec<Baseline> },
    Single(Baseline),
}

impl From<StoredBaselines> for BaselineHistory {
    fn from(stored: StoredBaselines) -> Self {
        let mut history = BaselineHistory::default();
        match stored {
            StoredBaselines::History { weeks } => weeks.into_iter().for_each(|b| history.record(b)),
            StoredBaselines::Single(baseline) => history.record(baseline),
        }
        history
    }
}

impl BaselineHistory {
    /// Latest baseline of a week that ended before `week_ending`.
    pub fn comparison_for(&self, week_ending: &str) -> Option<&Baseline> {
        self.weeks
            .iter()
            .rev()
            .find(|b| b.week_ending.as_str() < week_ending)
    }

    /// Record `baseline`, replacing an earlier record of the same week.
    pub fn record(&mut self, baseline: Baseline) {
        self.weeks.retain(|b| b.week_ending != baseline.week_ending);
        self.weeks.push(baseline);
        self.weeks.sort_by(|a, b| a.week_ending.cmp(&b.week_ending));
        let excess = self.weeks.len().saturating_sub(KEPT_BASELINES);
        self.weeks.drain(..excess);
    }
}

/// Inputs that are not part of the dataset.
#[derive(Debug, Clone)]
pub struct SummaryOptions {
    pub kind: ReportKind,
    pub period_label: String,
    /// Fixed brand-strategy lines appended to every recommendation list.
    pub brand_strategy: Vec<String>,
    /// Previous week's totals, when on record.
    pub baseline: Option<Baseline>,
}

/// Summarize a dataset into a report.
pub fn summarize(dataset: &AggregatedDataset, options: &SummaryOptions) -> Report {
    let weekly = options.kind == ReportKind::Weekly;
    let engagement = engagement_breakdown(dataset);
    let average_rate = engagement.average_engagement_rate;
    let conversion_rate = dataset.referrals.effective_conversion_rate();

    let growth = weekly.then(|| weekly_growth(dataset, options.baseline.as_ref()));

    let summary = Summary {
        total_engagements: engagement.total_engagements,
        total_conversions: dataset.referrals.total_conversions,
        conversion_rate,
        key_highlight: key_highlight(
            engagement.total_engagements,
            dataset.referrals.total_conversions,
        ),
        weekly_growth: growth,
    };

    let referrals = ReferralBreakdown {
        campaigns: dataset.referrals.campaigns.clone(),
        total_clicks: dataset.referrals.total_clicks,
        total_conversions: dataset.referrals.total_conversions,
        conversion_rate,
        top_performers: top_performers(&dataset.referrals.campaigns, TOP_PERFORMERS),
    };

    let alerts = alerts(
        average_rate,
        dataset.user_behavior.bounce_rate,
        conversion_rate,
    );

    let (trends, recommendations) = match growth {
        Some(growth) => (
            Some(trends(dataset, &engagement, &referrals, &growth)),
            Some(recommendations(
                average_rate,
                dataset.user_behavior.bounce_rate,
                &options.brand_strategy,
            )),
        ),
        None => (None, None),
    };

    Report {
        kind: options.kind,
        period_label: options.period_label.clone(),
        period: dataset.period,
        summary,
        engagement,
        referrals,
        behavior: behavior_breakdown(&dataset.user_behavior),
        community: dataset.community.clone(),
        alerts,
        trends,
        recommendations,
        errors: dataset.errors.clone(),
    }
}

/// Sum of engagements over every platform; absent platforms count as zero.
pub fn total_engagements(dataset: &AggregatedDataset) -> u64 {
    dataset.engagement.values().map(|m| m.engagements).sum()
}

/// Mean engagement rate over the platforms that reported a positive rate.
pub fn average_engagement_rate(dataset: &AggregatedDataset) -> f64 {
    let rates: Vec<f64> = dataset
        .engagement
        .values()
        .map(|m| m.engagement_rate)
        .filter(|rate| *rate > 0.0)
        .collect();

    if rates.is_empty() {
        0.0
    } else {
        rates.iter().sum::<f64>() / rates.len() as f64
    }
}

fn new_followers(dataset: &AggregatedDataset) -> u64 {
    dataset.engagement.values().map(|m| m.follower_growth).sum()
}

/// One-line highlight. First matching rule wins.
pub fn key_highlight(total_engagements: u64, total_conversions: u64) -> String {
    if total_engagements > HIGHLIGHT_ENGAGEMENTS {
        format!(
            "Strong engagement with {} total interactions",
            thousands(total_engagements)
        )
    } else if total_conversions > HIGHLIGHT_CONVERSIONS {
        format!(
            "Excellent conversion performance with {} conversions",
            thousands(total_conversions)
        )
    } else {
        "Steady performance across all metrics".to_string()
    }
}

/// Threshold alerts in fixed order: engagement rate, bounce rate, conversion rate.
pub fn alerts(average_engagement_rate: f64, bounce_rate: f64, conversion_rate: f64) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if average_engagement_rate < MIN_ENGAGEMENT_RATE {
        alerts.push(Alert {
            severity: AlertSeverity::Warning,
            message: "Average engagement rate below 5% threshold".to_string(),
            value: Some(average_engagement_rate),
        });
    }

    if bounce_rate > MAX_BOUNCE_RATE {
        alerts.push(Alert {
            severity: AlertSeverity::Warning,
            message: "Website bounce rate above 40% threshold".to_string(),
            value: Some(bounce_rate),
        });
    }

    if conversion_rate < MIN_CONVERSION_RATE {
        alerts.push(Alert {
            severity: AlertSeverity::Alert,
            message: "Conversion rate below 5% target".to_string(),
            value: Some(conversion_rate),
        });
    }

    alerts
}

/// The `n` campaigns with the most conversions. Ties keep their original order.
pub fn top_performers(campaigns: &[CampaignStats], n: usize) -> Vec<CampaignStats> {
    let mut sorted = campaigns.to_vec();
    sorted.sort_by(|a, b| b.conversions.cmp(&a.conversions));
    sorted.truncate(n);
    sorted
}

fn engagement_breakdown(dataset: &AggregatedDataset) -> EngagementBreakdown {
    let platforms = Platform::ALL
        .into_iter()
        .map(|platform| {
            let metrics = dataset.platform(platform);
            let (audience, audience_label) = if metrics.impressions > 0 {
                (metrics.impressions, "Impressions")
            } else {
                (metrics.reach, "Reach")
            };
            PlatformBreakdown {
                platform,
                engagements: metrics.engagements,
                audience,
                audience_label: audience_label.to_string(),
                engagement_rate: metrics.engagement_rate,
                likes: metrics.likes,
                comments: metrics.comments,
                shares: metrics.shares,
            }
        })
        .collect();

    EngagementBreakdown {
        platforms,
        total_engagements: total_engagements(dataset),
        average_engagement_rate: average_engagement_rate(dataset),
    }
}

fn behavior_breakdown(behavior: &BehaviorMetrics) -> BehaviorBreakdown {
    let average_pageviews =
        (behavior.page_views as f64 / behavior.unique_visitors.max(1) as f64).round() as u64;
    let session_quality = if behavior.average_session_seconds > HIGH_QUALITY_SESSION_SECS {
        "high"
    } else {
        "medium"
    };

    BehaviorBreakdown {
        page_views: behavior.page_views,
        unique_visitors: behavior.unique_visitors,
        average_session_duration: behavior.average_session_duration.clone(),
        bounce_rate: behavior.bounce_rate,
        top_pages: behavior.top_pages.clone(),
        user_journey: UserJourney {
            average_pageviews,
            session_quality: session_quality.to_string(),
        },
    }
}

fn weekly_growth(dataset: &AggregatedDataset, baseline: Option<&Baseline>) -> WeeklyGrowth {
    match baseline {
        Some(b) => WeeklyGrowth {
            engagements: GrowthDelta::between(b.total_engagements, total_engagements(dataset)),
            conversions: GrowthDelta::between(
                b.total_conversions,
                dataset.referrals.total_conversions,
            ),
            new_followers: GrowthDelta::between(b.new_followers, new_followers(dataset)),
        },
        None => WeeklyGrowth {
            engagements: GrowthDelta(None),
            conversions: GrowthDelta(None),
            new_followers: GrowthDelta(None),
        },
    }
}

/// Direction of a week-over-week delta.
pub fn trend_of(delta: GrowthDelta) -> Trend {
    match delta.0 {
        None => Trend::Unknown,
        Some(pct) if pct > STABLE_TREND_BAND => Trend::Increasing,
        Some(pct) if pct < -STABLE_TREND_BAND => Trend::Decreasing,
        Some(_) => Trend::Stable,
    }
}

fn trends(
    dataset: &AggregatedDataset,
    engagement: &EngagementBreakdown,
    referrals: &ReferralBreakdown,
    growth: &WeeklyGrowth,
) -> Trends {
    // Highest rate wins; earlier platform on a tie.
    let top_platform = engagement
        .platforms
        .iter()
        .filter(|p| p.engagement_rate > 0.0)
        .fold(None::<&PlatformBreakdown>, |best, p| match best {
            Some(b) if b.engagement_rate >= p.engagement_rate => Some(b),
            _ => Some(p),
        });

    let engagement_trend = trend_of(growth.engagements);
    let mut insights = Vec::new();

    if let Some(p) = top_platform {
        insights.push(format!(
            "{} leads engagement at {}",
            p.platform,
            percent(p.engagement_rate)
        ));
    }

    if let Some(top) = referrals.top_performers.first() {
        insights.push(format!(
            "{} leads campaigns with {} conversions",
            campaign_title(&top.name),
            thousands(top.conversions)
        ));
    }

    insights.push(match engagement_trend {
        Trend::Increasing | Trend::Decreasing => format!(
            "Total engagements {} week over week",
            growth.engagements
        ),
        Trend::Stable => "Engagement holding steady week over week".to_string(),
        Trend::Unknown => "No previous week on record for comparison".to_string(),
    });

    if !dataset.errors.is_empty() {
        insights.push(format!(
            "{} source(s) unavailable this week; figures are partial",
            dataset.errors.len()
        ));
    }

    Trends {
        engagement_trend,
        conversion_trend: trend_of(growth.conversions),
        top_growth_platform: top_platform.map(|p| p.platform),
        insights,
    }
}

fn recommendations(average_rate: f64, bounce_rate: f64, brand_strategy: &[String]) -> Vec<String> {
    let mut recommendations = Vec::new();

    if average_rate < POST_FREQUENCY_RATE {
        recommendations
            .push("Consider increasing post frequency on high-performing platforms".to_string());
    }

    if bounce_rate > LANDING_PAGE_BOUNCE_RATE {
        recommendations.push("Optimize landing page content and loading speed".to_string());
    }

    recommendations.extend(brand_strategy.iter().cloned());
    recommendations
}
