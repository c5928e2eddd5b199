//! Built-in mock data for every source.
//!
//! No provider APIs are called; these are the reference numbers the
//! dashboard ships with until a real client is wired in.

use super::{CollectError, Collector, SourceId};
use crate::models::{
    BehaviorMetrics, CampaignStats, CommunityMetrics, Counter, EngagementMetrics, PageStat,
    Period, Platform, ReferralMetrics, SourceResult,
};
use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::info;

/// Returns the mock data for its source, independent of the period.
pub struct MockCollector {
    source: SourceId,
}

impl MockCollector {
    pub fn new(source: SourceId) -> Self {
        Self { source }
    }
}

impl Collector for MockCollector {
    fn name(&self) -> &str {
        self.source.label()
    }

    fn fetch<'a>(&'a self, period: &'a Period) -> BoxFuture<'a, Result<SourceResult, CollectError>> {
        async move {
            info!(
                "Collecting {} data for {} day(s)...",
                self.name(),
                period.duration_days
            );
            Ok(mock_result(self.source))
        }
        .boxed()
    }
}

/// The mock result for a source.
pub fn mock_result(source: SourceId) -> SourceResult {
    match source {
        SourceId::GoogleAnalyticsReferrals => SourceResult::Referral(ReferralMetrics {
            campaigns: vec![
                CampaignStats::new("erify-vip-launch", 1250, 89),
                CampaignStats::new("luxury-fintech-challenge", 890, 67),
                CampaignStats::new("supreme4-branding", 445, 23),
            ],
            total_clicks: 2585,
            total_conversions: 179,
            conversion_rate: 6.92,
        }),
        SourceId::GoogleAnalyticsBehavior => SourceResult::Behavior(BehaviorMetrics {
            page_views: 8934,
            unique_visitors: 3421,
            sessions: 4105,
            average_session_duration: "4m 12s".to_string(),
            average_session_seconds: 252,
            bounce_rate: 23.4,
            top_pages: vec![
                page("/vip-referral", 2134, "VIP Referral Program"),
                page("/luxury-challenge", 1876, "Luxury Fintech Challenge"),
                page("/supreme4-crown", 1234, "Supreme 4 Crown Seal"),
            ],
        }),
        SourceId::Twitter => SourceResult::Engagement {
            platform: Platform::Twitter,
            metrics: EngagementMetrics {
                posts: 24,
                impressions: 45678,
                reach: 0,
                engagements: 3421,
                likes: 892,
                comments: 156,
                shares: 234,
                engagement_rate: 7.49,
                follower_growth: 0,
            },
        },
        SourceId::LinkedIn => SourceResult::Engagement {
            platform: Platform::LinkedIn,
            metrics: EngagementMetrics {
                posts: 8,
                impressions: 12345,
                reach: 0,
                engagements: 890,
                likes: 567,
                comments: 123,
                shares: 89,
                engagement_rate: 7.21,
                follower_growth: 45,
            },
        },
        SourceId::Facebook => SourceResult::Engagement {
            platform: Platform::Facebook,
            metrics: EngagementMetrics {
                posts: 6,
                impressions: 0,
                reach: 8765,
                engagements: 654,
                likes: 432,
                comments: 98,
                shares: 76,
                engagement_rate: 7.46,
                follower_growth: 0,
            },
        },
        SourceId::ErifyDashboard => SourceResult::Community(CommunityMetrics {
            posts: 12,
            interactions: 567,
            new_members: 23,
            campaign_counters: vec![
                counter("VIP referrals", 89),
                counter("Luxury signups", 67),
                counter("Branding downloads", 234),
            ],
        }),
    }
}

fn page(path: &str, views: u64, title: &str) -> PageStat {
    PageStat {
        path: path.to_string(),
        views,
        title: Some(title.to_string()),
    }
}

fn counter(name: &str, value: u64) -> Counter {
    Counter {
        name: name.to_string(),
        value,
    }
}
