//! Known data sources.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a data source in configuration, fixtures and error entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceId {
    /// Web analytics: UTM campaign clicks and conversions.
    GoogleAnalyticsReferrals,
    /// Web analytics: page views, sessions, bounce rate.
    GoogleAnalyticsBehavior,
    Twitter,
    #[serde(rename = "linkedin")]
    LinkedIn,
    Facebook,
    /// Internal dashboard: community and campaign counters.
    ErifyDashboard,
}

impl SourceId {
    pub const ALL: [SourceId; 6] = [
        SourceId::GoogleAnalyticsReferrals,
        SourceId::GoogleAnalyticsBehavior,
        SourceId::Twitter,
        SourceId::LinkedIn,
        SourceId::Facebook,
        SourceId::ErifyDashboard,
    ];

    /// Configuration key, also the fixture file stem.
    pub fn key(&self) -> &'static str {
        match self {
            SourceId::GoogleAnalyticsReferrals => "google_analytics_referrals",
            SourceId::GoogleAnalyticsBehavior => "google_analytics_behavior",
            SourceId::Twitter => "twitter",
            SourceId::LinkedIn => "linkedin",
            SourceId::Facebook => "facebook",
            SourceId::ErifyDashboard => "erify_dashboard",
        }
    }

    /// Display name used in logs and report error lists.
    pub fn label(&self) -> &'static str {
        match self {
            SourceId::GoogleAnalyticsReferrals => "Google Analytics (referrals)",
            SourceId::GoogleAnalyticsBehavior => "Google Analytics (behavior)",
            SourceId::Twitter => "Twitter",
            SourceId::LinkedIn => "LinkedIn",
            SourceId::Facebook => "Facebook",
            SourceId::ErifyDashboard => "ERIFY Dashboard",
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
