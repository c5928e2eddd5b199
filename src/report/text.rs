//! Plain-text rendering, the fallback for clients that cannot display HTML.
//!
//! Carries the same information as the HTML output.

use super::format::{campaign_title, percent, thousands};
use super::SummaryVariant;
use crate::models::{Alert, Report, ReportKind};

const RULE: &str = "==================================================";

/// Render the full report.
pub fn render(report: &Report, brand: &str) -> String {
    let mut text = String::new();

    text.push_str(&format!(
        "{} {} PERFORMANCE REPORT\n",
        brand,
        report.kind.to_string().to_uppercase()
    ));
    text.push_str(&format!("{}\n", report.period_heading()));
    text.push_str(&format!("{}\n\n", RULE));

    text.push_str("EXECUTIVE SUMMARY\n");
    text.push_str(&format!("{}\n\n", report.summary.key_highlight));
    text.push_str(&headline_metrics(report));
    text.push('\n');

    if let Some(growth) = &report.summary.weekly_growth {
        text.push_str("GROWTH METRICS\n");
        text.push_str(&format!("Engagements: {}\n", growth.engagements));
        text.push_str(&format!("Conversions: {}\n", growth.conversions));
        text.push_str(&format!("New Followers: {}\n\n", growth.new_followers));
    }

    text.push_str(&alerts_block(&report.alerts, "ALERTS & NOTIFICATIONS"));

    if !report.errors.is_empty() {
        text.push_str("DATA SOURCE ISSUES\n");
        for error in &report.errors {
            text.push_str(&format!("- {}: {}\n", error.source, error.error));
        }
        text.push('\n');
    }

    text.push_str("SOCIAL MEDIA ENGAGEMENT\n");
    for p in &report.engagement.platforms {
        text.push_str(&format!(
            "{}: {} engagements, {} {}, {} engagement rate\n",
            p.platform,
            thousands(p.engagements),
            thousands(p.audience),
            p.audience_label.to_lowercase(),
            percent(p.engagement_rate)
        ));
    }
    text.push_str(&format!(
        "Average engagement rate: {}\n\n",
        percent(report.engagement.average_engagement_rate)
    ));

    let referrals = &report.referrals;
    text.push_str("REFERRAL PERFORMANCE\n");
    text.push_str(&format!("Total Clicks: {}\n", thousands(referrals.total_clicks)));
    text.push_str(&format!("Conversions: {}\n", thousands(referrals.total_conversions)));
    text.push_str(&format!("Conversion Rate: {}\n", percent(referrals.conversion_rate)));
    if !referrals.top_performers.is_empty() {
        text.push_str("\nTop Performing Campaigns:\n");
        for (i, campaign) in referrals.top_performers.iter().enumerate() {
            text.push_str(&format!(
                "{}. {}: {} clicks, {} conversions\n",
                i + 1,
                campaign_title(&campaign.name),
                thousands(campaign.clicks),
                thousands(campaign.conversions)
            ));
        }
    }
    text.push('\n');

    let behavior = &report.behavior;
    text.push_str("USER BEHAVIOR\n");
    text.push_str(&format!("Page Views: {}\n", thousands(behavior.page_views)));
    text.push_str(&format!("Unique Visitors: {}\n", thousands(behavior.unique_visitors)));
    text.push_str(&format!("Avg Session: {}\n", behavior.average_session_duration));
    text.push_str(&format!("Bounce Rate: {}\n", percent(behavior.bounce_rate)));
    text.push_str(&format!(
        "Pages per visitor: {} | Session quality: {}\n",
        thousands(behavior.user_journey.average_pageviews),
        behavior.user_journey.session_quality
    ));
    if !behavior.top_pages.is_empty() {
        text.push_str("\nTop Pages:\n");
        for page in &behavior.top_pages {
            text.push_str(&format!("- {}: {} views\n", page.path, thousands(page.views)));
        }
    }
    text.push('\n');

    if let Some(community) = &report.community {
        text.push_str("COMMUNITY\n");
        text.push_str(&format!("Posts: {}\n", thousands(community.posts)));
        text.push_str(&format!("Interactions: {}\n", thousands(community.interactions)));
        text.push_str(&format!("New Members: {}\n", thousands(community.new_members)));
        for counter in &community.campaign_counters {
            text.push_str(&format!("{}: {}\n", counter.name, thousands(counter.value)));
        }
        text.push('\n');
    }

    if let Some(trends) = &report.trends {
        text.push_str("KEY INSIGHTS\n");
        text.push_str(&format!(
            "Engagement trend: {} | Conversion trend: {}\n",
            trends.engagement_trend, trends.conversion_trend
        ));
        text.push_str(&list(&trends.insights));
        text.push('\n');
    }

    if let Some(recommendations) = &report.recommendations {
        text.push_str("RECOMMENDATIONS\n");
        text.push_str(&list(recommendations));
        text.push('\n');
    }

    text.push_str("---\n");
    text.push_str(&format!("Generated by {} Campaign Performance Automation\n", brand));
    text.push_str("For questions, contact the ERIFY Team\n");

    text
}

/// Render the stakeholder or executive summary.
pub fn render_summary(report: &Report, brand: &str, variant: SummaryVariant) -> String {
    let heading = match report.kind {
        ReportKind::Daily => report.period_label.clone(),
        ReportKind::Weekly => report.period_heading(),
    };

    let mut text = String::new();
    text.push_str(&format!("{} {}\n", brand, variant.title().to_uppercase()));
    text.push_str(&format!("{}\n", heading));
    text.push_str(&format!("{}\n\n", RULE));

    text.push_str(&format!("{}\n", variant.highlight_heading().to_uppercase()));
    text.push_str(&format!("{}\n\n", report.summary.key_highlight));
    text.push_str(&headline_metrics(report));
    text.push('\n');
    text.push_str(&alerts_block(&report.alerts, &variant.alerts_heading().to_uppercase()));
    text.push_str(&format!("{}\n\n", variant.closing_note()));

    text.push_str("---\n");
    text.push_str(&format!("{} Campaign Performance Automation\n", brand));

    text
}

/// Render a system failure alert.
pub fn render_failure(title: &str, message: &str, timestamp: &str, brand: &str) -> String {
    let mut text = String::new();

    text.push_str("SYSTEM ALERT\n");
    text.push_str(&format!("{}\n\n", title));
    text.push_str("Error Details:\n");
    text.push_str(&format!("{}\n\n", message));
    text.push_str("Next Steps:\n");
    text.push_str(&list(&super::failure_next_steps()));
    text.push('\n');
    text.push_str("---\n");
    text.push_str(&format!("Time: {}\n", timestamp));
    text.push_str(&format!("System: {} Campaign Performance Automation\n", brand));

    text
}

fn headline_metrics(report: &Report) -> String {
    let mut block = String::new();
    block.push_str(&format!(
        "Total Engagements: {}\n",
        thousands(report.summary.total_engagements)
    ));
    block.push_str(&format!(
        "Conversions: {}\n",
        thousands(report.summary.total_conversions)
    ));
    block.push_str(&format!(
        "Conversion Rate: {}\n",
        percent(report.summary.conversion_rate)
    ));
    block
}

fn alerts_block(alerts: &[Alert], heading: &str) -> String {
    if alerts.is_empty() {
        return String::new();
    }

    let mut block = format!("{}\n", heading);
    for alert in alerts {
        block.push_str(&format!("{}: {}", alert.severity, alert.message));
        if let Some(value) = alert.value {
            block.push_str(&format!(" ({})", percent(value)));
        }
        block.push('\n');
    }
    block.push('\n');
    block
}

fn list(items: &[String]) -> String {
    items.iter().map(|item| format!("- {}\n", item)).collect()
}
