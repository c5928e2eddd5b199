//! HTML email rendering.
//!
//! Output is assembled section by section from the [`Report`] alone, so the
//! same report always renders to the same bytes. Every piece of text that
//! originates from data is escaped.

use super::format::{campaign_title, escape_html, percent, thousands};
use super::SummaryVariant;
use crate::models::{Alert, Report, ReportKind};

const STYLE: &str = "\
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Arial, sans-serif; line-height: 1.6; color: #333; margin: 0; padding: 20px; background: #f8f9fa; }
.container { max-width: 800px; margin: 0 auto; background: white; border-radius: 8px; overflow: hidden; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
.header { background: linear-gradient(135deg, #11C9FF, #FFD700); color: white; padding: 30px; text-align: center; }
.header h1 { margin: 0; font-size: 28px; font-weight: 900; }
.header p { margin: 10px 0 0; opacity: 0.9; }
.content { padding: 30px; }
.summary { background: #f8f9ff; border-left: 4px solid #11C9FF; padding: 20px; margin-bottom: 30px; border-radius: 4px; }
.metrics { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 20px; margin-bottom: 30px; }
.metric { background: #f8f9fa; padding: 20px; border-radius: 8px; text-align: center; }
.metric-value { font-size: 32px; font-weight: bold; color: #11C9FF; margin-bottom: 5px; }
.metric-label { color: #666; font-size: 14px; }
.section { margin-bottom: 30px; }
.section h2 { color: #333; border-bottom: 2px solid #11C9FF; padding-bottom: 10px; }
.platform { background: #f8f9fa; padding: 15px; margin-bottom: 15px; border-radius: 6px; }
.platform h3, .platform h4 { margin: 0 0 10px; color: #11C9FF; }
.platform-stats { display: grid; grid-template-columns: repeat(auto-fit, minmax(120px, 1fr)); gap: 10px; }
.stat { text-align: center; }
.stat-value { font-weight: bold; font-size: 18px; }
.stat-label { font-size: 12px; color: #666; }
.alerts { background: #fff3cd; border: 1px solid #ffeaa7; border-radius: 6px; padding: 15px; margin-bottom: 20px; }
.alert { margin-bottom: 10px; }
.alert:last-child { margin-bottom: 0; }
.errors { background: #f8d7da; border: 1px solid #f5c6cb; color: #721c24; border-radius: 6px; padding: 15px; margin-bottom: 20px; }
.growth { background: #d4edda; border-left: 4px solid #28a745; padding: 15px; margin-bottom: 20px; border-radius: 4px; }
.footer { background: #f8f9fa; padding: 20px; text-align: center; color: #666; font-size: 14px; }
";

/// Render the full report.
pub fn render(report: &Report, brand: &str) -> String {
    let title = format!("{} {} Performance Report", brand, report.kind);
    let mut html = String::new();

    html.push_str(&document_start(&title, &report.period_heading()));

    html.push_str("<div class=\"summary\">\n<h2>📊 Executive Summary</h2>\n");
    html.push_str(&format!(
        "<p><strong>{}</strong></p>\n",
        escape_html(&report.summary.key_highlight)
    ));
    html.push_str(&headline_metrics(report));
    html.push_str("</div>\n");

    if let Some(growth) = &report.summary.weekly_growth {
        html.push_str("<div class=\"growth\">\n<h3>📈 Growth Metrics</h3>\n");
        html.push_str(&format!(
            "<p><strong>Engagements:</strong> {} | <strong>Conversions:</strong> {} | <strong>New Followers:</strong> {}</p>\n",
            growth.engagements, growth.conversions, growth.new_followers
        ));
        html.push_str("</div>\n");
    }

    html.push_str(&alerts_block(&report.alerts, "⚠️ Alerts & Notifications"));

    if !report.errors.is_empty() {
        html.push_str("<div class=\"errors\">\n<h3>🚫 Data Source Issues</h3>\n");
        for error in &report.errors {
            html.push_str(&format!(
                "<div class=\"alert\"><strong>{}:</strong> {}</div>\n",
                escape_html(&error.source),
                escape_html(&error.error)
            ));
        }
        html.push_str("</div>\n");
    }

    html.push_str(&engagement_section(report));
    html.push_str(&referral_section(report));
    html.push_str(&behavior_section(report));

    if let Some(community) = &report.community {
        html.push_str("<div class=\"section\">\n<h2>🌐 Community</h2>\n<div class=\"metrics\">\n");
        html.push_str(&metric(&thousands(community.posts), "Posts"));
        html.push_str(&metric(&thousands(community.interactions), "Interactions"));
        html.push_str(&metric(&thousands(community.new_members), "New Members"));
        for counter in &community.campaign_counters {
            html.push_str(&metric(&thousands(counter.value), &escape_html(&counter.name)));
        }
        html.push_str("</div>\n</div>\n");
    }

    if let Some(trends) = &report.trends {
        html.push_str("<div class=\"section\">\n<h2>🔍 Key Insights</h2>\n");
        html.push_str(&format!(
            "<p><strong>Engagement trend:</strong> {} | <strong>Conversion trend:</strong> {}</p>\n",
            trends.engagement_trend, trends.conversion_trend
        ));
        html.push_str(&list(&trends.insights));
        html.push_str("</div>\n");
    }

    if let Some(recommendations) = &report.recommendations {
        html.push_str("<div class=\"section\">\n<h2>💡 Recommendations</h2>\n");
        html.push_str(&list(recommendations));
        html.push_str("</div>\n");
    }

    html.push_str(&document_end(&[
        format!("Generated by {} Campaign Performance Automation", escape_html(brand)),
        "For questions, contact the ERIFY Team".to_string(),
    ]));

    html
}

/// Render the stakeholder or executive summary.
pub fn render_summary(report: &Report, brand: &str, variant: SummaryVariant) -> String {
    let title = format!("{} {}", brand, variant.title());
    let heading = match report.kind {
        ReportKind::Daily => report.period_label.clone(),
        ReportKind::Weekly => report.period_heading(),
    };

    let mut html = String::new();
    html.push_str(&document_start(&title, &heading));

    html.push_str(&format!(
        "<div class=\"summary\">\n<h2>📊 {}</h2>\n<p><strong>{}</strong></p>\n</div>\n",
        variant.highlight_heading(),
        escape_html(&report.summary.key_highlight)
    ));
    html.push_str(&headline_metrics(report));
    html.push_str(&alerts_block(&report.alerts, variant.alerts_heading()));
    html.push_str(&format!(
        "<p style=\"color: #666; font-size: 14px;\">{}</p>\n",
        variant.closing_note()
    ));

    html.push_str(&document_end(&[format!(
        "{} Campaign Performance Automation",
        escape_html(brand)
    )]));

    html
}

/// Render a system failure alert.
pub fn render_failure(title: &str, message: &str, timestamp: &str, brand: &str) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html>\n<body style=\"font-family: Arial, sans-serif; line-height: 1.6; color: #333;\">\n");
    html.push_str(&format!(
        "<div style=\"background: #f8d7da; border: 1px solid #f5c6cb; color: #721c24; padding: 20px; border-radius: 5px; margin-bottom: 20px;\">\n<h2 style=\"margin: 0 0 10px;\">⚠️ System Alert</h2>\n<p><strong>{}</strong></p>\n</div>\n",
        escape_html(title)
    ));
    html.push_str(&format!(
        "<div style=\"background: #f8f9fa; padding: 15px; border-radius: 5px; margin-bottom: 20px;\">\n<h3>Error Details:</h3>\n<pre style=\"background: #fff; padding: 10px; border-radius: 3px; overflow-x: auto;\">{}</pre>\n</div>\n",
        escape_html(message)
    ));
    html.push_str("<div style=\"background: #d1ecf1; border: 1px solid #bee5eb; color: #0c5460; padding: 15px; border-radius: 5px;\">\n<h3>Next Steps:</h3>\n");
    html.push_str(&list(&super::failure_next_steps()));
    html.push_str("</div>\n<hr style=\"margin: 20px 0;\">\n");
    html.push_str(&format!(
        "<p style=\"color: #666; font-size: 14px;\">Time: {}<br>System: {} Campaign Performance Automation</p>\n",
        escape_html(timestamp),
        escape_html(brand)
    ));
    html.push_str("</body>\n</html>\n");

    html
}

fn document_start(title: &str, heading: &str) -> String {
    let title = escape_html(title);
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>\n{STYLE}</style>\n</head>\n<body>\n<div class=\"container\">\n<div class=\"header\">\n<h1>{title}</h1>\n<p>{}</p>\n</div>\n<div class=\"content\">\n",
        escape_html(heading)
    )
}

fn document_end(footer_lines: &[String]) -> String {
    let mut end = String::from("</div>\n<div class=\"footer\">\n");
    for line in footer_lines {
        end.push_str(&format!("<p>{}</p>\n", line));
    }
    end.push_str("</div>\n</div>\n</body>\n</html>\n");
    end
}

fn headline_metrics(report: &Report) -> String {
    let mut block = String::from("<div class=\"metrics\">\n");
    block.push_str(&metric(
        &thousands(report.summary.total_engagements),
        "Total Engagements",
    ));
    block.push_str(&metric(
        &thousands(report.summary.total_conversions),
        "Conversions",
    ));
    block.push_str(&metric(
        &percent(report.summary.conversion_rate),
        "Conversion Rate",
    ));
    block.push_str("</div>\n");
    block
}

fn metric(value: &str, label: &str) -> String {
    format!(
        "<div class=\"metric\">\n<div class=\"metric-value\">{}</div>\n<div class=\"metric-label\">{}</div>\n</div>\n",
        value, label
    )
}

fn stat(value: &str, label: &str) -> String {
    format!(
        "<div class=\"stat\">\n<div class=\"stat-value\">{}</div>\n<div class=\"stat-label\">{}</div>\n</div>\n",
        value, label
    )
}

fn alerts_block(alerts: &[Alert], heading: &str) -> String {
    if alerts.is_empty() {
        return String::new();
    }

    let mut block = format!("<div class=\"alerts\">\n<h3>{}</h3>\n", heading);
    for alert in alerts {
        block.push_str(&format!(
            "<div class=\"alert\"><strong>{}:</strong> {}",
            alert.severity,
            escape_html(&alert.message)
        ));
        if let Some(value) = alert.value {
            block.push_str(&format!(" ({})", percent(value)));
        }
        block.push_str("</div>\n");
    }
    block.push_str("</div>\n");
    block
}

fn list(items: &[String]) -> String {
    let mut block = String::from("<ul>\n");
    for item in items {
        block.push_str(&format!("<li>{}</li>\n", escape_html(item)));
    }
    block.push_str("</ul>\n");
    block
}

fn engagement_section(report: &Report) -> String {
    let mut section = String::from("<div class=\"section\">\n<h2>📱 Social Media Engagement</h2>\n");

    for p in &report.engagement.platforms {
        section.push_str(&format!(
            "<div class=\"platform\">\n<h3>{}</h3>\n<div class=\"platform-stats\">\n",
            p.platform
        ));
        section.push_str(&stat(&thousands(p.engagements), "Engagements"));
        section.push_str(&stat(&thousands(p.audience), &p.audience_label));
        section.push_str(&stat(&percent(p.engagement_rate), "Engagement Rate"));
        section.push_str("</div>\n</div>\n");
    }

    section.push_str(&format!(
        "<p><strong>Average engagement rate:</strong> {}</p>\n",
        percent(report.engagement.average_engagement_rate)
    ));
    section.push_str("</div>\n");
    section
}

fn referral_section(report: &Report) -> String {
    let referrals = &report.referrals;
    let mut section = String::from("<div class=\"section\">\n<h2>🔗 Referral Performance</h2>\n<div class=\"metrics\">\n");
    section.push_str(&metric(&thousands(referrals.total_clicks), "Total Clicks"));
    section.push_str(&metric(&thousands(referrals.total_conversions), "Conversions"));
    section.push_str(&metric(&percent(referrals.conversion_rate), "Conversion Rate"));
    section.push_str("</div>\n");

    if !referrals.top_performers.is_empty() {
        section.push_str("<h3>🏆 Top Performing Campaigns</h3>\n");
        for (i, campaign) in referrals.top_performers.iter().enumerate() {
            section.push_str(&format!(
                "<div class=\"platform\">\n<h4>{}. {}</h4>\n<div class=\"platform-stats\">\n",
                i + 1,
                escape_html(&campaign_title(&campaign.name))
            ));
            section.push_str(&stat(&thousands(campaign.clicks), "Clicks"));
            section.push_str(&stat(&thousands(campaign.conversions), "Conversions"));
            section.push_str("</div>\n</div>\n");
        }
    }

    section.push_str("</div>\n");
    section
}

fn behavior_section(report: &Report) -> String {
    let behavior = &report.behavior;
    let mut section = String::from("<div class=\"section\">\n<h2>👥 User Behavior</h2>\n<div class=\"metrics\">\n");
    section.push_str(&metric(&thousands(behavior.page_views), "Page Views"));
    section.push_str(&metric(&thousands(behavior.unique_visitors), "Unique Visitors"));
    section.push_str(&metric(
        &escape_html(&behavior.average_session_duration),
        "Avg Session",
    ));
    section.push_str(&metric(&percent(behavior.bounce_rate), "Bounce Rate"));
    section.push_str("</div>\n");

    section.push_str(&format!(
        "<p><strong>Pages per visitor:</strong> {} | <strong>Session quality:</strong> {}</p>\n",
        thousands(behavior.user_journey.average_pageviews),
        escape_html(&behavior.user_journey.session_quality)
    ));

    if !behavior.top_pages.is_empty() {
        section.push_str("<h3>Top Pages</h3>\n<ul>\n");
        for page in &behavior.top_pages {
            section.push_str(&format!(
                "<li><code>{}</code>: {} views</li>\n",
                escape_html(&page.path),
                thousands(page.views)
            ));
        }
        section.push_str("</ul>\n");
    }

    section.push_str("</div>\n");
    section
}
