//! Report distribution.
//!
//! The [`Notifier`] decides who gets which document; a [`Transport`]
//! delivers each message.

pub mod transport;

use crate::models::{Report, ReportKind};
use crate::report::{Rendered, ReportRenderer, SummaryVariant};
use chrono::{DateTime, SecondsFormat, Utc};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

pub use transport::{LogTransport, OutboxTransport};

/// Errors from delivering a message.
#[derive(Error, Debug)]
pub enum DistributionError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Normal,
    High,
}

/// One message handed to a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    pub text: String,
    pub priority: Priority,
}

/// Identifier a transport assigns to a delivered message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryId(pub String);

impl fmt::Display for DeliveryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Delivers messages.
pub trait Transport: Send + Sync {
    fn send<'a>(
        &'a self,
        message: &'a OutgoingMessage,
    ) -> BoxFuture<'a, Result<DeliveryId, DistributionError>>;
}

/// Recipient lists.
#[derive(Debug, Clone, Default)]
pub struct Recipients {
    pub team: Vec<String>,
    pub stakeholders: Vec<String>,
}

/// Sends reports and failure alerts to the configured recipients.
pub struct Notifier {
    transport: Box<dyn Transport>,
    renderer: ReportRenderer,
    sender: String,
    recipients: Recipients,
}

impl Notifier {
    pub fn new(
        transport: Box<dyn Transport>,
        renderer: ReportRenderer,
        sender: impl Into<String>,
        recipients: Recipients,
    ) -> Self {
        Self {
            transport,
            renderer,
            sender: sender.into(),
            recipients,
        }
    }

    /// Subject shared by the team and stakeholder messages.
    pub fn report_subject(report: &Report) -> String {
        match report.kind {
            ReportKind::Daily => format!("📊 Daily Performance Report - {}", report.period_label),
            ReportKind::Weekly => format!(
                "📈 Weekly Performance Report - Week ending {}",
                report.period_label
            ),
        }
    }

    /// Send the full report to the team and the matching summary to stakeholders.
    ///
    /// `full` is the already rendered full report. Empty recipient lists are
    /// skipped.
    pub async fn send_report(
        &self,
        report: &Report,
        full: &Rendered,
    ) -> Result<Vec<DeliveryId>, DistributionError> {
        let subject = Self::report_subject(report);
        let priority = match report.kind {
            ReportKind::Daily => Priority::Normal,
            ReportKind::Weekly => Priority::High,
        };
        let variant = SummaryVariant::for_kind(report.kind);
        let prefix = match variant {
            SummaryVariant::Stakeholder => "[UPDATE]",
            SummaryVariant::Executive => "[EXECUTIVE SUMMARY]",
        };

        let mut delivered = Vec::new();

        if let Some(id) = self
            .deliver(
                &self.recipients.team,
                format!("[TEAM] {}", subject),
                full.clone(),
                priority,
            )
            .await?
        {
            delivered.push(id);
        }

        if !self.recipients.stakeholders.is_empty() {
            let summary = self.renderer.render_summary(report, variant);
            if let Some(id) = self
                .deliver(
                    &self.recipients.stakeholders,
                    format!("{} {}", prefix, subject),
                    summary,
                    priority,
                )
                .await?
            {
                delivered.push(id);
            }
        }

        info!(
            "{} report sent to {} team members and {} stakeholders",
            report.kind,
            self.recipients.team.len(),
            self.recipients.stakeholders.len()
        );

        Ok(delivered)
    }

    /// Alert the team that a cycle failed. Stakeholders are never alerted.
    pub async fn send_failure_alert(
        &self,
        title: &str,
        message: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<DeliveryId>, DistributionError> {
        let timestamp = at.to_rfc3339_opts(SecondsFormat::Secs, true);
        let rendered = self.renderer.render_failure_alert(title, message, &timestamp);
        let subject = format!("🚨 {} Report System Alert: {}", self.renderer.brand(), title);

        self.deliver(&self.recipients.team, subject, rendered, Priority::High)
            .await
    }

    async fn deliver(
        &self,
        to: &[String],
        subject: String,
        rendered: Rendered,
        priority: Priority,
    ) -> Result<Option<DeliveryId>, DistributionError> {
        if to.is_empty() {
            debug!("No recipients for {:?}, skipping", subject);
            return Ok(None);
        }

        let message = OutgoingMessage {
            from: self.sender.clone(),
            to: to.to_vec(),
            subject,
            html: rendered.html,
            text: rendered.text,
            priority,
        };

        let id = self.transport.send(&message).await?;
        debug!("Delivered {:?} as {}", message.subject, id);
        Ok(Some(id))
    }
}

/// Parse a comma-separated address list, trimming and dropping empties.
pub fn parse_recipients(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::analysis::{summarize, SummaryOptions};
    use crate::models::{AggregatedDataset, Period};
    use chrono::TimeZone;
    use futures::FutureExt;
    use std::sync::{Arc, Mutex};

    /// Keeps every message; fails when `fail` is set.
    #[derive(Clone, Default)]
    pub(crate) struct RecordingTransport {
        pub sent: Arc<Mutex<Vec<OutgoingMessage>>>,
        pub fail: bool,
    }

    impl Transport for RecordingTransport {
        fn send<'a>(
            &'a self,
            message: &'a OutgoingMessage,
        ) -> BoxFuture<'a, Result<DeliveryId, DistributionError>> {
            async move {
                if self.fail {
                    return Err(DistributionError::Transport("connection refused".to_string()));
                }
                let mut sent = self.sent.lock().unwrap();
                sent.push(message.clone());
                Ok(DeliveryId(format!("msg-{}", sent.len())))
            }
            .boxed()
        }
    }

    fn report(kind: ReportKind) -> Report {
        let end = Utc.with_ymd_and_hms(2026, 10, 14, 9, 0, 0).unwrap();
        summarize(
            &AggregatedDataset::empty(Period::ending_at(end, kind.window_days())),
            &SummaryOptions {
                kind,
                period_label: "2026-10-14".to_string(),
                brand_strategy: vec![],
                baseline: None,
            },
        )
    }

    fn notifier(transport: RecordingTransport, team: &[&str], stakeholders: &[&str]) -> Notifier {
        Notifier::new(
            Box::new(transport),
            ReportRenderer::new("ERIFY™"),
            "reports@erify.com",
            Recipients {
                team: team.iter().map(|s| s.to_string()).collect(),
                stakeholders: stakeholders.iter().map(|s| s.to_string()).collect(),
            },
        )
    }

    #[tokio::test]
    async fn test_daily_report_goes_to_team_and_stakeholders() {
        let transport = RecordingTransport::default();
        let n = notifier(transport.clone(), &["team@erify.com"], &["ceo@erify.com"]);
        let report = report(ReportKind::Daily);
        let full = ReportRenderer::new("ERIFY™").render_full(&report);

        let ids = n.send_report(&report, &full).await.unwrap();
        assert_eq!(ids.len(), 2);

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent[0].subject, "[TEAM] 📊 Daily Performance Report - 2026-10-14");
        assert_eq!(sent[0].to, vec!["team@erify.com"]);
        assert_eq!(sent[0].html, full.html);
        assert_eq!(sent[0].priority, Priority::Normal);
        assert_eq!(sent[1].subject, "[UPDATE] 📊 Daily Performance Report - 2026-10-14");
        assert!(sent[1].text.contains("DAILY UPDATE"));
        assert_eq!(sent[1].from, "reports@erify.com");
    }

    #[tokio::test]
    async fn test_weekly_report_sends_executive_summary_with_high_priority() {
        let transport = RecordingTransport::default();
        let n = notifier(transport.clone(), &["team@erify.com"], &["board@erify.com"]);
        let report = report(ReportKind::Weekly);
        let full = ReportRenderer::new("ERIFY™").render_full(&report);

        n.send_report(&report, &full).await.unwrap();

        let sent = transport.sent.lock().unwrap();
        assert_eq!(
            sent[1].subject,
            "[EXECUTIVE SUMMARY] 📈 Weekly Performance Report - Week ending 2026-10-14"
        );
        assert!(sent.iter().all(|m| m.priority == Priority::High));
    }

    #[tokio::test]
    async fn test_empty_recipient_lists_are_skipped() {
        let transport = RecordingTransport::default();
        let n = notifier(transport.clone(), &[], &["ceo@erify.com"]);
        let report = report(ReportKind::Daily);
        let full = ReportRenderer::new("ERIFY™").render_full(&report);

        let ids = n.send_report(&report, &full).await.unwrap();
        assert_eq!(ids, vec![DeliveryId("msg-1".to_string())]);
        assert_eq!(transport.sent.lock().unwrap()[0].to, vec!["ceo@erify.com"]);
    }

    #[tokio::test]
    async fn test_failure_alert_goes_to_team_only() {
        let transport = RecordingTransport::default();
        let n = notifier(transport.clone(), &["team@erify.com"], &["ceo@erify.com"]);
        let at = Utc.with_ymd_and_hms(2026, 10, 14, 9, 0, 0).unwrap();

        let id = n.send_failure_alert("Daily report failed", "disk full", at).await.unwrap();
        assert!(id.is_some());

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, vec!["team@erify.com"]);
        assert_eq!(sent[0].subject, "🚨 ERIFY™ Report System Alert: Daily report failed");
        assert_eq!(sent[0].priority, Priority::High);
        assert!(sent[0].text.contains("disk full"));
        assert!(sent[0].text.contains("2026-10-14T09:00:00Z"));
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let transport = RecordingTransport {
            fail: true,
            ..Default::default()
        };
        let n = notifier(transport, &["team@erify.com"], &[]);
        let report = report(ReportKind::Daily);
        let full = ReportRenderer::new("ERIFY™").render_full(&report);

        let err = n.send_report(&report, &full).await.unwrap_err();
        assert!(matches!(err, DistributionError::Transport(_)));
    }

    #[test]
    fn test_parse_recipients() {
        assert_eq!(
            parse_recipients(" a@x.com, ,b@x.com ,"),
            vec!["a@x.com".to_string(), "b@x.com".to_string()]
        );
        assert!(parse_recipients("").is_empty());
    }
}
