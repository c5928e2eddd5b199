//! Report rendering and report files.
//!
//! [`ReportRenderer`] turns a summarized [`Report`] into HTML and plain-text
//! documents. Rendering reads nothing but its inputs, so a given report
//! always produces byte-identical output.

pub mod format;
pub mod generator;
pub mod html;
pub mod text;

use crate::models::{Report, ReportKind};

pub use generator::write_report_files;

/// An HTML document together with its plain-text fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub html: String,
    pub text: String,
}

/// The two short summary documents sent to stakeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryVariant {
    /// Daily update for stakeholders.
    Stakeholder,
    /// Weekly summary for executives.
    Executive,
}

impl SummaryVariant {
    /// The variant that goes with a report kind.
    pub fn for_kind(kind: ReportKind) -> Self {
        match kind {
            ReportKind::Daily => SummaryVariant::Stakeholder,
            ReportKind::Weekly => SummaryVariant::Executive,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SummaryVariant::Stakeholder => "Daily Update",
            SummaryVariant::Executive => "Weekly Executive Summary",
        }
    }

    pub fn highlight_heading(&self) -> &'static str {
        match self {
            SummaryVariant::Stakeholder => "Key Highlight",
            SummaryVariant::Executive => "Week at a Glance",
        }
    }

    pub fn alerts_heading(&self) -> &'static str {
        match self {
            SummaryVariant::Stakeholder => "Items Requiring Attention",
            SummaryVariant::Executive => "Areas for Attention",
        }
    }

    pub fn closing_note(&self) -> &'static str {
        match self {
            SummaryVariant::Stakeholder => {
                "This is an automated summary. The full report has been sent to the marketing team."
            }
            SummaryVariant::Executive => {
                "The detailed weekly analysis is available from the marketing team."
            }
        }
    }
}

/// Renders reports under a brand name.
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    brand: String,
}

impl ReportRenderer {
    pub fn new(brand: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
        }
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn render_html(&self, report: &Report) -> String {
        html::render(report, &self.brand)
    }

    pub fn render_text(&self, report: &Report) -> String {
        text::render(report, &self.brand)
    }

    /// Full report in both formats.
    pub fn render_full(&self, report: &Report) -> Rendered {
        Rendered {
            html: self.render_html(report),
            text: self.render_text(report),
        }
    }

    /// Short daily summary: header, highlight, headline metrics and alerts.
    pub fn render_stakeholder_summary(&self, report: &Report) -> Rendered {
        self.render_summary(report, SummaryVariant::Stakeholder)
    }

    /// Short weekly summary with the same content as the stakeholder one.
    pub fn render_executive_summary(&self, report: &Report) -> Rendered {
        self.render_summary(report, SummaryVariant::Executive)
    }

    pub fn render_summary(&self, report: &Report, variant: SummaryVariant) -> Rendered {
        Rendered {
            html: html::render_summary(report, &self.brand, variant),
            text: text::render_summary(report, &self.brand, variant),
        }
    }

    /// Alert sent to the team when a report cycle fails.
    ///
    /// `timestamp` is supplied by the caller.
    pub fn render_failure_alert(&self, title: &str, message: &str, timestamp: &str) -> Rendered {
        Rendered {
            html: html::render_failure(title, message, timestamp, &self.brand),
            text: text::render_failure(title, message, timestamp, &self.brand),
        }
    }
}

fn failure_next_steps() -> Vec<String> {
    vec![
        "Check the application logs for detailed error information".to_string(),
        "Verify API credentials and connectivity for each data source".to_string(),
        "Run a manual report to confirm the system recovers".to_string(),
    ]
}
