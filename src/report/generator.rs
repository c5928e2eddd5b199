//! Report files on disk.
//!
//! Each cycle leaves an HTML, a plain-text and a JSON copy of its report in
//! the output directory.

use super::Rendered;
use crate::models::Report;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Paths of the files written for one report.
#[derive(Debug, Clone)]
pub struct ReportFiles {
    pub html: PathBuf,
    pub text: PathBuf,
    pub json: PathBuf,
}

/// File stem for a report, e.g. `daily-report-2026-10-14`.
pub fn file_stem(report: &Report) -> String {
    format!(
        "{}-report-{}",
        report.kind.to_string().to_lowercase(),
        report.period_label
    )
}

/// Write the rendered documents and the JSON report into `dir`.
pub fn write_report_files(report: &Report, rendered: &Rendered, dir: &Path) -> Result<ReportFiles> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let stem = file_stem(report);
    let files = ReportFiles {
        html: dir.join(format!("{}.html", stem)),
        text: dir.join(format!("{}.txt", stem)),
        json: dir.join(format!("{}.json", stem)),
    };

    write_file(&files.html, &rendered.html)?;
    write_file(&files.text, &rendered.text)?;
    write_file(&files.json, &generate_json_report(report)?)?;

    Ok(files)
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}
