//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::ReportKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// campaign-pulse - campaign performance reports and dashboard snapshots
///
/// Collects engagement, referral and behaviour metrics, renders daily and
/// weekly reports, distributes them and keeps the dashboard's JSON
/// snapshots fresh.
///
/// Examples:
///   campaign-pulse report --kind daily
///   campaign-pulse report --kind weekly --dry-run
///   campaign-pulse schedule
///   campaign-pulse sync
///   campaign-pulse serve --port 8080
///   campaign-pulse init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to configuration file
    ///
    /// If not specified, looks for .campaign-pulse.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Team recipients (comma-separated), replacing the configured list
    #[arg(long, env = "TEAM_EMAILS", value_name = "LIST", global = true)]
    pub team_emails: Option<String>,

    /// Stakeholder recipients (comma-separated), replacing the configured list
    #[arg(long, env = "STAKEHOLDER_EMAILS", value_name = "LIST", global = true)]
    pub stakeholder_emails: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate one report now
    Report {
        /// Report kind
        #[arg(long, value_enum, default_value = "daily")]
        kind: ReportKind,

        /// Render and log messages without writing them to the outbox
        #[arg(long, conflicts_with = "no_send")]
        dry_run: bool,

        /// Write the report files only, send nothing
        #[arg(long)]
        no_send: bool,
    },

    /// Run daily and weekly reports on the configured schedule
    Schedule,

    /// Refresh the analytics and video snapshots
    Sync,

    /// Serve the snapshots and the dashboard assets
    Serve {
        /// Port to listen on (overrides the configured port)
        #[arg(long, env = "PORT")]
        port: Option<u16>,
    },

    /// Generate a default .campaign-pulse.toml configuration file
    InitConfig,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Command::Serve { port: Some(0) } = self.command {
            return Err("Port must be between 1 and 65535".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
