//! Report analysis.
//!
//! Turns an aggregated dataset into a [`crate::models::Report`].

pub mod summarizer;

pub use summarizer::{summarize, Baseline, BaselineHistory, SummaryOptions};
