//! Aggregation of per-source results into one dataset.

pub mod engine;

pub use engine::AggregationEngine;
