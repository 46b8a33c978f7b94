//! Behavior Bins - cumulative time-binned duration tables from behavior logs
//!
//! Each input is a headerless per-video CSV log of scored behaviors (label,
//! start time, duration). Event durations are split across fixed time bins by
//! overlap, summed cumulatively per behavior, merged across videos, and written
//! as one table per behavior:
//! log parsing → overlap splitting → running sums → per-behavior merge → CSV tables.

pub mod accumulator;
pub mod adapter;
pub mod bins;
pub mod cumulative;
pub mod error;
pub mod pipeline;
pub mod types;
pub mod writer;

pub use accumulator::RunAccumulator;
pub use bins::{split_duration, BinConfig, TimeBin};
pub use error::AggregateError;
pub use pipeline::{aggregate_directory, DurationAggregator};
pub use types::{
    AggregationReport, BehaviorEvent, BehaviorTable, CumulativeRow, TableOutcome, VideoEvents,
    WriteMode,
};

/// Crate version reported by the CLI
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
