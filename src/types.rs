//! Core data types
//!
//! Events flow from the adapter into per-video cumulative rows, which the
//! accumulator groups into one table per behavior.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A single scored behavior occurrence from a video log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorEvent {
    /// Lowercased behavior label
    pub behavior: String,
    /// Start time in seconds; `None` when the field failed numeric coercion
    pub start_sec: Option<f64>,
    /// Duration in seconds; `None` when the field failed numeric coercion
    pub duration_sec: Option<f64>,
}

impl BehaviorEvent {
    /// Both timing fields, if the event survived coercion
    pub fn span(&self) -> Option<(f64, f64)> {
        match (self.start_sec, self.duration_sec) {
            (Some(start), Some(duration)) => Some((start, duration)),
            _ => None,
        }
    }
}

/// All events parsed from one input file
#[derive(Debug, Clone)]
pub struct VideoEvents {
    /// Video identifier (input file stem)
    pub video_id: String,
    pub events: Vec<BehaviorEvent>,
    /// Number of events whose start or duration could not be coerced
    pub skipped: usize,
}

/// Cumulative per-bin durations of one behavior in one video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeRow {
    pub video_id: String,
    pub behavior: String,
    /// Running totals in seconds, one per bin, non-decreasing
    pub values: Vec<f64>,
}

impl CumulativeRow {
    /// Total seconds attributed across the whole window
    pub fn total(&self) -> f64 {
        self.values.last().copied().unwrap_or(0.0)
    }
}

/// All rows for one behavior, in the order videos were processed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorTable {
    pub behavior: String,
    pub rows: Vec<CumulativeRow>,
}

/// How a behavior table reached disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// File did not exist; header and rows written
    Created,
    /// File existed; rows appended without a header
    Appended,
}

/// Result of writing a single behavior table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableOutcome {
    pub behavior: String,
    pub path: PathBuf,
    pub mode: WriteMode,
    pub rows_written: usize,
}

impl TableOutcome {
    /// One-line confirmation printed after the table is saved
    pub fn confirmation(&self) -> String {
        format!(
            "Saved cumulative durations for {} to {}",
            self.behavior,
            self.path.display()
        )
    }
}

/// Summary of a full aggregation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationReport {
    pub files_processed: usize,
    pub events_processed: usize,
    pub events_skipped: usize,
    pub bin_labels: Vec<String>,
    pub tables: Vec<TableOutcome>,
    pub completed_at: DateTime<Utc>,
}
