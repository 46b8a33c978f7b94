//! Aggregation pipeline orchestration
//!
//! Log CSV → Adapter → Per-video binning → Run accumulator → Table writer

use crate::accumulator::RunAccumulator;
use crate::adapter::{discover_inputs, parse_events, read_video_file};
use crate::bins::{BinConfig, TimeBin};
use crate::cumulative::bin_video;
use crate::error::AggregateError;
use crate::types::{AggregationReport, BehaviorTable, TableOutcome, VideoEvents};
use crate::writer::write_table;
use chrono::Utc;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Aggregate every log in `input_dir` and write one table per behavior into
/// `output_dir` (stateless, one-shot).
///
/// All inputs are parsed before anything is written, so a malformed log
/// aborts the run without touching the output directory.
///
/// # Example
/// ```ignore
/// let report = aggregate_directory(Path::new("logs"), Path::new("logs"), BinConfig::default())?;
/// ```
pub fn aggregate_directory(
    input_dir: &Path,
    output_dir: &Path,
    config: BinConfig,
) -> Result<AggregationReport, AggregateError> {
    let mut aggregator = DurationAggregator::with_config(config)?;

    let inputs = discover_inputs(input_dir)?;
    info!(dir = %input_dir.display(), files = inputs.len(), "discovered behavior logs");

    for path in &inputs {
        aggregator.process_file(path)?;
    }

    aggregator.write_all(output_dir)
}

/// Stateful aggregator that accumulates videos until written out
#[derive(Debug)]
pub struct DurationAggregator {
    config: BinConfig,
    bins: Vec<TimeBin>,
    accumulator: RunAccumulator,
    files_processed: usize,
    events_processed: usize,
    events_skipped: usize,
}

impl Default for DurationAggregator {
    fn default() -> Self {
        Self::from_valid_config(BinConfig::default())
    }
}

impl DurationAggregator {
    /// Create an aggregator with the default 30 minute window in 5 minute bins
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an aggregator with a custom window and bin width
    pub fn with_config(config: BinConfig) -> Result<Self, AggregateError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: BinConfig) -> Self {
        Self {
            config,
            bins: config.bins(),
            accumulator: RunAccumulator::new(),
            files_processed: 0,
            events_processed: 0,
            events_skipped: 0,
        }
    }

    pub fn config(&self) -> &BinConfig {
        &self.config
    }

    /// Bin labels in output column order
    pub fn labels(&self) -> Vec<String> {
        self.bins.iter().map(|b| b.label.clone()).collect()
    }

    /// Parse and accumulate one log file
    pub fn process_file(&mut self, path: &Path) -> Result<(), AggregateError> {
        let video = read_video_file(path)?;
        self.accumulate(video);
        Ok(())
    }

    /// Parse and accumulate a log from any reader
    pub fn process_reader<R: Read>(&mut self, video_id: &str, reader: R) -> Result<(), AggregateError> {
        let video = parse_events(video_id, reader)?;
        self.accumulate(video);
        Ok(())
    }

    /// Accumulate already-parsed events for one video
    pub fn accumulate(&mut self, video: VideoEvents) {
        let rows = bin_video(&video, &self.bins);
        info!(
            video = %video.video_id,
            events = video.events.len(),
            skipped = video.skipped,
            behaviors = rows.len(),
            "binned video"
        );

        self.files_processed += 1;
        self.events_processed += video.events.len();
        self.events_skipped += video.skipped;
        self.accumulator.push_rows(rows);
    }

    /// Tables accumulated so far
    pub fn tables(&self) -> &[BehaviorTable] {
        self.accumulator.tables()
    }

    pub fn files_processed(&self) -> usize {
        self.files_processed
    }

    /// Write every accumulated table into `output_dir` and reset the aggregator
    pub fn write_all(&mut self, output_dir: &Path) -> Result<AggregationReport, AggregateError> {
        let labels = self.labels();
        let mut tables: Vec<TableOutcome> = Vec::with_capacity(self.accumulator.behavior_count());

        for table in self.accumulator.tables() {
            tables.push(write_table(output_dir, table, &labels)?);
        }

        let report = AggregationReport {
            files_processed: self.files_processed,
            events_processed: self.events_processed,
            events_skipped: self.events_skipped,
            bin_labels: labels,
            tables,
            completed_at: Utc::now(),
        };
        self.clear();
        Ok(report)
    }

    /// Drop all accumulated rows and counters
    pub fn clear(&mut self) {
        self.accumulator.clear();
        self.files_processed = 0;
        self.events_processed = 0;
        self.events_skipped = 0;
    }
}
