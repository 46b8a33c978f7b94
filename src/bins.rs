//! Time bin configuration and overlap splitting
//!
//! A recording window `[0, window_sec)` is cut into contiguous bins of
//! `bin_width_sec`. The last bin is clipped to the window when the width does
//! not divide it evenly.

use crate::error::AggregateError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default recording window (30 minutes)
pub const DEFAULT_WINDOW_SEC: f64 = 1800.0;

/// Default bin width (5 minutes)
pub const DEFAULT_BIN_WIDTH_SEC: f64 = 300.0;

/// Upper bound on the number of bins a configuration may produce
const MAX_BINS: usize = 10_000;

/// Window and bin width for an aggregation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinConfig {
    /// Total window covered by the bins, in seconds
    pub window_sec: f64,
    /// Width of each bin, in seconds
    pub bin_width_sec: f64,
}

impl Default for BinConfig {
    fn default() -> Self {
        Self {
            window_sec: DEFAULT_WINDOW_SEC,
            bin_width_sec: DEFAULT_BIN_WIDTH_SEC,
        }
    }
}

/// One half-open bin `[start_sec, end_sec)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBin {
    pub index: usize,
    pub start_sec: f64,
    pub end_sec: f64,
    pub label: String,
}

impl TimeBin {
    /// Overlap in seconds between `[start, end)` and this bin
    pub fn overlap(&self, start: f64, end: f64) -> f64 {
        if start < self.end_sec && end > self.start_sec {
            end.min(self.end_sec) - start.max(self.start_sec)
        } else {
            0.0
        }
    }
}

impl BinConfig {
    /// Create a validated configuration
    pub fn new(window_sec: f64, bin_width_sec: f64) -> Result<Self, AggregateError> {
        let config = Self {
            window_sec,
            bin_width_sec,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that both values are positive and finite and the bin count is sane
    pub fn validate(&self) -> Result<(), AggregateError> {
        if !self.window_sec.is_finite() || self.window_sec <= 0.0 {
            return Err(AggregateError::InvalidConfig(format!(
                "window_sec must be a positive number, got {}",
                self.window_sec
            )));
        }
        if !self.bin_width_sec.is_finite() || self.bin_width_sec <= 0.0 {
            return Err(AggregateError::InvalidConfig(format!(
                "bin_width_sec must be a positive number, got {}",
                self.bin_width_sec
            )));
        }
        let count = (self.window_sec / self.bin_width_sec).ceil();
        if count > MAX_BINS as f64 {
            return Err(AggregateError::InvalidConfig(format!(
                "{count} bins requested, at most {MAX_BINS} allowed"
            )));
        }
        Ok(())
    }

    /// Number of bins covering the window
    pub fn bin_count(&self) -> usize {
        (self.window_sec / self.bin_width_sec).ceil() as usize
    }

    /// Contiguous bins covering `[0, window_sec)`
    pub fn bins(&self) -> Vec<TimeBin> {
        let unit = self.label_unit();
        (0..self.bin_count())
            .map(|index| {
                let start_sec = index as f64 * self.bin_width_sec;
                let end_sec = ((index + 1) as f64 * self.bin_width_sec).min(self.window_sec);
                TimeBin {
                    index,
                    start_sec,
                    end_sec,
                    label: unit.label(start_sec, end_sec),
                }
            })
            .collect()
    }

    /// Minutes when every bin bound falls on a whole minute, seconds otherwise
    fn label_unit(&self) -> LabelUnit {
        let whole_minutes = |sec: f64| sec % 60.0 == 0.0;
        if whole_minutes(self.window_sec) && whole_minutes(self.bin_width_sec) {
            LabelUnit::Minutes
        } else {
            LabelUnit::Seconds
        }
    }

    /// Human-readable bin labels, e.g. `0-5 min`
    pub fn labels(&self) -> Vec<String> {
        self.bins().into_iter().map(|b| b.label).collect()
    }

    /// Load a configuration from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, AggregateError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file and validate it
    pub fn from_file(path: &Path) -> Result<Self, AggregateError> {
        let json = fs::read_to_string(path).map_err(|e| AggregateError::io(path, e))?;
        Self::from_json(&json)
    }

    /// Serialize the configuration to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Unit used for bin column headers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LabelUnit {
    Minutes,
    Seconds,
}

impl LabelUnit {
    /// Label a bin by its bounds, e.g. `0-5 min` or `0-20 s`
    fn label(self, start_sec: f64, end_sec: f64) -> String {
        match self {
            LabelUnit::Minutes => format!("{}-{} min", start_sec / 60.0, end_sec / 60.0),
            LabelUnit::Seconds => format!("{start_sec}-{end_sec} s"),
        }
    }
}

/// Split an event `[start, start + duration)` across bins.
///
/// Returns `(bin_index, overlap_sec)` for every bin receiving a positive
/// share. Portions outside the window are dropped.
pub fn split_duration(start: f64, duration: f64, bins: &[TimeBin]) -> Vec<(usize, f64)> {
    let end = start + duration;
    bins.iter()
        .filter_map(|bin| {
            let overlap = bin.overlap(start, end);
            (overlap > 0.0).then_some((bin.index, overlap))
        })
        .collect()
}
